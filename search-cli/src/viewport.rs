use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use scrollsearch_controller::ObservedItem;
use scrollsearch_controller::VisibilityNotifier;
use scrollsearch_controller::VisibilitySource;

/// Line-oriented stand-in for a scrolling list. A terminal has no viewport
/// geometry, so "scrolling to the end" is an explicit call that makes the
/// last printed title visible.
#[derive(Clone, Default)]
pub struct TerminalViewport {
    observed: Arc<Mutex<Option<VisibilityNotifier>>>,
}

impl TerminalViewport {
    /// Reports the observed item as visible. Returns `false` when nothing is
    /// being observed, i.e. while a page is loading or the list is empty.
    pub fn scroll_to_end(&self) -> bool {
        match self.lock().as_ref() {
            Some(notifier) => {
                tracing::trace!(title = %notifier.target().title, "scrolled to last item");
                notifier.became_visible();
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<VisibilityNotifier>> {
        self.observed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl VisibilitySource for TerminalViewport {
    fn observe(&mut self, _target: &ObservedItem, notifier: VisibilityNotifier) {
        *self.lock() = Some(notifier);
    }

    fn release(&mut self, target: &ObservedItem) {
        let mut observed = self.lock();
        if observed
            .as_ref()
            .is_some_and(|notifier| notifier.target() == target)
        {
            *observed = None;
        }
    }
}
