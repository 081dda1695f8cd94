//! Scroll-triggered paging.
//!
//! The controller keeps exactly one observation on the last rendered result.
//! When the [`VisibilitySource`] reports that item as visible, the controller
//! tries to advance to the next page.

use tokio::sync::mpsc;

use crate::controller::ControllerEvent;
use crate::query::Generation;
use crate::results::ResultSet;

/// Identity of a rendered result the controller is watching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObservedItem {
    pub generation: Generation,
    pub index: usize,
    pub title: String,
}

/// Lets a [`VisibilitySource`] report that its observed item scrolled into
/// view. Reporting only queues a message for the controller task.
#[derive(Debug, Clone)]
pub struct VisibilityNotifier {
    target: ObservedItem,
    tx: mpsc::UnboundedSender<ControllerEvent>,
}

impl VisibilityNotifier {
    pub(crate) fn new(target: ObservedItem, tx: mpsc::UnboundedSender<ControllerEvent>) -> Self {
        Self { target, tx }
    }

    pub fn target(&self) -> &ObservedItem {
        &self.target
    }

    pub fn became_visible(&self) {
        let _ = self
            .tx
            .send(ControllerEvent::LastItemVisible(self.target.clone()));
    }
}

/// Detects when a rendered item enters the viewport.
pub trait VisibilitySource: Send + 'static {
    /// Starts watching `target`; call `notifier.became_visible()` each time it
    /// crosses into view.
    fn observe(&mut self, target: &ObservedItem, notifier: VisibilityNotifier);

    /// Stops watching `target`. Notifications sent after this are ignored.
    fn release(&mut self, target: &ObservedItem);
}

/// Keeps a single observation bound to the last item of the result list.
pub(crate) struct VisibilityTrigger<V> {
    source: V,
    bound: Option<ObservedItem>,
    events: mpsc::UnboundedSender<ControllerEvent>,
}

impl<V> VisibilityTrigger<V>
where
    V: VisibilitySource,
{
    pub(crate) fn new(source: V, events: mpsc::UnboundedSender<ControllerEvent>) -> Self {
        Self {
            source,
            bound: None,
            events,
        }
    }

    /// Rebinds to the current last item. Nothing is observed while a fetch is
    /// loading or the list is empty.
    pub(crate) fn sync(&mut self, generation: Generation, results: &ResultSet, loading: bool) {
        let wanted = if loading {
            None
        } else {
            results.last().map(|title| ObservedItem {
                generation,
                index: results.len() - 1,
                title: title.to_string(),
            })
        };
        if self.bound == wanted {
            return;
        }

        if let Some(previous) = self.bound.take() {
            self.source.release(&previous);
        }
        if let Some(target) = wanted {
            let notifier = VisibilityNotifier::new(target.clone(), self.events.clone());
            self.source.observe(&target, notifier);
            self.bound = Some(target);
        }
    }

    pub(crate) fn is_bound_to(&self, target: &ObservedItem) -> bool {
        self.bound.as_ref() == Some(target)
    }

    pub(crate) fn release(&mut self) {
        if let Some(previous) = self.bound.take() {
            self.source.release(&previous);
        }
    }
}
