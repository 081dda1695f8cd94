//! Fetch bookkeeping: which request is pending and what the last one said.

use crate::query::Generation;
use crate::query::QueryState;

/// One outstanding `fetch_page` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Per-controller id, distinguishes a retry from the attempt it replaces.
    pub id: u64,
    pub query: String,
    pub page: u32,
    pub generation: Generation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingFetch {
    id: u64,
    generation: Generation,
}

#[derive(Debug, Clone, Default)]
pub struct FetchStatus {
    phase: FetchPhase,
    pending: Option<PendingFetch>,
    error: bool,
    has_more: bool,
    next_request_id: u64,
}

impl FetchStatus {
    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Whether a visibility trigger may move to the next page.
    pub fn can_advance(&self) -> bool {
        self.has_more && !self.is_loading()
    }

    /// Enters `Loading` for the current query and page. Any previously
    /// pending request stops being able to complete.
    pub(crate) fn begin(&mut self, query: &QueryState) -> FetchRequest {
        let id = self.allocate_request_id();
        let generation = query.generation();
        self.pending = Some(PendingFetch { id, generation });
        self.phase = FetchPhase::Loading;
        self.error = false;
        FetchRequest {
            id,
            query: query.query().to_string(),
            page: query.page(),
            generation,
        }
    }

    /// True when `request` is the pending fetch and was issued under
    /// `current`.
    pub(crate) fn is_current(&self, request: &FetchRequest, current: Generation) -> bool {
        request.generation == current
            && self
                .pending
                .is_some_and(|pending| pending.id == request.id && pending.generation == current)
    }

    pub(crate) fn succeed(&mut self, item_count: usize) {
        self.pending = None;
        self.phase = FetchPhase::Succeeded;
        self.has_more = item_count > 0;
    }

    pub(crate) fn fail(&mut self) {
        self.pending = None;
        self.phase = FetchPhase::Failed;
        self.error = true;
    }

    /// Forgets everything learned under the previous query.
    pub(crate) fn reset_for_new_query(&mut self) {
        self.error = false;
        self.has_more = false;
    }

    fn allocate_request_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1);
        id
    }
}
