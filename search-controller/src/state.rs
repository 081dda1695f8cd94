//! The synchronous search state machine.
//!
//! [`SearchState`] composes the query/page state, the accumulated results and
//! the fetch status. Every operation returns the [`FetchRequest`] to issue, if
//! any, so the caller decides how requests actually run.

use scrollsearch_client::SearchPage;
use scrollsearch_client::TransportError;

use crate::fetch::FetchRequest;
use crate::fetch::FetchStatus;
use crate::query::Generation;
use crate::query::QueryState;
use crate::results::ResultSet;
use crate::surface::SearchSnapshot;

/// What applying a completed fetch did.
#[derive(Debug)]
pub enum PageOutcome {
    /// The page was merged; `appended` titles were new.
    Applied { appended: usize, page_len: usize },
    /// The fetch failed for the current generation.
    Failed(TransportError),
    /// The fetch was superseded and left no trace.
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: QueryState,
    results: ResultSet,
    status: FetchStatus,
    total_hits: Option<u64>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `query` already in place, without a generation bump.
    pub fn with_query(query: &str) -> Self {
        Self {
            query: QueryState::with_query(query),
            ..Self::default()
        }
    }

    /// Issues the first fetch for whatever query the state holds, including
    /// the empty query.
    pub fn start(&mut self) -> FetchRequest {
        self.status.begin(&self.query)
    }

    pub fn query(&self) -> &str {
        self.query.query()
    }

    pub fn page(&self) -> u32 {
        self.query.page()
    }

    pub fn generation(&self) -> Generation {
        self.query.generation()
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    /// Switches to `value`. A different query resets the page, starts a new
    /// generation, clears results and the error flag, and fetches page 1.
    pub fn set_query(&mut self, value: &str) -> Option<FetchRequest> {
        if !self.query.set_query(value) {
            return None;
        }
        self.results.clear();
        self.total_hits = None;
        self.status.reset_for_new_query();
        Some(self.status.begin(&self.query))
    }

    /// Moves to the next page when more pages may exist and nothing is
    /// loading; otherwise does nothing. A failed page is not re-requested
    /// here, [`SearchState::retry`] does that.
    pub fn advance_page(&mut self) -> Option<FetchRequest> {
        if !self.status.can_advance() {
            return None;
        }
        self.query.advance_page();
        Some(self.status.begin(&self.query))
    }

    /// Re-issues the fetch for the current page after a failure.
    pub fn retry(&mut self) -> Option<FetchRequest> {
        if !self.status.has_error() || self.status.is_loading() {
            return None;
        }
        Some(self.status.begin(&self.query))
    }

    /// Applies the completion of `request`. Completions from an older
    /// generation, or of a request that is no longer pending, are dropped.
    pub fn complete(
        &mut self,
        request: &FetchRequest,
        result: Result<SearchPage, TransportError>,
    ) -> PageOutcome {
        if !self.status.is_current(request, self.query.generation()) {
            return PageOutcome::Stale;
        }
        match result {
            Ok(page) => {
                let page_len = page.items.len();
                if page.total_hits.is_some() {
                    self.total_hits = page.total_hits;
                }
                let appended = self.results.merge(page.items);
                self.status.succeed(page_len);
                PageOutcome::Applied { appended, page_len }
            }
            Err(err) => {
                self.status.fail();
                PageOutcome::Failed(err)
            }
        }
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            query: self.query.query().to_string(),
            page: self.query.page(),
            generation: self.query.generation(),
            results: self.results.items().to_vec(),
            loading: self.status.is_loading(),
            error: self.status.has_error(),
            has_more: self.status.has_more(),
            total_hits: self.total_hits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchPhase;
    use pretty_assertions::assert_eq;

    fn page_of(titles: &[&str]) -> SearchPage {
        SearchPage::new(titles.iter().map(|t| (*t).to_string()).collect())
    }

    fn numbered_page(prefix: &str, count: usize) -> SearchPage {
        SearchPage::new((0..count).map(|i| format!("{prefix} {i}")).collect())
    }

    #[test]
    fn start_fetches_the_empty_query() {
        let mut state = SearchState::new();
        let request = state.start();

        assert_eq!(request.query, "");
        assert_eq!(request.page, 1);
        assert!(state.status().is_loading());
    }

    #[test]
    fn set_query_clears_results_and_resets_page() {
        let mut state = SearchState::new();
        let request = state.start();
        state.complete(&request, Ok(numbered_page("Book", 20)));
        let request = state.advance_page().expect("second page");
        state.complete(&request, Ok(numbered_page("More", 5)));
        assert_eq!(state.page(), 2);

        for query in ["d", "du", "dune", ""] {
            let request = state.set_query(query).expect("query changed");
            assert!(state.results().is_empty());
            assert_eq!(state.page(), 1);
            assert_eq!(request.page, 1);
            assert_eq!(request.query, query);
        }
    }

    #[test]
    fn same_query_does_not_refetch() {
        let mut state = SearchState::with_query("dune");
        let request = state.start();
        state.complete(&request, Ok(page_of(&["Dune"])));

        assert!(state.set_query("dune").is_none());
        assert_eq!(state.results().len(), 1);
        assert_eq!(state.status().phase(), FetchPhase::Succeeded);
    }

    #[test]
    fn merges_pages_without_duplicates() {
        let mut state = SearchState::new();
        let request = state.start();
        state.complete(&request, Ok(page_of(&["Dune", "Emma", "Ulysses"])));
        let request = state.advance_page().expect("more pages");
        let outcome = state.complete(&request, Ok(page_of(&["Emma", "Beloved", "Dune"])));

        assert!(matches!(
            outcome,
            PageOutcome::Applied {
                appended: 1,
                page_len: 3
            }
        ));
        assert_eq!(
            state.snapshot().results,
            vec![
                "Dune".to_string(),
                "Emma".to_string(),
                "Ulysses".to_string(),
                "Beloved".to_string(),
            ]
        );
    }

    #[test]
    fn stale_generation_response_is_discarded() {
        let mut state = SearchState::new();
        let dune = state.set_query("dune").expect("changed");
        let herbert = state.set_query("herbert").expect("changed");

        let before = state.snapshot();
        let outcome = state.complete(&dune, Ok(page_of(&["Dune"])));
        assert!(matches!(outcome, PageOutcome::Stale));
        assert_eq!(state.snapshot(), before);

        let outcome = state.complete(&herbert, Ok(page_of(&["Frank Herbert"])));
        assert!(matches!(outcome, PageOutcome::Applied { .. }));
        assert_eq!(state.snapshot().results, vec!["Frank Herbert".to_string()]);
    }

    #[test]
    fn stale_generation_error_is_discarded() {
        let mut state = SearchState::new();
        let old = state.set_query("x").expect("changed");
        state.set_query("y").expect("changed");

        let before = state.snapshot();
        let outcome = state.complete(&old, Err(TransportError::Timeout));
        assert!(matches!(outcome, PageOutcome::Stale));
        assert_eq!(state.snapshot(), before);
        assert!(!state.status().has_error());
    }

    #[test]
    fn late_duplicate_completion_is_discarded() {
        let mut state = SearchState::new();
        let request = state.start();
        state.complete(&request, Ok(page_of(&["Dune"])));

        let outcome = state.complete(&request, Ok(page_of(&["Emma"])));
        assert!(matches!(outcome, PageOutcome::Stale));
        assert_eq!(state.results().len(), 1);
    }

    #[test]
    fn advance_page_is_a_no_op_while_loading_or_exhausted() {
        let mut state = SearchState::new();
        let request = state.start();
        assert!(state.advance_page().is_none(), "loading");
        assert_eq!(state.page(), 1);

        state.complete(&request, Ok(numbered_page("Book", 20)));
        let request = state.advance_page().expect("has more");
        assert!(state.advance_page().is_none(), "second advance while loading");
        assert_eq!(state.page(), 2);

        state.complete(&request, Ok(SearchPage::default()));
        assert!(!state.status().has_more());
        assert!(state.advance_page().is_none(), "exhausted");
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn failure_keeps_prior_results() {
        let mut state = SearchState::new();
        let request = state.start();
        state.complete(&request, Ok(page_of(&["Dune", "Emma"])));
        let request = state.advance_page().expect("has more");

        let outcome = state.complete(&request, Err(TransportError::Network("reset".into())));
        assert!(matches!(outcome, PageOutcome::Failed(_)));

        let snapshot = state.snapshot();
        assert!(snapshot.error);
        assert!(!snapshot.loading);
        assert!(snapshot.has_more);
        assert_eq!(
            snapshot.results,
            vec!["Dune".to_string(), "Emma".to_string()]
        );
    }

    #[test]
    fn advancing_after_a_failed_page_moves_to_the_next_page() {
        let mut state = SearchState::new();
        let request = state.start();
        state.complete(&request, Ok(numbered_page("Book", 20)));
        let failed = state.advance_page().expect("has more");
        state.complete(&failed, Err(TransportError::Timeout));
        assert!(state.status().has_more(), "a failure keeps has_more");

        let next = state.advance_page().expect("advance after failure");
        assert_eq!(next.page, 3);
        assert_eq!(state.page(), 3);
        assert!(!state.status().has_error());
        assert_eq!(state.results().len(), 20);
    }

    #[test]
    fn new_query_after_failure_clears_error() {
        let mut state = SearchState::new();
        let request = state.set_query("x").expect("changed");
        state.complete(&request, Err(TransportError::Timeout));
        assert!(state.status().has_error());

        let request = state.set_query("y").expect("changed");
        assert!(!state.status().has_error());
        assert!(state.status().is_loading());
        assert_eq!(request.query, "y");
    }

    #[test]
    fn retry_reissues_the_failed_page() {
        let mut state = SearchState::new();
        assert!(state.retry().is_none(), "nothing failed yet");

        let request = state.start();
        state.complete(&request, Ok(numbered_page("Book", 3)));
        let failed = state.advance_page().expect("has more");
        state.complete(&failed, Err(TransportError::Timeout));

        let retry = state.retry().expect("retry after failure");
        assert_eq!(retry.page, failed.page);
        assert_eq!(retry.generation, failed.generation);
        assert_ne!(retry.id, failed.id);
        assert!(state.retry().is_none(), "already loading");

        assert!(matches!(
            state.complete(&failed, Ok(numbered_page("Late", 2))),
            PageOutcome::Stale
        ));
        assert!(matches!(
            state.complete(&retry, Ok(numbered_page("Retry", 2))),
            PageOutcome::Applied { appended: 2, .. }
        ));
        assert!(!state.status().has_error());
    }

    #[test]
    fn total_hits_follow_the_current_generation() {
        let mut state = SearchState::new();
        let request = state.start();
        let mut page = page_of(&["Dune"]);
        page.total_hits = Some(120);
        state.complete(&request, Ok(page));
        assert_eq!(state.snapshot().total_hits, Some(120));

        state.set_query("emma");
        assert_eq!(state.snapshot().total_hits, None);
    }
}
