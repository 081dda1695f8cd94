//! Current query, page index and the generation token derived from them.

use serde::Serialize;
use std::fmt;

/// Monotonic counter bumped on every query change.
///
/// Every fetch captures the generation it was issued under; a completion whose
/// generation no longer matches the current one is stale and must not touch
/// controller state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub const FIRST_PAGE: u32 = 1;

#[derive(Debug, Clone)]
pub struct QueryState {
    query: String,
    page: u32,
    generation: Generation,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryState {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            page: FIRST_PAGE,
            generation: Generation::default(),
        }
    }

    /// Starts on `query` as generation zero.
    pub fn with_query(query: &str) -> Self {
        Self {
            query: query.to_string(),
            ..Self::new()
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Replaces the query, returning `false` when `value` equals the current
    /// query. A real change resets the page to 1 and starts a new generation.
    pub fn set_query(&mut self, value: &str) -> bool {
        if self.query == value {
            return false;
        }
        self.query.clear();
        self.query.push_str(value);
        self.page = FIRST_PAGE;
        self.generation = self.generation.next();
        true
    }

    /// Moves to the next page. Callers gate this on the fetch status.
    pub(crate) fn advance_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_on_first_page_with_empty_query() {
        let state = QueryState::new();
        assert_eq!(state.query(), "");
        assert_eq!(state.page(), FIRST_PAGE);
        assert_eq!(state.generation(), Generation::default());
    }

    #[test]
    fn with_query_does_not_start_a_new_generation() {
        let state = QueryState::with_query("dune");
        assert_eq!(state.query(), "dune");
        assert_eq!(state.generation(), Generation::default());
    }

    #[test]
    fn set_query_resets_page_and_bumps_generation() {
        let mut state = QueryState::new();
        state.advance_page();
        state.advance_page();
        assert_eq!(state.page(), 3);

        assert!(state.set_query("dune"));
        assert_eq!(state.query(), "dune");
        assert_eq!(state.page(), FIRST_PAGE);
        assert_eq!(state.generation().value(), 1);
    }

    #[test]
    fn setting_the_same_query_is_a_no_op() {
        let mut state = QueryState::new();
        assert!(state.set_query("dune"));
        state.advance_page();

        assert!(!state.set_query("dune"));
        assert_eq!(state.page(), 2);
        assert_eq!(state.generation().value(), 1);
    }

    #[test]
    fn generations_are_monotonic() {
        let mut state = QueryState::new();
        let mut last = state.generation();
        for query in ["a", "ab", "a", ""] {
            assert!(state.set_query(query));
            assert!(state.generation() > last);
            last = state.generation();
        }
    }
}
