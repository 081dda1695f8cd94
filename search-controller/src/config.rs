use std::time::Duration;

use crate::debounce::DEFAULT_DEBOUNCE;

/// Upper bound for a single `fetch_page` call before it counts as failed.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Quiet period after the last input event before the query settles.
    pub debounce: Duration,
    /// `None` lets a fetch run for as long as the transport takes.
    pub request_timeout: Option<Duration>,
    /// Abort the task of a fetch whose query was replaced. Superseded
    /// responses are ignored either way.
    pub abort_superseded: bool,
    /// Query searched as soon as the controller starts.
    pub initial_query: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            abort_superseded: true,
            initial_query: String::new(),
        }
    }
}
