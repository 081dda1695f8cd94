//! The rendering side of the controller: the snapshot published after each
//! state change and the trait that receives it.

use crate::query::Generation;
use serde::Serialize;

/// Everything a rendering surface needs to draw the current search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSnapshot {
    pub query: String,
    pub page: u32,
    pub generation: Generation,
    pub results: Vec<String>,
    pub loading: bool,
    pub error: bool,
    pub has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_hits: Option<u64>,
}

/// Receives a snapshot after every controller state change.
///
/// Called on the controller task, so implementations should hand the
/// snapshot off rather than block.
pub trait RenderSurface: Send + 'static {
    fn render(&mut self, snapshot: &SearchSnapshot);
}

impl<F> RenderSurface for F
where
    F: FnMut(&SearchSnapshot) + Send + 'static,
{
    fn render(&mut self, snapshot: &SearchSnapshot) {
        self(snapshot)
    }
}
