//! Incremental, paginated search controller.
//!
//! The controller turns debounced query input into page fetches against a
//! [`SearchTransport`](scrollsearch_client::SearchTransport), accumulates
//! de-duplicated results, and loads the next page when the last rendered item
//! becomes visible. Responses issued under an older query are recognised by
//! their [`Generation`] and dropped.

mod config;
mod controller;
mod debounce;
mod fetch;
mod query;
mod results;
mod state;
mod surface;
mod visibility;

pub use config::ControllerConfig;
pub use config::DEFAULT_REQUEST_TIMEOUT;
pub use controller::SearchController;
pub use controller::SearchHandle;
pub use debounce::DEFAULT_DEBOUNCE;
pub use debounce::Debouncer;
pub use fetch::FetchPhase;
pub use fetch::FetchRequest;
pub use fetch::FetchStatus;
pub use query::FIRST_PAGE;
pub use query::Generation;
pub use query::QueryState;
pub use results::ResultSet;
pub use state::PageOutcome;
pub use state::SearchState;
pub use surface::RenderSurface;
pub use surface::SearchSnapshot;
pub use visibility::ObservedItem;
pub use visibility::VisibilityNotifier;
pub use visibility::VisibilitySource;
