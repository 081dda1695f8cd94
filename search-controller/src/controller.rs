//! The search controller actor.
//!
//! [`SearchController::spawn`] moves all search state onto a single tokio task
//! and returns a [`SearchHandle`]. Settled input, page completions, visibility
//! notifications and retries all arrive on one channel and are applied in
//! order, so state is never mutated concurrently. Fetches run as separate
//! tasks and report back through the same channel.

use std::sync::Arc;

use scrollsearch_client::SearchPage;
use scrollsearch_client::SearchTransport;
use scrollsearch_client::TransportError;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::config::ControllerConfig;
use crate::debounce::Debouncer;
use crate::fetch::FetchRequest;
use crate::state::PageOutcome;
use crate::state::SearchState;
use crate::surface::RenderSurface;
use crate::visibility::ObservedItem;
use crate::visibility::VisibilitySource;
use crate::visibility::VisibilityTrigger;

#[derive(Debug)]
pub(crate) enum ControllerEvent {
    QuerySettled(String),
    PageLoaded {
        request: FetchRequest,
        result: Result<SearchPage, TransportError>,
    },
    LastItemVisible(ObservedItem),
    Retry,
}

/// Input side of a running controller. Dropping it stops the controller.
pub struct SearchHandle {
    debouncer: Debouncer<String>,
    events_tx: mpsc::UnboundedSender<ControllerEvent>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SearchHandle {
    /// Reports a raw change of the search input. The query only changes once
    /// input has been quiet for the configured debounce interval.
    pub fn input(&self, text: impl Into<String>) {
        self.debouncer.notify(text.into());
    }

    /// Re-attempts the failed fetch, if the last one failed.
    pub fn retry(&self) {
        let _ = self.events_tx.send(ControllerEvent::Retry);
    }

    /// Stops the controller and waits for it to release its collaborators.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SearchHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

pub struct SearchController<V, R> {
    config: ControllerConfig,
    transport: Arc<dyn SearchTransport>,
    state: SearchState,
    trigger: VisibilityTrigger<V>,
    surface: R,
    events_tx: mpsc::UnboundedSender<ControllerEvent>,
    events_rx: mpsc::UnboundedReceiver<ControllerEvent>,
    in_flight: Option<AbortHandle>,
    cancel: CancellationToken,
}

impl<V, R> SearchController<V, R>
where
    V: VisibilitySource,
    R: RenderSurface,
{
    /// Starts a controller on the current tokio runtime. The initial query is
    /// fetched immediately, even when it is empty.
    pub fn spawn(
        config: ControllerConfig,
        transport: Arc<dyn SearchTransport>,
        visibility: V,
        surface: R,
    ) -> SearchHandle {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let settled_tx = events_tx.clone();
        let debouncer = Debouncer::new(config.debounce, move |query: String| {
            let _ = settled_tx.send(ControllerEvent::QuerySettled(query));
        });

        let controller = Self {
            state: SearchState::with_query(&config.initial_query),
            config,
            transport,
            trigger: VisibilityTrigger::new(visibility, events_tx.clone()),
            surface,
            events_tx: events_tx.clone(),
            events_rx,
            in_flight: None,
            cancel: cancel.clone(),
        };
        let task = tokio::spawn(controller.run());

        SearchHandle {
            debouncer,
            events_tx,
            cancel,
            task: Some(task),
        }
    }

    async fn run(mut self) {
        let request = self.state.start();
        self.issue(request);
        self.publish();

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                event = self.events_rx.recv() => {
                    let Some(event) = event else {
                        break;
                    };
                    self.handle_event(event);
                }
            }
        }

        if let Some(in_flight) = self.in_flight.take() {
            in_flight.abort();
        }
        self.trigger.release();
        debug!("search controller stopped");
    }

    fn handle_event(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::QuerySettled(query) => {
                let Some(request) = self.state.set_query(&query) else {
                    return;
                };
                self.issue(request);
                self.publish();
            }
            ControllerEvent::PageLoaded { request, result } => {
                self.handle_page_loaded(request, result);
            }
            ControllerEvent::LastItemVisible(target) => {
                if !self.trigger.is_bound_to(&target) {
                    trace!(title = %target.title, "ignoring visibility of unbound item");
                    return;
                }
                let Some(request) = self.state.advance_page() else {
                    return;
                };
                self.issue(request);
                self.publish();
            }
            ControllerEvent::Retry => {
                let Some(request) = self.state.retry() else {
                    return;
                };
                self.issue(request);
                self.publish();
            }
        }
    }

    fn handle_page_loaded(
        &mut self,
        request: FetchRequest,
        result: Result<SearchPage, TransportError>,
    ) {
        match self.state.complete(&request, result) {
            PageOutcome::Stale => {
                trace!(
                    query = %request.query,
                    page = request.page,
                    generation = %request.generation,
                    current_generation = %self.state.generation(),
                    "discarding stale search response"
                );
                return;
            }
            PageOutcome::Applied { appended, page_len } => {
                debug!(
                    query = %request.query,
                    page = request.page,
                    page_len,
                    appended,
                    total = self.state.results().len(),
                    "merged search page"
                );
            }
            PageOutcome::Failed(err) => {
                warn!(
                    query = %request.query,
                    page = request.page,
                    "search fetch failed: {err}"
                );
            }
        }
        self.in_flight = None;
        self.publish();
    }

    fn issue(&mut self, request: FetchRequest) {
        if let Some(previous) = self.in_flight.take()
            && self.config.abort_superseded
        {
            previous.abort();
        }

        debug!(
            query = %request.query,
            page = request.page,
            generation = %request.generation,
            "issuing search fetch"
        );

        let transport = Arc::clone(&self.transport);
        let events_tx = self.events_tx.clone();
        let timeout = self.config.request_timeout;
        let task = tokio::spawn(async move {
            let fetch = transport.fetch_page(&request.query, request.page);
            let result = match timeout {
                Some(timeout) => tokio::time::timeout(timeout, fetch)
                    .await
                    .unwrap_or_else(|_| Err(TransportError::Timeout)),
                None => fetch.await,
            };
            let _ = events_tx.send(ControllerEvent::PageLoaded { request, result });
        });
        self.in_flight = Some(task.abort_handle());
    }

    /// Moves the visibility observation to the current last item, then hands
    /// the new state to the surface. A surface that sees a finished page can
    /// rely on its last item already being observed.
    fn publish(&mut self) {
        self.trigger.sync(
            self.state.generation(),
            self.state.results(),
            self.state.status().is_loading(),
        );
        self.surface.render(&self.state.snapshot());
    }
}
