use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::graph::{GraphPayload, ViewMode};
use crate::provider::GraphProvider;
use crate::request::RequestGuard;

/// Shown after a fetch whose payload the server truncated.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SamplingNotice {
    pub focal: String,
    pub original_count: usize,
    pub sampled_count: usize,
}

impl SamplingNotice {
    pub fn message(&self) -> String {
        format!(
            "Large graph sampled: showing {} of {} nodes. {} is always included.",
            self.sampled_count, self.original_count, self.focal
        )
    }
}

/// What the graph page renders.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct GraphViewState {
    /// Entity of the graph on screen; unchanged by failed or stale fetches.
    pub focal: Option<String>,
    pub payload: GraphPayload,
    pub view_mode: ViewMode,
    pub is_loading: bool,
    pub notice: Option<SamplingNotice>,
    /// Bumped every time a fetch result replaces the payload.
    pub revision: u64,
}

/// Fetches one directional neighborhood at a time for a focal entity.
///
/// Each fetch takes a request id; a completion whose id is no longer the
/// latest is dropped, so the view always reflects the last requested mode
/// regardless of completion order.
pub struct GraphDataLoader {
    provider: Arc<dyn GraphProvider>,
    state: Mutex<GraphViewState>,
    requests: RequestGuard,
}

impl GraphDataLoader {
    pub fn new(provider: Arc<dyn GraphProvider>) -> Self {
        Self {
            provider,
            state: Mutex::new(GraphViewState::default()),
            requests: RequestGuard::new(),
        }
    }

    pub fn snapshot(&self) -> GraphViewState {
        self.state.lock().clone()
    }

    pub fn payload(&self) -> GraphPayload {
        self.state.lock().payload.clone()
    }

    pub fn revision(&self) -> u64 {
        self.state.lock().revision
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().is_loading
    }

    /// View-mode toggles are disabled while a fetch is in flight.
    pub fn toggle_enabled(&self) -> bool {
        let state = self.state.lock();
        !state.is_loading && state.focal.is_some()
    }

    /// Drives the "no dependency data" placeholder.
    pub fn is_empty(&self) -> bool {
        self.state.lock().payload.nodes.is_empty()
    }

    pub fn notice(&self) -> Option<SamplingNotice> {
        self.state.lock().notice.clone()
    }

    pub fn dismiss_notice(&self) {
        self.state.lock().notice = None;
    }

    /// Initial load for `focal`, in dependency mode.
    pub async fn mount(&self, focal: &str) -> Result<bool> {
        self.fetch(ViewMode::Dependency, focal).await
    }

    /// Refetch the current focal entity in the opposite mode. No-op while a
    /// fetch is in flight or before anything was mounted.
    pub async fn toggle_view(&self) -> Result<bool> {
        let (mode, focal) = {
            let state = self.state.lock();
            match (&state.focal, state.is_loading) {
                (Some(focal), false) => (state.view_mode.toggled(), focal.clone()),
                _ => return Ok(false),
            }
        };
        self.fetch(mode, &focal).await
    }

    /// Fetch the `mode` neighborhood of `focal` and replace the view with it.
    ///
    /// Returns `Ok(true)` when the result was applied and `Ok(false)` when a
    /// newer request superseded it. On failure the previous graph and mode
    /// stay on screen; the error is logged and returned to the caller.
    pub async fn fetch(&self, mode: ViewMode, focal: &str) -> Result<bool> {
        let id = self.requests.issue();
        self.state.lock().is_loading = true;
        tracing::debug!(request = id.get(), focal, mode = %mode, "fetching graph");

        let result = self.provider.fetch_graph(focal, mode).await;

        if !self.requests.is_current(id) {
            tracing::debug!(request = id.get(), focal, mode = %mode, "discarding stale graph");
            return Ok(false);
        }

        let mut state = self.state.lock();
        state.is_loading = false;
        match result {
            Ok(payload) => {
                state.notice = payload
                    .sampling_info
                    .filter(|info| info.was_sampled)
                    .map(|info| SamplingNotice {
                        focal: focal.to_owned(),
                        original_count: info.original_count,
                        sampled_count: info.sampled_count,
                    });
                tracing::debug!(
                    nodes = payload.nodes.len(),
                    edges = payload.edges.len(),
                    sampled = state.notice.is_some(),
                    "graph loaded"
                );
                state.payload = payload;
                state.focal = Some(focal.to_owned());
                state.view_mode = mode;
                state.revision += 1;
                Ok(true)
            }
            Err(e) => {
                tracing::error!(focal, mode = %mode, error = %e, "graph fetch failed");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for GraphDataLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("GraphDataLoader")
            .field("focal", &state.focal)
            .field("view_mode", &state.view_mode)
            .field("is_loading", &state.is_loading)
            .field("nodes", &state.payload.nodes.len())
            .finish_non_exhaustive()
    }
}
