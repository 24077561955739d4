use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use super::{AutocompleteOptions, SuggestionSessionState};
use crate::provider::SuggestionProvider;
use crate::request::{RequestGuard, RequestId};
use crate::store::RecentSearches;

/// Debounced suggestion fetching plus recent-search memory for one input.
///
/// Every keystroke issues a new request id. The debounce task sleeps, then
/// checks its id: a superseded timer never fetches, and a fetch whose id is
/// no longer current when it completes is dropped without touching state.
///
/// Must be driven from inside a tokio runtime.
pub struct SuggestionEngine {
    shared: Shared,
    recent: Arc<RecentSearches>,
    options: AutocompleteOptions,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

/// What a debounce task needs. Holds no reference back to the engine.
#[derive(Clone)]
struct Shared {
    provider: Arc<dyn SuggestionProvider>,
    state: Arc<Mutex<SuggestionSessionState>>,
    requests: RequestGuard,
}

impl SuggestionEngine {
    pub fn new(
        provider: Arc<dyn SuggestionProvider>,
        recent: Arc<RecentSearches>,
        options: AutocompleteOptions,
    ) -> Self {
        Self {
            shared: Shared {
                provider,
                state: Arc::new(Mutex::new(SuggestionSessionState::default())),
                requests: RequestGuard::new(),
            },
            recent,
            options,
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn options(&self) -> &AutocompleteOptions {
        &self.options
    }

    pub fn recent(&self) -> &Arc<RecentSearches> {
        &self.recent
    }

    /// A copy of the current session state.
    pub fn snapshot(&self) -> SuggestionSessionState {
        self.shared.state.lock().clone()
    }

    /// Mutate the session under its lock.
    pub(crate) fn update_state<R>(&self, f: impl FnOnce(&mut SuggestionSessionState) -> R) -> R {
        f(&mut *self.shared.state.lock())
    }

    /// React to new input text.
    ///
    /// Below `min_chars` the list is cleared and hidden at once and any
    /// pending work is invalidated. Otherwise the debounce timer restarts.
    pub fn update_suggestions(&self, input: &str) {
        if input.chars().count() < self.options.min_chars {
            self.invalidate_pending();
            self.shared.state.lock().clear();
            return;
        }

        let id = self.shared.requests.issue();
        tracing::debug!(request = id.get(), input = %input, "scheduling suggestion fetch");
        let task = tokio::spawn(debounced_fetch(
            self.shared.clone(),
            input.to_owned(),
            id,
            self.options.debounce,
            self.options.max_suggestions,
        ));

        let mut tasks = self.tasks.lock();
        tasks.retain(|t| !t.is_finished());
        tasks.push(task);
    }

    /// Show the recent searches without touching the network.
    pub fn show_default_suggestions(&self) {
        self.invalidate_pending();
        let recent = self.recent.list();
        let mut state = self.shared.state.lock();
        state.dropdown_visible = !recent.is_empty();
        state.suggestions = recent;
        state.selected_index = -1;
    }

    /// Remember `term` as the most recent search. Blank terms are ignored.
    pub fn add_to_recent_searches(&self, term: &str) -> Vec<String> {
        self.recent.add(term)
    }

    /// Record `value` in recent searches, close the dropdown, and hand the
    /// value back for the caller to adopt.
    pub fn select_suggestion(&self, value: &str) -> String {
        self.add_to_recent_searches(value);
        self.hide_dropdown();
        value.to_owned()
    }

    /// Close the dropdown. Pending fetches are invalidated so a late result
    /// cannot reopen it.
    pub fn hide_dropdown(&self) {
        self.invalidate_pending();
        self.shared.state.lock().hide();
    }

    /// Wait for every scheduled debounce/fetch task to finish.
    pub async fn settle(&self) {
        let tasks: Vec<JoinHandle<()>> = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            // A cancelled task has nothing left to report.
            let _ = task.await;
        }
    }

    /// Abort all pending work. Called on unmount and on drop.
    pub fn cancel(&self) {
        self.invalidate_pending();
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
    }

    fn invalidate_pending(&self) {
        self.shared.requests.invalidate();
        self.shared.state.lock().is_loading = false;
    }
}

impl Drop for SuggestionEngine {
    fn drop(&mut self) {
        for task in self.tasks.get_mut().drain(..) {
            task.abort();
        }
    }
}

impl std::fmt::Debug for SuggestionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionEngine")
            .field("options", &self.options)
            .field("state", &*self.shared.state.lock())
            .finish_non_exhaustive()
    }
}

async fn debounced_fetch(
    shared: Shared,
    input: String,
    id: RequestId,
    debounce: Duration,
    limit: usize,
) {
    tokio::time::sleep(debounce).await;
    if !shared.requests.is_current(id) {
        tracing::debug!(request = id.get(), "debounce timer superseded");
        return;
    }

    {
        let mut state = shared.state.lock();
        state.is_loading = true;
        state.error = None;
    }

    let result = shared.provider.suggest(&input, limit).await;

    if !shared.requests.is_current(id) {
        tracing::debug!(request = id.get(), input = %input, "discarding stale suggestions");
        return;
    }

    let mut state = shared.state.lock();
    state.is_loading = false;
    match result {
        Ok(mut suggestions) => {
            suggestions.truncate(limit);
            state.dropdown_visible = !suggestions.is_empty();
            state.suggestions = suggestions;
            state.selected_index = -1;
        }
        Err(e) => {
            tracing::warn!(input = %input, error = %e, "suggestion fetch failed");
            state.error = Some(e.to_string());
            state.clear();
        }
    }
}
