use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::keyboard::{self, KeyOutcome, NavKey};
use super::{SuggestionEngine, SuggestionSessionState};
use crate::events::{ElementId, EventHub, PointerKind, Subscription};

/// Notifications for whoever owns the input's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutocompleteEvent {
    /// The input text changed (typing or adopting a suggestion).
    Changed(String),
    /// A search was requested with this term.
    Search(String),
}

/// Input-box behavior on top of a [`SuggestionEngine`].
///
/// Owns the local edit buffer, keeps it in sync with the externally owned
/// value, routes keys through the navigator, and holds a click-outside
/// listener for as long as it is mounted.
pub struct AutocompleteController {
    engine: Arc<SuggestionEngine>,
    input: ElementId,
    dropdown: ElementId,
    value: Mutex<String>,
    focused: Arc<AtomicBool>,
    disabled: AtomicBool,
    blur_task: Mutex<Option<JoinHandle<()>>>,
    click_outside: Mutex<Option<Subscription>>,
    events: mpsc::UnboundedSender<AutocompleteEvent>,
}

impl AutocompleteController {
    /// Mount an input on `hub` with the owner's current `value`.
    ///
    /// Returns the controller and the stream of owner notifications.
    pub fn mount(
        engine: Arc<SuggestionEngine>,
        hub: &EventHub,
        value: impl Into<String>,
    ) -> (Self, mpsc::UnboundedReceiver<AutocompleteEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let input = hub.element();
        let dropdown = hub.element();

        let outside_engine = Arc::clone(&engine);
        let click_outside = hub.listen(PointerKind::Down, move |event| {
            let inside = matches!(event.target, Some(t) if t == input || t == dropdown);
            if !inside {
                outside_engine.hide_dropdown();
            }
        });

        let controller = Self {
            engine,
            input,
            dropdown,
            value: Mutex::new(value.into()),
            focused: Arc::new(AtomicBool::new(false)),
            disabled: AtomicBool::new(false),
            blur_task: Mutex::new(None),
            click_outside: Mutex::new(Some(click_outside)),
            events: tx,
        };
        (controller, rx)
    }

    pub fn input_element(&self) -> ElementId {
        self.input
    }

    pub fn dropdown_element(&self) -> ElementId {
        self.dropdown
    }

    pub fn engine(&self) -> &Arc<SuggestionEngine> {
        &self.engine
    }

    pub fn value(&self) -> String {
        self.value.lock().clone()
    }

    pub fn state(&self) -> SuggestionSessionState {
        self.engine.snapshot()
    }

    pub fn is_focused(&self) -> bool {
        self.focused.load(Ordering::SeqCst)
    }

    pub fn is_mounted(&self) -> bool {
        self.click_outside.lock().is_some()
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::SeqCst);
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    /// The owner changed the value (navigation, reset); it overwrites local edits.
    pub fn sync_external(&self, value: &str) {
        *self.value.lock() = value.to_owned();
    }

    /// The user edited the text.
    pub fn on_input(&self, text: &str) {
        if self.is_disabled() {
            return;
        }
        *self.value.lock() = text.to_owned();
        self.emit(AutocompleteEvent::Changed(text.to_owned()));

        if text.trim().is_empty() {
            self.engine.hide_dropdown();
        } else {
            self.engine.update_suggestions(text);
        }
    }

    pub fn on_focus(&self) {
        self.focused.store(true, Ordering::SeqCst);
        if let Some(task) = self.blur_task.lock().take() {
            task.abort();
        }
        if self.value.lock().trim().is_empty() {
            self.engine.show_default_suggestions();
        }
    }

    /// Losing focus hides the dropdown only after the blur delay, so a click
    /// on a suggestion that caused the blur still lands.
    pub fn on_blur(&self) {
        let engine = Arc::clone(&self.engine);
        let focused = Arc::clone(&self.focused);
        let delay = self.engine.options().blur_delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            focused.store(false, Ordering::SeqCst);
            engine.hide_dropdown();
        });
        if let Some(previous) = self.blur_task.lock().replace(task) {
            previous.abort();
        }
    }

    /// Route a key press through the navigator and act on the outcome.
    pub fn on_key(&self, key: NavKey) -> KeyOutcome {
        if self.is_disabled() {
            return KeyOutcome::Ignored;
        }
        let (outcome, committed) = self.engine.update_state(|state| {
            let outcome = keyboard::apply(state, key);
            let committed = match outcome {
                KeyOutcome::Commit(i) => state.suggestions.get(i).cloned(),
                _ => None,
            };
            (outcome, committed)
        });

        match outcome {
            KeyOutcome::Commit(_) => {
                if let Some(value) = committed {
                    self.choose(&value);
                }
            }
            KeyOutcome::SearchRaw => {
                let term = self.value.lock().trim().to_owned();
                self.emit(AutocompleteEvent::Search(term));
            }
            KeyOutcome::Closed => self.engine.hide_dropdown(),
            KeyOutcome::Moved | KeyOutcome::Ignored => {}
        }
        outcome
    }

    /// A suggestion row was clicked.
    pub fn on_suggestion_click(&self, suggestion: &str) {
        self.choose(suggestion);
    }

    /// The search button was pressed.
    pub fn on_search_click(&self) {
        if !self.search_enabled() {
            return;
        }
        let term = self.value.lock().trim().to_owned();
        self.emit(AutocompleteEvent::Search(term));
    }

    /// Whether the search button is active.
    pub fn search_enabled(&self) -> bool {
        !self.is_disabled() && !self.value.lock().trim().is_empty()
    }

    /// Whether to render the "No matches found" row.
    pub fn show_no_matches(&self) -> bool {
        let state = self.engine.snapshot();
        state.dropdown_visible
            && state.suggestions.is_empty()
            && !state.is_loading
            && !self.value.lock().trim().is_empty()
    }

    /// Cancel pending timers and detach the click-outside listener.
    pub fn unmount(&self) {
        self.engine.cancel();
        if let Some(task) = self.blur_task.lock().take() {
            task.abort();
        }
        self.click_outside.lock().take();
    }

    fn choose(&self, suggestion: &str) {
        let selected = self.engine.select_suggestion(suggestion);
        *self.value.lock() = selected.clone();
        self.emit(AutocompleteEvent::Changed(selected.clone()));
        self.emit(AutocompleteEvent::Search(selected));
    }

    fn emit(&self, event: AutocompleteEvent) {
        // The owner may have gone away; its notifications have nowhere to go.
        let _ = self.events.send(event);
    }
}

impl Drop for AutocompleteController {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for AutocompleteController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutocompleteController")
            .field("value", &*self.value.lock())
            .field("focused", &self.is_focused())
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autocomplete::AutocompleteOptions;
    use crate::error::Result;
    use crate::events::PointerEvent;
    use crate::provider::SuggestionProvider;
    use crate::store::{MemoryStore, RecentSearches};
    use async_trait::async_trait;
    use std::time::Duration;

    struct NameList(Vec<&'static str>);

    #[async_trait]
    impl SuggestionProvider for NameList {
        async fn suggest(&self, text: &str, limit: usize) -> Result<Vec<String>> {
            let needle = text.to_lowercase();
            Ok(self
                .0
                .iter()
                .filter(|n| n.to_lowercase().contains(&needle))
                .take(limit)
                .map(|n| n.to_string())
                .collect())
        }
    }

    fn mounted(hub: &EventHub) -> (AutocompleteController, mpsc::UnboundedReceiver<AutocompleteEvent>) {
        let provider = Arc::new(NameList(vec!["Nat.Prime", "Nat.Prime.two_le", "Nat.succ"]));
        let recent = Arc::new(RecentSearches::new(Arc::new(MemoryStore::new())));
        let engine = Arc::new(SuggestionEngine::new(
            provider,
            recent,
            AutocompleteOptions::default(),
        ));
        AutocompleteController::mount(engine, hub, "")
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<AutocompleteEvent>) -> Vec<AutocompleteEvent> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_propagates_and_fetches() {
        let hub = EventHub::new();
        let (ac, mut rx) = mounted(&hub);
        ac.on_input("Nat.P");
        ac.engine().settle().await;

        assert_eq!(drain(&mut rx), vec![AutocompleteEvent::Changed("Nat.P".into())]);
        let state = ac.state();
        assert_eq!(state.suggestions, vec!["Nat.Prime", "Nat.Prime.two_le"]);
        assert!(state.dropdown_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_input_hides_dropdown() {
        let hub = EventHub::new();
        let (ac, _rx) = mounted(&hub);
        ac.on_input("Nat");
        ac.engine().settle().await;
        assert!(ac.state().dropdown_visible);

        ac.on_input("   ");
        assert!(!ac.state().dropdown_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_arrow_enter_commits_suggestion() {
        let hub = EventHub::new();
        let (ac, mut rx) = mounted(&hub);
        ac.on_input("Nat.P");
        ac.engine().settle().await;
        drain(&mut rx);

        assert_eq!(ac.on_key(NavKey::ArrowDown), KeyOutcome::Moved);
        assert_eq!(ac.on_key(NavKey::ArrowDown), KeyOutcome::Moved);
        assert_eq!(ac.on_key(NavKey::Enter), KeyOutcome::Commit(1));

        assert_eq!(ac.value(), "Nat.Prime.two_le");
        assert_eq!(
            drain(&mut rx),
            vec![
                AutocompleteEvent::Changed("Nat.Prime.two_le".into()),
                AutocompleteEvent::Search("Nat.Prime.two_le".into()),
            ]
        );
        assert!(!ac.state().dropdown_visible);
        assert_eq!(ac.engine().recent().list(), vec!["Nat.Prime.two_le"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_without_dropdown_searches_raw_text() {
        let hub = EventHub::new();
        let (ac, mut rx) = mounted(&hub);
        ac.sync_external("  Nat.Prime  ");
        assert_eq!(ac.on_key(NavKey::Enter), KeyOutcome::SearchRaw);
        assert_eq!(drain(&mut rx), vec![AutocompleteEvent::Search("Nat.Prime".into())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_escape_closes_dropdown() {
        let hub = EventHub::new();
        let (ac, _rx) = mounted(&hub);
        ac.on_input("Nat");
        ac.engine().settle().await;
        ac.on_key(NavKey::ArrowDown);
        assert_eq!(ac.on_key(NavKey::Escape), KeyOutcome::Closed);
        let state = ac.state();
        assert!(!state.dropdown_visible);
        assert_eq!(state.selected_index, -1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_with_empty_input_shows_recent() {
        let hub = EventHub::new();
        let (ac, _rx) = mounted(&hub);
        ac.engine().add_to_recent_searches("Nat.succ");
        ac.on_focus();
        let state = ac.state();
        assert!(ac.is_focused());
        assert_eq!(state.suggestions, vec!["Nat.succ"]);
        assert!(state.dropdown_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blur_hides_after_delay() {
        let hub = EventHub::new();
        let (ac, _rx) = mounted(&hub);
        ac.engine().add_to_recent_searches("Nat.succ");
        ac.on_focus();
        ac.on_blur();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(ac.state().dropdown_visible, "still open inside the blur window");
        ac.on_suggestion_click("Nat.succ");
        assert_eq!(ac.value(), "Nat.succ");

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(!ac.state().dropdown_visible);
        assert!(!ac.is_focused());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refocus_cancels_pending_blur() {
        let hub = EventHub::new();
        let (ac, _rx) = mounted(&hub);
        ac.engine().add_to_recent_searches("Nat.succ");
        ac.on_focus();
        ac.on_blur();
        tokio::time::sleep(Duration::from_millis(50)).await;
        ac.on_focus();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(ac.state().dropdown_visible);
        assert!(ac.is_focused());
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_outside_closes_but_inside_does_not() {
        let hub = EventHub::new();
        let (ac, _rx) = mounted(&hub);
        ac.on_input("Nat");
        ac.engine().settle().await;

        hub.dispatch(&PointerEvent::down(5.0, 5.0, Some(ac.dropdown_element())));
        assert!(ac.state().dropdown_visible);
        hub.dispatch(&PointerEvent::down(5.0, 5.0, Some(ac.input_element())));
        assert!(ac.state().dropdown_visible);

        hub.dispatch(&PointerEvent::down(900.0, 900.0, None));
        assert!(!ac.state().dropdown_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_listener_lives_only_while_mounted() {
        let hub = EventHub::new();
        let (ac, _rx) = mounted(&hub);
        assert_eq!(hub.listener_count(PointerKind::Down), 1);
        ac.unmount();
        assert_eq!(hub.listener_count(PointerKind::Down), 0);

        let (second, _rx2) = mounted(&hub);
        assert_eq!(hub.listener_count(PointerKind::Down), 1);
        drop(second);
        assert_eq!(hub.listener_count(PointerKind::Down), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_cancels_pending_debounce() {
        let hub = EventHub::new();
        let (ac, _rx) = mounted(&hub);
        ac.on_input("Nat");
        ac.unmount();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(ac.state().suggestions.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_external_value_overwrites_local() {
        let hub = EventHub::new();
        let (ac, _rx) = mounted(&hub);
        ac.on_input("Na");
        ac.sync_external("Nat.succ");
        assert_eq!(ac.value(), "Nat.succ");
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_button_requires_text() {
        let hub = EventHub::new();
        let (ac, mut rx) = mounted(&hub);
        assert!(!ac.search_enabled());
        ac.on_search_click();
        assert!(drain(&mut rx).is_empty());

        ac.sync_external(" Nat ");
        ac.on_search_click();
        assert_eq!(drain(&mut rx), vec![AutocompleteEvent::Search("Nat".into())]);

        ac.set_disabled(true);
        assert!(!ac.search_enabled());
        ac.on_input("ignored");
        assert_eq!(ac.value(), " Nat ");
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_matches_signal() {
        let hub = EventHub::new();
        let (ac, _rx) = mounted(&hub);
        ac.on_input("zzz");
        ac.engine().settle().await;
        assert!(!ac.show_no_matches(), "empty result hides the dropdown entirely");

        ac.engine().update_state(|s| s.dropdown_visible = true);
        assert!(ac.show_no_matches());
    }
}
