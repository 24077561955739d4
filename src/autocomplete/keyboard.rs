use super::SuggestionSessionState;

/// Keys the navigator reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    /// Anything else; passes through untouched.
    Other,
}

impl NavKey {
    /// Map a DOM-style key name (`"ArrowDown"`, `"Enter"`, ...).
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "ArrowDown" | "Down" => NavKey::ArrowDown,
            "ArrowUp" | "Up" => NavKey::ArrowUp,
            "Enter" => NavKey::Enter,
            "Escape" | "Esc" => NavKey::Escape,
            _ => NavKey::Other,
        }
    }
}

/// The part of the session the navigator reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavState {
    pub selected_index: isize,
    pub dropdown_visible: bool,
}

/// What the caller should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The highlight moved (or stayed clamped at an end).
    Moved,
    /// Commit the suggestion at this index.
    Commit(usize),
    /// No dropdown is showing: search with the raw input text.
    SearchRaw,
    /// The dropdown was closed.
    Closed,
    /// Nothing to do.
    Ignored,
}

/// Pure transition over `(state, suggestion count)`.
pub fn transition(state: NavState, key: NavKey, count: usize) -> (NavState, KeyOutcome) {
    let last = count as isize - 1;
    match key {
        NavKey::ArrowDown => (
            NavState {
                selected_index: (state.selected_index + 1).min(last).max(-1),
                ..state
            },
            KeyOutcome::Moved,
        ),
        NavKey::ArrowUp => (
            NavState {
                selected_index: (state.selected_index - 1).max(-1),
                ..state
            },
            KeyOutcome::Moved,
        ),
        NavKey::Enter if !state.dropdown_visible => (state, KeyOutcome::SearchRaw),
        NavKey::Enter => match usize::try_from(state.selected_index) {
            Ok(i) if i < count => (state, KeyOutcome::Commit(i)),
            _ => (state, KeyOutcome::Ignored),
        },
        NavKey::Escape => (
            NavState {
                selected_index: -1,
                dropdown_visible: false,
            },
            KeyOutcome::Closed,
        ),
        NavKey::Other => (state, KeyOutcome::Ignored),
    }
}

/// Apply `key` to a live session in place.
pub fn apply(session: &mut SuggestionSessionState, key: NavKey) -> KeyOutcome {
    let current = NavState {
        selected_index: session.selected_index,
        dropdown_visible: session.dropdown_visible,
    };
    let (next, outcome) = transition(current, key, session.suggestions.len());
    session.selected_index = next.selected_index;
    session.dropdown_visible = next.dropdown_visible;
    outcome
}
