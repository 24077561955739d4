pub mod controller;
pub mod engine;
pub mod keyboard;

use std::time::Duration;

pub use controller::{AutocompleteController, AutocompleteEvent};
pub use engine::SuggestionEngine;
pub use keyboard::{KeyOutcome, NavKey, NavState};

/// Tuning knobs for one autocomplete input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutocompleteOptions {
    /// Quiet period after the last keystroke before fetching.
    pub debounce: Duration,
    /// Inputs shorter than this (in characters) never fetch.
    pub min_chars: usize,
    /// Upper bound passed to the provider and applied to its answer.
    pub max_suggestions: usize,
    /// Delay between losing focus and hiding the dropdown, so a click on a
    /// suggestion lands before the dropdown disappears.
    pub blur_delay: Duration,
}

impl Default for AutocompleteOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_chars: 2,
            max_suggestions: 10,
            blur_delay: Duration::from_millis(150),
        }
    }
}

/// Observable state of one suggestion session.
///
/// `selected_index` is -1 when nothing is highlighted and always below
/// `suggestions.len()` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SuggestionSessionState {
    pub suggestions: Vec<String>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub dropdown_visible: bool,
    pub selected_index: isize,
}

impl Default for SuggestionSessionState {
    fn default() -> Self {
        Self {
            suggestions: Vec::new(),
            is_loading: false,
            error: None,
            dropdown_visible: false,
            selected_index: -1,
        }
    }
}

impl SuggestionSessionState {
    /// The highlighted suggestion, if any.
    pub fn selected(&self) -> Option<&str> {
        usize::try_from(self.selected_index)
            .ok()
            .and_then(|i| self.suggestions.get(i))
            .map(String::as_str)
    }

    pub(crate) fn clear(&mut self) {
        self.suggestions.clear();
        self.dropdown_visible = false;
        self.selected_index = -1;
    }

    pub(crate) fn hide(&mut self) {
        self.dropdown_visible = false;
        self.selected_index = -1;
    }
}
