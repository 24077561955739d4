use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::autocomplete::AutocompleteOptions;
use crate::explorer::resize::DEFAULT_SIDEBAR_WIDTH;

pub const CONFIG_FILE: &str = "state-search.toml";

/// Configuration loaded from `state-search.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StateSearchConfig {
    pub autocomplete: AutocompleteConfig,
    pub inspector: InspectorConfig,
    pub store: StoreConfig,
}

/// `[autocomplete]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AutocompleteConfig {
    pub debounce_ms: u64,
    pub min_chars: usize,
    pub max_suggestions: usize,
    pub blur_delay_ms: u64,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        let defaults = AutocompleteOptions::default();
        Self {
            debounce_ms: defaults.debounce.as_millis() as u64,
            min_chars: defaults.min_chars,
            max_suggestions: defaults.max_suggestions,
            blur_delay_ms: defaults.blur_delay.as_millis() as u64,
        }
    }
}

impl AutocompleteConfig {
    pub fn to_options(&self) -> AutocompleteOptions {
        AutocompleteOptions {
            debounce: Duration::from_millis(self.debounce_ms),
            min_chars: self.min_chars,
            max_suggestions: self.max_suggestions,
            blur_delay: Duration::from_millis(self.blur_delay_ms),
        }
    }
}

/// `[inspector]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    pub initial_width: u32,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            initial_width: DEFAULT_SIDEBAR_WIDTH,
        }
    }
}

/// `[store]` section. Without a path the platform data directory is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: Option<PathBuf>,
}

impl StateSearchConfig {
    /// Load `state-search.toml` from the given directory.
    pub fn load(root: &Path) -> Self {
        Self::load_file(&root.join(CONFIG_FILE))
    }

    /// Load a specific config file.
    ///
    /// Returns the default configuration if the file does not exist or cannot be parsed.
    pub fn load_file(config_path: &Path) -> Self {
        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!(path = %config_path.display(), error = %err, "failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "failed to read config, using defaults");
                Self::default()
            }
        }
    }
}
