//! Headless query-composition core for a theorem state search browser:
//! debounced autocomplete with recent-search memory, and a dependency-graph
//! explorer with sampling notices, exclusive selection and a resizable
//! inspector.

pub mod autocomplete;
pub mod config;
pub mod error;
pub mod events;
pub mod explorer;
pub mod graph;
pub mod provider;
pub mod request;
pub mod store;

pub use error::{ExplorerError, Result};
