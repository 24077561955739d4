//! Collaborator seams: where suggestion candidates and graph neighborhoods come from.
//!
//! The remote search service is consumed through these traits; `LocalGraph`
//! serves both from a JSON graph export.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::graph::{GraphPayload, ViewMode};

pub use local::LocalGraph;

/// Produces candidate declaration names for partially typed input.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// At most `limit` candidate names for `text`, in the order they should be shown.
    async fn suggest(&self, text: &str, limit: usize) -> Result<Vec<String>>;
}

/// Produces the one-hop neighborhood of a focal entity.
#[async_trait]
pub trait GraphProvider: Send + Sync {
    /// Nodes and edges around `focal` in `direction`. A sampled response
    /// carries `sampling_info` and always includes the focal node.
    async fn fetch_graph(&self, focal: &str, direction: ViewMode) -> Result<GraphPayload>;
}
