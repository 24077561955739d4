use thiserror::Error;

/// Errors surfaced by the explorer core and its local adapters.
///
/// None of these are fatal to a session: controllers translate them into an
/// inline message, a retained stale view, or a log line.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// A collaborator (suggestion or graph provider) failed transiently.
    #[error("provider error: {0}")]
    Provider(String),

    /// The focal entity does not exist in the graph.
    #[error("entity not found: {0}")]
    NotFound(String),

    /// The recent-search store could not be read or written.
    #[error("store error: {0}")]
    Store(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
