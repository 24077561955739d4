pub mod file;
pub mod recent;

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::Result;

pub use file::FileStore;
pub use recent::{MAX_RECENT_SEARCHES, RECENT_SEARCHES_KEY, RecentSearches};

/// Keyed storage of ordered string lists, shared by every input in the process.
///
/// Implementations must tolerate concurrent callers; the last writer for a
/// key wins and no multi-key transactions are offered.
pub trait RecentSearchStore: Send + Sync {
    /// Read the list stored under `key`. `Ok(None)` when nothing was stored.
    fn get(&self, key: &str) -> Result<Option<Vec<String>>>;

    /// Replace the list stored under `key`.
    fn set(&self, key: &str, values: &[String]) -> Result<()>;
}

/// In-memory store. Used by tests and by sessions that should not persist.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with one key.
    pub fn with_entry(key: &str, values: Vec<String>) -> Self {
        let store = Self::new();
        store.entries.write().insert(key.to_owned(), values);
        store
    }
}

impl RecentSearchStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<String>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, values: &[String]) -> Result<()> {
        self.entries.write().insert(key.to_owned(), values.to_vec());
        Ok(())
    }
}
