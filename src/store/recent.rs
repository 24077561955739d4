use std::sync::Arc;

use parking_lot::Mutex;

use super::RecentSearchStore;

/// Storage key for the recent-search list.
pub const RECENT_SEARCHES_KEY: &str = "stateSearch.recentSearches";
/// Maximum number of remembered searches.
pub const MAX_RECENT_SEARCHES: usize = 10;

/// Most-recent-first search memory shared by every autocomplete input.
///
/// The list is read from the store on first use and cached; every mutation is
/// written back immediately. Storage failures are logged and the feature
/// degrades to an empty (or unpersisted) list.
pub struct RecentSearches {
    store: Arc<dyn RecentSearchStore>,
    key: String,
    limit: usize,
    cache: Mutex<Option<Vec<String>>>,
}

impl RecentSearches {
    pub fn new(store: Arc<dyn RecentSearchStore>) -> Self {
        Self::with_key(store, RECENT_SEARCHES_KEY)
    }

    pub fn with_key(store: Arc<dyn RecentSearchStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            limit: MAX_RECENT_SEARCHES,
            cache: Mutex::new(None),
        }
    }

    /// Current list, most recent first.
    pub fn list(&self) -> Vec<String> {
        let mut cache = self.cache.lock();
        self.loaded(&mut cache).clone()
    }

    /// Record `term`: trimmed, deduplicated, prepended, truncated to the limit.
    /// Blank terms are ignored. Returns the updated list.
    pub fn add(&self, term: &str) -> Vec<String> {
        let trimmed = term.trim();
        let mut cache = self.cache.lock();
        let list = self.loaded(&mut cache);
        if trimmed.is_empty() {
            return list.clone();
        }

        list.retain(|item| item != trimmed);
        list.insert(0, trimmed.to_owned());
        list.truncate(self.limit);

        let snapshot = list.clone();
        self.persist(&snapshot);
        snapshot
    }

    /// Forget every remembered search.
    pub fn clear(&self) {
        let mut cache = self.cache.lock();
        *cache = Some(Vec::new());
        self.persist(&[]);
    }

    fn loaded<'a>(&self, cache: &'a mut Option<Vec<String>>) -> &'a mut Vec<String> {
        cache.get_or_insert_with(|| match self.store.get(&self.key) {
            Ok(Some(values)) => self.normalized(values),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to load recent searches");
                Vec::new()
            }
        })
    }

    /// Trim, drop blanks and later duplicates, cap at the limit.
    fn normalized(&self, values: Vec<String>) -> Vec<String> {
        let mut list: Vec<String> = Vec::with_capacity(self.limit);
        for value in values {
            let trimmed = value.trim();
            if trimmed.is_empty() || list.iter().any(|item| item == trimmed) {
                continue;
            }
            list.push(trimmed.to_owned());
            if list.len() == self.limit {
                break;
            }
        }
        list
    }

    fn persist(&self, values: &[String]) {
        if let Err(e) = self.store.set(&self.key, values) {
            tracing::warn!(key = %self.key, error = %e, "failed to save recent searches");
        }
    }
}

impl std::fmt::Debug for RecentSearches {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentSearches")
            .field("key", &self.key)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}
