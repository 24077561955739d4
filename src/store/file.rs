use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::RecentSearchStore;
use crate::error::{ExplorerError, Result};

/// Directory name created under the platform data dir.
pub const STORE_DIR: &str = "state-search";
/// Default store file name within STORE_DIR.
pub const STORE_FILE: &str = "recent.json";

/// Default store location: `<data_dir>/state-search/recent.json`, falling
/// back to the working directory when the platform has no data dir.
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(STORE_DIR)
        .join(STORE_FILE)
}

/// JSON-file store: a single object mapping keys to string arrays.
///
/// Writes go to a temp file in the same directory and are renamed into
/// place, so a crash never leaves a half-written file behind.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole document. A missing file is an empty document.
    fn load(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            ExplorerError::Store(format!("failed to parse {}: {}", self.path.display(), e))
        })
    }

    fn save(&self, doc: &BTreeMap<String, serde_json::Value>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, doc)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| ExplorerError::Io(e.error))?;
        Ok(())
    }
}

impl RecentSearchStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<String>>> {
        let doc = self.load()?;
        let Some(value) = doc.get(key) else {
            return Ok(None);
        };
        // Anything other than an array reads as empty; non-string entries are dropped.
        let values = match value {
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
            _ => Vec::new(),
        };
        Ok(Some(values))
    }

    fn set(&self, key: &str, values: &[String]) -> Result<()> {
        let _guard = self.write_lock.lock();
        // A corrupt document is replaced rather than blocking every future write.
        let mut doc = self.load().unwrap_or_default();
        doc.insert(key.to_owned(), serde_json::json!(values));
        self.save(&doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("recent.json");
        let store = FileStore::new(&path);

        store.set("a", &["x".to_owned(), "y".to_owned()]).unwrap();
        store.set("b", &["z".to_owned()]).unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("a").unwrap(), Some(vec!["x".to_owned(), "y".to_owned()]));
        assert_eq!(reopened.get("b").unwrap(), Some(vec!["z".to_owned()]));
        assert_eq!(reopened.get("c").unwrap(), None);
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("none.json"));
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_non_array_value_reads_as_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recent.json");
        std::fs::write(&path, r#"{"a": "not-a-list", "b": ["ok", 3]}"#).unwrap();
        let store = FileStore::new(&path);
        assert_eq!(store.get("a").unwrap(), Some(Vec::new()));
        assert_eq!(store.get("b").unwrap(), Some(vec!["ok".to_owned()]));
    }

    #[test]
    fn test_corrupt_file_is_a_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recent.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = FileStore::new(&path);
        assert!(matches!(store.get("a"), Err(ExplorerError::Store(_))));

        // Writing recovers the file.
        store.set("a", &["fresh".to_owned()]).unwrap();
        assert_eq!(store.get("a").unwrap(), Some(vec!["fresh".to_owned()]));
    }
}
