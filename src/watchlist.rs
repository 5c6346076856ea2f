use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{AppError, AppResult};
use crate::model::WatchlistEntry;

/// Storage slot holding the serialized watchlist.
pub const WATCHLIST_KEY: &str = "watchlist";

/// Synchronous string key-value storage.
pub trait Storage {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
}

/// One JSON file per key inside a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path(&self, key: &str) -> AppResult<PathBuf> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(AppError::Storage(format!("invalid storage key {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let path = self.path(key)?;
        std::fs::create_dir_all(&self.dir)?;
        // Write then rename so a crash never leaves a truncated blob
        let tmp = path.with_extension("json.part");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-process storage for tests and the `--ephemeral` flag.
#[derive(Default)]
pub struct MemoryStorage {
    slots: RefCell<HashMap<String, String>>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Saved movies, unique by id, in insertion order. Every operation reads
/// the whole blob back from storage and every mutation rewrites it.
pub struct Watchlist {
    storage: Box<dyn Storage>,
}

impl Watchlist {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self { storage }
    }

    /// All saved entries. A missing slot is an empty list; so is a corrupt
    /// one, which is logged and later overwritten by the next toggle.
    pub fn list(&self) -> Vec<WatchlistEntry> {
        let raw = match self.storage.get(WATCHLIST_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::error!(error = %e, "failed to read watchlist");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "watchlist blob is not valid JSON, treating as empty");
                Vec::new()
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.list().iter().any(|e| e.id == id)
    }

    /// Add `entry` if its id is absent, remove it otherwise. Returns whether
    /// the id is saved after the call.
    pub fn toggle(&self, entry: WatchlistEntry) -> AppResult<bool> {
        let mut entries = self.list();
        let now_saved = if let Some(pos) = entries.iter().position(|e| e.id == entry.id) {
            entries.remove(pos);
            false
        } else {
            entries.push(entry);
            true
        };

        let blob = serde_json::to_string(&entries)?;
        self.storage.set(WATCHLIST_KEY, &blob)?;
        tracing::info!(saved = now_saved, count = entries.len(), "watchlist updated");
        Ok(now_saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, title: &str) -> WatchlistEntry {
        WatchlistEntry {
            title: title.to_string(),
            year: "2008".to_string(),
            id: id.to_string(),
            poster: format!("https://image.tmdb.org/t/p/w1280/{}.jpg", id),
        }
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let watchlist = Watchlist::new(Box::new(MemoryStorage::default()));
        assert!(!watchlist.contains("155"));

        assert!(watchlist.toggle(entry("155", "The Dark Knight")).unwrap());
        assert!(watchlist.contains("155"));

        assert!(!watchlist.toggle(entry("155", "The Dark Knight")).unwrap());
        assert!(!watchlist.contains("155"));
        assert!(watchlist.list().is_empty());
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let watchlist = Watchlist::new(Box::new(MemoryStorage::default()));
        watchlist.toggle(entry("1", "First")).unwrap();
        watchlist.toggle(entry("2", "Second")).unwrap();
        watchlist.toggle(entry("3", "Third")).unwrap();
        watchlist.toggle(entry("2", "Second")).unwrap();

        let ids: Vec<String> = watchlist.list().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_toggle_matches_by_id_only() {
        let watchlist = Watchlist::new(Box::new(MemoryStorage::default()));
        watchlist.toggle(entry("7", "Original title")).unwrap();
        assert!(!watchlist.toggle(entry("7", "Renamed")).unwrap());
        assert!(watchlist.list().is_empty());
    }

    #[test]
    fn test_corrupt_blob_reads_as_empty() {
        let storage = MemoryStorage::default();
        storage.set(WATCHLIST_KEY, "[{broken").unwrap();
        let watchlist = Watchlist::new(Box::new(storage));
        assert!(watchlist.list().is_empty());
        assert!(watchlist.toggle(entry("1", "Recovered")).unwrap());
        assert_eq!(watchlist.list().len(), 1);
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let watchlist = Watchlist::new(Box::new(FileStorage::new(dir.path().to_path_buf())));
            watchlist.toggle(entry("42", "Hitchhiker")).unwrap();
        }
        let reopened = Watchlist::new(Box::new(FileStorage::new(dir.path().to_path_buf())));
        assert!(reopened.contains("42"));

        let raw = std::fs::read_to_string(dir.path().join("watchlist.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed[0]["title"], "Hitchhiker");
        assert_eq!(parsed[0]["id"], "42");
    }

    #[test]
    fn test_file_storage_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));
        assert_eq!(storage.get(WATCHLIST_KEY).unwrap(), None);
        assert!(storage.get("../escape").is_err());
    }
}
