//! Key-value stores backing persisted values.
//!
//! Two collaborators are provided: [`MemoryStore`] for session-only state
//! and tests, and [`FileStore`] for preferences that survive restarts.
//! Anything else can participate by implementing [`PersistentStore`].

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::error;

/// File name used by [`FileStore::open`] inside the application directory.
const PREFS_FILENAME: &str = "prefs.json";

/// A key-value persistence service.
///
/// The store owns durability and its failure modes; wrappers own typing and
/// defaults. `set_value(key, None)` removes the entry outright instead of
/// writing a null marker, so a later `get_value` reports the key as absent.
pub trait PersistentStore {
    fn set_value(&self, key: &str, value: Option<Value>);

    fn get_value(&self, key: &str) -> Option<Value>;
}

/// In-process store with no durability. Entries live as long as the store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl PersistentStore for MemoryStore {
    fn set_value(&self, key: &str, value: Option<Value>) {
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        match value {
            Some(value) => {
                entries.insert(key.to_owned(), value);
            }
            None => {
                entries.remove(key);
            }
        }
    }

    fn get_value(&self, key: &str) -> Option<Value> {
        self.entries
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(key)
            .cloned()
    }
}

/// Store backed by a JSON file, written through on every set.
///
/// The whole map is loaded once at open; reads are served from memory.
/// Write failures are logged and swallowed so a full disk never reaches the
/// UI layer as a fault.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, Value>>,
}

impl FileStore {
    /// Open the preference file under the user config directory,
    /// e.g. `~/.config/<app_dir>/prefs.json`.
    pub fn open(app_dir: &str) -> Result<FileStore> {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(app_dir);
        path.push(PREFS_FILENAME);
        FileStore::open_at(path)
    }

    /// Open a preference file at an explicit path.
    ///
    /// A missing file yields an empty store; an unreadable or malformed one
    /// is an error and the file is left untouched for the user to fix.
    pub fn open_at(path: PathBuf) -> Result<FileStore> {
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).with_context(|| {
                format!("Failed to parse preference file: {}", path.display())
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(e).context(format!(
                    "Failed to read preference file: {}",
                    path.display()
                ));
            }
        };

        Ok(FileStore {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, entries: &HashMap<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preference directory: {}", parent.display())
            })?;
        }
        let contents =
            serde_json::to_string_pretty(entries).context("Failed to serialize preferences")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write preference file: {}", self.path.display()))?;
        Ok(())
    }
}

impl PersistentStore for FileStore {
    fn set_value(&self, key: &str, value: Option<Value>) {
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        match value {
            Some(value) => {
                entries.insert(key.to_owned(), value);
            }
            None => {
                entries.remove(key);
            }
        }
        if let Err(e) = self.save(&entries) {
            error!(key = %key, error = ?e, "Failed to persist preference");
        }
    }

    fn get_value(&self, key: &str) -> Option<Value> {
        self.entries
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(key)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_store_set_get() {
        let store = MemoryStore::new();
        assert_eq!(store.get_value("missing"), None);

        store.set_value("greeting", Some(json!("hello")));
        assert_eq!(store.get_value("greeting"), Some(json!("hello")));

        store.set_value("greeting", Some(json!("goodbye")));
        assert_eq!(store.get_value("greeting"), Some(json!("goodbye")));
    }

    #[test]
    fn test_memory_store_none_removes_entry() {
        let store = MemoryStore::new();
        store.set_value("count", Some(json!(3)));
        store.set_value("count", None);
        assert_eq!(store.get_value("count"), None);

        // Removing an absent key is a no-op
        store.set_value("never-set", None);
        assert_eq!(store.get_value("never-set"), None);
    }

    #[test]
    fn test_file_store_starts_empty_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open_at(dir.path().join("prefs.json")).unwrap();
        assert_eq!(store.get_value("anything"), None);
    }

    #[test]
    fn test_file_store_round_trip_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let store = FileStore::open_at(path.clone()).unwrap();
        store.set_value("volume", Some(json!(70)));
        store.set_value("theme", Some(json!("dark")));
        drop(store);

        let reopened = FileStore::open_at(path).unwrap();
        assert_eq!(reopened.get_value("volume"), Some(json!(70)));
        assert_eq!(reopened.get_value("theme"), Some(json!("dark")));
    }

    #[test]
    fn test_file_store_removal_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let store = FileStore::open_at(path.clone()).unwrap();
        store.set_value("token", Some(json!("abc")));
        store.set_value("token", None);
        drop(store);

        let reopened = FileStore::open_at(path).unwrap();
        assert_eq!(reopened.get_value("token"), None);
    }

    #[test]
    fn test_file_store_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("app").join("prefs.json");

        let store = FileStore::open_at(path.clone()).unwrap();
        store.set_value("k", Some(json!(1)));
        assert!(path.exists());
    }

    #[test]
    fn test_file_store_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json at all {{{").unwrap();

        assert!(FileStore::open_at(path.clone()).is_err());
        // The broken file is preserved for the user to fix
        assert_eq!(fs::read_to_string(&path).unwrap(), "not json at all {{{");
    }
}
