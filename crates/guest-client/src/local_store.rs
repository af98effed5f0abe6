//! Durable key/value storage on the client.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::ClientError;

/// Full household cache, JSON array.
pub const DATA_KEY: &str = "oliverikaGuestListData";
/// `"true"` while the password gate is unlocked.
pub const AUTH_KEY: &str = "oliverikaGuestListAuth";
/// JSON array of hidden column names.
pub const HIDDEN_COLUMNS_KEY: &str = "oliverikaGuestListHiddenColumns";
/// Uncapped mirror of the view-prefs cookie.
pub const VIEW_PREFS_KEY: &str = "oliverikaGuestListViewPrefs";

/// String storage keyed by name, like browser local storage.
pub trait LocalStore: Send + Sync {
    /// Read a value. Unreadable entries read as absent.
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;

    /// # Errors
    ///
    /// Returns `ClientError::Storage` if an existing value cannot be removed.
    fn remove(&self, key: &str) -> Result<(), ClientError>;
}

/// One file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the platform data directory, e.g.
    /// `~/.local/share/wedding-guest-list` on Linux.
    #[must_use]
    pub fn default_location() -> Option<Self> {
        dirs::data_dir().map(|dir| Self::new(dir.join("wedding-guest-list")))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Some(value),
            Err(error) if error.kind() == ErrorKind::NotFound => None,
            Err(error) => {
                tracing::warn!(key, %error, "unable to read local value");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        match fs::remove_file(self.path(key)) {
            Err(error) if error.kind() != ErrorKind::NotFound => Err(error.into()),
            _ => Ok(()),
        }
    }
}

/// Process-local store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &dyn LocalStore) {
        assert_eq!(store.get(DATA_KEY), None);
        store.set(DATA_KEY, "[]").unwrap();
        assert_eq!(store.get(DATA_KEY).as_deref(), Some("[]"));
        store.set(DATA_KEY, "[1]").unwrap();
        assert_eq!(store.get(DATA_KEY).as_deref(), Some("[1]"));
        store.remove(DATA_KEY).unwrap();
        store.remove(DATA_KEY).unwrap();
        assert_eq!(store.get(DATA_KEY), None);
    }

    #[test]
    fn memory_store_semantics() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn file_store_semantics() {
        let dir = tempfile::tempdir().unwrap();
        exercise(&FileStore::new(dir.path().join("nested")));
    }

    #[test]
    fn file_store_keys_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set(AUTH_KEY, "true").unwrap();
        store.set("a/b", "x").unwrap();
        assert_eq!(store.get(AUTH_KEY).as_deref(), Some("true"));
        assert_eq!(store.get("a/b").as_deref(), Some("x"));
        assert_eq!(store.get(HIDDEN_COLUMNS_KEY), None);
    }
}
