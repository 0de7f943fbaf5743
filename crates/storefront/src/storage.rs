//! Local key/value persistence for the shopper's stores.
//!
//! Mirrors browser `localStorage`: string keys mapped to JSON strings, one key
//! per store (`cbrd.cart.v1`, `cbrd.wishlist.v1`, ...). Persistence is
//! best-effort. Failures never reach the caller of a store operation; they are
//! reported to a [`PersistenceHook`] and the in-memory state stays
//! authoritative for the rest of the session.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised by a [`LocalStorage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    /// The stored value is not valid JSON for the expected shape.
    #[error("corrupt value for key {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory value could not be serialized.
    #[error("failed to serialize value for key {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Key contains characters that cannot be mapped to a file name.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// A previous holder of the storage lock panicked.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A synchronous string key/value store.
pub trait LocalStorage: Send + Sync {
    /// Read the raw value for `key`, or `None` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// File-backed storage
// =============================================================================

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a temporary sibling file that is renamed over the target, so
/// a crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir`. The directory is created lazily on
    /// first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory holding the stored values.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;

        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        let mut file = fs::File::create(&tmp).map_err(io_err)?;
        file.write_all(value.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

// =============================================================================
// In-memory storage
// =============================================================================

/// Process-local storage. Used by tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.remove(key);
        Ok(())
    }
}

// =============================================================================
// Failure reporting
// =============================================================================

/// Which persistence step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOp {
    Load,
    Save,
    Remove,
}

impl PersistOp {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Save => "save",
            Self::Remove => "remove",
        }
    }
}

/// Receives persistence failures that stores do not propagate.
pub trait PersistenceHook: Send + Sync {
    fn on_failure(&self, op: PersistOp, key: &str, error: &StorageError);
}

/// Default hook: logs a warning (a Sentry breadcrumb via the tracing layer).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHook;

impl PersistenceHook for TracingHook {
    fn on_failure(&self, op: PersistOp, key: &str, error: &StorageError) {
        tracing::warn!(op = op.as_str(), key, error = %error, "local persistence failed");
    }
}

/// Hook that remembers every failure. Useful in tests and diagnostics.
#[derive(Debug, Default)]
pub struct RecordingHook {
    failures: Mutex<Vec<(PersistOp, String)>>,
}

impl RecordingHook {
    /// Failures seen so far, oldest first.
    #[must_use]
    pub fn failures(&self) -> Vec<(PersistOp, String)> {
        self.failures
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl PersistenceHook for RecordingHook {
    fn on_failure(&self, op: PersistOp, key: &str, _error: &StorageError) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push((op, key.to_string()));
        }
    }
}

// =============================================================================
// Typed persistence handle
// =============================================================================

/// Typed, best-effort access to a [`LocalStorage`].
///
/// Cheaply cloneable; every store holds one.
#[derive(Clone)]
pub struct Persistence {
    storage: Arc<dyn LocalStorage>,
    hook: Arc<dyn PersistenceHook>,
}

impl Persistence {
    /// Wrap `storage`, reporting failures through [`TracingHook`].
    #[must_use]
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self::with_hook(storage, Arc::new(TracingHook))
    }

    /// Wrap `storage`, reporting failures through `hook`.
    #[must_use]
    pub fn with_hook(storage: Arc<dyn LocalStorage>, hook: Arc<dyn PersistenceHook>) -> Self {
        Self { storage, hook }
    }

    /// Persistence over a fresh [`MemoryStorage`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// The underlying storage backend.
    #[must_use]
    pub fn storage(&self) -> &dyn LocalStorage {
        self.storage.as_ref()
    }

    /// Load and decode `key`. Missing values, read failures and corrupt JSON
    /// all yield `None`; the latter two are reported to the hook.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get_item(key) {
            Ok(raw) => raw?,
            Err(e) => {
                self.hook.on_failure(PersistOp::Load, key, &e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(source) => {
                let e = StorageError::Corrupt {
                    key: key.to_string(),
                    source,
                };
                self.hook.on_failure(PersistOp::Load, key, &e);
                None
            }
        }
    }

    /// Encode and write `value` under `key`.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(|source| StorageError::Serialize {
                key: key.to_string(),
                source,
            })
            .and_then(|json| self.storage.set_item(key, &json));

        if let Err(e) = result {
            self.hook.on_failure(PersistOp::Save, key, &e);
        }
    }

    /// Delete `key`.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.storage.remove_item(key) {
            self.hook.on_failure(PersistOp::Remove, key, &e);
        }
    }
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// Storage whose writes always fail.
    #[derive(Debug, Default)]
    pub(crate) struct ReadOnlyStorage {
        pub(crate) inner: MemoryStorage,
    }

    impl LocalStorage for ReadOnlyStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            })
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.set_item(key, "")
        }
    }

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);
        storage.set_item("k", "\"v\"").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("\"v\""));
        storage.remove_item("k").unwrap();
        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_file_storage_writes_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.get_item("cbrd.cart.v1").unwrap(), None);
        storage.set_item("cbrd.cart.v1", "{\"items\":[]}").unwrap();

        let on_disk = fs::read_to_string(dir.path().join("nested/cbrd.cart.v1.json")).unwrap();
        assert_eq!(on_disk, "{\"items\":[]}");
        assert_eq!(
            storage.get_item("cbrd.cart.v1").unwrap().as_deref(),
            Some("{\"items\":[]}")
        );

        storage.remove_item("cbrd.cart.v1").unwrap();
        assert_eq!(storage.get_item("cbrd.cart.v1").unwrap(), None);
        storage.remove_item("cbrd.cart.v1").unwrap();
    }

    #[test]
    fn test_file_storage_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(matches!(
            storage.set_item("../escape", "1"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            storage.get_item(".hidden"),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_load_corrupt_value_reports_and_returns_none() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item("cbrd.wishlist.v1", "{not json").unwrap();
        let hook = Arc::new(RecordingHook::default());
        let persistence = Persistence::with_hook(storage, hook.clone());

        let loaded: Option<Vec<i32>> = persistence.load("cbrd.wishlist.v1");

        assert!(loaded.is_none());
        assert_eq!(
            hook.failures(),
            vec![(PersistOp::Load, "cbrd.wishlist.v1".to_string())]
        );
    }

    #[test]
    fn test_missing_value_is_not_a_failure() {
        let hook = Arc::new(RecordingHook::default());
        let persistence = Persistence::with_hook(Arc::new(MemoryStorage::new()), hook.clone());
        let loaded: Option<String> = persistence.load("absent");
        assert!(loaded.is_none());
        assert!(hook.failures().is_empty());
    }

    #[test]
    fn test_save_failure_reaches_hook() {
        let hook = Arc::new(RecordingHook::default());
        let persistence =
            Persistence::with_hook(Arc::new(ReadOnlyStorage::default()), hook.clone());

        persistence.save("cbrd.auth.v1", &"user");
        persistence.remove("cbrd.auth.v1");

        assert_eq!(
            hook.failures(),
            vec![
                (PersistOp::Save, "cbrd.auth.v1".to_string()),
                (PersistOp::Remove, "cbrd.auth.v1".to_string()),
            ]
        );
    }
}
