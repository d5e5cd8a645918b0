//! Key-value storage backends for persisted preferences.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   PersistedPreference<T>                      │
//! │   - In-memory value, read once at construction                │
//! │   - Mirrors every set back to the store                       │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      KeyValueStore                            │
//! │   - MemoryStore: in-memory (tests, no durable storage)        │
//! │   - UnavailableStore: every access fails (storage disabled)   │
//! │   - FileStore: JSON file (requires state-persistence)         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Invariants
//!
//! 1. **Synchronous**: every call completes before returning; a `set_item`
//!    followed by `get_item` observes the new value.
//! 2. **Atomic writes**: file storage uses write-rename so a crash never
//!    leaves a half-written file.
//! 3. **No panics**: failures are returned as [`StorageError`].
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StorageError::Io` | File I/O failure | Returned; store contents unchanged |
//! | `StorageError::Serialization` | JSON encode/decode | Returned |
//! | `StorageError::Corruption` | Poisoned lock, bad format | Returned |
//! | `StorageError::Unavailable` | Storage disabled | Returned |
//!
//! # Feature Gates
//!
//! - `state-persistence`: Enables [`FileStore`] with JSON serialization.
//!   Without this feature, only [`MemoryStore`] and [`UnavailableStore`] exist.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during store operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// Serialization or deserialization error.
    #[cfg(feature = "state-persistence")]
    Serialization(String),
    /// Store contents are corrupted or a lock was poisoned.
    Corruption(String),
    /// The store cannot be used at all.
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "state-persistence")]
            StorageError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StorageError::Corruption(msg) => write!(f, "storage corruption: {msg}"),
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

/// Result type for store operations.
pub type StorageResult<T> = Result<T, StorageError>;

// ─────────────────────────────────────────────────────────────────────────────
// Store Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A synchronous string key-value store.
///
/// Modeled on browser local storage: values are strings, keys are
/// non-empty identifiers, and every operation completes synchronously.
///
/// Implementations must be thread-safe (`Send + Sync`) so one store can back
/// several widgets.
pub trait KeyValueStore: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Read a value. `Ok(None)` means the key has never been written.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete a value. Deleting a missing key is not an error.
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

/// Shared handle to a store.
pub type SharedStore = Arc<dyn KeyValueStore>;

// ─────────────────────────────────────────────────────────────────────────────
// Memory Store (always available)
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory store for tests and environments without durable storage.
///
/// Contents are lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory store pre-populated with entries.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Wrap in an `Arc` for sharing.
    #[must_use]
    pub fn shared(self) -> SharedStore {
        Arc::new(self)
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().map(|g| g.len()).unwrap_or(0)
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "MemoryStore"
    }

    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let guard = self
            .data
            .read()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        Ok(guard.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        guard.remove(key);
        Ok(())
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.len())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Unavailable Store
// ─────────────────────────────────────────────────────────────────────────────

/// A store whose every operation fails with [`StorageError::Unavailable`].
///
/// Stands in for disabled or inaccessible storage (private browsing,
/// read-only home directory) so callers exercise their fallback path.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    /// Create an unavailable store with a reason used in error messages.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Wrap in an `Arc` for sharing.
    #[must_use]
    pub fn shared(self) -> SharedStore {
        Arc::new(self)
    }

    fn error(&self) -> StorageError {
        StorageError::Unavailable(self.reason.clone())
    }
}

impl Default for UnavailableStore {
    fn default() -> Self {
        Self::new("storage disabled")
    }
}

impl KeyValueStore for UnavailableStore {
    fn name(&self) -> &str {
        "UnavailableStore"
    }

    fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(self.error())
    }

    fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(self.error())
    }

    fn remove_item(&self, _key: &str) -> StorageResult<()> {
        Err(self.error())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Store (requires state-persistence feature)
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "state-persistence")]
mod file_store {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};

    /// Environment variable overriding the default state file path.
    pub const ENV_STATE_FILE: &str = "QDASH_STATE_FILE";

    /// File format for stored preferences (JSON).
    #[derive(Serialize, Deserialize)]
    struct StoreFile {
        /// Format version for future migrations.
        format_version: u32,
        /// Key -> encoded value. Ordered so the file diffs cleanly.
        entries: BTreeMap<String, String>,
    }

    impl StoreFile {
        const FORMAT_VERSION: u32 = 1;

        fn new() -> Self {
            Self {
                format_version: Self::FORMAT_VERSION,
                entries: BTreeMap::new(),
            }
        }
    }

    /// File-backed store using JSON.
    ///
    /// Every write reads the file, updates one key and writes it back with
    /// the write-rename pattern. Values are kept verbatim so external tools
    /// can read and edit them with the same string encoding.
    ///
    /// # File Format
    ///
    /// ```json
    /// {
    ///   "format_version": 1,
    ///   "entries": {
    ///     "expandable": "true"
    ///   }
    /// }
    /// ```
    pub struct FileStore {
        path: PathBuf,
    }

    impl FileStore {
        /// Create a file store at the given path.
        ///
        /// The file does not need to exist; it will be created on first write.
        #[must_use]
        pub fn new(path: impl AsRef<Path>) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
            }
        }

        /// Create a store at the default location for the application.
        ///
        /// Uses `$QDASH_STATE_FILE` when set, else
        /// `$XDG_STATE_HOME/{app_name}/state.json`, else
        /// `~/.local/state/{app_name}/state.json`.
        #[must_use]
        pub fn default_for_app(app_name: &str) -> Self {
            if let Ok(path) = std::env::var(ENV_STATE_FILE)
                && !path.is_empty()
            {
                return Self::new(path);
            }
            let path = state_dir_or_fallback().join(app_name).join("state.json");
            Self { path }
        }

        /// Path of the backing file.
        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn temp_path(&self) -> PathBuf {
            let mut tmp = self.path.clone();
            tmp.set_extension("json.tmp");
            tmp
        }

        fn load(&self) -> StorageResult<StoreFile> {
            if !self.path.exists() {
                return Ok(StoreFile::new());
            }
            let reader = BufReader::new(File::open(&self.path)?);
            let file: StoreFile = serde_json::from_reader(reader).map_err(|e| {
                StorageError::Serialization(format!("failed to parse store file: {e}"))
            })?;
            if file.format_version != StoreFile::FORMAT_VERSION {
                return Err(StorageError::Corruption(format!(
                    "unsupported store format version {} (expected {})",
                    file.format_version,
                    StoreFile::FORMAT_VERSION
                )));
            }
            Ok(file)
        }

        fn save(&self, file: &StoreFile) -> StorageResult<()> {
            if let Some(parent) = self.path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }

            let tmp_path = self.temp_path();
            let written = write_synced(&tmp_path, file)
                .and_then(|()| fs::rename(&tmp_path, &self.path).map_err(StorageError::from));
            if let Err(error) = written {
                let _ = fs::remove_file(&tmp_path);
                return Err(error);
            }

            tracing::debug!(
                path = %self.path.display(),
                entries = file.entries.len(),
                "saved preference store"
            );
            Ok(())
        }
    }

    fn write_synced(path: &Path, file: &StoreFile) -> StorageResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, file).map_err(|e| {
            StorageError::Serialization(format!("failed to serialize store: {e}"))
        })?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }

    /// Get the state directory, falling back to the current dir.
    fn state_dir_or_fallback() -> PathBuf {
        if let Ok(state_home) = std::env::var("XDG_STATE_HOME")
            && !state_home.is_empty()
        {
            return PathBuf::from(state_home);
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".local").join("state");
        }
        PathBuf::from(".")
    }

    impl KeyValueStore for FileStore {
        fn name(&self) -> &str {
            "FileStore"
        }

        fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
            Ok(self.load()?.entries.get(key).cloned())
        }

        fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
            let mut file = self.load()?;
            file.entries.insert(key.to_owned(), value.to_owned());
            self.save(&file)
        }

        fn remove_item(&self, key: &str) -> StorageResult<()> {
            let mut file = self.load()?;
            if file.entries.remove(key).is_some() {
                self.save(&file)?;
            }
            Ok(())
        }
    }

    impl fmt::Debug for FileStore {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FileStore")
                .field("path", &self.path)
                .finish()
        }
    }

}

#[cfg(feature = "state-persistence")]
pub use file_store::{ENV_STATE_FILE, FileStore};

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_basic_operations() {
        let store = MemoryStore::new();

        assert_eq!(store.get_item("k").unwrap(), None);

        store.set_item("k", "v1").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v1"));

        store.set_item("k", "v2").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);

        store.remove_item("k").unwrap();
        assert!(store.is_empty());

        // Removing a missing key is fine
        store.remove_item("k").unwrap();
    }

    #[test]
    fn memory_store_with_entries() {
        let store = MemoryStore::with_entries([("expandable", "false")]);
        assert_eq!(
            store.get_item("expandable").unwrap().as_deref(),
            Some("false")
        );
    }

    #[test]
    fn unavailable_store_fails_everything() {
        let store = UnavailableStore::new("quota exceeded");
        assert!(matches!(
            store.get_item("k"),
            Err(StorageError::Unavailable(msg)) if msg == "quota exceeded"
        ));
        assert!(store.set_item("k", "v").is_err());
        assert!(store.remove_item("k").is_err());
    }

    #[test]
    fn shared_store_is_visible_through_clones() {
        let store = MemoryStore::new().shared();
        let other = Arc::clone(&store);
        store.set_item("a", "1").unwrap();
        assert_eq!(other.get_item("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn storage_error_display() {
        let io_err = StorageError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        assert!(io_err.to_string().contains("I/O error"));

        let corrupt = StorageError::Corruption("bad data".into());
        assert!(corrupt.to_string().contains("corruption"));

        let unavail = StorageError::Unavailable("no backend".into());
        assert!(unavail.to_string().contains("unavailable"));
    }
}
