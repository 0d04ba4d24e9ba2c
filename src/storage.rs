use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::StoreError;

/// Key holding the opaque session token written by the login flow.
pub const TOKEN_KEY: &str = "token";
/// Key holding the session role written by the login flow.
pub const ROLE_KEY: &str = "userRole";
/// Key holding the persisted theme, literally "dark" or "light".
pub const THEME_KEY: &str = "theme";

// 1. KeyValueStore Contract
/// KeyValueStore
///
/// The persisted, process-external string store shared by the credential
/// snapshot and the theme controller. The login/logout flows write to it from
/// outside this crate, so implementations must not cache reads.
///
/// Swapping the file-backed store for `MemoryStore` in tests does not affect
/// any caller.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// 2. The Real Implementation (JSON file)
/// FileStore
///
/// Persists all keys as a single flat JSON object. Every `get` re-reads the file
/// so that values written by another process are observed on the next
/// navigation. Writes are read-modify-write under a process-local lock and
/// replace the file atomically.
pub struct FileStore {
    path: PathBuf,
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

    /// A missing or empty file is an empty store, not an error.
    fn read_entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&contents)?)
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Other processes read this file at any time; it is only ever replaced whole.
        let staging = self.staging_path();
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&staging, json)?;
        if let Err(e) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

// 3. The Mock Implementation (For Tests)
/// MemoryStore
///
/// In-memory store used by tests and by the HTTP tests to seed credentials
/// without touching the filesystem.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    /// When true, every operation returns `StoreError::Unavailable`.
    pub should_fail: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            should_fail: true,
        }
    }

    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        let entries = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            entries: Mutex::new(entries),
            should_fail: false,
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.should_fail {
            return Err(StoreError::Unavailable(
                "Mock Storage Error: Simulation requested".to_string(),
            ));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check()?;
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check()?;
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check()?;
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

/// StorageState
///
/// The shared handle to the persisted store used across the application state.
pub type StorageState = Arc<dyn KeyValueStore>;
