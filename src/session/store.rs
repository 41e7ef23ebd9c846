//! Pluggable string key-value stores with session lifetime.

use crate::error::{QueueError, Result};
use fs2::FileExt;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A session-lifetime string key-value store.
///
/// The cache layer stores one serialized blob under one well-known key;
/// implementations only need get/set/remove semantics for whole values.
pub trait SessionStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the value stored under `key`.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store; the default for tests and for embedders that bridge
/// to their own storage layer.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// File-backed store persisting the whole key-value surface to one JSON
/// file, for embedders without a host storage layer.
///
/// An exclusive lock file is held for the store's lifetime so two
/// processes cannot interleave writes.
pub struct FileSessionStore {
    path: PathBuf,
    _lock_file: File,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let lock_file = Self::acquire_lock(dir)?;

        Ok(Self {
            path: dir.join("session.json"),
            _lock_file: lock_file,
            write_lock: Mutex::new(()),
        })
    }

    fn acquire_lock(dir: &Path) -> Result<File> {
        let lock_path = dir.join("LOCK");
        let lock_file = File::create(lock_path)?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| QueueError::Locked)?;

        Ok(lock_file)
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        serde_json::from_str(&raw).map_err(|e| QueueError::Deserialization(e.to_string()))
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<()> {
        let encoded = serde_json::to_string(entries)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        file.write_all(encoded.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.write_lock.lock();
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut entries = self.load()?;
        entries.remove(key);
        self.save(&entries)
    }
}
