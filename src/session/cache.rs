//! Per-view cache records layered over a [`SessionStore`].

use crate::error::{QueueError, Result};
use crate::session::store::SessionStore;
use crate::types::{CacheRecord, FilterSpec, SortSpec, ViewKey};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Well-known storage key for the blob holding every view's record.
pub const STORAGE_KEY: &str = "queue-query-state";

type CacheBlob = HashMap<String, CacheRecord>;

/// Session cache of one [`CacheRecord`] per [`ViewKey`].
///
/// All records live in a single serialized blob under [`STORAGE_KEY`].
/// Every operation is a read-modify-write of the whole blob; cycles are
/// serialized through one internal lock so interleaved writers cannot
/// lose updates.
pub struct QueryCache {
    store: Arc<dyn SessionStore>,

    /// Serializes read-modify-write cycles on the blob.
    write_lock: Mutex<()>,
}

impl QueryCache {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Read the record for `key`.
    ///
    /// A missing record yields the default record, which is written back
    /// immediately so subsequent reads are consistent.
    pub fn get(&self, key: &ViewKey) -> Result<CacheRecord> {
        let _guard = self.write_lock.lock();

        let mut blob = self.load_blob()?;
        if let Some(record) = blob.get(key.as_str()) {
            return Ok(record.clone());
        }

        debug!(view = %key, "no cached record, writing defaults");
        let record = CacheRecord::default();
        blob.insert(key.as_str().to_string(), record.clone());
        self.save_blob(&blob)?;
        Ok(record)
    }

    /// Replace the stored filters for `key`, preserving the other fields.
    pub fn set_filters(&self, key: &ViewKey, filters: Vec<FilterSpec>) -> Result<()> {
        self.update(key, |record| record.filters = filters)
    }

    /// Replace the stored sort for `key`, preserving the other fields.
    pub fn set_sort_param(&self, key: &ViewKey, sort: Vec<SortSpec>) -> Result<()> {
        self.update(key, |record| record.sort_param = Some(sort))
    }

    /// Replace the stored page for `key`, preserving the other fields.
    pub fn set_page(&self, key: &ViewKey, page: u64) -> Result<()> {
        self.update(key, |record| record.page = Some(page))
    }

    /// Replace the stored page size for `key`, preserving the other fields.
    pub fn set_page_size(&self, key: &ViewKey, page_size: u64) -> Result<()> {
        self.update(key, |record| record.page_size = Some(page_size))
    }

    /// Delete the record for `key` (sign-out and similar flows). Records
    /// for other keys are untouched.
    pub fn remove(&self, key: &ViewKey) -> Result<()> {
        let _guard = self.write_lock.lock();

        let mut blob = self.load_blob()?;
        if blob.remove(key.as_str()).is_some() {
            self.save_blob(&blob)?;
        }
        Ok(())
    }

    fn update<F: FnOnce(&mut CacheRecord)>(&self, key: &ViewKey, mutate: F) -> Result<()> {
        let _guard = self.write_lock.lock();

        let mut blob = self.load_blob()?;
        let record = blob.entry(key.as_str().to_string()).or_default();
        mutate(record);
        self.save_blob(&blob)
    }

    fn load_blob(&self) -> Result<CacheBlob> {
        match self.store.get(STORAGE_KEY)? {
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|e| QueueError::Deserialization(e.to_string()))
            }
            None => Ok(CacheBlob::new()),
        }
    }

    fn save_blob(&self, blob: &CacheBlob) -> Result<()> {
        let encoded = serde_json::to_string(blob)?;
        self.store.set(STORAGE_KEY, &encoded)
    }
}
