//! Typed checkpoint/restore facade over a `Storage` backend
//!
//! The orchestrator checkpoints the `Session` here; the reporter mirrors the
//! latest `ProgressSnapshot` and outcome list so late subscribers can catch up.

use crate::state::{ProgressSnapshot, Session, ValidationOutcome};
use crate::storage::traits::{Storage, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Key of the current session record
pub const SESSION_KEY: &str = "ripple.session";

/// Key of the latest progress snapshot
pub const PROGRESS_KEY: &str = "ripple.progress";

/// Key of the latest completed outcome list
pub const RESULTS_KEY: &str = "ripple.results";

/// Typed access to the durable records of a validation run
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Creates a store backed by process memory only
    pub fn in_memory() -> Self {
        Self::new(Arc::new(crate::storage::MemoryStorage::new()))
    }

    // ===== Session =====

    pub fn save_session(&self, session: &Session) -> StorageResult<()> {
        self.write(SESSION_KEY, session)
    }

    pub fn load_session(&self) -> StorageResult<Option<Session>> {
        self.read(SESSION_KEY)
    }

    // ===== Progress =====

    pub fn save_progress(&self, progress: &ProgressSnapshot) -> StorageResult<()> {
        self.write(PROGRESS_KEY, progress)
    }

    pub fn load_progress(&self) -> StorageResult<Option<ProgressSnapshot>> {
        self.read(PROGRESS_KEY)
    }

    pub fn clear_progress(&self) -> StorageResult<()> {
        self.storage.remove(PROGRESS_KEY)
    }

    // ===== Results =====

    pub fn save_results(&self, results: &[ValidationOutcome]) -> StorageResult<()> {
        self.write(RESULTS_KEY, results)
    }

    pub fn load_results(&self) -> StorageResult<Option<Vec<ValidationOutcome>>> {
        self.read(RESULTS_KEY)
    }

    pub fn clear_results(&self) -> StorageResult<()> {
        self.storage.remove(RESULTS_KEY)
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let json = serde_json::to_string(value)?;
        self.storage.set(key, &json)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.storage.get(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}
