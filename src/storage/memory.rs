//! In-memory storage implementation
//!
//! Used for tests and for runs that do not need to survive a restart.

use crate::storage::traits::{Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// `HashMap`-backed storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> StorageResult<MutexGuard<'_, HashMap<String, String>>> {
        self.records
            .lock()
            .map_err(|e| StorageError::Database(format!("storage lock poisoned: {}", e)))
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.records()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.records()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.records()?.remove(key);
        Ok(())
    }
}
