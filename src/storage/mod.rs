//! Storage module for persisting validation runs
//!
//! This module handles all durable state for the checker, including:
//! - The whole-record key-value `Storage` interface
//! - SQLite and in-memory backends
//! - The typed `SessionStore` checkpoint/restore facade used by the
//!   orchestrator and the reporter

mod memory;
mod schema;
mod session_store;
mod sqlite;
mod traits;

pub use memory::MemoryStorage;
pub use session_store::{SessionStore, PROGRESS_KEY, RESULTS_KEY, SESSION_KEY};
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use std::path::Path;
use std::sync::Arc;

/// Opens the SQLite-backed session store at `path`
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SessionStore)` - Successfully opened store
/// * `Err(StorageError)` - Failed to open or initialize the database
pub fn open_session_store(path: &Path) -> StorageResult<SessionStore> {
    let storage = SqliteStorage::new(path)?;
    Ok(SessionStore::new(Arc::new(storage)))
}
