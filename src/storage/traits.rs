//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Values are whole JSON records addressed by fixed string keys. There are no
/// partial updates: a writer always replaces the entire record. Implementations
/// must be safe to share between the orchestrator and the reporter.
pub trait Storage: Send + Sync {
    /// Reads the record stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replaces the record stored under `key`
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Deletes the record stored under `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> StorageResult<()>;
}
