//! Ripple-Check: a single-page link validator
//!
//! This crate validates the hyperlinks, images, stylesheets, and scripts referenced
//! by one web page, classifying each reference as working, redirected, broken,
//! slow, or erroring. Runs are checkpointed to a durable store so an interrupted
//! validation can be resumed without re-probing links that already completed.

pub mod checker;
pub mod config;
pub mod extract;
pub mod output;
pub mod report;
pub mod service;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Ripple-Check operations
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("A validation run is already in progress")]
    AlreadyRunning,

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Link extraction error: {0}")]
    Extract(#[from] extract::ExtractError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Ripple-Check operations
pub type Result<T> = std::result::Result<T, CheckError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use checker::{Orchestrator, StatusCategory, Validator};
pub use config::Config;
pub use report::ProgressReporter;
pub use service::LinkCheckService;
pub use state::{
    LinkDescriptor, ProgressSnapshot, Session, SessionStatus, TagKind, ValidationOutcome,
};
