//! Configuration module for Ripple-Check
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing values fall back to the defaults.
//!
//! # Example
//!
//! ```no_run
//! use ripple_check::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("ripple-check.toml")).unwrap();
//! println!("Probing {} links at a time", config.checker.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CheckerConfig, Config, StorageConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
