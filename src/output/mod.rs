//! Output module for run results
//!
//! This module handles:
//! - Exporting outcomes as a spreadsheet-friendly CSV document
//! - Summarizing a run's outcomes per status category

mod csv;
pub mod stats;

pub use self::csv::{to_csv, write_csv};
pub use stats::{print_statistics, RunStatistics};

use thiserror::Error;

/// Errors raised while writing output files
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
