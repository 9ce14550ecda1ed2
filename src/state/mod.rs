//! State module for validation runs
//!
//! This module provides the data model shared by the checker, the reporter and
//! the durable store.
//!
//! # Components
//!
//! - `LinkDescriptor`: One reference found on the page (input unit)
//! - `ValidationOutcome`: The classified result of probing one reference (output unit)
//! - `Session`: The durable record of one end-to-end validation run
//! - `ProgressSnapshot`: The latest progress of a run, superseded on every completion

mod link;
mod progress;
mod session;

// Re-export main types
pub use link::{LinkDescriptor, TagKind, ValidationOutcome};
pub use progress::ProgressSnapshot;
pub use session::{Session, SessionStatus};
