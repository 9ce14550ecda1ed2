//! Progress reporting module
//!
//! Publishes progress and completion events to live subscribers and keeps the
//! latest state, mirrored into the durable store, so late subscribers can be
//! caught up.

mod reporter;

pub use reporter::{ProgressReporter, ReportEvent, Subscription};
