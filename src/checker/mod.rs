//! Checker module for link validation
//!
//! This module contains the core validation logic, including:
//! - Status classification of HTTP outcomes
//! - Single-link probing with HEAD→GET fallback, timeout and cancellation
//! - Global concurrency limiting via a FIFO semaphore
//! - Batch orchestration with per-chunk checkpoints and resume

mod classify;
mod limiter;
mod orchestrator;
mod transport;
mod validator;

pub use classify::{classify, describe, describe_category, StatusCategory};
pub use limiter::{Limiter, LimiterPermit};
pub use orchestrator::{CheckerOptions, Orchestrator, ProgressListener};
pub use transport::{build_http_client, ProbeMethod, ReqwestTransport, Transport, TransportError};
pub use validator::Validator;
