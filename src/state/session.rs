/// Session definitions for validation runs
///
/// A session is created when a run starts and is mutated only by the
/// orchestrator. Its results list only ever grows within a run.
use crate::state::{LinkDescriptor, ValidationOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Status of a validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Links are being validated (or the run was interrupted mid-way)
    Checking,

    /// Every link was validated
    Completed,

    /// The run was cancelled before every link was validated
    Cancelled,
}

impl SessionStatus {
    /// Returns true if no further processing will happen for this session
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Checking)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The durable record of one validation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub page_url: String,

    /// Every link of the run, in page order
    pub links: Vec<LinkDescriptor>,

    /// Outcomes accumulated so far, in link order
    pub results: Vec<ValidationOutcome>,

    pub status: SessionStatus,

    /// Always equal to `results.len()` after a persisted write
    pub completed_count: usize,

    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates a fresh session in the `checking` state
    pub fn new(page_url: impl Into<String>, links: Vec<LinkDescriptor>) -> Self {
        Self {
            id: Uuid::new_v4(),
            page_url: page_url.into(),
            links,
            results: Vec::new(),
            status: SessionStatus::Checking,
            completed_count: 0,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Returns the links that have no recorded outcome yet
    pub fn remaining_links(&self) -> &[LinkDescriptor] {
        let done = self.completed_count.min(self.links.len());
        &self.links[done..]
    }

    pub fn total(&self) -> usize {
        self.links.len()
    }

    /// Appends outcomes after the ones already recorded, keeping `completed_count` in step
    pub fn append_results(&mut self, outcomes: impl IntoIterator<Item = ValidationOutcome>) {
        self.results.extend(outcomes);
        self.completed_count = self.results.len();
    }

    /// Moves the session into a terminal status, stamping the completion time
    pub fn finish(&mut self, status: SessionStatus) {
        self.status = status;
        self.completed_at = Some(Utc::now());
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
