/// Progress snapshot definitions
///
/// A snapshot is what subscribers see after every completed link.
use crate::state::ValidationOutcome;
use serde::{Deserialize, Serialize};

/// Latest progress of a validation run
///
/// Recomputed on every completed link and superseded by the next one. The final
/// snapshot of a run that was not cancelled has `completed == total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub total: usize,
    pub completed: usize,

    /// The most recently completed outcome, absent before the first completion
    #[serde(default)]
    pub current: Option<ValidationOutcome>,
}

impl ProgressSnapshot {
    pub fn new(total: usize, completed: usize, current: Option<ValidationOutcome>) -> Self {
        Self {
            total,
            completed,
            current,
        }
    }

    /// Returns true once every link has completed
    pub fn is_finished(&self) -> bool {
        self.completed >= self.total
    }
}
