//! Progress reporter and its subscriptions
//!
//! Every event is broadcast to live subscribers and cached, so a subscriber
//! that connects mid-run or after a restart is replayed the latest state.

use crate::checker::ProgressListener;
use crate::state::{ProgressSnapshot, ValidationOutcome};
use crate::storage::SessionStore;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

/// Capacity of the live event channel; slower subscribers skip ahead
const CHANNEL_CAPACITY: usize = 256;

/// An event delivered to subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    /// A link finished, or the run was cancelled (`current` cleared)
    Progress(ProgressSnapshot),

    /// The run finished; carries every outcome in link order
    Complete { results: Vec<ValidationOutcome> },
}

/// In-memory cache of the latest published state
#[derive(Debug, Default)]
struct ReporterState {
    progress: Option<ProgressSnapshot>,
    results: Option<Vec<ValidationOutcome>>,
}

impl ReporterState {
    fn is_empty(&self) -> bool {
        self.progress.is_none() && self.results.is_none()
    }

    fn replay(&self) -> VecDeque<ReportEvent> {
        let mut events = VecDeque::new();
        if let Some(progress) = &self.progress {
            events.push_back(ReportEvent::Progress(progress.clone()));
        }
        if let Some(results) = &self.results {
            events.push_back(ReportEvent::Complete {
                results: results.clone(),
            });
        }
        events
    }
}

/// A live subscription; yields the replayed backlog first, then live events
pub struct Subscription {
    backlog: VecDeque<ReportEvent>,
    receiver: broadcast::Receiver<ReportEvent>,
}

impl Subscription {
    /// Waits for the next event; `None` once the reporter is gone
    pub async fn recv(&mut self) -> Option<ReportEvent> {
        if let Some(event) = self.backlog.pop_front() {
            return Some(event);
        }
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Subscriber lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next event if one is already available
    pub fn try_recv(&mut self) -> Option<ReportEvent> {
        if let Some(event) = self.backlog.pop_front() {
            return Some(event);
        }
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}

/// Publishes run progress to subscribers
pub struct ProgressReporter {
    store: SessionStore,
    sender: broadcast::Sender<ReportEvent>,
    state: Mutex<ReporterState>,
}

impl ProgressReporter {
    pub fn new(store: SessionStore) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            store,
            sender,
            state: Mutex::new(ReporterState::default()),
        }
    }

    /// Subscribes to events, replaying the latest known state first
    ///
    /// When nothing is cached in memory the state is hydrated from the durable
    /// store, so a subscriber connecting after a restart still catches up.
    pub fn subscribe(&self) -> Subscription {
        let mut state = self.state();
        if state.is_empty() {
            self.hydrate(&mut state);
        }
        Subscription {
            backlog: state.replay(),
            receiver: self.sender.subscribe(),
        }
    }

    /// Publishes the progress of one completed link
    pub fn report_progress(&self, total: usize, completed: usize, current: &ValidationOutcome) {
        let snapshot = ProgressSnapshot::new(total, completed, Some(current.clone()));
        let mut state = self.state();
        if let Err(e) = self.store.save_progress(&snapshot) {
            tracing::warn!("Failed to persist progress: {}", e);
        }
        state.progress = Some(snapshot.clone());
        self.publish(ReportEvent::Progress(snapshot));
    }

    /// Publishes the final outcome list of a finished run
    pub fn report_complete(&self, results: &[ValidationOutcome]) {
        let mut state = self.state();
        if let Err(e) = self.store.save_results(results) {
            tracing::warn!("Failed to persist results: {}", e);
        }
        state.results = Some(results.to_vec());
        self.publish(ReportEvent::Complete {
            results: results.to_vec(),
        });
    }

    /// Publishes a cancellation and drops the run's state
    ///
    /// Subscribers receive a progress event with `current` cleared. Afterwards no
    /// stale progress or results remain for a future subscriber.
    pub fn report_cancelled(&self) {
        let mut state = self.state();
        let (total, completed) = state
            .progress
            .as_ref()
            .map(|p| (p.total, p.completed))
            .unwrap_or((0, 0));
        self.publish(ReportEvent::Progress(ProgressSnapshot::new(total, completed, None)));

        *state = ReporterState::default();
        self.clear_durable();
    }

    /// Clears all in-memory and durable state, ready for a clean run
    pub fn reset(&self) {
        *self.state() = ReporterState::default();
        self.clear_durable();
    }

    /// Returns the latest progress snapshot held in memory
    pub fn latest_progress(&self) -> Option<ProgressSnapshot> {
        self.state().progress.clone()
    }

    /// Returns the latest completed outcome list held in memory
    pub fn latest_results(&self) -> Option<Vec<ValidationOutcome>> {
        self.state().results.clone()
    }

    fn hydrate(&self, state: &mut ReporterState) {
        match self.store.load_progress() {
            Ok(progress) => state.progress = progress,
            Err(e) => tracing::warn!("Failed to load stored progress: {}", e),
        }
        match self.store.load_results() {
            Ok(results) => state.results = results,
            Err(e) => tracing::warn!("Failed to load stored results: {}", e),
        }
    }

    fn clear_durable(&self) {
        if let Err(e) = self.store.clear_progress() {
            tracing::warn!("Failed to clear stored progress: {}", e);
        }
        if let Err(e) = self.store.clear_results() {
            tracing::warn!("Failed to clear stored results: {}", e);
        }
    }

    /// Sends to live subscribers; having none is not an error
    fn publish(&self, event: ReportEvent) {
        let _ = self.sender.send(event);
    }

    fn state(&self) -> MutexGuard<'_, ReporterState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ProgressListener for ProgressReporter {
    fn on_run_started(&self) {
        self.reset();
    }

    fn on_progress(&self, completed: usize, total: usize, outcome: &ValidationOutcome) {
        self.report_progress(total, completed, outcome);
    }
}
