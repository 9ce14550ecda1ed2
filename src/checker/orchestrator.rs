//! Batch orchestrator - main validation orchestration logic
//!
//! This module drives a `Session` through `checking → {completed | cancelled}`:
//! - Splitting the remaining links into fixed-size chunks
//! - Dispatching every link of a chunk through the limiter to the validator
//! - Checkpointing the session after each chunk
//! - Handling cancellation and resumption after a restart
//!
//! Only one run may be active at a time. All probes of a chunk are polled
//! together on the caller's task, so concurrency is interleaved suspension on
//! I/O rather than parallel execution.

use crate::checker::limiter::{Limiter, DEFAULT_CONCURRENCY};
use crate::checker::transport::Transport;
use crate::checker::validator::{Validator, DEFAULT_TIMEOUT};
use crate::config::CheckerConfig;
use crate::state::{LinkDescriptor, Session, SessionStatus, ValidationOutcome};
use crate::storage::SessionStore;
use crate::CheckError;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default number of links per persisted checkpoint
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Tuning knobs for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerOptions {
    /// Maximum number of simultaneous probes
    pub concurrency: usize,

    /// Links per persisted checkpoint
    pub batch_size: usize,

    /// Per-attempt request timeout
    pub request_timeout: Duration,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            batch_size: DEFAULT_BATCH_SIZE,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl From<&CheckerConfig> for CheckerOptions {
    fn from(config: &CheckerConfig) -> Self {
        Self {
            concurrency: config.concurrency as usize,
            batch_size: config.batch_size as usize,
            request_timeout: Duration::from_millis(config.request_timeout_ms),
        }
    }
}

/// Receives one notification per completed link
pub trait ProgressListener: Send + Sync {
    /// Called once a fresh run holds the single-run guard, before any probe
    fn on_run_started(&self) {}

    /// Called with the running number of completed links, the total, and the
    /// outcome that just finished
    fn on_progress(&self, completed: usize, total: usize, outcome: &ValidationOutcome);
}

impl<F> ProgressListener for F
where
    F: Fn(usize, usize, &ValidationOutcome) + Send + Sync,
{
    fn on_progress(&self, completed: usize, total: usize, outcome: &ValidationOutcome) {
        self(completed, total, outcome)
    }
}

/// Clears the running flag when a run ends, however it ends
struct RunGuard<'a> {
    running: &'a AtomicBool,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Main validation orchestrator
pub struct Orchestrator {
    store: SessionStore,
    validator: Validator,
    limiter: Limiter,
    batch_size: usize,
    running: AtomicBool,
    cancel: Mutex<CancellationToken>,
}

impl Orchestrator {
    /// Creates a new orchestrator
    ///
    /// # Arguments
    ///
    /// * `store` - Where sessions are checkpointed
    /// * `transport` - The transport used for probes
    /// * `options` - Concurrency, batch size and timeout
    pub fn new(
        store: SessionStore,
        transport: Arc<dyn Transport>,
        options: CheckerOptions,
    ) -> Self {
        Self {
            store,
            validator: Validator::new(transport, options.request_timeout),
            limiter: Limiter::new(options.concurrency),
            batch_size: options.batch_size.max(1),
            running: AtomicBool::new(false),
            cancel: Mutex::new(CancellationToken::new()),
        }
    }

    /// Returns true while a run is active
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Starts a fresh run over `links`
    ///
    /// A new session is always created; a terminal session is never reused.
    /// The listener's `on_run_started` fires only once the run is admitted.
    ///
    /// # Returns
    ///
    /// * `Ok(Session)` - The finalized session (`completed` or `cancelled`)
    /// * `Err(CheckError::AlreadyRunning)` - Another run is active
    pub async fn start(
        &self,
        page_url: &str,
        links: Vec<LinkDescriptor>,
        listener: &dyn ProgressListener,
    ) -> Result<Session, CheckError> {
        let (_guard, token) = self.begin_run()?;
        listener.on_run_started();

        let mut session = Session::new(page_url, links);
        tracing::info!(
            "Starting validation run {} for {} ({} links)",
            session.id,
            session.page_url,
            session.total()
        );
        self.checkpoint(&session);

        self.run_session(&mut session, &token, listener).await;
        Ok(session)
    }

    /// Resumes the stored session if it was interrupted mid-run
    ///
    /// Only the links after `completed_count` are processed; outcomes already
    /// persisted are kept as they are.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Session))` - The resumed session, finalized
    /// * `Ok(None)` - No stored session, or it is not `checking`
    /// * `Err(CheckError::AlreadyRunning)` - Another run is active
    pub async fn resume(
        &self,
        listener: &dyn ProgressListener,
    ) -> Result<Option<Session>, CheckError> {
        let (_guard, token) = self.begin_run()?;

        let mut session = match self.store.load_session() {
            Ok(Some(session)) if session.status == SessionStatus::Checking => session,
            Ok(Some(session)) => {
                tracing::debug!(
                    "Stored session {} is {}, nothing to resume",
                    session.id,
                    session.status
                );
                return Ok(None);
            }
            Ok(None) => {
                tracing::debug!("No stored session to resume");
                return Ok(None);
            }
            Err(e) => {
                tracing::warn!("Failed to load stored session: {}", e);
                return Ok(None);
            }
        };

        if session.completed_count != session.results.len() {
            tracing::warn!(
                "Session {} has completed_count {} but {} results; trusting results",
                session.id,
                session.completed_count,
                session.results.len()
            );
            session.completed_count = session.results.len();
        }

        tracing::info!(
            "Resuming validation run {} for {} ({}/{} already done)",
            session.id,
            session.page_url,
            session.completed_count,
            session.total()
        );

        self.run_session(&mut session, &token, listener).await;
        Ok(Some(session))
    }

    /// Cancels the active run
    ///
    /// In-flight probes abort promptly and no new probe is dispatched.
    pub fn cancel(&self) {
        let token = self.cancel.lock().unwrap_or_else(|e| e.into_inner());
        if !token.is_cancelled() {
            tracing::info!("Cancelling validation run");
        }
        token.cancel();
    }

    /// Returns the persisted session, if any
    pub fn get_stored_session(&self) -> Option<Session> {
        match self.store.load_session() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Failed to load stored session: {}", e);
                None
            }
        }
    }

    /// Marks a run as active and installs a fresh cancellation token
    fn begin_run(&self) -> Result<(RunGuard<'_>, CancellationToken), CheckError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(CheckError::AlreadyRunning);
        }
        let guard = RunGuard {
            running: &self.running,
        };

        let token = CancellationToken::new();
        *self.cancel.lock().unwrap_or_else(|e| e.into_inner()) = token.clone();
        Ok((guard, token))
    }

    /// Processes the remaining links of `session` and finalizes its status
    async fn run_session(
        &self,
        session: &mut Session,
        token: &CancellationToken,
        listener: &dyn ProgressListener,
    ) {
        let remaining = session.remaining_links().to_vec();
        let total = session.total();
        let mut completed = session.completed_count;

        for (index, chunk) in remaining.chunks(self.batch_size).enumerate() {
            if token.is_cancelled() {
                tracing::debug!("Cancellation observed before chunk {}", index);
                break;
            }

            let outcomes = self
                .process_chunk(chunk, token, total, &mut completed, listener)
                .await;

            session.append_results(outcomes);
            self.checkpoint(session);

            tracing::debug!(
                "Chunk {} done: {}/{} links validated",
                index,
                session.completed_count,
                total
            );
        }

        if token.is_cancelled() {
            session.finish(SessionStatus::Cancelled);
            tracing::info!(
                "Validation run {} cancelled after {}/{} links",
                session.id,
                session.completed_count,
                total
            );
        } else {
            session.finish(SessionStatus::Completed);
            tracing::info!("Validation run {} completed: {} links", session.id, total);
        }
        self.checkpoint(session);
    }

    /// Validates one chunk concurrently, returning its outcomes in input order
    ///
    /// Links whose turn came after cancellation produce no outcome.
    async fn process_chunk(
        &self,
        chunk: &[LinkDescriptor],
        token: &CancellationToken,
        total: usize,
        completed: &mut usize,
        listener: &dyn ProgressListener,
    ) -> Vec<ValidationOutcome> {
        let mut pending: FuturesUnordered<_> = chunk
            .iter()
            .enumerate()
            .map(|(index, link)| async move {
                if token.is_cancelled() {
                    return (index, None);
                }
                let permit = tokio::select! {
                    biased;
                    _ = token.cancelled() => return (index, None),
                    permit = self.limiter.acquire() => match permit {
                        Ok(permit) => permit,
                        Err(_) => return (index, None),
                    },
                };
                if token.is_cancelled() {
                    return (index, None);
                }
                let outcome = self.validator.validate(link, token).await;
                permit.release();
                (index, Some(outcome))
            })
            .collect();

        let mut slots: Vec<Option<ValidationOutcome>> = vec![None; chunk.len()];
        while let Some((index, outcome)) = pending.next().await {
            if let Some(outcome) = outcome {
                *completed += 1;
                listener.on_progress(*completed, total, &outcome);
                slots[index] = Some(outcome);
            }
        }

        slots.into_iter().flatten().collect()
    }

    /// Persists the session; failures are logged and the run continues in memory
    fn checkpoint(&self, session: &Session) {
        if let Err(e) = self.store.save_session(session) {
            tracing::warn!("Failed to checkpoint session {}: {}", session.id, e);
        }
    }
}
