//! Single-link validator
//!
//! Resolves one `LinkDescriptor` to one `ValidationOutcome`. The validator never
//! fails: every failure path is converted into a `timeout` or `network_error`
//! outcome so the batch carries on.
//!
//! # Request Flow
//!
//! 1. If the run was cancelled before starting → `network_error` / "Cancelled"
//! 2. Send a HEAD request, bounded by the per-attempt timeout and the run's
//!    cancellation token
//! 3. HEAD answered 405 (or 400) → retry with GET on a fresh timeout
//! 4. HEAD failed at the transport level → retry once with GET
//! 5. Any response → classify and describe it
//! 6. Both attempts failed → cancelled, timeout, or network error

use crate::checker::classify::{classify, describe, describe_category, StatusCategory};
use crate::checker::transport::{ProbeMethod, Transport, TransportError};
use crate::state::{LinkDescriptor, ValidationOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default per-attempt timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const CANCELLED: &str = "Cancelled";

/// Why a single probe attempt produced no response
#[derive(Debug)]
enum ProbeFailure {
    Cancelled,
    TimedOut,
    Transport(TransportError),
}

impl ProbeFailure {
    /// Returns true if the failure signals that a timer fired
    fn is_timeout(&self) -> bool {
        match self {
            Self::TimedOut => true,
            Self::Cancelled => false,
            Self::Transport(e) => {
                let message = e.message.to_ascii_lowercase();
                e.timed_out
                    || message.contains("timeout")
                    || message.contains("timed out")
                    || message.contains("abort")
            }
        }
    }
}

/// Probes links over a `Transport`
#[derive(Clone)]
pub struct Validator {
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl Validator {
    pub fn new(transport: Arc<dyn Transport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Validates one link
    ///
    /// Each attempt gets its own full timeout, so a link can take up to twice the
    /// configured timeout when the fallback is used.
    pub async fn validate(
        &self,
        link: &LinkDescriptor,
        cancel: &CancellationToken,
    ) -> ValidationOutcome {
        if cancel.is_cancelled() {
            return cancelled(link);
        }

        let result = match self.attempt(&link.url, ProbeMethod::Head, cancel).await {
            Ok(status) if status == 405 || status == 400 => {
                tracing::debug!("HEAD {} returned {}, retrying with GET", link.url, status);
                self.attempt(&link.url, ProbeMethod::Get, cancel).await
            }
            Ok(status) => Ok(status),
            Err(ProbeFailure::Cancelled) => Err(ProbeFailure::Cancelled),
            Err(failure) => {
                tracing::debug!("HEAD {} failed ({:?}), retrying with GET", link.url, failure);
                self.attempt(&link.url, ProbeMethod::Get, cancel).await
            }
        };

        match result {
            Ok(status) => {
                let category = classify(Some(status));
                tracing::debug!("{} -> {} ({})", link.url, status, category);
                ValidationOutcome::for_link(link, Some(status), category, describe(status))
            }
            Err(_) if cancel.is_cancelled() => cancelled(link),
            Err(failure) if failure.is_timeout() => {
                tracing::debug!("{} timed out", link.url);
                ValidationOutcome::for_link(
                    link,
                    None,
                    StatusCategory::Timeout,
                    describe_category(StatusCategory::Timeout),
                )
            }
            Err(failure) => {
                let message = match failure {
                    ProbeFailure::Transport(e) if !e.message.is_empty() => e.message,
                    _ => describe_category(StatusCategory::NetworkError).to_string(),
                };
                tracing::debug!("{} failed: {}", link.url, message);
                ValidationOutcome::for_link(link, None, StatusCategory::NetworkError, message)
            }
        }
    }

    /// Runs one attempt, racing the request against the timer and the token
    async fn attempt(
        &self,
        url: &str,
        method: ProbeMethod,
        cancel: &CancellationToken,
    ) -> Result<u16, ProbeFailure> {
        let request = tokio::time::timeout(self.timeout, self.transport.send(url, method));
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ProbeFailure::Cancelled),
            result = request => match result {
                Ok(Ok(status)) => Ok(status),
                Ok(Err(e)) => Err(ProbeFailure::Transport(e)),
                Err(_) => Err(ProbeFailure::TimedOut),
            },
        }
    }
}

fn cancelled(link: &LinkDescriptor) -> ValidationOutcome {
    ValidationOutcome::for_link(link, None, StatusCategory::NetworkError, CANCELLED)
}
