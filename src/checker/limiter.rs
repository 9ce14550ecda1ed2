//! Concurrency limiter
//!
//! A counting semaphore bounding the number of in-flight probes. Waiters are
//! served in strict FIFO order, and a released permit is handed directly to the
//! oldest waiter instead of returning to the free pool. Permits are only created
//! at construction, so at most `capacity` permits are ever outstanding.

use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// Default number of simultaneous probes
pub const DEFAULT_CONCURRENCY: usize = 5;

/// FIFO counting semaphore
#[derive(Debug, Clone)]
pub struct Limiter {
    semaphore: Arc<Semaphore>,
}

/// One unit of concurrency capacity; released on drop
#[derive(Debug)]
pub struct LimiterPermit {
    _permit: OwnedSemaphorePermit,
}

impl LimiterPermit {
    /// Releases the permit, waking the oldest waiter if there is one
    pub fn release(self) {}
}

impl Limiter {
    /// Creates a limiter with `capacity` permits (at least one)
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity.max(1))),
        }
    }

    /// Waits for a free permit
    ///
    /// Returns immediately when a permit is free, otherwise suspends the caller
    /// until every earlier waiter has been served.
    pub async fn acquire(&self) -> Result<LimiterPermit, AcquireError> {
        let permit = self.semaphore.clone().acquire_owned().await?;
        Ok(LimiterPermit { _permit: permit })
    }
}

impl Default for Limiter {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}
