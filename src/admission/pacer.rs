//! Leaky-bucket pacing limiter.
//!
//! Every admission reserves the next free slot on a shared schedule spaced
//! one interval (`1s / rate`) apart, then sleeps until that slot. A limiter
//! that has been idle may hand out up to `burst` slots immediately, but the
//! long-run admission rate never exceeds `rate`.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::admission::Admission;
use crate::observability::metrics;

/// Process-wide pacing limiter.
#[derive(Debug)]
pub struct Pacer {
    /// Spacing between consecutive admissions.
    interval: Duration,
    /// Unused capacity an idle limiter may bank.
    slack: Duration,
    /// Earliest instant the next admission may pass.
    next_slot: Mutex<Option<Instant>>,
}

impl Pacer {
    /// Create a pacer admitting `rate` calls per second.
    ///
    /// Returns `None` for a rate of zero, which means "unlimited".
    pub fn new(rate: u32, burst: u32) -> Option<Self> {
        if rate == 0 {
            return None;
        }
        let interval = Duration::from_secs(1) / rate;
        Some(Self {
            interval,
            slack: interval * burst,
            next_slot: Mutex::new(None),
        })
    }

    /// Spacing between admissions.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Claim the next slot on the schedule. The lock is held only for the
    /// bookkeeping; callers sleep outside it.
    fn reserve(&self, now: Instant) -> Instant {
        let mut next_slot = self
            .next_slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let floor = now.checked_sub(self.slack).unwrap_or(now);
        let slot = match *next_slot {
            Some(next) if next > floor => next,
            _ => floor,
        };
        *next_slot = Some(slot + self.interval);
        slot
    }
}

#[async_trait]
impl Admission for Pacer {
    async fn acquire(&self) {
        let now = Instant::now();
        let slot = self.reserve(now);
        if slot > now {
            tokio::time::sleep_until(slot).await;
            metrics::record_admission_wait(slot - now);
        }
    }
}
