//! Admission control for outbound calls.
//!
//! # Data Flow
//! ```text
//! Forwarder::forward
//!     → Admission::acquire (may sleep until a slot is free)
//!     → outbound HTTP call
//! ```
//!
//! # Design Decisions
//! - One limiter for the whole process, shared by every forwarding call
//! - Blocking is the only backpressure; there is no queue and no rejection
//! - A rate of zero swaps in `Unlimited`, whose acquire returns immediately

pub mod pacer;

use std::sync::Arc;

use async_trait::async_trait;

pub use pacer::Pacer;

/// Gate that every outbound call passes through.
#[async_trait]
pub trait Admission: Send + Sync + std::fmt::Debug {
    /// Wait until one more call may proceed. Never fails.
    async fn acquire(&self);
}

/// Admission that lets everything through.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unlimited;

#[async_trait]
impl Admission for Unlimited {
    async fn acquire(&self) {}
}

/// Build the process-wide limiter for `rate` calls per second.
///
/// `burst` is the number of intervals an idle limiter may bank.
pub fn from_rate(rate: u32, burst: u32) -> Arc<dyn Admission> {
    match Pacer::new(rate, burst) {
        Some(pacer) => {
            tracing::info!(rate, burst, "Rate limit enabled");
            Arc::new(pacer)
        }
        None => {
            tracing::warn!("Rate limit of 0 disables admission control; this is not recommended");
            Arc::new(Unlimited)
        }
    }
}
