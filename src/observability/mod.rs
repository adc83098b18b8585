//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, per-call spans)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → optional Prometheus scrape endpoint
//! ```
//!
//! # Design Decisions
//! - Every forwarding call runs in a span carrying a call id
//! - Metrics exporter is opt-in; the liveness port never serves it

pub mod logging;
pub mod metrics;
