//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound (client.rs):
//!     Forwarder → OriginClient (pooled, fixed timeouts) → origin server
//!
//! Inbound (server.rs):
//!     Orchestrator probe → GET /ping → 200 Pong
//! ```

pub mod client;
pub mod server;

pub use client::OriginClient;
pub use server::HealthServer;
