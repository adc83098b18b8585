//! gRPC HTTP worker library.
//!
//! Callers send `pb.Workers/DoRequest` with a method, URL, headers and body;
//! the worker performs that HTTP request against the origin, paced by a
//! process-wide rate limit, and returns the origin's response.
//!
//! ```text
//!   caller ──gRPC──▶ rpc ──▶ forward ──▶ admission ──▶ http::client ──▶ origin
//!                                                                          │
//!   caller ◀─gRPC─── rpc ◀── forward (translate status/body/headers) ◀─────┘
//!
//!   orchestrator ──GET /ping──▶ http::server
//!   SIGINT/SIGTERM ──▶ lifecycle (drain both listeners, bounded by a deadline)
//! ```

// Core subsystems
pub mod admission;
pub mod forward;
pub mod http;
pub mod rpc;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use forward::{ForwardError, ForwardRequest, ForwardResponse, Forwarder};
pub use lifecycle::{Coordinator, ExitOutcome};
