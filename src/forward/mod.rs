//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! ForwardRequest (from the RPC layer)
//!     → validate method, URL, headers (no side effects on failure)
//!     → default User-Agent
//!     → admission (may block)
//!     → one outbound HTTP call, no retries
//!     → ForwardResponse (status, status line, body, lower-cased headers)
//! ```

pub mod error;
pub mod service;
pub mod types;

pub use error::ForwardError;
pub use service::Forwarder;
pub use types::{ForwardRequest, ForwardResponse, Method};
