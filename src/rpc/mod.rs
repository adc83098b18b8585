//! RPC subsystem.
//!
//! # Data Flow
//! ```text
//! gRPC call pb.Workers/DoRequest
//!     → proto.rs (code generated from proto/worker.proto)
//!     → server.rs (WorkerRequest → ForwardRequest)
//!     → forward::Forwarder
//!     → server.rs (ForwardResponse → WorkerResponse, ForwardError → Status)
//! ```
//!
//! # Design Decisions
//! - Errors travel as gRPC statuses with a readable message, never in the reply
//! - Shutdown stops accepting and lets in-flight calls finish
//! - Server reflection is registered so tools can discover `pb.Workers`

pub mod proto;
pub mod server;

pub use proto::workers_client::WorkersClient;
pub use proto::{Header, Request as WorkerRequest, Response as WorkerResponse};
pub use server::{RpcError, RpcServer, WorkerService};
