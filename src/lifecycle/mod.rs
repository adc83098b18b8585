//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → build forwarder → bind both listeners
//!
//! Running / Draining / Terminated (coordinator.rs):
//!     Spawn gRPC + health servers → wait for signal
//!     → Shutdown::trigger (shutdown.rs) → race drain against deadline
//!     → ExitOutcome → exit code
//!
//! Signals (signals.rs):
//!     handlers installed before startup work
//!     SIGTERM/SIGINT → begin drain (first signal only)
//!
//! Runtime (runtime.rs):
//!     build from the worker thread hint; on exit, drop without joining
//! ```
//!
//! # Design Decisions
//! - Fail fast: config and bind errors exit 1 before serving
//! - Shutdown has a deadline: forced exit 1 once it elapses, deadline wins ties
//! - In-flight forwarding calls are never cancelled, only abandoned at exit

pub mod coordinator;
pub mod runtime;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use coordinator::{Coordinator, ExitOutcome, Phase, ServeError};
pub use runtime::{build_runtime, run_to_exit};
pub use shutdown::Shutdown;
pub use signals::TerminationSignals;
pub use startup::{bind_listeners, build_forwarder, Listeners, StartupError};
