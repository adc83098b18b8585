//! OS signal handling.
//!
//! SIGINT and SIGTERM both start a graceful drain. Handlers are installed
//! by [`TerminationSignals::register`], before any other startup work, so a
//! signal arriving early is queued instead of killing the process. Only the
//! first signal is consumed; the coordinator owns everything after that.

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

/// Installed SIGINT/SIGTERM handlers.
#[derive(Debug)]
pub struct TerminationSignals {
    #[cfg(unix)]
    terminate: Signal,
    #[cfg(unix)]
    interrupt: Signal,
}

impl TerminationSignals {
    /// Install the handlers. Must be called from within the Tokio runtime.
    #[cfg(unix)]
    pub fn register() -> std::io::Result<Self> {
        Ok(Self {
            terminate: signal(SignalKind::terminate())?,
            interrupt: signal(SignalKind::interrupt())?,
        })
    }

    #[cfg(not(unix))]
    pub fn register() -> std::io::Result<Self> {
        Ok(Self {})
    }

    /// Resolve on the first SIGINT or SIGTERM, returning its name.
    #[cfg(unix)]
    pub async fn recv(&mut self) -> &'static str {
        let name = tokio::select! {
            _ = self.terminate.recv() => "SIGTERM",
            _ = self.interrupt.recv() => "SIGINT",
        };
        tracing::info!(signal = name, "Caught signal");
        name
    }

    #[cfg(not(unix))]
    pub async fn recv(&mut self) -> &'static str {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!(signal = "SIGINT", "Caught signal"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGINT");
                std::future::pending::<()>().await;
            }
        }
        "SIGINT"
    }

    /// Consume the handlers, resolving on the first signal.
    pub async fn terminated(mut self) {
        self.recv().await;
    }
}
