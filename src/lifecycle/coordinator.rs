//! Process lifecycle state machine.
//!
//! # States
//! ```text
//! Running ──signal──▶ Draining ──listeners done──▶ Terminated (exit 0)
//!                         └──────deadline────────▶ Terminated (exit 1)
//! ```
//!
//! A listener that stops on its own while Running is fatal: the other one is
//! drained the same way and the process exits with 1.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::ServiceConfig;
use crate::forward::Forwarder;
use crate::http::HealthServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::startup::Listeners;
use crate::rpc::{RpcError, RpcServer};

/// Lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Draining,
    Terminated,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Running => write!(f, "running"),
            Phase::Draining => write!(f, "draining"),
            Phase::Terminated => write!(f, "terminated"),
        }
    }
}

/// How the process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Both listeners drained before the deadline.
    Clean,
    /// The drain deadline elapsed; in-flight work was abandoned.
    TimedOut,
    /// A listener stopped without being asked to.
    ListenerFailed,
}

impl ExitOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            ExitOutcome::Clean => 0,
            ExitOutcome::TimedOut | ExitOutcome::ListenerFailed => 1,
        }
    }
}

/// Why a listener stopped serving.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("grpc server failed: {0}")]
    Rpc(#[from] RpcError),

    #[error("health server failed: {0}")]
    Health(#[from] std::io::Error),
}

/// A spawned listener that can be awaited more than once.
struct ServerTask {
    name: &'static str,
    handle: JoinHandle<Result<(), ServeError>>,
    finished: bool,
}

impl ServerTask {
    fn spawn<F>(name: &'static str, server: F) -> Self
    where
        F: Future<Output = Result<(), ServeError>> + Send + 'static,
    {
        Self {
            name,
            handle: tokio::spawn(server),
            finished: false,
        }
    }

    /// Wait for the listener to stop and log how it ended. Cancel-safe;
    /// returns immediately once the task has been observed finishing.
    async fn join(&mut self) {
        if self.finished {
            return;
        }
        let result = (&mut self.handle).await;
        self.finished = true;
        match result {
            Ok(Ok(())) => tracing::info!(listener = self.name, "Listener finished"),
            Ok(Err(e)) => tracing::error!(listener = self.name, error = %e, "Listener failed"),
            Err(e) => tracing::error!(listener = self.name, error = %e, "Listener task panicked"),
        }
    }

    fn abort(&self) {
        if !self.finished {
            self.handle.abort();
        }
    }
}

/// Runs both listeners and drives the shutdown sequence.
pub struct Coordinator {
    forwarder: Arc<Forwarder>,
    drain_timeout: Duration,
}

impl Coordinator {
    pub fn new(config: &ServiceConfig, forwarder: Arc<Forwarder>) -> Self {
        Self::with_drain_timeout(forwarder, config.lifecycle.drain_timeout())
    }

    pub fn with_drain_timeout(forwarder: Arc<Forwarder>, drain_timeout: Duration) -> Self {
        Self {
            forwarder,
            drain_timeout,
        }
    }

    /// Serve until `terminate` resolves, then drain within the deadline.
    pub async fn run<S>(self, listeners: Listeners, terminate: S) -> ExitOutcome
    where
        S: Future<Output = ()>,
    {
        let Listeners {
            grpc: grpc_listener,
            health: health_listener,
        } = listeners;
        let shutdown = Shutdown::new();

        let rpc = RpcServer::new(self.forwarder.clone());
        let rpc_shutdown = shutdown.subscribe();
        let mut rpc_task = ServerTask::spawn("grpc", async move {
            rpc.run(grpc_listener, rpc_shutdown).await.map_err(ServeError::from)
        });

        let health = HealthServer::new();
        let health_shutdown = shutdown.subscribe();
        let mut health_task = ServerTask::spawn("health", async move {
            health.run(health_listener, health_shutdown).await.map_err(ServeError::from)
        });

        log_phase(Phase::Running);

        let signalled = tokio::select! {
            () = terminate => true,
            () = rpc_task.join() => false,
            () = health_task.join() => false,
        };

        log_phase(Phase::Draining);
        let told = shutdown.trigger();
        tracing::debug!(listeners = told, deadline = ?self.drain_timeout, "Drain requested");

        let drained = tokio::select! {
            biased;
            () = tokio::time::sleep(self.drain_timeout) => false,
            () = async {
                rpc_task.join().await;
                health_task.join().await;
            } => true,
        };

        let outcome = if !drained {
            tracing::error!(deadline = ?self.drain_timeout, "Error shutting down, abandoning in-flight work");
            rpc_task.abort();
            health_task.abort();
            ExitOutcome::TimedOut
        } else if signalled {
            tracing::info!("Successfully shut down");
            ExitOutcome::Clean
        } else {
            ExitOutcome::ListenerFailed
        };

        log_phase(Phase::Terminated);
        outcome
    }
}

fn log_phase(phase: Phase) {
    tracing::info!(%phase, "Lifecycle phase");
}
