//! http-worker: performs HTTP requests on behalf of gRPC callers.
//!
//! Startup order: flags → config → logging → runtime → signal handlers →
//! forwarder → listeners.
//! Any failure before serving exits with 1; afterwards the exit code comes
//! from the lifecycle coordinator.

use std::sync::Arc;

use clap::error::ErrorKind;
use clap::Parser;

use http_worker::config::{load_config, Cli, ServiceConfig};
use http_worker::lifecycle::{self, Coordinator, ExitOutcome, StartupError, TerminationSignals};
use http_worker::observability::{logging, metrics};

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            return 1;
        }
    };

    let loaded = load_config(&cli);
    logging::init(match &loaded {
        Ok(config) => config.observability.log_format,
        Err(_) => cli.log_format.unwrap_or_default(),
    });
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "http-worker starting");

    let config = match loaded {
        Ok(config) => Arc::new(config),
        Err(e) => {
            tracing::error!(error = %StartupError::from(e), "Invalid configuration");
            return 1;
        }
    };

    tracing::info!(
        grpc_port = config.listener.grpc_port,
        health_port = config.listener.health_port,
        request_limit = config.forwarding.request_limit,
        worker_threads = config.runtime.worker_threads,
        drain_timeout = ?config.lifecycle.drain_timeout(),
        "Configuration loaded"
    );

    let runtime = match lifecycle::build_runtime(&config.runtime) {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return 1;
        }
    };

    match lifecycle::run_to_exit(runtime, serve(config)) {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            1
        }
    }
}

async fn serve(config: Arc<ServiceConfig>) -> Result<ExitOutcome, StartupError> {
    let signals = TerminationSignals::register().map_err(StartupError::Signals)?;

    if let Some(addr) = config.observability.metrics_address {
        metrics::init_metrics(addr)?;
    }

    let forwarder = Arc::new(lifecycle::build_forwarder(&config)?);
    let listeners = lifecycle::bind_listeners(&config.listener).await?;

    let coordinator = Coordinator::new(&config, forwarder);
    Ok(coordinator.run(listeners, signals.terminated()).await)
}
