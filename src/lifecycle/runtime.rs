//! Tokio runtime construction and teardown.

use std::future::Future;

use tokio::runtime::{Builder, Runtime};

use crate::config::RuntimeConfig;
use crate::lifecycle::startup::StartupError;

/// Multi-thread runtime sized by the worker thread hint.
pub fn build_runtime(config: &RuntimeConfig) -> Result<Runtime, StartupError> {
    Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .enable_all()
        .build()
        .map_err(StartupError::Runtime)
}

/// Drive `future` to completion, then drop the runtime without waiting on
/// tasks still running on it.
///
/// Dropping a runtime normally joins its blocking pool. A forwarding call
/// abandoned at the drain deadline may still hold a blocking thread (a DNS
/// lookup, for one), which would hold up the exit.
pub fn run_to_exit<F: Future>(runtime: Runtime, future: F) -> F::Output {
    let output = runtime.block_on(future);
    runtime.shutdown_background();
    output
}
