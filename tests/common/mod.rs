//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use http_worker::admission::{Admission, Unlimited};
use http_worker::config::{ClientConfig, ListenerConfig};
use http_worker::http::OriginClient;
use http_worker::lifecycle::{bind_listeners, Coordinator, ExitOutcome};
use http_worker::rpc::{WorkerRequest, WorkersClient};
use http_worker::Forwarder;
use reqwest::header::HeaderValue;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const DEFAULT_AGENT: &str = "worker-test/1.0";

/// Admission fake that counts acquisitions and never blocks.
#[derive(Debug, Default)]
pub struct CountingAdmission {
    acquired: AtomicUsize,
}

impl CountingAdmission {
    pub fn count(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Admission for CountingAdmission {
    async fn acquire(&self) {
        self.acquired.fetch_add(1, Ordering::SeqCst);
    }
}

/// Forwarder with default transport settings and the given limiter.
pub fn forwarder_with(admission: Arc<dyn Admission>) -> Forwarder {
    Forwarder::new(
        OriginClient::new(&ClientConfig::default()).unwrap(),
        admission,
        HeaderValue::from_static(DEFAULT_AGENT),
    )
}

pub fn forwarder() -> Forwarder {
    forwarder_with(Arc::new(Unlimited))
}

pub fn request(method: &str, url: String) -> WorkerRequest {
    WorkerRequest {
        method: method.to_string(),
        url,
        ..Default::default()
    }
}

/// A worker running on ephemeral ports.
pub struct RunningWorker {
    pub grpc_addr: SocketAddr,
    pub health_addr: SocketAddr,
    terminate: Option<oneshot::Sender<()>>,
    pub outcome: JoinHandle<ExitOutcome>,
}

impl RunningWorker {
    pub async fn client(&self) -> WorkersClient<tonic::transport::Channel> {
        WorkersClient::connect(format!("http://{}", self.grpc_addr))
            .await
            .expect("worker unreachable")
    }

    /// Simulate SIGTERM.
    pub fn terminate(&mut self) {
        if let Some(tx) = self.terminate.take() {
            let _ = tx.send(());
        }
    }
}

/// Start both listeners with the given drain deadline.
pub async fn start_worker(drain_timeout: Duration) -> RunningWorker {
    let listeners = bind_listeners(&ListenerConfig {
        host: "127.0.0.1".into(),
        grpc_port: 0,
        health_port: 0,
    })
    .await
    .unwrap();
    let grpc_addr = listeners.grpc_addr().unwrap();
    let health_addr = listeners.health_addr().unwrap();

    let coordinator = Coordinator::with_drain_timeout(Arc::new(forwarder()), drain_timeout);
    let (tx, rx) = oneshot::channel::<()>();
    let outcome = tokio::spawn(async move {
        coordinator
            .run(listeners, async move {
                let _ = rx.await;
            })
            .await
    });

    RunningWorker {
        grpc_addr,
        health_addr,
        terminate: Some(tx),
        outcome,
    }
}
