//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the shared forwarder (client, limiter, user agent) from config
//! - Bind both listeners before any traffic is served
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and maps to exit code 1
//! - Listeners bind last, after everything they hand work to exists

use std::net::SocketAddr;

use reqwest::header::HeaderValue;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::admission;
use crate::config::{ConfigError, ListenerConfig, ServiceConfig};
use crate::forward::Forwarder;
use crate::http::OriginClient;

/// Fatal problems before the service starts serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to bind {name} listener on {address}: {source}")]
    ListenerBind {
        name: &'static str,
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid user agent {0:?}")]
    UserAgent(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("failed to install signal handlers: {0}")]
    Signals(#[source] std::io::Error),
}

/// Both bound listeners, ready to serve.
#[derive(Debug)]
pub struct Listeners {
    pub grpc: TcpListener,
    pub health: TcpListener,
}

impl Listeners {
    pub fn grpc_addr(&self) -> std::io::Result<SocketAddr> {
        self.grpc.local_addr()
    }

    pub fn health_addr(&self) -> std::io::Result<SocketAddr> {
        self.health.local_addr()
    }
}

/// Bind the gRPC and liveness ports.
pub async fn bind_listeners(config: &ListenerConfig) -> Result<Listeners, StartupError> {
    let grpc = bind("grpc", config.grpc_address()).await?;
    let health = bind("health", config.health_address()).await?;
    Ok(Listeners { grpc, health })
}

async fn bind(name: &'static str, address: String) -> Result<TcpListener, StartupError> {
    match TcpListener::bind(&address).await {
        Ok(listener) => {
            let bound = listener.local_addr().map_err(|source| StartupError::ListenerBind {
                name,
                address: address.clone(),
                source,
            })?;
            tracing::info!(listener = name, address = %bound, "Listener bound");
            Ok(listener)
        }
        Err(source) => Err(StartupError::ListenerBind {
            name,
            address,
            source,
        }),
    }
}

/// Build the forwarder every RPC call shares.
pub fn build_forwarder(config: &ServiceConfig) -> Result<Forwarder, StartupError> {
    let forwarding = &config.forwarding;
    let user_agent = HeaderValue::from_str(&forwarding.user_agent)
        .map_err(|_| StartupError::UserAgent(forwarding.user_agent.clone()))?;
    tracing::info!(user_agent = %forwarding.user_agent, "Default User-Agent set");

    let client = OriginClient::new(&config.client)?;
    let admission = admission::from_rate(forwarding.request_limit, forwarding.burst);

    Ok(Forwarder::new(client, admission, user_agent))
}
