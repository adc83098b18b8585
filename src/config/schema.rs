//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the worker.
//! All types derive Serde traits so an optional TOML file can supply any
//! section; command-line flags and environment variables are layered on top
//! by the loader.

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the worker.
///
/// Built once at startup, validated, then shared read-only via `Arc`.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listening ports for the gRPC and liveness servers.
    pub listener: ListenerConfig,

    /// Forwarding behaviour (user agent, rate limit).
    pub forwarding: ForwardingConfig,

    /// Outbound HTTP transport tuning.
    pub client: ClientConfig,

    /// Runtime scheduler settings.
    pub runtime: RuntimeConfig,

    /// Shutdown behaviour.
    pub lifecycle: LifecycleConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host both listeners bind to.
    pub host: String,

    /// gRPC listen port.
    pub grpc_port: u16,

    /// Liveness (`/ping`) listen port.
    pub health_port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            grpc_port: 50051,
            health_port: 8080,
        }
    }
}

impl ListenerConfig {
    /// Socket address string for the gRPC listener.
    pub fn grpc_address(&self) -> String {
        format!("{}:{}", self.host, self.grpc_port)
    }

    /// Socket address string for the liveness listener.
    pub fn health_address(&self) -> String {
        format!("{}:{}", self.host, self.health_port)
    }
}

/// Forwarding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// User-Agent injected when the caller supplies none. Required.
    pub user_agent: String,

    /// Outbound calls per second. `0` disables admission control.
    pub request_limit: u32,

    /// How many intervals of unused capacity an idle limiter may bank.
    pub burst: u32,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            request_limit: 700,
            burst: 10,
        }
    }
}

/// Outbound HTTP transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// TCP connect timeout in seconds.
    pub dial_timeout_secs: u64,

    /// TCP keep-alive interval in seconds.
    pub keep_alive_secs: u64,

    /// How long an idle pooled connection is kept, in seconds.
    pub idle_timeout_secs: u64,

    /// Maximum idle connections kept per origin host.
    pub max_idle_per_host: usize,

    /// TLS handshake budget in seconds, added on top of the dial timeout.
    pub tls_handshake_timeout_secs: u64,

    /// Maximum wait for the origin between reads, in seconds.
    pub response_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            dial_timeout_secs: 60,
            keep_alive_secs: 60,
            idle_timeout_secs: 60,
            max_idle_per_host: 40,
            tls_handshake_timeout_secs: 20,
            response_timeout_secs: 20,
        }
    }
}

impl ClientConfig {
    /// Time allowed to establish a connection, TLS included.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.dial_timeout_secs + self.tls_handshake_timeout_secs)
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs)
    }
}

/// Runtime scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Number of Tokio worker threads.
    pub worker_threads: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { worker_threads: 1 }
    }
}

/// Shutdown configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Deadline for draining both listeners, in milliseconds.
    pub drain_timeout_ms: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            drain_timeout_ms: 9_000,
        }
    }
}

impl LifecycleConfig {
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log output format.
    pub log_format: LogFormat,

    /// Prometheus exporter bind address. Disabled when unset.
    pub metrics_address: Option<SocketAddr>,
}
