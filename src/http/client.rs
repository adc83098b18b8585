//! Outbound HTTP transport.
//!
//! # Responsibilities
//! - Own the pooled connection set shared by every forwarding call
//! - Apply the transport timeouts fixed at startup
//! - Identify this service with a `Via` header
//!
//! # Design Decisions
//! - One client per process; cloning shares the pool
//! - No per-call overrides of transport settings
//! - The TLS handshake budget is folded into the connect timeout, since the
//!   connector covers TCP and TLS together

use reqwest::header::{HeaderMap, HeaderValue, VIA};

use crate::config::ClientConfig;

/// `Via` value identifying this worker on outbound calls.
pub const VIA_VALUE: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Pooled HTTP client used for all origin calls.
#[derive(Debug, Clone)]
pub struct OriginClient {
    inner: reqwest::Client,
}

impl OriginClient {
    /// Build the client from transport settings.
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(VIA, HeaderValue::from_static(VIA_VALUE));

        let inner = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout())
            .tcp_keepalive(config.keep_alive())
            .pool_idle_timeout(config.idle_timeout())
            .pool_max_idle_per_host(config.max_idle_per_host)
            .read_timeout(config.response_timeout())
            .build()?;

        tracing::debug!(
            connect_timeout = ?config.connect_timeout(),
            keep_alive = ?config.keep_alive(),
            idle_timeout = ?config.idle_timeout(),
            max_idle_per_host = config.max_idle_per_host,
            response_timeout = ?config.response_timeout(),
            "Origin client configured"
        );

        Ok(Self { inner })
    }

    /// Start building a request.
    pub fn request(&self, method: reqwest::Method, url: url::Url) -> reqwest::RequestBuilder {
        self.inner.request(method, url)
    }
}
