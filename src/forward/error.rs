//! Forwarding errors.

use thiserror::Error;

/// Why a single forwarding call failed. Scoped to that call only.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The verb is not one of GET, POST, PUT, DELETE.
    #[error("we don't support {0} method at this time")]
    UnsupportedMethod(String),

    /// The target is not an absolute URL.
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A caller header name or value cannot be sent over HTTP.
    #[error("invalid header {0:?}")]
    InvalidHeader(String),

    /// The outbound call failed (connect, DNS, TLS, timeout, body read).
    #[error("origin unreachable: {0}")]
    OriginUnreachable(#[source] reqwest::Error),
}

impl ForwardError {
    /// Short label used in metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ForwardError::UnsupportedMethod(_) => "unsupported_method",
            ForwardError::InvalidUrl { .. } => "invalid_url",
            ForwardError::InvalidHeader(_) => "invalid_header",
            ForwardError::OriginUnreachable(_) => "origin_unreachable",
        }
    }
}
