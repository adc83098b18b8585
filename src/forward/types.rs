//! Forwarding request and response types.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use crate::forward::error::ForwardError;

/// HTTP verbs the worker will forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl FromStr for Method {
    type Err = ForwardError;

    /// Verbs are matched exactly; `get` is not `GET`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            other => Err(ForwardError::UnsupportedMethod(other.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One HTTP operation requested by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardRequest {
    /// Verb as supplied; validated by the forwarder.
    pub method: String,
    /// Absolute target URL.
    pub url: String,
    /// Headers to send, by name as supplied.
    pub headers: HashMap<String, String>,
    /// Request body. Empty means no body.
    pub body: String,
}

/// The origin's answer, ready to hand back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardResponse {
    /// `true` iff `status` is in 200..=299.
    pub ok: bool,
    /// The URL that was requested. Redirects followed by the client do not
    /// change it.
    pub url: String,
    pub status: u16,
    /// Status line, e.g. `"404 Not Found"`.
    pub status_text: String,
    pub body: String,
    /// Lower-cased header name to every value received for it.
    pub headers: HashMap<String, Vec<String>>,
}

/// Whether `status` counts as success.
pub fn is_ok(status: u16) -> bool {
    (200..=299).contains(&status)
}

/// Render a status as a status line.
pub fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

/// Collect response headers under lower-cased names. Repeated headers keep
/// every value in the order received.
pub fn collect_headers(headers: &HeaderMap) -> HashMap<String, Vec<String>> {
    let mut collected: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in headers {
        collected
            .entry(name.as_str().to_ascii_lowercase())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    collected
}
