//! Configuration loading from flags, environment and an optional file.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Parser;
use thiserror::Error;

use crate::config::schema::{LogFormat, ServiceConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Command-line flags. Every flag can also be set through its environment
/// variable; both override values from the config file.
#[derive(Debug, Parser)]
#[command(name = "http-worker", version, about = "gRPC worker that performs HTTP requests for its callers")]
pub struct Cli {
    /// Optional TOML config file.
    #[arg(long, env = "SW_CONFIG")]
    pub config: Option<PathBuf>,

    /// gRPC listen port [default: 50051].
    #[arg(long, env = "SW_GRPC_PORT")]
    pub grpc_port: Option<u16>,

    /// Liveness listen port [default: 8080].
    #[arg(long, env = "SW_HEALTH_PORT")]
    pub health_port: Option<u16>,

    /// Default outbound User-Agent. Required here or in the config file.
    #[arg(long, env = "SW_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Outbound calls per second, 0 disables limiting [default: 700].
    #[arg(long, env = "SW_REQUEST_LIMIT")]
    pub request_limit: Option<u32>,

    /// Runtime worker threads [default: 1].
    #[arg(long, env = "SW_MAX_PROCS")]
    pub max_procs: Option<usize>,

    /// Log output format.
    #[arg(long, env = "SW_LOG_FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,

    /// Prometheus exporter address, e.g. 0.0.0.0:9090.
    #[arg(long, env = "SW_METRICS_ADDRESS")]
    pub metrics_address: Option<SocketAddr>,
}

impl Cli {
    /// Overlay the values given on the command line onto `config`.
    pub fn apply(&self, config: &mut ServiceConfig) {
        if let Some(port) = self.grpc_port {
            config.listener.grpc_port = port;
        }
        if let Some(port) = self.health_port {
            config.listener.health_port = port;
        }
        if let Some(user_agent) = &self.user_agent {
            config.forwarding.user_agent = user_agent.clone();
        }
        if let Some(limit) = self.request_limit {
            config.forwarding.request_limit = limit;
        }
        if let Some(threads) = self.max_procs {
            config.runtime.worker_threads = threads;
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
        if let Some(addr) = self.metrics_address {
            config.observability.metrics_address = Some(addr);
        }
    }
}

/// Parse a TOML document into a (not yet validated) config.
pub fn parse_config(content: &str) -> Result<ServiceConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

fn read_config_file(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Build the effective configuration: defaults, then the optional file,
/// then flags and environment. The result is validated before returning.
pub fn load_config(cli: &Cli) -> Result<ServiceConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => read_config_file(path)?,
        None => ServiceConfig::default(),
    };
    cli.apply(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
