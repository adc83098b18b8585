//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde and clap handle syntactic)
//! - Validate value ranges (timeouts > 0, thread counts > 0)
//! - Detect conflicting listener ports
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use reqwest::header::HeaderValue;
use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("a default user agent is required (SW_USER_AGENT)")]
    MissingUserAgent,

    #[error("user agent {0:?} is not a valid header value")]
    InvalidUserAgent(String),

    #[error("grpc and health listeners both use port {0}")]
    PortConflict(u16),

    #[error("runtime.worker_threads must be at least 1")]
    NoWorkerThreads,

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Check `config` for semantic errors, reporting every one found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let user_agent = &config.forwarding.user_agent;
    if user_agent.trim().is_empty() {
        errors.push(ValidationError::MissingUserAgent);
    } else if HeaderValue::from_str(user_agent).is_err() {
        errors.push(ValidationError::InvalidUserAgent(user_agent.clone()));
    }

    let listener = &config.listener;
    if listener.grpc_port != 0 && listener.grpc_port == listener.health_port {
        errors.push(ValidationError::PortConflict(listener.grpc_port));
    }

    if config.runtime.worker_threads == 0 {
        errors.push(ValidationError::NoWorkerThreads);
    }

    let client = &config.client;
    let timeouts = [
        ("client.dial_timeout_secs", client.dial_timeout_secs),
        ("client.response_timeout_secs", client.response_timeout_secs),
        ("lifecycle.drain_timeout_ms", config.lifecycle.drain_timeout_ms),
    ];
    for (name, value) in timeouts {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ServiceConfig {
        let mut config = ServiceConfig::default();
        config.forwarding.user_agent = "worker-test/1.0".into();
        config
    }

    #[test]
    fn defaults_with_user_agent_are_valid() {
        assert_eq!(validate_config(&valid()), Ok(()));
    }

    #[test]
    fn zero_rate_limit_is_allowed() {
        let mut config = valid();
        config.forwarding.request_limit = 0;
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn reports_every_error() {
        let mut config = ServiceConfig::default();
        config.listener.health_port = config.listener.grpc_port;
        config.runtime.worker_threads = 0;
        config.lifecycle.drain_timeout_ms = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::MissingUserAgent,
                ValidationError::PortConflict(50051),
                ValidationError::NoWorkerThreads,
                ValidationError::ZeroTimeout("lifecycle.drain_timeout_ms"),
            ]
        );
    }

    #[test]
    fn rejects_user_agent_with_control_characters() {
        let mut config = valid();
        config.forwarding.user_agent = "bad\nagent".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidUserAgent(_)));
    }
}
