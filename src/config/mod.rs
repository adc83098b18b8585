//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → flags / SW_* environment (loader.rs, clap)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never changes afterwards
//! - All fields have defaults except the user agent
//! - Validation separates syntactic (serde, clap) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, Cli, ConfigError};
pub use schema::{
    ClientConfig, ForwardingConfig, LifecycleConfig, ListenerConfig, LogFormat,
    ObservabilityConfig, RuntimeConfig, ServiceConfig,
};
