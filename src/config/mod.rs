//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command line flags / environment (PORT, SERVICE_VERSION, ...)
//!     → loader.rs (clap parse into GatewayArgs)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared by value / Arc with all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults so an empty environment is a valid setup
//! - Validation separates syntactic (clap) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_env_file, load_env_file_from, ConfigError, GatewayArgs};
pub use schema::{
    AuxiliaryConfig, GatewayConfig, ListenerConfig, LogFormat, ObservabilityConfig, ServiceConfig,
};
