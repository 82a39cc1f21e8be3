//! Configuration loading from flags and the environment.

use std::path::{Path, PathBuf};

use clap::Parser;
use thiserror::Error;

use crate::config::schema::{GatewayConfig, LogFormat};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(#[from] clap::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Command line flags, each falling back to an environment variable.
#[derive(Debug, Parser)]
#[command(name = "main-api")]
#[command(about = "JSON gateway in front of the auxiliary service", long_about = None)]
pub struct GatewayArgs {
    /// TCP port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Version reported as `main-api` in every response
    #[arg(long, env = "SERVICE_VERSION", default_value = "1.0.0")]
    pub service_version: String,

    /// Base URL of the auxiliary service
    #[arg(long, env = "AUXILIARY_SERVICE_URL", default_value = "http://localhost:3001")]
    pub auxiliary_service_url: String,

    /// Default log level when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl GatewayArgs {
    /// Fold the parsed flags into the default configuration.
    pub fn into_config(self) -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.listener.port = self.port;
        config.listener.host = self.host;
        config.service.version = self.service_version;
        config.auxiliary.base_url = self.auxiliary_service_url.trim_end_matches('/').to_string();
        config.observability.log_level = self.log_level;
        config.observability.log_format = self.log_format;
        config
    }
}

/// Parse and validate configuration from the given argument list.
///
/// Pass `std::env::args_os()` in production; tests pass explicit flags.
/// Load a `.env` file from the working directory or its parents.
///
/// Variables already set in the environment win. A missing file is not an
/// error; the path of the loaded file is returned.
pub fn load_env_file() -> Option<PathBuf> {
    dotenv::dotenv().ok()
}

/// Load a specific env file. Existing variables are not overwritten.
pub fn load_env_file_from(path: &Path) -> Result<(), dotenv::Error> {
    dotenv::from_path(path)
}

pub fn load_config<I, T>(args: I) -> Result<GatewayConfig, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let config = GatewayArgs::try_parse_from(args)?.into_config();
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
