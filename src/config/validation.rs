//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("auxiliary service url '{url}' is invalid: {reason}")]
    InvalidAuxiliaryUrl { url: String, reason: String },

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("service version must not be empty")]
    EmptyServiceVersion,
}

pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.auxiliary.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::InvalidAuxiliaryUrl {
            url: config.auxiliary.base_url.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidAuxiliaryUrl {
            url: config.auxiliary.base_url.clone(),
            reason: e.to_string(),
        }),
    }

    if config.auxiliary.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "auxiliary.request_timeout_secs",
        });
    }
    if config.auxiliary.readiness_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "auxiliary.readiness_timeout_secs",
        });
    }
    if config.observability.metrics_upkeep_interval_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "observability.metrics_upkeep_interval_secs",
        });
    }
    if config.service.version.trim().is_empty() {
        errors.push(ValidationError::EmptyServiceVersion);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
