//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! Every section has a `Default` matching the documented environment defaults.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Identity reported in every response envelope.
    pub service: ServiceConfig,

    /// Downstream auxiliary service settings.
    pub auxiliary: AuxiliaryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind.
    pub host: String,

    /// TCP port to bind.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Service identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Name reported as `service` by the readiness endpoint.
    pub name: String,

    /// Version reported as `main-api` in envelopes. Never checked against the build.
    pub version: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "main-api".to_string(),
            version: "1.0.0".to_string(),
        }
    }
}

/// Auxiliary (downstream) service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuxiliaryConfig {
    /// Base URL every downstream endpoint is appended to.
    pub base_url: String,

    /// Timeout for regular downstream calls in seconds.
    pub request_timeout_secs: u64,

    /// Timeout for the readiness probe in seconds.
    pub readiness_timeout_secs: u64,
}

impl Default for AuxiliaryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            request_timeout_secs: 10,
            readiness_timeout_secs: 5,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, for development.
    #[default]
    Pretty,
    /// One JSON object per line, for log aggregation.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Value of the `app` label attached to every metric series.
    pub metrics_app_label: String,

    /// How often the scheduler lag sampler wakes up, in milliseconds.
    pub lag_sample_interval_ms: u64,

    /// How often histogram samples are folded into their buckets, in seconds.
    pub metrics_upkeep_interval_secs: u64,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_app_label: "main-api".to_string(),
            lag_sample_interval_ms: 500,
            metrics_upkeep_interval_secs: 5,
        }
    }
}
