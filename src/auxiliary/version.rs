//! Version reporting for response envelopes.

use serde::Serialize;
use serde_json::Value;

use crate::auxiliary::client::AuxiliaryClient;

/// Sentinel reported when the auxiliary version cannot be determined.
pub const UNKNOWN_VERSION: &str = "unknown";

/// The `versions` block of every envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Versions {
    #[serde(rename = "main-api")]
    pub main_api: String,
    #[serde(rename = "auxiliary-service")]
    pub auxiliary_service: String,
}

impl Versions {
    pub fn new(main_api: impl Into<String>, auxiliary_service: impl Into<String>) -> Self {
        Self {
            main_api: main_api.into(),
            auxiliary_service: auxiliary_service.into(),
        }
    }
}

/// Resolves the `versions` block. Nothing is cached; every call asks the
/// auxiliary service again.
#[derive(Debug, Clone)]
pub struct VersionResolver {
    main_version: String,
    client: AuxiliaryClient,
}

impl VersionResolver {
    pub fn new(main_version: impl Into<String>, client: AuxiliaryClient) -> Self {
        Self {
            main_version: main_version.into(),
            client,
        }
    }

    pub fn main_version(&self) -> &str {
        &self.main_version
    }

    /// Ask the auxiliary service for its version. Never fails.
    pub async fn resolve_auxiliary_version(&self) -> String {
        match self.client.call("/version").await {
            Ok(body) => extract_version(&body).unwrap_or_else(|| {
                tracing::warn!("Auxiliary service version response has no version field");
                UNKNOWN_VERSION.to_string()
            }),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to get auxiliary service version");
                UNKNOWN_VERSION.to_string()
            }
        }
    }

    /// Both versions, with the auxiliary one freshly resolved.
    pub async fn resolve(&self) -> Versions {
        Versions::new(self.main_version.clone(), self.resolve_auxiliary_version().await)
    }

    /// Versions for paths that must not touch the auxiliary service.
    pub fn without_auxiliary(&self) -> Versions {
        Versions::new(self.main_version.clone(), UNKNOWN_VERSION)
    }
}

fn extract_version(body: &Value) -> Option<String> {
    match body.get("version")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::String(_) | Value::Null => None,
        other => Some(other.to_string()),
    }
}
