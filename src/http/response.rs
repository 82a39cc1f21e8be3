//! Response envelopes.
//!
//! Every JSON answer from the gateway has the same outer shape:
//!
//! ```text
//! { "success": bool,
//!   "data": <any JSON>        (success only)
//!   "error": "<message>"      (failure only)
//!   "versions": { "main-api": "...", "auxiliary-service": "..." },
//!   "timestamp": "2024-01-01T00:00:00.000Z" }
//! ```
//!
//! Readiness uses its own shape (`status` instead of `success`) but carries the
//! same `versions` and `timestamp`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::auxiliary::Versions;

/// Current UTC time as ISO-8601 with millisecond precision.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The uniform response body.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub versions: Versions,
    pub timestamp: String,
}

impl Envelope {
    /// Build an envelope from an outcome. `data` is kept even when it is JSON `null`.
    pub fn build(outcome: Result<Value, String>, versions: Versions) -> Self {
        let (success, data, error) = match outcome {
            Ok(data) => (true, Some(data), None),
            Err(message) => (false, None, Some(message)),
        };
        Self {
            success,
            data,
            error,
            versions,
            timestamp: timestamp_now(),
        }
    }

    pub fn success(data: Value, versions: Versions) -> Self {
        Self::build(Ok(data), versions)
    }

    pub fn failure(message: impl Into<String>, versions: Versions) -> Self {
        Self::build(Err(message.into()), versions)
    }

    /// Pair the envelope with a status code.
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Readiness report body.
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessReport {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    pub timestamp: String,
    pub versions: Versions,
    pub service: String,
}

impl ReadinessReport {
    pub fn ready(versions: Versions, service: impl Into<String>) -> Self {
        Self {
            status: "ready",
            error: None,
            timestamp: timestamp_now(),
            versions,
            service: service.into(),
        }
    }

    pub fn not_ready(versions: Versions, service: impl Into<String>) -> Self {
        Self {
            status: "not ready",
            error: Some("Auxiliary service not available"),
            timestamp: timestamp_now(),
            versions,
            service: service.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn versions() -> Versions {
        Versions::new("1.0.0", "2.0.0")
    }

    #[test]
    fn test_success_shape() {
        let value = serde_json::to_value(Envelope::success(json!(["a", "b"]), versions())).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["data"], json!(["a", "b"]));
        assert!(value.get("error").is_none());
        assert_eq!(value["versions"]["main-api"], "1.0.0");
        assert_eq!(value["versions"]["auxiliary-service"], "2.0.0");
    }

    #[test]
    fn test_failure_shape() {
        let value = serde_json::to_value(Envelope::failure("boom", versions())).unwrap();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["error"], "boom");
        assert!(value.get("data").is_none());
        assert!(value.get("versions").is_some());
    }

    #[test]
    fn test_null_payload_is_still_present() {
        let value = serde_json::to_value(Envelope::success(Value::Null, versions())).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("data"));
        assert!(object["data"].is_null());
    }

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp_now();
        assert!(ts.ends_with('Z'), "{ts}");
        assert_eq!(ts.len(), "2024-01-01T00:00:00.000Z".len());
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_readiness_shapes() {
        let ready = serde_json::to_value(ReadinessReport::ready(versions(), "main-api")).unwrap();
        assert_eq!(ready["status"], "ready");
        assert!(ready.get("error").is_none());
        assert_eq!(ready["service"], "main-api");

        let not_ready = serde_json::to_value(ReadinessReport::not_ready(versions(), "main-api")).unwrap();
        assert_eq!(not_ready["status"], "not ready");
        assert_eq!(not_ready["error"], "Auxiliary service not available");
    }
}
