//! Downstream failure types.

use std::time::Duration;
use thiserror::Error;

/// Longest slice of a raw error body kept as detail.
const MAX_DETAIL_CHARS: usize = 256;

/// Why a downstream call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownstreamFailure {
    /// Network failure before any response arrived.
    #[error("{0}")]
    Unavailable(String),

    /// No response within the per-call timeout.
    #[error("timeout of {}ms exceeded", .0.as_millis())]
    Timeout(Duration),

    /// The auxiliary service answered with a non-2xx status.
    ///
    /// `detail` is for logs only and never part of the message.
    #[error("Request failed with status code {status}")]
    BadStatus { status: u16, detail: Option<String> },

    /// A 2xx answer whose body was not JSON.
    #[error("invalid JSON payload: {0}")]
    Malformed(String),
}

impl DownstreamFailure {
    /// True for failures where the auxiliary service could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }

    /// Error body detail, if the auxiliary service sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::BadStatus { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Build a `BadStatus` from an error body.
    ///
    /// Prefers a string `error` or `message` field of a JSON body, then the raw
    /// text, truncated.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                ["error", "message"]
                    .iter()
                    .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_string))
            })
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.chars().take(MAX_DETAIL_CHARS).collect())
            });

        Self::BadStatus { status, detail }
    }
}

/// A failed call to the auxiliary service.
#[derive(Debug, Clone, Error)]
#[error("Auxiliary service error: {cause}")]
pub struct DownstreamError {
    /// Endpoint that was called, relative to the base URL.
    pub endpoint: String,
    /// What went wrong.
    #[source]
    pub cause: DownstreamFailure,
}

impl DownstreamError {
    pub fn new(endpoint: impl Into<String>, cause: DownstreamFailure) -> Self {
        Self {
            endpoint: endpoint.into(),
            cause,
        }
    }

    /// Classify a transport error from reqwest.
    pub(crate) fn from_transport(endpoint: &str, timeout: Duration, err: reqwest::Error) -> Self {
        let cause = if err.is_timeout() {
            DownstreamFailure::Timeout(timeout)
        } else {
            DownstreamFailure::Unavailable(error_chain(&err))
        };
        Self::new(endpoint, cause)
    }
}

/// Render an error followed by its sources, separated by `: `.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = inner.source();
    }
    message
}
