//! HTTP client for the auxiliary service.
//!
//! # Responsibilities
//! - Issue GET calls against `{base}{endpoint}`
//! - Tag each call with a fresh request id and the gateway user agent
//! - Enforce per-call timeouts
//! - Normalize every failure into `DownstreamError`

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use uuid::Uuid;

use crate::auxiliary::error::{DownstreamError, DownstreamFailure};
use crate::config::AuxiliaryConfig;
use crate::http::X_REQUEST_ID;

/// `User-Agent` sent on every downstream call.
pub const USER_AGENT: &str = concat!("main-api/", env!("CARGO_PKG_VERSION"));

/// Client for the single downstream service.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct AuxiliaryClient {
    http: Client,
    base_url: String,
    request_timeout: Duration,
}

impl AuxiliaryClient {
    pub fn new(config: &AuxiliaryConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `endpoint` and return its JSON body.
    pub async fn call(&self, endpoint: &str) -> Result<Value, DownstreamError> {
        let request_id = Uuid::new_v4().simple().to_string();

        let result = self.fetch_json(endpoint, &request_id).await;
        if let Err(e) = &result {
            if e.cause.is_unavailable() {
                tracing::error!(
                    endpoint = %endpoint,
                    request_id = %request_id,
                    error = %e.cause,
                    "Auxiliary service unreachable"
                );
            } else {
                tracing::error!(
                    endpoint = %endpoint,
                    request_id = %request_id,
                    error = %e.cause,
                    detail = e.cause.detail().unwrap_or(""),
                    "Error calling auxiliary service"
                );
            }
        }
        result
    }

    async fn fetch_json(&self, endpoint: &str, request_id: &str) -> Result<Value, DownstreamError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let timeout = self.request_timeout;

        tracing::debug!(url = %url, request_id = %request_id, "Calling auxiliary service");

        let response = self
            .http
            .get(&url)
            .timeout(timeout)
            .header(X_REQUEST_ID, request_id)
            .send()
            .await
            .map_err(|e| DownstreamError::from_transport(endpoint, timeout, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DownstreamError::from_transport(endpoint, timeout, e))?;

        if !status.is_success() {
            return Err(DownstreamError::new(
                endpoint,
                DownstreamFailure::from_status(status.as_u16(), &body),
            ));
        }

        serde_json::from_str(&body)
            .map_err(|e| DownstreamError::new(endpoint, DownstreamFailure::Malformed(e.to_string())))
    }

    /// GET `endpoint` and only check for a 2xx status. The body is ignored.
    pub async fn probe(&self, endpoint: &str, timeout: Duration) -> Result<(), DownstreamError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .http
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| DownstreamError::from_transport(endpoint, timeout, e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(DownstreamError::new(
                endpoint,
                DownstreamFailure::BadStatus {
                    status: status.as_u16(),
                    detail: None,
                },
            ))
        }
    }
}
