//! Route handlers.
//!
//! Every data route follows the same sequence:
//!
//! ```text
//! resolve versions → call auxiliary endpoint ─┬─ Ok  → 200 envelope { data }
//!                                             └─ Err → classify status,
//!                                                      resolve versions again,
//!                                                      envelope { error }
//! ```
//!
//! The second version lookup on failure is intentional: versions are never
//! cached, so a failing request may cost two extra downstream calls.

pub mod buckets;
pub mod fallback;
pub mod health;
pub mod metrics;
pub mod parameters;

use axum::{http::StatusCode, response::Response};

use crate::auxiliary::DownstreamError;
use crate::http::response::Envelope;
use crate::http::server::AppState;

/// Call `endpoint` and wrap the outcome in an envelope.
///
/// `classify` picks the status code for a failed call.
pub(crate) async fn forward<C>(state: &AppState, endpoint: &str, classify: C) -> Response
where
    C: FnOnce(&DownstreamError) -> StatusCode,
{
    let versions = state.versions.resolve().await;

    match state.auxiliary.call(endpoint).await {
        Ok(data) => Envelope::success(data, versions).with_status(StatusCode::OK),
        Err(err) => {
            let status = classify(&err);
            let versions = state.versions.resolve().await;
            Envelope::failure(err.to_string(), versions).with_status(status)
        }
    }
}

/// Every downstream failure is a 500.
pub(crate) fn internal_error(_: &DownstreamError) -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}
