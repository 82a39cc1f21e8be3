//! Liveness and readiness probes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::http::response::ReadinessReport;
use crate::http::server::AppState;

/// GET /api/health
///
/// Never touches the auxiliary service.
pub async fn liveness() -> &'static str {
    "OK"
}

/// GET /api/health/ready
pub async fn readiness(State(state): State<AppState>) -> Response {
    let probe = state
        .auxiliary
        .probe("/health", state.readiness_timeout)
        .await;
    let versions = state.versions.resolve().await;

    match probe {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessReport::ready(versions, state.service_name.as_ref())),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessReport::not_ready(versions, state.service_name.as_ref())),
            )
                .into_response()
        }
    }
}
