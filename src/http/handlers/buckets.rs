use axum::{extract::State, response::Response};

use crate::http::handlers::{forward, internal_error};
use crate::http::server::AppState;

/// GET /api/s3/buckets
pub async fn list_buckets(State(state): State<AppState>) -> Response {
    forward(&state, "/aws/s3/buckets", internal_error).await
}
