//! Request metrics middleware.
//! Records exactly one sample per request, whatever path the request takes.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::observability::GatewayMetrics;

/// Status recorded when the request future is dropped before a response exists.
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

/// Pending sample for one in-flight request. Recorded on drop.
struct RequestObservation {
    metrics: Arc<GatewayMetrics>,
    method: String,
    route: String,
    started: Instant,
    status: Option<u16>,
}

impl RequestObservation {
    fn start(metrics: Arc<GatewayMetrics>, method: String, route: String) -> Self {
        Self {
            metrics,
            method,
            route,
            started: Instant::now(),
            status: None,
        }
    }

    fn complete(&mut self, status: u16) {
        self.status = Some(status);
    }
}

impl Drop for RequestObservation {
    fn drop(&mut self) {
        let status = self.status.unwrap_or(CLIENT_CLOSED_REQUEST);
        self.metrics
            .record_request(&self.method, &self.route, status, self.started.elapsed());
    }
}

/// Route label: the matched template, or the raw path when nothing matched.
fn route_label<B>(request: &Request<B>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

pub async fn track_metrics(
    State(metrics): State<Arc<GatewayMetrics>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut observation =
        RequestObservation::start(metrics, request.method().to_string(), route_label(&request));

    let response = next.run(request).await;
    observation.complete(response.status().as_u16());
    response
}
