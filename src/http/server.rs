//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with every route and fallback
//! - Wire up middleware (metrics, panic catching, CORS, security headers,
//!   request id, access log)
//! - Bind the server to a listener and stop on shutdown
//! - Start background tasks (scheduler lag sampler, metrics upkeep)

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::get,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::auxiliary::{AuxiliaryClient, VersionResolver};
use crate::config::GatewayConfig;
use crate::http::handlers::{buckets, fallback, health, metrics as metrics_handler, parameters};
use crate::http::middleware::track_metrics;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::lifecycle::ShutdownReason;
use crate::observability::{GatewayMetrics, LagSampler, MetricsError, MetricsUpkeep};
use crate::security::{apply_security_headers, cors_layer};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub auxiliary: AuxiliaryClient,
    pub versions: VersionResolver,
    pub metrics: Arc<GatewayMetrics>,
    pub service_name: Arc<str>,
    pub readiness_timeout: Duration,
}

impl AppState {
    pub fn new(config: &GatewayConfig, metrics: Arc<GatewayMetrics>) -> Result<Self, ServerError> {
        let auxiliary = AuxiliaryClient::new(&config.auxiliary)?;
        let versions = VersionResolver::new(config.service.version.clone(), auxiliary.clone());

        Ok(Self {
            auxiliary,
            versions,
            metrics,
            service_name: Arc::from(config.service.name.as_str()),
            readiness_timeout: Duration::from_secs(config.auxiliary.readiness_timeout_secs),
        })
    }
}

/// Error type for building or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("metrics setup failed: {0}")]
    Metrics(#[from] MetricsError),

    #[error("auxiliary client setup failed: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The API routes, before fallbacks, middleware and state.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::liveness))
        .route("/api/health/ready", get(health::readiness))
        .route("/api/s3/buckets", get(buckets::list_buckets))
        .route("/api/parameters", get(parameters::get_parameter_value))
        .route("/api/parameters/list", get(parameters::list_parameters))
        .route("/metrics", get(metrics_handler::scrape))
}

/// Attach fallbacks and the middleware stack to `routes`.
///
/// Layer order, innermost first: panic catching, CORS, metrics, security
/// headers, request id echo, access log, request id assignment. Metrics sit
/// outside panic catching so a panicking handler is still counted as a 500.
pub fn build_router(routes: Router<AppState>, state: AppState) -> Router {
    let panic_response = fallback::UnhandledPanic::new(state.versions.main_version());
    let metrics = state.metrics.clone();

    let router = routes
        .fallback(fallback::not_found)
        .method_not_allowed_fallback(fallback::not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors_layer())
        .layer(middleware::from_fn_with_state(metrics, track_metrics))
        .with_state(state);

    apply_security_headers(router).layer(
        ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request.request_id(),
                        )
                    })
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(propagate_request_id_layer()),
    )
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
    metrics: Arc<GatewayMetrics>,
}

impl GatewayServer {
    /// Create a new server with its own metrics registry.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let metrics = Arc::new(GatewayMetrics::new(&config.observability.metrics_app_label)?);
        let state = AppState::new(&config, metrics.clone())?;
        let router = build_router(routes(), state);

        Ok(Self {
            router,
            config,
            metrics,
        })
    }

    /// Run until the listener fails or shutdown is signalled.
    ///
    /// On shutdown the listener is closed and in-flight requests are abandoned.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<ShutdownReason>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            auxiliary = %self.config.auxiliary.base_url,
            "HTTP server starting"
        );

        let sampler = LagSampler::new(
            self.metrics.clone(),
            Duration::from_millis(self.config.observability.lag_sample_interval_ms),
        );
        tokio::spawn(sampler.run(shutdown.resubscribe()));

        let upkeep = MetricsUpkeep::new(
            self.metrics.clone(),
            Duration::from_secs(self.config.observability.metrics_upkeep_interval_secs),
        );
        tokio::spawn(upkeep.run(shutdown.resubscribe()));

        let serve = axum::serve(listener, self.router.into_make_service()).into_future();

        tokio::select! {
            result = serve => result?,
            reason = shutdown.recv() => {
                let reason = reason.unwrap_or(ShutdownReason::Requested);
                tracing::info!(reason = %reason, "Shutdown signal received, closing listener");
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The registry this server records into.
    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        self.metrics.clone()
    }
}
