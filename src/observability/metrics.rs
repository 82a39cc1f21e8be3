//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Own the Prometheus registry for the process (no global recorder)
//! - Record one counter increment and one histogram observation per request
//! - Render the text exposition format for `/metrics`
//! - Drain pending histogram samples on a timer (`MetricsUpkeep`), since the
//!   recorder is built without the exporter's own upkeep task
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, route, status_code
//! - `http_request_duration_seconds` (histogram): latency distribution
//! - `process_*` / `runtime_*` (gauges): see `process.rs`
//!
//! # Design Decisions
//! - Registry is an explicit object injected through router state, so tests
//!   get isolated registries
//! - Updates are atomic inside the recorder; no extra locking on the hot path
//! - Every series carries `app="<service name>"`

use std::sync::Arc;
use std::time::Duration;

use metrics::{describe_counter, describe_gauge, describe_histogram, Label, Unit};
use metrics_exporter_prometheus::{
    BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::lifecycle::ShutdownReason;
use crate::observability::process::{ProcessCollector, ProcessSnapshot};

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";

pub const PROCESS_RESIDENT_MEMORY_BYTES: &str = "process_resident_memory_bytes";
pub const PROCESS_VIRTUAL_MEMORY_BYTES: &str = "process_virtual_memory_bytes";
pub const PROCESS_CPU_USAGE_PERCENT: &str = "process_cpu_usage_percent";
pub const PROCESS_START_TIME_SECONDS: &str = "process_start_time_seconds";
pub const PROCESS_OPEN_FDS: &str = "process_open_fds";
pub const RUNTIME_WORKERS: &str = "runtime_workers";
pub const RUNTIME_ALIVE_TASKS: &str = "runtime_alive_tasks";
pub const RUNTIME_SCHEDULER_LAG_SECONDS: &str = "runtime_scheduler_lag_seconds";

/// Histogram buckets for request latency, in seconds.
pub const DURATION_BUCKETS: [f64; 9] = [0.1, 0.3, 0.5, 0.7, 1.0, 3.0, 5.0, 7.0, 10.0];

/// `Content-Type` of the text exposition format.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("failed to build Prometheus recorder: {0}")]
    Build(#[from] BuildError),

    #[error("failed to collect process metrics: {0}")]
    Process(String),
}

/// Process-scoped metrics registry.
pub struct GatewayMetrics {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
    process: ProcessCollector,
}

impl GatewayMetrics {
    /// Build a fresh registry labelled with `app`.
    pub fn new(app: &str) -> Result<Self, MetricsError> {
        let recorder = PrometheusBuilder::new()
            .add_global_label("app", app)
            .set_buckets_for_metric(
                Matcher::Full(HTTP_REQUEST_DURATION_SECONDS.to_string()),
                &DURATION_BUCKETS,
            )?
            .build_recorder();
        let handle = recorder.handle();

        let metrics = Self {
            recorder,
            handle,
            process: ProcessCollector::new(),
        };
        metrics.describe();
        Ok(metrics)
    }

    /// Run `f` with this registry as the active recorder on the current thread.
    fn with_recorder<T>(&self, f: impl FnOnce() -> T) -> T {
        metrics::with_local_recorder(&self.recorder, f)
    }

    fn describe(&self) {
        self.with_recorder(|| {
            describe_counter!(HTTP_REQUESTS_TOTAL, "Total number of HTTP requests");
            describe_histogram!(
                HTTP_REQUEST_DURATION_SECONDS,
                Unit::Seconds,
                "Duration of HTTP requests in seconds"
            );
            describe_gauge!(PROCESS_RESIDENT_MEMORY_BYTES, Unit::Bytes, "Resident memory size in bytes");
            describe_gauge!(PROCESS_VIRTUAL_MEMORY_BYTES, Unit::Bytes, "Virtual memory size in bytes");
            describe_gauge!(PROCESS_CPU_USAGE_PERCENT, Unit::Percent, "Process CPU usage since last scrape");
            describe_gauge!(PROCESS_START_TIME_SECONDS, Unit::Seconds, "Start time of the process since unix epoch");
            describe_gauge!(PROCESS_OPEN_FDS, "Number of open file descriptors");
            describe_gauge!(RUNTIME_WORKERS, "Number of async runtime worker threads");
            describe_gauge!(RUNTIME_ALIVE_TASKS, "Number of live async tasks");
            describe_gauge!(
                RUNTIME_SCHEDULER_LAG_SECONDS,
                Unit::Seconds,
                "Delay between a timer firing and its task being polled"
            );
        });
    }

    /// Record one completed request.
    pub fn record_request(&self, method: &str, route: &str, status: u16, duration: Duration) {
        let labels = vec![
            Label::new("method", method.to_string()),
            Label::new("route", route.to_string()),
            Label::new("status_code", status.to_string()),
        ];
        self.with_recorder(|| {
            metrics::counter!(HTTP_REQUESTS_TOTAL, labels.clone()).increment(1);
            metrics::histogram!(HTTP_REQUEST_DURATION_SECONDS, labels).record(duration.as_secs_f64());
        });
    }

    /// Record the most recent scheduler lag sample.
    pub fn record_scheduler_lag(&self, lag: Duration) {
        self.with_recorder(|| {
            metrics::gauge!(RUNTIME_SCHEDULER_LAG_SECONDS).set(lag.as_secs_f64());
        });
    }

    fn record_process(&self, snapshot: &ProcessSnapshot) {
        self.with_recorder(|| {
            metrics::gauge!(PROCESS_RESIDENT_MEMORY_BYTES).set(snapshot.resident_memory_bytes as f64);
            metrics::gauge!(PROCESS_VIRTUAL_MEMORY_BYTES).set(snapshot.virtual_memory_bytes as f64);
            metrics::gauge!(PROCESS_CPU_USAGE_PERCENT).set(f64::from(snapshot.cpu_usage_percent));
            metrics::gauge!(PROCESS_START_TIME_SECONDS).set(snapshot.start_time_seconds as f64);
            if let Some(fds) = snapshot.open_fds {
                metrics::gauge!(PROCESS_OPEN_FDS).set(fds as f64);
            }
            if let Some(runtime) = &snapshot.runtime {
                metrics::gauge!(RUNTIME_WORKERS).set(runtime.workers as f64);
                metrics::gauge!(RUNTIME_ALIVE_TASKS).set(runtime.alive_tasks as f64);
            }
        });
    }

    /// Refresh process gauges and render the exposition text.
    pub fn render(&self) -> Result<String, MetricsError> {
        let snapshot = self.process.collect()?;
        self.record_process(&snapshot);
        Ok(self.handle.render())
    }

    /// Fold pending histogram samples into their buckets.
    pub fn run_upkeep(&self) {
        self.handle.run_upkeep();
    }
}

/// Background task that runs recorder upkeep until shutdown.
pub struct MetricsUpkeep {
    metrics: Arc<GatewayMetrics>,
    interval: Duration,
}

impl MetricsUpkeep {
    pub fn new(metrics: Arc<GatewayMetrics>, interval: Duration) -> Self {
        Self { metrics, interval }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<ShutdownReason>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.metrics.run_upkeep(),
                _ = shutdown.recv() => {
                    tracing::debug!("Metrics upkeep received shutdown signal");
                    break;
                }
            }
        }
    }
}
