//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request path:
//!     → http/middleware/metrics.rs (one sample per request)
//!     → metrics.rs (counters, histograms in the Prometheus registry)
//!
//! Background:
//!     → process.rs (scheduler lag sampler; process gauges on scrape)
//!     → metrics.rs (recorder upkeep)
//!
//! Everywhere:
//!     → logging.rs (structured log events)
//!
//! Consumers:
//!     → GET /metrics (Prometheus scrape)
//!     → stdout (log aggregation)
//! ```

pub mod logging;
pub mod metrics;
pub mod process;

pub use metrics::{GatewayMetrics, MetricsError, MetricsUpkeep};
pub use process::LagSampler;
