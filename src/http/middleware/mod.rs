pub mod metrics;

pub use metrics::{track_metrics, CLIENT_CLOSED_REQUEST};
