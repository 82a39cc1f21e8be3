//! JSON gateway in front of the auxiliary service.
//!
//! Forwards a fixed set of read-only routes to one downstream service, wraps
//! every answer in a uniform envelope with version and timestamp metadata,
//! and exposes Prometheus metrics.

// Core subsystems
pub mod auxiliary;
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
