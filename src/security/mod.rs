//! Response hardening.
//!
//! # Data Flow
//! ```text
//! Outgoing response:
//!     → headers.rs (security headers, only where absent)
//!     → cors.rs (CORS headers, preflight answers)
//!     → Send to client
//! ```
//!
//! No authentication or rate limiting happens here; the gateway trusts its
//! network.

pub mod cors;
pub mod headers;

pub use cors::cors_layer;
pub use headers::{apply_security_headers, SECURITY_HEADERS};
