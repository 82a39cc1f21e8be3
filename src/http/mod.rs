//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → request.rs (assign request id)
//!     → middleware/ (metrics sample per request)
//!     → server.rs (Axum router, fallbacks, panic catching)
//!     → handlers/ (call the auxiliary service)
//!     → response.rs (envelope with versions and timestamp)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use response::{Envelope, ReadinessReport};
pub use server::{build_router, routes, AppState, GatewayServer, ServerError};
