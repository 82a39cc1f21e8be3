//! Auxiliary (downstream) service subsystem.
//!
//! # Data Flow
//! ```text
//! route handler
//!     → client.rs (GET {base}{endpoint}, X-Request-ID, User-Agent, timeout)
//!     → error.rs (network / timeout / status / payload failures)
//!     → version.rs (`/version`, degrading to "unknown")
//! ```
//!
//! # Design Decisions
//! - One shared `reqwest::Client`; connection reuse is whatever it provides
//! - No retries and no caching: every call hits the auxiliary service
//! - Every failure collapses into `DownstreamError`

pub mod client;
pub mod error;
pub mod version;

pub use client::{AuxiliaryClient, USER_AGENT};
pub use error::{DownstreamError, DownstreamFailure};
pub use version::{VersionResolver, Versions, UNKNOWN_VERSION};
