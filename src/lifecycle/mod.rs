//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Init logging → Bind listener → Build server → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Broadcast reason → Stop accepting → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - In-flight requests are not drained on shutdown

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownReason};
pub use signals::wait_for_termination;
