//! OS signal handling.
//!
//! SIGTERM and SIGINT both stop the gateway. There is no reload signal.

use crate::lifecycle::shutdown::ShutdownReason;

/// Resolve on the first SIGTERM or SIGINT.
#[cfg(unix)]
pub async fn wait_for_termination() -> std::io::Result<ShutdownReason> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;

    let reason = tokio::select! {
        _ = terminate.recv() => ShutdownReason::Terminate,
        _ = interrupt.recv() => ShutdownReason::Interrupt,
    };
    Ok(reason)
}

#[cfg(not(unix))]
pub async fn wait_for_termination() -> std::io::Result<ShutdownReason> {
    tokio::signal::ctrl_c().await?;
    Ok(ShutdownReason::Interrupt)
}
