//! OS signal handling.
//!
//! SIGINT and SIGTERM both request a graceful shutdown. Non-Unix targets
//! only see Ctrl+C.

/// Resolve once an interrupt or termination signal arrives.
#[cfg(unix)]
pub async fn shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!(signal = "SIGINT", "Shutdown signal received");
        }
        _ = terminate.recv() => {
            tracing::info!(signal = "SIGTERM", "Shutdown signal received");
        }
    }
    Ok(())
}

/// Resolve once an interrupt signal arrives.
#[cfg(not(unix))]
pub async fn shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    tracing::info!(signal = "ctrl-c", "Shutdown signal received");
    Ok(())
}
