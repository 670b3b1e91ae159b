//! OS signal handling.
//!
//! # Responsibilities
//! - Listen for SIGINT and SIGTERM
//! - Translate the first one into a cancellation of the running gate
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - A pipeline abort (SIGTERM) is reported as `Cancelled`, not as a crash

use tokio::task::JoinHandle;

use crate::lifecycle::cancel::Cancellation;

/// Wait for SIGINT or SIGTERM, returning the signal's name.
pub async fn wait_for_termination() -> std::io::Result<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result.map(|_| "SIGINT"),
            _ = terminate.recv() => Ok("SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.map(|_| "ctrl-c")
    }
}

/// Spawn a task that cancels `cancellation` on the first termination signal.
pub fn cancel_on_signal(cancellation: Cancellation) -> JoinHandle<()> {
    tokio::spawn(async move {
        match wait_for_termination().await {
            Ok(name) => {
                tracing::warn!(signal = name, "Termination signal received, cancelling");
                cancellation.cancel();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
            }
        }
    })
}
