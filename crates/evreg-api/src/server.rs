//! # Server Lifecycle
//!
//! Runs the application on a bound listener until a shutdown signal, then
//! writes the registry back to `SNAPSHOT_PATH` when one is configured. The
//! snapshot is written even when serving ended in an error.

use std::future::Future;
use std::sync::Arc;

use evreg_registry::{save_registry, SnapshotFileError};
use thiserror::Error;
use tokio::net::TcpListener;

use crate::state::AppState;

/// Failure while serving or while saving the final snapshot.
#[derive(Error, Debug)]
pub enum ServeError {
    /// The HTTP server stopped with an I/O error.
    #[error("server terminated abnormally")]
    Serve(#[source] std::io::Error),

    /// The shutdown snapshot could not be written.
    #[error("failed to save registry snapshot")]
    Snapshot(#[from] SnapshotFileError),
}

/// Serve `state` on `listener` until `shutdown` resolves, then persist.
///
/// # Errors
///
/// Returns the serve error if serving failed, otherwise the snapshot
/// error if saving failed. A failed save after a failed serve is logged.
pub async fn run<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let registry = Arc::clone(&state.registry);
    let snapshot_path = state.config.snapshot_path.clone();

    let served = axum::serve(listener, crate::app(state))
        .with_graceful_shutdown(shutdown)
        .await;
    if let Err(e) = &served {
        tracing::error!(error = %e, "server terminated abnormally");
    }

    let saved = match &snapshot_path {
        Some(path) => save_registry(&registry, path),
        None => Ok(()),
    };

    match (served, saved) {
        (Err(e), Err(save)) => {
            tracing::error!(error = ?save, "snapshot not saved");
            Err(ServeError::Serve(e))
        }
        (Err(e), Ok(())) => Err(ServeError::Serve(e)),
        (Ok(()), saved) => saved.map_err(ServeError::from),
    }
}

/// Resolves on Ctrl-C, or on SIGTERM where signals exist.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
