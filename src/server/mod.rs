//! HTTP surface of the resolver.
//!
//! Routes:
//! - `GET /resolve?purl=...` resolves a PURL, see [`resolve`](crate::resolve).
//! - `GET /healthz` reports liveness with a plain `OK`.

use std::io;

use axum::Router;
use thiserror::Error;
use tokio::{net::TcpListener, sync::oneshot};

use crate::config::ServerConfig;

pub mod handlers;
mod routes;

pub use routes::create_router;

/// Errors that stop the server.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ServerError {
    /// The listener could not be bound.
    #[error("failed to bind to {address}")]
    Bind {
        /// The address that was requested.
        address: String,

        /// The underlying failure.
        #[source]
        error: io::Error,
    },

    /// Serving connections failed.
    #[error("server error")]
    Serve(#[from] io::Error),

    /// The serving task panicked or was cancelled.
    #[error("server task failed")]
    Task(#[from] tokio::task::JoinError),

    /// In-flight requests did not drain before the shutdown deadline.
    #[error("graceful shutdown did not finish within {0:?}")]
    ShutdownTimeout(std::time::Duration),
}

/// The resolver HTTP server.
#[derive(Clone, Debug)]
pub struct Server {
    config: ServerConfig,
}

impl Server {
    /// Create a server from its configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// The configured port.
    pub fn port(&self) -> u16 {
        self.config.port
    }

    /// The router serving this server's routes.
    pub fn router(&self) -> Router {
        create_router()
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let address = self.config.bind_address();
        TcpListener::bind(&address)
            .await
            .map_err(|error| ServerError::Bind { address, error })
    }

    /// Serve requests on `listener` until `shutdown` completes.
    ///
    /// Once `shutdown` completes the listener stops accepting connections and
    /// in-flight requests are given the configured shutdown timeout to finish.
    pub async fn serve(
        &self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        if let Ok(address) = listener.local_addr() {
            tracing::info!(%address, "listening");
        }

        let (drain_tx, drain_rx) = oneshot::channel::<()>();
        let serve = axum::serve(listener, self.router()).with_graceful_shutdown(async move {
            let _ = drain_rx.await;
        });
        let mut task = tokio::spawn(serve.into_future());

        tokio::select! {
            result = &mut task => return Ok(result??),
            () = shutdown => {}
        }

        tracing::info!("shutting down server");
        let _ = drain_tx.send(());

        let timeout = self.config.shutdown_timeout();
        match tokio::time::timeout(timeout, task).await {
            Ok(result) => {
                result??;
                tracing::info!("server stopped");
                Ok(())
            }
            Err(_) => Err(ServerError::ShutdownTimeout(timeout)),
        }
    }

    /// Bind the configured address and serve until `shutdown` completes.
    pub async fn run(
        &self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }
}

/// Completes when the process receives Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
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
}
