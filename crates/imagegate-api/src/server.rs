//! API server.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::{AppState, GateConfig, Result, routes};

/// Imagegate HTTP server.
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Create a server from a validated configuration.
    pub fn new(config: GateConfig) -> Self {
        Self {
            state: Arc::new(AppState::new(config)),
        }
    }

    /// The router, for embedding or testing.
    pub fn router(&self) -> Router {
        routes::router(self.state.clone())
    }

    /// Serve until Ctrl-C.
    pub async fn serve(self) -> Result<()> {
        self.serve_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            }
        })
        .await
    }

    /// Serve until `shutdown` resolves.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let config = &self.state.config;
        let listener = TcpListener::bind(&config.server.bind).await?;
        tracing::info!(
            addr = %listener.local_addr()?,
            output_dir = %config.storage.output_dir.display(),
            status_policy = ?config.auth.status_policy,
            gate_policy = ?config.auth.effective_gate_policy(),
            shared_secret = self.state.gate.has_shared_secret(),
            enforce = config.auth.enforce,
            "Imagegate listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Imagegate stopped");
        Ok(())
    }
}
