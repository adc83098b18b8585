//! Liveness HTTP server.
//!
//! # Responsibilities
//! - Answer `GET /ping` with `200 Pong`
//! - Serve nothing else
//! - Stop on the shutdown signal

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

/// Path probed by orchestration.
pub const PING_PATH: &str = "/ping";

/// HTTP server for liveness probes.
pub struct HealthServer {
    router: Router,
}

impl HealthServer {
    pub fn new() -> Self {
        Self {
            router: Self::build_router(),
        }
    }

    fn build_router() -> Router {
        Router::new()
            .route(PING_PATH, get(ping))
            .layer(TraceLayer::new_for_http())
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Health server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Closing down health server");
            })
            .await?;

        tracing::info!("Health server stopped");
        Ok(())
    }
}

impl Default for HealthServer {
    fn default() -> Self {
        Self::new()
    }
}

async fn ping() -> &'static str {
    "Pong"
}
