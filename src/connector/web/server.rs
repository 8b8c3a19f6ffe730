use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::connector::api::Container;

use super::handlers::{self, WebState};

pub fn build_router(container: Arc<Container>) -> axum::Router {
    let state = WebState { container };

    axum::Router::new()
        .route("/", get(handlers::index))
        .route("/send", post(handlers::send_form))
        .route("/clear", post(handlers::clear_form))
        .route("/api/models", get(handlers::api_models))
        .route("/api/messages", get(handlers::api_messages))
        .route("/api/send", post(handlers::api_send))
        .route("/api/clear", post(handlers::api_clear))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Serve the chat UI on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, container: Arc<Container>) -> Result<()> {
    info!("Chat UI listening on http://{}", listener.local_addr()?);
    if let Some(warning) = container.credential_warning() {
        tracing::warn!("{}", warning);
    }

    let sweeper = spawn_session_sweeper(Arc::clone(&container));
    let served = axum::serve(listener, build_router(container))
        .with_graceful_shutdown(shutdown_signal())
        .await;
    sweeper.abort();
    served?;

    info!("Chat UI stopped");
    Ok(())
}

/// Periodically drop idle sessions so cookie-less clients cannot grow the
/// store without bound.
pub fn spawn_session_sweeper(container: Arc<Container>) -> JoinHandle<()> {
    let period = container
        .session_ttl()
        .min(Duration::from_secs(60))
        .max(Duration::from_secs(1));
    let sessions = container.session_repository();

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            match sessions.evict_idle().await {
                Ok(0) => {}
                Ok(evicted) => debug!("Evicted {} idle sessions", evicted),
                Err(e) => tracing::warn!("Session sweep failed: {}", e),
            }
        }
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
