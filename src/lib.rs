//! Spend Arena - Gateway Library
//!
//! Server side of the spend-analysis arena. Three agents analyse a session's
//! procurement data concurrently and their progress is streamed to the
//! browser as server-sent events.
//! It includes:
//! - HTTP route handlers (axum)
//! - Agent runner and analysis backends
//! - In-memory session store
//! - Configuration and error types

pub mod commands;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;
pub mod watch;

use std::future::Future;

use tokio::net::TcpListener;

pub use commands::router;
pub use models::settings::AppConfig;
pub use state::AppState;
pub use storage::ConfigService;
pub use utils::error::{AppError, AppResult};

/// Serve the gateway on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> AppResult<()> {
    let addr = listener.local_addr()?;
    tracing::info!(
        %addr,
        mock_agents = state.is_mock(),
        "Spend arena gateway listening"
    );
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("Gateway shut down");
    Ok(())
}
