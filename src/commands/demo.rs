//! Demo Commands
//!
//! Sessions pre-loaded with the built-in demo dataset.

use axum::extract::State;
use axum::Json;
use spend_arena_core::DemoSession;

use crate::models::demo::demo_summary;
use crate::models::session::Session;
use crate::services::session_store::new_session_id;
use crate::state::AppState;

/// `POST /api/demo/start`
pub async fn start_demo(State(state): State<AppState>) -> Json<DemoSession> {
    let session_id = new_session_id();
    let summary = demo_summary();
    state
        .sessions
        .save(&session_id, Session::demo(summary.clone()))
        .await;

    tracing::info!(session_id = %session_id, "Demo session started");
    Json(DemoSession {
        session_id,
        summary,
    })
}
