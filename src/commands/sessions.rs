//! Session Commands
//!
//! Listing, inspection and deletion of stored sessions.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use spend_arena_core::{DataSummary, SessionsResponse};

use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

/// `GET /api/sessions`
pub async fn list_sessions(State(state): State<AppState>) -> Json<SessionsResponse> {
    Json(SessionsResponse {
        sessions: state.sessions.list().await,
    })
}

/// `DELETE /api/sessions/{session_id}`
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<Value>> {
    if !state.sessions.delete(&session_id).await {
        return Err(AppError::not_found("Session not found"));
    }
    Ok(Json(json!({ "status": "deleted" })))
}

/// `GET /api/sessions/{session_id}/summary`
pub async fn get_summary(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<DataSummary>> {
    let session = state.sessions.require(&session_id).await?;
    Ok(Json(session.summary))
}
