//! Vote Commands
//!
//! Upvotes steer later analysis runs of the same session through the
//! preference context.

use axum::extract::{Path, State};
use axum::Json;
use spend_arena_core::{VoteRequest, VotesResponse};

use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

/// `POST /api/vote`
pub async fn cast_vote(
    State(state): State<AppState>,
    Json(vote): Json<VoteRequest>,
) -> AppResult<Json<VotesResponse>> {
    if vote.recommendation_id.trim().is_empty() {
        return Err(AppError::validation("recommendation_id is required"));
    }
    let votes = state.sessions.add_vote(&vote).await?;
    tracing::info!(
        session_id = %vote.session_id,
        agent = %vote.agent_type,
        recommendation_id = %vote.recommendation_id,
        "Vote recorded"
    );
    Ok(Json(VotesResponse { votes }))
}

/// `GET /api/votes/{session_id}`
pub async fn get_votes(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<VotesResponse> {
    Json(VotesResponse {
        votes: state.sessions.votes(&session_id).await,
    })
}
