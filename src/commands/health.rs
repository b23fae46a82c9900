//! Health Check Commands

use axum::extract::State;
use axum::Json;
use spend_arena_core::HealthStatus;

use crate::state::AppState;

/// `GET /api/health`
pub async fn get_health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        mock_agents: state.is_mock(),
    })
}
