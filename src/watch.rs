//! Terminal Watcher
//!
//! Follows one session's analysis stream from a running gateway and renders
//! the board as text after every change.

use spend_arena_client::{
    ApiClient, ApiClientConfig, ArenaController, ClientResult, StreamClient, StreamClientConfig,
};
use spend_arena_core::{AgentState, AgentStatus, ArenaBoard, StreamPhase};

use crate::utils::format::{format_money, progress_bar};

const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub base_url: String,
    /// Existing session to analyse; a demo session is created when `None`
    pub session_id: Option<String>,
}

/// Open the session's stream and call `on_update` with every board change
/// until the stream finishes. Returns the final board.
pub async fn watch_session(
    options: &WatchOptions,
    mut on_update: impl FnMut(&str, &ArenaBoard),
) -> ClientResult<ArenaBoard> {
    let session_id = match &options.session_id {
        Some(id) => id.clone(),
        None => {
            let api = ApiClient::new(&ApiClientConfig {
                base_url: options.base_url.clone(),
                ..Default::default()
            })?;
            let demo = api.start_demo().await?;
            tracing::info!(session_id = %demo.session_id, "Created demo session");
            demo.session_id
        }
    };

    let client = StreamClient::new(&StreamClientConfig {
        base_url: options.base_url.clone(),
        ..Default::default()
    })?;
    let mut controller = ArenaController::new(client);
    let mut board = controller.ensure_started(&session_id);

    loop {
        let snapshot = board.borrow_and_update().clone();
        on_update(&session_id, &snapshot);
        if snapshot.phase().is_finished() {
            return Ok(snapshot);
        }
        if board.changed().await.is_err() {
            return Ok(board.borrow().clone());
        }
    }
}

fn render_agent(state: &AgentState) -> String {
    let name = format!("{:<13}", state.agent_type.label());
    match state.status {
        AgentStatus::Idle => format!("{} waiting", name),
        AgentStatus::Thinking => format!(
            "{} {} {:>3}%  {}",
            name,
            progress_bar(state.progress, BAR_WIDTH),
            state.progress,
            state.steps.last().map(String::as_str).unwrap_or("")
        ),
        AgentStatus::Complete => {
            let mut line = format!(
                "{} {} done  {} in {} recommendations",
                name,
                progress_bar(100, BAR_WIDTH),
                format_money(state.total_savings),
                state.recommendations.len()
            );
            if let Some(notice) = &state.degraded {
                line.push_str(&format!("  ({})", notice.message()));
            }
            line
        }
        AgentStatus::Error => format!("{} failed", name),
    }
}

/// Multi-line text view of `board`.
pub fn render_board(session_id: &str, board: &ArenaBoard) -> String {
    let phase = match board.phase() {
        StreamPhase::Connecting => "connecting".to_string(),
        StreamPhase::Streaming => "streaming".to_string(),
        StreamPhase::Done if board.all_complete() => "all agents complete".to_string(),
        StreamPhase::Done => "stream ended".to_string(),
        StreamPhase::Failed { message } => format!("connection lost: {}", message),
    };

    let mut lines = vec![format!("Session {} - {}", session_id, phase)];
    lines.extend(board.agents().map(render_agent));
    lines.join("\n")
}
