//! Analysis Stream Command
//!
//! Runs all three agents for a session and streams their progress as
//! server-sent events.

use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::response::sse::{Event, Sse};
use axum::response::IntoResponse;
use futures_util::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::services::gateway::{analysis_frames, sse_event};
use crate::state::AppState;
use crate::utils::error::AppResult;

/// Stops reverse proxies from buffering the stream.
const ACCEL_BUFFERING: (&str, &str) = ("x-accel-buffering", "no");

/// `GET /api/analyze/{session_id}`
pub async fn analyze(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let session = state.sessions.require(&session_id).await?;
    let preferences = state.sessions.preference_context(&session_id).await;

    tracing::info!(
        session_id = %session_id,
        backend = state.runner.backend_name(),
        with_preferences = !preferences.is_empty(),
        "Starting analysis stream"
    );

    let cancel = CancellationToken::new();
    let rx = state.runner.run(session.summary, preferences, cancel.clone());
    let events = sse_events(analysis_frames(
        state.sessions.clone(),
        session_id,
        rx,
        cancel,
    ));

    Ok(([ACCEL_BUFFERING], Sse::new(events)))
}

fn sse_events(
    frames: impl Stream<Item = spend_arena_core::StreamFrame> + Send,
) -> impl Stream<Item = Result<Event, Infallible>> + Send {
    frames.map(|frame| Ok(sse_event(&frame)))
}

#[cfg(test)]
mod tests {
    use crate::commands::router;
    use crate::commands::test_support::{get_json, get_raw, test_state};
    use crate::models::demo::demo_summary;
    use crate::models::session::Session;
    use spend_arena_core::{ArenaBoard, StreamFrame};

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let (status, body) = get_json(router(test_state()), "/api/analyze/ghost").await;
        assert_eq!(status, 404);
        assert_eq!(body["detail"], "Session not found");
    }

    #[tokio::test]
    async fn test_stream_frames_and_headers() {
        let state = test_state();
        state.sessions.save("s1", Session::demo(demo_summary())).await;

        let (status, headers, body) = get_raw(router(state.clone()), "/api/analyze/s1").await;
        assert_eq!(status, 200);
        assert_eq!(headers["content-type"], "text/event-stream");
        assert_eq!(headers["cache-control"], "no-cache");
        assert_eq!(headers["x-accel-buffering"], "no");

        let payloads: Vec<&str> = body
            .split("\n\n")
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| chunk.strip_prefix("data: ").unwrap())
            .collect();
        assert_eq!(payloads.len(), 16);
        assert_eq!(payloads.last(), Some(&r#"{"type":"done"}"#));

        let mut board = ArenaBoard::new();
        for payload in &payloads {
            if let StreamFrame::Event(event) = StreamFrame::from_payload(payload).unwrap() {
                board.apply_event(&event);
            }
        }
        assert!(board.all_complete());
        assert_eq!(state.sessions.get("s1").await.unwrap().agent_results.len(), 3);
    }
}
