//! Event Stream Gateway
//!
//! Turns the runner's agent events into the frames of one analysis stream:
//! every agent event in arrival order, then a single terminal `done` frame.
//! Completed results are recorded on the session as they pass through.

use std::sync::Arc;

use axum::response::sse::Event;
use futures_util::stream::{self, Stream};
use spend_arena_core::{AgentEvent, StreamFrame};
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};

use super::session_store::SessionStore;

struct GatewayState {
    rx: mpsc::Receiver<AgentEvent>,
    sessions: Arc<SessionStore>,
    session_id: String,
    forwarded: usize,
    finished: bool,
    /// Cancels the agents once the client goes away and the stream is dropped.
    _cancel_on_drop: DropGuard,
}

impl GatewayState {
    async fn observe(&mut self, event: &AgentEvent) {
        self.forwarded += 1;
        if let Some(result) = &event.result {
            if !self
                .sessions
                .record_result(&self.session_id, result.clone())
                .await
            {
                tracing::debug!(
                    session_id = %self.session_id,
                    agent = %result.agent_type,
                    "Session gone; result not recorded"
                );
            }
        }
        if let Some(detail) = &event.detail {
            tracing::error!(session_id = %self.session_id, detail = %detail, "Analysis stream error");
        }
    }
}

/// Frames of one analysis stream. Ends with exactly one [`StreamFrame::Done`],
/// after the runner closed `rx`. Dropping the stream cancels `cancel`.
pub fn analysis_frames(
    sessions: Arc<SessionStore>,
    session_id: String,
    rx: mpsc::Receiver<AgentEvent>,
    cancel: CancellationToken,
) -> impl Stream<Item = StreamFrame> + Send {
    let state = GatewayState {
        rx,
        sessions,
        session_id,
        forwarded: 0,
        finished: false,
        _cancel_on_drop: cancel.drop_guard(),
    };

    stream::unfold(state, |mut state| async move {
        if state.finished {
            return None;
        }
        match state.rx.recv().await {
            Some(event) => {
                state.observe(&event).await;
                Some((StreamFrame::Event(event), state))
            }
            None => {
                state.finished = true;
                tracing::info!(
                    session_id = %state.session_id,
                    events = state.forwarded,
                    "Analysis stream complete"
                );
                Some((StreamFrame::Done, state))
            }
        }
    })
}

/// SSE event carrying `frame` as its `data` line.
pub fn sse_event(frame: &StreamFrame) -> Event {
    let data = frame.to_json().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to encode stream frame");
        serde_json::json!({ "type": "error", "detail": "failed to encode event" }).to_string()
    });
    Event::default().data(data)
}
