//! Connection Lifecycle Controller
//!
//! Owns the "is this session's stream already open" decision for a view.
//! A view calls [`ArenaController::ensure_started`] on every activation; the
//! controller opens at most one stream per session and hands back a
//! [`watch::Receiver`] over that session's [`ArenaBoard`].
//!
//! Switching sessions cancels the old stream and starts from a fresh board, so
//! events of the old session can never land in the new one: the old stream's
//! handler writes into a channel the controller has already let go of.

use spend_arena_core::{AgentEvent, ArenaBoard};
use tokio::sync::watch;

use crate::error::ClientError;
use crate::stream::{StreamClient, StreamHandle, StreamHandler};

/// Opens a stream for a session. Implemented by [`StreamClient`]; tests and
/// embedders can substitute their own transport.
pub trait StreamConnector: Send + Sync {
    fn connect(&self, session_id: &str, handler: Box<dyn StreamHandler>) -> StreamHandle;
}

impl StreamConnector for StreamClient {
    fn connect(&self, session_id: &str, handler: Box<dyn StreamHandler>) -> StreamHandle {
        self.open_stream(session_id, handler)
    }
}

/// Applies stream callbacks to one session's board.
pub struct BoardWriter {
    session_id: String,
    board: watch::Sender<ArenaBoard>,
}

impl BoardWriter {
    pub fn new(session_id: impl Into<String>, board: watch::Sender<ArenaBoard>) -> Self {
        Self {
            session_id: session_id.into(),
            board,
        }
    }
}

impl StreamHandler for BoardWriter {
    fn on_event(&mut self, event: AgentEvent) {
        if let Some(detail) = event.detail.as_deref().filter(|_| event.agent.is_none()) {
            tracing::warn!(session_id = %self.session_id, detail, "Gateway reported an error");
        }
        self.board.send_if_modified(|board| board.apply_event(&event));
    }

    fn on_done(&mut self) {
        self.board.send_modify(|board| {
            board.mark_done();
            tracing::info!(
                session_id = %self.session_id,
                all_complete = board.all_complete(),
                "Analysis stream finished"
            );
        });
    }

    fn on_error(&mut self, error: ClientError) {
        tracing::warn!(session_id = %self.session_id, error = %error, "Analysis stream failed");
        self.board
            .send_modify(|board| board.apply_transport_error(error.to_string()));
    }
}

struct ActiveSession {
    session_id: String,
    board: watch::Receiver<ArenaBoard>,
    handle: StreamHandle,
}

/// Per-view stream lifecycle.
pub struct ArenaController<C> {
    connector: C,
    active: Option<ActiveSession>,
}

impl<C: StreamConnector> ArenaController<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            active: None,
        }
    }

    /// Make sure exactly one stream is open for `session_id`.
    ///
    /// The check and the flag update happen together before anything is
    /// awaited, so repeated activations never open a second stream. A
    /// different session id tears down the current stream first.
    pub fn ensure_started(&mut self, session_id: &str) -> watch::Receiver<ArenaBoard> {
        if let Some(active) = &self.active {
            if active.session_id == session_id {
                return active.board.clone();
            }
        }

        self.teardown();

        let (tx, rx) = watch::channel(ArenaBoard::new());
        let writer = BoardWriter::new(session_id, tx);
        let handle = self.connector.connect(session_id, Box::new(writer));
        tracing::info!(session_id, "Analysis stream started");

        self.active = Some(ActiveSession {
            session_id: session_id.to_string(),
            board: rx.clone(),
            handle,
        });
        rx
    }

    /// Whether a stream for `session_id` has been started and not torn down.
    pub fn is_started(&self, session_id: &str) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.session_id == session_id)
    }

    pub fn session_id(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.session_id.as_str())
    }

    /// Current session's board, if a session is active.
    pub fn board(&self) -> Option<watch::Receiver<ArenaBoard>> {
        self.active.as_ref().map(|active| active.board.clone())
    }

    /// Leave the current session: cancel its stream and clear the started
    /// flag so the next activation starts over.
    pub fn reset(&mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(active) = self.active.take() {
            tracing::debug!(session_id = %active.session_id, "Tearing down analysis stream");
            active.handle.cancel();
        }
    }
}

impl<C> Drop for ArenaController<C> {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.handle.cancel();
        }
    }
}
