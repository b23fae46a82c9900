//! Stream Client
//!
//! Opens the analysis event stream for a session and delivers decoded events
//! to a [`StreamHandler`] as they arrive.
//!
//! Delivery contract per stream:
//! - `on_event` once per valid non-terminal frame, in wire order
//! - then exactly one of `on_done` or `on_error`, unless the stream was
//!   cancelled first, in which case neither is called
//! - no callback starts once the cancellation is observed; a callback that is
//!   already running when [`StreamHandle::cancel`] is called from another
//!   thread runs to completion

use std::time::Duration;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use spend_arena_core::{AgentEvent, StreamFrame};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::frame::decode_frames;
use crate::http_client::build_http_client;

/// Receiver of one stream's callbacks.
///
/// Callbacks run on the stream's task, one at a time.
pub trait StreamHandler: Send + 'static {
    fn on_event(&mut self, event: AgentEvent);
    fn on_done(&mut self);
    fn on_error(&mut self, error: ClientError);
}

/// [`StreamHandler`] built from three closures.
pub struct Callbacks<E, D, X> {
    on_event: E,
    on_done: Option<D>,
    on_error: Option<X>,
}

/// Build a [`StreamHandler`] from closures.
pub fn callbacks<E, D, X>(on_event: E, on_done: D, on_error: X) -> Callbacks<E, D, X>
where
    E: FnMut(AgentEvent) + Send + 'static,
    D: FnOnce() + Send + 'static,
    X: FnOnce(ClientError) + Send + 'static,
{
    Callbacks {
        on_event,
        on_done: Some(on_done),
        on_error: Some(on_error),
    }
}

impl<E, D, X> StreamHandler for Callbacks<E, D, X>
where
    E: FnMut(AgentEvent) + Send + 'static,
    D: FnOnce() + Send + 'static,
    X: FnOnce(ClientError) + Send + 'static,
{
    fn on_event(&mut self, event: AgentEvent) {
        (self.on_event)(event);
    }

    fn on_done(&mut self) {
        if let Some(on_done) = self.on_done.take() {
            on_done();
        }
    }

    fn on_error(&mut self, error: ClientError) {
        if let Some(on_error) = self.on_error.take() {
            on_error(error);
        }
    }
}

impl StreamHandler for Box<dyn StreamHandler> {
    fn on_event(&mut self, event: AgentEvent) {
        (**self).on_event(event);
    }

    fn on_done(&mut self) {
        (**self).on_done();
    }

    fn on_error(&mut self, error: ClientError) {
        (**self).on_error(error);
    }
}

/// Cancellation handle for an open stream.
///
/// Dropping the handle cancels the stream.
#[derive(Debug)]
pub struct StreamHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl StreamHandle {
    pub fn from_parts(token: CancellationToken, task: Option<JoinHandle<()>>) -> Self {
        Self { token, task }
    }

    /// Stop the stream. Idempotent; no callback starts once the stream task
    /// observes the cancellation, though one already in progress finishes.
    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            tracing::debug!("Cancelling analysis stream");
            self.token.cancel();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether the stream task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the stream task to exit without cancelling it.
    pub async fn join(mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Analysis stream task failed");
            }
        }
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// How a drive loop ended.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StreamOutcome {
    Done,
    Failed(ClientError),
    Cancelled,
}

/// Pump frames from `byte_stream` into `handler` until the terminal frame,
/// end of body, a read error, or cancellation.
///
/// Returns after the matching terminal callback has been invoked.
pub async fn drive<S, E, H>(byte_stream: S, handler: &mut H, token: &CancellationToken)
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
    H: StreamHandler + ?Sized,
{
    let outcome = pump(byte_stream, handler, token).await;
    finish(outcome, handler, token);
}

async fn pump<S, E, H>(byte_stream: S, handler: &mut H, token: &CancellationToken) -> StreamOutcome
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
    H: StreamHandler + ?Sized,
{
    let frames = decode_frames(byte_stream);
    futures_util::pin_mut!(frames);

    loop {
        let next = tokio::select! {
            biased;
            _ = token.cancelled() => return StreamOutcome::Cancelled,
            next = frames.next() => next,
        };

        match next {
            Some(Ok(StreamFrame::Done)) => return StreamOutcome::Done,
            Some(Ok(StreamFrame::Event(event))) => {
                if token.is_cancelled() {
                    return StreamOutcome::Cancelled;
                }
                handler.on_event(event);
            }
            Some(Err(e)) => return StreamOutcome::Failed(e),
            None => {
                tracing::warn!("Analysis stream ended without a done frame");
                return StreamOutcome::Done;
            }
        }
    }
}

fn finish<H>(outcome: StreamOutcome, handler: &mut H, token: &CancellationToken)
where
    H: StreamHandler + ?Sized,
{
    // anything that races with a cancel is the cancel's doing
    if token.is_cancelled() {
        tracing::debug!(?outcome, "Analysis stream cancelled");
        return;
    }
    match outcome {
        StreamOutcome::Done => handler.on_done(),
        StreamOutcome::Failed(e) => {
            tracing::warn!(error = %e, "Analysis stream failed");
            handler.on_error(e);
        }
        StreamOutcome::Cancelled => {}
    }
}

/// Configuration for [`StreamClient`]
#[derive(Debug, Clone)]
pub struct StreamClientConfig {
    /// Gateway origin, e.g. `http://127.0.0.1:8000`
    pub base_url: String,
    /// Time allowed to establish the connection. The stream itself has no
    /// overall deadline.
    pub connect_timeout: Duration,
}

impl Default for StreamClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Opens analysis streams against one gateway.
#[derive(Debug, Clone)]
pub struct StreamClient {
    http: reqwest::Client,
    base_url: Url,
}

impl StreamClient {
    pub fn new(config: &StreamClientConfig) -> ClientResult<Self> {
        let http = build_http_client(Some(config.connect_timeout), None)?;
        Self::with_http_client(http, &config.base_url)
    }

    pub fn with_http_client(http: reqwest::Client, base_url: &str) -> ClientResult<Self> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET {base}/api/analyze/{session_id}`
    pub fn stream_url(&self, session_id: &str) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(["api", "analyze", session_id]);
        Ok(url)
    }

    /// Start streaming `session_id` into `handler`.
    ///
    /// Returns immediately; the request runs on a spawned task, so this must
    /// be called from within a Tokio runtime.
    pub fn open_stream<H: StreamHandler>(&self, session_id: &str, handler: H) -> StreamHandle {
        let token = CancellationToken::new();
        let task_token = token.clone();
        let http = self.http.clone();
        let url = self.stream_url(session_id);
        let session_id = session_id.to_string();

        let task = tokio::spawn(async move {
            let mut handler = handler;
            tracing::info!(session_id = %session_id, "Opening analysis stream");
            let url = match url {
                Ok(url) => url,
                Err(e) => return finish(StreamOutcome::Failed(e), &mut handler, &task_token),
            };
            run(http, url, &mut handler, &task_token).await;
            tracing::debug!(session_id = %session_id, "Analysis stream task exiting");
        });

        StreamHandle::from_parts(token, Some(task))
    }
}

async fn run<H: StreamHandler>(http: reqwest::Client, url: Url, handler: &mut H, token: &CancellationToken) {
    let request = http
        .get(url)
        .header(ACCEPT, "text/event-stream")
        .header(CACHE_CONTROL, "no-cache")
        .send();

    let response = tokio::select! {
        biased;
        _ = token.cancelled() => return finish(StreamOutcome::Cancelled, handler, token),
        response = request => response,
    };

    let response = match response {
        Ok(response) => response,
        Err(e) => return finish(StreamOutcome::Failed(e.into()), handler, token),
    };

    let status = response.status();
    if !status.is_success() {
        let body = tokio::select! {
            biased;
            _ = token.cancelled() => String::new(),
            body = response.text() => body.unwrap_or_default(),
        };
        let error = ClientError::HttpError {
            status: status.as_u16(),
            body,
        };
        return finish(StreamOutcome::Failed(error), handler, token);
    }

    drive(response.bytes_stream(), handler, token).await;
}
