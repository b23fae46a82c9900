//! Frame Decoding
//!
//! Turns the raw body of the analysis event stream into [`StreamFrame`]s.
//!
//! Chunk boundaries are arbitrary: a frame line can be split across any
//! number of reads, including inside a multi-byte UTF-8 sequence. The decoder
//! keeps the unterminated tail of the last chunk as raw bytes and only decodes
//! text once a full line is available.

use std::collections::VecDeque;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use spend_arena_core::{CoreResult, StreamFrame, DATA_PREFIX};

use crate::error::ClientError;

/// Parse one complete line of the stream.
///
/// Returns `None` for lines that carry no frame: blank separators, lines
/// without the `data: ` prefix, and prefixes with an empty payload.
/// Returns `Some(Err(..))` for a data line whose payload is not a JSON object.
pub fn parse_frame_line(line: &str) -> Option<CoreResult<StreamFrame>> {
    let payload = line.strip_prefix(DATA_PREFIX)?.trim();
    if payload.is_empty() {
        return None;
    }
    Some(StreamFrame::from_payload(payload))
}

/// Incremental line splitter with a carry-over buffer.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    malformed: usize,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return every frame completed by it, in order.
    ///
    /// Malformed frames are logged and dropped.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamFrame> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.buffer[start..].iter().position(|b| *b == b'\n') {
            let end = start + offset;
            let line = String::from_utf8_lossy(&self.buffer[start..end]).into_owned();
            if let Some(frame) = self.decode_line(&line) {
                frames.push(frame);
            }
            start = end + 1;
        }
        self.buffer.drain(..start);
        frames
    }

    /// Decode whatever is left once the body has ended without a final newline.
    pub fn finish(&mut self) -> Option<StreamFrame> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        let line = String::from_utf8_lossy(&rest).into_owned();
        self.decode_line(&line)
    }

    /// Bytes currently held back waiting for a line terminator.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Number of malformed frames dropped so far.
    pub fn malformed_count(&self) -> usize {
        self.malformed
    }

    fn decode_line(&mut self, line: &str) -> Option<StreamFrame> {
        match parse_frame_line(line)? {
            Ok(frame) => Some(frame),
            Err(e) => {
                self.malformed += 1;
                tracing::warn!(error = %e, "Skipping malformed stream frame");
                None
            }
        }
    }
}

struct FrameStreamState<E> {
    inner: Pin<Box<dyn Stream<Item = Result<Bytes, E>> + Send>>,
    decoder: FrameDecoder,
    pending: VecDeque<StreamFrame>,
    finished: bool,
}

/// Adapt a raw byte stream into a stream of decoded frames.
///
/// A read error is yielded once as [`ClientError::StreamError`] and ends the
/// stream. The stream also ends after the body is exhausted.
pub fn decode_frames<S, E>(byte_stream: S) -> impl Stream<Item = Result<StreamFrame, ClientError>> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let state = FrameStreamState {
        inner: Box::pin(byte_stream),
        decoder: FrameDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    futures_util::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(frame) = state.pending.pop_front() {
                return Some((Ok(frame), state));
            }
            if state.finished {
                return None;
            }

            match state.inner.next().await {
                Some(Ok(chunk)) => {
                    let frames = state.decoder.push(&chunk);
                    state.pending.extend(frames);
                }
                Some(Err(e)) => {
                    state.finished = true;
                    return Some((
                        Err(ClientError::StreamError(format!("Stream read error: {}", e))),
                        state,
                    ));
                }
                None => {
                    state.finished = true;
                    if let Some(frame) = state.decoder.finish() {
                        state.pending.push_back(frame);
                    }
                }
            }
        }
    })
}
