//! Stream relay
//!
//! Re-emits a chunked `data:` line stream from the completion endpoint as a
//! flat stream of text fragments.
//!
//! [`DeltaDecoder`] is the synchronous line-buffering state machine: push raw
//! bytes in, get complete fragments out. [`relay`] drives it from any byte
//! stream and adds the idle timeout and error propagation.
//!
//! Tolerance policy: lines that are not `data:` records, `data:` records that
//! are not valid JSON, and records without a text delta are dropped. Only a
//! failed read (or an idle timeout) ends the relay abnormally.

use futures::{Stream, StreamExt};
use std::time::Duration;
use tracing::{debug, warn};

use super::error::{BoxError, RelayError};
use super::types::StreamChunk;

/// Marker that starts every relevant record
pub const DATA_PREFIX: &str = "data:";

/// Payload marking the logical end of a completion
pub const DONE_SENTINEL: &str = "[DONE]";

/// One complete line of the upstream stream, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamEvent {
    /// Text fragment to forward
    Delta(String),
    /// `data: [DONE]`
    Done,
    /// Valid record carrying no text (role header, finish reason, ...)
    Empty,
    /// `data:` record whose payload is not a usable JSON chunk
    Malformed,
    /// Not a `data:` record (comments, heartbeats, blank separators)
    Ignored,
}

impl UpstreamEvent {
    /// Classify a single line (without its trailing newline)
    pub fn parse(line: &str) -> Self {
        let line = line.strip_suffix('\r').unwrap_or(line);

        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            return UpstreamEvent::Ignored;
        };
        let payload = payload.trim();

        if payload == DONE_SENTINEL {
            return UpstreamEvent::Done;
        }

        match serde_json::from_str::<StreamChunk>(payload) {
            Ok(chunk) => match chunk.into_delta() {
                Some(text) if !text.is_empty() => UpstreamEvent::Delta(text),
                _ => UpstreamEvent::Empty,
            },
            Err(_) => UpstreamEvent::Malformed,
        }
    }
}

/// Line-buffering decoder for the upstream byte stream.
///
/// Bytes are buffered until a newline arrives, so records split across reads
/// (including multi-byte characters) are reassembled before decoding.
#[derive(Debug)]
pub struct DeltaDecoder {
    buffer: Vec<u8>,
    max_line_bytes: usize,
    /// Dropping the rest of an oversized line until its newline
    discarding: bool,
    malformed: usize,
    oversized: usize,
    done_seen: bool,
}

impl DeltaDecoder {
    pub fn new(max_line_bytes: usize) -> Self {
        Self {
            buffer: Vec::new(),
            max_line_bytes,
            discarding: false,
            malformed: 0,
            oversized: 0,
            done_seen: false,
        }
    }

    /// Feed one chunk; returns the fragments completed by it, in order
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut fragments = Vec::new();
        let mut rest = chunk;

        while let Some(pos) = rest.iter().position(|b| *b == b'\n') {
            let (line, tail) = (&rest[..pos], &rest[pos + 1..]);
            rest = tail;

            if self.discarding {
                self.discarding = false;
                continue;
            }

            self.buffer.extend_from_slice(line);
            let event = UpstreamEvent::parse(&String::from_utf8_lossy(&self.buffer));
            self.buffer.clear();

            match event {
                UpstreamEvent::Delta(text) => fragments.push(text),
                UpstreamEvent::Done => self.done_seen = true,
                UpstreamEvent::Malformed => {
                    self.malformed += 1;
                    debug!("Dropping malformed stream record");
                }
                UpstreamEvent::Empty | UpstreamEvent::Ignored => {}
            }
        }

        if !self.discarding {
            self.buffer.extend_from_slice(rest);
            if self.buffer.len() > self.max_line_bytes {
                warn!(
                    "Stream line exceeded {} bytes without a newline, dropping it",
                    self.max_line_bytes
                );
                self.buffer.clear();
                self.oversized += 1;
                self.discarding = true;
            }
        }

        fragments
    }

    /// Bytes buffered from an unterminated line
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the `[DONE]` sentinel has been seen
    pub fn done_seen(&self) -> bool {
        self.done_seen
    }

    /// Number of `data:` records dropped as malformed
    pub fn malformed(&self) -> usize {
        self.malformed
    }

    /// Number of lines dropped for exceeding the buffer bound
    pub fn oversized(&self) -> usize {
        self.oversized
    }

    /// End of input. A trailing unterminated line is discarded.
    pub fn finish(mut self) {
        if !self.buffer.is_empty() {
            debug!(bytes = self.buffer.len(), "Discarding unterminated stream record");
            self.buffer.clear();
        }
        debug!(
            done_seen = self.done_seen,
            malformed = self.malformed,
            oversized = self.oversized,
            "Upstream stream closed"
        );
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RelayOptions {
    /// Longest wait for the next chunk; `None` waits forever
    pub idle_timeout: Option<Duration>,
    pub max_line_bytes: usize,
}

/// Relay an upstream byte stream as text fragments.
///
/// The returned stream ends when the upstream ends (the `[DONE]` sentinel
/// alone does not end it). A read error or idle timeout is yielded as the
/// final item. Dropping the returned stream drops the upstream with it.
pub fn relay<S, B, E>(
    upstream: S,
    options: RelayOptions,
) -> impl Stream<Item = Result<String, RelayError>> + Send + 'static
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    async_stream::stream! {
        let mut upstream = Box::pin(upstream);
        let mut decoder = DeltaDecoder::new(options.max_line_bytes);

        loop {
            let next = match options.idle_timeout {
                Some(limit) => match tokio::time::timeout(limit, upstream.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        yield Err(RelayError::Idle(limit));
                        break;
                    }
                },
                None => upstream.next().await,
            };

            match next {
                Some(Ok(chunk)) => {
                    for fragment in decoder.push(chunk.as_ref()) {
                        yield Ok(fragment);
                    }
                }
                Some(Err(e)) => {
                    yield Err(RelayError::Read(e.into()));
                    break;
                }
                None => break,
            }
        }

        decoder.finish();
    }
}
