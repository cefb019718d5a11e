//! Server-Sent Events framing.
//!
//! The MCP SSE transport delivers every server-to-client message as an SSE
//! event. This module decodes the byte stream into events: `event:` and
//! `data:` fields, comment lines, multi-line data, and CRLF line endings,
//! with events terminated by a blank line.

use futures_util::StreamExt;
use futures_util::stream::BoxStream;

use crate::error::{Error, Result};

/// Maximum bytes buffered for a single event (1MB).
/// Sized for large tool outputs (file reads, search results).
pub const MAX_EVENT_SIZE: usize = 1024 * 1024;

/// A decoded server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event type; defaults to "message" when the server omits `event:`.
    pub event: String,
    /// Data payload; multiple `data:` lines are joined with newlines.
    pub data: String,
}

/// Incremental SSE decoder.
///
/// Bytes are pushed in as they arrive off the wire; complete events are
/// pulled out as they become available. Chunk boundaries may fall anywhere,
/// including mid-line. The size cap applies to buffered bytes, so an
/// endless line fails as it accumulates rather than on event completion.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: String,
    event_type: Option<String>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw bytes from the wire.
    pub fn push(&mut self, chunk: &[u8]) -> Result<()> {
        self.buf.push_str(&String::from_utf8_lossy(chunk));

        let pending = self.buf.len() + self.data.iter().map(String::len).sum::<usize>();
        if pending > MAX_EVENT_SIZE {
            return Err(Error::EventTooLarge {
                size: pending,
                max: MAX_EVENT_SIZE,
            });
        }

        Ok(())
    }

    /// Pull the next complete event, if one is buffered.
    pub fn next_event(&mut self) -> Option<SseEvent> {
        while let Some(pos) = self.buf.find('\n') {
            let line = self.buf[..pos].trim_end_matches('\r').to_string();
            self.buf.drain(..=pos);

            if line.is_empty() {
                // Blank line terminates an event.
                if self.event_type.is_some() || !self.data.is_empty() {
                    let event = self
                        .event_type
                        .take()
                        .unwrap_or_else(|| "message".to_string());
                    let data = self.data.join("\n");
                    self.data.clear();
                    return Some(SseEvent { event, data });
                }
                continue;
            }

            if line.starts_with(':') {
                // Comment line (often used as keep-alive).
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line.as_str(), ""),
            };

            match field {
                "event" => self.event_type = Some(value.to_string()),
                "data" => self.data.push(value.to_string()),
                _ => {}
            }
        }

        None
    }
}

/// An SSE event stream over an HTTP response body.
pub struct EventStream {
    bytes: BoxStream<'static, reqwest::Result<Vec<u8>>>,
    decoder: SseDecoder,
}

impl EventStream {
    /// Wrap a streaming HTTP response body.
    pub fn new(response: reqwest::Response) -> Self {
        Self::from_stream(response.bytes_stream().map(|r| r.map(|b| b.to_vec())).boxed())
    }

    pub(crate) fn from_stream(bytes: BoxStream<'static, reqwest::Result<Vec<u8>>>) -> Self {
        Self {
            bytes,
            decoder: SseDecoder::new(),
        }
    }

    /// Wait for the next event.
    ///
    /// Fails with [`Error::ServerClosed`] when the server ends the stream.
    pub async fn next_event(&mut self) -> Result<SseEvent> {
        loop {
            if let Some(event) = self.decoder.next_event() {
                return Ok(event);
            }

            match self.bytes.next().await {
                Some(Ok(chunk)) => self.decoder.push(&chunk)?,
                Some(Err(e)) => return Err(Error::Network(e.to_string())),
                None => return Err(Error::ServerClosed),
            }
        }
    }
}
