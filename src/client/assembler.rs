// src/client/assembler.rs
//! Rebuilds assistant text from a relayed `data:` frame stream.
//!
//! Chunks arrive with arbitrary boundaries. Bytes are decoded statefully,
//! complete lines are cut off the front of the pending buffer, and each
//! `data:` payload is applied in arrival order. A payload that does not parse
//! as JSON is taken to be cut short: it goes back on the front of the buffer
//! and the round ends until more bytes arrive.

use std::fmt::Display;
use std::time::Duration;

use futures::{Stream, StreamExt};

use super::conversation::{ERROR_NOTICE, MessageSink};
use super::decoder::Utf8Decoder;
use crate::message::StreamChunk;

const DATA_PREFIX: &str = "data: ";
const TERMINATOR: &str = "[DONE]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssemblyState {
    #[default]
    Idle,
    Streaming,
    Done,
    Errored,
}

impl AssemblyState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Errored)
    }
}

#[derive(Debug, Default)]
pub struct StreamAssembler {
    decoder: Utf8Decoder,
    pending: String,
    text: String,
    state: AssemblyState,
}

impl StreamAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AssemblyState {
        self.state
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Feeds one chunk. `on_text` sees the full assistant text after every
    /// applied delta. Returns the number of deltas applied.
    pub fn push(&mut self, chunk: &[u8], mut on_text: impl FnMut(&str)) -> usize {
        if self.state.is_terminal() {
            return 0;
        }
        self.state = AssemblyState::Streaming;

        let decoded = self.decoder.decode(chunk);
        self.pending.push_str(&decoded);

        let mut applied = 0;
        while let Some(newline) = self.pending.find('\n') {
            let mut line: String = self.pending.drain(..=newline).collect();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }

            if line.starts_with(':') || line.trim().is_empty() {
                continue;
            }
            let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
                continue;
            };
            let payload = payload.trim();

            if payload == TERMINATOR {
                self.state = AssemblyState::Done;
                self.pending.clear();
                break;
            }

            match serde_json::from_str::<serde_json::Value>(payload) {
                Ok(value) => {
                    let frame: StreamChunk = serde_json::from_value(value).unwrap_or_default();
                    if let Some(delta) = frame.delta_text() {
                        self.text.push_str(delta);
                        on_text(&self.text);
                        applied += 1;
                    }
                }
                Err(_) => {
                    line.push('\n');
                    self.pending.insert_str(0, &line);
                    break;
                }
            }
        }
        applied
    }

    /// Upstream closed without a terminator. Whatever was assembled stands.
    pub fn finish(&mut self) {
        if !self.state.is_terminal() {
            self.decoder.finish();
            self.pending.clear();
            self.state = AssemblyState::Done;
        }
    }

    pub fn fail(&mut self) {
        self.pending.clear();
        self.state = AssemblyState::Errored;
    }
}

/// Drives `stream` to completion, writing into a fresh assistant entry of
/// `sink`. The stream is dropped, releasing its connection, on every exit.
pub async fn drive<S, B, E, K>(stream: S, sink: &mut K, idle_timeout: Option<Duration>) -> AssemblyState
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
    K: MessageSink + ?Sized,
{
    let mut stream = std::pin::pin!(stream);
    let mut assembler = StreamAssembler::new();
    let id = sink.open_assistant();

    loop {
        let next = match idle_timeout {
            Some(limit) => match tokio::time::timeout(limit, stream.next()).await {
                Ok(next) => next,
                Err(_) => {
                    tracing::warn!(timeout_ms = limit.as_millis() as u64, "stream stalled");
                    assembler.fail();
                    sink.push_notice(ERROR_NOTICE);
                    break;
                }
            },
            None => stream.next().await,
        };

        match next {
            Some(Ok(chunk)) => {
                assembler.push(chunk.as_ref(), |text| sink.update_assistant(id, text));
                if assembler.state().is_terminal() {
                    break;
                }
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, "stream read failed");
                assembler.fail();
                sink.push_notice(ERROR_NOTICE);
                break;
            }
            None => {
                assembler.finish();
                break;
            }
        }
    }

    tracing::debug!(state = ?assembler.state(), chars = assembler.text().len(), "stream closed");
    assembler.state()
}
