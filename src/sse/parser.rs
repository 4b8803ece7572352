//! Server-Sent-Event Record Parsing
//!
//! Interprets the decoded lines of a streaming chat response. The backend
//! speaks the OpenAI-compatible wire format: each meaningful line is
//! `data: <json>`, the JSON carries `choices[0].delta.content`, and the
//! literal `data: [DONE]` marks normal termination.
//!
//! A single event's JSON can reach us split across more than one decoded
//! line. A line whose payload fails to parse is therefore not discarded:
//! it is buffered and re-parsed joined with the next arriving line. The
//! buffer keeps the lines individually so the end-of-stream flush can make
//! a last one-line-at-a-time attempt, dropping whatever still fails.

use serde::Deserialize;

/// Prefix of a data record.
const DATA_PREFIX: &str = "data: ";

/// Terminal sentinel payload.
const DONE_SENTINEL: &str = "[DONE]";

/// One chunk of an OpenAI-compatible streaming response.
#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Outcome of feeding one line to the parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedEvent {
    /// Nothing to dispatch: comment, keepalive, non-data line, contentless
    /// delta, or a fragment held for reassembly.
    Ignored,
    /// An incremental content fragment to dispatch.
    Delta(String),
    /// The terminal sentinel; no further lines are processed.
    Done,
}

/// Stateful parser for the event side of the stream.
#[derive(Debug, Default)]
pub struct SseParser {
    /// Lines whose combined payload has not yet parsed as JSON.
    pending: Vec<String>,
    /// Set once the sentinel is seen.
    done: bool,
}

impl SseParser {
    /// Create a fresh parser.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the sentinel has been observed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed one decoded line.
    pub fn feed_line(&mut self, line: &str) -> ParsedEvent {
        if self.done {
            return ParsedEvent::Ignored;
        }

        let record = if self.pending.is_empty() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(':') {
                return ParsedEvent::Ignored;
            }
            if !line.starts_with(DATA_PREFIX) {
                return ParsedEvent::Ignored;
            }
            line.to_string()
        } else {
            // Reassembly: append to the buffered fragment and retry the
            // combined record.
            let mut combined = self.pending.concat();
            combined.push_str(line);
            combined
        };

        let payload = record
            .strip_prefix(DATA_PREFIX)
            .unwrap_or(&record)
            .trim();

        if payload == DONE_SENTINEL {
            self.done = true;
            self.pending.clear();
            return ParsedEvent::Done;
        }

        match serde_json::from_str::<ChatChunk>(payload) {
            Ok(chunk) => {
                self.pending.clear();
                match extract_content(chunk) {
                    Some(text) => ParsedEvent::Delta(text),
                    None => ParsedEvent::Ignored,
                }
            }
            Err(err) => {
                tracing::trace!(error = %err, "buffering incomplete event fragment");
                self.pending.push(line.to_string());
                ParsedEvent::Ignored
            }
        }
    }

    /// Best-effort flush at end of stream.
    ///
    /// Re-parses every still-buffered line (plus the final unterminated
    /// line, if any) one at a time. Lines that still fail are dropped,
    /// not surfaced: a malformed trailing fragment must not invalidate an
    /// otherwise-successful response.
    #[must_use]
    pub fn finish(mut self, leftover: Option<String>) -> Vec<String> {
        if self.done {
            return Vec::new();
        }

        self.pending.extend(leftover);

        let mut deltas = Vec::new();
        for line in &self.pending {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(':') {
                continue;
            }
            let payload = line.strip_prefix(DATA_PREFIX).unwrap_or(line).trim();
            if payload == DONE_SENTINEL {
                break;
            }
            match serde_json::from_str::<ChatChunk>(payload) {
                Ok(chunk) => {
                    if let Some(text) = extract_content(chunk) {
                        deltas.push(text);
                    }
                }
                Err(err) => {
                    tracing::debug!(error = %err, "dropping unparseable trailing fragment");
                }
            }
        }
        deltas
    }
}

/// Pull the incremental content out of a parsed chunk, if present and
/// non-empty.
fn extract_content(chunk: ChatChunk) -> Option<String> {
    chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|text| !text.is_empty())
}
