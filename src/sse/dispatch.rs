//! Delta Dispatch
//!
//! Forwards recovered content deltas to the consumer in arrival order and
//! guarantees exactly one terminal event per stream. The three callbacks
//! of the original contract (`onDelta`/`onDone`/`onError`) are modeled as
//! a finite sequence of [`StreamEvent`] values over an mpsc channel: zero
//! or more `Delta`s followed by exactly one of `Done`/`Error`.
//!
//! Dropping the receiver is the cancellation path: the next dispatch
//! notices the closed channel and the pump stops reading the transport.

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;

use crate::error::StreamError;
use crate::sse::lines::LineBuffer;
use crate::sse::parser::{ParsedEvent, SseParser};

/// One event of a streaming chat response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamEvent {
    /// An incremental content fragment, in arrival order.
    Delta(String),
    /// The response completed normally.
    Done,
    /// The response failed; partial content already delivered stays valid.
    Error(StreamError),
}

/// Orders deltas and enforces the single-terminal contract.
#[derive(Debug)]
pub struct Dispatcher {
    tx: mpsc::Sender<StreamEvent>,
    finished: bool,
}

impl Dispatcher {
    /// Wrap a channel sender.
    #[must_use]
    pub fn new(tx: mpsc::Sender<StreamEvent>) -> Self {
        Self {
            tx,
            finished: false,
        }
    }

    /// Whether a terminal event has already been dispatched.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Dispatch one content delta.
    ///
    /// Returns `false` if the consumer is gone (or a terminal event was
    /// already sent); the caller should stop reading the stream.
    pub async fn delta(&mut self, text: String) -> bool {
        if self.finished {
            return false;
        }
        self.tx.send(StreamEvent::Delta(text)).await.is_ok()
    }

    /// Dispatch the completion event. No-op after any terminal event.
    pub async fn done(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        let _ = self.tx.send(StreamEvent::Done).await;
    }

    /// Dispatch the failure event. No-op after any terminal event.
    pub async fn fail(&mut self, error: StreamError) {
        if self.finished {
            return;
        }
        self.finished = true;
        tracing::debug!(error = %error, "stream terminated with error");
        let _ = self.tx.send(StreamEvent::Error(error)).await;
    }
}

/// Drive a byte stream through line buffering and event parsing,
/// dispatching the result.
///
/// Generic over the byte source so tests can feed synthetic chunk
/// sequences while the client feeds a `reqwest` body stream. Completion
/// fires when the sentinel is seen or the stream ends, whichever comes
/// first, after all deltas recovered up to that point were dispatched.
pub async fn pump<S, B, E>(mut stream: S, dispatcher: &mut Dispatcher)
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut lines = LineBuffer::new();
    let mut parser = SseParser::new();

    while let Some(chunk) = stream.next().await {
        let bytes = match chunk {
            Ok(bytes) => bytes,
            Err(err) => {
                dispatcher.fail(StreamError::read(err)).await;
                return;
            }
        };

        for line in lines.push(bytes.as_ref()) {
            match parser.feed_line(&line) {
                ParsedEvent::Delta(text) => {
                    if !dispatcher.delta(text).await {
                        // Consumer abandoned the stream.
                        return;
                    }
                }
                ParsedEvent::Done => {
                    dispatcher.done().await;
                    return;
                }
                ParsedEvent::Ignored => {}
            }
        }
    }

    // Stream ended without the sentinel: flush whatever is still buffered,
    // then complete.
    for text in parser.finish(lines.finish()) {
        if !dispatcher.delta(text).await {
            return;
        }
    }
    dispatcher.done().await;
}
