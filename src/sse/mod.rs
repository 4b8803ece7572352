//! Streaming Response Pipeline
//!
//! The server-sent-event side of a tutor chat: raw response bytes in,
//! ordered content deltas and a single terminal event out.
//!
//! ```text
//! network bytes ─▶ LineBuffer ─▶ SseParser ─▶ Dispatcher ─▶ StreamEvent channel
//! ```
//!
//! Each stage is independently testable: [`LineBuffer`] only frames lines,
//! [`SseParser`] only interprets records, [`Dispatcher`] only orders and
//! terminates. [`pump`] wires them over any byte stream.

pub mod dispatch;
pub mod lines;
pub mod parser;

pub use dispatch::{pump, Dispatcher, StreamEvent};
pub use lines::LineBuffer;
pub use parser::{ParsedEvent, SseParser};
