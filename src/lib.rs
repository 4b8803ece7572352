//! Tutor Stream - Streaming Chat Pipeline for Study Bright
//!
//! This crate implements the streaming side of the Study Bright AI tutor:
//! it consumes a server-sent-event chat response, recovers the incremental
//! content deltas, and paces their on-screen reveal. It is completely
//! independent of any UI framework and can drive a TUI, web UI, native
//! GUI, or run headless for testing.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        TutorClient                           │
//! │   POST chat/completions (stream: true)                       │
//! └───────────────┬──────────────────────────────────────────────┘
//!                 │ response bytes
//! ┌───────────────┼──────────────────────────────────────────────┐
//! │               ▼          STREAM PIPELINE                     │
//! │  ┌────────────┐   ┌───────────┐   ┌────────────┐             │
//! │  │ LineBuffer │──▶│ SseParser │──▶│ Dispatcher │──▶ events   │
//! │  └────────────┘   └───────────┘   └────────────┘             │
//! └───────────────────────────────────┬──────────────────────────┘
//!                                     │ StreamEvent channel
//!                 ┌───────────────────┴───────────────┐
//!                 ▼                                   ▼
//!          ┌─────────────┐                   ┌─────────────────┐
//!          │ ChatMessage │                   │ RevealScheduler │
//!          │ (content)   │                   │ (typing pace)   │
//!          └─────────────┘                   └─────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`TutorClient`]: sends chat requests and streams responses
//! - [`StreamEvent`]: one event of a response: `Delta`, `Done`, or `Error`
//! - [`ChatMessage`]: a conversation message, appendable while streaming
//! - [`RevealScheduler`]: constant-rate typewriter reveal of received text
//!
//! # Quick Start
//!
//! ```ignore
//! use tutor_stream::{ChatRequest, StreamEvent, TutorClient, load_config};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = load_config().unwrap();
//!     let client = TutorClient::new(config);
//!
//!     let request = ChatRequest::new().with_user("Explain photosynthesis");
//!     let mut events = client.stream_chat(&request);
//!
//!     while let Some(event) = events.recv().await {
//!         match event {
//!             StreamEvent::Delta(text) => print!("{text}"),
//!             StreamEvent::Done => break,
//!             StreamEvent::Error(err) => {
//!                 eprintln!("stream failed: {err}");
//!                 break;
//!             }
//!         }
//!     }
//! }
//! ```
//!
//! # Ordering and Termination Guarantees
//!
//! Deltas are delivered strictly in the order their bytes arrived and
//! parsed; exactly one of `Done`/`Error` terminates each stream (or
//! neither, if the consumer drops the receiver first). Chunk boundaries,
//! including cuts through multi-byte characters or through a JSON record,
//! never change the delivered delta sequence.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod reveal;
pub mod sse;

// Re-exports for convenience
pub use client::{ChatRequest, TutorClient};
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigSource,
    TutorConfig,
};
pub use error::StreamError;
pub use message::{ChatMessage, MessageId, MessageRole};
pub use reveal::{RevealConfig, RevealPhase, RevealScheduler};
pub use sse::{pump, Dispatcher, LineBuffer, ParsedEvent, SseParser, StreamEvent};
