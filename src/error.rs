//! Error Types
//!
//! Errors surfaced by the streaming pipeline. These travel through the
//! event channel as the payload of [`StreamEvent::Error`], so they carry
//! owned strings rather than source errors and stay `Clone`.
//!
//! [`StreamEvent::Error`]: crate::sse::StreamEvent::Error

use thiserror::Error;

/// Terminal failure of a streaming chat invocation.
///
/// Exactly one of `Done`/`Error` is delivered per stream; partial content
/// dispatched before the error remains valid (no rollback).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StreamError {
    /// The backend rejected the request with a non-2xx status.
    ///
    /// `message` is the server-provided error text when the body carried
    /// one, otherwise the status line.
    #[error("{message}")]
    Api {
        /// HTTP status code returned by the backend
        status: u16,
        /// Human-readable error message
        message: String,
    },

    /// The request could not be sent at all (connect failure, bad URL,
    /// request build error).
    #[error("request failed: {message}")]
    Request {
        /// Description of the transport failure
        message: String,
    },

    /// The response body stream failed mid-read.
    #[error("stream read failed: {message}")]
    Read {
        /// Description of the read failure
        message: String,
    },
}

impl StreamError {
    /// Create a request failure from anything displayable.
    pub fn request(err: impl std::fmt::Display) -> Self {
        Self::Request {
            message: err.to_string(),
        }
    }

    /// Create a read failure from anything displayable.
    pub fn read(err: impl std::fmt::Display) -> Self {
        Self::Read {
            message: err.to_string(),
        }
    }
}
