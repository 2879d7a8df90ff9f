//! Error types for the Spy Cat Agency API client.
//!
//! # Design
//! Every failure a call can produce is folded into one `RequestError` so
//! callers match on the variant instead of inspecting transport internals.
//! Configuration problems are detected before any I/O; transport problems
//! mean no response arrived; `Http` means the server answered with a
//! non-2xx status.

use serde_json::Value;
use thiserror::Error;

/// Coarse classification of a [`RequestError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Transport,
    Http,
    Decode,
}

/// Errors returned by `ApiClient::request` and the resource accessors.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The caller supplied an invalid path or configuration. No request was sent.
    #[error("invalid request configuration: {message}")]
    Configuration { message: String },

    /// The request could not complete (connection, DNS, timeout, bad URL).
    #[error("network error: {message}")]
    Transport { message: String },

    /// The server returned a status outside 200..=299. `body` holds the
    /// decoded JSON error payload, or `None` when it was empty or not JSON.
    #[error("HTTP error! status: {status}")]
    Http { status: u16, body: Option<Value> },

    /// A body that had to be JSON (or a specific record shape) was not.
    #[error("failed to decode response: {message}")]
    Decode { message: String },
}

impl RequestError {
    pub fn configuration(message: impl Into<String>) -> Self {
        RequestError::Configuration {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        RequestError::Transport {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        RequestError::Decode {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RequestError::Configuration { .. } => ErrorKind::Configuration,
            RequestError::Transport { .. } => ErrorKind::Transport,
            RequestError::Http { .. } => ErrorKind::Http,
            RequestError::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// Status code of an `Http` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Decoded error payload of an `Http` error.
    pub fn body(&self) -> Option<&Value> {
        match self {
            RequestError::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// The backend's human-readable `detail` field, if the error body has one.
    pub fn detail(&self) -> Option<&str> {
        self.body()?.get("detail")?.as_str()
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
