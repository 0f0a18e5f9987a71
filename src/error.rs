//! Error types for jigctl
//!
//! Provides a unified error type for the codec, the command table and
//! the network client/server.

use std::time::Duration;
use thiserror::Error;

/// Result type alias using JigError
pub type Result<T> = std::result::Result<T, JigError>;

/// Unified error type for jigctl operations
#[derive(Debug, Error)]
pub enum JigError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Reply Errors (client side)
    // -------------------------------------------------------------------------
    /// The server answered with a `-` reply. Displays as the bare message.
    #[error("{0}")]
    Remote(String),

    /// The reply did not start with a known tag (or was empty).
    #[error("got unknown response: {0:?}")]
    UnknownResponse(String),

    /// A known tag carried a payload that could not be decoded.
    #[error("malformed payload for tag '{tag}': {payload:?}")]
    MalformedPayload { tag: char, payload: String },

    #[error("timed out after {0:?} waiting for a reply")]
    Timeout(Duration),

    // -------------------------------------------------------------------------
    // Command Errors (server side, sent back as `-` replies)
    // -------------------------------------------------------------------------
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("hardware error: {0}")]
    Hardware(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl JigError {
    /// True if the server explicitly refused the command
    pub fn is_remote(&self) -> bool {
        matches!(self, JigError::Remote(_))
    }

    /// True if the reply could not be recognized as any reply type
    pub fn is_unknown_response(&self) -> bool {
        matches!(self, JigError::UnknownResponse(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, JigError::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_displays_bare_message() {
        let err = JigError::Remote("insufficient voltage".to_string());
        assert_eq!(err.to_string(), "insufficient voltage");
        assert!(err.is_remote());
        assert!(!err.is_unknown_response());
    }

    #[test]
    fn kinds_are_exclusive() {
        let unknown = JigError::UnknownResponse("?garbage".to_string());
        let timeout = JigError::Timeout(Duration::from_secs(2));
        assert!(unknown.is_unknown_response() && !unknown.is_remote() && !unknown.is_timeout());
        assert!(timeout.is_timeout() && !timeout.is_remote() && !timeout.is_unknown_response());
    }
}
