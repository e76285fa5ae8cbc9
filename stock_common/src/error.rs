//! Error types shared between client and server.
//!
//! The `TrackerError` enum unifies common failure cases for I/O, the network
//! fetch path, serialization, channel communication, and lock handling,
//! allowing crates to propagate a single error type.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// I/O error originating from the standard library or sockets/files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Transport-level fetch failure: timeout, connection refused, or a
    /// non-success HTTP status from the quote source.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The quote document was fetched but could not be read as text.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    LockPoisoned(String),
}

impl<T> From<PoisonError<T>> for TrackerError {
    fn from(err: PoisonError<T>) -> Self {
        TrackerError::LockPoisoned(err.to_string())
    }
}
