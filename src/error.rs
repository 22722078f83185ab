//! Error types for the Airton LAN control layer
//!
//! Two failure classes matter to callers: decoding failures, which indicate a
//! firmware/protocol mismatch and are never retryable, and communication
//! failures, which are transient and safe to retry on the next heartbeat.
//! Constraint rejections are *not* errors; the engine silently filters them
//! the way the physical device silently ignores rejected commands.

use thiserror::Error;

/// Result type alias for Airton LAN operations
pub type Result<T> = std::result::Result<T, AcError>;

/// Error types for Airton LAN operations
#[derive(Error, Debug)]
pub enum AcError {
    /// A raw value was missing or outside its known domain
    #[error("decoding error: {0}")]
    Decoding(String),

    /// Network read/write against the device failed
    #[error("device communication error: {0}")]
    Communication(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Host runtime (widget creation/update) errors
    #[error("host runtime error: {0}")]
    Host(String),

    /// JSON parsing errors
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl AcError {
    /// Create a decoding error
    pub fn decoding(msg: impl Into<String>) -> Self {
        Self::Decoding(msg.into())
    }

    /// Create a communication error
    pub fn communication(msg: impl Into<String>) -> Self {
        Self::Communication(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a host runtime error
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    /// Whether retrying on a later heartbeat can reasonably succeed.
    ///
    /// Decoding errors mean the device speaks a different data-point layout
    /// than this crate understands; retrying would fail identically.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AcError::Communication(_) | AcError::Io(_) | AcError::Host(_)
        )
    }
}
