//! Core error types for craftmark-core.
//!
//! The session machinery itself is total and never fails. These errors cover
//! the ambient surfaces around it: configuration on disk and the channel to
//! the async session runtime.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for craftmark-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Session runtime errors
    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Value was well-formed but does not fit the key's type
    #[error("Failed to parse configuration value for '{key}': {message}")]
    ParseFailed { key: String, message: String },
}

/// Errors talking to a [`crate::runtime::SessionRuntime`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RuntimeError {
    /// The runtime loop has shut down and no longer accepts commands.
    #[error("session runtime is closed")]
    Closed,
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for RuntimeError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        RuntimeError::Closed
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for RuntimeError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        RuntimeError::Closed
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
