//! Core error types for locked-core.
//!
//! The taxonomy is narrow: bad durations and illegal transitions
//! are rejected at the API boundary, persistence failures degrade logging to
//! memory only. Nothing here is fatal to the process.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::{Mode, RunState};

/// Core error type for locked-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Duration input or value rejected
    #[error("Invalid duration: {0}")]
    Duration(#[from] DurationError),

    /// Operation not allowed from the current run state
    #[error("Invalid transition: {0}")]
    Transition(#[from] TransitionError),

    /// Key-value store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Duration validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    /// Input is not an integer, optionally suffixed with `s`
    #[error("cannot parse '{0}' as a duration (expected minutes, or seconds with an 's' suffix)")]
    Unparseable(String),

    /// Below the minimum accepted for this input form
    #[error("{secs}s is below the minimum of {min_secs}s")]
    TooShort { secs: u64, min_secs: u64 },

    /// Above the maximum accepted duration
    #[error("{secs}s exceeds the maximum of {max_secs}s")]
    TooLong { secs: u64, max_secs: u64 },

    /// Zero seconds
    #[error("duration must be positive")]
    NonPositive,
}

/// Illegal state machine transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The requested operation is not valid in the current run state
    #[error("cannot {action} while {state}")]
    NotAllowed {
        action: &'static str,
        state: RunState,
    },

    /// A completion response arrived with no completed session waiting for one
    #[error("no completed session is awaiting a response")]
    NoPendingCompletion,

    /// Mode name did not match a known mode
    #[error("unknown mode '{0}' (expected 'work' or 'rest')")]
    UnknownMode(String),
}

impl TransitionError {
    pub(crate) fn not_allowed(action: &'static str, state: RunState) -> Self {
        TransitionError::NotAllowed { action, state }
    }
}

/// Key-value store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Store cannot be reached right now
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(#[from] rusqlite::Error),

    /// Stored history value is not valid JSON for its category
    #[error("corrupt {mode} history under '{key}': {source}")]
    Corrupt {
        mode: Mode,
        key: String,
        #[source]
        source: serde_json::Error,
    },
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

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home/config directory could not be prepared
    #[error("data directory unavailable: {0}")]
    DataDir(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
