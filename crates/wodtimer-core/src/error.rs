//! Core error types for wodtimer-core.
//!
//! The session engine itself never fails: out-of-order commands are no-ops and
//! empty-schedule queries return `None`. Errors exist at the edges, where
//! configuration is loaded and validated, where the feedback snapshot is
//! requested, and where sound cues are delivered.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for wodtimer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Sound selection and delivery errors
    #[error("Sound error: {0}")]
    Sound(#[from] SoundError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
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

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Config file is not valid TOML for the expected layout
    #[error("Failed to parse configuration {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Duration outside the selectable range
    #[error("{field} must be between {min} and {max} seconds (got {value})")]
    DurationOutOfRange {
        field: String,
        value: u32,
        min: u32,
        max: u32,
    },

    /// Duration inside the range but not on a selectable step
    #[error("{field} must be a multiple of {step} seconds (got {value})")]
    DurationNotOnStep { field: String, value: u32, step: u32 },

    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Operation not available in the engine's current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Sound selection and delivery errors.
///
/// Playback failures never reach the engine; the dispatcher logs and drops
/// them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SoundError {
    #[error("Unknown sound '{sound}' for {cue}, expected one of: {expected}")]
    UnknownSound {
        cue: String,
        sound: String,
        expected: String,
    },

    #[error("Playback of '{sound}' failed: {message}")]
    Playback { sound: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
