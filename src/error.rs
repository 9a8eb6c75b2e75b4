//! Error types for Nexus
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Nexus operations
///
/// Every variant is recoverable at the level of a single user action:
/// the REPL reports the error and keeps the session alive.
#[derive(Error, Debug)]
pub enum NexusError {
    /// Configuration-related errors (missing credential, invalid values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A submission was attempted while no provider could be initialized
    #[error("Generation is unavailable: {0}")]
    GenerationUnavailable(String),

    /// The generation call failed (network, quota, malformed response)
    #[error("Generation error: {0}")]
    Generation(String),

    /// The history file could not be read or parsed
    #[error("Storage read error: {0}")]
    StorageRead(String),

    /// The history file could not be written
    #[error("Storage write error: {0}")]
    StorageWrite(String),

    /// The submitted question was empty or whitespace only
    #[error("Cannot submit an empty message")]
    EmptyPrompt,

    /// A submission arrived while an edit was in progress
    #[error("Finish or cancel the current edit before sending messages")]
    EditInProgress,

    /// An edit operation was requested without an active edit
    #[error("No chat is being edited")]
    NotEditing,

    /// No stored chat matches the given id or prefix
    #[error("Chat not found: {0}")]
    ChatNotFound(String),

    /// A turn index outside the edited chat was given
    #[error("Turn {index} is out of range (chat has {len} turns)")]
    TurnOutOfRange {
        /// The 1-based index that was requested
        index: usize,
        /// Number of turns in the chat
        len: usize,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Nexus operations
///
/// Uses `anyhow::Error` so callers can attach context; match on a specific
/// failure with `err.downcast_ref::<NexusError>()`.
pub type Result<T> = anyhow::Result<T>;
