//! Error types for clinsim.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    // Session state errors
    #[error("Already listening on session {session_id}")]
    SessionAlreadyActive { session_id: String },

    #[error("Not listening")]
    SessionNotActive,

    // Note store errors
    #[error("Note not found: {note_id}")]
    NoteNotFound { note_id: String },

    // Entity pattern errors
    #[error("Invalid entity pattern: {0}")]
    Pattern(#[from] regex::Error),

    // Configuration errors
    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, SimError>;
