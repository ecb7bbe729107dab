//! Error types for the dox terminal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the whole dox workspace.
///
/// Variants are typed and structured so callers can decide whether a failure
/// should surface in the transcript, be logged, or be suppressed entirely
/// (cancellation).
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DoxError {
    /// A built-in command received an argument it does not accept.
    #[error("Invalid {command} argument: {argument}")]
    InvalidCommandArgument { command: String, argument: String },

    /// The external assistant could not produce an answer.
    #[error("{message}")]
    AssistantRequestFailed {
        /// HTTP status when the failure came from a response.
        status: Option<u16>,
        message: String,
    },

    /// The user cancelled the in-flight request. Never shown as an error.
    #[error("Request cancelled by user")]
    RequestCancelled,

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DoxError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an InvalidCommandArgument error
    pub fn invalid_argument(command: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::InvalidCommandArgument {
            command: command.into(),
            argument: argument.into(),
        }
    }

    /// Creates an AssistantRequestFailed error without an HTTP status
    pub fn assistant(message: impl Into<String>) -> Self {
        Self::AssistantRequestFailed {
            status: None,
            message: message.into(),
        }
    }

    /// Creates an AssistantRequestFailed error carrying the HTTP status
    pub fn assistant_status(status: u16, message: impl Into<String>) -> Self {
        Self::AssistantRequestFailed {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a user-initiated cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::RequestCancelled)
    }

    /// Check if this is an assistant failure
    pub fn is_assistant_failure(&self) -> bool {
        matches!(self, Self::AssistantRequestFailed { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for DoxError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DoxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DoxError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for DoxError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error for collaborators that report through anyhow
impl From<anyhow::Error> for DoxError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, DoxError>`.
pub type Result<T> = std::result::Result<T, DoxError>;
