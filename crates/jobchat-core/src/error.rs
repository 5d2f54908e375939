//! Error types for the jobchat widget.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire widget.
///
/// Every failure the widget can observe is recovered locally; this type is
/// what the recovery paths log and what the UI shows in its error banner.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatError {
    /// The backend could not start a conversation session.
    #[error("Session creation failed: {0}")]
    SessionCreationFailed(String),

    /// The backend did not accept or answer a user message.
    #[error("Message post failed: {0}")]
    MessagePostFailed(String),

    /// Persisted widget state could not be parsed.
    #[error("Persisted data corrupt: {key} - {message}")]
    PersistedDataCorrupt { key: String, message: String },

    /// Local key/value storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChatError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a SessionCreationFailed error
    pub fn session_creation(message: impl Into<String>) -> Self {
        Self::SessionCreationFailed(message.into())
    }

    /// Creates a MessagePostFailed error
    pub fn message_post(message: impl Into<String>) -> Self {
        Self::MessagePostFailed(message.into())
    }

    /// Creates a PersistedDataCorrupt error for the given storage key
    pub fn corrupt(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PersistedDataCorrupt {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
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

    pub fn is_session_creation_failed(&self) -> bool {
        matches!(self, Self::SessionCreationFailed(_))
    }

    pub fn is_message_post_failed(&self) -> bool {
        matches!(self, Self::MessagePostFailed(_))
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Returns true for the failures a send recovers from with a fallback reply.
    pub fn is_delivery_failure(&self) -> bool {
        self.is_session_creation_failed() || self.is_message_post_failed()
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ChatError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ChatError>`.
pub type Result<T> = std::result::Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_failures() {
        assert!(ChatError::session_creation("down").is_delivery_failure());
        assert!(ChatError::message_post("500").is_delivery_failure());
        assert!(!ChatError::storage("disk full").is_delivery_failure());
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let err: ChatError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.is_storage());
        assert!(err.to_string().contains("NotFound"));
    }

    #[test]
    fn test_json_error_maps_to_serialization() {
        let err: ChatError = serde_json::from_str::<Vec<u8>>("{").unwrap_err().into();
        match err {
            ChatError::Serialization { format, .. } => assert_eq!(format, "JSON"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
