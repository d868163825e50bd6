//! Error types for the dbchat client library.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for all dbchat operations.
///
/// Every variant is recoverable by retrying the user action that caused it;
/// nothing here is fatal to the process. Execution and visualization
/// failures are deliberately *not* represented: they belong to the turn
/// that produced them (see [`crate::session::TurnOutcome`]) and never abort
/// an operation.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DbChatError {
    /// The remote service could not be reached or the request did not
    /// complete. Surfaced as a dismissable notice; no automatic retry.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The generation service errored before producing a turn.
    /// No turn is appended to the transcript.
    #[error("query generation failed: {0}")]
    Generation(String),

    /// The request was rejected even after the one transparent
    /// credential refresh-and-retry.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Client-side rejection, before any network call.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Entity lookup failure with type information.
    #[error("{entity_type} not found: '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Internal error (should not happen in normal operation).
    #[error("internal error: {0}")]
    Internal(String),
}

impl DbChatError {
    /// Creates a Transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Generation error.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Creates an Unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates a Validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a NotFound error.
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a Transport error.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this is a Generation error.
    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation(_))
    }

    /// Check if this is an Unauthorized error.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Check if this is a Validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<std::io::Error> for DbChatError {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for DbChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DbChatError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, DbChatError>`.
pub type Result<T> = std::result::Result<T, DbChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates_match_variants() {
        assert!(DbChatError::transport("down").is_transport());
        assert!(DbChatError::validation("empty").is_validation());
        assert!(DbChatError::not_found("Chat", "abc").is_not_found());
        assert!(!DbChatError::generation("oops").is_transport());
    }

    #[test]
    fn display_includes_entity_type() {
        let err = DbChatError::not_found("Chat", "42");
        assert_eq!(err.to_string(), "Chat not found: '42'");
    }
}
