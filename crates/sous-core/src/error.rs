//! Error types for the Sous application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Sous application.
///
/// Backend failures fall into two families that callers treat differently:
/// `Transport` (network/auth/quota, never recoverable locally) and
/// `Validation` (the backend answered but the answer does not satisfy the
/// declared response schema). A legitimately absent optional result, such as
/// a missing dish photo, is modelled as `None` and never as an error.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SousError {
    /// Network, authentication or quota failure talking to a backend
    #[error("Transport error: {message}")]
    Transport {
        status_code: Option<u16>,
        message: String,
    },

    /// Backend response violated the declared response schema
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Caller violated an operation precondition
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error outside backend responses
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "template", etc.
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SousError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Transport error without an HTTP status
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status_code: None,
            message: message.into(),
        }
    }

    /// Creates a Transport error carrying the HTTP status of the failed call
    pub fn transport_status(status_code: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status_code: Some(status_code),
            message: message.into(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
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

    /// Check if this is a Transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is an InvalidInput error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for SousError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

/// JSON errors outside of backend response parsing (config files, request
/// bodies). Backend responses are mapped to `Validation` explicitly by the
/// schema module instead.
impl From<serde_json::Error> for SousError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, SousError>`.
pub type Result<T> = std::result::Result<T, SousError>;
