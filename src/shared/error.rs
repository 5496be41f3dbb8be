//! Shared Error Types
//!
//! This module defines the error type returned by every store operation and
//! by local validation.
//!
//! # Error Categories
//!
//! - `Transport` - The request never produced a response (network, timeout)
//! - `Unauthorized` / `Forbidden` - The store rejected the session
//! - `Server` - Any other non-success response
//! - `Validation` - Input rejected locally before any store call
//! - `Serialization` - A response body could not be decoded
//! - `NotFound` - A local lookup (e.g. a moderation group) failed
//!
//! # Usage
//!
//! ```rust
//! use courier::shared::error::MessagingError;
//!
//! let error = MessagingError::validation("content", "Message cannot be empty");
//! assert!(!error.is_retryable());
//! ```
use thiserror::Error;

/// Errors surfaced by store access and local validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessagingError {
    /// No response was received
    #[error("Transport error: {message}")]
    Transport {
        /// Human-readable error message
        message: String,
    },

    /// The store answered 401
    #[error("Unauthorized: please log in again")]
    Unauthorized,

    /// The store answered 403
    #[error("Forbidden: insufficient permissions")]
    Forbidden,

    /// Any other non-success response
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Human-readable error message
        message: String,
    },

    /// A local lookup failed
    #[error("Not found: {what}")]
    NotFound {
        /// Description of the missing item
        what: String,
    },
}

impl MessagingError {
    /// Create a new transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a new server error
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Whether retrying the same call can succeed.
    ///
    /// Validation and lookup failures are deterministic; everything that came
    /// back from (or failed to reach) the store is worth another attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Validation { .. } | Self::NotFound { .. })
    }

    /// Whether the store rejected the session
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::Forbidden)
    }
}

impl From<serde_json::Error> for MessagingError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for MessagingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::serialization(format!("Failed to parse response: {}", err))
        } else if let Some(status) = err.status() {
            Self::server(status.as_u16(), err.to_string())
        } else {
            Self::transport(format!("Network error: {}", err))
        }
    }
}
