//! Error types for Searchgate operations.
//!
//! This module provides a common `Error` type and `Result<T>` alias used across
//! all Searchgate crates. Uses `thiserror` for derive macros.
//!
//! A missing search is not an error: lookups return `Ok(None)`. Only a search
//! that exists but fails the access decision produces
//! [`Error::PermissionDenied`], so callers can tell the two apart.

use thiserror::Error;

/// Errors that can occur in Searchgate operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Content not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The search exists but the user may not read it.
    ///
    /// Carries only the aggregate outcome; the view checks that were
    /// evaluated are never reported.
    #[error("User {user} does not have permission to load search {search_id}")]
    PermissionDenied {
        /// Name of the requesting user.
        user: String,
        /// Identifier of the search that was requested.
        search_id: String,
    },

    /// Failure reported by a storage collaborator, passed through unchanged.
    #[error("Storage failure: {0}")]
    Storage(String),

    /// Invalid data or format.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a permission denied error for `user` reading `search_id`.
    pub fn permission_denied(user: impl Into<String>, search_id: impl Into<String>) -> Self {
        Self::PermissionDenied {
            user: user.into(),
            search_id: search_id.into(),
        }
    }

    /// Create a storage failure.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an invalid data error.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Whether this is a [`Error::PermissionDenied`].
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias using Searchgate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
