//! Centralized error types for the CRM API.

use thiserror::Error;

/// Main error type for CRM operations.
#[derive(Error, Debug)]
pub enum CrmError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Result type for CRM operations.
pub type CrmResult<T> = Result<T, CrmError>;

impl CrmError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Message suitable for returning to an API caller.
    ///
    /// Storage failures collapse to a fixed string so driver and query
    /// details never leave the process.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::NotFound(msg) => msg.clone(),
            Self::Storage(_) => "Internal storage error".to_string(),
        }
    }
}
