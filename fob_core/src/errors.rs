//! # Error Types
//!
//! Structured error types for fob_core. Each variant carries enough context
//! for a front end to point the user at the offending field or storage key
//! without parsing message strings.
//!
//! ## Example
//!
//! ```rust
//! use fob_core::errors::{CostError, CostResult};
//!
//! fn validate_gsm(gsm: f64) -> CostResult<()> {
//!     if gsm <= 0.0 {
//!         return Err(CostError::invalid_input(
//!             "gsm",
//!             gsm.to_string(),
//!             "GSM must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_gsm(160.0).is_ok());
//! assert_eq!(validate_gsm(0.0).unwrap_err().error_code(), "INVALID_INPUT");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for fob_core operations
pub type CostResult<T> = Result<T, CostError>;

/// Structured error type for costing and history operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CostError {
    /// An input value is invalid (negative, non-finite, zero where a divisor is needed)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The key-value blob store failed to read or write
    #[error("Storage error: {operation} on '{key}' - {reason}")]
    StorageError {
        operation: String,
        key: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// No stored cost sheet has the requested id
    #[error("Cost sheet not found: {id}")]
    RecordNotFound { id: String },
}

impl CostError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CostError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a StorageError
    pub fn storage_error(operation: impl Into<String>, key: impl Into<String>, reason: impl Into<String>) -> Self {
        CostError::StorageError {
            operation: operation.into(),
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CostError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Create a RecordNotFound error
    pub fn record_not_found(id: impl Into<String>) -> Self {
        CostError::RecordNotFound { id: id.into() }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CostError::InvalidInput { .. } => "INVALID_INPUT",
            CostError::StorageError { .. } => "STORAGE_ERROR",
            CostError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CostError::RecordNotFound { .. } => "RECORD_NOT_FOUND",
        }
    }
}

impl From<serde_json::Error> for CostError {
    fn from(e: serde_json::Error) -> Self {
        CostError::serialization(e.to_string())
    }
}
