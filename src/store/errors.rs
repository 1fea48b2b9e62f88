//! Store error types
//!
//! Error codes:
//! - TAB_STORE_NOT_FOUND (WARN): no record with the requested id
//! - TAB_STORE_VALIDATION_FAILED (WARN): `add` input outside a field domain
//! - schema codes, when a caller names an unknown or non-numeric field
//!
//! Every store error leaves the store exactly as it was.

use thiserror::Error;

use crate::observability::Severity;
use crate::schema::{SchemaError, ValidationDetails};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Lookup miss on update or delete
    #[error("record {id} not found")]
    NotFound { id: u64 },

    /// A field of an `add` failed validation
    #[error("validation failed: {0}")]
    Validation(ValidationDetails),

    /// The caller referenced the schema incorrectly
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl StoreError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "TAB_STORE_NOT_FOUND",
            StoreError::Validation(_) => "TAB_STORE_VALIDATION_FAILED",
            StoreError::Schema(e) => e.code(),
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StoreError::NotFound { .. } | StoreError::Validation(_) => Severity::Warn,
            StoreError::Schema(e) => e.severity(),
        }
    }

    /// Returns validation details, if this is a validation failure
    pub fn details(&self) -> Option<&ValidationDetails> {
        match self {
            StoreError::Validation(details) => Some(details),
            _ => None,
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
