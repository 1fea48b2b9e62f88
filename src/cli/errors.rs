//! CLI error types
//!
//! Subsystem errors pass through with their own codes; the CLI adds
//! configuration, usage and output failures of its own.

use std::io;

use serde_json::{json, Value};
use thiserror::Error;

use crate::schema::SchemaError;
use crate::storage::StorageError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CliError {
    /// Config file unreadable or invalid
    #[error("{0}")]
    Config(String),

    /// Arguments that parse but make no sense together
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// stdout write failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        CliError::Config(msg.into())
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        CliError::Usage(msg.into())
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "TAB_CLI_CONFIG_ERROR",
            CliError::Usage(_) => "TAB_CLI_USAGE_ERROR",
            CliError::Schema(e) => e.code(),
            CliError::Storage(e) => e.code(),
            CliError::Store(e) => e.code(),
            CliError::Io(_) => "TAB_CLI_IO_ERROR",
            CliError::Json(_) => "TAB_CLI_IO_ERROR",
        }
    }

    /// Structured context for the error response, if any.
    ///
    /// Not-found errors carry the absolute path and directory listing, schema
    /// errors the missing and found columns, validation errors the field.
    pub fn details(&self) -> Option<Value> {
        match self {
            CliError::Storage(StorageError::NotFound { path, listing }) => Some(json!({
                "path": path.display().to_string(),
                "directory_listing": listing,
            })),
            CliError::Storage(StorageError::Schema { path, source }) => Some(json!({
                "path": path.display().to_string(),
                "missing_columns": source.missing_columns(),
            })),
            CliError::Store(e) => e.details().map(|d| {
                json!({
                    "field": d.field,
                    "expected": d.expected,
                    "actual": d.actual,
                })
            }),
            _ => None,
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
