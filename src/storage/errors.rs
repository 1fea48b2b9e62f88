//! Storage error types
//!
//! Error codes:
//! - TAB_STORAGE_NOT_FOUND (ERROR): the data file does not exist
//! - TAB_STORAGE_SCHEMA (ERROR): header missing or lacks required columns
//! - TAB_STORAGE_IO_ERROR (ERROR): open/read/write/sync failure
//! - TAB_STORAGE_ENCODING (ERROR): a line is not valid UTF-8
//!
//! Row-level problems are not `StorageError`s. They become `RowError`
//! diagnostics in the load report and never abort a load.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::observability::Severity;
use crate::schema::{SchemaError, ValidationDetails};

/// Resource-wide failures that abort a load or save
#[derive(Debug, Error)]
pub enum StorageError {
    /// The file does not exist. `listing` holds the parent directory's entries
    /// when they could be read.
    #[error("data file not found: {}", .path.display())]
    NotFound {
        path: PathBuf,
        listing: Option<Vec<String>>,
    },

    /// Header row absent or missing required columns
    #[error("{}: {source}", .path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },

    #[error("failed to {context} '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        context: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{}: line {line} is not valid UTF-8", .path.display())]
    Encoding { path: PathBuf, line: usize },
}

impl StorageError {
    pub(crate) fn io(path: &Path, context: &'static str, source: io::Error) -> Self {
        StorageError::Io {
            path: path.to_path_buf(),
            context,
            source,
        }
    }

    pub(crate) fn schema(path: &Path, source: SchemaError) -> Self {
        StorageError::Schema {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::NotFound { .. } => "TAB_STORAGE_NOT_FOUND",
            StorageError::Schema { .. } => "TAB_STORAGE_SCHEMA",
            StorageError::Io { .. } => "TAB_STORAGE_IO_ERROR",
            StorageError::Encoding { .. } => "TAB_STORAGE_ENCODING",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Error
    }

    /// The resource this error concerns
    pub fn path(&self) -> &Path {
        match self {
            StorageError::NotFound { path, .. }
            | StorageError::Schema { path, .. }
            | StorageError::Io { path, .. }
            | StorageError::Encoding { path, .. } => path,
        }
    }

    /// The underlying schema error, if this is a header problem
    pub fn schema_error(&self) -> Option<&SchemaError> {
        match self {
            StorageError::Schema { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Why a single data row was skipped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("unterminated quoted field")]
    UnterminatedQuote,

    #[error("{0}")]
    Field(ValidationDetails),
}

impl RowError {
    pub fn code(&self) -> &'static str {
        match self {
            RowError::UnterminatedQuote => "TAB_ROW_UNTERMINATED_QUOTE",
            RowError::Field(_) => "TAB_ROW_INVALID_FIELD",
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let nf = StorageError::NotFound {
            path: PathBuf::from("/data/x.csv"),
            listing: None,
        };
        assert_eq!(nf.code(), "TAB_STORAGE_NOT_FOUND");
        assert_eq!(nf.path(), Path::new("/data/x.csv"));

        let schema = StorageError::schema(Path::new("x.csv"), SchemaError::MissingHeader);
        assert_eq!(schema.code(), "TAB_STORAGE_SCHEMA");
        assert_eq!(schema.schema_error(), Some(&SchemaError::MissingHeader));
    }

    #[test]
    fn test_display_includes_path() {
        let err = StorageError::io(
            Path::new("out.csv"),
            "write",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("out.csv"));
        assert!(msg.contains("write"));
    }

    #[test]
    fn test_row_error_display() {
        let err = RowError::Field(ValidationDetails::empty_text("title"));
        assert_eq!(err.to_string(), "field 'title': expected non-empty text, got empty value");
        assert_eq!(RowError::UnterminatedQuote.code(), "TAB_ROW_UNTERMINATED_QUOTE");
    }
}
