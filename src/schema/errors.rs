//! Schema error types
//!
//! Error codes:
//! - TAB_SCHEMA_MISSING_HEADER (ERROR): resource has no header row
//! - TAB_SCHEMA_MISSING_COLUMNS (ERROR): header lacks required columns
//! - TAB_SCHEMA_UNKNOWN_FIELD (WARN): caller named a field the schema lacks
//! - TAB_SCHEMA_NOT_NUMERIC (WARN): caller asked for numbers from a text field
//! - TAB_SCHEMA_MALFORMED (FATAL): the schema definition itself is invalid

use std::fmt;

use thiserror::Error;

use crate::observability::Severity;

/// Why a single raw value was refused by its field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Field (column) name
    pub field: String,
    /// Expected domain
    pub expected: String,
    /// What was actually supplied
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn empty_text(field: impl Into<String>) -> Self {
        Self::new(field, "non-empty text", "empty value")
    }

    pub fn line_break(field: impl Into<String>) -> Self {
        Self::new(field, "single-line text", "value containing a line break")
    }

    pub fn not_an_integer(field: impl Into<String>, raw: &str) -> Self {
        Self::new(field, "an integer", format!("'{}'", raw))
    }

    pub fn out_of_range(field: impl Into<String>, value: i64, min: Option<i64>, max: Option<i64>) -> Self {
        let expected = match (min, max) {
            (Some(lo), Some(hi)) => format!("a value in {}..={}", lo, hi),
            (Some(lo), None) => format!("a value >= {}", lo),
            (None, Some(hi)) => format!("a value <= {}", hi),
            (None, None) => "any integer".to_string(),
        };
        Self::new(field, expected, value.to_string())
    }

    pub fn not_a_choice(field: impl Into<String>, raw: &str, values: &[String]) -> Self {
        Self::new(field, format!("one of [{}]", values.join(", ")), format!("'{}'", raw))
    }

    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::new(field, "a declared field", "undeclared field")
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': expected {}, got {}", self.field, self.expected, self.actual)
    }
}

/// Schema-level failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The resource has no header row at all
    #[error("missing header row")]
    MissingHeader,

    /// Required columns are absent from the header
    #[error("missing required columns: [{}] (found: [{}])", .missing.join(", "), .found.join(", "))]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    /// A caller referenced a field the schema does not declare
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// A caller asked for a numeric projection of a non-numeric field
    #[error("field '{0}' is not numeric")]
    NotNumeric(String),

    /// The schema definition is unusable
    #[error("malformed schema '{origin}': {reason}")]
    Malformed { origin: String, reason: String },
}

impl SchemaError {
    pub fn malformed(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::Malformed {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::MissingHeader => "TAB_SCHEMA_MISSING_HEADER",
            SchemaError::MissingColumns { .. } => "TAB_SCHEMA_MISSING_COLUMNS",
            SchemaError::UnknownField(_) => "TAB_SCHEMA_UNKNOWN_FIELD",
            SchemaError::NotNumeric(_) => "TAB_SCHEMA_NOT_NUMERIC",
            SchemaError::Malformed { .. } => "TAB_SCHEMA_MALFORMED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaError::MissingHeader | SchemaError::MissingColumns { .. } => Severity::Error,
            SchemaError::UnknownField(_) | SchemaError::NotNumeric(_) => Severity::Warn,
            SchemaError::Malformed { .. } => Severity::Fatal,
        }
    }

    /// Returns the missing column names, if this is a header mismatch
    pub fn missing_columns(&self) -> &[String] {
        match self {
            SchemaError::MissingColumns { missing, .. } => missing,
            _ => &[],
        }
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
