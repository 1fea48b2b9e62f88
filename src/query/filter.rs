//! Filtered views

use crate::record::Record;
use crate::schema::{Schema, SchemaError, SchemaResult, SchemaValidator};

/// Returns the records matching `predicate`, in their original order.
pub fn filter<P>(records: &[Record], predicate: P) -> Vec<&Record>
where
    P: Fn(&Record) -> bool,
{
    records.iter().filter(|r| predicate(r)).collect()
}

/// Equality filter on one field, ignoring case. The value is cleaned like
/// stored text before comparing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: String,
    pub value: String,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Parses `field=value`. Returns `None` without an `=`.
    pub fn parse(spec: &str) -> Option<Self> {
        let (field, value) = spec.split_once('=')?;
        Some(Self::new(field.trim(), value.trim()))
    }

    /// Binds the filter to a schema.
    pub fn matcher(&self, schema: &Schema) -> SchemaResult<FieldMatcher> {
        let index = schema
            .field_index(&self.field)
            .ok_or_else(|| SchemaError::UnknownField(self.field.clone()))?;
        Ok(FieldMatcher {
            index,
            needle: SchemaValidator::new(schema).clean_text(&self.value).to_lowercase(),
        })
    }
}

/// A `FieldFilter` bound to a column position
#[derive(Debug, Clone)]
pub struct FieldMatcher {
    index: usize,
    needle: String,
}

impl FieldMatcher {
    pub fn matches(&self, record: &Record) -> bool {
        record
            .value(self.index)
            .map_or(false, |v| v.to_string().to_lowercase() == self.needle)
    }
}
