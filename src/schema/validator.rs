//! Field validation
//!
//! Turns raw strings into typed values:
//! - Text is trimmed (and whitespace-folded when the schema asks for it)
//! - Empty text is refused; line breaks are refused
//! - Integers must parse and sit inside their bounds
//! - Choices are lowercased and resolved through aliases
//!
//! The validator never mutates anything. The same rules serve load-time
//! decoding, `add`, and the per-field checks of `update`.

use std::collections::{BTreeMap, HashMap};

use super::errors::ValidationDetails;
use super::types::{FieldDef, FieldKind, Schema};
use crate::record::Value;

/// Read access to a flat row of named raw strings.
pub trait FieldLookup {
    /// Returns the raw value for a column, if the row has it
    fn field(&self, name: &str) -> Option<&str>;
}

impl FieldLookup for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl FieldLookup for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl FieldLookup for [(&str, &str)] {
    fn field(&self, name: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
    }
}

impl<const N: usize> FieldLookup for [(&str, &str); N] {
    fn field(&self, name: &str) -> Option<&str> {
        self.as_slice().field(name)
    }
}

impl FieldLookup for Vec<(String, String)> {
    fn field(&self, name: &str) -> Option<&str> {
        self.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

/// Validator bound to one schema.
pub struct SchemaValidator<'a> {
    schema: &'a Schema,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Validates every schema field of a row, in column order.
    ///
    /// Missing columns count as empty input. Columns the schema does not
    /// declare (including the id column) are ignored.
    ///
    /// # Errors
    ///
    /// Returns the details of the first field that fails.
    pub fn validate_row<L: FieldLookup + ?Sized>(&self, row: &L) -> Result<Vec<Value>, ValidationDetails> {
        self.schema
            .fields
            .iter()
            .map(|def| self.validate_value(def, row.field(&def.name).unwrap_or("")))
            .collect()
    }

    /// Validates a single raw value for the field at `index`.
    pub fn validate_field(&self, index: usize, raw: &str) -> Result<Value, ValidationDetails> {
        match self.schema.fields.get(index) {
            Some(def) => self.validate_value(def, raw),
            None => Err(ValidationDetails::unknown_field(format!("#{}", index))),
        }
    }

    /// Normalizes free text the way the schema stores it.
    pub fn clean_text(&self, raw: &str) -> String {
        if self.schema.collapse_whitespace {
            raw.split_whitespace().collect::<Vec<_>>().join(" ")
        } else {
            raw.trim().to_string()
        }
    }

    fn validate_value(&self, def: &FieldDef, raw: &str) -> Result<Value, ValidationDetails> {
        if raw.contains(['\n', '\r']) {
            return Err(ValidationDetails::line_break(&def.name));
        }

        match &def.kind {
            FieldKind::Text => {
                let text = self.clean_text(raw);
                if text.is_empty() {
                    return Err(ValidationDetails::empty_text(&def.name));
                }
                Ok(Value::Text(text))
            }
            FieldKind::Int { min, max } => {
                let trimmed = raw.trim();
                let value: i64 = trimmed
                    .parse()
                    .map_err(|_| ValidationDetails::not_an_integer(&def.name, trimmed))?;
                let below = min.map_or(false, |lo| value < lo);
                let above = max.map_or(false, |hi| value > hi);
                if below || above {
                    return Err(ValidationDetails::out_of_range(&def.name, value, *min, *max));
                }
                Ok(Value::Int(value))
            }
            FieldKind::Choice { values, aliases } => {
                let text = self.clean_text(raw).to_lowercase();
                if text.is_empty() {
                    return Err(ValidationDetails::empty_text(&def.name));
                }
                let canonical = aliases.get(&text).cloned().unwrap_or(text);
                if values.contains(&canonical) {
                    Ok(Value::Text(canonical))
                } else {
                    Err(ValidationDetails::not_a_choice(&def.name, raw.trim(), values))
                }
            }
        }
    }
}
