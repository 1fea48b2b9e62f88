//! Schema type definitions
//!
//! Supported field kinds:
//! - text: required, non-empty after trimming
//! - int: integer with optional inclusive bounds
//! - choice: case-insensitive enumerated text with optional aliases

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// Field kinds, serialized with a `type` tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text
    Text,
    /// Integer, optionally bounded (inclusive)
    Int {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    /// Lowercased enumerated text
    Choice {
        /// Canonical values
        values: Vec<String>,
        /// Alternate spellings mapped to a canonical value
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        aliases: BTreeMap<String, String>,
    },
}

impl FieldKind {
    /// Returns the kind name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Int { .. } => "int",
            FieldKind::Choice { .. } => "choice",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Int { .. })
    }
}

/// One named column of a dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Column name as it appears in the header
    pub name: String,
    /// Value domain
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldDef {
    /// Create a text field
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Text,
        }
    }

    /// Create an integer field bounded to `min..=max`
    pub fn bounded_int(name: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Int {
                min: Some(min),
                max: Some(max),
            },
        }
    }

    /// Create an integer field without bounds
    pub fn int(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Int { min: None, max: None },
        }
    }

    /// Create a choice field; values are stored lowercased
    pub fn choice<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: FieldKind::Choice {
                values: values.into_iter().map(|v| v.into().to_lowercase()).collect(),
                aliases: BTreeMap::new(),
            },
        }
    }

    /// Adds an alias to a choice field. No-op on other kinds.
    pub fn with_alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        if let FieldKind::Choice { aliases, .. } = &mut self.kind {
            aliases.insert(alias.into().to_lowercase(), canonical.into().to_lowercase());
        }
        self
    }

    pub fn is_numeric(&self) -> bool {
        self.kind.is_numeric()
    }
}

/// Complete dataset schema: id column plus ordered fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Dataset label
    pub name: String,
    /// Name of the generated id column
    pub id_column: String,
    /// Fold inner whitespace runs of text input to one space
    #[serde(default)]
    pub collapse_whitespace: bool,
    /// Field definitions in column order
    pub fields: Vec<FieldDef>,
}

impl Schema {
    /// Create a new schema
    pub fn new(name: impl Into<String>, id_column: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            id_column: id_column.into(),
            collapse_whitespace: false,
            fields,
        }
    }

    /// Enables whitespace folding for text input
    pub fn with_collapsed_whitespace(mut self) -> Self {
        self.collapse_whitespace = true;
        self
    }

    /// Returns the position of a field by name
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Returns a field definition by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Columns a header must contain. The id column is never required.
    pub fn required_columns(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Columns written on save: id column first, then every field
    pub fn output_columns(&self) -> Vec<&str> {
        std::iter::once(self.id_column.as_str())
            .chain(self.fields.iter().map(|f| f.name.as_str()))
            .collect()
    }

    /// Names of integer fields, in column order
    pub fn numeric_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.is_numeric())
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Names of text and choice fields, in column order
    pub fn categorical_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| !f.is_numeric())
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Validates the schema structure itself (not a record)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("schema name must not be empty".into());
        }
        if self.id_column.trim().is_empty() {
            return Err("id_column must not be empty".into());
        }
        if self.fields.is_empty() {
            return Err("schema must declare at least one field".into());
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err("field names must not be empty".into());
            }
            if field.name != field.name.trim() {
                return Err(format!("field '{}' has surrounding whitespace", field.name));
            }
            if field.name == self.id_column {
                return Err(format!("field '{}' collides with the id column", field.name));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(format!("duplicate field '{}'", field.name));
            }

            match &field.kind {
                FieldKind::Text => {}
                FieldKind::Int { min, max } => {
                    if let (Some(lo), Some(hi)) = (min, max) {
                        if lo > hi {
                            return Err(format!(
                                "field '{}' has min {} greater than max {}",
                                field.name, lo, hi
                            ));
                        }
                    }
                }
                FieldKind::Choice { values, aliases } => {
                    if values.is_empty() {
                        return Err(format!("choice field '{}' has no values", field.name));
                    }
                    if values.iter().any(|v| v.trim().is_empty() || *v != v.to_lowercase()) {
                        return Err(format!(
                            "choice field '{}' values must be non-empty lowercase",
                            field.name
                        ));
                    }
                    for (alias, target) in aliases {
                        if !values.contains(target) {
                            return Err(format!(
                                "alias '{}' of field '{}' points at undeclared value '{}'",
                                alias, field.name, target
                            ));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> Schema {
        Schema::new(
            "scores",
            "student_id",
            vec![
                FieldDef::text("gender"),
                FieldDef::bounded_int("math score", 0, 100),
                FieldDef::choice("lunch", ["standard", "free/reduced"]),
            ],
        )
    }

    #[test]
    fn test_schema_structure_valid() {
        assert!(sample_schema().validate_structure().is_ok());
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let mut schema = sample_schema();
        schema.fields.push(FieldDef::text("gender"));
        assert!(schema.validate_structure().unwrap_err().contains("duplicate"));
    }

    #[test]
    fn test_field_named_like_id_rejected() {
        let mut schema = sample_schema();
        schema.fields.push(FieldDef::int("student_id"));
        assert!(schema.validate_structure().unwrap_err().contains("id column"));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let schema = Schema::new("s", "id", vec![FieldDef::bounded_int("n", 10, 1)]);
        assert!(schema.validate_structure().unwrap_err().contains("greater than"));
    }

    #[test]
    fn test_alias_must_target_declared_value() {
        let schema = Schema::new(
            "s",
            "id",
            vec![FieldDef::choice("status", ["issued"]).with_alias("avail", "available")],
        );
        assert!(schema.validate_structure().unwrap_err().contains("undeclared value"));
    }

    #[test]
    fn test_column_helpers() {
        let schema = sample_schema();
        assert_eq!(schema.required_columns(), vec!["gender", "math score", "lunch"]);
        assert_eq!(
            schema.output_columns(),
            vec!["student_id", "gender", "math score", "lunch"]
        );
        assert_eq!(schema.numeric_fields(), vec!["math score"]);
        assert_eq!(schema.categorical_fields(), vec!["gender", "lunch"]);
        assert_eq!(schema.field_index("lunch"), Some(2));
        assert_eq!(schema.field_index("nope"), None);
    }

    #[test]
    fn test_schema_json_shape() {
        let json = r#"{
            "name": "books",
            "id_column": "bid",
            "collapse_whitespace": true,
            "fields": [
                {"name": "title", "type": "text"},
                {"name": "copies", "type": "int", "min": 0},
                {"name": "status", "type": "choice", "values": ["issued", "available"],
                 "aliases": {"avail": "available"}}
            ]
        }"#;
        let schema: Schema = serde_json::from_str(json).unwrap();
        assert!(schema.collapse_whitespace);
        assert_eq!(schema.fields[1].kind, FieldKind::Int { min: Some(0), max: None });
        assert_eq!(schema.fields[2].kind.type_name(), "choice");
        assert!(schema.validate_structure().is_ok());
    }
}
