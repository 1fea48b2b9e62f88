//! Schema loader for JSON schema files
//!
//! A schema file holds one `Schema` as JSON. Unreadable files, invalid JSON
//! and structurally invalid schemas all fail with `TAB_SCHEMA_MALFORMED`.

use std::fs;
use std::path::Path;

use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;
use crate::observability::{log_event_with_fields, Event};

/// Reads and validates schema definitions.
pub struct SchemaLoader;

impl SchemaLoader {
    /// Loads a schema from a JSON file.
    pub fn load_file(path: &Path) -> SchemaResult<Schema> {
        let origin = path.display().to_string();
        let content = fs::read_to_string(path)
            .map_err(|e| SchemaError::malformed(&origin, format!("failed to read file: {}", e)))?;

        let schema = Self::parse(&origin, &content)?;

        log_event_with_fields(
            Event::SchemaLoaded,
            &[
                ("fields", schema.fields.len().to_string().as_str()),
                ("name", schema.name.as_str()),
                ("path", origin.as_str()),
            ],
        );
        Ok(schema)
    }

    /// Parses and validates a schema from JSON text. `origin` labels errors.
    pub fn parse(origin: &str, json: &str) -> SchemaResult<Schema> {
        let schema: Schema = serde_json::from_str(json)
            .map_err(|e| SchemaError::malformed(origin, format!("invalid JSON: {}", e)))?;

        schema
            .validate_structure()
            .map_err(|reason| SchemaError::malformed(origin, reason))?;

        Ok(schema)
    }
}
