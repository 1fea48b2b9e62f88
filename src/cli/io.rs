//! JSON output for the CLI
//!
//! - Output: single JSON object via stdout, one line
//! - Logs never go to stdout
//! - UTF-8 only

use std::io::{self, Write};

use serde_json::{json, Map, Value};

use crate::record::{Record, Value as FieldValue};
use crate::schema::Schema;

use super::errors::CliResult;

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = json!({
        "status": "ok",
        "data": data
    });
    write_line(&response)
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str, details: Option<Value>) -> CliResult<()> {
    let mut response = json!({
        "status": "error",
        "code": code,
        "message": message
    });
    if let Some(details) = details {
        response["details"] = details;
    }
    write_line(&response)
}

fn write_line(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

/// A record as a JSON object keyed by column name, id column first
pub fn record_to_json(schema: &Schema, record: &Record) -> Value {
    let mut object = Map::new();
    object.insert(schema.id_column.clone(), json!(record.id()));
    for (def, value) in schema.fields.iter().zip(record.values()) {
        let value = match value {
            FieldValue::Text(text) => json!(text),
            FieldValue::Int(n) => json!(n),
        };
        object.insert(def.name.clone(), value);
    }
    Value::Object(object)
}

pub fn records_to_json<'r, I>(schema: &Schema, records: I) -> Value
where
    I: IntoIterator<Item = &'r Record>,
{
    Value::Array(records.into_iter().map(|r| record_to_json(schema, r)).collect())
}
