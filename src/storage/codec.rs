//! Record <-> row conversion
//!
//! Decoding validates every field against the schema. Encoding is total and
//! always emits the id column first.

use crate::record::{Record, Value};
use crate::schema::{FieldLookup, Schema, SchemaError, SchemaResult, SchemaValidator};

use super::csv::{split_line, CsvDialect};
use super::errors::RowError;

/// Column position of each schema field within a particular header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    positions: Vec<usize>,
    width: usize,
}

impl HeaderMap {
    /// Column position of the field at `field_index`
    pub fn position(&self, field_index: usize) -> Option<usize> {
        self.positions.get(field_index).copied()
    }

    /// Number of columns in the header
    pub fn width(&self) -> usize {
        self.width
    }
}

pub struct RowCodec<'a> {
    schema: &'a Schema,
    validator: SchemaValidator<'a>,
    dialect: CsvDialect,
}

impl<'a> RowCodec<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self::with_dialect(schema, CsvDialect::default())
    }

    pub fn with_dialect(schema: &'a Schema, dialect: CsvDialect) -> Self {
        Self {
            schema,
            validator: SchemaValidator::new(schema),
            dialect,
        }
    }

    pub fn dialect(&self) -> &CsvDialect {
        &self.dialect
    }

    /// Locates every required column in a header.
    ///
    /// Column order is free and extra columns are ignored. Names are compared
    /// after trimming. If a name repeats, the first occurrence wins.
    pub fn check_header<S: AsRef<str>>(&self, header: &[S]) -> SchemaResult<HeaderMap> {
        let names: Vec<&str> = header.iter().map(|h| h.as_ref().trim()).collect();

        let mut positions = Vec::with_capacity(self.schema.fields.len());
        let mut missing = Vec::new();
        for column in self.schema.required_columns() {
            match names.iter().position(|n| *n == column) {
                Some(pos) => positions.push(pos),
                None => missing.push(column.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns {
                missing,
                found: names.iter().map(|n| n.to_string()).collect(),
            });
        }

        Ok(HeaderMap {
            positions,
            width: names.len(),
        })
    }

    /// Splits the header line and checks it.
    pub fn decode_header(&self, line: &str) -> SchemaResult<HeaderMap> {
        let columns = split_line(line, &self.dialect).ok_or_else(|| {
            SchemaError::malformed("header", "unterminated quoted column name")
        })?;
        if columns.iter().all(|c| c.trim().is_empty()) {
            return Err(SchemaError::MissingHeader);
        }
        self.check_header(&columns)
    }

    /// Decodes a row given as named fields.
    pub fn decode_row<L: FieldLookup + ?Sized>(&self, fields: &L) -> Result<Vec<Value>, RowError> {
        self.validator.validate_row(fields).map_err(RowError::Field)
    }

    /// Decodes one data line against a checked header.
    ///
    /// A short row reads its missing trailing columns as empty.
    pub fn decode_line(&self, header: &HeaderMap, line: &str) -> Result<Vec<Value>, RowError> {
        let raw = split_line(line, &self.dialect).ok_or(RowError::UnterminatedQuote)?;

        (0..self.schema.fields.len())
            .map(|index| {
                let value = header
                    .position(index)
                    .and_then(|pos| raw.get(pos))
                    .map_or("", String::as_str);
                self.validator.validate_field(index, value).map_err(RowError::Field)
            })
            .collect()
    }

    /// Header columns written on save
    pub fn encode_header(&self) -> Vec<String> {
        self.schema
            .output_columns()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Encodes a record as (column, value) pairs, id column first.
    pub fn encode_row(&self, record: &Record) -> Vec<(String, String)> {
        let mut row = Vec::with_capacity(self.schema.fields.len() + 1);
        row.push((self.schema.id_column.clone(), record.id().to_string()));
        for (def, value) in self.schema.fields.iter().zip(record.values()) {
            row.push((def.name.clone(), value.to_string()));
        }
        row
    }

    /// Encodes a record as one delimited line, without newline.
    pub fn encode_line(&self, record: &Record) -> String {
        let row = self.encode_row(record);
        super::csv::join_fields(row.iter().map(|(_, v)| v.as_str()), &self.dialect)
    }
}
