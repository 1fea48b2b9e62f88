//! The in-memory record table and its CRUD operations
//!
//! Invariants:
//! - Ids are pairwise distinct, strictly positive and never reissued, even
//!   after the record holding the highest id is deleted
//! - Every stored value passed field validation
//! - A failed `add` or `delete` leaves the table untouched

use crate::observability::{log_event_with_fields, Event};
use crate::record::{Record, Value};
use crate::schema::{FieldLookup, Schema, SchemaValidator, ValidationDetails};

use super::errors::{StoreError, StoreResult};

/// Ordered, exclusively owned collection of records of one schema.
#[derive(Debug, Clone)]
pub struct Store {
    pub(super) schema: Schema,
    pub(super) records: Vec<Record>,
    /// Highest id ever issued by this store
    pub(super) last_id: u64,
}

impl Store {
    /// Creates an empty store for a schema.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            records: Vec::new(),
            last_id: 0,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Read-only snapshot of the records in current order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Highest id issued so far, 0 if none.
    pub fn last_issued_id(&self) -> u64 {
        self.last_id
    }

    /// Max id in the table + 1, never below the last issued id + 1.
    fn next_id(&self) -> u64 {
        let max_present = self.records.iter().map(Record::id).max().unwrap_or(0);
        max_present.max(self.last_id) + 1
    }

    /// Appends already-validated values under a fresh id.
    pub(crate) fn push_validated(&mut self, values: Vec<Value>) -> &Record {
        let id = self.next_id();
        self.last_id = id;
        self.records.push(Record::new(id, values));
        &self.records[self.records.len() - 1]
    }

    /// Validates a row of raw fields and appends it under a fresh id.
    ///
    /// Any id column in `fields` is ignored.
    ///
    /// # Errors
    ///
    /// `Validation` with the first failing field; the store is unchanged.
    pub fn add<L: FieldLookup + ?Sized>(&mut self, fields: &L) -> StoreResult<Record> {
        let values = SchemaValidator::new(&self.schema)
            .validate_row(fields)
            .map_err(StoreError::Validation)?;

        let record = self.push_validated(values).clone();
        log_event_with_fields(Event::RecordAdded, &[("id", record.id().to_string().as_str())]);
        Ok(record)
    }

    /// Applies a patch field by field.
    ///
    /// Blank inputs keep the current value. A field that fails validation (or
    /// is not declared) is reported and keeps its current value; the remaining
    /// fields are still applied.
    ///
    /// # Errors
    ///
    /// `NotFound` if no record has this id.
    pub fn update(&mut self, id: u64, patch: &RecordPatch) -> StoreResult<UpdateReport> {
        let position = self.position_of(id).ok_or(StoreError::NotFound { id })?;
        let validator = SchemaValidator::new(&self.schema);
        let mut report = UpdateReport::new(id);

        for (name, raw) in patch.entries() {
            if raw.trim().is_empty() {
                report.kept.push(name.clone());
                continue;
            }

            let outcome = match self.schema.field_index(name) {
                Some(index) => validator.validate_field(index, raw).map(|value| (index, value)),
                None => Err(ValidationDetails::unknown_field(name)),
            };

            match outcome {
                Ok((index, value)) => {
                    self.records[position].set(index, value);
                    report.applied.push(name.clone());
                }
                Err(details) => {
                    log_event_with_fields(
                        Event::UpdateFieldRejected,
                        &[
                            ("field", details.field.as_str()),
                            ("id", id.to_string().as_str()),
                            ("reason", details.to_string().as_str()),
                        ],
                    );
                    report.rejected.push(details);
                }
            }
        }

        log_event_with_fields(
            Event::RecordUpdated,
            &[
                ("applied", report.applied.len().to_string().as_str()),
                ("id", id.to_string().as_str()),
                ("rejected", report.rejected.len().to_string().as_str()),
            ],
        );
        Ok(report)
    }

    /// Removes the record with this id, keeping the order of the rest.
    ///
    /// # Errors
    ///
    /// `NotFound` if no record has this id, including a second delete of the
    /// same id.
    pub fn delete(&mut self, id: u64) -> StoreResult<Record> {
        let position = self.position_of(id).ok_or(StoreError::NotFound { id })?;
        let removed = self.records.remove(position);
        log_event_with_fields(Event::RecordDeleted, &[("id", id.to_string().as_str())]);
        Ok(removed)
    }
}

/// Named raw values for an update, in the order they were supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    entries: Vec<(String, String)>,
}

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces one field value.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
        self
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RecordPatch {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(RecordPatch::new(), |patch, (k, v)| patch.set(k, v))
    }
}

/// What an update did, field by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub id: u64,
    /// Fields whose new value was stored
    pub applied: Vec<String>,
    /// Fields left alone because the input was blank
    pub kept: Vec<String>,
    /// Fields whose input was refused; the old value stays
    pub rejected: Vec<ValidationDetails>,
}

impl UpdateReport {
    fn new(id: u64) -> Self {
        Self {
            id,
            applied: Vec::new(),
            kept: Vec::new(),
            rejected: Vec::new(),
        }
    }

    /// True when no field was rejected
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}
