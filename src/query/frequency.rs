//! Frequency tables over categorical fields

use std::collections::HashMap;

use serde::Serialize;

use crate::record::Record;
use crate::schema::{Schema, SchemaError, SchemaResult};

/// Value counts, remembering the order values were first seen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
    positions: HashMap<String, usize>,
}

/// One row of a top-K view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: &str) {
        match self.positions.get(value) {
            Some(&position) => self.entries[position].1 += 1,
            None => {
                self.positions.insert(value.to_string(), self.entries.len());
                self.entries.push((value.to_string(), 1));
            }
        }
    }

    /// Count for a value, 0 if never seen
    pub fn count(&self, value: &str) -> usize {
        self.positions.get(value).map_or(0, |&p| self.entries[p].1)
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// Entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(v, c)| (v.as_str(), *c))
    }

    /// The `k` most frequent values, count descending, ties in first-seen order.
    pub fn top(&self, k: usize) -> Vec<FrequencyEntry> {
        let mut ranked: Vec<&(String, usize)> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .take(k)
            .map(|(value, count)| FrequencyEntry {
                value: value.clone(),
                count: *count,
            })
            .collect()
    }
}

impl<'a> FromIterator<&'a str> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for value in iter {
            table.add(value);
        }
        table
    }
}

/// Counts the values of one field across records.
pub fn frequency_table(schema: &Schema, records: &[Record], field: &str) -> SchemaResult<FrequencyTable> {
    let index = schema
        .field_index(field)
        .ok_or_else(|| SchemaError::UnknownField(field.to_string()))?;

    let mut table = FrequencyTable::new();
    for record in records {
        if let Some(value) = record.value(index) {
            table.add(&value.to_string());
        }
    }
    Ok(table)
}
