//! Linear search
//!
//! Both lookups walk the records first to last. There is no index: the table
//! is small and reordered often, and a scan has no state to keep consistent.

use crate::record::Record;
use crate::schema::{SchemaError, SchemaValidator};

use super::errors::StoreResult;
use super::table::Store;

/// How `find_by_text_field` compares values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMatch {
    /// Whole-value equality when true, substring containment when false
    pub exact: bool,
    /// Compare lowercased values when true
    pub case_insensitive: bool,
}

impl TextMatch {
    /// Whole value, ignoring case
    pub fn exact() -> Self {
        Self {
            exact: true,
            case_insensitive: true,
        }
    }

    /// Substring, ignoring case
    pub fn contains() -> Self {
        Self {
            exact: false,
            case_insensitive: true,
        }
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_insensitive = false;
        self
    }

    fn matches(&self, candidate: &str, needle: &str) -> bool {
        if self.case_insensitive {
            let candidate = candidate.to_lowercase();
            let needle = needle.to_lowercase();
            self.compare(&candidate, &needle)
        } else {
            self.compare(candidate, needle)
        }
    }

    fn compare(&self, candidate: &str, needle: &str) -> bool {
        if self.exact {
            candidate == needle
        } else {
            candidate.contains(needle)
        }
    }
}

impl Store {
    /// Position of the record with this id, scanning from the front.
    pub(super) fn position_of(&self, id: u64) -> Option<usize> {
        for (position, record) in self.records.iter().enumerate() {
            if record.id() == id {
                return Some(position);
            }
        }
        None
    }

    /// Returns the record with this id, or `None`.
    pub fn find_by_id(&self, id: u64) -> Option<&Record> {
        self.position_of(id).map(|position| &self.records[position])
    }

    /// Returns every record whose `field` matches `value`, in store order.
    ///
    /// The search value is cleaned like stored text (trimmed, and
    /// whitespace-folded when the schema folds). Integer fields compare
    /// their decimal rendering.
    ///
    /// # Errors
    ///
    /// `UnknownField` if the schema does not declare `field`.
    pub fn find_by_text_field(&self, field: &str, value: &str, mode: TextMatch) -> StoreResult<Vec<&Record>> {
        let index = self
            .schema
            .field_index(field)
            .ok_or_else(|| SchemaError::UnknownField(field.to_string()))?;
        let needle = SchemaValidator::new(&self.schema).clean_text(value);

        let mut matches = Vec::new();
        for record in &self.records {
            if let Some(stored) = record.value(index) {
                if mode.matches(&stored.to_string(), &needle) {
                    matches.push(record);
                }
            }
        }
        Ok(matches)
    }
}
