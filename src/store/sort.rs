//! In-place sorting
//!
//! Two algorithms over the same derived keys:
//! - `Insertion`: hand-written shift-and-insert, O(n²) worst case. An item
//!   only moves past strictly greater keys, so the sort is stable.
//! - `Platform`: the standard library's stable sort.
//!
//! Descending flips the comparison itself rather than reversing an ascending
//! result, so equal keys keep their relative order in both directions.

use std::cmp::Ordering;

use crate::observability::{log_event_with_fields, Event};
use crate::query::{Projection, ResolvedProjection};
use crate::record::Record;
use crate::schema::SchemaError;

use super::errors::StoreResult;
use super::table::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortAlgorithm {
    /// Manual insertion sort
    Insertion,
    /// Standard library stable sort
    Platform,
}

impl SortAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortAlgorithm::Insertion => "insertion",
            SortAlgorithm::Platform => "platform",
        }
    }
}

/// What to sort by
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    /// Store-issued id
    Id,
    /// A numeric projection (single field or average)
    Numeric(Projection),
    /// A field's text rendering, lowercased
    Text(String),
}

/// A derived scalar sort key
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum KeyValue {
    Number(f64),
    Text(String),
}

enum ResolvedKey {
    Id,
    Numeric(ResolvedProjection),
    Text(usize),
}

impl ResolvedKey {
    fn key_of(&self, record: &Record) -> KeyValue {
        match self {
            ResolvedKey::Id => KeyValue::Number(record.id() as f64),
            ResolvedKey::Numeric(projection) => KeyValue::Number(projection.apply(record)),
            ResolvedKey::Text(index) => KeyValue::Text(
                record
                    .value(*index)
                    .map(|v| v.to_string().to_lowercase())
                    .unwrap_or_default(),
            ),
        }
    }
}

/// Compares two keys; incomparable keys (NaN) count as equal.
fn compare_keys<K: PartialOrd>(a: &K, b: &K, order: SortOrder) -> Ordering {
    let ordering = a.partial_cmp(b).unwrap_or(Ordering::Equal);
    match order {
        SortOrder::Ascending => ordering,
        SortOrder::Descending => ordering.reverse(),
    }
}

/// Sorts a slice in place by shifting each element left past every neighbour
/// whose key is strictly out of order relative to it.
pub fn insertion_sort<T, K, F>(items: &mut [T], key_fn: F, order: SortOrder)
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    for i in 1..items.len() {
        let current_key = key_fn(&items[i]);
        let mut j = i;
        while j > 0 && compare_keys(&key_fn(&items[j - 1]), &current_key, order) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

impl Store {
    /// Sorts the records in place by a named key.
    ///
    /// # Errors
    ///
    /// Schema errors for unknown fields or non-numeric projections; the
    /// order is unchanged on error.
    pub fn sort_by(&mut self, key: &SortKey, order: SortOrder, algorithm: SortAlgorithm) -> StoreResult<()> {
        let resolved = match key {
            SortKey::Id => ResolvedKey::Id,
            SortKey::Numeric(projection) => ResolvedKey::Numeric(projection.resolve(&self.schema)?),
            SortKey::Text(field) => ResolvedKey::Text(
                self.schema
                    .field_index(field)
                    .ok_or_else(|| SchemaError::UnknownField(field.clone()))?,
            ),
        };

        self.sort_by_key_fn(|record| resolved.key_of(record), order, algorithm);

        let label = match key {
            SortKey::Id => self.schema.id_column.clone(),
            SortKey::Numeric(projection) => projection.label(),
            SortKey::Text(field) => field.clone(),
        };
        log_event_with_fields(
            Event::StoreSorted,
            &[
                ("algorithm", algorithm.as_str()),
                ("key", label.as_str()),
                ("order", order.as_str()),
            ],
        );
        Ok(())
    }

    /// Sorts the records in place by any derived key.
    pub fn sort_by_key_fn<K, F>(&mut self, key_fn: F, order: SortOrder, algorithm: SortAlgorithm)
    where
        K: PartialOrd,
        F: Fn(&Record) -> K,
    {
        match algorithm {
            SortAlgorithm::Insertion => insertion_sort(&mut self.records, key_fn, order),
            SortAlgorithm::Platform => self
                .records
                .sort_by(|a, b| compare_keys(&key_fn(a), &key_fn(b), order)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDef, Schema};

    fn store(rows: &[(&str, i64)]) -> Store {
        let mut store = Store::new(Schema::new(
            "s",
            "id",
            vec![FieldDef::text("name"), FieldDef::int("score")],
        ));
        for (name, score) in rows {
            store.add(&[("name", *name), ("score", score.to_string().as_str())]).unwrap();
        }
        store
    }

    fn ids(store: &Store) -> Vec<u64> {
        store.records().iter().map(Record::id).collect()
    }

    #[test]
    fn test_insertion_sort_plain_slice() {
        let mut v = vec![5, 2, 9, 1, 5, 6];
        insertion_sort(&mut v, |x| *x, SortOrder::Ascending);
        assert_eq!(v, vec![1, 2, 5, 5, 6, 9]);
        insertion_sort(&mut v, |x| *x, SortOrder::Descending);
        assert_eq!(v, vec![9, 6, 5, 5, 2, 1]);
    }

    #[test]
    fn test_insertion_sort_empty_and_single() {
        let mut empty: Vec<i32> = vec![];
        insertion_sort(&mut empty, |x| *x, SortOrder::Ascending);
        let mut one = vec![3];
        insertion_sort(&mut one, |x| *x, SortOrder::Ascending);
        assert_eq!(one, vec![3]);
    }

    #[test]
    fn test_numeric_sort_both_algorithms() {
        for algorithm in [SortAlgorithm::Insertion, SortAlgorithm::Platform] {
            let mut s = store(&[("a", 50), ("b", 10), ("c", 90), ("d", 30)]);
            let key = SortKey::Numeric(Projection::Field("score".into()));
            s.sort_by(&key, SortOrder::Ascending, algorithm).unwrap();
            assert_eq!(ids(&s), vec![2, 4, 1, 3]);
            s.sort_by(&key, SortOrder::Descending, algorithm).unwrap();
            assert_eq!(ids(&s), vec![3, 1, 4, 2]);
        }
    }

    #[test]
    fn test_text_sort_is_case_insensitive() {
        let mut s = store(&[("delta", 0), ("Alpha", 0), ("charlie", 0), ("Bravo", 0)]);
        s.sort_by(&SortKey::Text("name".into()), SortOrder::Ascending, SortAlgorithm::Insertion)
            .unwrap();
        assert_eq!(ids(&s), vec![2, 4, 3, 1]);
    }

    #[test]
    fn test_platform_descending_keeps_tie_order() {
        let mut s = store(&[("a", 1), ("b", 2), ("c", 1), ("d", 2)]);
        let key = SortKey::Numeric(Projection::Field("score".into()));
        s.sort_by(&key, SortOrder::Descending, SortAlgorithm::Platform).unwrap();
        assert_eq!(ids(&s), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_sort_by_id_restores_insertion_order() {
        let mut s = store(&[("a", 3), ("b", 1), ("c", 2)]);
        let key = SortKey::Numeric(Projection::Field("score".into()));
        s.sort_by(&key, SortOrder::Ascending, SortAlgorithm::Insertion).unwrap();
        s.sort_by(&SortKey::Id, SortOrder::Ascending, SortAlgorithm::Platform).unwrap();
        assert_eq!(ids(&s), vec![1, 2, 3]);
    }

    #[test]
    fn test_unknown_key_leaves_order() {
        let mut s = store(&[("b", 2), ("a", 1)]);
        let err = s
            .sort_by(&SortKey::Text("nope".into()), SortOrder::Ascending, SortAlgorithm::Platform)
            .unwrap_err();
        assert_eq!(err.code(), "TAB_SCHEMA_UNKNOWN_FIELD");
        assert_eq!(ids(&s), vec![1, 2]);
    }

    #[test]
    fn test_numeric_sort_on_text_field_rejected() {
        let mut s = store(&[("a", 1)]);
        let key = SortKey::Numeric(Projection::Field("name".into()));
        assert!(s.sort_by(&key, SortOrder::Ascending, SortAlgorithm::Insertion).is_err());
    }
}
