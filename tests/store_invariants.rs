//! Store Invariant Tests
//!
//! - Ids are unique, positive and strictly increasing; never reissued
//! - find_by_id agrees with "does any record have this id"
//! - Failed adds and deletes leave the store unchanged
//! - Updates apply field by field, keeping old values for bad input

use tabstore::query::{mean, project, Projection};
use tabstore::schema::{presets, FieldDef, Schema};
use tabstore::store::{RecordPatch, SortAlgorithm, SortKey, SortOrder, Store, StoreError};

// =============================================================================
// Helper Functions
// =============================================================================

fn score_store() -> Store {
    Store::new(Schema::new(
        "scores",
        "id",
        vec![FieldDef::bounded_int("score", 0, 100)],
    ))
}

fn add_score(store: &mut Store, score: i64) -> u64 {
    store
        .add(&[("score", score.to_string().as_str())])
        .unwrap()
        .id()
}

fn ids(store: &Store) -> Vec<u64> {
    store.records().iter().map(|r| r.id()).collect()
}

fn book(title: &str, status: &str) -> [(&'static str, String); 4] {
    [
        ("title", title.to_string()),
        ("author", "Anon".to_string()),
        ("category", "Misc".to_string()),
        ("status", status.to_string()),
    ]
}

fn add_book(store: &mut Store, title: &str, status: &str) -> Result<u64, StoreError> {
    let fields = book(title, status);
    let pairs: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
    store.add(&pairs[..]).map(|r| r.id())
}

// =============================================================================
// Reference Scenario
// =============================================================================

#[test]
fn test_add_delete_sort_mean_scenario() {
    let mut store = score_store();

    assert_eq!(add_score(&mut store, 70), 1);
    assert_eq!(add_score(&mut store, 85), 2);
    store.delete(1).unwrap();
    assert_eq!(add_score(&mut store, 90), 3);

    assert!(store.find_by_id(1).is_none());

    let key = SortKey::Numeric(Projection::Field("score".into()));
    store
        .sort_by(&key, SortOrder::Ascending, SortAlgorithm::Insertion)
        .unwrap();

    let projection = Projection::Field("score".into()).resolve(store.schema()).unwrap();
    let scores = project(store.records(), &projection);
    assert_eq!(scores, vec![85.0, 90.0]);
    assert_eq!(mean(&scores), 87.5);
}

// =============================================================================
// Id Uniqueness & Monotonicity Tests
// =============================================================================

/// Interleaved adds and deletes never reissue an id.
#[test]
fn test_ids_strictly_increase_across_deletes() {
    let mut store = score_store();
    let mut issued = Vec::new();

    for round in 0..20u64 {
        let id = add_score(&mut store, (round % 100) as i64);
        if let Some(last) = issued.last() {
            assert!(id > *last, "id {} not above {}", id, last);
        }
        issued.push(id);

        // Delete the newest record every third round, so the max is removed.
        if round % 3 == 2 {
            store.delete(id).unwrap();
        }
    }

    let mut surviving = ids(&store);
    let before = surviving.len();
    surviving.sort_unstable();
    surviving.dedup();
    assert_eq!(surviving.len(), before);
    assert!(surviving.iter().all(|id| *id > 0));
}

/// Emptying the store does not restart numbering.
#[test]
fn test_ids_not_reset_when_emptied() {
    let mut store = score_store();
    add_score(&mut store, 1);
    add_score(&mut store, 2);
    store.delete(1).unwrap();
    store.delete(2).unwrap();
    assert!(store.is_empty());

    assert_eq!(add_score(&mut store, 3), 3);
    assert_eq!(store.last_issued_id(), 3);
}

// =============================================================================
// Search Correctness Tests
// =============================================================================

#[test]
fn test_find_by_id_agrees_with_membership() {
    let mut store = score_store();
    for s in [10, 20, 30, 40, 50] {
        add_score(&mut store, s);
    }
    store.delete(2).unwrap();
    store.delete(5).unwrap();

    for id in 0..8u64 {
        let present = store.records().iter().any(|r| r.id() == id);
        assert_eq!(store.find_by_id(id).is_some(), present, "id {}", id);
        if let Some(record) = store.find_by_id(id) {
            assert_eq!(record.id(), id);
        }
    }
}

// =============================================================================
// Failure Atomicity Tests
// =============================================================================

#[test]
fn test_invalid_add_leaves_store_unchanged() {
    let mut store = Store::new(presets::library_books());
    add_book(&mut store, "Emma", "available").unwrap();
    let before = store.clone();

    let err = add_book(&mut store, "Lost", "stolen").unwrap_err();
    assert_eq!(err.code(), "TAB_STORE_VALIDATION_FAILED");
    assert_eq!(err.details().unwrap().field, "status");

    let err = add_book(&mut store, "   ", "issued").unwrap_err();
    assert_eq!(err.details().unwrap().field, "title");

    assert_eq!(store.records(), before.records());
    assert_eq!(store.last_issued_id(), before.last_issued_id());

    // The failed adds consumed no id.
    assert_eq!(add_book(&mut store, "Dune", "issued").unwrap(), 2);
}

#[test]
fn test_repeated_delete_fails() {
    let mut store = score_store();
    add_score(&mut store, 40);
    store.delete(1).unwrap();
    assert_eq!(store.delete(1).unwrap_err(), StoreError::NotFound { id: 1 });
}

// =============================================================================
// Update Policy Tests
// =============================================================================

#[test]
fn test_update_keeps_previous_value_for_each_bad_field() {
    let mut store = Store::new(presets::students_performance());
    store
        .add(&[
            ("gender", "female"),
            ("race/ethnicity", "group C"),
            ("parental level of education", "some college"),
            ("lunch", "standard"),
            ("test preparation course", "completed"),
            ("math score", "69"),
            ("reading score", "90"),
            ("writing score", "88"),
        ])
        .unwrap();

    let patch = RecordPatch::new()
        .set("math score", "150")
        .set("reading score", "95")
        .set("lunch", "")
        .set("writing score", "eighty");
    let report = store.update(1, &patch).unwrap();

    assert_eq!(report.applied, vec!["reading score"]);
    assert_eq!(report.kept, vec!["lunch"]);
    let rejected: Vec<&str> = report.rejected.iter().map(|d| d.field.as_str()).collect();
    assert_eq!(rejected, vec!["math score", "writing score"]);
    assert!(!report.is_clean());

    let schema = store.schema().clone();
    let record = store.find_by_id(1).unwrap();
    let value = |name: &str| record.value(schema.field_index(name).unwrap()).unwrap().to_string();
    assert_eq!(value("math score"), "69");
    assert_eq!(value("reading score"), "95");
    assert_eq!(value("writing score"), "88");
    assert_eq!(value("lunch"), "standard");
}

#[test]
fn test_update_missing_record() {
    let mut store = score_store();
    let patch = RecordPatch::new().set("score", "5");
    assert_eq!(
        store.update(9, &patch).unwrap_err(),
        StoreError::NotFound { id: 9 }
    );
}

#[test]
fn test_update_choice_alias_normalized() {
    let mut store = Store::new(presets::library_books());
    add_book(&mut store, "Emma", "issued").unwrap();
    store
        .update(1, &RecordPatch::new().set("status", "In"))
        .unwrap();
    let record = store.find_by_id(1).unwrap();
    assert_eq!(record.value(3).unwrap().to_string(), "available");
}
