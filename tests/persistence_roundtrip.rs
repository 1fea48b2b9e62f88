//! Persistence Tests
//!
//! - load(save(S)) reproduces S's field values; ids renumber by row order
//! - Header columns match by name, in any order; extras are ignored
//! - Bad rows are skipped with line-numbered diagnostics
//! - Missing required columns and missing files fail the whole load
//! - A header-only file and an all-rejected file are distinguishable

use std::fs;
use std::path::PathBuf;

use tabstore::schema::{presets, SchemaError};
use tabstore::storage::{self, LoadOutcome, RowError, StorageError};
use tabstore::store::{SortAlgorithm, SortKey, SortOrder, Store};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const STUDENTS_HEADER: &str = "gender,race/ethnicity,parental level of education,lunch,test preparation course,math score,reading score,writing score";

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn values(store: &Store) -> Vec<Vec<String>> {
    store
        .records()
        .iter()
        .map(|r| r.values().iter().map(|v| v.to_string()).collect())
        .collect()
}

fn ids(store: &Store) -> Vec<u64> {
    store.records().iter().map(|r| r.id()).collect()
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_save_then_load_preserves_values_and_order() {
    let dir = TempDir::new().unwrap();
    let source = write(
        &dir,
        "StudentsPerformance.csv",
        &format!(
            "{}\n\
             female,group B,bachelor's degree,standard,none,72,72,74\n\
             male,group A,associate's degree,free/reduced,none,47,57,44\n\
             female,group C,\"some college, incomplete\",standard,completed,90,95,93\n",
            STUDENTS_HEADER
        ),
    );

    let (mut store, report) = storage::load(&source, presets::students_performance()).unwrap();
    assert_eq!(report.outcome(), LoadOutcome::Loaded(3));

    store.delete(2).unwrap();
    store
        .sort_by(&SortKey::Text("parental level of education".into()), SortOrder::Descending, SortAlgorithm::Insertion)
        .unwrap();
    assert_eq!(ids(&store), vec![3, 1]);

    let target = dir.path().join("students_performance_updated.csv");
    assert_eq!(storage::save(&store, &target).unwrap(), 2);

    let saved = fs::read_to_string(&target).unwrap();
    assert!(saved.starts_with(&format!("student_id,{}\n3,", STUDENTS_HEADER)));
    assert!(saved.contains("\"some college, incomplete\""));

    // The saved id column is ignored and ids are regenerated in row order.
    let (reloaded, report) = storage::load(&target, presets::students_performance()).unwrap();
    assert!(report.skipped.is_empty());
    assert_eq!(ids(&reloaded), vec![1, 2]);
    assert_eq!(values(&reloaded), values(&store));
}

#[test]
fn test_quotes_and_delimiters_survive_round_trip() {
    let dir = TempDir::new().unwrap();
    let mut store = Store::new(presets::library_books());
    store
        .add(&[
            ("title", "The \"Best\" Book, Vol. 2"),
            ("author", "O'Brien, Pat"),
            ("category", "Essays"),
            ("status", "issued"),
        ])
        .unwrap();

    let path = dir.path().join("library_output.csv");
    storage::save(&store, &path).unwrap();
    let (reloaded, _) = storage::load(&path, presets::library_books()).unwrap();
    assert_eq!(values(&reloaded), values(&store));
}

// =============================================================================
// Header Tests
// =============================================================================

#[test]
fn test_column_order_and_extra_columns() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "Books_data.csv",
        "isbn,status,category,author,title,shelf\n\
         111,Issue,Fiction,Frank   Herbert,Dune,A1\n\
         222,avail,Fantasy,J.R.R. Tolkien,The Hobbit,B2\n",
    );

    let (store, report) = storage::load(&path, presets::library_books()).unwrap();
    assert_eq!(report.loaded, 2);
    assert_eq!(
        values(&store),
        vec![
            vec!["Dune", "Frank Herbert", "Fiction", "issued"],
            vec!["The Hobbit", "J.R.R. Tolkien", "Fantasy", "available"],
        ]
    );
}

#[test]
fn test_missing_required_columns_fail_whole_load() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "books.csv", "title,author\nDune,Herbert\n");

    let err = storage::load(&path, presets::library_books()).unwrap_err();
    assert_eq!(err.code(), "TAB_STORAGE_SCHEMA");
    assert_eq!(
        err.schema_error().unwrap().missing_columns(),
        ["category", "status"]
    );
}

#[test]
fn test_empty_file_is_missing_header() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "books.csv", "\n\n");
    let err = storage::load(&path, presets::library_books()).unwrap_err();
    assert_eq!(err.schema_error(), Some(&SchemaError::MissingHeader));
}

// =============================================================================
// Malformed Row Tests
// =============================================================================

#[test]
fn test_bad_rows_skipped_without_consuming_ids() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "StudentsPerformance.csv",
        &format!(
            "{}\n\
             female,group B,bachelor's degree,standard,none,72,72,74\n\
             male,group A,associate's degree,free/reduced,none,101,57,44\n\
             ,group A,high school,standard,none,50,50,50\n\
             male,group D,high school,standard,none,abc,50,50\n\
             female,\"group E,high school,standard,none,50,50,50\n\
             \n\
             male,group C,some college,standard,completed,88,81,79\n",
            STUDENTS_HEADER
        ),
    );

    let (store, report) = storage::load(&path, presets::students_performance()).unwrap();
    assert_eq!(ids(&store), vec![1, 2]);
    assert_eq!(report.data_rows, 6);
    assert_eq!(report.loaded, 2);

    let lines: Vec<usize> = report.skipped.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![3, 4, 5, 6]);

    let fields: Vec<Option<&str>> = report
        .skipped
        .iter()
        .map(|d| match &d.error {
            RowError::Field(details) => Some(details.field.as_str()),
            RowError::UnterminatedQuote => None,
        })
        .collect();
    assert_eq!(fields, vec![Some("math score"), Some("gender"), Some("math score"), None]);
}

// =============================================================================
// Empty Result Tests
// =============================================================================

#[test]
fn test_header_only_vs_all_rejected() {
    let dir = TempDir::new().unwrap();

    let header_only = write(&dir, "a.csv", "title,author,category,status\n");
    let (store, report) = storage::load(&header_only, presets::library_books()).unwrap();
    assert!(store.is_empty());
    assert_eq!(report.outcome(), LoadOutcome::NoDataRows);

    let all_bad = write(
        &dir,
        "b.csv",
        "title,author,category,status\nDune,Herbert,SciFi,lost\n,Nobody,X,issued\n",
    );
    let (store, report) = storage::load(&all_bad, presets::library_books()).unwrap();
    assert!(store.is_empty());
    assert!(report.is_empty());
    assert_eq!(report.outcome(), LoadOutcome::AllRowsRejected(2));
    assert_eq!(report.skipped.len(), 2);
}

// =============================================================================
// Not Found Tests
// =============================================================================

#[test]
fn test_missing_file_reports_absolute_path_and_listing() {
    let dir = TempDir::new().unwrap();
    write(&dir, "books_backup.csv", "title\n");

    let err = storage::load(&dir.path().join("Books_data.csv"), presets::library_books()).unwrap_err();
    assert_eq!(err.code(), "TAB_STORAGE_NOT_FOUND");
    assert!(err.path().is_absolute());
    assert!(err.path().ends_with("Books_data.csv"));
    match err {
        StorageError::NotFound { listing, .. } => {
            assert_eq!(listing, Some(vec!["books_backup.csv".to_string()]));
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}
