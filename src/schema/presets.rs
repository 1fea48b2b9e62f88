//! Built-in dataset schemas
//!
//! Column names match the CSV exports these datasets ship as.

use super::types::{FieldDef, Schema};

/// Default data file for the student-performance dataset
pub const STUDENTS_DATA_FILE: &str = "StudentsPerformance.csv";
/// Default save target for the student-performance dataset
pub const STUDENTS_OUTPUT_FILE: &str = "students_performance_updated.csv";
/// Default data file for the library catalog
pub const BOOKS_DATA_FILE: &str = "Books_data.csv";
/// Default save target for the library catalog
pub const BOOKS_OUTPUT_FILE: &str = "library_output.csv";

/// Student exam results: five categorical columns, three 0..=100 scores.
pub fn students_performance() -> Schema {
    Schema::new(
        "students",
        "student_id",
        vec![
            FieldDef::text("gender"),
            FieldDef::text("race/ethnicity"),
            FieldDef::text("parental level of education"),
            FieldDef::text("lunch"),
            FieldDef::text("test preparation course"),
            FieldDef::bounded_int("math score", 0, 100),
            FieldDef::bounded_int("reading score", 0, 100),
            FieldDef::bounded_int("writing score", 0, 100),
        ],
    )
}

/// Library catalog: free-text bibliographic columns plus a lending status.
pub fn library_books() -> Schema {
    Schema::new(
        "books",
        "bid",
        vec![
            FieldDef::text("title"),
            FieldDef::text("author"),
            FieldDef::text("category"),
            FieldDef::choice("status", ["issued", "available"])
                .with_alias("issue", "issued")
                .with_alias("avail", "available")
                .with_alias("in", "available")
                .with_alias("in stock", "available"),
        ],
    )
    .with_collapsed_whitespace()
}

/// Looks up a built-in schema by name (`students` or `books`).
pub fn preset(name: &str) -> Option<Schema> {
    match name.trim().to_ascii_lowercase().as_str() {
        "students" => Some(students_performance()),
        "books" => Some(library_books()),
        _ => None,
    }
}
