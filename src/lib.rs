//! tabstore - a schema-driven record table over a CSV file
//!
//! Loads a delimited-text dataset into an in-memory store, answers searches
//! and statistics over it, applies single edits, and saves it back.

pub mod cli;
pub mod observability;
pub mod query;
pub mod record;
pub mod schema;
pub mod storage;
pub mod store;

pub use record::{Record, Value};
pub use store::Store;
