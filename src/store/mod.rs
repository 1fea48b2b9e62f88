//! Record store subsystem for tabstore
//!
//! The store is the single owner of a dataset's records while a session runs.
//! All mutation goes through it: it issues ids, validates input, searches by
//! linear scan and reorders records in place.
//!
//! # Invariants Enforced
//!
//! - Ids are unique, positive and never reissued
//! - Stored values always satisfy their field domains
//! - Failed operations do not partially apply

mod errors;
mod search;
mod sort;
mod table;

pub use errors::{StoreError, StoreResult};
pub use search::TextMatch;
pub use sort::{insertion_sort, KeyValue, SortAlgorithm, SortKey, SortOrder};
pub use table::{RecordPatch, Store, UpdateReport};
