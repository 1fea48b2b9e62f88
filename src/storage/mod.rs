//! Persistence subsystem for tabstore
//!
//! Moves a store's records to and from a UTF-8 delimited-text file: one
//! header row, then one row per record.
//!
//! # Design Principles
//!
//! - Full-file replace on save, full-file read on load
//! - Header columns matched by name, in any order; extras ignored
//! - The id column is written but never required; ids are regenerated on load
//! - Row-local problems degrade to diagnostics, resource-wide ones abort
//!
//! # Invariants Enforced
//!
//! - A malformed row never aborts a load and consumes no id
//! - Missing required columns fail the whole load
//! - File handles are released on every return path

mod codec;
mod csv;
mod errors;
mod paths;
mod reader;
mod writer;

pub use codec::{HeaderMap, RowCodec};
pub use csv::{join_fields, quote_field, split_line, CsvDialect};
pub use errors::{RowError, StorageError, StorageResult};
pub use paths::{resolve_data_path, resolve_output_path};
pub use reader::{load, LoadOutcome, LoadReport, RowDiagnostic, StoreReader};
pub use writer::{save, write_to, StoreWriter};
