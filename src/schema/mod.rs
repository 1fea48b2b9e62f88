//! Field schema subsystem for tabstore
//!
//! A schema is the configuration that turns the generic store into a concrete
//! dataset: the id column name plus an ordered list of typed fields.
//!
//! # Design Principles
//!
//! - Validation happens before anything is stored
//! - One set of rules for load, add and update
//! - Text is trimmed; empty text is never stored
//! - Bounded integers never leave their bounds

mod errors;
mod loader;
pub mod presets;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaResult, ValidationDetails};
pub use loader::SchemaLoader;
pub use types::{FieldDef, FieldKind, Schema};
pub use validator::{FieldLookup, SchemaValidator};
