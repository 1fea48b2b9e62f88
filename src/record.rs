//! Record value type
//!
//! A record is one row of a dataset: the store-issued id plus one typed value
//! per schema field, in schema field order. Records are only created and
//! mutated by the store.

use std::fmt;

/// One typed field value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Text or choice field value, already trimmed and normalized
    Text(String),
    /// Integer field value, already bounds-checked
    Int(i64),
}

impl Value {
    /// Returns the text if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Int(_) => None,
        }
    }

    /// Returns the integer if this is an integer value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    /// Returns the integer as `f64` for statistics
    pub fn as_f64(&self) -> Option<f64> {
        self.as_int().map(|n| n as f64)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Int(n) => write!(f, "{}", n),
        }
    }
}

/// One entity: a store-issued id plus its field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: u64,
    values: Vec<Value>,
}

impl Record {
    pub(crate) fn new(id: u64, values: Vec<Value>) -> Self {
        Self { id, values }
    }

    /// Returns the store-issued identifier (always >= 1)
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns all field values in schema order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the value at a schema field index
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Returns whether both records hold the same field values, ignoring ids.
    pub fn same_fields(&self, other: &Record) -> bool {
        self.values == other.values
    }

    pub(crate) fn set(&mut self, index: usize, value: Value) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }
}
