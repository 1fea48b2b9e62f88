//! Numeric projections
//!
//! A projection maps a record to one `f64`: either a single integer field or
//! the mean of several. Projections are resolved against a schema once, then
//! applied to many records without further name lookups.

use crate::record::Record;
use crate::schema::{Schema, SchemaError, SchemaResult};

/// A numeric view of a record, by field name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// One integer field
    Field(String),
    /// Mean of several integer fields
    Average(Vec<String>),
}

impl Projection {
    /// Average of every integer field in the schema
    pub fn average_of_all(schema: &Schema) -> Self {
        Projection::Average(schema.numeric_fields().into_iter().map(String::from).collect())
    }

    /// Binds field names to column positions.
    ///
    /// # Errors
    ///
    /// `UnknownField` for undeclared names, `NotNumeric` for text fields, and
    /// `NotNumeric("average")` for an empty average.
    pub fn resolve(&self, schema: &Schema) -> SchemaResult<ResolvedProjection> {
        let names: Vec<&str> = match self {
            Projection::Field(name) => vec![name.as_str()],
            Projection::Average(names) => names.iter().map(String::as_str).collect(),
        };
        if names.is_empty() {
            return Err(SchemaError::NotNumeric("average".into()));
        }

        let mut indexes = Vec::with_capacity(names.len());
        for name in names {
            let index = schema
                .field_index(name)
                .ok_or_else(|| SchemaError::UnknownField(name.to_string()))?;
            if !schema.fields[index].is_numeric() {
                return Err(SchemaError::NotNumeric(name.to_string()));
            }
            indexes.push(index);
        }

        Ok(ResolvedProjection {
            label: self.label(),
            indexes,
        })
    }

    /// Human-readable name, e.g. `math score` or `avg(math score, reading score)`
    pub fn label(&self) -> String {
        match self {
            Projection::Field(name) => name.clone(),
            Projection::Average(names) => format!("avg({})", names.join(", ")),
        }
    }
}

/// A projection bound to column positions of one schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProjection {
    label: String,
    indexes: Vec<usize>,
}

impl ResolvedProjection {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Applies the projection. Returns `NaN` if a value is not an integer,
    /// which cannot happen for records of the schema it was resolved against.
    pub fn apply(&self, record: &Record) -> f64 {
        let mut sum = 0.0;
        for &index in &self.indexes {
            match record.value(index).and_then(|v| v.as_f64()) {
                Some(x) => sum += x,
                None => return f64::NAN,
            }
        }
        sum / self.indexes.len() as f64
    }
}

/// Projects every record, preserving order
pub fn project(records: &[Record], projection: &ResolvedProjection) -> Vec<f64> {
    records.iter().map(|r| projection.apply(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;
    use crate::schema::FieldDef;

    fn schema() -> Schema {
        Schema::new(
            "s",
            "id",
            vec![
                FieldDef::text("name"),
                FieldDef::int("a"),
                FieldDef::int("b"),
                FieldDef::int("c"),
            ],
        )
    }

    fn record(a: i64, b: i64, c: i64) -> Record {
        Record::new(
            1,
            vec![Value::Text("x".into()), Value::Int(a), Value::Int(b), Value::Int(c)],
        )
    }

    #[test]
    fn test_field_projection() {
        let p = Projection::Field("b".into()).resolve(&schema()).unwrap();
        assert_eq!(p.apply(&record(1, 2, 3)), 2.0);
        assert_eq!(p.label(), "b");
    }

    #[test]
    fn test_average_projection() {
        let p = Projection::average_of_all(&schema()).resolve(&schema()).unwrap();
        assert_eq!(p.apply(&record(0, 100, 100)), 200.0 / 3.0);
        assert_eq!(p.label(), "avg(a, b, c)");
    }

    #[test]
    fn test_text_field_is_not_numeric() {
        let err = Projection::Field("name".into()).resolve(&schema()).unwrap_err();
        assert_eq!(err, SchemaError::NotNumeric("name".into()));
    }

    #[test]
    fn test_unknown_field() {
        let err = Projection::Average(vec!["a".into(), "z".into()])
            .resolve(&schema())
            .unwrap_err();
        assert_eq!(err, SchemaError::UnknownField("z".into()));
    }

    #[test]
    fn test_empty_average_rejected() {
        assert!(Projection::Average(vec![]).resolve(&schema()).is_err());
    }

    #[test]
    fn test_project_preserves_order() {
        let p = Projection::Field("a".into()).resolve(&schema()).unwrap();
        let records = vec![record(3, 0, 0), record(1, 0, 0), record(2, 0, 0)];
        assert_eq!(project(&records, &p), vec![3.0, 1.0, 2.0]);
    }
}
