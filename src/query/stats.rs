//! Aggregate statistics
//!
//! All functions take a projected `&[f64]` and return `NaN` for an empty
//! input instead of panicking. Standard deviation uses the population formula.

use serde::Serialize;

use super::projection::ResolvedProjection;
use crate::record::Record;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation: sqrt of the mean squared deviation.
pub fn standard_deviation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    let variance = values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

pub fn min(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

pub fn max(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// count / mean / std_dev / min / max of one projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

pub fn summarize(values: &[f64]) -> Summary {
    Summary {
        count: values.len(),
        mean: mean(values),
        std_dev: standard_deviation(values),
        min: min(values),
        max: max(values),
    }
}

/// A labelled subset of records
pub struct Cohort<'a> {
    label: String,
    predicate: Box<dyn Fn(&Record) -> bool + 'a>,
}

impl<'a> Cohort<'a> {
    pub fn new(label: impl Into<String>, predicate: impl Fn(&Record) -> bool + 'a) -> Self {
        Self {
            label: label.into(),
            predicate: Box::new(predicate),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn contains(&self, record: &Record) -> bool {
        (self.predicate)(record)
    }
}

/// Size and mean of one cohort
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub label: String,
    pub count: usize,
    pub mean: f64,
}

/// Two cohorts compared on one projection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupComparison {
    pub metric: String,
    pub first: GroupStats,
    pub second: GroupStats,
}

impl GroupComparison {
    /// first.mean - second.mean
    pub fn difference(&self) -> f64 {
        self.first.mean - self.second.mean
    }
}

/// Compares two cohorts on a projection.
///
/// Returns `None` unless both cohorts are non-empty. A record may belong to
/// both, one, or neither cohort.
pub fn group_comparison(
    records: &[Record],
    first: &Cohort<'_>,
    second: &Cohort<'_>,
    projection: &ResolvedProjection,
) -> Option<GroupComparison> {
    let stats = |cohort: &Cohort<'_>| {
        let values: Vec<f64> = records
            .iter()
            .filter(|r| cohort.contains(r))
            .map(|r| projection.apply(r))
            .collect();
        GroupStats {
            label: cohort.label.clone(),
            count: values.len(),
            mean: mean(&values),
        }
    };

    let first = stats(first);
    let second = stats(second);
    if first.count == 0 || second.count == 0 {
        return None;
    }

    Some(GroupComparison {
        metric: projection.label().to_string(),
        first,
        second,
    })
}
