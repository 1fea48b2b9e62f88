//! Read-only queries over a store snapshot
//!
//! Everything here takes `&[Record]` (usually `store.records()`) and never
//! mutates. Empty inputs produce empty views or `NaN` statistics, never a
//! panic.

mod filter;
mod frequency;
mod projection;
mod stats;

pub use filter::{filter, FieldFilter, FieldMatcher};
pub use frequency::{frequency_table, FrequencyEntry, FrequencyTable};
pub use projection::{project, Projection, ResolvedProjection};
pub use stats::{
    group_comparison, max, mean, min, standard_deviation, summarize, Cohort, GroupComparison,
    GroupStats, Summary,
};
