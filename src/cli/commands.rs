//! CLI command implementations
//!
//! Each invocation loads the data file, makes exactly one store or query
//! call, and saves the result after edits or a sort given `--out`. The
//! response is a single JSON value.

use std::path::Path;

use serde_json::{json, Value};

use crate::observability::Logger;
use crate::record::Record;
use crate::query::{
    frequency_table, group_comparison, project, summarize, Cohort, FieldFilter, Projection,
};
use crate::schema::{Schema, SchemaError};
use crate::storage::{self, LoadOutcome, LoadReport};
use crate::store::{RecordPatch, SortAlgorithm, SortKey, SortOrder, Store, TextMatch};

use super::args::{Cli, Command, GlobalArgs};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{record_to_json, records_to_json, write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments, runs the command and writes the JSON response. On
/// failure an error response is written before the error is returned.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match run_command(&cli.global, cli.command) {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code(), &e.to_string(), e.details())?;
            Err(e)
        }
    }
}

/// Resolve configuration, set the log level and run one command
pub fn run_command(global: &GlobalArgs, cmd: Command) -> CliResult<Value> {
    let config = Config::resolve(global)?;
    Logger::set_min_severity(config.min_severity());
    execute(&config, cmd)
}

/// Run one command against an already resolved configuration
pub fn execute(config: &Config, cmd: Command) -> CliResult<Value> {
    let (mut store, report) = open_store(config)?;
    let load = load_summary(&report);

    let data = match cmd {
        Command::Show { filter, limit } => show(config, &store, filter.as_deref(), limit)?,
        Command::Find {
            id,
            field,
            value,
            contains,
            case_sensitive,
        } => {
            let mode = if contains { TextMatch::contains() } else { TextMatch::exact() };
            let mode = if case_sensitive { mode.case_sensitive() } else { mode };
            find(&store, id, field.as_deref(), value.as_deref(), mode)?
        }
        Command::Sort { by, desc, builtin, out } => {
            let order = if desc { SortOrder::Descending } else { SortOrder::Ascending };
            let algorithm = if builtin { SortAlgorithm::Platform } else { SortAlgorithm::Insertion };
            let key = parse_sort_key(store.schema(), &by)?;
            store.sort_by(&key, order, algorithm)?;
            let shown = store.records().iter().take(config.display_limit);
            // Loading renumbers ids by row order, so a saved order is shown
            // with the ids it will carry on the next load.
            let (records, saved) = match out.as_deref() {
                Some(path) => (reloaded_ids(store.schema(), shown), save(config, &store, Some(path))?),
                None => (records_to_json(store.schema(), shown), Value::Null),
            };
            json!({
                "key": by,
                "order": order.as_str(),
                "algorithm": algorithm.as_str(),
                "records": records,
                "saved": saved,
            })
        }
        Command::Stats { fields, top, compare } => stats(&store, &fields, top, compare.as_deref())?,
        Command::Add { set, out } => {
            let fields = parse_assignments(store.schema(), &set)?;
            let record = store.add(&fields)?;
            let saved = save(config, &store, out.as_deref())?;
            json!({
                "record": record_to_json(store.schema(), &record),
                "saved": saved,
            })
        }
        Command::Update { id, set, out } => {
            let patch: RecordPatch = parse_assignments(store.schema(), &set)?.into_iter().collect();
            let outcome = store.update(id, &patch)?;
            let saved = save(config, &store, out.as_deref())?;
            let record = store.find_by_id(id).map(|r| record_to_json(store.schema(), r));
            let rejected: Vec<Value> = outcome
                .rejected
                .iter()
                .map(|d| json!({"field": d.field, "expected": d.expected, "actual": d.actual}))
                .collect();
            json!({
                "record": record,
                "applied": outcome.applied,
                "kept": outcome.kept,
                "rejected": rejected,
                "saved": saved,
            })
        }
        Command::Delete { id, out } => {
            let removed = store.delete(id)?;
            let saved = save(config, &store, out.as_deref())?;
            json!({
                "deleted": record_to_json(store.schema(), &removed),
                "remaining": store.len(),
                "saved": saved,
            })
        }
    };

    Ok(json!({ "load": load, "result": data }))
}

fn open_store(config: &Config) -> CliResult<(Store, LoadReport)> {
    let schema = config.schema()?;
    let path = config.data_path();
    Ok(storage::load(&path, schema)?)
}

fn load_summary(report: &LoadReport) -> Value {
    let outcome = match report.outcome() {
        LoadOutcome::Loaded(_) => "loaded",
        LoadOutcome::NoDataRows => "no_data_rows",
        LoadOutcome::AllRowsRejected(_) => "all_rows_rejected",
    };
    let skipped: Vec<Value> = report
        .skipped
        .iter()
        .map(|d| json!({"line": d.line, "code": d.error.code(), "reason": d.error.to_string()}))
        .collect();

    json!({
        "path": report.path.display().to_string(),
        "outcome": outcome,
        "data_rows": report.data_rows,
        "loaded": report.loaded,
        "skipped": skipped,
    })
}

fn save(config: &Config, store: &Store, out: Option<&Path>) -> CliResult<Value> {
    let path = config.output_path(out);
    let records = storage::save(store, &path)?;
    Ok(json!({
        "path": path.display().to_string(),
        "records": records,
    }))
}

/// Records as JSON, numbered by position from 1
fn reloaded_ids<'r, I>(schema: &Schema, records: I) -> Value
where
    I: IntoIterator<Item = &'r Record>,
{
    let renumbered = records.into_iter().enumerate().map(|(position, record)| {
        let mut object = record_to_json(schema, record);
        object[schema.id_column.as_str()] = json!(position + 1);
        object
    });
    Value::Array(renumbered.collect())
}

fn show(config: &Config, store: &Store, filter: Option<&str>, limit: Option<usize>) -> CliResult<Value> {
    let matching: Vec<_> = match filter {
        Some(spec) => {
            let matcher = FieldFilter::parse(spec)
                .ok_or_else(|| CliError::usage(format!("--filter expects FIELD=VALUE, got '{}'", spec)))?
                .matcher(store.schema())?;
            crate::query::filter(store.records(), |r| matcher.matches(r))
        }
        None => store.records().iter().collect(),
    };

    let limit = limit.unwrap_or(config.display_limit);
    Ok(json!({
        "total": matching.len(),
        "shown": matching.len().min(limit),
        "records": records_to_json(store.schema(), matching.into_iter().take(limit)),
    }))
}

fn find(
    store: &Store,
    id: Option<u64>,
    field: Option<&str>,
    value: Option<&str>,
    mode: TextMatch,
) -> CliResult<Value> {
    match (id, field, value) {
        (Some(id), _, _) => {
            let record = store.find_by_id(id).map(|r| record_to_json(store.schema(), r));
            Ok(json!({ "found": record.is_some(), "record": record }))
        }
        (None, Some(field), Some(value)) => {
            let matches = store.find_by_text_field(field, value, mode)?;
            Ok(json!({
                "count": matches.len(),
                "records": records_to_json(store.schema(), matches),
            }))
        }
        _ => Err(CliError::usage("find needs --id, or --field with --value")),
    }
}

fn stats(store: &Store, fields: &[String], top: Option<usize>, compare: Option<&str>) -> CliResult<Value> {
    let schema = store.schema();
    let records = store.records();

    let names: Vec<String> = if fields.is_empty() {
        schema.numeric_fields().into_iter().map(str::to_string).collect()
    } else {
        fields.to_vec()
    };

    let mut summaries = Vec::with_capacity(names.len());
    for name in &names {
        let projection = Projection::Field(name.clone()).resolve(schema)?;
        let summary = summarize(&project(records, &projection));
        summaries.push(json!({ "field": name, "summary": summary }));
    }

    let average = if names.is_empty() {
        Value::Null
    } else {
        let projection = Projection::Average(names.clone()).resolve(schema)?;
        json!({
            "label": projection.label(),
            "summary": summarize(&project(records, &projection)),
        })
    };

    let mut frequencies = Vec::new();
    if let Some(k) = top {
        for field in schema.categorical_fields() {
            let table = frequency_table(schema, records, field)?;
            frequencies.push(json!({
                "field": field,
                "distinct": table.len(),
                "top": table.top(k),
            }));
        }
    }

    let comparison = match compare {
        Some(spec) => compare_cohorts(store, spec)?,
        None => Value::Null,
    };

    Ok(json!({
        "count": records.len(),
        "fields": summaries,
        "average": average,
        "frequencies": frequencies,
        "comparison": comparison,
    }))
}

/// `FIELD=A,B`: records whose FIELD is A against those whose FIELD is B,
/// compared on the average of every numeric field.
fn compare_cohorts(store: &Store, spec: &str) -> CliResult<Value> {
    let usage = || CliError::usage(format!("--compare expects FIELD=A,B, got '{}'", spec));
    let (field, values) = spec.split_once('=').ok_or_else(usage)?;
    let (first, second) = values.split_once(',').ok_or_else(usage)?;

    let schema = store.schema();
    let first_matcher = FieldFilter::new(field.trim(), first.trim()).matcher(schema)?;
    let second_matcher = FieldFilter::new(field.trim(), second.trim()).matcher(schema)?;
    let projection = Projection::average_of_all(schema).resolve(schema)?;

    let comparison = group_comparison(
        store.records(),
        &Cohort::new(first.trim(), |r| first_matcher.matches(r)),
        &Cohort::new(second.trim(), |r| second_matcher.matches(r)),
        &projection,
    );

    Ok(match comparison {
        Some(c) => json!({
            "field": field.trim(),
            "metric": c.metric,
            "first": c.first,
            "second": c.second,
            "difference": c.difference(),
        }),
        None => Value::Null,
    })
}

/// `id`, a field name, or `avg:FIELD,FIELD,...` (`avg` alone averages every
/// numeric field).
fn parse_sort_key(schema: &Schema, spec: &str) -> CliResult<SortKey> {
    let spec = spec.trim();
    if spec == "id" || spec == schema.id_column {
        return Ok(SortKey::Id);
    }

    if spec == "avg" || spec == "avg:" {
        return Ok(SortKey::Numeric(Projection::average_of_all(schema)));
    }
    if let Some(list) = spec.strip_prefix("avg:") {
        let names = list.split(',').map(|n| n.trim().to_string()).collect();
        return Ok(SortKey::Numeric(Projection::Average(names)));
    }

    match schema.field(spec) {
        Some(def) if def.is_numeric() => Ok(SortKey::Numeric(Projection::Field(spec.to_string()))),
        Some(_) => Ok(SortKey::Text(spec.to_string())),
        None => Err(SchemaError::UnknownField(spec.to_string()).into()),
    }
}

/// Splits `FIELD=VALUE` items. Field names must be declared.
fn parse_assignments(schema: &Schema, items: &[String]) -> CliResult<Vec<(String, String)>> {
    items
        .iter()
        .map(|item| -> CliResult<(String, String)> {
            let (field, value) = item
                .split_once('=')
                .ok_or_else(|| CliError::usage(format!("--set expects FIELD=VALUE, got '{}'", item)))?;
            let field = field.trim();
            if schema.field(field).is_none() {
                return Err(SchemaError::UnknownField(field.to_string()).into());
            }
            Ok((field.to_string(), value.to_string()))
        })
        .collect()
}
