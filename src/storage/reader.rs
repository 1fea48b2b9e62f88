//! Loading a store from a delimited-text file
//!
//! - A missing file fails with `NotFound`, carrying the absolute path and the
//!   parent directory listing
//! - A missing header or required column fails the whole load
//! - A bad data row is skipped with a diagnostic; it never aborts the load
//! - Blank lines are ignored; a leading byte order mark is stripped

use std::fs::{self, File};
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::schema::{Schema, SchemaError};
use crate::store::Store;

use super::codec::{HeaderMap, RowCodec};
use super::errors::{RowError, StorageError, StorageResult};

const BOM: char = '\u{feff}';

/// A skipped data row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDiagnostic {
    /// 1-based line number in the file (the header is line 1)
    pub line: usize,
    pub error: RowError,
}

/// How a load that did not fail turned out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// At least one record was loaded
    Loaded(usize),
    /// The file has a header but no data rows
    NoDataRows,
    /// Every one of this many data rows was rejected
    AllRowsRejected(usize),
}

/// What happened during a load
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// Absolute path of the file read
    pub path: PathBuf,
    /// Non-blank data rows seen
    pub data_rows: usize,
    /// Records added to the store
    pub loaded: usize,
    pub skipped: Vec<RowDiagnostic>,
}

impl LoadReport {
    pub fn outcome(&self) -> LoadOutcome {
        if self.loaded > 0 {
            LoadOutcome::Loaded(self.loaded)
        } else if self.data_rows == 0 {
            LoadOutcome::NoDataRows
        } else {
            LoadOutcome::AllRowsRejected(self.data_rows)
        }
    }

    /// True when no usable record came out of the file
    pub fn is_empty(&self) -> bool {
        self.loaded == 0
    }
}

/// Buffered reader over a data file.
///
/// The file handle is closed when the reader is dropped, which happens on
/// every return path of `read_into`.
pub struct StoreReader {
    path: PathBuf,
    reader: BufReader<File>,
}

impl StoreReader {
    /// Opens a data file for reading.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let path = absolute_path(path);
        let file = File::open(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                let listing = list_parent(&path);
                StorageError::NotFound { path: path.clone(), listing }
            } else {
                StorageError::io(&path, "open", e)
            }
        })?;

        Ok(Self {
            path,
            reader: BufReader::new(file),
        })
    }

    /// Returns the absolute path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every row into a fresh store for `schema`.
    ///
    /// Ids are assigned from 1 in row order; skipped rows consume no id. Any
    /// id column in the file is ignored.
    pub fn read_into(mut self, schema: Schema) -> StorageResult<(Store, LoadReport)> {
        let codec = RowCodec::new(&schema);
        let mut line_no = 0usize;
        let mut header: Option<HeaderMap> = None;
        let mut values_rows = Vec::new();
        let mut report = LoadReport {
            path: self.path.clone(),
            data_rows: 0,
            loaded: 0,
            skipped: Vec::new(),
        };

        while let Some(line) = self.next_line(&mut line_no)? {
            let line = if line_no == 1 { line.trim_start_matches(BOM) } else { line.as_str() };
            if line.trim().is_empty() {
                continue;
            }

            let columns = match &header {
                Some(columns) => columns,
                None => {
                    let checked = codec
                        .decode_header(line)
                        .map_err(|e| StorageError::schema(&self.path, e))?;
                    header = Some(checked);
                    continue;
                }
            };

            report.data_rows += 1;
            match codec.decode_line(columns, line) {
                Ok(values) => values_rows.push(values),
                Err(error) => {
                    let line_str = line_no.to_string();
                    let reason = error.to_string();
                    log_event_with_fields(
                        Event::RowSkipped,
                        &[
                            ("line", line_str.as_str()),
                            ("code", error.code()),
                            ("reason", reason.as_str()),
                        ],
                    );
                    report.skipped.push(RowDiagnostic { line: line_no, error });
                }
            }
        }

        if header.is_none() {
            return Err(StorageError::schema(&self.path, SchemaError::MissingHeader));
        }

        let mut store = Store::new(schema);
        for values in values_rows {
            store.push_validated(values);
        }
        report.loaded = store.len();
        Ok((store, report))
    }

    /// Reads the next physical line without its terminator.
    fn next_line(&mut self, line_no: &mut usize) -> StorageResult<Option<String>> {
        let mut buf = Vec::new();
        let read = self
            .reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| StorageError::io(&self.path, "read", e))?;
        if read == 0 {
            return Ok(None);
        }
        *line_no += 1;

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }

        String::from_utf8(buf).map(Some).map_err(|_| StorageError::Encoding {
            path: self.path.clone(),
            line: *line_no,
        })
    }
}

/// Loads a store from `path`, logging start and outcome.
pub fn load(path: &Path, schema: Schema) -> StorageResult<(Store, LoadReport)> {
    let display = path.display().to_string();
    let scope = ObservationScope::new(
        Event::LoadStart,
        Event::LoadComplete,
        Event::LoadFailed,
        &[("path", display.as_str()), ("schema", schema.name.as_str())],
    );

    let result = StoreReader::open(path).and_then(|reader| reader.read_into(schema));
    match &result {
        Ok((_, report)) => {
            let loaded = report.loaded.to_string();
            let skipped = report.skipped.len().to_string();
            let fields = [("loaded", loaded.as_str()), ("skipped", skipped.as_str())];
            match report.outcome() {
                LoadOutcome::Loaded(_) => scope.complete(&fields),
                LoadOutcome::NoDataRows | LoadOutcome::AllRowsRejected(_) => {
                    scope.complete_as(Event::LoadEmpty, &fields)
                }
            }
        }
        Err(e) => scope.fail(&e.to_string()),
    }
    result
}

fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

fn list_parent(path: &Path) -> Option<Vec<String>> {
    let parent = path.parent()?;
    let entries = fs::read_dir(parent).ok()?;
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Some(names)
}
