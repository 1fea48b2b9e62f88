//! Saving a store to a delimited-text file
//!
//! A save fully replaces the target: header row first (id column included),
//! then one row per record in current store order. Writes are buffered,
//! flushed and fsynced before the save reports success.
//!
//! A save is not transactional. After a failure the target's contents are
//! undefined.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::observability::{log_event_with_fields, Event, Timer};
use crate::store::Store;

use super::codec::RowCodec;
use super::csv::join_fields;
use super::errors::{StorageError, StorageResult};

/// Buffered writer over a freshly truncated data file.
pub struct StoreWriter {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl StoreWriter {
    /// Creates or truncates `path`, creating parent directories if needed.
    pub fn create(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| StorageError::io(parent, "create directory", e))?;
            }
        }

        let file = File::create(path).map_err(|e| StorageError::io(path, "create", e))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the store, flushes and fsyncs. Returns the record count.
    pub fn write_store(mut self, store: &Store) -> StorageResult<usize> {
        let written =
            write_to(store, &mut self.writer).map_err(|e| StorageError::io(&self.path, "write", e))?;

        let file = self
            .writer
            .into_inner()
            .map_err(|e| StorageError::io(&self.path, "flush", e.into_error()))?;
        file.sync_all()
            .map_err(|e| StorageError::io(&self.path, "sync", e))?;
        Ok(written)
    }
}

/// Writes header and rows to any writer. Returns the record count.
pub fn write_to<W: Write>(store: &Store, out: &mut W) -> io::Result<usize> {
    let codec = RowCodec::new(store.schema());
    writeln!(out, "{}", join_fields(codec.encode_header(), codec.dialect()))?;
    for record in store.records() {
        writeln!(out, "{}", codec.encode_line(record))?;
    }
    Ok(store.len())
}

/// Saves `store` to `path`, replacing any existing contents.
pub fn save(store: &Store, path: &Path) -> StorageResult<usize> {
    let timer = Timer::new();
    let display = path.display().to_string();

    let result = StoreWriter::create(path).and_then(|writer| writer.write_store(store));
    match &result {
        Ok(count) => {
            let records = count.to_string();
            log_event_with_fields(
                Event::SaveComplete,
                &[
                    ("path", display.as_str()),
                    ("records", records.as_str()),
                    ("duration_ms", timer.elapsed_ms().as_str()),
                ],
            );
        }
        Err(e) => {
            let reason = e.to_string();
            log_event_with_fields(
                Event::SaveFailed,
                &[("path", display.as_str()), ("reason", reason.as_str())],
            );
        }
    }
    result
}
