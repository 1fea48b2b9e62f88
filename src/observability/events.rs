//! Observable store events
//!
//! Every log line names one of these events, so the set of event names a
//! session can emit is closed and greppable.

use std::fmt;

use super::logger::Severity;

/// Observable events of a store session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file read and validated
    ConfigLoaded,
    /// Schema file read and validated
    SchemaLoaded,

    // Persistence
    /// Load from a delimited-text file begins
    LoadStart,
    /// A data row failed to decode and was skipped
    RowSkipped,
    /// Load finished with at least one record
    LoadComplete,
    /// Load finished without usable records
    LoadEmpty,
    /// Load aborted (missing file, bad header, I/O)
    LoadFailed,
    /// Store written to a file
    SaveComplete,
    /// Save aborted; the target file is in an undefined state
    SaveFailed,

    // Mutation
    /// Record appended with a freshly issued id
    RecordAdded,
    /// Record fields replaced
    RecordUpdated,
    /// A single field of an update was rejected and kept its old value
    UpdateFieldRejected,
    /// Record removed
    RecordDeleted,
    /// Records reordered in place
    StoreSorted,
}

impl Event {
    /// Returns the event name as it appears in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::LoadStart => "LOAD_START",
            Event::RowSkipped => "ROW_SKIPPED",
            Event::LoadComplete => "LOAD_COMPLETE",
            Event::LoadEmpty => "LOAD_EMPTY",
            Event::LoadFailed => "LOAD_FAILED",
            Event::SaveComplete => "SAVE_COMPLETE",
            Event::SaveFailed => "SAVE_FAILED",
            Event::RecordAdded => "RECORD_ADDED",
            Event::RecordUpdated => "RECORD_UPDATED",
            Event::UpdateFieldRejected => "UPDATE_FIELD_REJECTED",
            Event::RecordDeleted => "RECORD_DELETED",
            Event::StoreSorted => "STORE_SORTED",
        }
    }

    /// Returns the severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::LoadStart => Severity::Trace,
            Event::RowSkipped | Event::LoadEmpty | Event::UpdateFieldRejected => Severity::Warn,
            Event::LoadFailed | Event::SaveFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
