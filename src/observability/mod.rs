//! Observability subsystem for tabstore
//!
//! Provides:
//! - Structured logging (JSON lines on stderr)
//! - A closed set of typed events
//! - Timed scopes around loads and saves
//!
//! Observability is read-only: nothing here changes what an operation does,
//! and a failed log write never fails the operation.

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::{ObservationScope, Timer};

/// Log an event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
