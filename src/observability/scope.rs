//! ObservationScope for start/complete logging around a load or save
//!
//! - Logs the start event on creation
//! - Logs the complete event, with `duration_ms`, when completed
//! - Logs the failed event on an explicit failure or an early drop

use std::time::Instant;

use super::events::Event;
use super::logger::Logger;

/// A scope that logs a start event now and exactly one terminal event later.
///
/// ```ignore
/// let scope = ObservationScope::new(Event::LoadStart, Event::LoadComplete, Event::LoadFailed, &[("path", p)]);
/// // ... do work ...
/// scope.complete(&[("loaded", "12")]);
/// ```
pub struct ObservationScope<'a> {
    complete_event: Event,
    failed_event: Event,
    fields: Vec<(&'a str, String)>,
    timer: Timer,
    finished: bool,
}

impl<'a> ObservationScope<'a> {
    /// Opens a scope and logs `start` with the given fields.
    ///
    /// The fields are repeated on the terminal event.
    pub fn new(start: Event, complete: Event, failed: Event, fields: &[(&'a str, &str)]) -> Self {
        Logger::log(start.severity(), start.as_str(), fields);

        Self {
            complete_event: complete,
            failed_event: failed,
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            timer: Timer::new(),
            finished: false,
        }
    }

    /// Logs the complete event with extra fields.
    pub fn complete(self, extra_fields: &[(&str, &str)]) {
        let event = self.complete_event;
        self.finish(event, extra_fields);
    }

    /// Logs a different terminal event, e.g. `LOAD_EMPTY` instead of `LOAD_COMPLETE`.
    pub fn complete_as(self, event: Event, extra_fields: &[(&str, &str)]) {
        self.finish(event, extra_fields);
    }

    /// Logs the failed event with a reason.
    pub fn fail(self, reason: &str) {
        let event = self.failed_event;
        self.finish(event, &[("reason", reason)]);
    }

    /// Returns whether a terminal event has been logged
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn finish(mut self, event: Event, extra_fields: &[(&str, &str)]) {
        self.finished = true;
        let duration = self.timer.elapsed_ms();
        let mut all_fields: Vec<(&str, &str)> =
            self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        all_fields.extend(extra_fields.iter().copied());
        all_fields.push(("duration_ms", duration.as_str()));
        Logger::log(event.severity(), event.as_str(), &all_fields);
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let fields: Vec<(&str, &str)> = self
                .fields
                .iter()
                .map(|(k, v)| (*k, v.as_str()))
                .chain(std::iter::once(("reason", "scope dropped without completion")))
                .collect();
            Logger::log(self.failed_event.severity(), self.failed_event.as_str(), &fields);
        }
    }
}

/// A simple duration timer for logging elapsed time
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed milliseconds as a string
    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
