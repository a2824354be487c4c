//! Start/end timestamp pairs for a single API invocation

use serde::Serialize;

/// A range defined by start and end timestamps, in microseconds.
///
/// Both fields default to 0 and are set independently as events arrive,
/// so `end >= start` only holds once both phases have been recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Range {
    pub start: i64,
    pub end: i64,
}

impl Range {
    /// Create a range with both timestamps set
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Set the start time
    pub fn set_start(&mut self, start: i64) {
        self.start = start;
    }

    /// Set the end time
    pub fn set_end(&mut self, end: i64) {
        self.end = end;
    }

    /// Shift both timestamps by `-value`
    pub fn subtract(&mut self, value: i64) {
        self.start -= value;
        self.end -= value;
    }

    /// `end - start`; negative while only the start has been recorded
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }

    /// Return `(start, duration)`
    pub fn get_range(&self) -> (i64, i64) {
        (self.start, self.duration())
    }
}
