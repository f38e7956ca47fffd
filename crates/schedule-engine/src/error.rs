//! Error types for schedule-engine operations.

use thiserror::Error;

use crate::field::Field;

/// Errors that can occur while building or searching a schedule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// An interval was inserted with `from > to`.
    #[error("Invalid interval: from {from} is greater than to {to}")]
    InvalidInterval { from: String, to: String },

    /// A rule triple that cannot be expressed as a field constraint.
    #[error("Invalid {field} rule: {reason}")]
    InvalidRule { field: Field, reason: String },

    /// Malformed schedule text. `position` is the 0-based byte offset.
    #[error("Schedule parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// No admissible year is reachable inside the search window.
    #[error("No matching timestamp within range (stopped at year {year})")]
    OutOfRange { year: i32 },
}

/// Convenience alias used throughout schedule-engine.
pub type Result<T> = std::result::Result<T, ScheduleError>;
