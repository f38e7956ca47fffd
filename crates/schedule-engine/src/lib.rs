//! # schedule-engine
//!
//! Calendar recurrence engine: given independent constraints on year, month,
//! day, day-of-week, hour, minute, second and millisecond, find the nearest
//! timestamp at or after (or before) a given instant that satisfies all of
//! them.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use schedule_engine::CalendarSchedule;
//!
//! // 10:00 on odd days of September, Monday to Friday.
//! let schedule: CalendarSchedule = "*.9.*/2 1-5 10:00:00.000".parse().unwrap();
//!
//! // Saturday 2025-09-06, 08:00.
//! let t = NaiveDate::from_ymd_opt(2025, 9, 6).unwrap().and_hms_opt(8, 0, 0).unwrap();
//! let next = schedule.nearest_event(t).unwrap();
//!
//! // Tuesday 2025-09-09 is the first odd weekday after it.
//! assert_eq!(next, NaiveDate::from_ymd_opt(2025, 9, 9).unwrap().and_hms_opt(10, 0, 0).unwrap());
//! ```
//!
//! ## Modules
//!
//! - [`interval_tree`] — write-buffered centered interval tree
//! - [`interval`] — closed key interval with payload
//! - [`rule`] — per-field rules and nearest-match logic
//! - [`schedule`] — the carry-propagating nearest-timestamp search
//! - [`parser`] — schedule text → [`ScheduleSpec`]
//! - [`spec`] — parsed rule triples per field
//! - [`field`] — calendar field metadata
//! - [`limits`] — search window configuration
//! - [`error`] — Error types

mod calendar;
mod node;

pub mod error;
pub mod field;
pub mod interval;
pub mod interval_tree;
pub mod limits;
pub mod parser;
pub mod rule;
pub mod schedule;
pub mod spec;

pub use calendar::truncate_to_millis;
pub use error::ScheduleError;
pub use field::{Field, LAST_DAY_OF_MONTH};
pub use interval::RangeInterval;
pub use interval_tree::IntervalTree;
pub use limits::SearchLimits;
pub use parser::parse;
pub use rule::{Direction, FieldRule};
pub use schedule::{CalendarSchedule, Occurrences};
pub use spec::{RuleSpec, ScheduleSpec};
