//! Calendar fields, ordered from most to least significant.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One calendar granularity constrained by a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Year,
    Month,
    Day,
    DayOfWeek,
    Hour,
    Minute,
    Second,
    Millisecond,
}

/// Day-of-month value meaning "the last day of the current month".
pub const LAST_DAY_OF_MONTH: i32 = 32;

impl Field {
    /// All fields in significance order (year first).
    pub const ALL: [Field; 8] = [
        Field::Year,
        Field::Month,
        Field::Day,
        Field::DayOfWeek,
        Field::Hour,
        Field::Minute,
        Field::Second,
        Field::Millisecond,
    ];

    /// Position of the field in [`Field::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The first admissible value, used as the stepping anchor when a rule
    /// has no explicit begin.
    pub fn first_value(self) -> i32 {
        match self {
            Field::Month | Field::Day => 1,
            _ => 0,
        }
    }

    /// The last admissible value. Day-of-month includes the sentinel 32.
    pub fn last_value(self) -> i32 {
        match self {
            Field::Year => i32::MAX,
            Field::Month => 12,
            Field::Day => LAST_DAY_OF_MONTH,
            Field::DayOfWeek => 6,
            Field::Hour => 23,
            Field::Minute | Field::Second => 59,
            Field::Millisecond => 999,
        }
    }

    /// Upper bound for stepped rules without an explicit end. The day
    /// sentinel is never a stepping target.
    pub fn step_limit(self) -> i32 {
        match self {
            Field::Day => 31,
            other => other.last_value(),
        }
    }

    /// Whether `value` lies in the field's domain. Years are unbounded here;
    /// the search window is enforced by [`crate::SearchLimits`].
    pub fn contains(self, value: i32) -> bool {
        self == Field::Year || (self.first_value()..=self.last_value()).contains(&value)
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::Month => "month",
            Field::Day => "day",
            Field::DayOfWeek => "day-of-week",
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::Second => "second",
            Field::Millisecond => "millisecond",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
