//! Search window configuration.

use serde::{Deserialize, Serialize};

/// Inclusive year window every search stays within.
///
/// A search that would need a year outside the window fails with
/// [`crate::ScheduleError::OutOfRange`]. This also bounds the work done for
/// schedules that can never match (e.g. February 30th).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    pub min_year: i32,
    pub max_year: i32,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            min_year: 1,
            max_year: 9999,
        }
    }
}

impl SearchLimits {
    pub fn new(min_year: i32, max_year: i32) -> Self {
        Self { min_year, max_year }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }
}
