//! Single-field constraints and their nearest-match logic.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::field::Field;
use crate::spec::RuleSpec;

/// Search direction for nearest-match queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

/// One admissible sub-range of a calendar field.
///
/// Built from a [`RuleSpec`] triple by [`FieldRule::from_spec`], which
/// resolves missing stepping anchors and bounds against the field, so every
/// variant is fully determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRule {
    /// Matches every value of the field.
    Always,
    /// Matches exactly one value.
    Point(i32),
    /// Matches every value in `begin..=end`.
    Range { begin: i32, end: i32 },
    /// Matches `begin`, `begin + step`, ... up to `end`.
    Stepped { begin: i32, end: i32, step: i32 },
}

impl FieldRule {
    /// Convert a `(begin, end, step)` triple into a rule for `field`.
    ///
    /// A stepped rule without `begin` is anchored at the field's first value;
    /// without `end` it runs to the field's step limit.
    ///
    /// # Errors
    /// Returns [`ScheduleError::InvalidRule`] for a non-positive step, an
    /// `end` without a `begin`, a value outside the field's domain, or an
    /// open-ended step anchored past the field's step limit.
    /// `begin > end` is left to [`crate::IntervalTree::add`].
    pub fn from_spec(field: Field, spec: &RuleSpec) -> Result<Self> {
        let invalid = |reason: String| ScheduleError::InvalidRule { field, reason };

        for value in [spec.begin, spec.end].into_iter().flatten() {
            if !field.contains(value) {
                return Err(invalid(format!("value {} is outside the field domain", value)));
            }
        }

        match (spec.begin, spec.end, spec.step) {
            (None, None, None) => Ok(FieldRule::Always),
            (Some(value), None, None) => Ok(FieldRule::Point(value)),
            (Some(begin), Some(end), None) => Ok(FieldRule::Range { begin, end }),
            (None, Some(end), None) => Err(invalid(format!("end {} given without a begin", end))),
            (_, _, Some(step)) if step <= 0 => {
                Err(invalid(format!("step must be positive, got {}", step)))
            }
            (None, Some(end), Some(_)) => {
                Err(invalid(format!("end {} given without a begin", end)))
            }
            (Some(begin), None, Some(_)) if begin > field.step_limit() => Err(invalid(format!(
                "cannot step from {}, the last steppable value is {}",
                begin,
                field.step_limit()
            ))),
            (begin, end, Some(step)) => Ok(FieldRule::Stepped {
                begin: begin.unwrap_or_else(|| field.first_value()),
                end: end.unwrap_or_else(|| field.step_limit()),
                step,
            }),
        }
    }

    /// The `[from, to]` key this rule is indexed under in `field`'s tree.
    pub fn span(&self, field: Field) -> (i32, i32) {
        match *self {
            FieldRule::Always => (field.first_value(), field.last_value()),
            FieldRule::Point(value) => (value, value),
            FieldRule::Range { begin, end } | FieldRule::Stepped { begin, end, .. } => {
                (begin, end)
            }
        }
    }

    /// Nearest admissible value to `candidate` in `direction`, or `None` when
    /// the rule has nothing left on that side.
    ///
    /// A matching `candidate` is returned unchanged. Stepped rules never
    /// return a value below `begin` or above `end`.
    pub fn next_match(&self, candidate: i32, direction: Direction) -> Option<i32> {
        match *self {
            FieldRule::Always => Some(candidate),
            FieldRule::Point(value) => bounded(candidate, value, value, direction),
            FieldRule::Range { begin, end } => bounded(candidate, begin, end, direction),
            FieldRule::Stepped { begin, end, step } => match direction {
                Direction::Forward => {
                    if candidate > end {
                        return None;
                    }
                    let from = candidate.max(begin);
                    let rem = (from - begin) % step;
                    let aligned = if rem == 0 { from } else { from + (step - rem) };
                    (aligned <= end).then_some(aligned)
                }
                Direction::Backward => {
                    if candidate < begin {
                        return None;
                    }
                    let from = candidate.min(end);
                    Some(from - (from - begin) % step)
                }
            },
        }
    }
}

fn bounded(candidate: i32, begin: i32, end: i32, direction: Direction) -> Option<i32> {
    match direction {
        Direction::Forward => (candidate <= end).then(|| candidate.max(begin)),
        Direction::Backward => (candidate >= begin).then(|| candidate.min(end)),
    }
}

impl fmt::Display for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRule::Always => f.write_str("*"),
            FieldRule::Point(value) => write!(f, "{}", value),
            FieldRule::Range { begin, end } => write!(f, "{}-{}", begin, end),
            FieldRule::Stepped { begin, end, step } => write!(f, "{}-{}/{}", begin, end, step),
        }
    }
}
