//! Nearest-timestamp search over eight calendar fields.
//!
//! Each field's rules live in an [`IntervalTree`] keyed by the rule's span.
//! A search walks the fields from year down to millisecond. Every field
//! either already matches, moves to its nearest admissible value (resetting
//! all less significant fields to their first value, or to their last value
//! when searching backward), or overflows and carries into the next more
//! significant unit. A carry, or a move that wrapped the field around,
//! invalidates the fields above it, so the walk restarts from the year. The
//! walk ends after a full pass in which no field moved.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use log::{debug, trace};

use crate::calendar::{self, truncate_to_millis};
use crate::error::{Result, ScheduleError};
use crate::field::{Field, LAST_DAY_OF_MONTH};
use crate::interval_tree::IntervalTree;
use crate::limits::SearchLimits;
use crate::parser::parse;
use crate::rule::{Direction, FieldRule};
use crate::spec::ScheduleSpec;

/// A compiled recurrence rule.
///
/// Immutable after construction. All trees are built eagerly, so a schedule
/// can be shared across threads and queried concurrently.
///
/// ```rust
/// use chrono::NaiveDate;
/// use schedule_engine::CalendarSchedule;
///
/// // 01:30 on the first day of every month.
/// let schedule: CalendarSchedule = "*.*.01 01:30:00".parse().unwrap();
/// let t = NaiveDate::from_ymd_opt(2026, 2, 17).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let next = schedule.nearest_event(t).unwrap();
/// assert_eq!(next, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap().and_hms_opt(1, 30, 0).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct CalendarSchedule {
    trees: [IntervalTree<i32, FieldRule>; 8],
    limits: SearchLimits,
    /// Some day rule matches the last-day-of-month sentinel.
    last_day: bool,
}

/// Result of checking one field against the current timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Adjustment {
    Stay,
    Move(i64),
    Overflow,
}

/// What the walk does after one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Keep,
    Advance(NaiveDateTime),
    Restart(NaiveDateTime),
}

impl CalendarSchedule {
    /// Compile `spec` with the default [`SearchLimits`].
    ///
    /// # Errors
    /// Returns [`ScheduleError::InvalidRule`] or
    /// [`ScheduleError::InvalidInterval`] for rules that cannot be indexed.
    pub fn from_spec(spec: &ScheduleSpec) -> Result<Self> {
        Self::with_limits(spec, SearchLimits::default())
    }

    /// Compile `spec`, searching only within `limits`.
    ///
    /// A field with no rules places no constraint on its values.
    pub fn with_limits(spec: &ScheduleSpec, limits: SearchLimits) -> Result<Self> {
        if limits.min_year > limits.max_year {
            return Err(ScheduleError::InvalidRule {
                field: Field::Year,
                reason: format!(
                    "search window {}..={} is empty",
                    limits.min_year, limits.max_year
                ),
            });
        }

        let mut trees: [IntervalTree<i32, FieldRule>; 8] = Default::default();
        for field in Field::ALL {
            let tree = &mut trees[field.index()];
            let rules = spec.rules(field);
            if rules.is_empty() {
                let (from, to) = FieldRule::Always.span(field);
                tree.add(from, to, FieldRule::Always)?;
            }
            for rule in rules {
                let rule = FieldRule::from_spec(field, rule)?;
                let (from, to) = rule.span(field);
                tree.add(from, to, rule)?;
            }
            tree.rebuild();
        }

        debug!(
            "Built calendar schedule with {} rules, years {}..={}",
            trees.iter().map(IntervalTree::len).sum::<usize>(),
            limits.min_year,
            limits.max_year
        );

        let last_day = trees[Field::Day.index()]
            .query(&LAST_DAY_OF_MONTH)
            .into_iter()
            .any(|rule| {
                rule.next_match(LAST_DAY_OF_MONTH, Direction::Forward) == Some(LAST_DAY_OF_MONTH)
            });

        Ok(Self {
            trees,
            limits,
            last_day,
        })
    }

    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    /// The rule index for `field`.
    pub fn tree(&self, field: Field) -> &IntervalTree<i32, FieldRule> {
        &self.trees[field.index()]
    }

    /// Earliest matching timestamp at or after `t`.
    pub fn nearest_event(&self, t: NaiveDateTime) -> Result<NaiveDateTime> {
        self.closest(t, Direction::Forward)
    }

    /// Latest matching timestamp at or before `t`.
    pub fn nearest_prev_event(&self, t: NaiveDateTime) -> Result<NaiveDateTime> {
        self.closest(t, Direction::Backward)
    }

    /// Earliest matching timestamp strictly after `t`.
    pub fn next_event(&self, t: NaiveDateTime) -> Result<NaiveDateTime> {
        let t = truncate_to_millis(t);
        let shifted = t
            .checked_add_signed(TimeDelta::milliseconds(1))
            .ok_or_else(|| out_of_range(t))?;
        self.nearest_event(shifted)
    }

    /// Latest matching timestamp strictly before `t`.
    pub fn prev_event(&self, t: NaiveDateTime) -> Result<NaiveDateTime> {
        let t = truncate_to_millis(t);
        let shifted = t
            .checked_sub_signed(TimeDelta::milliseconds(1))
            .ok_or_else(|| out_of_range(t))?;
        self.nearest_prev_event(shifted)
    }

    /// Whether `t` (at millisecond precision) satisfies every field.
    pub fn matches(&self, t: NaiveDateTime) -> bool {
        let t = truncate_to_millis(t);
        self.nearest_event(t).is_ok_and(|found| found == t)
    }

    /// Successive [`CalendarSchedule::next_event`] results after `t`.
    pub fn upcoming(&self, t: NaiveDateTime) -> Occurrences<'_> {
        Occurrences::new(self, t, Direction::Forward)
    }

    /// Successive [`CalendarSchedule::prev_event`] results before `t`.
    pub fn preceding(&self, t: NaiveDateTime) -> Occurrences<'_> {
        Occurrences::new(self, t, Direction::Backward)
    }

    /// Nearest matching timestamp to `t` in `direction`, `t` included.
    ///
    /// # Errors
    /// Returns [`ScheduleError::OutOfRange`] when no admissible year exists
    /// inside the search window.
    pub fn closest(&self, t: NaiveDateTime, direction: Direction) -> Result<NaiveDateTime> {
        let start = self.enter_window(truncate_to_millis(t), direction)?;
        let mut t = start;
        let mut passes = 0usize;

        'walk: loop {
            passes += 1;
            let mut settled = true;
            for field in Field::ALL {
                match self.step_field(field, t, direction)? {
                    Step::Keep => {}
                    Step::Advance(next) => {
                        trace!("{} moved {} -> {}", field, t, next);
                        t = next;
                        settled = false;
                    }
                    Step::Restart(next) => {
                        trace!("{} carried {} -> {}, restarting", field, t, next);
                        t = next;
                        continue 'walk;
                    }
                }
            }
            if settled {
                debug!(
                    "{:?} search from {} settled on {} after {} passes",
                    direction, start, t, passes
                );
                return Ok(t);
            }
        }
    }

    fn step_field(&self, field: Field, t: NaiveDateTime, direction: Direction) -> Result<Step> {
        let value = calendar::value_of(field, t);
        let (unit, parent) = calendar::units(field);
        let adjustment = match field {
            Field::Day => self.adjust_day(t, direction),
            _ => self.adjust(field, value, direction),
        };

        let next = match adjustment {
            Adjustment::Stay => return Ok(Step::Keep),
            Adjustment::Overflow => {
                let Some(parent) = parent else {
                    return Err(out_of_range(t));
                };
                let carried = match direction {
                    Direction::Forward => calendar::start_of_next(t, parent),
                    Direction::Backward => calendar::end_of_previous(t, parent),
                };
                let carried = self.checked(carried.ok_or_else(|| out_of_range(t))?)?;
                return Ok(Step::Restart(carried));
            }
            Adjustment::Move(delta) => {
                let moved = match direction {
                    Direction::Forward => calendar::start_of(t, unit)
                        .and_then(|s| calendar::add(s, unit, delta)),
                    Direction::Backward => calendar::start_of(t, unit)
                        .and_then(|s| calendar::add(s, unit, delta))
                        .and_then(|s| calendar::end_of(s, unit)),
                };
                self.checked(moved.ok_or_else(|| out_of_range(t))?)?
            }
        };

        // Weekday moves are measured against the day of month, which is
        // what wraps when they cross into another month.
        let watched = match field {
            Field::DayOfWeek => Field::Day,
            other => other,
        };
        let before = calendar::value_of(watched, t);
        let after = calendar::value_of(watched, next);
        let wrapped = match direction {
            Direction::Forward => after < before,
            Direction::Backward => after > before,
        };

        Ok(if wrapped {
            Step::Restart(next)
        } else {
            Step::Advance(next)
        })
    }

    /// Find the nearest admissible value of `field` relative to `value`.
    fn adjust(&self, field: Field, value: i32, direction: Direction) -> Adjustment {
        let tree = self.tree(field);
        let closer = |best: Option<i32>, found: i32| {
            Some(match (best, direction) {
                (None, _) => found,
                (Some(best), Direction::Forward) => best.min(found),
                (Some(best), Direction::Backward) => best.max(found),
            })
        };

        let mut best = None;
        for rule in tree.query(&value) {
            if let Some(found) = rule.next_match(value, direction) {
                best = closer(best, found);
            }
        }

        if best != Some(value) {
            match direction {
                Direction::Forward => {
                    for rule in tree.query_forward(&value, &i32::MAX) {
                        // Ascending by lower bound: later rules cannot beat `best`.
                        let (lower, _) = rule.span(field);
                        if best.is_some_and(|best| lower >= best) {
                            break;
                        }
                        if let Some(found) = rule.next_match(value, direction) {
                            best = closer(best, found);
                        }
                    }
                }
                Direction::Backward => {
                    for rule in tree.query_backward(&i32::MIN, &value) {
                        if let Some(found) = rule.next_match(value, direction) {
                            best = closer(best, found);
                        }
                    }
                }
            }
        }

        match best {
            Some(found) if found == value => Adjustment::Stay,
            Some(found) => Adjustment::Move(i64::from(found) - i64::from(value)),
            None => Adjustment::Overflow,
        }
    }

    /// Day-of-month adjustment within `t`'s month.
    ///
    /// The last day matches when a rule admits it by number or when a rule
    /// matches the sentinel. Numeric matches past the month's length do not
    /// exist in this month.
    fn adjust_day(&self, t: NaiveDateTime, direction: Direction) -> Adjustment {
        let value = calendar::value_of(Field::Day, t);
        let last = calendar::days_in_month(t);
        if self.last_day && value == last {
            return Adjustment::Stay;
        }

        match (self.adjust(Field::Day, value, direction), direction) {
            (Adjustment::Move(delta), Direction::Forward)
                if i64::from(value) + delta <= i64::from(last) =>
            {
                Adjustment::Move(delta)
            }
            (Adjustment::Move(_) | Adjustment::Overflow, Direction::Forward) if self.last_day => {
                Adjustment::Move(i64::from(last - value))
            }
            (Adjustment::Move(_), Direction::Forward) => Adjustment::Overflow,
            (adjustment, _) => adjustment,
        }
    }

    /// Clamp the starting point into the search window, or fail if the
    /// window lies entirely behind it.
    fn enter_window(&self, t: NaiveDateTime, direction: Direction) -> Result<NaiveDateTime> {
        let year = t.year();
        let edge = match direction {
            Direction::Forward if year > self.limits.max_year => return Err(out_of_range(t)),
            Direction::Backward if year < self.limits.min_year => return Err(out_of_range(t)),
            Direction::Forward if year < self.limits.min_year => {
                NaiveDate::from_ymd_opt(self.limits.min_year, 1, 1)
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            }
            Direction::Backward if year > self.limits.max_year => {
                NaiveDate::from_ymd_opt(self.limits.max_year, 12, 31)
                    .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
            }
            _ => return Ok(t),
        };
        edge.ok_or_else(|| out_of_range(t))
    }

    fn checked(&self, t: NaiveDateTime) -> Result<NaiveDateTime> {
        if self.limits.contains(t.year()) {
            Ok(t)
        } else {
            Err(out_of_range(t))
        }
    }
}

impl FromStr for CalendarSchedule {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_spec(&parse(s)?)
    }
}

fn out_of_range(t: NaiveDateTime) -> ScheduleError {
    ScheduleError::OutOfRange { year: t.year() }
}

/// Iterator over successive matches in one direction.
///
/// Ends at the first search that fails (typically the edge of the
/// [`SearchLimits`] window).
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    schedule: &'a CalendarSchedule,
    cursor: Option<NaiveDateTime>,
    direction: Direction,
}

impl<'a> Occurrences<'a> {
    fn new(schedule: &'a CalendarSchedule, start: NaiveDateTime, direction: Direction) -> Self {
        Self {
            schedule,
            cursor: Some(start),
            direction,
        }
    }
}

impl Iterator for Occurrences<'_> {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<NaiveDateTime> {
        let cursor = self.cursor?;
        let found = match self.direction {
            Direction::Forward => self.schedule.next_event(cursor),
            Direction::Backward => self.schedule.prev_event(cursor),
        }
        .ok();
        self.cursor = found;
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::RuleSpec;

    fn schedule(field: Field, rules: Vec<RuleSpec>) -> CalendarSchedule {
        CalendarSchedule::from_spec(&ScheduleSpec::default().with(field, rules)).unwrap()
    }

    #[test]
    fn adjust_prefers_nearer_point_over_containing_step() {
        // 0-59/30 contains 10 but its next match is 30; the point 20 is nearer.
        let s = schedule(
            Field::Minute,
            vec![RuleSpec::stepped(Some(0), Some(59), 30), RuleSpec::point(20)],
        );
        assert_eq!(
            s.adjust(Field::Minute, 10, Direction::Forward),
            Adjustment::Move(10)
        );
    }

    #[test]
    fn adjust_backward_picks_highest_upper_bound() {
        // Descending by lower bound would visit 5-6 first; 1-20 is nearer.
        let s = schedule(
            Field::Minute,
            vec![RuleSpec::range(1, 20), RuleSpec::range(5, 6)],
        );
        assert_eq!(
            s.adjust(Field::Minute, 25, Direction::Backward),
            Adjustment::Move(-5)
        );
    }

    #[test]
    fn adjust_overflows_past_last_rule() {
        let s = schedule(Field::Hour, vec![RuleSpec::range(1, 5)]);
        assert_eq!(s.adjust(Field::Hour, 6, Direction::Forward), Adjustment::Overflow);
        assert_eq!(s.adjust(Field::Hour, 0, Direction::Backward), Adjustment::Overflow);
        assert_eq!(s.adjust(Field::Hour, 3, Direction::Forward), Adjustment::Stay);
    }

    #[test]
    fn empty_field_is_unconstrained() {
        let s = CalendarSchedule::from_spec(&ScheduleSpec::default()).unwrap();
        for field in Field::ALL {
            assert_eq!(s.tree(field).len(), 1);
            assert!(s.tree(field).is_built());
        }
    }

    #[test]
    fn reversed_window_is_rejected() {
        let err = CalendarSchedule::with_limits(&ScheduleSpec::default(), SearchLimits::new(10, 5))
            .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidRule { field: Field::Year, .. }));
    }
}
