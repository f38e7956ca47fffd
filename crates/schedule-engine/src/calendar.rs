//! Civil-calendar arithmetic on naive timestamps, at millisecond resolution.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, TimeDelta, Timelike};

use crate::field::Field;

/// A span of calendar time that timestamps can be truncated to or moved by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Unit {
    Year,
    Month,
    /// Sunday through Saturday.
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
}

/// The unit a field moves in, and the unit it carries into on overflow.
pub(crate) fn units(field: Field) -> (Unit, Option<Unit>) {
    match field {
        Field::Year => (Unit::Year, None),
        Field::Month => (Unit::Month, Some(Unit::Year)),
        Field::Day => (Unit::Day, Some(Unit::Month)),
        Field::DayOfWeek => (Unit::Day, Some(Unit::Week)),
        Field::Hour => (Unit::Hour, Some(Unit::Day)),
        Field::Minute => (Unit::Minute, Some(Unit::Hour)),
        Field::Second => (Unit::Second, Some(Unit::Minute)),
        Field::Millisecond => (Unit::Millisecond, Some(Unit::Second)),
    }
}

/// Current value of `field` in `t`. Weekdays count from Sunday = 0.
pub(crate) fn value_of(field: Field, t: NaiveDateTime) -> i32 {
    match field {
        Field::Year => t.year(),
        Field::Month => t.month() as i32,
        Field::Day => t.day() as i32,
        Field::DayOfWeek => t.weekday().num_days_from_sunday() as i32,
        Field::Hour => t.hour() as i32,
        Field::Minute => t.minute() as i32,
        Field::Second => t.second() as i32,
        Field::Millisecond => (t.nanosecond() / 1_000_000).min(999) as i32,
    }
}

/// Drop sub-millisecond precision. Leap-second nanoseconds collapse into
/// the last millisecond of the second.
pub fn truncate_to_millis(t: NaiveDateTime) -> NaiveDateTime {
    let millis = (t.nanosecond() / 1_000_000).min(999);
    t.with_nanosecond(millis * 1_000_000).unwrap_or(t)
}

/// Number of days in `t`'s month.
pub(crate) fn days_in_month(t: NaiveDateTime) -> i32 {
    match t.month() {
        2 if NaiveDate::from_ymd_opt(t.year(), 2, 29).is_some() => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// First millisecond of the `unit` containing `t`.
pub(crate) fn start_of(t: NaiveDateTime, unit: Unit) -> Option<NaiveDateTime> {
    let date = t.date();
    match unit {
        Unit::Year => NaiveDate::from_ymd_opt(t.year(), 1, 1)?.and_hms_opt(0, 0, 0),
        Unit::Month => NaiveDate::from_ymd_opt(t.year(), t.month(), 1)?.and_hms_opt(0, 0, 0),
        Unit::Week => {
            let back = i64::from(t.weekday().num_days_from_sunday());
            date.checked_sub_signed(TimeDelta::try_days(back)?)?
                .and_hms_opt(0, 0, 0)
        }
        Unit::Day => date.and_hms_opt(0, 0, 0),
        Unit::Hour => date.and_hms_opt(t.hour(), 0, 0),
        Unit::Minute => date.and_hms_opt(t.hour(), t.minute(), 0),
        Unit::Second => date.and_hms_opt(t.hour(), t.minute(), t.second()),
        Unit::Millisecond => Some(truncate_to_millis(t)),
    }
}

/// Last millisecond of the `unit` containing `t`.
pub(crate) fn end_of(t: NaiveDateTime, unit: Unit) -> Option<NaiveDateTime> {
    let next = add(start_of(t, unit)?, unit, 1)?;
    next.checked_sub_signed(TimeDelta::try_milliseconds(1)?)
}

/// First millisecond of the `unit` after the one containing `t`.
pub(crate) fn start_of_next(t: NaiveDateTime, unit: Unit) -> Option<NaiveDateTime> {
    add(start_of(t, unit)?, unit, 1)
}

/// Last millisecond of the `unit` before the one containing `t`.
pub(crate) fn end_of_previous(t: NaiveDateTime, unit: Unit) -> Option<NaiveDateTime> {
    start_of(t, unit)?.checked_sub_signed(TimeDelta::try_milliseconds(1)?)
}

/// Move `t` by `n` whole units. Month-based units never clamp days when
/// `t` is the first of a month.
pub(crate) fn add(t: NaiveDateTime, unit: Unit, n: i64) -> Option<NaiveDateTime> {
    let delta = match unit {
        Unit::Year => return add_months(t, n.checked_mul(12)?),
        Unit::Month => return add_months(t, n),
        Unit::Week => TimeDelta::try_weeks(n)?,
        Unit::Day => TimeDelta::try_days(n)?,
        Unit::Hour => TimeDelta::try_hours(n)?,
        Unit::Minute => TimeDelta::try_minutes(n)?,
        Unit::Second => TimeDelta::try_seconds(n)?,
        Unit::Millisecond => TimeDelta::try_milliseconds(n)?,
    };
    t.checked_add_signed(delta)
}

fn add_months(t: NaiveDateTime, n: i64) -> Option<NaiveDateTime> {
    let months = Months::new(u32::try_from(n.unsigned_abs()).ok()?);
    if n >= 0 {
        t.checked_add_months(months)
    } else {
        t.checked_sub_months(months)
    }
}
