//! Schedule text → [`ScheduleSpec`].
//!
//! Accepted layouts (whitespace separated):
//!
//! - `yyyy.MM.dd w HH:mm:ss.fff` / `yyyy.MM.dd w HH:mm:ss`
//! - `yyyy.MM.dd HH:mm:ss.fff` / `yyyy.MM.dd HH:mm:ss`
//! - `HH:mm:ss.fff` / `HH:mm:ss`
//!
//! A missing date means `*.*.*`, a missing weekday means `*`, and missing
//! milliseconds mean `0`. Every component is a comma-separated list of `*`,
//! `n` or `n-m`, each optionally followed by `/step`. Day `32` stands for the
//! last day of the month; weekday `0` is Sunday.
//!
//! ```rust
//! use schedule_engine::{parse, RuleSpec};
//!
//! let spec = parse("*.9.*/2 1-5 10:00:00.000").unwrap();
//! assert_eq!(spec.months, vec![RuleSpec::point(9)]);
//! assert_eq!(spec.days, vec![RuleSpec::stepped(None, None, 2)]);
//! assert_eq!(spec.weekdays, vec![RuleSpec::range(1, 5)]);
//! ```

use crate::error::{Result, ScheduleError};
use crate::field::Field;
use crate::spec::{RuleSpec, ScheduleSpec};

/// Years accepted by the grammar.
const MIN_YEAR: i32 = 2000;
const MAX_YEAR: i32 = 2100;

/// A slice of the input together with its byte offset, for error positions.
#[derive(Debug, Clone, Copy)]
struct Span<'a> {
    offset: usize,
    text: &'a str,
}

impl<'a> Span<'a> {
    fn split(self, separator: char) -> impl Iterator<Item = Span<'a>> {
        let mut offset = self.offset;
        self.text.split(separator).map(move |text| {
            let part = Span { offset, text };
            offset += text.len() + separator.len_utf8();
            part
        })
    }

    fn split_once(self, separator: char) -> Option<(Span<'a>, Span<'a>)> {
        let (head, tail) = self.text.split_once(separator)?;
        Some((
            Span {
                offset: self.offset,
                text: head,
            },
            Span {
                offset: self.offset + head.len() + separator.len_utf8(),
                text: tail,
            },
        ))
    }
}

fn error(position: usize, message: impl Into<String>) -> ScheduleError {
    ScheduleError::Parse {
        position,
        message: message.into(),
    }
}

/// Parse schedule text into per-field rule lists.
///
/// # Errors
/// Returns [`ScheduleError::Parse`] with the byte offset of the first
/// offending token.
pub fn parse(text: &str) -> Result<ScheduleSpec> {
    let tokens = tokens(text);
    let (date, weekday, time) = match tokens.as_slice() {
        [] => return Err(error(0, "empty schedule")),
        [time] => (None, None, *time),
        [date, time] => (Some(*date), None, *time),
        [date, weekday, time] => (Some(*date), Some(*weekday), *time),
        [_, _, _, extra, ..] => return Err(error(extra.offset, "unexpected trailing input")),
    };

    let mut spec = ScheduleSpec::default();

    match date {
        Some(date) => {
            let [year, month, day] = components::<3>(date, '.', "date")?;
            spec.years = parse_list(Field::Year, year)?;
            spec.months = parse_list(Field::Month, month)?;
            spec.days = parse_list(Field::Day, day)?;
        }
        None => {
            spec.years = vec![RuleSpec::always()];
            spec.months = vec![RuleSpec::always()];
            spec.days = vec![RuleSpec::always()];
        }
    }

    spec.weekdays = match weekday {
        Some(weekday) => parse_list(Field::DayOfWeek, weekday)?,
        None => vec![RuleSpec::always()],
    };

    let [hour, minute, rest] = components::<3>(time, ':', "time")?;
    spec.hours = parse_list(Field::Hour, hour)?;
    spec.minutes = parse_list(Field::Minute, minute)?;
    match rest.split_once('.') {
        Some((second, millis)) => {
            spec.seconds = parse_list(Field::Second, second)?;
            spec.milliseconds = parse_list(Field::Millisecond, millis)?;
        }
        None => {
            spec.seconds = parse_list(Field::Second, rest)?;
            spec.milliseconds = vec![RuleSpec::point(0)];
        }
    }

    Ok(spec)
}

/// Split on ASCII whitespace, keeping byte offsets.
fn tokens(text: &str) -> Vec<Span<'_>> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                out.push(Span {
                    offset: s,
                    text: &text[s..i],
                });
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push(Span {
            offset: s,
            text: &text[s..],
        });
    }
    out
}

fn components<'a, const N: usize>(
    span: Span<'a>,
    separator: char,
    what: &str,
) -> Result<[Span<'a>; N]> {
    let parts: Vec<Span<'a>> = span.split(separator).collect();
    let count = parts.len();
    parts.try_into().map_err(|_| {
        error(
            span.offset,
            format!(
                "{} needs {} '{}'-separated components, found {}",
                what, N, separator, count
            ),
        )
    })
}

fn parse_list(field: Field, span: Span<'_>) -> Result<Vec<RuleSpec>> {
    span.split(',').map(|item| parse_item(field, item)).collect()
}

fn parse_item(field: Field, item: Span<'_>) -> Result<RuleSpec> {
    if item.text.is_empty() {
        return Err(error(item.offset, format!("empty {} item", field)));
    }

    let (range, step) = match item.split_once('/') {
        Some((range, step)) => (range, Some(parse_step(field, step)?)),
        None => (item, None),
    };

    let (begin, end) = if range.text == "*" {
        (None, None)
    } else if let Some((low, high)) = range.split_once('-') {
        let low_value = parse_number(field, low)?;
        let high_value = parse_number(field, high)?;
        if low_value > high_value {
            return Err(error(
                range.offset,
                format!("{} range {} is reversed", field, range.text),
            ));
        }
        (Some(low_value), Some(high_value))
    } else {
        (Some(parse_number(field, range)?), None)
    };

    Ok(RuleSpec { begin, end, step })
}

fn parse_step(field: Field, span: Span<'_>) -> Result<i32> {
    let step = parse_digits(span)?;
    if step == 0 {
        return Err(error(span.offset, format!("{} step must be positive", field)));
    }
    Ok(step)
}

fn parse_number(field: Field, span: Span<'_>) -> Result<i32> {
    let value = parse_digits(span)?;
    let (low, high) = match field {
        Field::Year => (MIN_YEAR, MAX_YEAR),
        other => (other.first_value(), other.last_value()),
    };
    if !(low..=high).contains(&value) {
        return Err(error(
            span.offset,
            format!("{} {} is outside {}-{}", field, value, low, high),
        ));
    }
    Ok(value)
}

fn parse_digits(span: Span<'_>) -> Result<i32> {
    if span.text.is_empty() || !span.text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(error(
            span.offset,
            format!("expected a number, found '{}'", span.text),
        ));
    }
    span.text
        .parse()
        .map_err(|_| error(span.offset, format!("number '{}' is too large", span.text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_keep_offsets() {
        let t = tokens("  ab  c\td ");
        let got: Vec<(usize, &str)> = t.iter().map(|s| (s.offset, s.text)).collect();
        assert_eq!(got, vec![(2, "ab"), (6, "c"), (8, "d")]);
    }

    #[test]
    fn split_tracks_offsets() {
        let span = Span {
            offset: 10,
            text: "1,22,3",
        };
        let got: Vec<usize> = span.split(',').map(|s| s.offset).collect();
        assert_eq!(got, vec![10, 12, 15]);
    }

    #[test]
    fn wrong_component_count_reports_token_start() {
        let err = parse("1.2 10:00:00").unwrap_err();
        assert_eq!(
            err,
            ScheduleError::Parse {
                position: 0,
                message: "date needs 3 '.'-separated components, found 2".to_string(),
            }
        );
    }
}
