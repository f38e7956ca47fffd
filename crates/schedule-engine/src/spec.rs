//! Parsed schedule description: eight ordered rule lists, one per field.

use serde::{Deserialize, Serialize};

use crate::field::Field;

/// A raw `(begin, end, step)` triple as produced by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RuleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<i32>,
}

impl RuleSpec {
    pub fn always() -> Self {
        Self::default()
    }

    pub fn point(value: i32) -> Self {
        Self {
            begin: Some(value),
            ..Self::default()
        }
    }

    pub fn range(begin: i32, end: i32) -> Self {
        Self {
            begin: Some(begin),
            end: Some(end),
            step: None,
        }
    }

    pub fn stepped(begin: Option<i32>, end: Option<i32>, step: i32) -> Self {
        Self {
            begin,
            end,
            step: Some(step),
        }
    }
}

/// Rule lists for every field, in significance order.
///
/// An empty list places no constraint on its field, so
/// `ScheduleSpec::default()` matches every millisecond.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScheduleSpec {
    #[serde(default)]
    pub years: Vec<RuleSpec>,
    #[serde(default)]
    pub months: Vec<RuleSpec>,
    #[serde(default)]
    pub days: Vec<RuleSpec>,
    #[serde(default)]
    pub weekdays: Vec<RuleSpec>,
    #[serde(default)]
    pub hours: Vec<RuleSpec>,
    #[serde(default)]
    pub minutes: Vec<RuleSpec>,
    #[serde(default)]
    pub seconds: Vec<RuleSpec>,
    #[serde(default)]
    pub milliseconds: Vec<RuleSpec>,
}

impl ScheduleSpec {
    pub fn rules(&self, field: Field) -> &[RuleSpec] {
        match field {
            Field::Year => &self.years,
            Field::Month => &self.months,
            Field::Day => &self.days,
            Field::DayOfWeek => &self.weekdays,
            Field::Hour => &self.hours,
            Field::Minute => &self.minutes,
            Field::Second => &self.seconds,
            Field::Millisecond => &self.milliseconds,
        }
    }

    pub fn rules_mut(&mut self, field: Field) -> &mut Vec<RuleSpec> {
        match field {
            Field::Year => &mut self.years,
            Field::Month => &mut self.months,
            Field::Day => &mut self.days,
            Field::DayOfWeek => &mut self.weekdays,
            Field::Hour => &mut self.hours,
            Field::Minute => &mut self.minutes,
            Field::Second => &mut self.seconds,
            Field::Millisecond => &mut self.milliseconds,
        }
    }

    /// Replace `field`'s rules, builder style.
    pub fn with(mut self, field: Field, rules: impl IntoIterator<Item = RuleSpec>) -> Self {
        *self.rules_mut(field) = rules.into_iter().collect();
        self
    }
}
