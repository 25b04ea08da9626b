//! Time mode and total duration resolution

use super::tables::{
    CAMP_KEYWORDS, DAY_COUNT_RE, DEFAULT_CAMP_DAYS, DEFAULT_CAMP_HOURS_PER_DAY,
    DEFAULT_WEEKLY_HOURS, DEFAULT_WEEKS, SEMESTER_KEYWORDS, SEMESTER_WEEKLY_HOURS, SEMESTER_WEEKS,
    WEEK_COUNT_RE, WORKSHOP_HOURS, WORKSHOP_KEYWORDS,
};
use super::{ParseLog, Resolved};
use crate::text::{as_count, contains_any};
use crate::types::{TimeMode, TotalDuration};
use regex::Regex;
use serde_json::{Map, Value};

/// Structured `duration{days|weeks}` > context keywords > 4 weeks × 4 h
///
/// A structured entry whose total is zero or overflows is recorded as
/// malformed and the chain continues.
pub(super) fn resolve(raw: &Map<String, Value>, log: &mut ParseLog) -> Resolved<(TimeMode, TotalDuration)> {
    match raw.get("duration") {
        Some(Value::Object(obj)) => {
            if let Some(found) = structured(obj, log) {
                return Resolved::explicit(found);
            }
        }
        Some(other) => log.malformed_type("duration", "object", other),
        None => {}
    }

    let context = raw.get("context").and_then(Value::as_str).unwrap_or("");
    if let Some(found) = from_text(context) {
        return Resolved::inferred(found);
    }

    Resolved::defaulted((
        TimeMode::Weekly,
        TotalDuration::weekly(DEFAULT_WEEKS, DEFAULT_WEEKLY_HOURS),
    ))
}

fn structured(obj: &Map<String, Value>, log: &mut ParseLog) -> Option<(TimeMode, TotalDuration)> {
    if let Some(value) = obj.get("days") {
        match as_count(value) {
            Some(days) => {
                let per_day = rate(obj, "hours_per_day", DEFAULT_CAMP_HOURS_PER_DAY, log);
                if let Some(total) = checked_total(days, per_day, "days", log) {
                    let mut duration = TotalDuration::camp(days, per_day);
                    duration.total_hours = total;
                    return Some((TimeMode::IntensiveCamp, duration));
                }
            }
            None => log.malformed_type("duration.days", "whole number", value),
        }
    }

    if let Some(value) = obj.get("weeks") {
        match as_count(value) {
            Some(weeks) => {
                let per_week = rate(obj, "hours_per_week", DEFAULT_WEEKLY_HOURS, log);
                if let Some(total) = checked_total(weeks, per_week, "weeks", log) {
                    let mut duration = TotalDuration::weekly(weeks, per_week);
                    duration.total_hours = total;
                    return Some((TimeMode::Weekly, duration));
                }
            }
            None => log.malformed_type("duration.weeks", "whole number", value),
        }
    }

    None
}

fn rate(obj: &Map<String, Value>, key: &str, default: u32, log: &mut ParseLog) -> u32 {
    match obj.get(key) {
        None => default,
        Some(v) => as_count(v).unwrap_or_else(|| {
            log.malformed_type(&format!("duration.{}", key), "whole number", v);
            default
        }),
    }
}

/// Total hours, or `None` (with a warning) when zero or out of range
fn checked_total(count: u32, per_unit: u32, field: &str, log: &mut ParseLog) -> Option<u32> {
    match count.checked_mul(per_unit) {
        Some(0) => {
            log.malformed(&format!("duration.{}", field), "yields zero teaching hours");
            None
        }
        Some(total) => Some(total),
        None => {
            log.malformed(&format!("duration.{}", field), "total hours overflow");
            None
        }
    }
}

/// Camp keywords (with optional day count), week count, semester, workshop
pub(super) fn from_text(context: &str) -> Option<(TimeMode, TotalDuration)> {
    if contains_any(context, CAMP_KEYWORDS) {
        let days = leading_count(&DAY_COUNT_RE, context)
            .filter(|d| d.checked_mul(DEFAULT_CAMP_HOURS_PER_DAY).is_some())
            .unwrap_or(DEFAULT_CAMP_DAYS);
        return Some((
            TimeMode::IntensiveCamp,
            TotalDuration::camp(days, DEFAULT_CAMP_HOURS_PER_DAY),
        ));
    }

    if let Some(weeks) = leading_count(&WEEK_COUNT_RE, context)
        .filter(|w| w.checked_mul(DEFAULT_WEEKLY_HOURS).is_some())
    {
        return Some((
            TimeMode::Weekly,
            TotalDuration::weekly(weeks, DEFAULT_WEEKLY_HOURS),
        ));
    }

    if contains_any(context, SEMESTER_KEYWORDS) {
        return Some((
            TimeMode::Semester,
            TotalDuration::weekly(SEMESTER_WEEKS, SEMESTER_WEEKLY_HOURS),
        ));
    }

    if contains_any(context, WORKSHOP_KEYWORDS) {
        return Some((TimeMode::Workshop, TotalDuration::hours(WORKSHOP_HOURS)));
    }

    None
}

/// First positive count captured by `re`
fn leading_count(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .filter(|n| *n > 0)
}
