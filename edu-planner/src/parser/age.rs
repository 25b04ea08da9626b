//! Age range resolution

use super::tables::{
    AGE_CATEGORIES, AGE_RANGE_RE, AGE_SINGLE_RE, DEFAULT_AGE_MAX, DEFAULT_AGE_MIN,
};
use super::{ParseLog, Resolved};
use crate::text::{as_count, contains_any};
use crate::types::{AgeGroup, AgeRange};
use serde_json::{Map, Value};

/// Structured `age_group{min,max}` > free text > default 10-15
pub(super) fn resolve(raw: &Map<String, Value>, log: &mut ParseLog) -> Resolved<(AgeGroup, AgeRange)> {
    let mut text = String::new();

    match raw.get("age_group") {
        Some(Value::Object(obj)) => {
            let min = bound(obj, "min", DEFAULT_AGE_MIN, log);
            let max = bound(obj, "max", DEFAULT_AGE_MAX, log);
            let range = repaired(min, max);
            if (range.min, range.max) != (min, max) {
                log.malformed(
                    "age_group",
                    format!("range {}-{} adjusted to {}-{}", min, max, range.min, range.max),
                );
            }
            return Resolved::explicit((AgeGroup::from_range(range), range));
        }
        Some(Value::String(s)) => {
            text.push_str(s);
            text.push(' ');
        }
        Some(other) => log.malformed_type("age_group", "object with min/max", other),
        None => {}
    }

    for key in ["audience", "context"] {
        if let Some(s) = raw.get(key).and_then(Value::as_str) {
            text.push_str(s);
            text.push(' ');
        }
    }

    if let Some(found) = from_text(&text) {
        return Resolved::inferred(found);
    }

    Resolved::defaulted((
        AgeGroup::MiddleSchool,
        AgeRange {
            min: DEFAULT_AGE_MIN,
            max: DEFAULT_AGE_MAX,
        },
    ))
}

/// Order swapped bounds and widen an empty range to one year
fn repaired(a: u32, b: u32) -> AgeRange {
    let range = AgeRange::new(a, b);
    if range.min < range.max {
        return range;
    }
    match range.min.checked_add(1) {
        Some(max) => AgeRange { min: range.min, max },
        None => AgeRange { min: range.min - 1, max: range.min },
    }
}

fn bound(obj: &Map<String, Value>, key: &str, default: u32, log: &mut ParseLog) -> u32 {
    match obj.get(key) {
        None => default,
        Some(v) => as_count(v).unwrap_or_else(|| {
            log.malformed_type(&format!("age_group.{}", key), "whole number", v);
            default
        }),
    }
}

/// Explicit range, then single age, then school-stage keywords
pub(super) fn from_text(text: &str) -> Option<(AgeGroup, AgeRange)> {
    if let Some(caps) = AGE_RANGE_RE.captures(text) {
        let a = caps[1].parse::<u32>().ok();
        let b = caps[2].parse::<u32>().ok();
        if let (Some(a), Some(b)) = (a, b) {
            if a != b {
                let range = AgeRange::new(a, b);
                return Some((AgeGroup::from_range(range), range));
            }
            if let Some(found) = single_age(a) {
                return Some(found);
            }
        }
    }

    if let Some(caps) = AGE_SINGLE_RE.captures(text) {
        if let Some(found) = caps[1].parse::<u32>().ok().and_then(single_age) {
            return Some(found);
        }
    }

    AGE_CATEGORIES
        .iter()
        .find(|(keywords, ..)| contains_any(text, keywords))
        .map(|(_, group, min, max)| (*group, AgeRange { min: *min, max: *max }))
}

/// "N岁" covers the year from N to N+1
fn single_age(age: u32) -> Option<(AgeGroup, AgeRange)> {
    let range = AgeRange {
        min: age,
        max: age.checked_add(1)?,
    };
    Some((AgeGroup::from_range(range), range))
}
