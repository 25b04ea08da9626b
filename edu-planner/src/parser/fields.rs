//! Per-field fallback chains for the remaining requirement fields

use super::tables::{
    owned, CLASS_SIZE_KEYS, DEFAULT_AUDIENCE, DEFAULT_DELIVERABLES, DEFAULT_EQUIPMENT,
    DEFAULT_OBJECTIVES, DEFAULT_TEACHING_CONTEXT, DEFAULT_TOPIC, DELIVERABLE_KEYS,
    INSTITUTION_KEYWORDS, TOPIC_DELIVERABLES,
};
use super::{ParseLog, Resolved};
use crate::text::{as_count, as_text_list, contains_all, contains_any, KeywordMatcher};
use crate::types::{BudgetLevel, InstitutionType};
use serde_json::{Map, Value};

/// First non-blank string among `keys`; mistyped values are logged and skipped
fn first_text(raw: &Map<String, Value>, keys: &[&str], log: &mut ParseLog) -> Option<String> {
    for key in keys {
        match raw.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.clone()),
            Some(Value::String(_)) | Some(Value::Null) | None => {}
            Some(other) => log.malformed_type(key, "string", other),
        }
    }
    None
}

/// First usable string list among `keys`
fn first_list(raw: &Map<String, Value>, keys: &[&str], log: &mut ParseLog) -> Option<Vec<String>> {
    for key in keys {
        let Some(value) = raw.get(*key) else {
            continue;
        };
        match as_text_list(value) {
            Some(items) => return Some(items),
            None if matches!(value, Value::Object(_) | Value::Bool(_) | Value::Number(_)) => {
                log.malformed_type(key, "string or list of strings", value)
            }
            None => {}
        }
    }
    None
}

pub(super) fn topic(raw: &Map<String, Value>, log: &mut ParseLog) -> Resolved<String> {
    match first_text(raw, &["topic", "title"], log) {
        Some(t) => Resolved::explicit(t),
        None => Resolved::defaulted(DEFAULT_TOPIC.to_string()),
    }
}

pub(super) fn audience(raw: &Map<String, Value>, log: &mut ParseLog) -> Resolved<String> {
    match first_text(raw, &["audience", "participants"], log) {
        Some(a) => Resolved::explicit(a),
        None => Resolved::defaulted(DEFAULT_AUDIENCE.to_string()),
    }
}

pub(super) fn objectives(raw: &Map<String, Value>, log: &mut ParseLog) -> Resolved<Vec<String>> {
    match first_list(raw, &["goals", "objectives"], log) {
        Some(items) => Resolved::explicit(items),
        None => Resolved::defaulted(owned(DEFAULT_OBJECTIVES)),
    }
}

/// Tags detected in the flattened request, or the canned defaults
pub(super) fn tags(
    matcher: &KeywordMatcher,
    flat: &str,
    defaults: &[&str],
) -> Resolved<Vec<String>> {
    let found = matcher.detect(flat);
    if found.is_empty() {
        Resolved::defaulted(owned(defaults))
    } else {
        Resolved::inferred(owned(&found))
    }
}

pub(super) fn deliverables(
    raw: &Map<String, Value>,
    topic: &str,
    log: &mut ParseLog,
) -> Resolved<Vec<String>> {
    if let Some(items) = first_list(raw, DELIVERABLE_KEYS, log) {
        return Resolved::explicit(items);
    }
    if let Some(items) = special(raw)
        .and_then(|s| s.get("final_deliverables"))
        .and_then(as_text_list)
    {
        return Resolved::explicit(items);
    }

    TOPIC_DELIVERABLES
        .iter()
        .find(|(keywords, _)| contains_all(topic, keywords))
        .map(|(_, items)| Resolved::inferred(owned(items)))
        .unwrap_or_else(|| Resolved::defaulted(owned(DEFAULT_DELIVERABLES)))
}

pub(super) fn class_size(raw: &Map<String, Value>, log: &mut ParseLog) -> Resolved<Option<u32>> {
    let nested = special(raw).and_then(|s| s.get("class_size"));
    let candidates = CLASS_SIZE_KEYS
        .iter()
        .map(|key| (*key, raw.get(*key)))
        .chain(std::iter::once(("special_requirements.class_size", nested)));

    for (field, value) in candidates {
        let Some(value) = value else {
            continue;
        };
        match as_count(value).filter(|n| *n > 0) {
            Some(n) => return Resolved::explicit(Some(n)),
            None => log.malformed_type(field, "positive whole number", value),
        }
    }
    Resolved::defaulted(None)
}

/// The `constraints` object, if any
pub(super) fn constraints<'a>(
    raw: &'a Map<String, Value>,
    log: &mut ParseLog,
) -> Option<&'a Map<String, Value>> {
    match raw.get("constraints") {
        Some(Value::Object(obj)) => Some(obj),
        Some(other) => {
            log.malformed_type("constraints", "object", other);
            None
        }
        None => None,
    }
}

pub(super) fn equipment(
    constraints: Option<&Map<String, Value>>,
    log: &mut ParseLog,
) -> Resolved<Vec<String>> {
    if let Some(value) = constraints.and_then(|c| c.get("equipment")) {
        match as_text_list(value) {
            Some(items) => return Resolved::explicit(items),
            None => log.malformed_type("constraints.equipment", "string or list of strings", value),
        }
    }
    Resolved::defaulted(owned(DEFAULT_EQUIPMENT))
}

pub(super) fn budget(
    constraints: Option<&Map<String, Value>>,
    log: &mut ParseLog,
) -> Resolved<BudgetLevel> {
    if let Some(value) = constraints.and_then(|c| c.get("budget")) {
        match value.as_str().and_then(BudgetLevel::from_label) {
            Some(level) => return Resolved::explicit(level),
            None => log.malformed("constraints.budget", format!("unknown budget level {}", value)),
        }
    }
    Resolved::defaulted(BudgetLevel::Moderate)
}

/// Explicit label > context keywords > training center
pub(super) fn institution(
    raw: &Map<String, Value>,
    log: &mut ParseLog,
) -> Resolved<InstitutionType> {
    if let Some(value) = raw.get("institution_type") {
        match value.as_str().and_then(InstitutionType::from_label) {
            Some(kind) => return Resolved::explicit(kind),
            None => log.malformed("institution_type", format!("unknown institution type {}", value)),
        }
    }

    let context = raw.get("context").and_then(Value::as_str).unwrap_or("");
    INSTITUTION_KEYWORDS
        .iter()
        .find(|(_, keywords)| contains_any(context, keywords))
        .map(|(kind, _)| Resolved::inferred(*kind))
        .unwrap_or_else(|| Resolved::defaulted(InstitutionType::TrainingCenter))
}

pub(super) fn teaching_context(raw: &Map<String, Value>, log: &mut ParseLog) -> Resolved<String> {
    match first_text(raw, &["context"], log) {
        Some(c) => Resolved::explicit(c),
        None => Resolved::defaulted(DEFAULT_TEACHING_CONTEXT.to_string()),
    }
}

pub(super) fn special_requirements(
    raw: &Map<String, Value>,
    log: &mut ParseLog,
) -> Resolved<Map<String, Value>> {
    match raw.get("special_requirements") {
        Some(Value::Object(obj)) => Resolved::explicit(obj.clone()),
        Some(Value::Null) | None => Resolved::defaulted(Map::new()),
        Some(other) => {
            log.malformed_type("special_requirements", "object", other);
            Resolved::defaulted(Map::new())
        }
    }
}

fn special(raw: &Map<String, Value>) -> Option<&Map<String, Value>> {
    raw.get("special_requirements").and_then(Value::as_object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldSource;
    use serde_json::json;

    fn map(raw: Value) -> Map<String, Value> {
        raw.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_topic_chain() {
        let mut log = ParseLog::default();
        let resolved = topic(&map(json!({"topic": "  ", "title": "火星基地"})), &mut log);
        assert_eq!(resolved, Resolved::explicit("火星基地".to_string()));

        let resolved = topic(&map(json!({"topic": 42})), &mut log);
        assert_eq!(resolved.source, FieldSource::Default);
        assert_eq!(log.warnings.len(), 1);
    }

    #[test]
    fn test_objectives_accept_string_or_list() {
        let mut log = ParseLog::default();
        let resolved = objectives(&map(json!({"objectives": "学会建模"})), &mut log);
        assert_eq!(resolved.value, vec!["学会建模".to_string()]);

        let resolved = objectives(&map(json!({"goals": [], "objectives": ["a", "b"]})), &mut log);
        assert_eq!(resolved.value, vec!["a".to_string(), "b".to_string()]);

        let resolved = objectives(&map(json!({"goals": {"x": 1}})), &mut log);
        assert_eq!(resolved.source, FieldSource::Default);
        assert_eq!(log.warnings.len(), 1);
    }

    #[test]
    fn test_deliverables_chain() {
        let mut log = ParseLog::default();
        let raw = map(json!({"special_requirements": {"final_deliverables": ["海报"]}}));
        assert_eq!(deliverables(&raw, "任意", &mut log).value, vec!["海报".to_string()]);

        let resolved = deliverables(&map(json!({})), "月球基地装备", &mut log);
        assert_eq!(resolved.source, FieldSource::Inferred);
        assert_eq!(resolved.value.len(), 4);

        let resolved = deliverables(&map(json!({})), "月球探索", &mut log);
        assert_eq!(resolved.value, owned(DEFAULT_DELIVERABLES));
    }

    #[test]
    fn test_class_size_chain() {
        let mut log = ParseLog::default();
        let raw = map(json!({"participant_count": "24"}));
        assert_eq!(class_size(&raw, &mut log).value, Some(24));

        let raw = map(json!({"class_size": 0, "special_requirements": {"class_size": 18}}));
        assert_eq!(class_size(&raw, &mut log).value, Some(18));
        assert_eq!(log.warnings.len(), 1);

        assert_eq!(class_size(&map(json!({})), &mut log).value, None);
    }

    #[test]
    fn test_constraints() {
        let mut log = ParseLog::default();
        let raw = map(json!({"constraints": {"equipment": "平板电脑", "budget": "充足"}}));
        let c = constraints(&raw, &mut log);
        assert_eq!(equipment(c, &mut log).value, vec!["平板电脑".to_string()]);
        assert_eq!(budget(c, &mut log).value, BudgetLevel::Ample);

        let raw = map(json!({"constraints": {"budget": "lots"}}));
        let c = constraints(&raw, &mut log);
        assert_eq!(budget(c, &mut log), Resolved::defaulted(BudgetLevel::Moderate));
        assert_eq!(equipment(c, &mut log).value, owned(DEFAULT_EQUIPMENT));
        assert_eq!(log.warnings.len(), 1);
    }

    #[test]
    fn test_institution_chain() {
        let mut log = ParseLog::default();
        let raw = map(json!({"institution_type": "社区中心", "context": "创客空间"}));
        assert_eq!(institution(&raw, &mut log).value, InstitutionType::CommunityCenter);

        let raw = map(json!({"context": "Maker Space weekend"}));
        assert_eq!(
            institution(&raw, &mut log),
            Resolved::inferred(InstitutionType::MakerSpace)
        );

        let raw = map(json!({"context": "市实验中学"}));
        assert_eq!(institution(&raw, &mut log).value, InstitutionType::TraditionalSchool);

        let raw = map(json!({"institution_type": "museum"}));
        assert_eq!(
            institution(&raw, &mut log),
            Resolved::defaulted(InstitutionType::TrainingCenter)
        );
        assert_eq!(log.warnings.len(), 1);
    }
}
