//! Requirement parser: loose request JSON → `ParsedRequirement`
//!
//! Each field is resolved through its own priority chain (structured field,
//! then free-text inference, then compiled default). Type mismatches are
//! recorded as warnings and never abort the parse; inverted or empty age
//! ranges are repaired and unusable durations fall through to the next
//! source. Only a request nested too deeply to inspect safely aborts, and
//! then the fixed fallback requirement is returned instead.

mod age;
mod duration;
mod fields;
pub mod tables;

use crate::text::{flatten_text, is_truthy, nesting_exceeds, type_name, KeywordMatcher};
use crate::types::{
    AgeGroup, AgeRange, BudgetLevel, FieldSource, InstitutionType, ParseWarning, ParsedRequirement,
    TimeMode, TotalDuration,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, warn};

use tables::owned;

/// Internal parse failure that switches `parse` to the fallback requirement
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("request nested deeper than {limit} levels")]
    RequestTooDeep { limit: usize },
}

/// Deepest container nesting the parser will walk
pub const MAX_REQUEST_DEPTH: usize = 32;

/// Value resolved through a fallback chain, tagged with its source
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Resolved<T> {
    pub value: T,
    pub source: FieldSource,
}

impl<T> Resolved<T> {
    pub fn explicit(value: T) -> Self {
        Self { value, source: FieldSource::Explicit }
    }

    pub fn inferred(value: T) -> Self {
        Self { value, source: FieldSource::Inferred }
    }

    pub fn defaulted(value: T) -> Self {
        Self { value, source: FieldSource::Default }
    }
}

/// Warnings and provenance collected while resolving fields
#[derive(Debug, Default)]
pub(crate) struct ParseLog {
    pub warnings: Vec<ParseWarning>,
    pub provenance: BTreeMap<String, FieldSource>,
}

impl ParseLog {
    pub fn malformed(&mut self, field: &str, reason: impl Into<String>) {
        let reason = reason.into();
        debug!(field = %field, reason = %reason, "Ignoring malformed request field");
        self.warnings.push(ParseWarning::Malformed {
            field: field.to_string(),
            reason,
        });
    }

    pub fn malformed_type(&mut self, field: &str, expected: &str, got: &Value) {
        self.malformed(field, format!("expected {}, got {}", expected, type_name(got)));
    }

    /// Record the source of `field` and hand back the value
    pub fn take<T>(&mut self, field: &str, resolved: Resolved<T>) -> T {
        self.provenance.insert(field.to_string(), resolved.source);
        resolved.value
    }
}

/// Turns loosely structured course requests into `ParsedRequirement`s
#[derive(Debug, Clone)]
pub struct RequirementParser {
    skills: &'static KeywordMatcher,
    ai_tools: &'static KeywordMatcher,
}

impl Default for RequirementParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RequirementParser {
    pub fn new() -> Self {
        Self {
            skills: &tables::SKILL_MATCHER,
            ai_tools: &tables::AI_TOOL_MATCHER,
        }
    }

    /// Parse a raw request; never fails
    ///
    /// Non-object input is treated as an empty request.
    pub fn parse(&self, raw: &Value) -> ParsedRequirement {
        let empty = Map::new();
        let mut log = ParseLog::default();
        let map = match raw {
            Value::Object(map) => map,
            other => {
                log.malformed_type("request", "object", other);
                &empty
            }
        };

        info!(
            topic = map.get("topic").and_then(|v| v.as_str()).unwrap_or(""),
            "Parsing course requirement"
        );

        match self.try_parse(map, &mut log) {
            Ok(parsed) => {
                info!(
                    topic = %parsed.topic,
                    time_mode = parsed.time_mode.name(),
                    confidence = parsed.confidence_score,
                    validation_passed = parsed.validation_passed,
                    defaulted_fields = parsed.defaulted_field_count(),
                    warnings = parsed.warnings.len(),
                    "Requirement parsed"
                );
                parsed
            }
            Err(e) => {
                warn!(error = %e, "Requirement parsing failed, using fallback requirement");
                self.fallback(map, &e, log)
            }
        }
    }

    fn try_parse(
        &self,
        raw: &Map<String, Value>,
        log: &mut ParseLog,
    ) -> Result<ParsedRequirement, ParseError> {
        let request = Value::Object(raw.clone());
        if nesting_exceeds(&request, MAX_REQUEST_DEPTH) {
            return Err(ParseError::RequestTooDeep {
                limit: MAX_REQUEST_DEPTH,
            });
        }

        let topic = fields::topic(raw, log);
        let topic = log.take("topic", topic);
        let audience = fields::audience(raw, log);
        let audience = log.take("audience", audience);

        let (age_group, age_range) = {
            let resolved = age::resolve(raw, log);
            log.take("age_range", resolved)
        };
        let (time_mode, total_duration) = {
            let resolved = duration::resolve(raw, log);
            log.take("total_duration", resolved)
        };
        debug!(
            min_age = age_range.min,
            max_age = age_range.max,
            time_mode = time_mode.name(),
            total_hours = total_duration.total_hours,
            "Resolved audience and timing"
        );

        let flat = flatten_text(&request);
        let learning_objectives = fields::objectives(raw, log);
        let learning_objectives = log.take("learning_objectives", learning_objectives);
        let target_skills = fields::tags(self.skills, &flat, tables::DEFAULT_SKILLS);
        let target_skills = log.take("target_skills", target_skills);
        let ai_tools = fields::tags(self.ai_tools, &flat, tables::DEFAULT_AI_TOOLS);
        let ai_tools = log.take("ai_tools", ai_tools);
        let final_deliverables = fields::deliverables(raw, &topic, log);
        let final_deliverables = log.take("final_deliverables", final_deliverables);

        let class_size = fields::class_size(raw, log);
        let class_size = log.take("class_size", class_size);
        let constraints = fields::constraints(raw, log);
        let equipment = fields::equipment(constraints, log);
        let equipment = log.take("equipment", equipment);
        let budget_level = fields::budget(constraints, log);
        let budget_level = log.take("budget_level", budget_level);
        let institution_type = fields::institution(raw, log);
        let institution_type = log.take("institution_type", institution_type);
        let teaching_context = fields::teaching_context(raw, log);
        let teaching_context = log.take("teaching_context", teaching_context);
        let special_requirements = fields::special_requirements(raw, log);
        let special_requirements = log.take("special_requirements", special_requirements);

        let mut parsed = ParsedRequirement {
            topic,
            audience,
            age_group,
            age_range,
            time_mode,
            total_duration,
            learning_objectives,
            target_skills,
            ai_tools,
            final_deliverables,
            class_size,
            equipment,
            budget_level,
            institution_type,
            teaching_context,
            special_requirements,
            parsed_at: edu_common::time::now(),
            confidence_score: self.confidence_score(&request),
            validation_passed: false,
            provenance: std::mem::take(&mut log.provenance),
            warnings: std::mem::take(&mut log.warnings),
        };
        parsed.validation_passed = self.validate(&parsed);
        Ok(parsed)
    }

    /// Structural completeness of a raw request (0.0-1.0)
    ///
    /// 0.2 for each truthy key among topic / audience / goals / context,
    /// 0.2 for a non-empty `duration` object and 0.2 when
    /// `special_requirements` has more than two keys.
    pub fn confidence_score(&self, raw: &Value) -> f64 {
        let Some(map) = raw.as_object() else {
            return 0.0;
        };

        let mut score: f64 = ["topic", "audience", "goals", "context"]
            .iter()
            .filter(|key| map.get(**key).is_some_and(is_truthy))
            .count() as f64
            * 0.2;

        if map
            .get("duration")
            .and_then(Value::as_object)
            .is_some_and(|d| !d.is_empty())
        {
            score += 0.2;
        }

        if map
            .get("special_requirements")
            .and_then(Value::as_object)
            .is_some_and(|s| s.len() > 2)
        {
            score += 0.2;
        }

        score.min(1.0)
    }

    /// Structural sanity check of a parsed requirement
    pub fn validate(&self, parsed: &ParsedRequirement) -> bool {
        if parsed.topic.trim().is_empty() || parsed.audience.trim().is_empty() {
            return false;
        }
        if parsed.age_range.min >= parsed.age_range.max {
            return false;
        }
        if parsed.total_duration.total_hours == 0 {
            return false;
        }
        !parsed.learning_objectives.is_empty()
    }

    /// Fixed minimal requirement used when parsing fails internally
    fn fallback(
        &self,
        raw: &Map<String, Value>,
        error: &ParseError,
        mut log: ParseLog,
    ) -> ParsedRequirement {
        let mut provenance = BTreeMap::new();
        for field in FALLBACK_FIELDS {
            provenance.insert(field.to_string(), FieldSource::Default);
        }

        let topic = match raw.get("topic").and_then(crate::text::as_text) {
            Some(t) => {
                provenance.insert("topic".to_string(), FieldSource::Explicit);
                t.to_string()
            }
            None => "创新项目设计".to_string(),
        };
        let audience = match raw.get("audience").and_then(crate::text::as_text) {
            Some(a) => {
                provenance.insert("audience".to_string(), FieldSource::Explicit);
                a.to_string()
            }
            None => "中学生".to_string(),
        };

        log.warnings.push(ParseWarning::Fallback {
            reason: error.to_string(),
        });

        ParsedRequirement {
            topic,
            audience,
            age_group: AgeGroup::MiddleSchool,
            age_range: AgeRange { min: 12, max: 15 },
            time_mode: TimeMode::Weekly,
            total_duration: TotalDuration::weekly(4, 4),
            learning_objectives: owned(&["培养创新思维", "掌握基础技能"]),
            target_skills: owned(&["问题解决", "创新思维"]),
            ai_tools: owned(&["chatgpt"]),
            final_deliverables: owned(&["项目报告", "作品展示"]),
            class_size: None,
            equipment: owned(&["计算机"]),
            budget_level: BudgetLevel::Moderate,
            institution_type: InstitutionType::TrainingCenter,
            teaching_context: "项目制学习".to_string(),
            special_requirements: Map::new(),
            parsed_at: edu_common::time::now(),
            confidence_score: 0.3,
            validation_passed: true,
            provenance,
            warnings: log.warnings,
        }
    }
}

const FALLBACK_FIELDS: &[&str] = &[
    "topic",
    "audience",
    "age_range",
    "total_duration",
    "learning_objectives",
    "target_skills",
    "ai_tools",
    "final_deliverables",
    "class_size",
    "equipment",
    "budget_level",
    "institution_type",
    "teaching_context",
    "special_requirements",
];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(raw: Value) -> ParsedRequirement {
        RequirementParser::new().parse(&raw)
    }

    #[test]
    fn test_full_request() {
        let parsed = parse(json!({
            "topic": "月球生存装备设计",
            "audience": "8-12岁小学生",
            "goals": ["用Blender完成3D建模", "制作AI动画短片"],
            "context": "暑期5天集训营",
            "duration": {"days": 5, "hours_per_day": 6},
            "constraints": {"equipment": ["3D打印机", "平板"], "budget": "有限"},
            "special_requirements": {"class_size": 20, "language": "zh", "safety": "yes"}
        }));

        assert_eq!(parsed.topic, "月球生存装备设计");
        assert_eq!(parsed.age_range, AgeRange { min: 8, max: 12 });
        assert_eq!(parsed.age_group, AgeGroup::Elementary);
        assert_eq!(parsed.time_mode, TimeMode::IntensiveCamp);
        assert_eq!(parsed.total_duration.total_hours, 30);
        assert!(parsed.target_skills.contains(&"3d建模".to_string()));
        assert!(parsed.target_skills.contains(&"ai动画".to_string()));
        assert!(parsed.ai_tools.contains(&"blender_ai".to_string()));
        assert_eq!(parsed.final_deliverables[0], "月球装备设计方案");
        assert_eq!(parsed.class_size, Some(20));
        assert_eq!(parsed.budget_level, BudgetLevel::Limited);
        assert_eq!(parsed.institution_type, InstitutionType::TrainingCenter);
        assert!((parsed.confidence_score - 1.0).abs() < 1e-9);
        assert!(parsed.validation_passed);
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.provenance["age_range"], FieldSource::Inferred);
        assert_eq!(parsed.provenance["total_duration"], FieldSource::Explicit);
    }

    #[test]
    fn test_empty_request_uses_defaults() {
        let parsed = parse(json!({}));

        assert_eq!(parsed.topic, tables::DEFAULT_TOPIC);
        assert_eq!(parsed.audience, tables::DEFAULT_AUDIENCE);
        assert_eq!(parsed.age_range, AgeRange { min: 10, max: 15 });
        assert_eq!(parsed.time_mode, TimeMode::Weekly);
        assert_eq!(parsed.total_duration, TotalDuration::weekly(4, 4));
        assert_eq!(parsed.target_skills, owned(tables::DEFAULT_SKILLS));
        assert_eq!(parsed.ai_tools, owned(tables::DEFAULT_AI_TOOLS));
        assert_eq!(parsed.final_deliverables, owned(tables::DEFAULT_DELIVERABLES));
        assert_eq!(parsed.confidence_score, 0.0);
        assert!(parsed.validation_passed);
        assert!(!parsed.is_fallback());
        assert_eq!(parsed.provenance["topic"], FieldSource::Default);
        assert_eq!(parsed.defaulted_field_count(), FALLBACK_FIELDS.len());
    }

    #[test]
    fn test_non_object_request_treated_as_empty() {
        let parsed = parse(json!(["not", "a", "map"]));
        assert_eq!(parsed.topic, tables::DEFAULT_TOPIC);
        assert!(matches!(
            &parsed.warnings[0],
            ParseWarning::Malformed { field, .. } if field == "request"
        ));
    }

    #[test]
    fn test_bad_age_and_duration_stay_local() {
        let parsed = parse(json!({
            "topic": "机器人",
            "goals": ["搭建机械臂"],
            "deliverables": ["机械臂原型"],
            "duration": {"days": 5, "hours_per_day": 6},
            "age_group": {"min": 16}
        }));

        assert!(!parsed.is_fallback());
        assert_eq!(parsed.age_range, AgeRange { min: 15, max: 16 });
        assert_eq!(parsed.time_mode, TimeMode::IntensiveCamp);
        assert_eq!(parsed.total_duration.total_hours, 30);
        assert_eq!(parsed.learning_objectives, owned(&["搭建机械臂"]));
        assert_eq!(parsed.final_deliverables, owned(&["机械臂原型"]));
        assert_eq!(parsed.provenance["age_range"], FieldSource::Explicit);
        assert_eq!(parsed.provenance["total_duration"], FieldSource::Explicit);
        assert!(parsed.defaulted_field_count() < FALLBACK_FIELDS.len());
        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.validation_passed);
    }

    #[test]
    fn test_zero_duration_keeps_other_fields() {
        let parsed = parse(json!({
            "audience": "8-12岁",
            "goals": ["设计月球车"],
            "duration": {"days": 0}
        }));

        assert!(!parsed.is_fallback());
        assert_eq!(parsed.age_range, AgeRange { min: 8, max: 12 });
        assert_eq!(parsed.learning_objectives, owned(&["设计月球车"]));
        assert_eq!(parsed.time_mode, TimeMode::Weekly);
        assert_eq!(parsed.total_duration, TotalDuration::weekly(4, 4));
        assert_eq!(parsed.provenance["total_duration"], FieldSource::Default);
        assert!(matches!(
            &parsed.warnings[0],
            ParseWarning::Malformed { field, .. } if field == "duration.days"
        ));
    }

    #[test]
    fn test_deeply_nested_request_falls_back() {
        let mut nested = json!("底层");
        for _ in 0..=MAX_REQUEST_DEPTH {
            nested = json!([nested]);
        }
        let parsed = parse(json!({"topic": "机器人", "special_requirements": nested}));

        assert!(parsed.is_fallback());
        assert_eq!(parsed.topic, "机器人");
        assert_eq!(parsed.audience, "中学生");
        assert_eq!(parsed.age_range, AgeRange { min: 12, max: 15 });
        assert_eq!(parsed.total_duration.total_hours, 16);
        assert_eq!(parsed.confidence_score, 0.3);
        assert!(parsed.validation_passed);
        assert_eq!(parsed.provenance["topic"], FieldSource::Explicit);
        assert_eq!(parsed.provenance["age_range"], FieldSource::Default);
    }

    #[test]
    fn test_confidence_score() {
        let parser = RequirementParser::new();
        assert_eq!(parser.confidence_score(&json!("text")), 0.0);
        let score = parser.confidence_score(&json!({"topic": "x", "audience": "", "context": "y"}));
        assert!((score - 0.4).abs() < 1e-9);
        let score = parser.confidence_score(&json!({
            "topic": "x",
            "duration": {},
            "special_requirements": {"a": 1, "b": 2}
        }));
        assert!((score - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_structural_problems() {
        let parser = RequirementParser::new();
        let mut parsed = parse(json!({"topic": "x", "audience": "y"}));
        assert!(parser.validate(&parsed));

        parsed.learning_objectives.clear();
        assert!(!parser.validate(&parsed));

        let mut parsed = parse(json!({"topic": "x"}));
        parsed.age_range = AgeRange { min: 12, max: 12 };
        assert!(!parser.validate(&parsed));
    }

    #[test]
    fn test_parse_is_deterministic_apart_from_timestamp() {
        let raw = json!({"topic": "AI动画", "context": "创客空间 8周课程", "goals": "学会剪辑"});
        let parser = RequirementParser::new();
        let mut a = parser.parse(&raw);
        let b = parser.parse(&raw);
        a.parsed_at = b.parsed_at;
        assert_eq!(a, b);
    }
}
