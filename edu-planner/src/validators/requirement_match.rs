//! Requirement match (Critical)
//!
//! - Topic appears in the course title: 0.30
//! - Share of requested deliverables among the course's final products: 0.40
//! - Share of requested objectives echoed by a course objective: 0.30
//!
//! Objective echo is a substring test on each whitespace-separated token of
//! more than two characters.

use super::{Findings, QualityRule, RuleContext, RuleError, RuleKind};
use crate::types::ValidationResult;
use serde_json::json;
use std::collections::BTreeSet;

pub struct RequirementMatch;

impl QualityRule for RequirementMatch {
    fn kind(&self) -> RuleKind {
        RuleKind::RequirementMatch
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<ValidationResult, RuleError> {
        let Some(parsed) = ctx.parsed else {
            let mut findings = Findings::starting_at(self.kind(), 0.5);
            findings.suggest("建议使用需求解析系统提高验证精度");
            findings.detail("parsed_req_available", json!(false));
            return Ok(findings.finish("需求匹配度良好", "需求匹配存在问题"));
        };

        let mut findings = Findings::new(self.kind());
        let course = &ctx.course;

        let topic = parsed.topic.to_lowercase();
        let title = course.title().to_lowercase();
        if !topic.is_empty() && title.contains(&topic) {
            findings.award(0.3);
        } else {
            findings.flag(
                format!("课程标题'{}'与预期主题'{}'不匹配", title, topic),
                "调整课程标题以反映具体主题",
            );
        }

        let expected: BTreeSet<&str> = parsed.final_deliverables.iter().map(String::as_str).collect();
        let produced: BTreeSet<&str> = course.final_products().into_iter().collect();
        if !expected.is_empty() {
            let ratio = expected.intersection(&produced).count() as f64 / expected.len() as f64;
            findings.award(0.4 * ratio);
            if ratio < 0.5 {
                findings.flag(
                    format!("交付物匹配度过低: 期望{:?}, 实际{:?}", expected, produced),
                    "调整课程设计以产出要求的具体交付物",
                );
            }
        }

        let course_objectives: Vec<String> = course
            .learning_objectives()
            .iter()
            .map(|o| o.to_lowercase())
            .collect();
        if !parsed.learning_objectives.is_empty() && !course_objectives.is_empty() {
            let echoed = parsed
                .learning_objectives
                .iter()
                .filter(|expected| echoes(expected, &course_objectives))
                .count();
            let ratio = echoed as f64 / parsed.learning_objectives.len() as f64;
            findings.award(0.3 * ratio);
            if ratio < 0.6 {
                findings.flag("学习目标匹配度不足", "重新调整学习目标以更好匹配用户需求");
            }
        }

        findings.detail("parsed_req_available", json!(true));
        Ok(findings.finish("需求匹配度良好", "需求匹配存在问题"))
    }
}

fn echoes(expected: &str, course_objectives: &[String]) -> bool {
    let expected = expected.to_lowercase();
    let tokens: Vec<&str> = expected
        .split_whitespace()
        .filter(|t| t.chars().count() > 2)
        .collect();
    course_objectives
        .iter()
        .any(|objective| tokens.iter().any(|t| objective.contains(t)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RequirementParser;
    use crate::validators::course::CourseView;
    use serde_json::{json, Value};

    fn check(course: &Value, parsed: Option<&crate::types::ParsedRequirement>) -> ValidationResult {
        let original = json!({});
        let ctx = RuleContext {
            course: CourseView::new(course),
            original: &original,
            parsed,
        };
        RequirementMatch.check(&ctx).unwrap()
    }

    #[test]
    fn test_full_match() {
        let parsed = RequirementParser::new().parse(&json!({
            "topic": "Mars Base",
            "goals": ["design a habitat module"],
            "deliverables": ["模型", "视频"]
        }));
        let course = json!({
            "title": "Building a MARS BASE",
            "final_products": ["模型", "视频", "海报"],
            "learning_objectives": ["Students design a HABITAT for four people"]
        });

        let result = check(&course, Some(&parsed));
        assert!((result.score - 1.0).abs() < 1e-9);
        assert!(result.passed);
        assert_eq!(result.message, "需求匹配度良好");
    }

    #[test]
    fn test_partial_match_lists_issues() {
        let parsed = RequirementParser::new().parse(&json!({
            "topic": "月球装备",
            "deliverables": ["模型", "视频", "海报", "报告"]
        }));
        let course = json!({"title": "火星探索", "final_products": ["模型"]});

        let result = check(&course, Some(&parsed));
        assert!((result.score - 0.1).abs() < 1e-9);
        assert!(!result.passed);
        assert!(result.message.starts_with("需求匹配存在问题: 课程标题"));
        assert_eq!(result.suggestions.len(), 2);
    }

    #[test]
    fn test_without_parsed_requirement() {
        let result = check(&json!({}), None);
        assert_eq!(result.score, 0.5);
        assert!(!result.passed);
        assert_eq!(result.details["parsed_req_available"], json!(false));
    }
}
