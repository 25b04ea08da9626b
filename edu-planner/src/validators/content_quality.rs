//! Content quality (Important)
//!
//! - Resource titles at least 80% unique: 0.3
//! - At most half the resource descriptions generic: 0.3
//! - At most 30% of objectives built on vague verbs: 0.2
//! - At least three phases: 0.2

use super::{Findings, QualityRule, RuleContext, RuleError, RuleKind};
use crate::types::ValidationResult;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Boilerplate resource descriptions
const GENERIC_DESCRIPTIONS: &[&str] = &["支持学习的重要资源", "学习材料", "Introduction to Basic"];

/// Verbs that make an objective unmeasurable unless it also says 如何
const VAGUE_VERBS: &[&str] = &["了解", "知道", "理解"];

const MIN_PHASES: usize = 3;

pub struct ContentQuality;

impl QualityRule for ContentQuality {
    fn kind(&self) -> RuleKind {
        RuleKind::ContentQuality
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<ValidationResult, RuleError> {
        let mut findings = Findings::new(self.kind());
        let course = &ctx.course;

        let resources = course.resources()?;
        if !resources.is_empty() {
            let titles: Vec<&str> = resources.iter().map(|r| text_field(r, "title")).collect();
            let unique: BTreeSet<&str> = titles.iter().copied().collect();
            if (unique.len() as f64) < titles.len() as f64 * 0.8 {
                findings.flag("学习资源重复度过高，缺乏多样性", "提供更多样化的学习资源");
            } else {
                findings.award(0.3);
            }

            let generic = resources
                .iter()
                .filter(|r| {
                    let description = text_field(r, "description");
                    GENERIC_DESCRIPTIONS.iter().any(|g| description.contains(g))
                })
                .count();
            if generic as f64 > resources.len() as f64 * 0.5 {
                findings.flag("资源描述过于通用化，缺乏针对性", "为每个资源提供具体、相关的描述");
            } else {
                findings.award(0.3);
            }
        }

        let objectives = course.learning_objectives();
        if !objectives.is_empty() {
            let vague = objectives.iter().filter(|o| is_vague(o)).count();
            if vague as f64 <= objectives.len() as f64 * 0.3 {
                findings.award(0.2);
            } else {
                findings.flag("学习目标过于模糊，缺乏可操作性", "使用更具体、可衡量的动词描述学习目标");
            }
        }

        let phases = course.phase_count();
        if phases > 0 {
            if phases >= MIN_PHASES {
                findings.award(0.2);
            } else {
                findings.flag("课程阶段设计不完整", "设计完整的课程阶段，包括导入、发展、总结");
            }
        }

        Ok(findings.finish("内容质量良好", "内容质量需要改进"))
    }
}

fn text_field<'a>(entry: &'a Map<String, Value>, key: &str) -> &'a str {
    entry.get(key).and_then(Value::as_str).unwrap_or("")
}

fn is_vague(objective: &str) -> bool {
    VAGUE_VERBS.iter().any(|v| objective.contains(v)) && !objective.contains("如何")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::course::CourseView;
    use serde_json::json;

    fn check(course: Value) -> Result<ValidationResult, RuleError> {
        let original = json!({});
        let ctx = RuleContext {
            course: CourseView::new(&course),
            original: &original,
            parsed: None,
        };
        ContentQuality.check(&ctx)
    }

    #[test]
    fn test_rich_course() {
        let result = check(json!({
            "resources": [
                {"title": "Blender入门", "description": "建模快捷键速查"},
                {"title": "月面环境数据", "description": "NASA公开数据集"}
            ],
            "learning_objectives": ["设计可打印的装备模型", "理解如何用AI生成分镜"],
            "phases": [{}, {}, {}]
        }))
        .unwrap();
        assert!((result.score - 1.0).abs() < 1e-9);
        assert!(result.passed);
    }

    #[test]
    fn test_generic_and_vague_course() {
        let result = check(json!({
            "resources": [
                {"title": "资料", "description": "学习材料"},
                {"title": "资料", "description": "学习材料"}
            ],
            "learning_objectives": ["了解3D打印", "知道AI"],
            "phases": [{}]
        }))
        .unwrap();
        assert_eq!(result.score, 0.0);
        assert!(!result.passed);
        assert_eq!(result.suggestions.len(), 4);
    }

    #[test]
    fn test_empty_course_scores_zero() {
        let result = check(json!({})).unwrap();
        assert_eq!(result.score, 0.0);
        assert_eq!(result.message, "内容质量需要改进");
    }

    #[test]
    fn test_non_object_resource_is_error() {
        assert!(check(json!({"resources": [{"title": "a"}, "b"]})).is_err());
    }

    #[test]
    fn test_vague_detection() {
        assert!(is_vague("了解月球环境"));
        assert!(!is_vague("理解如何搭建电路"));
        assert!(!is_vague("制作模型"));
    }
}
