//! AI integration (Important)
//!
//! Starts from 0.8 and adds 0.05 for every requested AI tool named anywhere
//! in the course document, capped at 1.0.

use super::{Findings, QualityRule, RuleContext, RuleError, RuleKind};
use crate::types::ValidationResult;
use serde_json::json;

const BASE_SCORE: f64 = 0.8;
const PER_TOOL_BONUS: f64 = 0.05;

pub struct AiIntegration;

impl QualityRule for AiIntegration {
    fn kind(&self) -> RuleKind {
        RuleKind::AiIntegration
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<ValidationResult, RuleError> {
        let mut findings = Findings::starting_at(self.kind(), BASE_SCORE);

        if let Some(parsed) = ctx.parsed {
            let text = ctx.course.text();
            let mut mentioned = Vec::new();
            for tool in &parsed.ai_tools {
                if text.contains(&tool.to_lowercase()) {
                    findings.award(PER_TOOL_BONUS);
                    mentioned.push(tool.as_str());
                } else {
                    findings.suggest(format!("建议在课程中明确说明如何使用{}", tool));
                }
            }
            findings.detail("mentioned_tools", json!(mentioned));
        }

        Ok(findings.finish("AI工具集成合理", "AI工具集成需要加强"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RequirementParser;
    use crate::validators::course::CourseView;

    #[test]
    fn test_mentioned_tools_add_bonus() {
        let parsed = RequirementParser::new().parse(&json!({"context": "用ChatGPT和Claude辅助"}));
        let course = json!({"phases": [{"tools": ["ChatGPT 头脑风暴"]}]});
        let original = json!({});
        let ctx = RuleContext {
            course: CourseView::new(&course),
            original: &original,
            parsed: Some(&parsed),
        };

        let result = AiIntegration.check(&ctx).unwrap();
        assert!((result.score - 0.85).abs() < 1e-9);
        assert!(result.passed);
        assert_eq!(result.suggestions, vec!["建议在课程中明确说明如何使用claude".to_string()]);
        assert_eq!(result.details["mentioned_tools"], json!(["chatgpt"]));
    }

    #[test]
    fn test_many_tools_cap_at_full_score() {
        let mut parsed = RequirementParser::new().parse(&json!({}));
        parsed.ai_tools = ["chatgpt", "claude", "midjourney", "runway", "suno", "blender_ai"]
            .iter()
            .map(|t| t.to_string())
            .collect();
        let course = json!({
            "phases": [{"tools": ["ChatGPT", "Claude", "Midjourney", "Runway", "Suno", "blender_ai"]}]
        });
        let original = json!({});
        let ctx = RuleContext {
            course: CourseView::new(&course),
            original: &original,
            parsed: Some(&parsed),
        };

        let result = AiIntegration.check(&ctx).unwrap();
        assert_eq!(result.score, 1.0);
        assert!(result.passed);
        assert!(result.suggestions.is_empty());
        assert_eq!(result.details["mentioned_tools"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_without_parsed_keeps_base_score() {
        let course = json!({});
        let original = json!({});
        let ctx = RuleContext {
            course: CourseView::new(&course),
            original: &original,
            parsed: None,
        };
        let result = AiIntegration.check(&ctx).unwrap();
        assert_eq!(result.score, 0.8);
        assert!(result.suggestions.is_empty());
    }
}
