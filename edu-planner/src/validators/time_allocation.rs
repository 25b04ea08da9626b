//! Time allocation (Critical)
//!
//! - Course hours within ±20% of the requested total: 0.6
//! - Camps only: at least 4 course hours per requested day: 0.4
//!
//! Outside camp mode the rule tops out at 0.6 and therefore never passes.

use super::{Findings, QualityRule, RuleContext, RuleError, RuleKind};
use crate::types::{TimeMode, ValidationResult};

const HOUR_TOLERANCE: f64 = 0.2;
const MIN_CAMP_HOURS_PER_DAY: f64 = 4.0;

pub struct TimeAllocation;

impl QualityRule for TimeAllocation {
    fn kind(&self) -> RuleKind {
        RuleKind::TimeAllocation
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<ValidationResult, RuleError> {
        let Some(parsed) = ctx.parsed else {
            return Ok(Findings::starting_at(self.kind(), 0.5).finish("时间分配合理", "时间分配存在问题"));
        };

        let mut findings = Findings::new(self.kind());
        let expected_hours = parsed.total_duration.effective_total_hours() as f64;
        let course_hours = ctx.course.duration_hours();

        let deviation = (course_hours - expected_hours).abs() / expected_hours;
        if deviation <= HOUR_TOLERANCE + 1e-9 {
            findings.award(0.6);
        } else {
            findings.flag(
                format!("总时长偏差过大: 期望{}小时, 实际{}小时", expected_hours, course_hours),
                "调整时间分配以匹配要求的总时长",
            );
        }

        if parsed.time_mode == TimeMode::IntensiveCamp {
            let days = parsed.total_duration.days.unwrap_or(0);
            if days > 0 {
                if course_hours / days as f64 >= MIN_CAMP_HOURS_PER_DAY {
                    findings.award(0.4);
                } else {
                    findings.flag("集训营模式的每日时长不够密集", "增加每日学习时长以符合集训营特点");
                }
            }
        }

        Ok(findings.finish("时间分配合理", "时间分配存在问题"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RequirementParser;
    use crate::validators::course::CourseView;
    use serde_json::{json, Value};

    fn check(course: Value, request: Value) -> ValidationResult {
        let parsed = RequirementParser::new().parse(&request);
        let original = json!({});
        let ctx = RuleContext {
            course: CourseView::new(&course),
            original: &original,
            parsed: Some(&parsed),
        };
        TimeAllocation.check(&ctx).unwrap()
    }

    #[test]
    fn test_camp_within_tolerance() {
        let result = check(
            json!({"duration_hours": 16}),
            json!({"duration": {"days": 3, "hours_per_day": 6}}),
        );
        assert!((result.score - 1.0).abs() < 1e-9);
        assert!(result.passed);
    }

    #[test]
    fn test_camp_too_sparse() {
        let result = check(
            json!({"duration_hours": 10}),
            json!({"duration": {"days": 3, "hours_per_day": 6}}),
        );
        assert_eq!(result.score, 0.0);
        assert_eq!(result.suggestions.len(), 2);
    }

    #[test]
    fn test_weekly_caps_below_pass() {
        let result = check(json!({"duration_hours": 16}), json!({"duration": {"weeks": 4}}));
        assert!((result.score - 0.6).abs() < 1e-9);
        assert!(!result.passed);
        assert_eq!(result.message, "时间分配存在问题");
    }

    #[test]
    fn test_missing_course_hours() {
        let result = check(json!({}), json!({}));
        assert_eq!(result.score, 0.0);
        assert!(result.message.contains("期望16小时, 实际0小时"));
    }
}
