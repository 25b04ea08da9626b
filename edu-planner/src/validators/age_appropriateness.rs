//! Age appropriateness (Critical)
//!
//! Course grade levels are mapped to ages and must fall inside the
//! requested range (0.8). For audiences starting at 12 or younger the
//! course must also run 8 weeks or less (0.2).

use super::{Findings, QualityRule, RuleContext, RuleError, RuleKind};
use crate::types::ValidationResult;

/// Audiences starting at or below this age get the duration check
const YOUNG_AUDIENCE_MAX_AGE: u32 = 12;
const MAX_WEEKS_FOR_YOUNG: f64 = 8.0;

pub struct AgeAppropriateness;

/// Grade 1-12 → typical age; other values are taken as ages already
fn grade_to_age(grade: u32) -> u32 {
    match grade {
        1..=12 => grade + 5,
        other => other,
    }
}

impl QualityRule for AgeAppropriateness {
    fn kind(&self) -> RuleKind {
        RuleKind::AgeAppropriateness
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<ValidationResult, RuleError> {
        let Some(parsed) = ctx.parsed else {
            return Ok(Findings::starting_at(self.kind(), 0.5).finish("年龄适宜性良好", "年龄适宜性存在问题"));
        };

        let mut findings = Findings::new(self.kind());
        let expected = parsed.age_range;

        let ages: Vec<u32> = ctx.course.grade_levels()?.into_iter().map(grade_to_age).collect();
        if let (Some(&lo), Some(&hi)) = (ages.iter().min(), ages.iter().max()) {
            if expected.contains(lo) && expected.contains(hi) {
                findings.award(0.8);
            } else {
                findings.flag(
                    format!(
                        "年龄范围不匹配: 期望{}-{}岁, 课程{}-{}岁",
                        expected.min, expected.max, lo, hi
                    ),
                    "调整课程难度和内容以适配正确年龄段",
                );
            }
        }

        if expected.min <= YOUNG_AUDIENCE_MAX_AGE {
            if ctx.course.duration_weeks() > MAX_WEEKS_FOR_YOUNG {
                findings.flag(
                    "课程周期过长，可能超出低年龄段注意力持续时间",
                    "考虑缩短课程周期或分成多个阶段",
                );
            } else {
                findings.award(0.2);
            }
        }

        Ok(findings.finish("年龄适宜性良好", "年龄适宜性存在问题"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RequirementParser;
    use crate::validators::course::CourseView;
    use serde_json::{json, Value};

    fn check(course: &Value, request: Value) -> Result<ValidationResult, RuleError> {
        let parsed = RequirementParser::new().parse(&request);
        let original = json!({});
        let ctx = RuleContext {
            course: CourseView::new(course),
            original: &original,
            parsed: Some(&parsed),
        };
        AgeAppropriateness.check(&ctx)
    }

    #[test]
    fn test_grade_mapping() {
        assert_eq!(grade_to_age(1), 6);
        assert_eq!(grade_to_age(7), 12);
        assert_eq!(grade_to_age(12), 17);
        assert_eq!(grade_to_age(14), 14);
    }

    #[test]
    fn test_matching_grades_and_short_course() {
        let course = json!({"grade_levels": [3, 5, 7], "duration_weeks": 2});
        let result = check(&course, json!({"age_group": {"min": 8, "max": 12}})).unwrap();
        assert!((result.score - 1.0).abs() < 1e-9);
        assert!(result.passed);
    }

    #[test]
    fn test_out_of_range_grades() {
        let course = json!({"grade_levels": [10, 11], "duration_weeks": 12});
        let result = check(&course, json!({"age_group": {"min": 8, "max": 12}})).unwrap();
        assert_eq!(result.score, 0.0);
        assert!(result.message.contains("期望8-12岁, 课程15-16岁"));
        assert_eq!(result.suggestions.len(), 2);
    }

    #[test]
    fn test_older_audience_skips_duration_check() {
        let course = json!({"grade_levels": [10, 12], "duration_weeks": 20});
        let result = check(&course, json!({"age_group": {"min": 15, "max": 18}})).unwrap();
        assert!((result.score - 0.8).abs() < 1e-9);
        assert!(result.passed);
    }

    #[test]
    fn test_non_integer_grade_is_error() {
        let course = json!({"grade_levels": ["三年级"]});
        assert!(check(&course, json!({})).is_err());
    }
}
