//! PBL methodology (Important)
//!
//! - A driving question that is not the stock placeholder: 0.3
//! - More than one final product: 0.3
//! - Both formative and summative assessments: 0.4

use super::{Findings, QualityRule, RuleContext, RuleError, RuleKind};
use crate::types::ValidationResult;
use serde_json::Value;

/// Placeholder question produced when no real one was designed
const GENERIC_DRIVING_QUESTIONS: &[&str] = &["如何运用所学知识解决真实世界的问题？"];

pub struct PblMethodology;

impl QualityRule for PblMethodology {
    fn kind(&self) -> RuleKind {
        RuleKind::PblMethodology
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<ValidationResult, RuleError> {
        let mut findings = Findings::new(self.kind());
        let course = &ctx.course;

        let question = course.driving_question();
        if !question.is_empty() && !GENERIC_DRIVING_QUESTIONS.contains(&question) {
            findings.award(0.3);
        } else {
            findings.flag("缺乏具体的驱动问题", "设计与主题相关的具体驱动问题");
        }

        if course.final_product_count() > 1 {
            findings.award(0.3);
        } else {
            findings.flag("项目成果设计不充分", "设计多样化的项目成果展示方式");
        }

        let assessments = course.assessments()?;
        let has_type = |kind: &str| {
            assessments
                .iter()
                .any(|a| a.get("type").and_then(Value::as_str) == Some(kind))
        };
        if has_type("formative") && has_type("summative") {
            findings.award(0.4);
        } else {
            findings.flag("评估方式不够多元化", "结合过程性评价和终结性评价");
        }

        Ok(findings.finish("PBL方法论应用良好", "PBL方法论应用需要改进"))
    }
}
