//! Feasibility (Optional)
//!
//! Not derivable from the course document alone; always passes at 0.7
//! with standing rollout advice.

use super::{Findings, QualityRule, RuleContext, RuleError, RuleKind};
use crate::types::ValidationResult;

const BASE_SCORE: f64 = 0.7;

const ROLLOUT_ADVICE: &[&str] = &[
    "建议在实施前进行小规模试点",
    "准备备选方案应对技术问题",
    "确保教师具备必要的技能支持",
];

pub struct Feasibility;

impl QualityRule for Feasibility {
    fn kind(&self) -> RuleKind {
        RuleKind::Feasibility
    }

    fn check(&self, _ctx: &RuleContext<'_>) -> Result<ValidationResult, RuleError> {
        let mut findings = Findings::starting_at(self.kind(), BASE_SCORE);
        for advice in ROLLOUT_ADVICE {
            findings.suggest(*advice);
        }
        Ok(findings.finish("课程具有良好的可实施性", "课程可实施性存在问题"))
    }
}
