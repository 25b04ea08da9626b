//! Course quality validation
//!
//! Seven independent rules score a generated course against the original
//! request. Rules are grouped in three tiers:
//!
//! | rule | tier | weight |
//! |---|---|---|
//! | requirement_match | Critical | 0.25 |
//! | age_appropriateness | Critical | 0.20 |
//! | time_allocation | Critical | 0.15 |
//! | content_quality | Important | 0.15 |
//! | ai_integration | Important | 0.10 |
//! | pbl_methodology | Important | 0.10 |
//! | feasibility | Optional | 0.05 |
//!
//! # Scoring
//! - `overall_score = Σ(score × weight) / Σ(weight of rules that ran)`
//! - A rule that errors scores 0, fails, and is left out of the denominator
//! - `overall_passed` needs every Critical rule to pass and
//!   `overall_score ≥ pass_threshold`
//!
//! The Critical weights sum to 0.60, so with the default 0.70 threshold a
//! course cannot pass on Critical rules alone.

mod ai_integration;
mod age_appropriateness;
mod content_quality;
pub mod course;
mod feasibility;
mod pbl_methodology;
mod requirement_match;
mod time_allocation;

use crate::types::{ParsedRequirement, QualityReport, ReportMetadata, ValidationLevel, ValidationResult};
use course::CourseView;
use edu_common::config::ValidatorConfig;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default minimum weighted score for an overall pass
pub const DEFAULT_PASS_THRESHOLD: f64 = 0.7;

/// Failure inside a single rule; isolated to that rule's result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("{field}[{index}] must be {expected}, got {found}")]
    MalformedEntry {
        field: &'static str,
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
}

/// Closed set of validation rules, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    RequirementMatch,
    AgeAppropriateness,
    TimeAllocation,
    ContentQuality,
    AiIntegration,
    PblMethodology,
    Feasibility,
}

impl RuleKind {
    pub const ALL: [RuleKind; 7] = [
        RuleKind::RequirementMatch,
        RuleKind::AgeAppropriateness,
        RuleKind::TimeAllocation,
        RuleKind::ContentQuality,
        RuleKind::AiIntegration,
        RuleKind::PblMethodology,
        RuleKind::Feasibility,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::RequirementMatch => "requirement_match",
            Self::AgeAppropriateness => "age_appropriateness",
            Self::TimeAllocation => "time_allocation",
            Self::ContentQuality => "content_quality",
            Self::AiIntegration => "ai_integration",
            Self::PblMethodology => "pbl_methodology",
            Self::Feasibility => "feasibility",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn level(self) -> ValidationLevel {
        match self {
            Self::RequirementMatch | Self::AgeAppropriateness | Self::TimeAllocation => {
                ValidationLevel::Critical
            }
            Self::ContentQuality | Self::AiIntegration | Self::PblMethodology => {
                ValidationLevel::Important
            }
            Self::Feasibility => ValidationLevel::Optional,
        }
    }

    pub fn default_weight(self) -> f64 {
        match self {
            Self::RequirementMatch => 0.25,
            Self::AgeAppropriateness => 0.20,
            Self::TimeAllocation | Self::ContentQuality => 0.15,
            Self::AiIntegration | Self::PblMethodology => 0.10,
            Self::Feasibility => 0.05,
        }
    }

    /// Minimum rule score for the rule itself to pass
    pub fn pass_score(self) -> f64 {
        match self {
            Self::ContentQuality | Self::PblMethodology => 0.6,
            Self::Feasibility => 0.0,
            _ => 0.7,
        }
    }

    fn rule(self) -> &'static dyn QualityRule {
        match self {
            Self::RequirementMatch => &requirement_match::RequirementMatch,
            Self::AgeAppropriateness => &age_appropriateness::AgeAppropriateness,
            Self::TimeAllocation => &time_allocation::TimeAllocation,
            Self::ContentQuality => &content_quality::ContentQuality,
            Self::AiIntegration => &ai_integration::AiIntegration,
            Self::PblMethodology => &pbl_methodology::PblMethodology,
            Self::Feasibility => &feasibility::Feasibility,
        }
    }
}

/// Inputs shared by every rule
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub course: CourseView<'a>,
    /// Raw request as submitted
    pub original: &'a Value,
    /// Parsed request; rules fall back to flat partial credit without it
    pub parsed: Option<&'a ParsedRequirement>,
}

/// One validation rule
pub trait QualityRule: Send + Sync {
    fn kind(&self) -> RuleKind;

    fn check(&self, ctx: &RuleContext<'_>) -> Result<ValidationResult, RuleError>;
}

/// Score accumulator shared by the rule implementations
#[derive(Debug)]
pub(crate) struct Findings {
    kind: RuleKind,
    score: f64,
    issues: Vec<String>,
    suggestions: Vec<String>,
    details: Map<String, Value>,
}

impl Findings {
    pub fn new(kind: RuleKind) -> Self {
        Self::starting_at(kind, 0.0)
    }

    pub fn starting_at(kind: RuleKind, score: f64) -> Self {
        Self {
            kind,
            score,
            issues: Vec::new(),
            suggestions: Vec::new(),
            details: Map::new(),
        }
    }

    pub fn award(&mut self, points: f64) {
        self.score += points;
    }

    /// Record a problem and the matching fix
    pub fn flag(&mut self, issue: impl Into<String>, suggestion: impl Into<String>) {
        self.issues.push(issue.into());
        self.suggestions.push(suggestion.into());
    }

    pub fn suggest(&mut self, suggestion: impl Into<String>) {
        self.suggestions.push(suggestion.into());
    }

    pub fn detail(&mut self, key: &str, value: Value) {
        self.details.insert(key.to_string(), value);
    }

    /// Build the result; `problem` prefixes the joined issues on failure
    pub fn finish(mut self, ok: &str, problem: &str) -> ValidationResult {
        let score = self.score.clamp(0.0, 1.0);
        let passed = score + 1e-9 >= self.kind.pass_score();
        let message = if passed {
            ok.to_string()
        } else if self.issues.is_empty() {
            problem.to_string()
        } else {
            format!("{}: {}", problem, self.issues.join("; "))
        };
        self.details.insert("issues".to_string(), json!(self.issues));

        ValidationResult {
            check_name: self.kind.name().to_string(),
            level: self.kind.level(),
            passed,
            score,
            message,
            suggestions: self.suggestions,
            details: Value::Object(self.details),
        }
    }
}

/// Scores generated courses against their requests
#[derive(Debug, Clone)]
pub struct QualityValidator {
    pass_threshold: f64,
    weights: BTreeMap<RuleKind, f64>,
    disabled: Vec<RuleKind>,
}

impl Default for QualityValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityValidator {
    /// Validator with default weights and a 0.70 pass threshold
    pub fn new() -> Self {
        Self {
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            weights: RuleKind::ALL.iter().map(|k| (*k, k.default_weight())).collect(),
            disabled: Vec::new(),
        }
    }

    /// Validator with a custom pass threshold and default weights
    pub fn with_threshold(pass_threshold: f64) -> Self {
        Self {
            pass_threshold,
            ..Self::new()
        }
    }

    /// Apply `[validator]` settings; unknown rule names are ignored with a warning
    pub fn with_config(config: &ValidatorConfig) -> Self {
        let mut validator = Self::with_threshold(config.pass_threshold);

        for (name, weight) in &config.weights {
            match RuleKind::from_name(name) {
                Some(kind) => {
                    validator.weights.insert(kind, *weight);
                }
                None => warn!(rule = %name, "Ignoring weight for unknown validation rule"),
            }
        }
        for name in &config.disabled_rules {
            match RuleKind::from_name(name) {
                Some(kind) => validator.disabled.push(kind),
                None => warn!(rule = %name, "Ignoring unknown disabled validation rule"),
            }
        }

        let critical_share = validator.critical_weight_share();
        if validator.pass_threshold > critical_share {
            warn!(
                pass_threshold = validator.pass_threshold,
                critical_share = critical_share,
                "Pass threshold exceeds the critical weight share; critical rules alone cannot pass a course"
            );
        }
        validator
    }

    pub fn pass_threshold(&self) -> f64 {
        self.pass_threshold
    }

    pub fn weight(&self, kind: RuleKind) -> f64 {
        self.weights.get(&kind).copied().unwrap_or(0.0)
    }

    fn enabled(&self, kind: RuleKind) -> bool {
        !self.disabled.contains(&kind)
    }

    /// Share of the enabled weight held by Critical rules
    pub fn critical_weight_share(&self) -> f64 {
        let enabled = RuleKind::ALL.into_iter().filter(|k| self.enabled(*k));
        let (critical, total) = enabled.fold((0.0, 0.0), |(c, t), kind| {
            let w = self.weight(kind);
            if kind.level() == ValidationLevel::Critical {
                (c + w, t + w)
            } else {
                (c, t + w)
            }
        });
        if total > 0.0 {
            critical / total
        } else {
            0.0
        }
    }

    /// Run every enabled rule and aggregate; never fails
    pub fn validate_course(
        &self,
        course: &Value,
        original: &Value,
        parsed: Option<&ParsedRequirement>,
    ) -> QualityReport {
        info!(
            parsed_available = parsed.is_some(),
            "Validating generated course"
        );

        let ctx = RuleContext {
            course: CourseView::new(course),
            original,
            parsed,
        };
        let results = RuleKind::ALL
            .into_iter()
            .filter(|kind| self.enabled(*kind))
            .map(|kind| self.run_rule(kind, &ctx))
            .collect();

        let report = self.aggregate(results);
        info!(
            overall_score = report.overall_score,
            overall_passed = report.overall_passed,
            critical_issues = report.critical_issues.len(),
            "Course validation complete"
        );
        report
    }

    fn run_rule(&self, kind: RuleKind, ctx: &RuleContext<'_>) -> ValidationResult {
        match kind.rule().check(ctx) {
            Ok(result) => {
                debug!(
                    rule = kind.name(),
                    score = result.score,
                    passed = result.passed,
                    "Validation rule evaluated"
                );
                result
            }
            Err(e) => {
                warn!(rule = kind.name(), error = %e, "Validation rule failed");
                errored_result(kind, &e)
            }
        }
    }

    /// Combine rule results into a report
    ///
    /// Results whose `details` carry an `error` key are counted as errored
    /// and excluded from the weighted average. Results with unknown check
    /// names carry no weight.
    pub fn aggregate(&self, results: Vec<ValidationResult>) -> QualityReport {
        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        let mut errored_rules = Vec::new();

        for result in &results {
            if result.details.get("error").is_some() {
                errored_rules.push(result.check_name.clone());
                continue;
            }
            let weight = RuleKind::from_name(&result.check_name)
                .map(|kind| self.weight(kind))
                .unwrap_or(0.0);
            weighted += result.score * weight;
            total_weight += weight;
        }

        let overall_score = if total_weight > 0.0 {
            (weighted / total_weight).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let critical: Vec<&ValidationResult> = results
            .iter()
            .filter(|r| r.level == ValidationLevel::Critical)
            .collect();
        let overall_passed =
            critical.iter().all(|r| r.passed) && overall_score >= self.pass_threshold;

        let critical_issues = critical
            .iter()
            .filter(|r| !r.passed)
            .map(|r| format!("{}: {}", r.check_name, r.message))
            .collect();
        let improvement_suggestions = results
            .iter()
            .flat_map(|r| r.suggestions.iter().cloned())
            .collect();

        let metadata = ReportMetadata {
            rules_count: results.len(),
            critical_rules_count: critical.len(),
            passed_rules_count: results.iter().filter(|r| r.passed).count(),
            errored_rules,
        };

        QualityReport {
            report_id: edu_common::time::new_id(),
            overall_score,
            overall_passed,
            validation_results: results,
            critical_issues,
            improvement_suggestions,
            validated_at: edu_common::time::now(),
            metadata,
        }
    }
}

fn errored_result(kind: RuleKind, error: &RuleError) -> ValidationResult {
    ValidationResult {
        check_name: kind.name().to_string(),
        level: kind.level(),
        passed: false,
        score: 0.0,
        message: format!("验证执行失败: {}", error),
        suggestions: vec!["需要技术团队检查验证逻辑".to_string()],
        details: json!({ "error": error.to_string() }),
    }
}
