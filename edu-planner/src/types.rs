//! Shared Types and Data Contracts
//!
//! Defines the explicit contracts between the three pipeline stages:
//! - **Stage 1 output:** `ParsedRequirement` (RequirementParser)
//! - **Stage 2 output:** `ScheduleTemplate` (TimeScheduler)
//! - **Stage 3 output:** `QualityReport` (QualityValidator)
//!
//! Every type is created once per request and never mutated afterwards;
//! regeneration produces a new value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

// ============================================================================
// Audience
// ============================================================================

/// Coarse learner age group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    EarlyChildhood,
    Elementary,
    MiddleSchool,
    HighSchool,
    YoungAdult,
    Adult,
}

impl AgeGroup {
    /// Display label used in prompts and reports
    pub fn label(self) -> &'static str {
        match self {
            Self::EarlyChildhood => "早期儿童 (3-6岁)",
            Self::Elementary => "小学生 (6-12岁)",
            Self::MiddleSchool => "中学生 (12-15岁)",
            Self::HighSchool => "高中生 (15-18岁)",
            Self::YoungAdult => "青年 (18-25岁)",
            Self::Adult => "成年 (25+岁)",
        }
    }

    /// Derive the group from the midpoint of an age range
    ///
    /// Thresholds: ≤6 / ≤12 / ≤15 / ≤18 / ≤25 / above
    pub fn from_range(range: AgeRange) -> Self {
        let midpoint = (range.min as f64 + range.max as f64) / 2.0;
        if midpoint <= 6.0 {
            Self::EarlyChildhood
        } else if midpoint <= 12.0 {
            Self::Elementary
        } else if midpoint <= 15.0 {
            Self::MiddleSchool
        } else if midpoint <= 18.0 {
            Self::HighSchool
        } else if midpoint <= 25.0 {
            Self::YoungAdult
        } else {
            Self::Adult
        }
    }
}

/// Inclusive learner age range in years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

impl AgeRange {
    /// Create range, ordering the bounds
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Width of the range in years
    pub fn span(&self) -> u32 {
        self.max.saturating_sub(self.min)
    }

    pub fn contains(&self, age: u32) -> bool {
        self.min <= age && age <= self.max
    }
}

impl From<(u32, u32)> for AgeRange {
    fn from((a, b): (u32, u32)) -> Self {
        Self::new(a, b)
    }
}

// ============================================================================
// Time planning
// ============================================================================

/// Course delivery pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeMode {
    /// A few consecutive full days
    IntensiveCamp,
    /// Sessions spread over weeks
    Weekly,
    /// A whole school term
    Semester,
    /// A single event
    Workshop,
}

impl TimeMode {
    pub const ALL: [TimeMode; 4] = [
        TimeMode::IntensiveCamp,
        TimeMode::Weekly,
        TimeMode::Semester,
        TimeMode::Workshop,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::IntensiveCamp => "集训营模式",
            Self::Weekly => "周课程模式",
            Self::Semester => "学期课程模式",
            Self::Workshop => "工作坊模式",
        }
    }

    /// snake_case name matching the serde representation
    pub fn name(self) -> &'static str {
        match self {
            Self::IntensiveCamp => "intensive_camp",
            Self::Weekly => "weekly",
            Self::Semester => "semester",
            Self::Workshop => "workshop",
        }
    }

    /// Exact lookup by display label or snake_case name
    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.label() == s || mode.name() == s)
    }
}

/// Requested course length
///
/// `total_hours` may be left at 0 by callers that only know the day/week
/// breakdown; `effective_total_hours` fills it in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalDuration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weeks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_per_day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_per_week: Option<u32>,
    #[serde(default)]
    pub total_hours: u32,
}

/// Total hours assumed when nothing else is known
pub const DEFAULT_TOTAL_HOURS: u32 = 16;

impl TotalDuration {
    /// Camp layout: `days` × `hours_per_day`
    pub fn camp(days: u32, hours_per_day: u32) -> Self {
        Self {
            days: Some(days),
            hours_per_day: Some(hours_per_day),
            total_hours: days.saturating_mul(hours_per_day),
            ..Default::default()
        }
    }

    /// Weekly layout: `weeks` × `hours_per_week`
    pub fn weekly(weeks: u32, hours_per_week: u32) -> Self {
        Self {
            weeks: Some(weeks),
            hours_per_week: Some(hours_per_week),
            total_hours: weeks.saturating_mul(hours_per_week),
            ..Default::default()
        }
    }

    /// Single block of hours with no day/week breakdown
    pub fn hours(total_hours: u32) -> Self {
        Self {
            total_hours,
            ..Default::default()
        }
    }

    /// Total hours, derived from the breakdown when not given explicitly
    pub fn effective_total_hours(&self) -> u32 {
        if self.total_hours > 0 {
            return self.total_hours;
        }
        if let (Some(days), Some(per_day)) = (self.days, self.hours_per_day) {
            let total = days.saturating_mul(per_day);
            if total > 0 {
                return total;
            }
        }
        if let (Some(weeks), Some(per_week)) = (self.weeks, self.hours_per_week) {
            let total = weeks.saturating_mul(per_week);
            if total > 0 {
                return total;
            }
        }
        DEFAULT_TOTAL_HOURS
    }
}

// ============================================================================
// Constraints and environment
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetLevel {
    Ample,
    Moderate,
    Limited,
}

impl BudgetLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Ample => "充足",
            Self::Moderate => "中等",
            Self::Limited => "有限",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "充足" | "ample" | "high" => Some(Self::Ample),
            "中等" | "moderate" | "medium" => Some(Self::Moderate),
            "有限" | "limited" | "low" => Some(Self::Limited),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstitutionType {
    MakerSpace,
    TraditionalSchool,
    TrainingCenter,
    CommunityCenter,
}

impl InstitutionType {
    pub const ALL: [InstitutionType; 4] = [
        InstitutionType::MakerSpace,
        InstitutionType::TraditionalSchool,
        InstitutionType::TrainingCenter,
        InstitutionType::CommunityCenter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::MakerSpace => "创客空间",
            Self::TraditionalSchool => "传统学校",
            Self::TrainingCenter => "培训机构",
            Self::CommunityCenter => "社区中心",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::MakerSpace => "maker_space",
            Self::TraditionalSchool => "traditional_school",
            Self::TrainingCenter => "training_center",
            Self::CommunityCenter => "community_center",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label() == s || t.name() == s)
    }
}

// ============================================================================
// Stage 1 output: ParsedRequirement
// ============================================================================

/// Where a parsed field's value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    /// Read directly from a structured request field
    Explicit,
    /// Derived from free text (regex / keyword tables)
    Inferred,
    /// Compiled default, nothing usable in the request
    Default,
}

/// Non-fatal problem encountered while parsing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseWarning {
    /// A field was present but had an unusable type or value
    Malformed { field: String, reason: String },
    /// Parsing failed internally and the fixed fallback requirement was used
    Fallback { reason: String },
}

/// Canonical course requirement produced by the parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedRequirement {
    pub topic: String,
    pub audience: String,
    pub age_group: AgeGroup,
    pub age_range: AgeRange,
    pub time_mode: TimeMode,
    pub total_duration: TotalDuration,
    pub learning_objectives: Vec<String>,
    pub target_skills: Vec<String>,
    pub ai_tools: Vec<String>,
    pub final_deliverables: Vec<String>,
    pub class_size: Option<u32>,
    pub equipment: Vec<String>,
    pub budget_level: BudgetLevel,
    pub institution_type: InstitutionType,
    pub teaching_context: String,
    pub special_requirements: Map<String, Value>,
    pub parsed_at: DateTime<Utc>,
    /// Structural completeness of the raw request (0.0-1.0)
    pub confidence_score: f64,
    pub validation_passed: bool,
    /// Source of each resolved field, keyed by field name
    pub provenance: BTreeMap<String, FieldSource>,
    pub warnings: Vec<ParseWarning>,
}

impl ParsedRequirement {
    /// Number of fields that fell back to compiled defaults
    pub fn defaulted_field_count(&self) -> usize {
        self.provenance
            .values()
            .filter(|s| **s == FieldSource::Default)
            .count()
    }

    /// True if this is the fixed fallback object
    pub fn is_fallback(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, ParseWarning::Fallback { .. }))
    }
}

// ============================================================================
// Stage 2 output: ScheduleTemplate
// ============================================================================

/// PBL learning phase, in teaching order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningPhase {
    Introduction,
    Exploration,
    Development,
    Synthesis,
    Presentation,
    Reflection,
}

impl LearningPhase {
    pub const ALL: [LearningPhase; 6] = [
        LearningPhase::Introduction,
        LearningPhase::Exploration,
        LearningPhase::Development,
        LearningPhase::Synthesis,
        LearningPhase::Presentation,
        LearningPhase::Reflection,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Introduction => "导入阶段",
            Self::Exploration => "探索阶段",
            Self::Development => "深化阶段",
            Self::Synthesis => "综合阶段",
            Self::Presentation => "展示阶段",
            Self::Reflection => "反思阶段",
        }
    }
}

/// One contiguous block of teaching time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub phase: LearningPhase,
    /// Camp day (1-based); None outside camp mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    pub duration_minutes: u32,
    pub optimal_duration_minutes: u32,
    pub description: String,
    pub activities: Vec<String>,
    pub ai_tools: Vec<String>,
    pub break_after: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakKind {
    /// Short pause (≤5 min)
    FocusBreak,
    /// Longer movement break
    ActiveBreak,
}

/// Break inserted after a session block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakSlot {
    /// Index into `session_blocks`
    pub after_block: usize,
    pub duration_minutes: u32,
    pub kind: BreakKind,
}

/// Summary lines for one day (or the whole course outside camp mode)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySegment {
    pub label: String,
    pub lines: Vec<String>,
}

/// Time schedule produced by the scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTemplate {
    pub mode: TimeMode,
    pub age_range: AgeRange,
    pub total_duration: TotalDuration,
    pub session_blocks: Vec<TimeBlock>,
    pub break_schedule: Vec<BreakSlot>,
    pub daily_structure: Vec<DailySegment>,
    pub flexibility_options: Vec<String>,
    /// True when the fixed 3-block fallback was returned
    pub is_fallback: bool,
    pub warnings: Vec<String>,
}

impl ScheduleTemplate {
    /// Sum of all block durations
    pub fn total_block_minutes(&self) -> u32 {
        self.session_blocks
            .iter()
            .fold(0u32, |acc, b| acc.saturating_add(b.duration_minutes))
    }
}

// ============================================================================
// Stage 3 output: QualityReport
// ============================================================================

/// Rule importance tier; only Critical rules can veto an overall pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationLevel {
    Critical,
    Important,
    Optional,
}

impl ValidationLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "关键",
            Self::Important => "重要",
            Self::Optional => "可选",
        }
    }
}

/// Outcome of one validation rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub check_name: String,
    pub level: ValidationLevel,
    pub passed: bool,
    /// Rule score (0.0-1.0)
    pub score: f64,
    pub message: String,
    pub suggestions: Vec<String>,
    pub details: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub rules_count: usize,
    pub critical_rules_count: usize,
    pub passed_rules_count: usize,
    /// Rules that errored and were excluded from the weighted score
    pub errored_rules: Vec<String>,
}

/// Result of validating a generated course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub report_id: Uuid,
    /// Weighted score (0.0-1.0)
    pub overall_score: f64,
    pub overall_passed: bool,
    pub validation_results: Vec<ValidationResult>,
    pub critical_issues: Vec<String>,
    pub improvement_suggestions: Vec<String>,
    pub validated_at: DateTime<Utc>,
    pub metadata: ReportMetadata,
}
