//! Fixed keyword and pattern tables used by the requirement parser
//!
//! All tables are immutable and built once on first use.

use crate::text::KeywordMatcher;
use crate::types::AgeGroup;
use crate::types::InstitutionType;
use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// Age
// ============================================================================

/// Age range assumed when the request says nothing usable
pub const DEFAULT_AGE_MIN: u32 = 10;
pub const DEFAULT_AGE_MAX: u32 = 15;

/// "8-12岁", "8到12岁", "8 ~ 12 years"
pub static AGE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:-|到|至|~|～)\s*(\d+)\s*(?:岁|years?)").expect("valid age range pattern")
});

/// "10岁", "10 years old"
pub static AGE_SINGLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:岁|years?\s+old)").expect("valid single age pattern")
});

/// School-stage keywords → (group, min, max), checked in order
pub static AGE_CATEGORIES: &[(&[&str], AgeGroup, u32, u32)] = &[
    (&["小学", "elementary", "primary school"], AgeGroup::Elementary, 6, 12),
    (&["中学", "初中", "middle school"], AgeGroup::MiddleSchool, 12, 15),
    (&["高中", "high school"], AgeGroup::HighSchool, 15, 18),
    (&["幼儿", "学前", "preschool", "kindergarten"], AgeGroup::EarlyChildhood, 3, 6),
];

// ============================================================================
// Time
// ============================================================================

pub const DEFAULT_CAMP_HOURS_PER_DAY: u32 = 6;
pub const DEFAULT_CAMP_DAYS: u32 = 3;
pub const DEFAULT_WEEKLY_HOURS: u32 = 4;
pub const DEFAULT_WEEKS: u32 = 4;
pub const SEMESTER_WEEKS: u32 = 18;
pub const SEMESTER_WEEKLY_HOURS: u32 = 2;
pub const WORKSHOP_HOURS: u32 = 6;

pub static CAMP_KEYWORDS: &[&str] = &["集训", "训练营", "夏令营", "冬令营", "camp"];
pub static SEMESTER_KEYWORDS: &[&str] = &["学期", "semester"];
pub static WORKSHOP_KEYWORDS: &[&str] = &["工作坊", "单次", "一次性", "workshop"];

/// "5天", "5 days"
pub static DAY_COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:天|days?)").expect("valid day count pattern"));

/// "8周", "8 weeks"
pub static WEEK_COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:周|weeks?)").expect("valid week count pattern"));

// ============================================================================
// Skills and AI tools
// ============================================================================

/// Canonical skill tag → surface synonyms
pub static SKILL_KEYWORDS: &[(&str, &[&str])] = &[
    ("3d建模", &["3D建模", "blender", "fusion360", "立体建模", "三维建模"]),
    ("3d打印", &["3D打印", "打印机", "3d printer", "立体打印"]),
    ("ai动画", &["AI动画", "ai视频", "虚实融合", "动画制作", "ai生成视频"]),
    ("创新思维", &["创新思维", "创造力", "想象力", "创意思维"]),
    ("ai协作", &["AI协作", "人机协作", "AI对话", "智能助手"]),
    ("科学探索", &["科学探索", "科学实验", "探索精神", "科学思维"]),
    ("问题解决", &["问题解决", "解决问题", "problem solving"]),
];

/// Canonical AI tool tag → surface synonyms
pub static AI_TOOL_KEYWORDS: &[(&str, &[&str])] = &[
    ("chatgpt", &["chatgpt", "gpt", "对话ai"]),
    ("claude", &["claude", "anthropic"]),
    ("midjourney", &["midjourney", "mj", "图像生成"]),
    ("stable_diffusion", &["stable diffusion", "sd", "ai绘图"]),
    ("runway", &["runway", "ai视频"]),
    ("blender_ai", &["blender", "3d建模ai"]),
];

pub static SKILL_MATCHER: Lazy<KeywordMatcher> = Lazy::new(|| KeywordMatcher::new(SKILL_KEYWORDS));
pub static AI_TOOL_MATCHER: Lazy<KeywordMatcher> =
    Lazy::new(|| KeywordMatcher::new(AI_TOOL_KEYWORDS));

pub static DEFAULT_SKILLS: &[&str] = &["问题解决", "创新思维", "协作沟通"];
pub static DEFAULT_AI_TOOLS: &[&str] = &["chatgpt", "claude"];

// ============================================================================
// Objectives and deliverables
// ============================================================================

pub static DEFAULT_OBJECTIVES: &[&str] = &["培养创新思维和实践能力", "掌握AI时代核心技能"];

/// Topic keywords (all must match) → implied deliverables
pub static TOPIC_DELIVERABLES: &[(&[&str], &[&str])] = &[(
    &["月球", "装备"],
    &["月球装备设计方案", "3D打印装备实物", "AI动画展示视频", "装备使用说明书"],
)];

pub static DEFAULT_DELIVERABLES: &[&str] = &["项目报告", "作品展示", "学习反思"];

// ============================================================================
// Constraints and environment
// ============================================================================

pub static DEFAULT_EQUIPMENT: &[&str] = &["计算机", "网络连接"];

/// Request keys that may carry the class size, in priority order
pub static CLASS_SIZE_KEYS: &[&str] = &["class_size", "participant_count", "students_count", "size"];

/// Request keys that may carry the deliverable list, in priority order
pub static DELIVERABLE_KEYS: &[&str] = &["final_deliverables", "deliverables", "outputs"];

/// Context keywords → institution type, checked in order
pub static INSTITUTION_KEYWORDS: &[(InstitutionType, &[&str])] = &[
    (InstitutionType::MakerSpace, &["创客", "maker"]),
    (InstitutionType::TraditionalSchool, &["学校", "中学", "小学", "高中", "school"]),
    (InstitutionType::TrainingCenter, &["培训", "训练营", "夏令营", "冬令营"]),
];

pub const DEFAULT_TEACHING_CONTEXT: &str = "项目制学习环境";
pub const DEFAULT_TOPIC: &str = "未指定主题";
pub const DEFAULT_AUDIENCE: &str = "未指定受众";

pub(crate) fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
