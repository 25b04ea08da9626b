//! PBL phase allocation and per-phase activity / tool catalogs

use super::age_params::AgeParams;
use crate::text::contains_all;
use crate::types::{LearningPhase, TimeBlock};

/// Share of focus time per phase, in per-mille (sums to 1000)
pub const PHASE_RATIOS: [(LearningPhase, u32); 6] = [
    (LearningPhase::Introduction, 100),
    (LearningPhase::Exploration, 250),
    (LearningPhase::Development, 350),
    (LearningPhase::Synthesis, 200),
    (LearningPhase::Presentation, 80),
    (LearningPhase::Reflection, 20),
];

fn base_activities(phase: LearningPhase) -> &'static [&'static str] {
    match phase {
        LearningPhase::Introduction => &["主题导入和问题提出", "兴趣激发活动", "背景知识建构", "团队组建"],
        LearningPhase::Exploration => &["问题分析和拆解", "资料调研", "初步方案探讨", "可行性分析"],
        LearningPhase::Development => &["核心技能学习", "方案深化设计", "原型制作", "测试和改进"],
        LearningPhase::Synthesis => &["方案整合优化", "成果完善", "质量检验", "准备展示"],
        LearningPhase::Presentation => &["成果展示", "同伴评议", "专家点评", "经验分享"],
        LearningPhase::Reflection => &["学习反思", "过程总结", "改进建议", "未来规划"],
    }
}

fn base_tools(phase: LearningPhase) -> &'static [&'static str] {
    match phase {
        LearningPhase::Introduction => &["ChatGPT问答", "Claude文档整理"],
        LearningPhase::Exploration => &["研究助手AI", "信息整理工具"],
        LearningPhase::Development => &["3D建模AI", "代码生成助手", "创作AI工具"],
        LearningPhase::Synthesis => &["文档AI", "演示制作工具"],
        LearningPhase::Presentation => &["演示AI助手", "反馈收集工具"],
        LearningPhase::Reflection => &["反思AI导师", "学习分析工具"],
    }
}

/// Topic keywords (all must match) → extra development activities
static TOPIC_ACTIVITIES: &[(&[&str], &[&str])] = &[(
    &["月球", "装备"],
    &["月球环境研究", "装备3D建模", "AI动画制作", "虚实融合视频创作"],
)];

/// Skill tag → (phases, extra tool)
static SKILL_TOOLS: &[(&str, &[LearningPhase], &str)] = &[
    (
        "3d建模",
        &[LearningPhase::Development, LearningPhase::Synthesis],
        "Blender AI插件",
    ),
    ("ai动画", &[LearningPhase::Development], "Runway AI视频"),
];

pub fn activities(phase: LearningPhase, topic: &str) -> Vec<String> {
    let mut out: Vec<String> = base_activities(phase).iter().map(|s| s.to_string()).collect();
    if phase == LearningPhase::Development {
        for (keywords, extra) in TOPIC_ACTIVITIES {
            if contains_all(topic, keywords) {
                out.extend(extra.iter().map(|s| s.to_string()));
            }
        }
    }
    out
}

pub fn ai_tools(phase: LearningPhase, skills: &[String]) -> Vec<String> {
    let mut out: Vec<String> = base_tools(phase).iter().map(|s| s.to_string()).collect();
    for (skill, phases, tool) in SKILL_TOOLS {
        if phases.contains(&phase) && skills.iter().any(|s| s == skill) {
            out.push(tool.to_string());
        }
    }
    out
}

/// Split `focus_minutes_total` across the six phases, one block each
pub fn allocate(
    focus_minutes_total: u32,
    params: &AgeParams,
    topic: &str,
    skills: &[String],
) -> Vec<TimeBlock> {
    PHASE_RATIOS
        .iter()
        .map(|&(phase, permille)| {
            let duration = (u64::from(focus_minutes_total) * u64::from(permille) / 1000) as u32;
            TimeBlock {
                phase,
                day: None,
                duration_minutes: duration,
                optimal_duration_minutes: duration,
                description: format!("{} - {}专项", phase.label(), topic),
                activities: activities(phase, topic),
                ai_tools: ai_tools(phase, skills),
                break_after: duration > params.focus_minutes,
            }
        })
        .collect()
}
