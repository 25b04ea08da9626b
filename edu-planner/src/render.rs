//! Plain-text renderings of pipeline outputs
//!
//! Each renderer is a `Display` wrapper so output can go straight to a
//! writer; the free functions are `to_string` shortcuts.

use crate::types::{ParsedRequirement, QualityReport, ScheduleTemplate};
use edu_common::time::minutes_as_hours;
use std::fmt;

/// Suggestions shown per rule in a report summary
const RULE_SUGGESTIONS_SHOWN: usize = 2;
/// Improvement suggestions shown at the end of a report summary
const REPORT_SUGGESTIONS_SHOWN: usize = 5;
/// Activities listed per block in a schedule summary
const BLOCK_ACTIVITIES_SHOWN: usize = 3;

fn write_bullets<T: AsRef<str>>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for item in items {
        writeln!(f, "• {}", item.as_ref())?;
    }
    Ok(())
}

fn percent(score: f64) -> String {
    format!("{:.0}%", score * 100.0)
}

/// Course-design prompt built from a parsed requirement
pub struct RequirementPrompt<'a>(pub &'a ParsedRequirement);

impl fmt::Display for RequirementPrompt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.0;
        let ages = format!("{}-{}岁", p.age_range.min, p.age_range.max);

        writeln!(f, "【精准需求解析结果 - 置信度: {}】", percent(p.confidence_score))?;
        writeln!(f)?;
        writeln!(f, "=== 核心信息 ===")?;
        writeln!(f, "课程主题: {}", p.topic)?;
        writeln!(f, "目标受众: {} ({})", p.audience, p.age_group.label())?;
        writeln!(f, "年龄范围: {}", ages)?;
        writeln!(f, "时间模式: {}", p.time_mode.label())?;
        writeln!(f, "总时长: {}小时", p.total_duration.total_hours)?;
        writeln!(f)?;

        writeln!(f, "=== 学习设计 ===")?;
        writeln!(f, "学习目标:")?;
        write_bullets(f, &p.learning_objectives)?;
        writeln!(f, "目标技能:")?;
        write_bullets(f, &p.target_skills)?;
        writeln!(f, "AI工具集成:")?;
        write_bullets(f, &p.ai_tools)?;
        writeln!(f)?;

        writeln!(f, "=== 成果要求 ===")?;
        writeln!(f, "最终交付物:")?;
        write_bullets(f, &p.final_deliverables)?;
        writeln!(f)?;

        writeln!(f, "=== 约束条件 ===")?;
        match p.class_size {
            Some(n) => writeln!(f, "班级规模: {}人", n)?,
            None => writeln!(f, "班级规模: 小班制")?,
        }
        writeln!(f, "可用设备: {}", p.equipment.join(", "))?;
        writeln!(f, "预算水平: {}", p.budget_level.label())?;
        writeln!(f, "机构环境: {}", p.institution_type.label())?;
        writeln!(f)?;

        writeln!(f, "=== 特殊要求 ===")?;
        if p.special_requirements.is_empty() {
            writeln!(f, "无特殊要求")?;
        } else {
            let json = serde_json::to_string_pretty(&p.special_requirements).map_err(|_| fmt::Error)?;
            writeln!(f, "{}", json)?;
        }
        writeln!(f)?;

        writeln!(f, "【重要提醒】")?;
        writeln!(f, "请严格按照以上解析结果进行课程设计，确保：")?;
        writeln!(f, "1. 年龄适宜性完全匹配 ({})", ages)?;
        writeln!(f, "2. 时间规划精确对应 ({})", p.time_mode.label())?;
        writeln!(f, "3. 最终交付物完全一致")?;
        writeln!(f, "4. 技能培养目标明确")?;
        writeln!(f, "5. AI工具集成充分体现")
    }
}

/// Human-readable schedule overview
pub struct ScheduleSummary<'a>(pub &'a ScheduleTemplate);

impl fmt::Display for ScheduleSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;

        writeln!(f, "【智能时间安排方案】")?;
        writeln!(f)?;
        writeln!(f, "基本信息:")?;
        writeln!(f, "• 模式: {}", s.mode.label())?;
        writeln!(f, "• 年龄范围: {}-{}岁", s.age_range.min, s.age_range.max)?;
        writeln!(f, "• 总时长: {}小时", s.total_duration.effective_total_hours())?;
        if s.is_fallback {
            writeln!(f, "• 备用方案: {}", s.warnings.join("; "))?;
        }
        writeln!(f)?;

        writeln!(f, "时间块分配:")?;
        for (i, block) in s.session_blocks.iter().enumerate() {
            let day = block.day.map(|d| format!("第{}天 ", d)).unwrap_or_default();
            writeln!(
                f,
                "{}. {}{} ({}小时)",
                i + 1,
                day,
                block.phase.label(),
                minutes_as_hours(block.duration_minutes)
            )?;
            let shown = block.activities.len().min(BLOCK_ACTIVITIES_SHOWN);
            writeln!(f, "   活动: {}", block.activities[..shown].join(", "))?;
            writeln!(f, "   AI工具: {}", block.ai_tools.join(", "))?;
        }
        writeln!(f)?;

        if !s.break_schedule.is_empty() {
            writeln!(f, "休息安排:")?;
            for slot in &s.break_schedule {
                writeln!(f, "• 第{}块后休息{}分钟", slot.after_block + 1, slot.duration_minutes)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "灵活性选项:")?;
        write_bullets(f, &s.flexibility_options)
    }
}

/// Human-readable quality report
pub struct ReportSummary<'a>(pub &'a QualityReport);

impl fmt::Display for ReportSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;

        writeln!(f, "【课程质量验证报告】")?;
        writeln!(f)?;
        writeln!(f, "总体评估:")?;
        writeln!(f, "• 综合得分: {}", percent(r.overall_score))?;
        writeln!(f, "• 验证结果: {}", if r.overall_passed { "通过" } else { "未通过" })?;
        writeln!(f, "• 验证时间: {}", r.validated_at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f)?;

        writeln!(f, "详细验证结果:")?;
        for result in &r.validation_results {
            let status = if result.passed { "[通过]" } else { "[未通过]" };
            writeln!(
                f,
                "{} {} ({}) - {}",
                status,
                result.check_name,
                result.level.label(),
                percent(result.score)
            )?;
            writeln!(f, "   {}", result.message)?;
            for suggestion in result.suggestions.iter().take(RULE_SUGGESTIONS_SHOWN) {
                writeln!(f, "   建议: {}", suggestion)?;
            }
        }

        if !r.critical_issues.is_empty() {
            writeln!(f)?;
            writeln!(f, "关键问题:")?;
            write_bullets(f, &r.critical_issues)?;
        }

        if !r.improvement_suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "改进建议:")?;
            let shown = r.improvement_suggestions.len().min(REPORT_SUGGESTIONS_SHOWN);
            write_bullets(f, &r.improvement_suggestions[..shown])?;
        }
        Ok(())
    }
}

pub fn requirement_prompt(parsed: &ParsedRequirement) -> String {
    RequirementPrompt(parsed).to_string()
}

pub fn schedule_summary(schedule: &ScheduleTemplate) -> String {
    ScheduleSummary(schedule).to_string()
}

pub fn quality_report_summary(report: &QualityReport) -> String {
    ReportSummary(report).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RequirementParser;
    use crate::scheduler::TimeScheduler;
    use crate::validators::QualityValidator;
    use serde_json::json;

    #[test]
    fn test_requirement_prompt_sections() {
        let parsed = RequirementParser::new().parse(&json!({
            "topic": "月球生存装备设计",
            "audience": "8-12岁",
            "special_requirements": {"language": "zh"}
        }));
        let prompt = requirement_prompt(&parsed);

        assert!(prompt.contains("课程主题: 月球生存装备设计"));
        assert!(prompt.contains("年龄范围: 8-12岁"));
        assert!(prompt.contains("班级规模: 小班制"));
        assert!(prompt.contains("• 月球装备设计方案"));
        assert!(prompt.contains("\"language\": \"zh\""));
        assert!(prompt.ends_with("5. AI工具集成充分体现\n"));
    }

    #[test]
    fn test_schedule_summary_lists_blocks() {
        let schedule = TimeScheduler::new().create_schedule(
            "工作坊模式",
            (15, 18),
            &crate::types::TotalDuration::hours(6),
            "AI海报",
            &[],
            &[],
        );
        let text = schedule_summary(&schedule);

        assert!(text.contains("• 模式: 工作坊模式"));
        assert!(text.contains("1. 探索阶段"));
        assert!(text.contains("3. 展示阶段"));
        assert!(!text.contains("4. "));
    }

    #[test]
    fn test_report_summary_limits_suggestions() {
        let report = QualityValidator::new().validate_course(&json!({}), &json!({}), None);
        let text = quality_report_summary(&report);

        assert!(text.contains("• 验证结果: 未通过"));
        assert!(text.contains("关键问题:"));
        assert!(text.contains("[通过] feasibility (可选) - 70%"));
        let tail = text.split("改进建议:").nth(1).unwrap();
        assert!(tail.lines().filter(|l| l.starts_with("• ")).count() <= 5);
    }
}
