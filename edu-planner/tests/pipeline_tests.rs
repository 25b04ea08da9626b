//! End-to-end tests: request → parsed requirement → schedule → quality report

use edu_planner::types::{FieldSource, LearningPhase};
use edu_planner::{
    render, AgeRange, QualityValidator, RequirementParser, RuleKind, TimeMode, TimeScheduler,
    ValidationResult,
};
use serde_json::{json, Value};

fn moon_camp_request() -> Value {
    json!({
        "topic": "月球生存装备设计",
        "audience": "8-12岁小学生",
        "duration": {"days": 3, "hours_per_day": 6},
        "context": "暑期集训营，学生自带平板",
        "class_size": 20
    })
}

fn rule<'a>(results: &'a [ValidationResult], kind: RuleKind) -> &'a ValidationResult {
    results
        .iter()
        .find(|r| r.check_name == kind.name())
        .expect("rule result present")
}

#[test]
fn test_camp_request_through_all_stages() {
    let request = moon_camp_request();
    let parsed = RequirementParser::new().parse(&request);

    assert_eq!(parsed.time_mode, TimeMode::IntensiveCamp);
    assert_eq!(parsed.age_range, AgeRange { min: 8, max: 12 });
    assert_eq!(parsed.total_duration.total_hours, 18);
    assert_eq!(parsed.class_size, Some(20));
    assert_eq!(parsed.provenance["age_range"], FieldSource::Inferred);
    assert!(parsed.validation_passed);

    let schedule = TimeScheduler::new().schedule_for(&parsed);
    assert!(!schedule.is_fallback);
    assert_eq!(schedule.session_blocks.len(), 18);
    assert_eq!(schedule.daily_structure.len(), 3);
    for day in 1..=3 {
        let minutes: u32 = schedule
            .session_blocks
            .iter()
            .filter(|b| b.day == Some(day))
            .map(|b| b.duration_minutes)
            .sum();
        assert_eq!(minutes, 270, "day {}", day);
    }

    let course = json!({
        "title": "月球生存装备设计营",
        "final_products": parsed.final_deliverables,
        "grade_levels": [3, 5, 7],
        "duration_weeks": 1,
        "duration_hours": 18
    });
    let report = QualityValidator::new().validate_course(&course, &request, Some(&parsed));

    assert_eq!(report.validation_results.len(), 7);
    let age = rule(&report.validation_results, RuleKind::AgeAppropriateness);
    assert!((age.score - 1.0).abs() < 1e-9);
    let time = rule(&report.validation_results, RuleKind::TimeAllocation);
    assert!((time.score - 1.0).abs() < 1e-9);
    assert!((0.0..=1.0).contains(&report.overall_score));
}

#[test]
fn test_workshop_request_keeps_three_phases() {
    let parsed = RequirementParser::new().parse(&json!({
        "topic": "AI海报设计",
        "audience": "高中生",
        "context": "周末工作坊"
    }));
    assert_eq!(parsed.time_mode, TimeMode::Workshop);
    assert_eq!(parsed.total_duration.total_hours, 6);

    let schedule = TimeScheduler::new().schedule_for(&parsed);
    let phases: Vec<LearningPhase> = schedule.session_blocks.iter().map(|b| b.phase).collect();
    assert_eq!(
        phases,
        vec![
            LearningPhase::Exploration,
            LearningPhase::Development,
            LearningPhase::Presentation
        ]
    );
}

#[test]
fn test_wide_age_range_uses_averaged_focus() {
    let parsed = RequirementParser::new().parse(&json!({
        "topic": "校园植物图鉴",
        "age_group": {"min": 6, "max": 15},
        "duration": {"weeks": 2, "hours_per_week": 5}
    }));
    let schedule = TimeScheduler::new().schedule_for(&parsed);

    // 600 minutes less a 0.225 break ratio
    let focus: u32 = schedule.session_blocks.iter().map(|b| b.duration_minutes).sum();
    assert!(focus <= 465 && focus >= 460, "focus {}", focus);
    assert!(schedule
        .session_blocks
        .iter()
        .filter(|b| b.duration_minutes > 30)
        .all(|b| b.break_after));
}

#[test]
fn test_inverted_age_range_is_repaired_not_discarded() {
    let parsed = RequirementParser::new().parse(&json!({
        "topic": "机器人",
        "goals": ["搭建机械臂"],
        "age_group": {"min": 14, "max": 9},
        "duration": {"days": 5, "hours_per_day": 6}
    }));
    assert!(!parsed.is_fallback());
    assert_eq!(parsed.age_range, AgeRange { min: 9, max: 14 });
    assert_eq!(parsed.learning_objectives, vec!["搭建机械臂".to_string()]);

    let schedule = TimeScheduler::new().schedule_for(&parsed);
    assert!(!schedule.is_fallback);
    assert_eq!(schedule.mode, TimeMode::IntensiveCamp);
    assert_eq!(schedule.daily_structure.len(), 5);
}

#[test]
fn test_summaries_render_for_every_stage() {
    let request = moon_camp_request();
    let parsed = RequirementParser::new().parse(&request);
    let schedule = TimeScheduler::new().schedule_for(&parsed);
    let report = QualityValidator::new().validate_course(&json!({}), &request, Some(&parsed));

    assert!(render::requirement_prompt(&parsed).contains("集训营模式"));
    assert!(render::schedule_summary(&schedule).contains("第3天"));
    assert!(render::quality_report_summary(&report).contains("requirement_match"));
}
