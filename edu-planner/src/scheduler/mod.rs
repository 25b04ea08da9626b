//! Time scheduler: age- and mode-aware PBL session plan
//!
//! Builds one block per learning phase from the focus time left after
//! age-dependent breaks, then reshapes the blocks for the delivery mode
//! (workshop subset, camp days). Internal failures degrade to a fixed
//! three-block schedule.

pub mod age_params;
pub mod breaks;
pub mod camp;
pub mod phases;

use crate::types::{
    AgeRange, BreakKind, BreakSlot, DailySegment, LearningPhase, ParsedRequirement,
    ScheduleTemplate, TimeBlock, TimeMode, TotalDuration,
};
use age_params::AgeParams;
use camp::CampDays;
use edu_common::config::SchedulerConfig;
use edu_common::time::minutes_as_hours;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default camp layout when the duration does not say
pub const DEFAULT_CAMP_DAYS: u32 = 3;
pub const DEFAULT_CAMP_HOURS_PER_DAY: u32 = 6;

/// Longest camp the scheduler will lay out day by day
pub const MAX_CAMP_DAYS: u32 = 366;

/// Phases kept in workshop mode
const WORKSHOP_PHASES: [LearningPhase; 3] = [
    LearningPhase::Exploration,
    LearningPhase::Development,
    LearningPhase::Presentation,
];

/// Internal scheduling failure that switches to the fallback schedule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("camp has zero days")]
    NoCampDays,

    #[error("camp of {0} days exceeds the {max} day limit", max = MAX_CAMP_DAYS)]
    TooManyCampDays(u32),

    #[error("no focus time to distribute")]
    NoFocusTime,

    #[error("{total_hours} hours does not fit in a minute count")]
    DurationTooLarge { total_hours: u32 },

    #[error("camp redistribution over {days} days produced no blocks")]
    EmptyCamp { days: u32 },
}

/// Builds `ScheduleTemplate`s; cheap to clone and safe to share
#[derive(Debug, Clone)]
pub struct TimeScheduler {
    reconcile_camp_remainder: bool,
}

impl Default for TimeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeScheduler {
    pub fn new() -> Self {
        Self::with_config(&SchedulerConfig::default())
    }

    pub fn with_config(config: &SchedulerConfig) -> Self {
        Self {
            reconcile_camp_remainder: config.reconcile_camp_remainder,
        }
    }

    /// Schedule a parsed requirement
    pub fn schedule_for(&self, parsed: &ParsedRequirement) -> ScheduleTemplate {
        self.create_schedule(
            parsed.time_mode.label(),
            (parsed.age_range.min, parsed.age_range.max),
            &parsed.total_duration,
            &parsed.topic,
            &parsed.target_skills,
            &parsed.final_deliverables,
        )
    }

    /// Build a schedule; never fails
    ///
    /// `mode` is a mode label (集训营模式 ...) or snake_case name; anything
    /// else schedules as a weekly course. `deliverables` are accepted for
    /// call-site symmetry with the parser output and do not affect timing.
    pub fn create_schedule(
        &self,
        mode: &str,
        age_range: (u32, u32),
        total_duration: &TotalDuration,
        topic: &str,
        skills: &[String],
        deliverables: &[String],
    ) -> ScheduleTemplate {
        let range = AgeRange::from(age_range);
        info!(
            mode = %mode,
            min_age = range.min,
            max_age = range.max,
            deliverables = deliverables.len(),
            "Creating schedule"
        );

        let time_mode = TimeMode::from_label(mode).unwrap_or_else(|| {
            debug!(mode = %mode, "Unknown time mode, scheduling as weekly course");
            TimeMode::Weekly
        });

        match self.try_schedule(time_mode, range, total_duration, topic, skills) {
            Ok(schedule) => {
                info!(
                    mode = schedule.mode.name(),
                    blocks = schedule.session_blocks.len(),
                    breaks = schedule.break_schedule.len(),
                    total_minutes = schedule.total_block_minutes(),
                    "Schedule created"
                );
                schedule
            }
            Err(e) => {
                warn!(error = %e, "Scheduling failed, using fallback schedule");
                fallback(range, total_duration, &e)
            }
        }
    }

    fn try_schedule(
        &self,
        mode: TimeMode,
        range: AgeRange,
        total_duration: &TotalDuration,
        topic: &str,
        skills: &[String],
    ) -> Result<ScheduleTemplate, ScheduleError> {
        let params = age_params::resolve(range);
        let total_hours = total_duration.effective_total_hours();
        let total_minutes = total_hours
            .checked_mul(60)
            .ok_or(ScheduleError::DurationTooLarge { total_hours })?;
        let focus_minutes = focus_time(total_minutes, params.break_ratio);
        if focus_minutes == 0 {
            return Err(ScheduleError::NoFocusTime);
        }

        let blocks = phases::allocate(focus_minutes, &params, topic, skills);
        let (session_blocks, camp_days) = self.adapt_for_mode(blocks, mode, &params, total_duration)?;

        let break_schedule = breaks::schedule(&session_blocks, params.focus_minutes);
        let daily_structure = daily_structure(&session_blocks, camp_days);
        let flexibility_options = flexibility_options(mode, range);

        Ok(ScheduleTemplate {
            mode,
            age_range: range,
            total_duration: total_duration.clone(),
            session_blocks,
            break_schedule,
            daily_structure,
            flexibility_options,
            is_fallback: false,
            warnings: Vec::new(),
        })
    }

    /// Returns the reshaped blocks and, for camps, the day count
    fn adapt_for_mode(
        &self,
        blocks: Vec<TimeBlock>,
        mode: TimeMode,
        params: &AgeParams,
        total_duration: &TotalDuration,
    ) -> Result<(Vec<TimeBlock>, Option<u32>), ScheduleError> {
        match mode {
            TimeMode::Weekly | TimeMode::Semester => Ok((blocks, None)),
            TimeMode::Workshop => Ok((
                blocks
                    .into_iter()
                    .filter(|b| WORKSHOP_PHASES.contains(&b.phase))
                    .collect(),
                None,
            )),
            TimeMode::IntensiveCamp => {
                let days = total_duration.days.unwrap_or(DEFAULT_CAMP_DAYS);
                if days > MAX_CAMP_DAYS {
                    return Err(ScheduleError::TooManyCampDays(days));
                }
                let hours_per_day = total_duration
                    .hours_per_day
                    .unwrap_or(DEFAULT_CAMP_HOURS_PER_DAY);
                let camp_hours = days.saturating_mul(hours_per_day);
                if camp_hours.checked_mul(60).is_none() {
                    return Err(ScheduleError::DurationTooLarge {
                        total_hours: camp_hours,
                    });
                }
                let camp = CampDays::new(days, hours_per_day, params.break_ratio);
                let blocks = camp::distribute(&blocks, camp, self.reconcile_camp_remainder)?;
                Ok((blocks, Some(days)))
            }
        }
    }
}

/// Minutes left for teaching after breaks
fn focus_time(total_minutes: u32, break_ratio: f64) -> u32 {
    (total_minutes as f64 * (1.0 - break_ratio) + 1e-6).floor() as u32
}

fn summary_line(block: &TimeBlock) -> String {
    format!(
        "{}: {}小时",
        block.phase.label(),
        minutes_as_hours(block.duration_minutes)
    )
}

fn daily_structure(blocks: &[TimeBlock], camp_days: Option<u32>) -> Vec<DailySegment> {
    match camp_days {
        Some(days) => (1..=days)
            .map(|day| DailySegment {
                label: format!("第{}天", day),
                lines: blocks
                    .iter()
                    .filter(|b| b.day == Some(day))
                    .map(summary_line)
                    .collect(),
            })
            .collect(),
        None => vec![DailySegment {
            label: "标准课时".to_string(),
            lines: blocks.iter().map(summary_line).collect(),
        }],
    }
}

fn flexibility_options(mode: TimeMode, range: AgeRange) -> Vec<String> {
    let mut options = vec![
        "可根据学生兴趣动态调整时间分配",
        "支持个性化学习进度安排",
        "提供快慢班分层教学方案",
    ];
    if mode == TimeMode::IntensiveCamp {
        options.extend(["支持半天/全天灵活安排", "可插入户外活动时间", "应急时间预留方案"]);
    }
    if range.span() > 5 {
        options.push("提供年龄分组的差异化时间安排");
    }
    options.into_iter().map(String::from).collect()
}

/// Fixed three-block weekly schedule (10% / 70% / 20% of total hours)
fn fallback(range: AgeRange, total_duration: &TotalDuration, error: &ScheduleError) -> ScheduleTemplate {
    let total_minutes = total_duration.effective_total_hours() as f64 * 60.0;
    let share = |ratio: f64| (total_minutes * ratio + 1e-6).floor() as u32;

    let block = |phase, ratio, description: &str, activities: &[&str], tool: &str, break_after| {
        let minutes = share(ratio);
        TimeBlock {
            phase,
            day: None,
            duration_minutes: minutes,
            optimal_duration_minutes: minutes,
            description: description.to_string(),
            activities: activities.iter().map(|s| s.to_string()).collect(),
            ai_tools: vec![tool.to_string()],
            break_after,
        }
    };

    let session_blocks = vec![
        block(LearningPhase::Introduction, 0.1, "课程导入", &["问题导入", "兴趣激发"], "ChatGPT", false),
        block(LearningPhase::Development, 0.7, "核心学习", &["技能学习", "项目制作"], "AI创作工具", true),
        block(LearningPhase::Presentation, 0.2, "成果展示", &["作品展示", "学习总结"], "演示工具", false),
    ];
    let daily_structure = vec![DailySegment {
        label: "标准安排".to_string(),
        lines: session_blocks.iter().map(summary_line).collect(),
    }];

    ScheduleTemplate {
        mode: TimeMode::Weekly,
        age_range: range,
        total_duration: total_duration.clone(),
        session_blocks,
        break_schedule: vec![BreakSlot {
            after_block: 1,
            duration_minutes: 15,
            kind: BreakKind::ActiveBreak,
        }],
        daily_structure,
        flexibility_options: vec!["支持灵活时间调整".to_string()],
        is_fallback: true,
        warnings: vec![error.to_string()],
    }
}
