//! Intensive camp: spread the six phase blocks over consecutive days

use super::ScheduleError;
use crate::types::TimeBlock;
use tracing::debug;

/// Per-day layout of a camp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampDays {
    pub days: u32,
    /// Focus minutes available each day after breaks
    pub daily_focus_minutes: u32,
}

impl CampDays {
    pub fn new(days: u32, hours_per_day: u32, break_ratio: f64) -> Self {
        let daily_minutes = hours_per_day.saturating_mul(60);
        let break_minutes = (daily_minutes as f64 * break_ratio + 1e-6).floor() as u32;
        Self {
            days,
            daily_focus_minutes: daily_minutes.saturating_sub(break_minutes),
        }
    }
}

/// Redistribute `blocks` across the camp days
///
/// Each phase gets `floor(duration × daily_focus / total_focus)` minutes
/// per day; zero-length day blocks are dropped. With `reconcile` set, each
/// day's rounding shortfall is added to that day's longest block.
pub fn distribute(
    blocks: &[TimeBlock],
    camp: CampDays,
    reconcile: bool,
) -> Result<Vec<TimeBlock>, ScheduleError> {
    if camp.days == 0 {
        return Err(ScheduleError::NoCampDays);
    }
    let total_focus: u64 = blocks.iter().map(|b| u64::from(b.duration_minutes)).sum();
    if total_focus == 0 {
        return Err(ScheduleError::NoFocusTime);
    }

    let mut out = Vec::new();
    for day in 1..=camp.days {
        let day_start = out.len();
        for block in blocks {
            let minutes = u64::from(block.duration_minutes) * u64::from(camp.daily_focus_minutes)
                / total_focus;
            if minutes == 0 {
                continue;
            }
            out.push(TimeBlock {
                day: Some(day),
                duration_minutes: minutes as u32,
                description: format!("Day {}: {}", day, block.description),
                ..block.clone()
            });
        }

        if reconcile {
            reconcile_day(&mut out[day_start..], camp.daily_focus_minutes);
        }
    }

    if out.is_empty() {
        return Err(ScheduleError::EmptyCamp { days: camp.days });
    }
    debug!(
        days = camp.days,
        daily_focus_minutes = camp.daily_focus_minutes,
        blocks = out.len(),
        "Distributed camp blocks"
    );
    Ok(out)
}

fn reconcile_day(day_blocks: &mut [TimeBlock], target: u32) {
    let assigned: u32 = day_blocks.iter().map(|b| b.duration_minutes).sum();
    let shortfall = target.saturating_sub(assigned);
    if shortfall == 0 {
        return;
    }
    // First longest block wins ties
    let longest = day_blocks
        .iter_mut()
        .reduce(|best, b| if b.duration_minutes > best.duration_minutes { b } else { best });
    if let Some(block) = longest {
        block.duration_minutes += shortfall;
    }
}
