//! Break placement between session blocks

use crate::types::{BreakKind, BreakSlot, TimeBlock};

const SHORT_BREAK_MINUTES: u32 = 5;
const MEDIUM_BREAK_MINUTES: u32 = 15;
const LONG_BREAK_MINUTES: u32 = 30;

/// Walk the blocks accumulating focus time and insert a break whenever the
/// running total reaches `focus_minutes` or a block asks for one.
///
/// Break length grows with the accumulated time: 5 min below one focus
/// span, 15 min below two, 30 min otherwise.
pub fn schedule(blocks: &[TimeBlock], focus_minutes: u32) -> Vec<BreakSlot> {
    let mut breaks = Vec::new();
    let mut cumulative: u32 = 0;

    for (index, block) in blocks.iter().enumerate() {
        cumulative = cumulative.saturating_add(block.duration_minutes);
        if cumulative < focus_minutes && !block.break_after {
            continue;
        }

        let duration_minutes = if cumulative < focus_minutes {
            SHORT_BREAK_MINUTES
        } else if cumulative < focus_minutes.saturating_mul(2) {
            MEDIUM_BREAK_MINUTES
        } else {
            LONG_BREAK_MINUTES
        };
        let kind = if duration_minutes <= SHORT_BREAK_MINUTES {
            BreakKind::FocusBreak
        } else {
            BreakKind::ActiveBreak
        };

        breaks.push(BreakSlot {
            after_block: index,
            duration_minutes,
            kind,
        });
        cumulative = 0;
    }

    breaks
}
