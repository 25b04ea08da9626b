//! Attention-span parameters by learner age

use crate::types::AgeRange;
use tracing::debug;

/// Timing parameters for one age bracket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgeParams {
    /// Sustained focus before a break is due
    pub focus_minutes: u32,
    /// Share of total time reserved for breaks
    pub break_ratio: f64,
    /// Longest sensible single session
    pub max_session_minutes: u32,
}

/// Used when no bracket intersects the requested range
pub const FALLBACK_PARAMS: AgeParams = AgeParams {
    focus_minutes: 30,
    break_ratio: 0.2,
    max_session_minutes: 150,
};

/// (min age, max age) → parameters
static AGE_BRACKETS: &[(u32, u32, AgeParams)] = &[
    (3, 6, AgeParams { focus_minutes: 15, break_ratio: 0.3, max_session_minutes: 90 }),
    (6, 12, AgeParams { focus_minutes: 25, break_ratio: 0.25, max_session_minutes: 120 }),
    (12, 15, AgeParams { focus_minutes: 35, break_ratio: 0.2, max_session_minutes: 180 }),
    (15, 18, AgeParams { focus_minutes: 45, break_ratio: 0.15, max_session_minutes: 240 }),
    (18, 25, AgeParams { focus_minutes: 60, break_ratio: 0.1, max_session_minutes: 300 }),
];

/// Average the parameters of every bracket the range intersects
///
/// A range intersects a bracket when the overlap has positive length; a
/// single-age range (min == max) intersects every bracket containing it.
pub fn resolve(range: AgeRange) -> AgeParams {
    let matched: Vec<&AgeParams> = AGE_BRACKETS
        .iter()
        .filter(|(lo, hi, _)| intersects(range, *lo, *hi))
        .map(|(_, _, params)| params)
        .collect();

    if matched.is_empty() {
        debug!(min = range.min, max = range.max, "No age bracket matched, using fallback");
        return FALLBACK_PARAMS;
    }

    let n = matched.len() as f64;
    let params = AgeParams {
        focus_minutes: mean_minutes(matched.iter().map(|p| p.focus_minutes), n),
        break_ratio: matched.iter().map(|p| p.break_ratio).sum::<f64>() / n,
        max_session_minutes: mean_minutes(matched.iter().map(|p| p.max_session_minutes), n),
    };
    debug!(
        min = range.min,
        max = range.max,
        brackets = matched.len(),
        focus_minutes = params.focus_minutes,
        break_ratio = params.break_ratio,
        "Resolved age parameters"
    );
    params
}

fn intersects(range: AgeRange, lo: u32, hi: u32) -> bool {
    if range.min >= range.max {
        return lo <= range.min && range.min <= hi;
    }
    range.max.min(hi) > range.min.max(lo)
}

fn mean_minutes(values: impl Iterator<Item = u32>, n: f64) -> u32 {
    let total: u64 = values.map(u64::from).sum();
    (total as f64 / n).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_bracket() {
        let params = resolve(AgeRange::new(8, 12));
        assert_eq!(params.focus_minutes, 25);
        assert_eq!(params.break_ratio, 0.25);
        assert_eq!(params.max_session_minutes, 120);
    }

    #[test]
    fn test_spanning_brackets_average() {
        let params = resolve(AgeRange::new(6, 15));
        assert_eq!(params.focus_minutes, 30);
        assert!((params.break_ratio - 0.225).abs() < 1e-9);
        assert_eq!(params.max_session_minutes, 150);
    }

    #[test]
    fn test_touching_boundary_does_not_intersect() {
        // (12,15) only touches (6,12) and (15,18) at a single point
        assert_eq!(resolve(AgeRange::new(12, 15)).focus_minutes, 35);
    }

    #[test]
    fn test_single_age_on_boundary_averages_both() {
        let params = resolve(AgeRange { min: 12, max: 12 });
        assert_eq!(params.focus_minutes, 30);
    }

    #[test]
    fn test_no_bracket_uses_fallback() {
        assert_eq!(resolve(AgeRange::new(30, 60)), FALLBACK_PARAMS);
        assert_eq!(resolve(AgeRange::new(0, 2)), FALLBACK_PARAMS);
    }
}
