//! Scoring module - classic line-clear points and level speed-up
//!
//! - 1/2/3/4 lines score 40/100/300/1200, multiplied by `level + 1`
//! - after a clear, `level = lines / 5 + 1`
//! - every level change multiplies the fall interval by 0.8

use std::time::Duration;

use crate::types::{BASE_FALL_INTERVAL_MS, FALL_SPEEDUP, LINES_PER_LEVEL, LINE_SCORES};

/// Points for clearing `lines` rows at `level` (0-based).
/// Returns 0 for anything outside 1..=4.
pub fn line_clear_score(lines: usize, level: u32) -> u32 {
    if lines == 0 || lines > LINE_SCORES.len() {
        return 0;
    }
    LINE_SCORES[lines - 1] * (level + 1)
}

/// Level reached once `total_lines` have been cleared
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

pub fn base_fall_interval() -> Duration {
    Duration::from_millis(BASE_FALL_INTERVAL_MS)
}

/// Interval after one more level change
pub fn sped_up(interval: Duration) -> Duration {
    interval.mul_f64(FALL_SPEEDUP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scores_at_level_zero() {
        assert_eq!(line_clear_score(1, 0), 40);
        assert_eq!(line_clear_score(2, 0), 100);
        assert_eq!(line_clear_score(3, 0), 300);
        assert_eq!(line_clear_score(4, 0), 1200);
    }

    #[test]
    fn test_level_multiplier() {
        assert_eq!(line_clear_score(4, 2), 3600);
        assert_eq!(line_clear_score(1, 1), 80);
    }

    #[test]
    fn test_out_of_range_lines() {
        assert_eq!(line_clear_score(0, 3), 0);
        assert_eq!(line_clear_score(5, 3), 0);
    }

    #[test]
    fn test_level_steps_every_five_lines() {
        assert_eq!(level_for_lines(1), 1);
        assert_eq!(level_for_lines(4), 1);
        assert_eq!(level_for_lines(5), 2);
        assert_eq!(level_for_lines(9), 2);
        assert_eq!(level_for_lines(10), 3);
    }

    #[test]
    fn test_speed_up() {
        assert_eq!(sped_up(base_fall_interval()), Duration::from_millis(800));
        assert_eq!(
            sped_up(sped_up(base_fall_interval())),
            Duration::from_millis(640)
        );
    }
}
