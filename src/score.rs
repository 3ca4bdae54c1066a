//! Scoring and combo arithmetic
//!
//! All scoring is pure arithmetic over (blocks, lines, streak); the session
//! in `game.rs` owns the running totals.

use crate::board::GRID_SIZE;

/// Points per block placed
const PTS_BLOCK: u64 = 1;
/// Line-clear point unit, multiplied by the grid width
const PTS_LINE: u64 = 10;
/// Multi-line bonus unit per extra simultaneous line
const COMBO_MULT: u64 = 10;
/// Streak bonus per consecutive clearing placement beyond the first
const STREAK_BONUS: u64 = 10;

/// Points for committing a piece, before any clear resolution
pub fn placement_points(blocks: usize) -> u64 {
    blocks as u64 * PTS_BLOCK
}

/// Points for a clear of `lines` simultaneous lines at the given streak.
/// The streak has already been incremented for this placement, so `streak`
/// is at least 1 whenever lines > 0.
pub fn clear_points(lines: usize, streak: u32) -> u64 {
    if lines == 0 {
        return 0;
    }
    let line_points = lines as u64 * PTS_LINE * GRID_SIZE as u64;
    let multi_bonus = if lines > 1 {
        (lines as u64 - 1) * COMBO_MULT * GRID_SIZE as u64
    } else {
        0
    };
    let streak_bonus = if streak > 1 {
        (streak as u64 - 1) * STREAK_BONUS
    } else {
        0
    };
    line_points + multi_bonus + streak_bonus
}

/// Advisory display label for a clear. Purely cosmetic; never affects the
/// numeric score.
pub fn classify_clear(lines: usize, streak: u32) -> Option<String> {
    if lines >= 4 {
        Some(format!("INCREDIBLE! ×{}", lines))
    } else if lines == 3 {
        Some("AMAZING! ×3".to_string())
    } else if lines == 2 {
        Some("DOUBLE!".to_string())
    } else if streak > 2 {
        Some(format!("STREAK ×{}", streak))
    } else if streak == 2 {
        Some("COMBO!".to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_points() {
        assert_eq!(placement_points(1), 1);
        assert_eq!(placement_points(9), 9);
    }

    #[test]
    fn test_single_line_points() {
        // 1 line, first of a streak: 10 * 8, no bonuses
        assert_eq!(clear_points(1, 1), 80);
    }

    #[test]
    fn test_multi_line_bonus() {
        // 2 lines: 2*80 base + 1*80 multi bonus
        assert_eq!(clear_points(2, 1), 160 + 80);
        // 3 lines: 3*80 + 2*80
        assert_eq!(clear_points(3, 1), 240 + 160);
    }

    #[test]
    fn test_streak_bonus() {
        assert_eq!(clear_points(1, 2), 80 + 10);
        assert_eq!(clear_points(1, 5), 80 + 40);
        // Both bonuses stack
        assert_eq!(clear_points(2, 3), 160 + 80 + 20);
    }

    #[test]
    fn test_zero_lines_scores_nothing() {
        assert_eq!(clear_points(0, 0), 0);
        assert_eq!(clear_points(0, 7), 0);
    }

    #[test]
    fn test_classify_lines_take_priority() {
        assert_eq!(classify_clear(5, 1).as_deref(), Some("INCREDIBLE! ×5"));
        assert_eq!(classify_clear(4, 1).as_deref(), Some("INCREDIBLE! ×4"));
        assert_eq!(classify_clear(3, 9).as_deref(), Some("AMAZING! ×3"));
        assert_eq!(classify_clear(2, 9).as_deref(), Some("DOUBLE!"));
    }

    #[test]
    fn test_classify_streak_labels() {
        assert_eq!(classify_clear(1, 2).as_deref(), Some("COMBO!"));
        assert_eq!(classify_clear(1, 4).as_deref(), Some("STREAK ×4"));
        assert_eq!(classify_clear(1, 1), None);
        assert_eq!(classify_clear(0, 0), None);
    }
}
