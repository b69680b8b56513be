//! Scoring module - guideline line-clear table, back-to-back and level curve
//!
//! | Clear | Plain | Mini T-spin | T-spin |
//! |-------|-------|-------------|--------|
//! | none | - | 100 (1) | 400 (4) |
//! | single | 100 (1) | 200 (2) | 800 (8) |
//! | double | 300 (3) | - | 1200 (12) |
//! | triple | 500 (5) | - | 1600 (16) |
//! | tetris | 800 (8) | - | - |
//!
//! Points are multiplied by the level; the number in parentheses is the line
//! credit that feeds the variable goal system. A clear right after another
//! clear is back-to-back: points x 3/2 and `lines / 2` extra credit.

use std::time::Duration;

use serde::Serialize;

use crate::config::GoalSystem;
use crate::error::InvariantViolation;
use crate::types::{ScoreAction, TSpinKind, B2B_DENOMINATOR, B2B_NUMERATOR, MAX_SPEED_LEVEL};

/// Running totals for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Statistics {
    /// Rows physically removed from the board
    pub actual_lines_cleared: u32,
    /// Line credits from the scoring table, bonuses included
    pub rewarded_lines_cleared: u32,
    pub level: u32,
    pub score: u64,
}

impl Statistics {
    pub fn new() -> Self {
        Self {
            actual_lines_cleared: 0,
            rewarded_lines_cleared: 0,
            level: 1,
            score: 0,
        }
    }
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Table entry for one lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearAward {
    pub action: ScoreAction,
    /// Points before level and back-to-back multipliers
    pub base_points: u64,
    /// Line credit toward the variable goal
    pub credit: u32,
}

/// Score of one lock after all multipliers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    pub action: ScoreAction,
    pub points: u64,
    pub credit: u32,
    pub back_to_back: bool,
}

/// Look up the table entry for a spin and a number of cleared rows.
///
/// Returns `Ok(None)` for a plain lock with no rows. A mini spin that clears
/// two or more rows cannot happen with correct geometry and is reported as an
/// invariant violation.
pub fn clear_award(spin: TSpinKind, lines: usize) -> Result<Option<ClearAward>, InvariantViolation> {
    let (action, base_points, credit) = match (spin, lines) {
        (TSpinKind::None, 0) => return Ok(None),
        (TSpinKind::Full, 0) => (ScoreAction::TSpin, 400, 4),
        (TSpinKind::Mini, 0) => (ScoreAction::MiniTSpin, 100, 1),
        (TSpinKind::None, 1) => (ScoreAction::Single, 100, 1),
        (TSpinKind::Mini, 1) => (ScoreAction::MiniTSpinSingle, 200, 2),
        (TSpinKind::Full, 1) => (ScoreAction::TSpinSingle, 800, 8),
        (TSpinKind::None, 2) => (ScoreAction::Double, 300, 3),
        (TSpinKind::Full, 2) => (ScoreAction::TSpinDouble, 1200, 12),
        (TSpinKind::None, 3) => (ScoreAction::Triple, 500, 5),
        (TSpinKind::Full, 3) => (ScoreAction::TSpinTriple, 1600, 16),
        (TSpinKind::Mini, n) => return Err(InvariantViolation::MiniSpinMultiClear { lines: n }),
        // four rows can only be an I piece
        (_, _) => (ScoreAction::Tetris, 800, 8),
    };
    Ok(Some(ClearAward {
        action,
        base_points,
        credit,
    }))
}

/// Apply the B2B multiplier (3/2) to a point value.
pub fn apply_b2b_multiplier(points: u64) -> u64 {
    points.saturating_mul(B2B_NUMERATOR) / B2B_DENOMINATOR
}

/// Extra line credit for a back-to-back clear
pub fn b2b_extra_credit(lines: usize) -> u32 {
    (lines / 2) as u32
}

/// Full score for one lock.
///
/// `previous_cleared` is whether the piece before this one cleared rows.
pub fn calculate_score(
    spin: TSpinKind,
    lines: usize,
    level: u32,
    previous_cleared: bool,
) -> Result<Option<ScoreResult>, InvariantViolation> {
    let Some(award) = clear_award(spin, lines)? else {
        return Ok(None);
    };

    let mut points = award.base_points.saturating_mul(u64::from(level));
    let mut credit = award.credit;
    let back_to_back = previous_cleared && lines > 0;
    if back_to_back {
        points = apply_b2b_multiplier(points);
        credit += b2b_extra_credit(lines);
    }

    Ok(Some(ScoreResult {
        action: award.action,
        points,
        credit,
        back_to_back,
    }))
}

/// Calculate drop score
/// soft_drop: +1 per cell
/// hard_drop: +2 per cell
pub fn calculate_drop_score(cells: u32, is_hard_drop: bool) -> u64 {
    let cells = u64::from(cells);
    if is_hard_drop {
        cells * 2
    } else {
        cells
    }
}

/// Variable goal: `ceil(0.1 * (sqrt(40 * (rewarded + 1) + 25) - 5))`
pub fn variable_goal_level(rewarded_lines: u32) -> u32 {
    let x = 40.0 * (f64::from(rewarded_lines) + 1.0) + 25.0;
    let level = (0.1 * (x.sqrt() - 5.0)).ceil();
    (level as u32).max(1)
}

/// Fixed goal: one level every 10 actual lines
pub fn fixed_goal_level(actual_lines: u32) -> u32 {
    actual_lines / 10 + 1
}

pub fn calculate_level(goal: GoalSystem, actual_lines: u32, rewarded_lines: u32) -> u32 {
    match goal {
        GoalSystem::Variable => variable_goal_level(rewarded_lines),
        GoalSystem::Fixed => fixed_goal_level(actual_lines),
    }
}

/// Gravity interval for a level: `base * (0.8 - (l - 1) * 0.007)^(l - 1)`.
///
/// Levels past [`MAX_SPEED_LEVEL`] use its interval, since the curve base turns
/// negative there. Intervals this deep round down to zero, so gravity then
/// moves one row per iteration.
pub fn drop_interval(base: Duration, level: u32) -> Duration {
    let l = f64::from(level.clamp(1, MAX_SPEED_LEVEL));
    let factor = (0.8 - (l - 1.0) * 0.007).powf(l - 1.0);
    base.mul_f64(factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_at_level_one() {
        let result = calculate_score(TSpinKind::None, 1, 1, false).unwrap().unwrap();
        assert_eq!(result.action, ScoreAction::Single);
        assert_eq!(result.points, 100);
        assert_eq!(result.credit, 1);
        assert!(!result.back_to_back);
    }

    #[test]
    fn test_tetris_at_level_one() {
        let result = calculate_score(TSpinKind::None, 4, 1, false).unwrap().unwrap();
        assert_eq!(result.action, ScoreAction::Tetris);
        assert_eq!(result.points, 800);
    }

    #[test]
    fn test_back_to_back_double() {
        let result = calculate_score(TSpinKind::None, 2, 1, true).unwrap().unwrap();
        assert_eq!(result.points, 450);
        assert_eq!(result.credit, 3 + 1);
        assert!(result.back_to_back);
    }

    #[test]
    fn test_spin_without_clear_is_not_back_to_back() {
        let result = calculate_score(TSpinKind::Full, 0, 2, true).unwrap().unwrap();
        assert_eq!(result.action, ScoreAction::TSpin);
        assert_eq!(result.points, 800);
        assert!(!result.back_to_back);
    }

    #[test]
    fn test_plain_lock_scores_nothing() {
        assert_eq!(calculate_score(TSpinKind::None, 0, 5, true).unwrap(), None);
    }

    #[test]
    fn test_mini_multi_clear_is_violation() {
        assert_eq!(
            clear_award(TSpinKind::Mini, 2),
            Err(InvariantViolation::MiniSpinMultiClear { lines: 2 })
        );
        assert!(clear_award(TSpinKind::Mini, 1).is_ok());
    }

    #[test]
    fn test_spin_table() {
        let award = clear_award(TSpinKind::Full, 2).unwrap().unwrap();
        assert_eq!((award.action, award.base_points, award.credit), (ScoreAction::TSpinDouble, 1200, 12));
        let award = clear_award(TSpinKind::Mini, 0).unwrap().unwrap();
        assert_eq!((award.action, award.base_points, award.credit), (ScoreAction::MiniTSpin, 100, 1));
    }

    #[test]
    fn test_drop_score() {
        assert_eq!(calculate_drop_score(7, false), 7);
        assert_eq!(calculate_drop_score(7, true), 14);
    }

    #[test]
    fn test_variable_goal_curve() {
        assert_eq!(variable_goal_level(0), 1);
        assert_eq!(variable_goal_level(4), 1);
        assert_eq!(variable_goal_level(5), 2);
        assert_eq!(variable_goal_level(14), 2);
        assert_eq!(variable_goal_level(15), 3);
    }

    #[test]
    fn test_fixed_goal() {
        assert_eq!(fixed_goal_level(0), 1);
        assert_eq!(fixed_goal_level(9), 1);
        assert_eq!(fixed_goal_level(10), 2);
        assert_eq!(calculate_level(GoalSystem::Fixed, 25, 0), 3);
    }

    #[test]
    fn test_drop_interval_curve() {
        let base = Duration::from_millis(1000);
        assert_eq!(drop_interval(base, 1), base);
        let level2 = drop_interval(base, 2);
        assert!(level2 > Duration::from_millis(792) && level2 < Duration::from_millis(794));
        assert!(drop_interval(base, 15) > drop_interval(base, 16));
        assert!(drop_interval(base, 20) > drop_interval(base, 21));
        assert!(drop_interval(base, 30) < Duration::from_millis(1));
        assert_eq!(drop_interval(base, MAX_SPEED_LEVEL), drop_interval(base, 116));
        assert_eq!(drop_interval(base, u32::MAX), drop_interval(base, MAX_SPEED_LEVEL));
    }
}
