//! Scoring: line clears, combo streaks, back-to-back bonuses, drop points,
//! and the level-driven gravity curve.
//!
//! All functions are pure; the engine owns the running totals. The combo
//! bonus uses the streak length *before* the current clear, so the first
//! clear of a chain earns no combo bonus and the observed counter over a
//! chain of clears reads 1, 2, 3, ...

use crate::config::EngineConfig;

/// Breakdown of the points awarded for one clearing lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearScore {
    /// Table points for the clear, back-to-back multiplier included.
    pub base: u32,
    /// Combo bonus added on top of `base`.
    pub combo_bonus: u32,
    pub total: u32,
    /// Whether the back-to-back multiplier was applied to this clear.
    pub b2b_applied: bool,
    /// The back-to-back flag value after this clear (true only for a
    /// 4-row clear).
    pub b2b_next: bool,
}

/// Score a clearing lock of `lines` rows (1..=4).
///
/// `combo_before` is the streak length prior to this clear; `prev_b2b` is
/// whether the previous clearing lock was a 4-row clear.
pub fn score_clear(
    cfg: &EngineConfig,
    lines: usize,
    level: u32,
    combo_before: u32,
    prev_b2b: bool,
) -> ClearScore {
    if lines == 0 || lines >= cfg.line_scores.len() {
        return ClearScore::default();
    }

    let level_mult = level.saturating_add(1);
    let mut base = cfg.line_scores[lines].saturating_mul(level_mult);

    let b2b_applied = lines == 4 && prev_b2b;
    if b2b_applied {
        // Floored rational multiplier (3/2 by default).
        base = base
            .saturating_mul(cfg.b2b_numerator)
            .saturating_div(cfg.b2b_denominator);
    }

    let combo_bonus = cfg
        .combo_step
        .saturating_mul(combo_before)
        .saturating_mul(level_mult);

    ClearScore {
        base,
        combo_bonus,
        total: base.saturating_add(combo_bonus),
        b2b_applied,
        b2b_next: lines == 4,
    }
}

/// Points for dropping `rows` cells.
pub fn score_drop(cfg: &EngineConfig, rows: u32, hard: bool) -> u32 {
    let per_row = if hard {
        cfg.hard_drop_points
    } else {
        cfg.soft_drop_points
    };
    per_row.saturating_mul(rows)
}

/// Level increases every 10 cleared rows.
pub fn level_for_lines(lines: u32) -> u32 {
    lines / 10
}

/// Gravity interval for a level, falling back to the floor past the table.
pub fn gravity_interval_ms(cfg: &EngineConfig, level: u32) -> u32 {
    cfg.gravity_ms
        .get(level as usize)
        .copied()
        .unwrap_or(cfg.gravity_floor_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn base_table_times_level_multiplier() {
        let cfg = cfg();
        assert_eq!(score_clear(&cfg, 1, 0, 0, false).base, 100);
        assert_eq!(score_clear(&cfg, 2, 0, 0, false).base, 300);
        assert_eq!(score_clear(&cfg, 3, 0, 0, false).base, 500);
        assert_eq!(score_clear(&cfg, 4, 0, 0, false).base, 800);

        assert_eq!(score_clear(&cfg, 1, 4, 0, false).base, 500);
        assert_eq!(score_clear(&cfg, 4, 2, 0, false).base, 2400);
    }

    #[test]
    fn zero_lines_scores_nothing() {
        assert_eq!(score_clear(&cfg(), 0, 3, 2, true), ClearScore::default());
    }

    #[test]
    fn b2b_applies_only_to_consecutive_tetrises() {
        let cfg = cfg();

        let first = score_clear(&cfg, 4, 0, 0, false);
        assert!(!first.b2b_applied);
        assert!(first.b2b_next);
        assert_eq!(first.base, 800);

        let second = score_clear(&cfg, 4, 0, first.b2b_next as u32, first.b2b_next);
        assert!(second.b2b_applied);
        assert_eq!(second.base, 1200);
        assert!(second.total > first.total);

        // A triple never earns the multiplier and breaks the chain.
        let triple = score_clear(&cfg, 3, 0, 2, true);
        assert!(!triple.b2b_applied);
        assert!(!triple.b2b_next);
    }

    #[test]
    fn b2b_multiplier_is_floored() {
        let mut cfg = cfg();
        cfg.line_scores[4] = 801; // odd base: 801 * 3 / 2 = 1201.5 -> 1201
        let score = score_clear(&cfg, 4, 0, 0, true);
        assert_eq!(score.base, 1201);
    }

    #[test]
    fn combo_bonus_counts_prior_streak() {
        let cfg = cfg();
        assert_eq!(score_clear(&cfg, 1, 0, 0, false).combo_bonus, 0);
        assert_eq!(score_clear(&cfg, 1, 0, 1, false).combo_bonus, 50);
        assert_eq!(score_clear(&cfg, 1, 0, 3, false).combo_bonus, 150);
        // Scaled by level.
        assert_eq!(score_clear(&cfg, 1, 2, 3, false).combo_bonus, 450);
    }

    #[test]
    fn drop_points() {
        let cfg = cfg();
        assert_eq!(score_drop(&cfg, 10, false), 10);
        assert_eq!(score_drop(&cfg, 10, true), 20);
        assert_eq!(score_drop(&cfg, 0, true), 0);
    }

    #[test]
    fn level_progression() {
        assert_eq!(level_for_lines(0), 0);
        assert_eq!(level_for_lines(9), 0);
        assert_eq!(level_for_lines(10), 1);
        assert_eq!(level_for_lines(29), 2);
    }

    #[test]
    fn gravity_curve_reaches_floor() {
        let cfg = cfg();
        assert_eq!(gravity_interval_ms(&cfg, 0), 1000);
        assert_eq!(gravity_interval_ms(&cfg, 8), 160);
        assert_eq!(gravity_interval_ms(&cfg, 9), 120);
        assert_eq!(gravity_interval_ms(&cfg, 40), 120);
    }
}
