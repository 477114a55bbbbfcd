//! Engine configuration.
//!
//! Everything the rules leave tunable (gravity curve, lock delay, scoring
//! table, bonus magnitudes) lives in one immutable struct handed to
//! [`Engine::new`](crate::Engine::new), so tests can run with non-default
//! values deterministically.

use thiserror::Error;

/// Levels with an explicit gravity entry; later levels use the floor.
pub const GRAVITY_LEVELS: usize = 9;

/// Immutable per-session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Gravity interval per level, in milliseconds.
    pub gravity_ms: [u32; GRAVITY_LEVELS],
    /// Gravity interval for levels past the table.
    pub gravity_floor_ms: u32,
    /// Grace period after a piece can no longer fall before it locks.
    pub lock_delay_ms: u32,
    /// How many successful moves/rotations may restart the lock delay
    /// before it runs out for good.
    pub lock_reset_limit: u8,
    /// Hold duration of the `Clearing` phase, for presentation-side
    /// animation. Zero means clears resolve within the same step.
    pub clear_pause_ms: u32,
    /// Base points for clearing n rows, indexed by n (index 0 unused).
    pub line_scores: [u32; 5],
    /// Extra points per combo step, scaled by level.
    pub combo_step: u32,
    /// Back-to-back multiplier applied to the base clear points as a
    /// rational (numerator / denominator), floored.
    pub b2b_numerator: u32,
    pub b2b_denominator: u32,
    /// Points per row of soft drop.
    pub soft_drop_points: u32,
    /// Points per row of hard drop.
    pub hard_drop_points: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gravity_ms: [1000, 800, 650, 500, 400, 320, 250, 200, 160],
            gravity_floor_ms: 120,
            lock_delay_ms: 450,
            lock_reset_limit: 15,
            clear_pause_ms: 0,
            line_scores: [0, 100, 300, 500, 800],
            combo_step: 50,
            b2b_numerator: 3,
            b2b_denominator: 2,
            soft_drop_points: 1,
            hard_drop_points: 2,
        }
    }
}

/// Initialization-time defects. Rejected moves and blocked spawns are not
/// errors; the only fallible operation is constructing an engine from a
/// malformed configuration or geometry table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("gravity interval for level {level} is zero")]
    ZeroGravity { level: usize },
    #[error("gravity floor is zero")]
    ZeroGravityFloor,
    #[error("line score for {lines} cleared rows is zero")]
    ZeroLineScore { lines: usize },
    #[error("back-to-back denominator is zero")]
    ZeroB2bDenominator,
    #[error("piece geometry table is malformed: {0}")]
    BadGeometry(&'static str),
}

impl EngineConfig {
    /// Check the tunable numbers. The static geometry tables are checked
    /// separately by [`crate::pieces::validate_tables`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (level, &ms) in self.gravity_ms.iter().enumerate() {
            if ms == 0 {
                return Err(ConfigError::ZeroGravity { level });
            }
        }
        if self.gravity_floor_ms == 0 {
            return Err(ConfigError::ZeroGravityFloor);
        }
        for lines in 1..self.line_scores.len() {
            if self.line_scores[lines] == 0 {
                return Err(ConfigError::ZeroLineScore { lines });
            }
        }
        if self.b2b_denominator == 0 {
            return Err(ConfigError::ZeroB2bDenominator);
        }
        Ok(())
    }
}
