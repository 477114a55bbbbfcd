//! Render-facing snapshot of one engine state.
//!
//! Plain copyable data with no references into the engine, so a host can keep
//! it across frames or ship it to another thread. `snapshot_into` lets a host
//! reuse one buffer without per-frame allocation.

use crate::pieces::{shape, Mino};
use crate::types::{Cell, Phase, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH, PREVIEW_LEN};

/// The active piece as exposed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl ActiveSnapshot {
    /// Absolute board cells occupied by the piece.
    pub fn cells(&self) -> [Mino; 4] {
        shape(self.kind, self.rotation).map(|(mx, my)| (self.x + mx, self.y + my))
    }
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineSnapshot {
    /// Full grid including the hidden buffer rows (0 and 1).
    pub board: [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    /// Row the active piece would land on under an immediate hard drop.
    pub ghost_y: Option<i8>,
    pub hold: Option<PieceKind>,
    pub next_queue: [PieceKind; PREVIEW_LEN],
    pub can_hold: bool,
    pub paused: bool,
    pub phase: Phase,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub combo: u32,
    pub back_to_back: bool,
    pub seed: u32,
}

impl EngineSnapshot {
    /// Absolute cells of the active piece, if one is falling.
    pub fn active_cells(&self) -> Option<[Mino; 4]> {
        self.active.map(|a| a.cells())
    }

    /// Absolute cells of the ghost preview, if one is falling.
    pub fn ghost_cells(&self) -> Option<[Mino; 4]> {
        let active = self.active?;
        let ghost_y = self.ghost_y?;
        Some(
            ActiveSnapshot {
                y: ghost_y,
                ..active
            }
            .cells(),
        )
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}

impl Default for EngineSnapshot {
    fn default() -> Self {
        Self {
            board: [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost_y: None,
            hold: None,
            next_queue: [PieceKind::I; PREVIEW_LEN],
            can_hold: true,
            paused: false,
            phase: Phase::Spawning,
            score: 0,
            level: 0,
            lines: 0,
            combo: 0,
            back_to_back: false,
            seed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_cells_are_absolute() {
        let active = ActiveSnapshot {
            kind: PieceKind::O,
            rotation: Rotation::North,
            x: 3,
            y: 5,
        };
        let mut cells = active.cells();
        cells.sort_unstable();
        assert_eq!(cells, [(4, 5), (4, 6), (5, 5), (5, 6)]);
    }

    #[test]
    fn ghost_cells_share_the_active_column() {
        let snap = EngineSnapshot {
            active: Some(ActiveSnapshot {
                kind: PieceKind::I,
                rotation: Rotation::North,
                x: 3,
                y: 0,
            }),
            ghost_y: Some(20),
            ..Default::default()
        };
        let ghost = snap.ghost_cells().unwrap();
        assert!(ghost.iter().all(|&(_, y)| y == 21));
    }

    #[test]
    fn no_active_means_no_ghost() {
        let snap = EngineSnapshot::default();
        assert_eq!(snap.active_cells(), None);
        assert_eq!(snap.ghost_cells(), None);
    }
}
