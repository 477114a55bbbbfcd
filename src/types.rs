//! Plain data types shared across the engine.
//!
//! Pure data with no dependencies on the simulation modules.

/// Board width in columns.
pub const BOARD_WIDTH: u8 = 10;
/// Total board height in rows, including the hidden buffer at the top.
pub const BOARD_HEIGHT: u8 = 22;
/// Rows `0..BUFFER_ROWS` sit above the visible playfield. Pieces spawn there
/// and stacks may overflow into them before game over is declared.
pub const BUFFER_ROWS: u8 = 2;
/// Rows the presentation layer is expected to draw.
pub const VISIBLE_ROWS: u8 = BOARD_HEIGHT - BUFFER_ROWS;

/// How many upcoming pieces the snapshot previews.
pub const PREVIEW_LEN: usize = 5;

/// Spawn origin for new pieces (column, row), rotation `North`.
pub const SPAWN_POSITION: (i8, i8) = (3, 0);

/// Tetromino piece kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All seven kinds, in table order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Stable index used by the shape and kick tables.
    pub const fn index(self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::O => 1,
            PieceKind::T => 2,
            PieceKind::S => 3,
            PieceKind::Z => 4,
            PieceKind::J => 5,
            PieceKind::L => 6,
        }
    }
}

/// Rotation states (`North` = spawn orientation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    pub const fn index(self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    pub const fn cw(self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    pub const fn ccw(self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Half turn (180 degrees).
    pub const fn flipped(self) -> Self {
        self.cw().cw()
    }
}

/// A single turn of the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Turn {
    Cw,
    Ccw,
    Half,
}

impl Turn {
    /// The rotation state this turn lands on when starting from `from`.
    pub const fn applied_to(self, from: Rotation) -> Rotation {
        match self {
            Turn::Cw => from.cw(),
            Turn::Ccw => from.ccw(),
            Turn::Half => from.flipped(),
        }
    }
}

/// One cell of the board: empty, or filled by a locked piece of this kind.
pub type Cell = Option<PieceKind>;

/// Input intents accepted by [`Engine::step`](crate::Engine::step).
///
/// Key repeat (DAS/ARR) is the host's job; the engine treats every input as a
/// single intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Input {
    MoveLeft,
    MoveRight,
    RotateCw,
    RotateCcw,
    Rotate180,
    SoftDrop,
    HardDrop,
    Hold,
    Pause,
}

/// Engine state machine phases.
///
/// `Spawning` and a zero-duration `Clearing` resolve inside the `step` call
/// that enters them, so snapshots usually show `Falling`, `Locking`,
/// `Clearing` (when a clear hold is configured), or `GameOver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Spawning,
    Falling,
    Locking,
    Clearing,
    GameOver,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_cycles() {
        let mut r = Rotation::North;
        for _ in 0..4 {
            r = r.cw();
        }
        assert_eq!(r, Rotation::North);

        assert_eq!(Rotation::North.ccw(), Rotation::West);
        assert_eq!(Rotation::East.flipped(), Rotation::West);
        assert_eq!(Turn::Half.applied_to(Rotation::North), Rotation::South);
    }

    #[test]
    fn kind_indices_are_distinct() {
        for (i, kind) in PieceKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn board_dimensions() {
        assert_eq!(BOARD_WIDTH, 10);
        assert_eq!(BOARD_HEIGHT, 22);
        assert_eq!(VISIBLE_ROWS, 20);
    }
}
