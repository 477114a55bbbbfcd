//! Piece geometry: tetromino shapes and wall-kick offset tables.
//!
//! Shapes follow the Standard Rotation System (SRS), four rotation states per
//! kind, each a set of cell offsets inside a 4x4 box relative to the piece
//! origin. Kick tables are keyed by the (from, to) rotation transition; I and
//! O use their own tables, the other five kinds share one. Half turns (180)
//! use a single shared candidate list for every kind.
//!
//! Pure data plus lookup; nothing here mutates game state.

use crate::config::ConfigError;
use crate::types::{PieceKind, Rotation, Turn};

/// Offset of a single cell relative to the piece origin.
pub type Mino = (i8, i8);

/// Shape of a piece: 4 cell offsets.
pub type PieceShape = [Mino; 4];

/// Shape tables indexed by `[kind.index()][rotation.index()]`.
/// Coordinates are (column, row) with rows growing downward.
const SHAPES: [[PieceShape; 4]; 7] = [
    // I
    [
        [(0, 1), (1, 1), (2, 1), (3, 1)],
        [(2, 0), (2, 1), (2, 2), (2, 3)],
        [(0, 2), (1, 2), (2, 2), (3, 2)],
        [(1, 0), (1, 1), (1, 2), (1, 3)],
    ],
    // O (same cells in every state)
    [
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
    ],
    // T
    [
        [(1, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (1, 2)],
        [(1, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // S
    [
        [(1, 0), (2, 0), (0, 1), (1, 1)],
        [(1, 0), (1, 1), (2, 1), (2, 2)],
        [(1, 1), (2, 1), (0, 2), (1, 2)],
        [(0, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // Z
    [
        [(0, 0), (1, 0), (1, 1), (2, 1)],
        [(2, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (1, 2), (2, 2)],
        [(1, 0), (0, 1), (1, 1), (0, 2)],
    ],
    // J
    [
        [(0, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (2, 2)],
        [(1, 0), (1, 1), (0, 2), (1, 2)],
    ],
    // L
    [
        [(2, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 2)],
        [(0, 1), (1, 1), (2, 1), (0, 2)],
        [(0, 0), (1, 0), (1, 1), (1, 2)],
    ],
];

/// Cell offsets for `kind` at `rotation`.
pub fn shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    SHAPES[kind.index()][rotation.index()]
}

/// Kick candidates for one quarter-turn transition, tried in order.
pub type KickRow = [(i8, i8); 5];

/// Quarter-turn kick table: 8 transitions (4 from-states x cw/ccw).
pub type KickTable = [KickRow; 8];

/// O never needs to move when rotating: its cells are identical in every
/// state, so the identity kick always fits.
const O_KICKS: KickTable = [[(0, 0); 5]; 8];

/// Shared by J, L, S, T and Z.
const JLSTZ_KICKS: KickTable = [
    // N->E
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // N->W
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // E->N
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // E->S
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // S->E
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // S->W
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // W->S
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // W->N
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

/// I uses its own, wider kicks.
const I_KICKS: KickTable = [
    // N->E
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // N->W
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // E->N
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // E->S
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // S->E
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // S->W
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // W->S
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // W->N
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
];

/// Half-turn (180) candidates, shared by all kinds.
const HALF_KICKS: [(i8, i8); 6] = [(0, 0), (-1, 0), (1, 0), (0, -1), (-2, 0), (2, 0)];

fn quarter_kick_table(kind: PieceKind) -> &'static KickTable {
    match kind {
        PieceKind::O => &O_KICKS,
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    }
}

/// Row index into a [`KickTable`] for a quarter-turn transition.
fn quarter_kick_index(from: Rotation, clockwise: bool) -> usize {
    match (from, clockwise) {
        (Rotation::North, true) => 0,
        (Rotation::North, false) => 1,
        (Rotation::East, false) => 2,
        (Rotation::East, true) => 3,
        (Rotation::South, false) => 4,
        (Rotation::South, true) => 5,
        (Rotation::West, false) => 6,
        (Rotation::West, true) => 7,
    }
}

/// Kick candidates for a transition, in the order they must be tried.
pub fn kick_offsets(kind: PieceKind, from: Rotation, turn: Turn) -> &'static [(i8, i8)] {
    match turn {
        Turn::Half => &HALF_KICKS,
        Turn::Cw => &quarter_kick_table(kind)[quarter_kick_index(from, true)],
        Turn::Ccw => &quarter_kick_table(kind)[quarter_kick_index(from, false)],
    }
}

/// Attempt a rotation with kicks against an occupancy oracle.
///
/// Tries every kick candidate in table order; the first offset where all four
/// cells of the rotated shape pass `is_free` wins. Returns the new rotation
/// state and the accepted (dx, dy), or `None` when every candidate collides —
/// in which case the caller keeps its state untouched.
pub fn resolve_rotation(
    kind: PieceKind,
    from: Rotation,
    x: i8,
    y: i8,
    turn: Turn,
    is_free: impl Fn(i8, i8) -> bool,
) -> Option<(Rotation, (i8, i8))> {
    let to = turn.applied_to(from);
    let rotated = shape(kind, to);

    for &(dx, dy) in kick_offsets(kind, from, turn) {
        let fits = rotated
            .iter()
            .all(|&(mx, my)| is_free(x + dx + mx, y + dy + my));
        if fits {
            return Some((to, (dx, dy)));
        }
    }

    None
}

/// Sanity-check the static tables at engine construction.
///
/// A broken table is a programming-time defect, never a runtime condition,
/// so this runs once in `Engine::new` and surfaces as `ConfigError`.
pub fn validate_tables() -> Result<(), ConfigError> {
    for kind in PieceKind::ALL {
        for rotation in [
            Rotation::North,
            Rotation::East,
            Rotation::South,
            Rotation::West,
        ] {
            let cells = shape(kind, rotation);
            for (i, &(cx, cy)) in cells.iter().enumerate() {
                if !(0..4).contains(&cx) || !(0..4).contains(&cy) {
                    return Err(ConfigError::BadGeometry("cell offset outside 4x4 box"));
                }
                if cells[..i].contains(&(cx, cy)) {
                    return Err(ConfigError::BadGeometry("duplicate cell offset in shape"));
                }
            }
            for turn in [Turn::Cw, Turn::Ccw, Turn::Half] {
                let kicks = kick_offsets(kind, rotation, turn);
                if kicks.is_empty() || kicks[0] != (0, 0) {
                    return Err(ConfigError::BadGeometry(
                        "kick list must start with the identity offset",
                    ));
                }
            }
        }
    }
    Ok(())
}
