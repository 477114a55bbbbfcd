//! The occupancy grid: collision queries, piece merging, row clearing.
//!
//! A flat array in row-major order for cache locality and zero allocation.
//! Coordinates are (x, y): x in 0..10 left to right, y in 0..22 top to
//! bottom. The top two rows are the hidden buffer; row 21 is the floor.

use arrayvec::ArrayVec;

use crate::pieces::Mino;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;
const BOARD_SIZE: usize = WIDTH * HEIGHT;

/// The playfield grid. Owns cell occupancy exclusively; the active piece is
/// never part of the board until it locks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some(y as usize * WIDTH + x as usize)
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Cell at (x, y); `None` when out of bounds.
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|i| self.cells[i])
    }

    /// Write a cell. Returns false when out of bounds.
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// True when (x, y) is inside the grid and empty.
    #[inline]
    pub fn is_free(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Collision query: true if any cell is out of bounds (walls or floor)
    /// or already occupied. Used before accepting any move or rotation.
    pub fn is_blocked(&self, cells: &[Mino]) -> bool {
        cells.iter().any(|&(x, y)| !self.is_free(x, y))
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= HEIGHT {
            return false;
        }
        let start = y * WIDTH;
        self.cells[start..start + WIDTH].iter().all(Cell::is_some)
    }

    /// Indices of completely filled rows, bottom to top. A single lock can
    /// complete at most 4 rows.
    pub fn find_full_rows(&self) -> ArrayVec<usize, 4> {
        let mut rows = ArrayVec::new();
        for y in (0..HEIGHT).rev() {
            if self.is_row_full(y) && rows.try_push(y).is_err() {
                break;
            }
        }
        rows
    }

    /// Remove the given rows and shift everything above each of them down by
    /// one per removal, refilling the vacated top rows with empty cells.
    ///
    /// `rows` is expected to come from [`find_full_rows`](Self::find_full_rows);
    /// an empty slice leaves the grid unchanged.
    pub fn clear_rows(&mut self, rows: &[usize]) {
        if rows.is_empty() {
            return;
        }

        // Bottom-up compaction: copy every surviving row to its new slot.
        let mut write_y = HEIGHT;
        for read_y in (0..HEIGHT).rev() {
            if rows.contains(&read_y) {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src = read_y * WIDTH;
                let dst = write_y * WIDTH;
                self.cells.copy_within(src..src + WIDTH, dst);
            }
        }

        for cell in &mut self.cells[..write_y * WIDTH] {
            *cell = None;
        }
    }

    /// Write the active piece's cells into the grid permanently. Post-lock
    /// only; returns false if any cell was out of bounds or occupied, in
    /// which case nothing is written.
    pub fn merge(&mut self, cells: &[Mino], kind: PieceKind) -> bool {
        if self.is_blocked(cells) {
            return false;
        }
        for &(x, y) in cells {
            self.set(x, y, Some(kind));
        }
        true
    }

    /// Copy the grid into a 2D snapshot buffer.
    pub fn write_grid(&self, out: &mut [[Cell; WIDTH]; HEIGHT]) {
        for (y, row) in out.iter_mut().enumerate() {
            let start = y * WIDTH;
            row.copy_from_slice(&self.cells[start..start + WIDTH]);
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Reset every cell to empty.
    pub fn reset(&mut self) {
        self.cells = [None; BOARD_SIZE];
    }

    /// Fill an entire row, leaving out the listed columns. Scenario setup
    /// hook for tests and garbage-line hosts.
    pub fn fill_row_except(&mut self, y: i8, holes: &[i8], kind: PieceKind) {
        for x in 0..BOARD_WIDTH as i8 {
            if !holes.contains(&x) {
                self.set(x, y, Some(kind));
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_bounds() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 21), Some(219));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 22), None);
    }

    #[test]
    fn set_get_roundtrip() {
        let mut board = Board::new();
        assert!(board.set(5, 10, Some(PieceKind::T)));
        assert_eq!(board.get(5, 10), Some(Some(PieceKind::T)));
        assert!(board.set(5, 10, None));
        assert_eq!(board.get(5, 10), Some(None));
        assert!(!board.set(10, 0, Some(PieceKind::I)));
    }

    #[test]
    fn blocked_by_walls_floor_and_occupancy() {
        let mut board = Board::new();
        board.set(4, 21, Some(PieceKind::S));

        assert!(board.is_blocked(&[(-1, 5)]));
        assert!(board.is_blocked(&[(10, 5)]));
        assert!(board.is_blocked(&[(0, 22)]));
        assert!(board.is_blocked(&[(4, 21)]));
        assert!(!board.is_blocked(&[(0, 0), (9, 21), (4, 20)]));
    }

    #[test]
    fn find_full_rows_bottom_to_top() {
        let mut board = Board::new();
        board.fill_row_except(21, &[], PieceKind::I);
        board.fill_row_except(19, &[], PieceKind::J);
        board.fill_row_except(18, &[3], PieceKind::L);

        let rows = board.find_full_rows();
        assert_eq!(rows.as_slice(), &[21, 19]);
    }

    #[test]
    fn clear_rows_empty_is_noop() {
        let mut board = Board::new();
        board.set(4, 20, Some(PieceKind::Z));
        let before = board.clone();
        board.clear_rows(&[]);
        assert_eq!(board, before);
    }

    #[test]
    fn clear_rows_shifts_above_rows_down() {
        let mut board = Board::new();
        board.fill_row_except(21, &[], PieceKind::I);
        board.set(0, 20, Some(PieceKind::T));

        board.clear_rows(&[21]);

        assert_eq!(board.get(0, 21), Some(Some(PieceKind::T)));
        assert!(!board.is_row_full(21));
        assert!(board.is_free(0, 20));
    }

    #[test]
    fn clear_rows_preserves_relative_order() {
        let mut board = Board::new();
        board.fill_row_except(21, &[], PieceKind::I);
        board.fill_row_except(19, &[], PieceKind::I);
        board.set(2, 20, Some(PieceKind::S));
        board.set(7, 18, Some(PieceKind::Z));

        board.clear_rows(&[21, 19]);

        // Two rows removed below each marker: both shift down accordingly.
        assert_eq!(board.get(2, 21), Some(Some(PieceKind::S)));
        assert_eq!(board.get(7, 20), Some(Some(PieceKind::Z)));
        assert!(board.is_free(2, 20));
        assert!(board.is_free(7, 18));
    }

    #[test]
    fn merge_rejects_collisions_without_writing() {
        let mut board = Board::new();
        board.set(4, 5, Some(PieceKind::T));

        assert!(!board.merge(&[(3, 5), (4, 5)], PieceKind::O));
        assert!(board.is_free(3, 5));

        assert!(board.merge(&[(3, 6), (4, 6)], PieceKind::O));
        assert_eq!(board.get(3, 6), Some(Some(PieceKind::O)));
    }

    #[test]
    fn merge_then_clear_restores_empty_rows() {
        let mut board = Board::new();
        board.fill_row_except(21, &[3, 4, 5, 6], PieceKind::L);
        assert!(board.merge(&[(3, 21), (4, 21), (5, 21), (6, 21)], PieceKind::I));

        let rows = board.find_full_rows();
        assert_eq!(rows.as_slice(), &[21]);
        board.clear_rows(&rows);

        assert!((0..10).all(|x| board.is_free(x, 21)));
    }
}
