//! Game board: the grid of locked cells

use crate::piece::Piece;
use crate::tetromino::TetrominoType;

/// Board dimensions
pub const COLS: usize = 12;
pub const ROWS: usize = 20;

/// A cell on the board - either empty or filled by a locked piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(TetrominoType),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    /// Numeric value: 0 for empty, the piece color id (1-7) otherwise
    #[allow(dead_code)]
    pub fn id(&self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Filled(kind) => kind.id(),
        }
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is the top
    cells: [[Cell; COLS]; ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Get the cell at (row, col), or None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= ROWS || col >= COLS {
            return None;
        }
        Some(self.cells[row][col])
    }

    /// Set a cell; returns false if out of bounds
    #[cfg(test)]
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= ROWS || col >= COLS {
            return false;
        }
        self.cells[row][col] = cell;
        true
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> &[[Cell; COLS]; ROWS] {
        &self.cells
    }

    /// Write every occupied cell of `piece` into the grid.
    ///
    /// The caller must already have checked that the piece does not collide
    /// at its current position.
    pub fn merge_piece(&mut self, piece: &Piece) {
        for (x, y, cell) in piece.block_positions() {
            debug_assert!(x >= 0 && (x as usize) < COLS && y < ROWS as i32);
            // Cells still above the top edge are dropped.
            if y >= 0 {
                self.cells[y as usize][x as usize] = cell;
            }
        }
    }

    /// Remove every complete row, shifting the rows above it down and
    /// inserting an empty row at the top. Returns the number of rows removed.
    pub fn sweep_completed_rows(&mut self) -> usize {
        let mut removed = 0;
        let mut row = ROWS;

        while row > 0 {
            let y = row - 1;
            if !self.is_row_full(y) {
                row -= 1;
                continue;
            }
            // Shift everything above `y` down by one; the same index is
            // examined again on the next pass.
            self.cells.copy_within(0..y, 1);
            self.cells[0] = [Cell::Empty; COLS];
            removed += 1;
        }

        removed
    }

    /// Check if a row is completely filled
    fn is_row_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_filled())
    }

    /// Check if the board is completely empty
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }
}
