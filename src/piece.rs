//! Active falling piece and generic matrix rotation

use crate::board::Cell;
use crate::tetromino::TetrominoType;

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// A square matrix of cells, indexed `[y][x]` with y growing downward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    cells: Vec<Vec<Cell>>,
}

impl Matrix {
    /// Build a matrix from rows. Every row must be as long as there are rows.
    pub fn from_rows(cells: Vec<Vec<Cell>>) -> Self {
        debug_assert!(cells.iter().all(|row| row.len() == cells.len()));
        Self { cells }
    }

    /// Side length of the bounding square
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[cfg(test)]
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(|row| row.as_slice())
    }

    /// Iterate the occupied cells as `(x, y, cell)` in matrix space
    pub fn filled(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| cell.is_filled())
                .map(move |(x, &cell)| (x, y, cell))
        })
    }

    #[cfg(test)]
    pub fn filled_count(&self) -> usize {
        self.filled().count()
    }

    /// Return a rotated copy; `self` is left untouched.
    ///
    /// Clockwise maps `old[i][j]` to `new[j][m-1-i]`, counter-clockwise maps
    /// it to `new[m-1-j][i]`.
    pub fn rotated(&self, direction: RotationDirection) -> Matrix {
        let m = self.size();
        let mut cells = vec![vec![Cell::Empty; m]; m];
        for i in 0..m {
            for j in 0..m {
                match direction {
                    RotationDirection::Clockwise => cells[j][m - 1 - i] = self.cells[i][j],
                    RotationDirection::CounterClockwise => cells[m - 1 - j][i] = self.cells[i][j],
                }
            }
        }
        Matrix { cells }
    }
}

/// An active falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// The type of tetromino
    pub piece_type: TetrominoType,
    /// Current orientation of the shape
    pub matrix: Matrix,
    /// Board column of the matrix's left edge
    pub x: i32,
    /// Board row of the matrix's top edge
    pub y: i32,
}

impl Piece {
    /// Create a piece in spawn orientation at an explicit position
    #[cfg(test)]
    pub fn at(piece_type: TetrominoType, x: i32, y: i32) -> Self {
        Self {
            piece_type,
            matrix: piece_type.matrix(),
            x,
            y,
        }
    }

    /// Width of the bounding matrix
    pub fn width(&self) -> usize {
        self.matrix.size()
    }

    /// Board coordinates `(x, y, cell)` of every occupied cell
    pub fn block_positions(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        self.matrix
            .filled()
            .map(|(x, y, cell)| (self.x + x as i32, self.y + y as i32, cell))
    }
}
