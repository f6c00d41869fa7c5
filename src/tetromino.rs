//! Tetromino definitions and canonical shapes
//!
//! Every shape lives inside a square bounding matrix, padded with empty
//! cells, so that a single generic matrix rotation works for all seven.

use crate::board::Cell;
use crate::piece::Matrix;
use ratatui::style::Color;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I, // Cyan - long bar
    J, // Blue
    L, // Orange
    O, // Yellow - square
    S, // Green
    T, // Purple
    Z, // Red
}

impl TetrominoType {
    /// Color id stored in board cells (1-7)
    pub fn id(&self) -> u8 {
        match self {
            TetrominoType::I => 1,
            TetrominoType::J => 2,
            TetrominoType::L => 3,
            TetrominoType::O => 4,
            TetrominoType::S => 5,
            TetrominoType::T => 6,
            TetrominoType::Z => 7,
        }
    }

    /// Get the color for this tetromino
    pub fn color(&self) -> Color {
        match self {
            TetrominoType::I => Color::Cyan,
            TetrominoType::J => Color::Blue,
            TetrominoType::L => Color::Rgb(255, 165, 0), // Orange
            TetrominoType::O => Color::Yellow,
            TetrominoType::S => Color::Green,
            TetrominoType::T => Color::Magenta,
            TetrominoType::Z => Color::Red,
        }
    }

    /// All tetromino types, in color-id order
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::J,
            TetrominoType::L,
            TetrominoType::O,
            TetrominoType::S,
            TetrominoType::T,
            TetrominoType::Z,
        ]
    }

    /// Build a fresh spawn-orientation matrix for this tetromino.
    ///
    /// The returned matrix is owned by the caller; rotating it never
    /// touches the canonical layout below.
    pub fn matrix(&self) -> Matrix {
        let layout: &[&[u8]] = match self {
            TetrominoType::I => &[
                &[0, 0, 0, 0],
                &[1, 1, 1, 1],
                &[0, 0, 0, 0],
                &[0, 0, 0, 0],
            ],
            TetrominoType::J => &[
                &[1, 0, 0],
                &[1, 1, 1],
                &[0, 0, 0],
            ],
            TetrominoType::L => &[
                &[0, 0, 1],
                &[1, 1, 1],
                &[0, 0, 0],
            ],
            TetrominoType::O => &[
                &[1, 1],
                &[1, 1],
            ],
            TetrominoType::S => &[
                &[0, 1, 1],
                &[1, 1, 0],
                &[0, 0, 0],
            ],
            TetrominoType::T => &[
                &[0, 1, 0],
                &[1, 1, 1],
                &[0, 0, 0],
            ],
            TetrominoType::Z => &[
                &[1, 1, 0],
                &[0, 1, 1],
                &[0, 0, 0],
            ],
        };

        let rows = layout
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&v| if v == 0 { Cell::Empty } else { Cell::Filled(*self) })
                    .collect()
            })
            .collect();
        Matrix::from_rows(rows)
    }
}
