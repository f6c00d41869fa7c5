//! Random piece spawner
//!
//! Every draw is an independent uniform pick among the 7 tetrominoes;
//! there is no bag and no drought protection.

use crate::board::{Board, COLS};
use crate::collision::collide;
use crate::piece::Piece;
use crate::tetromino::TetrominoType;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Result of placing a freshly drawn piece on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Spawn {
    /// The piece fits at its spawn position
    Ready(Piece),
    /// The spawn position is already occupied: the game is over
    Blocked(Piece),
}

/// The piece spawner
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: ChaCha8Rng,
}

impl Spawner {
    /// Create a spawner with a reproducible piece sequence
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draw the next tetromino type
    pub fn next_type(&mut self) -> TetrominoType {
        let all = TetrominoType::all();
        all[self.rng.gen_range(0..all.len())]
    }

    /// Draw a new piece and test it against `board`
    pub fn spawn(&mut self, board: &Board) -> Spawn {
        let piece = spawn_piece(self.next_type());
        if collide(board, &piece) {
            Spawn::Blocked(piece)
        } else {
            Spawn::Ready(piece)
        }
    }
}

/// A fresh piece of `kind` at the canonical spawn position: horizontally
/// centred, top edge on row 0.
pub fn spawn_piece(kind: TetrominoType) -> Piece {
    let matrix = kind.matrix();
    let x = (COLS / 2) as i32 - (matrix.size() / 2) as i32;
    Piece {
        piece_type: kind,
        matrix,
        x,
        y: 0,
    }
}
