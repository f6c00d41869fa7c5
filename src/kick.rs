//! Rotation with wall kicks
//!
//! After rotating, the piece is nudged sideways with the probe sequence
//! +1, -1, +2, -2, ... until it fits. The search gives up once the next
//! step would be wider than the rotated matrix.

use crate::board::Board;
use crate::collision::collide;
use crate::piece::{Piece, RotationDirection};

/// Rotate `piece` on `board`, kicking it sideways if needed.
/// Returns None when no position fits; the input piece is never modified.
pub fn rotate_with_kick(board: &Board, piece: &Piece, direction: RotationDirection) -> Option<Piece> {
    let mut candidate = Piece {
        matrix: piece.matrix.rotated(direction),
        ..piece.clone()
    };
    let width = candidate.width() as i32;

    let mut offset: i32 = 1;
    while collide(board, &candidate) {
        candidate.x += offset;
        offset = -(offset + offset.signum());
        if offset.abs() > width {
            return None;
        }
    }
    Some(candidate)
}
