//! Collision detection - walls, floor and locked cells

use crate::board::{Board, COLS, ROWS};
use crate::piece::Piece;

/// Does `piece` overlap a wall, the floor, or a locked cell?
///
/// Cells above the top edge (`y < 0`) only count against the side walls.
pub fn collide(board: &Board, piece: &Piece) -> bool {
    piece.block_positions().any(|(x, y, _)| {
        if x < 0 || x >= COLS as i32 || y >= ROWS as i32 {
            return true;
        }
        y >= 0 && board.get(y, x).is_some_and(|cell| cell.is_filled())
    })
}
