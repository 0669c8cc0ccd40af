//! Legal move enumeration for piece boards.

use crate::geometry::shift;
use crate::grid::Board;
use crate::pieces::{Candidate, Move, EMPTY};

/// Lists every legal slide on `board`, each paired with its inverse.
///
/// Pieces are visited in piece-table order. For each piece, the forward end
/// (right/down) is extended before the back end (left/up), one candidate per
/// reachable empty cell, with distances 1, 2, 3, ... Single-cell pieces try
/// both axes. The order is deterministic.
pub fn legal_moves(board: &Board) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for piece in board.pieces() {
        for &direction in piece.directions() {
            let leading = piece.leading_cell(direction);
            let mut distance = 1;
            while let Some(cell) = shift(leading, direction, distance, board.height(), board.width())
            {
                if board.cell(cell) != EMPTY {
                    break;
                }
                candidates.push(Candidate::new(Move::new(piece.id, direction, distance)));
                distance += 1;
            }
        }
    }

    candidates
}
