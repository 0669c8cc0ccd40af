//! Grid representation and operations for sliding-piece boards.
//!
//! The grid is a flat row-major array where each cell holds a piece
//! identifier or [`EMPTY`]. A piece table tracks each piece's anchor, size
//! and orientation; it is built once from the cells and then kept in sync by
//! [`Board::apply`], never re-derived.

use crate::error::{IllegalMoveReason, PuzzleError, Result};
use crate::geometry::{shift, Cell, Orientation};
use crate::pieces::{Move, Piece, PieceId, EMPTY};

/// Hashable snapshot of a board state.
///
/// Two states are the same iff their fingerprints are equal; identifiers
/// are fixed, so this is exact equality rather than isomorphism.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(Box<[u32]>);

impl Fingerprint {
    pub fn new(values: impl Into<Box<[u32]>>) -> Self {
        Self(values.into())
    }
}

/// Rectangular grid of pieces plus the tracked piece table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    height: usize,
    width: usize,
    cells: Vec<PieceId>,
    /// Pieces in order of their anchor's first appearance in a row-major scan.
    pieces: Vec<Piece>,
}

impl Board {
    /// Builds a board from row-major cells, inferring the piece table.
    ///
    /// Every non-empty identifier must cover one straight contiguous run.
    pub fn from_cells(height: usize, width: usize, cells: Vec<PieceId>) -> Result<Self> {
        if height.checked_mul(width) != Some(cells.len()) {
            return Err(PuzzleError::Dimensions {
                height,
                width,
                found: cells.len(),
            });
        }

        let mut pieces: Vec<Piece> = Vec::new();
        for (index, &id) in cells.iter().enumerate() {
            if id == EMPTY || pieces.iter().any(|piece| piece.id == id) {
                continue;
            }
            let anchor = (index / width, index % width);
            pieces.push(infer_piece(&cells, width, id, anchor)?);
        }

        Ok(Self {
            height,
            width,
            cells,
            pieces,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Content of the cell at `(row, column)`.
    #[inline]
    pub fn cell(&self, (row, column): Cell) -> PieceId {
        self.cells[cell_to_idx(self.width, row, column)]
    }

    pub fn cells(&self) -> &[PieceId] {
        &self.cells
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Looks up a piece in the table.
    pub fn piece(&self, id: PieceId) -> Result<&Piece> {
        self.pieces
            .iter()
            .find(|piece| piece.id == id)
            .ok_or(PuzzleError::InvalidPieceId(id))
    }

    /// Slides a piece in place.
    ///
    /// Every cell the run sweeps through must be inside the grid and empty.
    /// Nothing is modified when the move is rejected.
    pub fn apply(&mut self, mv: Move) -> Result<()> {
        let index = self
            .pieces
            .iter()
            .position(|piece| piece.id == mv.piece)
            .ok_or(PuzzleError::InvalidPieceId(mv.piece))?;
        let piece = self.pieces[index];

        if mv.distance == 0 {
            return Err(PuzzleError::illegal(mv, IllegalMoveReason::ZeroDistance));
        }
        if piece
            .orientation
            .is_some_and(|orientation| orientation != mv.direction.orientation())
        {
            return Err(PuzzleError::illegal(mv, IllegalMoveReason::OffAxis));
        }

        let leading = piece.leading_cell(mv.direction);
        for step in 1..=mv.distance {
            let cell = shift(leading, mv.direction, step, self.height, self.width)
                .ok_or_else(|| PuzzleError::illegal(mv, IllegalMoveReason::OutOfBounds))?;
            let occupant = self.cell(cell);
            if occupant != EMPTY && occupant != mv.piece {
                return Err(PuzzleError::illegal(
                    mv,
                    IllegalMoveReason::Blocked(occupant),
                ));
            }
        }

        // the leading end stayed in bounds, so the anchor does too
        let anchor = shift(piece.anchor, mv.direction, mv.distance, self.height, self.width)
            .ok_or_else(|| PuzzleError::illegal(mv, IllegalMoveReason::OutOfBounds))?;

        for (row, column) in piece.cells() {
            self.cells[cell_to_idx(self.width, row, column)] = EMPTY;
        }
        self.pieces[index].anchor = anchor;
        let moved = self.pieces[index];
        for (row, column) in moved.cells() {
            self.cells[cell_to_idx(self.width, row, column)] = moved.id;
        }

        Ok(())
    }

    /// Encodes every piece's anchor and orientation, in piece-table order.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut values = Vec::with_capacity(self.pieces.len() * 3);
        for piece in &self.pieces {
            let (row, column) = piece.anchor;
            let orientation = match piece.orientation {
                None => 0,
                Some(Orientation::Horizontal) => 1,
                Some(Orientation::Vertical) => 2,
            };
            values.extend([row as u32, column as u32, orientation]);
        }
        Fingerprint::new(values)
    }
}

/// Converts `(row, column)` to a linear cell index.
#[inline(always)]
pub const fn cell_to_idx(width: usize, row: usize, column: usize) -> usize {
    row * width + column
}

/// Reads the run of `id` starting at its anchor and checks nothing else carries `id`.
fn infer_piece(cells: &[PieceId], width: usize, id: PieceId, anchor: Cell) -> Result<Piece> {
    let height = cells.len() / width;
    let (row, column) = anchor;

    let run_length = |orientation: Orientation| {
        (0..)
            .map(|i| match orientation {
                Orientation::Horizontal => (row, column + i),
                Orientation::Vertical => (row + i, column),
            })
            .take_while(|&(r, c)| r < height && c < width && cells[cell_to_idx(width, r, c)] == id)
            .count()
    };

    let horizontal = run_length(Orientation::Horizontal);
    let vertical = run_length(Orientation::Vertical);
    if horizontal > 1 && vertical > 1 {
        return Err(PuzzleError::MalformedPiece(id));
    }

    let (size, orientation) = if horizontal > 1 {
        (horizontal, Some(Orientation::Horizontal))
    } else if vertical > 1 {
        (vertical, Some(Orientation::Vertical))
    } else {
        (1, None)
    };

    let total = cells.iter().filter(|&&cell| cell == id).count();
    if total != size {
        return Err(PuzzleError::MalformedPiece(id));
    }

    Ok(Piece {
        id,
        anchor,
        size,
        orientation,
    })
}

/// Formats a grid as one line per row.
///
/// Identifiers are left-aligned to the widest one; empty cells show as '.'.
pub fn format_grid(height: usize, width: usize, cells: &[PieceId]) -> String {
    let column_width = cells
        .iter()
        .map(|id| id.to_string().len())
        .max()
        .unwrap_or(1);

    let mut output = String::new();
    for row in 0..height {
        let mut line = String::new();
        for column in 0..width {
            if column > 0 {
                line.push(' ');
            }
            let id = cells[cell_to_idx(width, row, column)];
            let label = if id == EMPTY {
                ".".to_string()
            } else {
                id.to_string()
            };
            line.push_str(&format!("{:<column_width$}", label));
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output
}

/// Formats a board using [`format_grid`].
pub fn format_board(board: &Board) -> String {
    format_grid(board.height, board.width, &board.cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Direction;

    fn board(height: usize, width: usize, cells: &[PieceId]) -> Board {
        Board::from_cells(height, width, cells.to_vec()).unwrap()
    }

    #[test]
    fn test_piece_table_inferred_in_scan_order() {
        let b = board(3, 3, &[5, 5, 0, 1, 1, 2, 3, 3, 3]);
        let ids: Vec<PieceId> = b.pieces().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![5, 1, 2, 3]);

        let blocker = b.piece(2).unwrap();
        assert_eq!(blocker.size, 1);
        assert_eq!(blocker.orientation, None);
        assert_eq!(b.piece(3).unwrap().size, 3);
    }

    #[test]
    fn test_vertical_piece_inferred() {
        let b = board(3, 2, &[0, 7, 0, 7, 0, 0]);
        let piece = b.piece(7).unwrap();
        assert_eq!(piece.anchor, (0, 1));
        assert_eq!(piece.size, 2);
        assert_eq!(piece.orientation, Some(Orientation::Vertical));
    }

    #[test]
    fn test_split_piece_rejected() {
        let result = Board::from_cells(2, 3, vec![4, 0, 4, 0, 0, 0]);
        assert_eq!(result, Err(PuzzleError::MalformedPiece(4)));
    }

    #[test]
    fn test_bent_piece_rejected() {
        let result = Board::from_cells(2, 2, vec![4, 4, 4, 0]);
        assert_eq!(result, Err(PuzzleError::MalformedPiece(4)));
    }

    #[test]
    fn test_wrong_cell_count_rejected() {
        let result = Board::from_cells(2, 2, vec![0, 0, 0]);
        assert!(matches!(result, Err(PuzzleError::Dimensions { found: 3, .. })));

        // the product would wrap to 2
        let result = Board::from_cells(2, usize::MAX / 2 + 2, vec![1, 1]);
        assert!(matches!(result, Err(PuzzleError::Dimensions { found: 2, .. })));
    }

    #[test]
    fn test_apply_updates_cells_and_anchor() {
        let mut b = board(2, 4, &[1, 1, 0, 0, 0, 0, 0, 0]);
        b.apply(Move::new(1, Direction::Right, 2)).unwrap();
        assert_eq!(b.cells(), &[0, 0, 1, 1, 0, 0, 0, 0]);
        assert_eq!(b.piece(1).unwrap().anchor, (0, 2));
    }

    #[test]
    fn test_apply_rejects_blocked_path_without_mutation() {
        let mut b = board(1, 4, &[1, 1, 0, 2]);
        let before = b.clone();
        let err = b.apply(Move::new(1, Direction::Right, 2)).unwrap_err();
        assert_eq!(
            err,
            PuzzleError::IllegalMove {
                mv: Move::new(1, Direction::Right, 2),
                reason: IllegalMoveReason::Blocked(2),
            }
        );
        assert_eq!(b, before);
    }

    #[test]
    fn test_apply_rejects_out_of_bounds_and_off_axis() {
        let mut b = board(2, 3, &[1, 1, 0, 0, 0, 0]);
        assert!(matches!(
            b.apply(Move::new(1, Direction::Right, 2)),
            Err(PuzzleError::IllegalMove {
                reason: IllegalMoveReason::OutOfBounds,
                ..
            })
        ));
        assert!(matches!(
            b.apply(Move::new(1, Direction::Down, 1)),
            Err(PuzzleError::IllegalMove {
                reason: IllegalMoveReason::OffAxis,
                ..
            })
        ));
        assert!(matches!(
            b.apply(Move::new(1, Direction::Right, 0)),
            Err(PuzzleError::IllegalMove {
                reason: IllegalMoveReason::ZeroDistance,
                ..
            })
        ));
    }

    #[test]
    fn test_apply_unknown_piece() {
        let mut b = board(1, 2, &[1, 0]);
        assert_eq!(
            b.apply(Move::new(8, Direction::Right, 1)),
            Err(PuzzleError::InvalidPieceId(8))
        );
    }

    #[test]
    fn test_fingerprint_tracks_positions() {
        let mut b = board(2, 3, &[1, 1, 0, 2, 0, 0]);
        let start = b.fingerprint();
        b.apply(Move::new(2, Direction::Right, 1)).unwrap();
        assert_ne!(b.fingerprint(), start);
        b.apply(Move::new(2, Direction::Left, 1)).unwrap();
        assert_eq!(b.fingerprint(), start);
    }

    #[test]
    fn test_format_grid_pads_wide_identifiers() {
        let output = format_grid(2, 3, &[12, 12, 0, 3, 0, 0]);
        assert_eq!(output, "12 12 .\n3  .  .\n");
    }
}
