//! Piece and move definitions.
//!
//! A piece occupies one straight run of cells. A move slides one piece a
//! number of cells in one direction; every move has an exact inverse.

use std::fmt;

use crate::geometry::{Cell, Direction, Orientation};

/// Identifier of a piece as it appears in the grid.
pub type PieceId = u32;

/// Cell value marking an empty cell. Never a piece identifier.
pub const EMPTY: PieceId = 0;

/// A piece's metadata, tracked alongside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: PieceId,
    /// Topmost/leftmost occupied cell.
    pub anchor: Cell,
    /// Run length.
    pub size: usize,
    /// Axis of the run; `None` for single-cell pieces, which may slide either way.
    pub orientation: Option<Orientation>,
}

impl Piece {
    /// Cells covered by this piece, starting at the anchor.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let (row, column) = self.anchor;
        (0..self.size).map(move |i| match self.orientation {
            Some(Orientation::Vertical) => (row + i, column),
            _ => (row, column + i),
        })
    }

    /// The last cell of the run, opposite the anchor.
    pub fn tail(&self) -> Cell {
        let (row, column) = self.anchor;
        match self.orientation {
            Some(Orientation::Vertical) => (row + self.size - 1, column),
            Some(Orientation::Horizontal) => (row, column + self.size - 1),
            None => self.anchor,
        }
    }

    /// The end of the run facing `direction`.
    pub fn leading_cell(&self, direction: Direction) -> Cell {
        if direction.is_forward() {
            self.tail()
        } else {
            self.anchor
        }
    }

    /// Directions this piece may slide in, in generation order.
    pub fn directions(&self) -> &'static [Direction] {
        match self.orientation {
            Some(orientation) => orientation.directions(),
            None => &Direction::ALL,
        }
    }
}

/// Slide `piece` by `distance` cells toward `direction`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub piece: PieceId,
    pub direction: Direction,
    pub distance: usize,
}

impl Move {
    pub const fn new(piece: PieceId, direction: Direction, distance: usize) -> Self {
        Self {
            piece,
            direction,
            distance,
        }
    }

    /// The move that undoes this one.
    pub const fn inverse(self) -> Self {
        Self::new(self.piece, self.direction.opposite(), self.distance)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "piece {} {} {}",
            self.piece, self.direction, self.distance
        )
    }
}

/// A generated move together with the move that reverts it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub forward: Move,
    pub reverse: Move,
}

impl Candidate {
    pub const fn new(forward: Move) -> Self {
        Self {
            forward,
            reverse: forward.inverse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_of_inverse_is_identity() {
        let m = Move::new(4, Direction::Left, 3);
        assert_eq!(m.inverse(), Move::new(4, Direction::Right, 3));
        assert_eq!(m.inverse().inverse(), m);
    }

    #[test]
    fn test_cells_follow_orientation() {
        let vertical = Piece {
            id: 2,
            anchor: (1, 3),
            size: 3,
            orientation: Some(Orientation::Vertical),
        };
        let cells: Vec<Cell> = vertical.cells().collect();
        assert_eq!(cells, vec![(1, 3), (2, 3), (3, 3)]);
        assert_eq!(vertical.leading_cell(Direction::Down), (3, 3));
        assert_eq!(vertical.leading_cell(Direction::Up), (1, 3));
    }

    #[test]
    fn test_single_cell_piece_moves_both_axes() {
        let block = Piece {
            id: 9,
            anchor: (0, 0),
            size: 1,
            orientation: None,
        };
        assert_eq!(block.directions().len(), 4);
        assert_eq!(block.tail(), block.anchor);
    }

    #[test]
    fn test_straight_piece_moves_along_its_axis() {
        let car = Piece {
            id: 2,
            anchor: (0, 0),
            size: 2,
            orientation: Some(Orientation::Vertical),
        };
        assert_eq!(car.directions(), &[Direction::Down, Direction::Up]);
    }

    #[test]
    fn test_move_display() {
        assert_eq!(Move::new(3, Direction::Left, 2).to_string(), "piece 3 left 2");
    }
}
