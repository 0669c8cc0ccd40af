//! Rush Hour: slide the goal car out through one side of the parking lot.

use std::fmt;

use tracing::warn;

use crate::error::Result;
use crate::geometry::{Direction, Orientation};
use crate::grid::{format_board, Board, Fingerprint};
use crate::movegen::legal_moves;
use crate::pieces::{Candidate, Move, PieceId};
use crate::SlidingPuzzle;

/// A parking lot with a designated car and exit side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RushHour {
    board: Board,
    goal: PieceId,
    exit: Direction,
}

impl RushHour {
    /// Fails with `InvalidPieceId` if the goal car is not on the board.
    pub fn new(board: Board, goal: PieceId, exit: Direction) -> Result<Self> {
        let car = board.piece(goal)?;
        if !exit_reachable(car.orientation, exit) {
            warn!(
                car = goal,
                %exit,
                "goal car cannot slide toward the exit; puzzle is unsolvable"
            );
        }

        Ok(Self { board, goal, exit })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn goal(&self) -> PieceId {
        self.goal
    }

    pub fn exit(&self) -> Direction {
        self.exit
    }
}

impl SlidingPuzzle for RushHour {
    fn candidates(&self) -> Vec<Candidate> {
        legal_moves(&self.board)
    }

    fn apply(&mut self, mv: Move) -> Result<()> {
        self.board.apply(mv)
    }

    /// The goal car touches the exit side and lies along the exit axis.
    ///
    /// A single-cell goal car fits any exit.
    fn is_goal(&self) -> bool {
        let Ok(car) = self.board.piece(self.goal) else {
            return false;
        };
        if !exit_reachable(car.orientation, self.exit) {
            return false;
        }

        let (top, left) = car.anchor;
        let (bottom, right) = car.tail();
        match self.exit {
            Direction::Up => top == 0,
            Direction::Left => left == 0,
            Direction::Down => bottom == self.board.height() - 1,
            Direction::Right => right == self.board.width() - 1,
        }
    }

    fn fingerprint(&self) -> Fingerprint {
        self.board.fingerprint()
    }
}

impl fmt::Display for RushHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_board(&self.board))
    }
}

/// True if the goal car's axis allows it to reach `exit` at all.
pub fn exit_reachable(orientation: Option<Orientation>, exit: Direction) -> bool {
    orientation.map_or(true, |orientation| orientation == exit.orientation())
}
