//! Sliding-Piece Puzzle Solver Library
//!
//! Provides a bounded-depth backtracking search over reversible moves, shared
//! by Rush Hour boards and sliding-tile puzzles.

pub mod error;
pub mod geometry;
pub mod grid;
pub mod movegen;
pub mod parse;
pub mod pieces;
pub mod rushhour;
pub mod solver;
pub mod tiles;
pub mod visited;

use error::Result;
use grid::Fingerprint;
use pieces::{Candidate, Move};

/// The seam between the search engine and a puzzle family.
///
/// The engine only sees moves, fingerprints and the goal test, so the same
/// depth-first search drives every implementation.
pub trait SlidingPuzzle {
    /// Every legal move from the current state, each paired with its inverse.
    ///
    /// The order must be deterministic; it is the exploration order.
    fn candidates(&self) -> Vec<Candidate>;

    /// Applies a move in place.
    ///
    /// Rejected moves leave the state untouched.
    fn apply(&mut self, mv: Move) -> Result<()>;

    /// Whether the current state is solved.
    fn is_goal(&self) -> bool;

    /// Exact, hashable encoding of the current state.
    fn fingerprint(&self) -> Fingerprint;
}
