//! Sliding-tile puzzles (8-puzzle, 15-puzzle and other sizes).
//!
//! Tiles are numbered `1..height*width`, the blank is `0`. A move slides the
//! tile next to the blank into it, so every move has distance one and the
//! blank ends up where the tile was.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{IllegalMoveReason, PuzzleError, Result};
use crate::geometry::{shift, Direction};
use crate::grid::{cell_to_idx, format_grid, Fingerprint};
use crate::pieces::{Candidate, Move, PieceId, EMPTY};
use crate::SlidingPuzzle;

/// Order in which tiles around the blank are offered: below, right, above, left.
const NEIGHBOURS: [Direction; 4] = [
    Direction::Down,
    Direction::Right,
    Direction::Up,
    Direction::Left,
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TilePuzzle {
    height: usize,
    width: usize,
    cells: Vec<PieceId>,
    /// Index of the blank cell.
    blank: usize,
}

impl TilePuzzle {
    /// Builds a puzzle from row-major cells.
    ///
    /// The cells must hold each of `0..height*width` exactly once.
    pub fn new(height: usize, width: usize, cells: Vec<PieceId>) -> Result<Self> {
        let size = tile_count(height, width)?;
        if cells.len() != size {
            return Err(PuzzleError::Dimensions {
                height,
                width,
                found: cells.len(),
            });
        }

        let mut seen = vec![false; size];
        for &tile in &cells {
            let slot = seen
                .get_mut(tile as usize)
                .ok_or(PuzzleError::InvalidTiles(size))?;
            if *slot {
                return Err(PuzzleError::InvalidTiles(size));
            }
            *slot = true;
        }

        let blank = cells
            .iter()
            .position(|&tile| tile == EMPTY)
            .ok_or(PuzzleError::InvalidTiles(size))?;

        Ok(Self {
            height,
            width,
            cells,
            blank,
        })
    }

    /// The solved arrangement: ascending tiles, blank last.
    pub fn solved(height: usize, width: usize) -> Result<Self> {
        let size = tile_count(height, width)?;
        let cells = (1..size as PieceId).chain([EMPTY]).collect();
        Ok(Self {
            height,
            width,
            cells,
            blank: size - 1,
        })
    }

    /// A random arrangement that can be solved.
    ///
    /// Shuffles the tiles and retries until the permutation has the right
    /// parity. Boards one tile wide or tall cannot be scrambled and are
    /// returned solved.
    pub fn scrambled<R: Rng + ?Sized>(height: usize, width: usize, rng: &mut R) -> Result<Self> {
        let mut puzzle = Self::solved(height, width)?;
        if height == 1 || width == 1 {
            return Ok(puzzle);
        }
        loop {
            puzzle.cells.shuffle(rng);
            puzzle.blank = puzzle
                .cells
                .iter()
                .position(|&tile| tile == EMPTY)
                .unwrap_or_default();
            if puzzle.is_solvable() {
                return Ok(puzzle);
            }
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn cells(&self) -> &[PieceId] {
        &self.cells
    }

    /// Number of tile pairs that appear in the wrong relative order, blank ignored.
    pub fn inversions(&self) -> usize {
        let tiles: Vec<PieceId> = self
            .cells
            .iter()
            .copied()
            .filter(|&tile| tile != EMPTY)
            .collect();

        tiles
            .iter()
            .enumerate()
            .map(|(i, &tile)| tiles[i + 1..].iter().filter(|&&later| later < tile).count())
            .sum()
    }

    /// Whether the solved arrangement is reachable at all.
    ///
    /// On a single row or column tiles never pass each other, so only the
    /// ascending order is solvable. With an odd width a vertical move shifts a tile past an even number of
    /// others, so inversion parity is invariant. With an even width each
    /// vertical move flips inversion parity and changes the blank row by one,
    /// so their combined parity is invariant instead.
    pub fn is_solvable(&self) -> bool {
        let inversions = self.inversions();
        if self.height == 1 || self.width == 1 {
            inversions == 0
        } else if self.width % 2 == 1 {
            inversions % 2 == 0
        } else {
            let blank_row = self.blank / self.width;
            (inversions + blank_row) % 2 == (self.height - 1) % 2
        }
    }

    fn tile_position(&self, tile: PieceId) -> Result<usize> {
        if tile == EMPTY {
            return Err(PuzzleError::InvalidPieceId(tile));
        }
        self.cells
            .iter()
            .position(|&cell| cell == tile)
            .ok_or(PuzzleError::InvalidPieceId(tile))
    }

    fn blank_cell(&self) -> (usize, usize) {
        (self.blank / self.width, self.blank % self.width)
    }
}

/// Number of cells, rejecting empty grids and ones too large to number.
fn tile_count(height: usize, width: usize) -> Result<usize> {
    height
        .checked_mul(width)
        .filter(|&size| size > 0 && PieceId::try_from(size).is_ok())
        .ok_or(PuzzleError::GridSize { height, width })
}

impl SlidingPuzzle for TilePuzzle {
    fn candidates(&self) -> Vec<Candidate> {
        NEIGHBOURS
            .iter()
            .filter_map(|&side| {
                let (row, column) =
                    shift(self.blank_cell(), side, 1, self.height, self.width)?;
                let tile = self.cells[cell_to_idx(self.width, row, column)];
                Some(Candidate::new(Move::new(tile, side.opposite(), 1)))
            })
            .collect()
    }

    fn apply(&mut self, mv: Move) -> Result<()> {
        let from = self.tile_position(mv.piece)?;
        if mv.distance != 1 {
            let reason = if mv.distance == 0 {
                IllegalMoveReason::ZeroDistance
            } else {
                IllegalMoveReason::NotAdjacentToBlank
            };
            return Err(PuzzleError::illegal(mv, reason));
        }

        let cell = (from / self.width, from % self.width);
        let (row, column) = shift(cell, mv.direction, 1, self.height, self.width)
            .ok_or_else(|| PuzzleError::illegal(mv, IllegalMoveReason::OutOfBounds))?;
        let to = cell_to_idx(self.width, row, column);
        if to != self.blank {
            return Err(PuzzleError::illegal(
                mv,
                IllegalMoveReason::Blocked(self.cells[to]),
            ));
        }

        self.cells.swap(from, to);
        self.blank = from;
        Ok(())
    }

    /// Every cell holds its row-major index plus one, except the last.
    fn is_goal(&self) -> bool {
        self.cells
            .iter()
            .take(self.cells.len().saturating_sub(1))
            .enumerate()
            .all(|(index, &tile)| tile as usize == index + 1)
    }

    fn fingerprint(&self) -> Fingerprint {
        Fingerprint::new(self.cells.clone())
    }
}

impl fmt::Display for TilePuzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_grid(self.height, self.width, &self.cells))
    }
}
