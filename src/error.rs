//! Error types for puzzle input and search.

use thiserror::Error;

use crate::pieces::{Move, PieceId};

/// Malformed or incomplete puzzle description.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("cannot find \"{0}\"")]
    MissingKeyword(&'static str),

    #[error("invalid value {value:?} for \"{keyword}\"")]
    InvalidValue {
        keyword: &'static str,
        value: String,
    },

    #[error("\"{0}\" given more than once")]
    DuplicateKeyword(&'static str),

    #[error("unknown exit direction {0:?}")]
    UnknownDirection(String),

    #[error("number of cells should be {height}*{width}, found {found}")]
    CellCount {
        height: usize,
        width: usize,
        found: usize,
    },

    #[error("unexpected token {0:?}")]
    UnexpectedToken(String),
}

/// Why a move could not be applied.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMoveReason {
    #[error("piece would leave the board")]
    OutOfBounds,

    #[error("path is blocked by piece {0}")]
    Blocked(PieceId),

    #[error("piece cannot slide across its axis")]
    OffAxis,

    #[error("distance must be at least one cell")]
    ZeroDistance,

    #[error("tile is not next to the blank")]
    NotAdjacentToBlank,
}

/// Errors raised while building puzzles or searching them.
///
/// `IllegalMove` and `InvalidPieceId` raised during a search mean the move
/// generator and applier disagree; the search aborts on them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("board has {found} cells, expected {height}x{width}")]
    Dimensions {
        height: usize,
        width: usize,
        found: usize,
    },

    #[error("unsupported grid size {height}x{width}")]
    GridSize { height: usize, width: usize },

    #[error("piece {0} does not form a single straight run")]
    MalformedPiece(PieceId),

    #[error("tiles must be a permutation of 0..{0}")]
    InvalidTiles(usize),

    #[error("illegal move ({mv}): {reason}")]
    IllegalMove {
        mv: Move,
        reason: IllegalMoveReason,
    },

    #[error("piece {0} is not on the board")]
    InvalidPieceId(PieceId),
}

impl PuzzleError {
    pub(crate) fn illegal(mv: Move, reason: IllegalMoveReason) -> Self {
        PuzzleError::IllegalMove { mv, reason }
    }
}

/// Result type alias for puzzle operations.
pub type Result<T> = std::result::Result<T, PuzzleError>;
