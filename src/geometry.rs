//! Directions, orientations and bounds-checked cell arithmetic.
//!
//! Rows grow downward and columns grow rightward, so `Up` decreases the row
//! and `Left` decreases the column. All shifting goes through [`shift`],
//! which refuses to leave the grid instead of wrapping.

use std::fmt;
use std::str::FromStr;

/// A grid cell as `(row, column)`.
pub type Cell = (usize, usize);

/// One of the four sliding directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in the order used when a piece may move along both axes.
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    /// The direction pointing the other way.
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The axis this direction slides along.
    pub const fn orientation(self) -> Orientation {
        match self {
            Direction::Up | Direction::Down => Orientation::Vertical,
            Direction::Left | Direction::Right => Orientation::Horizontal,
        }
    }

    /// True for `Down` and `Right`, the directions that grow an index.
    pub const fn is_forward(self) -> bool {
        matches!(self, Direction::Down | Direction::Right)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        })
    }
}

impl FromStr for Direction {
    type Err = String;

    /// Parses a direction name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(s.to_string()),
        }
    }
}

/// The axis a multi-cell piece is locked to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// The two directions along this axis, forward end first.
    pub const fn directions(self) -> &'static [Direction] {
        match self {
            Orientation::Horizontal => &[Direction::Right, Direction::Left],
            Orientation::Vertical => &[Direction::Down, Direction::Up],
        }
    }
}

/// Moves `cell` by `distance` steps in `direction`.
///
/// Returns `None` if the result would fall outside a `height` x `width` grid.
#[inline]
pub fn shift(
    cell: Cell,
    direction: Direction,
    distance: usize,
    height: usize,
    width: usize,
) -> Option<Cell> {
    let (row, column) = cell;
    let (row, column) = match direction {
        Direction::Up => (row.checked_sub(distance)?, column),
        Direction::Down => (row.checked_add(distance)?, column),
        Direction::Left => (row, column.checked_sub(distance)?),
        Direction::Right => (row, column.checked_add(distance)?),
    };

    (row < height && column < width).then_some((row, column))
}
