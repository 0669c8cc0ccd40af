//! Text input for puzzles.
//!
//! Rush Hour format, keywords in any order and any case:
//!
//! ```text
//! width 6
//! height 6
//! car 1        # goal car
//! exit right
//! <height rows of width identifiers, 0 = empty>
//! ```
//!
//! Tile puzzles use the same layout with only `width` and `height`.
//! Anything after `#` on a line is ignored.

use crate::error::{ParseError, Result};
use crate::geometry::Direction;
use crate::grid::Board;
use crate::pieces::PieceId;
use crate::rushhour::RushHour;
use crate::tiles::TilePuzzle;

/// Keywords and cells collected from one description.
#[derive(Debug, Default)]
struct Description {
    width: Option<usize>,
    height: Option<usize>,
    car: Option<PieceId>,
    exit: Option<Direction>,
    cells: Vec<PieceId>,
}

impl Description {
    /// Returns `(height, width)` after checking the cell count.
    fn dimensions(&self) -> std::result::Result<(usize, usize), ParseError> {
        let width = self.width.ok_or(ParseError::MissingKeyword("width"))?;
        let height = self.height.ok_or(ParseError::MissingKeyword("height"))?;
        let size = width
            .checked_mul(height)
            .ok_or_else(|| ParseError::InvalidValue {
                keyword: "height",
                value: height.to_string(),
            })?;
        if self.cells.len() != size {
            return Err(ParseError::CellCount {
                height,
                width,
                found: self.cells.len(),
            });
        }
        Ok((height, width))
    }
}

/// Parses a Rush Hour description.
pub fn parse_rush_hour(text: &str) -> Result<RushHour> {
    let description = scan(text, true)?;
    let (height, width) = description.dimensions()?;
    let car = description.car.ok_or(ParseError::MissingKeyword("car"))?;
    let exit = description.exit.ok_or(ParseError::MissingKeyword("exit"))?;

    let board = Board::from_cells(height, width, description.cells)?;
    RushHour::new(board, car, exit)
}

/// Parses a sliding-tile description.
pub fn parse_tiles(text: &str) -> Result<TilePuzzle> {
    let description = scan(text, false)?;
    let (height, width) = description.dimensions()?;
    TilePuzzle::new(height, width, description.cells)
}

fn scan(text: &str, rush_hour: bool) -> std::result::Result<Description, ParseError> {
    let mut description = Description::default();
    let mut tokens = text
        .lines()
        .map(|line| line.split_once('#').map_or(line, |(content, _)| content))
        .flat_map(str::split_whitespace);

    while let Some(token) = tokens.next() {
        match token.to_ascii_lowercase().as_str() {
            "width" => {
                let value = number("width", tokens.next())?;
                set_once(&mut description.width, "width", value)?;
            }
            "height" => {
                let value = number("height", tokens.next())?;
                set_once(&mut description.height, "height", value)?;
            }
            "car" if rush_hour => {
                let value = number("car", tokens.next())?;
                set_once(&mut description.car, "car", value)?;
            }
            "exit" if rush_hour => {
                let value = tokens.next().ok_or(ParseError::InvalidValue {
                    keyword: "exit",
                    value: String::new(),
                })?;
                let direction = value
                    .parse::<Direction>()
                    .map_err(ParseError::UnknownDirection)?;
                set_once(&mut description.exit, "exit", direction)?;
            }
            _ => {
                let cell = token
                    .parse::<PieceId>()
                    .map_err(|_| ParseError::UnexpectedToken(token.to_string()))?;
                description.cells.push(cell);
            }
        }
    }

    Ok(description)
}

fn number<T: std::str::FromStr>(
    keyword: &'static str,
    token: Option<&str>,
) -> std::result::Result<T, ParseError> {
    let token = token.unwrap_or_default();
    token.parse().map_err(|_| ParseError::InvalidValue {
        keyword,
        value: token.to_string(),
    })
}

fn set_once<T>(
    slot: &mut Option<T>,
    keyword: &'static str,
    value: T,
) -> std::result::Result<(), ParseError> {
    if slot.replace(value).is_some() {
        return Err(ParseError::DuplicateKeyword(keyword));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PuzzleError;
    use crate::SlidingPuzzle;

    const SAMPLE: &str = "
        WIDTH 3
        height 3
        Car 1     # goal
        exit Right
        5 5 0
        1 1 2
        3 3 3
    ";

    #[test]
    fn test_parse_rush_hour() {
        let puzzle = parse_rush_hour(SAMPLE).unwrap();
        assert_eq!(puzzle.goal(), 1);
        assert_eq!(puzzle.exit(), Direction::Right);
        assert_eq!(puzzle.board().height(), 3);
        assert_eq!(puzzle.board().cells(), &[5, 5, 0, 1, 1, 2, 3, 3, 3]);
        assert!(!puzzle.is_goal());
    }

    #[test]
    fn test_keywords_in_any_order() {
        let text = "exit left 1 1 0 car 1 height 1 width 3";
        let puzzle = parse_rush_hour(text).unwrap();
        assert!(puzzle.is_goal());
    }

    #[test]
    fn test_missing_keyword() {
        let err = parse_rush_hour("width 2 height 1 exit up 0 0").unwrap_err();
        assert_eq!(err, PuzzleError::Parse(ParseError::MissingKeyword("car")));
    }

    #[test]
    fn test_wrong_cell_count() {
        let err = parse_rush_hour("width 2 height 2 car 1 exit up 1 1 0").unwrap_err();
        assert_eq!(
            err,
            PuzzleError::Parse(ParseError::CellCount {
                height: 2,
                width: 2,
                found: 3,
            })
        );
    }

    #[test]
    fn test_unknown_exit_and_bad_values() {
        assert_eq!(
            parse_rush_hour("width 1 height 1 car 1 exit north 1").unwrap_err(),
            PuzzleError::Parse(ParseError::UnknownDirection("north".to_string()))
        );
        assert_eq!(
            parse_rush_hour("width x height 1 car 1 exit up 1").unwrap_err(),
            PuzzleError::Parse(ParseError::InvalidValue {
                keyword: "width",
                value: "x".to_string(),
            })
        );
        assert_eq!(
            parse_rush_hour("width 1 width 1 height 1 car 1 exit up 1").unwrap_err(),
            PuzzleError::Parse(ParseError::DuplicateKeyword("width"))
        );
        assert_eq!(
            parse_rush_hour("width 1 height 1 car 1 exit up A").unwrap_err(),
            PuzzleError::Parse(ParseError::UnexpectedToken("A".to_string()))
        );
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        assert_eq!(
            parse_tiles("width 4294967296 height 4294967296 1").unwrap_err(),
            PuzzleError::Parse(ParseError::InvalidValue {
                keyword: "height",
                value: "4294967296".to_string(),
            })
        );
        let huge = usize::MAX.to_string();
        let text = format!("width {huge} height 2 car 1 exit right 1 1");
        assert!(matches!(
            parse_rush_hour(&text),
            Err(PuzzleError::Parse(ParseError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_parse_tiles() {
        let puzzle = parse_tiles("width 3 height 3\n1 2 3\n4 0 6\n7 5 8\n").unwrap();
        assert_eq!(puzzle.cells(), &[1, 2, 3, 4, 0, 6, 7, 5, 8]);
        assert!(parse_tiles("width 2 height 1 car 1 1 0").is_err());
    }
}
