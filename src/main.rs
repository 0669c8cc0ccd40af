//! Sliding-Piece Puzzle Solver
//!
//! Solves Rush Hour boards and sliding-tile puzzles with a bounded
//! depth-first search, then replays the solution on a fresh copy of the
//! board to verify it.

use std::fmt::Display;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use gridlock::error::PuzzleError;
use gridlock::parse::{parse_rush_hour, parse_tiles};
use gridlock::pieces::Move;
use gridlock::solver::{self, Outcome, SearchConfig, Strategy, DEFAULT_MAX_BOUND};
use gridlock::tiles::TilePuzzle;
use gridlock::SlidingPuzzle;

/// Solves sliding-piece puzzles by bounded backtracking search.
#[derive(Parser)]
#[command(name = "gridlock")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a Rush Hour board file.
    Solve {
        file: PathBuf,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Solve a sliding-tile puzzle file, or a random scramble if no file is given.
    Tiles {
        file: Option<PathBuf>,
        /// Side length of a random scramble.
        #[arg(long, default_value_t = 3, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        size: usize,
        /// Seed for the random scramble.
        #[arg(long)]
        seed: Option<u64>,
        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(Args)]
struct SearchArgs {
    #[arg(long, value_enum, default_value_t = StrategyArg::Iterative)]
    strategy: StrategyArg,
    /// Maximum number of moves in a solution.
    #[arg(long, default_value_t = DEFAULT_MAX_BOUND)]
    max_bound: usize,
    /// Give up after this many seconds.
    #[arg(long)]
    time_limit: Option<u64>,
    /// Print the board after every move of the solution.
    #[arg(long)]
    show_steps: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Iterative deepening with a closed list; fewest moves.
    Iterative,
    /// A single depth-first pass; first solution found.
    DepthFirst,
}

impl SearchArgs {
    fn config(&self) -> SearchConfig {
        SearchConfig {
            strategy: match self.strategy {
                StrategyArg::Iterative => Strategy::IterativeDeepening,
                StrategyArg::DepthFirst => Strategy::DepthFirst,
            },
            max_bound: self.max_bound,
            time_limit: self.time_limit.map(Duration::from_secs),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Solve { file, search } => run_rush_hour(&file, &search),
        Command::Tiles {
            file,
            size,
            seed,
            search,
        } => run_tiles(file.as_deref(), size, seed, &search),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

/// Installs the log subscriber on stderr.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Parses and solves a Rush Hour file.
fn run_rush_hour(file: &Path, args: &SearchArgs) -> Result<bool, String> {
    let text = std::fs::read_to_string(file)
        .map_err(|e| format!("Cannot open \"{}\": {}", file.display(), e))?;
    let puzzle = parse_rush_hour(&text)
        .map_err(|e| format!("Errors in input file \"{}\": {}", file.display(), e))?;

    run_search(&puzzle, args)
}

/// Solves a tile file, or a random solvable scramble.
fn run_tiles(
    file: Option<&Path>,
    size: usize,
    seed: Option<u64>,
    args: &SearchArgs,
) -> Result<bool, String> {
    let puzzle = match file {
        Some(file) => {
            let text = std::fs::read_to_string(file)
                .map_err(|e| format!("Cannot open \"{}\": {}", file.display(), e))?;
            parse_tiles(&text)
                .map_err(|e| format!("Errors in input file \"{}\": {}", file.display(), e))?
        }
        None => {
            let seed = seed.unwrap_or_else(rand::random);
            println!("Scramble seed {}", seed);
            TilePuzzle::scrambled(size, size, &mut StdRng::seed_from_u64(seed))
                .map_err(|e| format!("Cannot scramble a {}x{} puzzle: {}", size, size, e))?
        }
    };

    if !puzzle.is_solvable() {
        println!("{}", puzzle);
        println!("Unsolvable: tile permutation has the wrong parity");
        return Ok(false);
    }

    run_search(&puzzle, args)
}

/// Solves, verifies by replay, and prints the result.
fn run_search<P>(puzzle: &P, args: &SearchArgs) -> Result<bool, String>
where
    P: SlidingPuzzle + Clone + Display,
{
    println!("{}", puzzle);

    let outcome =
        solver::solve(puzzle, &args.config()).map_err(|e| format!("Search aborted: {}", e))?;
    let stats = *outcome.stats();

    let solved = match outcome {
        Outcome::Solved { moves, .. } => {
            let (trace, solved) = format_trace(puzzle, &moves, args.show_steps)
                .map_err(|e| format!("Solution failed to replay: {}", e))?;
            print!("{}", trace);
            solved
        }
        Outcome::NoSolutionWithinBound { max_bound, .. } => {
            println!("No solution within {} moves", max_bound);
            false
        }
        Outcome::TimedOut { .. } => {
            println!("Time limit reached before a solution was found");
            false
        }
    };

    println!(
        "Moves applied {}, states pruned {}, rounds {}, time {:.3?} ({:.0} moves per second)",
        stats.moves_applied,
        stats.states_pruned,
        stats.rounds,
        stats.elapsed,
        stats.moves_per_second()
    );

    Ok(solved)
}

/// Replays `moves` on a copy of `puzzle` and describes every step.
///
/// Returns the description and whether the last state is solved.
fn format_trace<P>(puzzle: &P, moves: &[Move], show_steps: bool) -> Result<(String, bool), PuzzleError>
where
    P: SlidingPuzzle + Clone + Display,
{
    let mut output = String::new();
    let mut board = puzzle.clone();

    let solved = solver::replay(&mut board, moves, |index, mv, state| {
        output.push_str(&format!("Move {}: {}\n", index + 1, mv));
        if show_steps {
            output.push_str(&format!("{}\n", state));
        }
    })?;

    output.push_str(&format!("Number of steps = {}\n", moves.len()));
    output.push_str(&format!("Solved = {}\n", solved));

    Ok((output, solved))
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_MOVES: &str = include_str!("../puzzles/three_moves.txt");
    const PARKING_LOT: &str = include_str!("../puzzles/parking_lot.txt");

    fn solve_moves<P: SlidingPuzzle + Clone>(puzzle: &P, config: SearchConfig) -> Vec<Move> {
        let outcome = solver::solve(puzzle, &config).unwrap();
        outcome.moves().expect("no solution").to_vec()
    }

    #[test]
    fn test_three_moves_trace_snapshot() {
        let puzzle = parse_rush_hour(THREE_MOVES).unwrap();
        let moves = solve_moves(&puzzle, SearchConfig::default());
        let (trace, solved) = format_trace(&puzzle, &moves, true).unwrap();

        assert!(solved);
        insta::assert_snapshot!(trace, @r"
        Move 1: piece 3 left 2
        . . 2 .
        1 1 2 .
        . . . .
        3 3 . .

        Move 2: piece 2 down 2
        . . . .
        1 1 . .
        . . 2 .
        3 3 2 .

        Move 3: piece 1 right 2
        . . . .
        . . 1 1
        . . 2 .
        3 3 2 .

        Number of steps = 3
        Solved = true
        ");
    }

    #[test]
    fn test_tiles_trace_snapshot() {
        let puzzle = parse_tiles("width 3 height 3 1 2 3 4 0 6 7 5 8").unwrap();
        let moves = solve_moves(&puzzle, SearchConfig::default());
        let (trace, solved) = format_trace(&puzzle, &moves, false).unwrap();

        assert!(solved);
        insta::assert_snapshot!(puzzle.to_string(), @r"
        1 2 3
        4 . 6
        7 5 8
        ");
        insta::assert_snapshot!(trace, @r"
        Move 1: piece 5 up 1
        Move 2: piece 8 left 1
        Number of steps = 2
        Solved = true
        ");
    }

    #[test]
    fn test_parking_lot_solution_replays() {
        let puzzle = parse_rush_hour(PARKING_LOT).unwrap();
        let moves = solve_moves(&puzzle, SearchConfig::iterative_deepening(12));

        let mut replayed = puzzle.clone();
        assert!(solver::apply_and_verify(&mut replayed, &moves).unwrap());
        assert!(moves.len() <= 8, "an 8-move solution exists");
    }

    #[test]
    fn test_search_args_map_to_config() {
        let args = SearchArgs {
            strategy: StrategyArg::DepthFirst,
            max_bound: 7,
            time_limit: Some(2),
            show_steps: false,
        };
        assert_eq!(
            args.config(),
            SearchConfig::depth_first(7).with_time_limit(Duration::from_secs(2))
        );
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "gridlock",
            "-vv",
            "solve",
            "board.txt",
            "--strategy",
            "depth-first",
            "--max-bound",
            "12",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Solve { file, search } => {
                assert_eq!(file, PathBuf::from("board.txt"));
                assert_eq!(search.config(), SearchConfig::depth_first(12));
            }
            Command::Tiles { .. } => panic!("parsed the wrong subcommand"),
        }
    }

    #[test]
    fn test_cli_rejects_empty_scramble() {
        assert!(Cli::try_parse_from(["gridlock", "tiles", "--size", "0"]).is_err());
        let cli = Cli::try_parse_from(["gridlock", "tiles", "--size", "4", "--seed", "9"]).unwrap();
        match cli.command {
            Command::Tiles { file, size, seed, .. } => {
                assert_eq!(file, None);
                assert_eq!((size, seed), (4, Some(9)));
            }
            Command::Solve { .. } => panic!("parsed the wrong subcommand"),
        }
    }
}
