//! Bounded depth-first search over reversible moves.
//!
//! The search mutates a single puzzle in place and undoes every move on the
//! way back up, so exactly one state is live at any time. Duplicate states
//! are rejected through a [`VisitedStates`] implementation:
//! - depth-first: path history only, one round at the maximum bound
//! - iterative deepening: path history plus a closed list, one round per
//!   bound from 1 up to the maximum, the closed list cleared between rounds
//!
//! A multi-cell slide counts as one move, so iterative deepening returns a
//! solution with the fewest moves, not the fewest cells travelled.

use std::ops::{Deref, DerefMut, RangeInclusive};
use std::time::{Duration, Instant};

use tracing::{debug, error, info, trace, warn};

use crate::error::Result;
use crate::pieces::{Candidate, Move};
use crate::visited::{GloballyScoped, PathScoped, VisitedStates};
use crate::SlidingPuzzle;

/// Default ceiling on the number of moves in a solution.
pub const DEFAULT_MAX_BOUND: usize = 50;

/// Nodes visited between two clock reads when a time limit is set.
const DEADLINE_CHECK_INTERVAL: u64 = 1024;

/// How the bound is applied and which duplicate states are pruned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// A single round at the maximum bound with path history only.
    /// Returns the first solution found, not necessarily the shortest.
    DepthFirst,
    /// Rounds with bounds 1, 2, ... up to the maximum, with a closed list.
    /// Returns a solution with the fewest moves.
    #[default]
    IterativeDeepening,
}

/// Search configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub strategy: Strategy,
    /// Maximum number of moves in a solution; also the recursion depth limit.
    pub max_bound: usize,
    /// Wall-clock budget for the whole search.
    pub time_limit: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            max_bound: DEFAULT_MAX_BOUND,
            time_limit: None,
        }
    }
}

impl SearchConfig {
    pub fn depth_first(max_bound: usize) -> Self {
        Self {
            strategy: Strategy::DepthFirst,
            max_bound,
            ..Self::default()
        }
    }

    pub fn iterative_deepening(max_bound: usize) -> Self {
        Self {
            strategy: Strategy::IterativeDeepening,
            max_bound,
            ..Self::default()
        }
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

/// Counters gathered during one solve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Forward moves applied, undos not counted.
    pub moves_applied: u64,
    /// States rejected by path history or the closed list.
    pub states_pruned: u64,
    /// Depth-bounded rounds started.
    pub rounds: usize,
    pub elapsed: Duration,
}

impl SearchStats {
    /// Forward moves applied per second of search.
    pub fn moves_per_second(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds > 0.0 {
            self.moves_applied as f64 / seconds
        } else {
            0.0
        }
    }
}

/// Result of a completed search. None of these are errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Moves from the initial state to a goal state, in order.
    Solved { moves: Vec<Move>, stats: SearchStats },
    /// Every state within the bound was explored without reaching the goal.
    NoSolutionWithinBound { max_bound: usize, stats: SearchStats },
    /// The time limit ran out first.
    TimedOut { stats: SearchStats },
}

impl Outcome {
    /// The solution, if one was found.
    pub fn moves(&self) -> Option<&[Move]> {
        match self {
            Outcome::Solved { moves, .. } => Some(moves),
            _ => None,
        }
    }

    pub fn stats(&self) -> &SearchStats {
        match self {
            Outcome::Solved { stats, .. }
            | Outcome::NoSolutionWithinBound { stats, .. }
            | Outcome::TimedOut { stats } => stats,
        }
    }
}

/// A move applied to a puzzle, reverted when dropped.
///
/// Call [`keep`](Self::keep) to leave the move in place, or
/// [`undo`](Self::undo) to revert it and observe any failure.
pub struct AppliedMove<'a, P: SlidingPuzzle> {
    puzzle: &'a mut P,
    reverse: Option<Move>,
}

impl<'a, P: SlidingPuzzle> AppliedMove<'a, P> {
    pub fn new(puzzle: &'a mut P, candidate: Candidate) -> Result<Self> {
        puzzle.apply(candidate.forward)?;
        Ok(Self {
            puzzle,
            reverse: Some(candidate.reverse),
        })
    }

    /// Leaves the move applied.
    pub fn keep(mut self) {
        self.reverse = None;
    }

    /// Reverts the move now.
    pub fn undo(mut self) -> Result<()> {
        match self.reverse.take() {
            Some(reverse) => self.puzzle.apply(reverse),
            None => Ok(()),
        }
    }
}

impl<P: SlidingPuzzle> Deref for AppliedMove<'_, P> {
    type Target = P;

    fn deref(&self) -> &P {
        &*self.puzzle
    }
}

impl<P: SlidingPuzzle> DerefMut for AppliedMove<'_, P> {
    fn deref_mut(&mut self) -> &mut P {
        &mut *self.puzzle
    }
}

impl<P: SlidingPuzzle> Drop for AppliedMove<'_, P> {
    fn drop(&mut self) {
        if let Some(reverse) = self.reverse.take() {
            if let Err(e) = self.puzzle.apply(reverse) {
                error!(%reverse, error = %e, "failed to revert move");
            }
        }
    }
}

/// How one subtree ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Found,
    Exhausted,
    Interrupted,
}

/// State owned by one solve call.
struct Search<V> {
    visited: V,
    /// Moves from the root to the current node.
    path: Vec<Move>,
    stats: SearchStats,
    started: Instant,
    deadline: Option<Instant>,
    nodes: u64,
}

impl<V: VisitedStates> Search<V> {
    fn new(visited: V, time_limit: Option<Duration>) -> Self {
        let started = Instant::now();
        Self {
            visited,
            path: Vec::new(),
            stats: SearchStats::default(),
            started,
            deadline: time_limit.map(|limit| started + limit),
            nodes: 0,
        }
    }

    fn out_of_time(&mut self) -> bool {
        let check = self.nodes % DEADLINE_CHECK_INTERVAL == 0;
        self.nodes += 1;
        match self.deadline {
            Some(deadline) if check => Instant::now() >= deadline,
            _ => false,
        }
    }

    /// Resets the visited states and runs one depth-bounded round from the root.
    fn round<P: SlidingPuzzle>(&mut self, puzzle: &mut P, bound: usize) -> Result<Step> {
        self.visited.clear();
        self.visited.enter(&puzzle.fingerprint(), 0);
        self.stats.rounds += 1;
        self.descend(puzzle, 0, bound)
    }

    fn descend<P: SlidingPuzzle>(
        &mut self,
        puzzle: &mut P,
        depth: usize,
        bound: usize,
    ) -> Result<Step> {
        if puzzle.is_goal() {
            return Ok(Step::Found);
        }
        if depth >= bound {
            return Ok(Step::Exhausted);
        }
        if self.out_of_time() {
            return Ok(Step::Interrupted);
        }

        for candidate in puzzle.candidates() {
            let mut applied = AppliedMove::new(&mut *puzzle, candidate)?;
            self.stats.moves_applied += 1;

            let key = applied.fingerprint();
            if !self.visited.admits(&key, depth + 1) {
                trace!(depth, mv = %candidate.forward, "state already visited");
                self.stats.states_pruned += 1;
                applied.undo()?;
                continue;
            }

            self.visited.enter(&key, depth + 1);
            self.path.push(candidate.forward);

            match self.descend(&mut *applied, depth + 1, bound)? {
                Step::Found => {
                    applied.keep();
                    return Ok(Step::Found);
                }
                Step::Interrupted => return Ok(Step::Interrupted),
                Step::Exhausted => {
                    self.path.pop();
                    self.visited.leave(&key);
                    applied.undo()?;
                }
            }
        }

        Ok(Step::Exhausted)
    }

    fn finish(&mut self) -> SearchStats {
        self.stats.elapsed = self.started.elapsed();
        self.stats
    }
}

/// Searches for a sequence of moves that solves `initial`.
///
/// The initial puzzle is not modified. `IllegalMove` or `InvalidPieceId`
/// errors mean the puzzle's move generator and applier disagree; they abort
/// the search. Running out of bound or time is reported through [`Outcome`].
pub fn solve<P>(initial: &P, config: &SearchConfig) -> Result<Outcome>
where
    P: SlidingPuzzle + Clone,
{
    let mut puzzle = initial.clone();

    match config.strategy {
        Strategy::DepthFirst => run(
            &mut puzzle,
            PathScoped::new(),
            config.max_bound..=config.max_bound,
            config.time_limit,
        ),
        Strategy::IterativeDeepening => run(
            &mut puzzle,
            (PathScoped::new(), GloballyScoped::new()),
            1..=config.max_bound,
            config.time_limit,
        ),
    }
}

fn run<P, V>(
    puzzle: &mut P,
    visited: V,
    bounds: RangeInclusive<usize>,
    time_limit: Option<Duration>,
) -> Result<Outcome>
where
    P: SlidingPuzzle,
    V: VisitedStates,
{
    let mut search = Search::new(visited, time_limit);
    let max_bound = *bounds.end();

    if puzzle.is_goal() {
        info!("already solved");
        return Ok(Outcome::Solved {
            moves: Vec::new(),
            stats: search.finish(),
        });
    }

    for bound in bounds {
        debug!(bound, "starting round");
        match search.round(puzzle, bound)? {
            Step::Found => {
                let stats = search.finish();
                info!(
                    bound,
                    moves = search.path.len(),
                    moves_applied = stats.moves_applied,
                    states_pruned = stats.states_pruned,
                    elapsed = ?stats.elapsed,
                    "solution found"
                );
                return Ok(Outcome::Solved {
                    moves: std::mem::take(&mut search.path),
                    stats,
                });
            }
            Step::Exhausted => {
                debug!(
                    bound,
                    moves_applied = search.stats.moves_applied,
                    states_pruned = search.stats.states_pruned,
                    "round exhausted"
                );
            }
            Step::Interrupted => {
                let stats = search.finish();
                warn!(bound, elapsed = ?stats.elapsed, "time limit reached");
                return Ok(Outcome::TimedOut { stats });
            }
        }
    }

    let stats = search.finish();
    info!(max_bound, moves_applied = stats.moves_applied, "no solution within bound");
    Ok(Outcome::NoSolutionWithinBound { max_bound, stats })
}

/// Applies `moves` in order, calling `on_step` after each one.
///
/// Returns whether the final state is solved.
pub fn replay<P, F>(puzzle: &mut P, moves: &[Move], mut on_step: F) -> Result<bool>
where
    P: SlidingPuzzle,
    F: FnMut(usize, Move, &P),
{
    for (index, &mv) in moves.iter().enumerate() {
        puzzle.apply(mv)?;
        on_step(index, mv, puzzle);
    }
    Ok(puzzle.is_goal())
}

/// Applies `moves` in order and returns whether the final state is solved.
pub fn apply_and_verify<P: SlidingPuzzle>(puzzle: &mut P, moves: &[Move]) -> Result<bool> {
    replay(puzzle, moves, |_, _, _| {})
}
