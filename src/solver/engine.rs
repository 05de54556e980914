#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The solving pipeline: propagation, then contradiction probing, then
//! depth-first search, with options, statistics and a terminal status.
//!
//! All recoverable conditions flow through values. A contradiction at the
//! root means the puzzle is unsatisfiable; hitting a resource limit is a
//! status on the result, never an error.

use crate::puzzle::board::Board;
use crate::puzzle::cell::ColorCode;
use crate::solver::probing::Prober;
use crate::solver::propagation::Propagator;
use crate::solver::search::Searcher;
use log::{debug, info};
use rustc_hash::FxHashSet;
use std::fmt;
use std::time::{Duration, Instant};

/// Tuning knobs for [`Solver::solve`]. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOptions {
    /// Stop after this many distinct solutions. The default of 2 makes
    /// non-uniqueness detectable.
    pub max_solutions: usize,
    /// Wall-clock budget for the whole solve.
    pub timeout: Option<Duration>,
    /// Maximum search depth; deeper branches are pruned.
    pub max_depth: Option<usize>,
    /// Whether to run contradiction probing between propagation and search.
    pub enable_probing: bool,
    /// Upper bound on full probing rounds.
    pub probe_max_rounds: Option<usize>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_solutions: 2,
            timeout: None,
            max_depth: None,
            enable_probing: true,
            probe_max_rounds: None,
        }
    }
}

/// How a solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Exactly one solution exists and was found.
    ///
    /// When a limit (timeout, depth) interrupted the run this means "one
    /// solution found, uniqueness not disproved".
    SolvedUnique,
    /// At least two distinct solutions were found.
    SolvedMultiple,
    /// The deadline expired before any solution was found.
    UnsolvedTimeout,
    /// A depth or node limit pruned parts of the tree and no solution was
    /// found in the remainder.
    UnsolvedExhausted,
    /// The puzzle admits no solution.
    Contradictory,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::SolvedUnique => "solved (unique)",
            Self::SolvedMultiple => "solved (multiple solutions)",
            Self::UnsolvedTimeout => "unsolved (timeout)",
            Self::UnsolvedExhausted => "unsolved (limits exhausted)",
            Self::Contradictory => "contradictory",
        };
        f.write_str(text)
    }
}

/// Counters accumulated across one solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverStats {
    /// Contradictions observed, in probing trials and search branches alike.
    pub contradictions: usize,
    /// Full probing rounds run.
    pub probe_rounds: usize,
    /// Deepest search node entered.
    pub search_depth: usize,
    /// Search nodes entered.
    pub nodes_explored: usize,
    /// Line-solver invocations across all phases.
    pub lines_solved: usize,
    /// Wall time of the whole solve.
    pub elapsed: Duration,
}

/// One fully resolved grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    width: usize,
    cells: Vec<ColorCode>,
}

impl Solution {
    fn from_board(board: &Board) -> Self {
        let cells = (0..board.height())
            .flat_map(|r| {
                (0..board.width()).map(move |c| {
                    board
                        .get(r, c)
                        .color()
                        .expect("solution boards are fully resolved")
                })
            })
            .collect();
        Self {
            width: board.width(),
            cells,
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.cells.len() / self.width
    }

    /// The color of cell `(row, column)`.
    #[must_use]
    pub fn color(&self, row: usize, column: usize) -> ColorCode {
        self.cells[row * self.width + column]
    }

    /// Iterates the rows as color-code slices.
    pub fn rows(&self) -> impl Iterator<Item = &[ColorCode]> {
        self.cells.chunks(self.width)
    }
}

/// Collects distinct solutions up to a limit.
#[derive(Debug, Default)]
pub(crate) struct SolutionSink {
    limit: usize,
    seen: FxHashSet<Vec<ColorCode>>,
    found: Vec<Solution>,
}

impl SolutionSink {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            seen: FxHashSet::default(),
            found: Vec::new(),
        }
    }

    /// Records a solved board, ignoring duplicates and boards that fail
    /// verification (possible when a deadline cut propagation short).
    /// Returns whether the solution was new.
    pub(crate) fn record(&mut self, board: &Board) -> bool {
        if self.full() || !board.satisfies_clues() {
            return false;
        }
        let solution = Solution::from_board(board);
        if !self.seen.insert(solution.cells.clone()) {
            return false;
        }
        debug!("recorded solution #{}", self.found.len() + 1);
        self.found.push(solution);
        true
    }

    pub(crate) fn full(&self) -> bool {
        self.found.len() >= self.limit
    }

    pub(crate) fn len(&self) -> usize {
        self.found.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.found.is_empty()
    }

    pub(crate) fn into_solutions(self) -> Vec<Solution> {
        self.found
    }
}

/// An instant after which solving gives up, checked at every search node and
/// at the top of the propagation loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// No deadline: solving runs to completion.
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }

    /// A deadline `timeout` from now, or none.
    #[must_use]
    pub fn after(timeout: Option<Duration>) -> Self {
        Self(timeout.map(|t| Instant::now() + t))
    }

    /// Whether the deadline has passed.
    #[must_use]
    pub fn expired(self) -> bool {
        self.0.is_some_and(|instant| Instant::now() >= instant)
    }
}

/// The outcome of a solve: solutions, final root board, counters, status.
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// Distinct solutions, in discovery order, at most `max_solutions`.
    pub solutions: Vec<Solution>,
    /// The root board after every sound deduction; the best partial board
    /// when solving was cut short.
    pub board: Board,
    /// How the solve ended.
    pub status: Status,
    /// Work counters.
    pub stats: SolverStats,
}

/// The board-level solving engine.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    options: SolveOptions,
}

impl Solver {
    /// Creates a solver with the given options.
    #[must_use]
    pub const fn new(options: SolveOptions) -> Self {
        Self { options }
    }

    /// Solves `board`, leaving the input untouched.
    ///
    /// Propagation always runs first. If the board stays unresolved,
    /// probing (when enabled) extracts further deductions, and depth-first
    /// search handles whatever remains.
    #[must_use]
    pub fn solve(&self, board: &Board) -> SolveResult {
        let start = Instant::now();
        let deadline = Deadline::after(self.options.timeout);
        let mut stats = SolverStats::default();
        let mut sink = SolutionSink::new(self.options.max_solutions);

        let mut root = board.clone();
        let mut propagator = Propagator::new();
        propagator.mark_all(&root);

        let mut contradicted = propagator.run(&mut root, deadline).is_err();
        let mut pruned = false;

        if !contradicted {
            if root.is_solved() {
                sink.record(&root);
            } else if !deadline.expired() {
                if self.options.enable_probing {
                    info!("propagation stalled, probing");
                    let mut prober = Prober::new(&self.options, deadline);
                    contradicted = prober
                        .run(&mut root, &mut propagator, &mut sink, &mut stats)
                        .is_err();
                }
                if root.is_solved() {
                    sink.record(&root);
                }
                if !contradicted && !root.is_solved() && !sink.full() && !deadline.expired() {
                    info!("probing stalled, searching");
                    let mut searcher = Searcher::new(&self.options, deadline);
                    searcher.run(&root, &mut sink, &mut stats);
                    pruned = searcher.pruned();
                }
            }
        }

        stats.lines_solved += propagator.lines_solved();
        stats.elapsed = start.elapsed();

        let status = if !sink.is_empty() {
            if sink.len() >= 2 {
                Status::SolvedMultiple
            } else {
                Status::SolvedUnique
            }
        } else if contradicted {
            Status::Contradictory
        } else if deadline.expired() {
            Status::UnsolvedTimeout
        } else if pruned {
            Status::UnsolvedExhausted
        } else {
            // the full tree was explored and no branch reached a solution
            Status::Contradictory
        };
        info!(
            "finished: {status} in {:?} ({} nodes, {} probe rounds)",
            stats.elapsed, stats.nodes_explored, stats.probe_rounds
        );

        SolveResult {
            solutions: sink.into_solutions(),
            board: root,
            status,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::cell::SPACE;
    use crate::puzzle::clue::{Block, Clue};
    use crate::puzzle::color::Palette;

    fn mono_board(rows: &[&[usize]], columns: &[&[usize]]) -> Board {
        let palette = Palette::monochrome();
        let ink = palette.ink().unwrap();
        Board::new(
            palette,
            rows.iter().map(|lens| Clue::from_lens(lens, ink)).collect(),
            columns
                .iter()
                .map(|lens| Clue::from_lens(lens, ink))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_propagation_only_puzzle_is_unique() {
        let board = mono_board(&[&[1], &[3], &[1]], &[&[1], &[3], &[1]]);
        let result = Solver::new(SolveOptions::default()).solve(&board);
        assert_eq!(result.status, Status::SolvedUnique);
        assert_eq!(result.solutions.len(), 1);
        assert!(result.board.is_solved());

        let ink = board.palette().ink().unwrap();
        let solution = &result.solutions[0];
        assert_eq!((solution.width(), solution.height()), (3, 3));
        assert_eq!(solution.color(1, 1), ink);
        assert_eq!(solution.color(0, 0), SPACE);
        assert_eq!(solution.rows().count(), 3);
    }

    #[test]
    fn test_two_by_two_has_two_solutions() {
        // rows [1],[1] and columns [1],[1]: diagonal or anti-diagonal
        let board = mono_board(&[&[1], &[1]], &[&[1], &[1]]);
        let result = Solver::new(SolveOptions::default()).solve(&board);
        assert_eq!(result.status, Status::SolvedMultiple);
        assert_eq!(result.solutions.len(), 2);

        let ink = board.palette().ink().unwrap();
        for solution in &result.solutions {
            let diag = solution.color(0, 0) == ink && solution.color(1, 1) == ink;
            let anti = solution.color(0, 1) == ink && solution.color(1, 0) == ink;
            assert!(diag ^ anti);
        }
        assert_ne!(result.solutions[0], result.solutions[1]);
    }

    #[test]
    fn test_max_solutions_one_stops_early() {
        let board = mono_board(&[&[1], &[1]], &[&[1], &[1]]);
        let options = SolveOptions {
            max_solutions: 1,
            ..SolveOptions::default()
        };
        let result = Solver::new(options).solve(&board);
        assert_eq!(result.solutions.len(), 1);
        assert_eq!(result.status, Status::SolvedUnique);
    }

    #[test]
    fn test_unsatisfiable_is_contradictory() {
        let board = mono_board(&[&[3], &[3], &[3]], &[&[2], &[3], &[2]]);
        let result = Solver::new(SolveOptions::default()).solve(&board);
        assert_eq!(result.status, Status::Contradictory);
        assert!(result.solutions.is_empty());
    }

    #[test]
    fn test_search_without_probing() {
        let board = mono_board(&[&[1], &[1]], &[&[1], &[1]]);
        let options = SolveOptions {
            enable_probing: false,
            ..SolveOptions::default()
        };
        let result = Solver::new(options).solve(&board);
        assert_eq!(result.status, Status::SolvedMultiple);
        assert_eq!(result.solutions.len(), 2);
    }

    #[test]
    fn test_zero_timeout_reports_timeout() {
        let board = mono_board(&[&[1], &[1]], &[&[1], &[1]]);
        let options = SolveOptions {
            timeout: Some(Duration::ZERO),
            ..SolveOptions::default()
        };
        let result = Solver::new(options).solve(&board);
        assert_eq!(result.status, Status::UnsolvedTimeout);
        assert!(result.solutions.is_empty());
        assert!(!result.board.is_solved());
    }

    #[test]
    fn test_solutions_satisfy_all_clues() {
        let board = mono_board(
            &[&[1, 1], &[5], &[5], &[3], &[1]],
            &[&[2], &[4], &[4], &[4], &[2]],
        );
        let result = Solver::new(SolveOptions::default()).solve(&board);
        assert_eq!(result.status, Status::SolvedUnique);
        assert!(result.board.satisfies_clues());
    }

    #[test]
    fn test_colored_puzzle_end_to_end() {
        // a 2x2 grid: top row red, bottom row blue; columns force the order
        let mut palette = Palette::monochrome();
        let red = palette.push("red", 'r').unwrap();
        let blue = palette.push("blue", 'b').unwrap();
        let board = Board::new(
            palette,
            vec![
                Clue::new([Block::new(2, red)]),
                Clue::new([Block::new(2, blue)]),
            ],
            vec![
                Clue::new([Block::new(1, red), Block::new(1, blue)]),
                Clue::new([Block::new(1, red), Block::new(1, blue)]),
            ],
        )
        .unwrap();
        let result = Solver::new(SolveOptions::default()).solve(&board);
        assert_eq!(result.status, Status::SolvedUnique);
        let solution = &result.solutions[0];
        assert_eq!(solution.color(0, 0), red);
        assert_eq!(solution.color(1, 1), blue);
    }
}
