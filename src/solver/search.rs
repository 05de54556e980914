#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Depth-first backtracking search with one-step look-ahead.
//!
//! A node owns a propagated, unresolved, non-contradictory board. It picks
//! the unresolved cell with the fewest remaining colors (ties towards more
//! resolved neighbours, then row-major order) and propagates each candidate
//! color on its own clone before descending:
//!
//! - a contradicted clone eliminates that color from the node's board, a
//!   sound deduction that is re-propagated in place;
//! - a solved clone is a recorded solution;
//! - surviving clones are recursed into, most-resolved first, so the search
//!   visits the most constrained branch before its siblings.
//!
//! Only clones are mutated below the root; the caller's board is never
//! touched. Deterministic candidate ordering makes "the first solution"
//! reproducible.

use crate::puzzle::board::Board;
use crate::puzzle::cell::Cell;
use crate::solver::engine::{Deadline, SolutionSink, SolveOptions, SolverStats};
use crate::solver::propagation::Propagator;
use log::debug;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;

/// Whether to keep exploring siblings after a node returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk {
    Continue,
    Stop,
}

/// Owns the state of one depth-first search.
#[derive(Debug)]
pub(crate) struct Searcher<'a> {
    options: &'a SolveOptions,
    deadline: Deadline,
    propagator: Propagator,
    pruned: bool,
}

impl<'a> Searcher<'a> {
    pub(crate) fn new(options: &'a SolveOptions, deadline: Deadline) -> Self {
        Self {
            options,
            deadline,
            propagator: Propagator::new(),
            pruned: false,
        }
    }

    /// Searches below `root`, recording solutions into `sink`.
    pub(crate) fn run(&mut self, root: &Board, sink: &mut SolutionSink, stats: &mut SolverStats) {
        self.dfs(root.clone(), 0, sink, stats);
        stats.lines_solved += self.propagator.lines_solved();
    }

    /// Whether a depth limit cut off part of the tree, leaving the search
    /// inconclusive.
    pub(crate) const fn pruned(&self) -> bool {
        self.pruned
    }

    #[allow(clippy::cast_precision_loss)]
    fn dfs(
        &mut self,
        mut board: Board,
        depth: usize,
        sink: &mut SolutionSink,
        stats: &mut SolverStats,
    ) -> Walk {
        stats.nodes_explored += 1;
        stats.search_depth = stats.search_depth.max(depth);

        if self.deadline.expired() {
            return Walk::Stop;
        }
        if self.options.max_depth.is_some_and(|max| depth >= max) {
            self.pruned = true;
            return Walk::Continue;
        }
        let Some((row, column, cell)) = Self::branch_cell(&board) else {
            return Walk::Continue;
        };
        debug!(
            "depth {depth}: branching on ({row}, {column}) with {} candidates",
            cell.candidate_count()
        );

        let cell_count = (board.height() * board.width()) as f64;
        let mut branches: Vec<(OrderedFloat<f64>, Board)> = Vec::new();

        for color in cell.colors() {
            // a look-ahead elimination below may have dropped this color
            if !board.get(row, column).admits(color) {
                continue;
            }
            if self.deadline.expired() {
                return Walk::Stop;
            }

            let mut child = board.clone();
            self.propagator.reset();
            let outcome = self
                .propagator
                .refine_cell(&mut child, row, column, Cell::solved(color))
                .and_then(|()| self.propagator.run(&mut child, self.deadline));

            match outcome {
                Err(_) => {
                    stats.contradictions += 1;
                    // the color is impossible here: refine the node itself
                    let remaining = board.get(row, column).without(color);
                    self.propagator.reset();
                    let refined = self
                        .propagator
                        .refine_cell(&mut board, row, column, remaining)
                        .and_then(|()| self.propagator.run(&mut board, self.deadline));
                    if refined.is_err() {
                        // every color of the branch cell fails: dead node
                        return Walk::Continue;
                    }
                    if board.is_solved() {
                        sink.record(&board);
                        return if sink.full() { Walk::Stop } else { Walk::Continue };
                    }
                }
                Ok(()) => {
                    if child.is_solved() {
                        sink.record(&child);
                        if sink.full() {
                            return Walk::Stop;
                        }
                    } else if !self.deadline.expired() {
                        let score = OrderedFloat(child.resolved_count() as f64 / cell_count);
                        branches.push((score, child));
                    }
                }
            }
        }

        // most constrained branch first; the sort is stable, so equal
        // scores keep the color order
        branches.sort_by_key(|(score, _)| Reverse(*score));
        for (_, child) in branches {
            if self.dfs(child, depth + 1, sink, stats) == Walk::Stop {
                return Walk::Stop;
            }
        }
        Walk::Continue
    }

    /// The unresolved cell with the fewest remaining colors; ties prefer
    /// more resolved neighbours, then the smallest row-major position.
    fn branch_cell(board: &Board) -> Option<(usize, usize, Cell)> {
        let mut best: Option<(u32, Reverse<usize>, usize, usize, Cell)> = None;
        for (row, column, cell) in board.unresolved() {
            let key = (
                cell.candidate_count(),
                Reverse(board.resolved_neighbors(row, column)),
                row,
                column,
            );
            if best
                .as_ref()
                .is_none_or(|&(count, neighbors, r, c, _)| key < (count, neighbors, r, c))
            {
                best = Some((key.0, key.1, key.2, key.3, cell));
            }
        }
        best.map(|(_, _, row, column, cell)| (row, column, cell))
    }
}
