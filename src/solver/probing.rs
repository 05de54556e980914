#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Contradiction probing: trial assignments that turn failed clones into
//! sound deductions.
//!
//! For every unresolved cell and every color it still admits, a clone of the
//! board fixes the cell to that color and propagates. A contradicted clone
//! proves the color impossible, so it is removed from the cell on the real
//! board and the change propagated. A clone that happens to solve completely
//! is a recorded solution.
//!
//! A round is one pass over all unresolved cells; rounds repeat while at
//! least one color was eliminated. Cells with fewer remaining colors are
//! probed first, ties broken towards cells with more resolved neighbours.
//! The ordering affects speed only, never the set of deductions.

use crate::puzzle::board::{Board, Contradiction};
use crate::puzzle::cell::{Cell, ColorCode};
use crate::solver::engine::{Deadline, SolutionSink, SolveOptions, SolverStats};
use crate::solver::propagation::Propagator;
use log::{debug, info};
use std::cmp::Reverse;

/// Runs contradiction rounds against a board.
#[derive(Debug)]
pub(crate) struct Prober<'a> {
    options: &'a SolveOptions,
    deadline: Deadline,
    trial_propagator: Propagator,
}

impl<'a> Prober<'a> {
    pub(crate) fn new(options: &'a SolveOptions, deadline: Deadline) -> Self {
        Self {
            options,
            deadline,
            trial_propagator: Propagator::new(),
        }
    }

    /// Probes until a round eliminates nothing, a bound is hit, or the board
    /// resolves.
    ///
    /// # Errors
    ///
    /// [`Contradiction`] when an elimination empties a cell of the real
    /// board: the puzzle itself is unsatisfiable.
    pub(crate) fn run(
        &mut self,
        board: &mut Board,
        propagator: &mut Propagator,
        sink: &mut SolutionSink,
        stats: &mut SolverStats,
    ) -> Result<(), Contradiction> {
        let result = self.rounds(board, propagator, sink, stats);
        stats.lines_solved += self.trial_propagator.lines_solved();
        result
    }

    fn rounds(
        &mut self,
        board: &mut Board,
        propagator: &mut Propagator,
        sink: &mut SolutionSink,
        stats: &mut SolverStats,
    ) -> Result<(), Contradiction> {
        loop {
            if self
                .options
                .probe_max_rounds
                .is_some_and(|max| stats.probe_rounds >= max)
            {
                return Ok(());
            }
            if board.is_solved() || sink.full() || self.deadline.expired() {
                return Ok(());
            }
            stats.probe_rounds += 1;
            let eliminated = self.round(board, propagator, sink, stats)?;
            info!(
                "probe round {}: {eliminated} colors eliminated",
                stats.probe_rounds
            );
            if eliminated == 0 {
                return Ok(());
            }
        }
    }

    /// One pass over every unresolved cell. Returns the number of
    /// eliminated (cell, color) pairs.
    fn round(
        &mut self,
        board: &mut Board,
        propagator: &mut Propagator,
        sink: &mut SolutionSink,
        stats: &mut SolverStats,
    ) -> Result<usize, Contradiction> {
        let mut order: Vec<_> = board
            .unresolved()
            .map(|(row, column, cell)| {
                (
                    cell.candidate_count(),
                    Reverse(board.resolved_neighbors(row, column)),
                    row,
                    column,
                )
            })
            .collect();
        order.sort_unstable();

        let mut eliminated = 0;
        for (_, _, row, column) in order {
            if sink.full() || self.deadline.expired() {
                break;
            }
            let snapshot = board.get(row, column);
            if snapshot.is_resolved() {
                continue;
            }
            for color in snapshot.colors() {
                // earlier eliminations in this pass may already have
                // resolved the cell or dropped the color
                if !board.get(row, column).admits(color) {
                    continue;
                }
                if sink.full() || self.deadline.expired() {
                    break;
                }

                if self.trial(board, row, column, color, sink)? {
                    eliminated += 1;
                    stats.contradictions += 1;
                    debug!("({row}, {column}) cannot be color {color}");

                    let remaining = board.get(row, column).without(color);
                    propagator.refine_cell(board, row, column, remaining)?;
                    propagator.run(board, self.deadline)?;
                }
            }
        }
        Ok(eliminated)
    }

    /// Fixes `(row, column)` to `color` on a clone and propagates. Returns
    /// whether the clone contradicted.
    fn trial(
        &mut self,
        board: &Board,
        row: usize,
        column: usize,
        color: ColorCode,
        sink: &mut SolutionSink,
    ) -> Result<bool, Contradiction> {
        let mut clone = board.clone();
        self.trial_propagator.reset();

        let outcome = self
            .trial_propagator
            .refine_cell(&mut clone, row, column, Cell::solved(color))
            .and_then(|()| self.trial_propagator.run(&mut clone, self.deadline));

        match outcome {
            Err(Contradiction) => Ok(true),
            Ok(()) => {
                if clone.is_solved() {
                    sink.record(&clone);
                }
                Ok(false)
            }
        }
    }
}
