#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The propagator: iterated line solving to a fixed point.
//!
//! Two work sets hold the dirty rows and dirty columns. The main loop pops a
//! line (sides strictly alternate, starting with rows; within a side the
//! smallest index goes first, so runs are reproducible), solves it, and
//! writes every refinement back through a single mutation point that
//! enqueues the perpendicular line of each changed cell. Masks only shrink,
//! so the loop reaches a fixed point in at most `H * W * palette`
//! line-solver calls.

use crate::puzzle::board::{Board, Contradiction, Line};
use crate::puzzle::cell::Cell;
use crate::solver::engine::Deadline;
use crate::solver::line::LineSolver;
use log::debug;
use smallvec::SmallVec;
use std::collections::BTreeSet;

/// Re-solves dirty lines until no cell changes.
#[derive(Debug, Clone, Default)]
pub struct Propagator {
    dirty_rows: BTreeSet<usize>,
    dirty_columns: BTreeSet<usize>,
    take_column: bool,
    line_solver: LineSolver,
    buf: Vec<Cell>,
    lines_solved: usize,
}

impl Propagator {
    /// Creates an idle propagator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks every row and column of `board` dirty.
    pub fn mark_all(&mut self, board: &Board) {
        self.dirty_rows.extend(0..board.height());
        self.dirty_columns.extend(0..board.width());
    }

    /// Marks a single line dirty.
    pub fn mark_line(&mut self, line: Line) {
        match line {
            Line::Row(r) => {
                self.dirty_rows.insert(r);
            }
            Line::Column(c) => {
                self.dirty_columns.insert(c);
            }
        }
    }

    /// Marks the two lines crossing at `(row, column)` dirty.
    pub fn mark_cell(&mut self, row: usize, column: usize) {
        self.dirty_rows.insert(row);
        self.dirty_columns.insert(column);
    }

    /// Drops all pending work and resets the side alternation.
    pub fn reset(&mut self) {
        self.dirty_rows.clear();
        self.dirty_columns.clear();
        self.take_column = false;
    }

    /// Whether no line is queued.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.dirty_rows.is_empty() && self.dirty_columns.is_empty()
    }

    /// Total line-solver invocations so far.
    #[must_use]
    pub const fn lines_solved(&self) -> usize {
        self.lines_solved
    }

    /// Runs the fixed-point loop on `board`.
    ///
    /// Returns once both work sets are empty or the deadline expires; in the
    /// latter case the remaining work stays queued and the caller observes
    /// the expiry on its own deadline handle.
    ///
    /// # Errors
    ///
    /// [`Contradiction`] as soon as any line admits no completion.
    pub fn run(&mut self, board: &mut Board, deadline: Deadline) -> Result<(), Contradiction> {
        while let Some(line) = self.next_line() {
            if deadline.expired() {
                self.mark_line(line);
                return Ok(());
            }
            self.solve_line(board, line)?;
        }
        Ok(())
    }

    /// Pops the next dirty line, alternating sides.
    fn next_line(&mut self) -> Option<Line> {
        let row = self.dirty_rows.first().copied().map(Line::Row);
        let column = self.dirty_columns.first().copied().map(Line::Column);
        let line = if self.take_column {
            column.or(row)
        } else {
            row.or(column)
        }?;
        match line {
            Line::Row(r) => {
                self.dirty_rows.remove(&r);
            }
            Line::Column(c) => {
                self.dirty_columns.remove(&c);
            }
        }
        self.take_column = !self.take_column;
        Some(line)
    }

    fn solve_line(&mut self, board: &mut Board, line: Line) -> Result<(), Contradiction> {
        board.copy_line(line, &mut self.buf);
        self.lines_solved += 1;

        let solved = self.line_solver.solve(board.clue(line), &self.buf)?;
        let changed: SmallVec<[(usize, Cell); 16]> = solved
            .iter()
            .zip(&self.buf)
            .enumerate()
            .filter(|(_, (new, old))| new != old)
            .map(|(k, (&new, _))| (k, new))
            .collect();

        if !changed.is_empty() {
            debug!("{line:?}: refined {} cells", changed.len());
        }
        for (k, value) in changed {
            self.write_cell(board, line, k, value)?;
        }
        Ok(())
    }

    /// Write-back for a freshly solved line: the line itself is at its fixed
    /// point, so only the perpendicular line is queued.
    fn write_cell(
        &mut self,
        board: &mut Board,
        line: Line,
        k: usize,
        value: Cell,
    ) -> Result<(), Contradiction> {
        let (row, column) = Board::cell_at(line, k);
        if board.set(row, column, value)? {
            let crossing = match line {
                Line::Row(_) => Line::Column(k),
                Line::Column(_) => Line::Row(k),
            };
            self.mark_line(crossing);
        }
        Ok(())
    }

    /// The mutation point for out-of-band deductions (probe eliminations,
    /// search assignments): refines one cell and queues both lines through
    /// it when the mask shrank.
    pub fn refine_cell(
        &mut self,
        board: &mut Board,
        row: usize,
        column: usize,
        value: Cell,
    ) -> Result<(), Contradiction> {
        if board.set(row, column, value)? {
            self.mark_cell(row, column);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::cell::SPACE;
    use crate::puzzle::clue::Clue;
    use crate::puzzle::color::Palette;
    use std::time::Duration;

    fn solve_to_fixpoint(board: &mut Board) -> Result<(), Contradiction> {
        let mut propagator = Propagator::new();
        propagator.mark_all(board);
        propagator.run(board, Deadline::none())
    }

    fn board_from_lens(rows: &[&[usize]], columns: &[&[usize]]) -> Board {
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
    fn test_solves_plus_shape() {
        let mut board = board_from_lens(&[&[1], &[3], &[1]], &[&[1], &[3], &[1]]);
        solve_to_fixpoint(&mut board).unwrap();
        assert!(board.is_solved());
        assert!(board.satisfies_clues());

        let ink = board.palette().ink().unwrap();
        assert_eq!(board.get(0, 1).color(), Some(ink));
        assert_eq!(board.get(0, 0).color(), Some(SPACE));
        assert_eq!(board.get(1, 0).color(), Some(ink));
    }

    #[test]
    fn test_solves_heart_shape() {
        let mut board = board_from_lens(
            &[&[1, 1], &[5], &[5], &[3], &[1]],
            &[&[2], &[4], &[4], &[4], &[2]],
        );
        solve_to_fixpoint(&mut board).unwrap();
        assert!(board.is_solved());
        assert!(board.satisfies_clues());
    }

    #[test]
    fn test_idempotent() {
        let mut board = board_from_lens(&[&[1], &[1]], &[&[1], &[1]]);
        solve_to_fixpoint(&mut board).unwrap();
        let after_first = board.clone();
        solve_to_fixpoint(&mut board).unwrap();
        assert_eq!(board, after_first);
    }

    #[test]
    fn test_unsatisfiable_grid_contradicts() {
        // rows demand 9 filled cells, columns only 7
        let mut board = board_from_lens(&[&[3], &[3], &[3]], &[&[2], &[3], &[2]]);
        assert_eq!(solve_to_fixpoint(&mut board), Err(Contradiction));
    }

    #[test]
    fn test_expired_deadline_stops_early() {
        let mut board = board_from_lens(&[&[1], &[3], &[1]], &[&[1], &[3], &[1]]);
        let mut propagator = Propagator::new();
        propagator.mark_all(&board);
        propagator
            .run(&mut board, Deadline::after(Some(Duration::ZERO)))
            .unwrap();
        assert!(!propagator.is_idle());
        assert!(!board.is_solved());
    }
}
