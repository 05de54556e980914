#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The line solver: complete deduction over a single row or column.
//!
//! Given a clue and the current partial masks of one line, the solver
//! computes, for every cell, the union of colors that cell takes across
//! *all* completions consistent with both the clue and the input masks.
//! Intersecting that union with the input yields the strongest refinement a
//! single line admits: every color dropped from a mask is provably
//! impossible, every color kept appears in at least one valid completion.
//!
//! The computation is a two-phase dynamic program over states `(j, i)` =
//! "the first `j` blocks fit within the first `i` cells":
//!
//! 1. a forward pass fills the `fits` bitmatrix via the recurrence
//!    `fits[j][i] = (fits[j][i-1] && space(i-1)) || (fits[j-1][i-len-sep] && placeable)`,
//!    where `sep` is 1 when block `j` shares its predecessor's color (a
//!    mandatory separating space) and 0 otherwise;
//! 2. a backward pass walks the feasible transitions from `(k, n)` and
//!    unions, per cell, every color used by a transition that lies on a
//!    complete placement.
//!
//! `O(n·k·max_len)` time, `O(n·k)` bits of state. The state lives in the
//! solver and is resized on demand, so repeated calls do not allocate.
//!
//! A line with no valid completion reports [`Contradiction`] as a value.

use crate::puzzle::board::Contradiction;
use crate::puzzle::cell::{Cell, ColorCode, SPACE};
use crate::puzzle::clue::Clue;
use bit_vec::BitVec;
use log::trace;

/// A reusable single-line solver. One instance per solving thread.
#[derive(Debug, Clone, Default)]
pub struct LineSolver {
    fits: BitVec,
    reach: BitVec,
    out: Vec<Cell>,
}

impl LineSolver {
    /// Creates a solver with empty scratch tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Solves `line` against `clue` to the fullest.
    ///
    /// Returns the refined masks (cell-wise subsets of the input). The
    /// returned slice borrows the solver's scratch buffer and is valid until
    /// the next call.
    ///
    /// # Errors
    ///
    /// [`Contradiction`] if no completion satisfies both the clue and the
    /// input masks.
    pub fn solve(&mut self, clue: &Clue, line: &[Cell]) -> Result<&[Cell], Contradiction> {
        let n = line.len();
        let k = clue.len();
        let stride = n + 1;
        self.reset((k + 1) * stride);

        if !self.fill_fits(clue, line) {
            trace!("line {line:?} contradicts clue {clue:?}");
            return Err(Contradiction);
        }
        self.unite_placements(clue, line);

        for (out, &input) in self.out.iter_mut().zip(line) {
            *out = out.intersect(input);
        }
        Ok(&self.out)
    }

    fn reset(&mut self, size: usize) {
        if self.fits.len() < size {
            let grow = size - self.fits.len();
            self.fits.grow(grow, false);
            self.reach.grow(grow, false);
        }
        self.fits.clear();
        self.reach.clear();
    }

    /// Forward pass. Returns whether the whole clue fits the whole line.
    fn fill_fits(&mut self, clue: &Clue, line: &[Cell]) -> bool {
        let n = line.len();
        let k = clue.len();
        let stride = n + 1;

        self.fits.set(0, true);
        for i in 1..=n {
            if !line[i - 1].admits(SPACE) {
                break;
            }
            self.fits.set(i, true);
        }

        for j in 1..=k {
            let block = clue.blocks()[j - 1];
            let sep = usize::from(clue.separated(j - 1));
            for i in 1..=n {
                let mut ok = self.fits[j * stride + i - 1] && line[i - 1].admits(SPACE);
                if !ok && i >= block.len + sep {
                    let start = i - block.len;
                    ok = self.fits[(j - 1) * stride + start - sep]
                        && Self::placeable(line, start, i, block.color, sep);
                }
                if ok {
                    self.fits.set(j * stride + i, true);
                }
            }
        }
        self.fits[k * stride + n]
    }

    /// Whether the block may occupy `[start, end)`, preceded by a space
    /// when `sep` demands one.
    fn placeable(line: &[Cell], start: usize, end: usize, color: ColorCode, sep: usize) -> bool {
        (sep == 0 || line[start - 1].admits(SPACE))
            && line[start..end].iter().all(|cell| cell.admits(color))
    }

    /// Backward pass: walk every feasible transition reachable from the
    /// final state and union the colors it paints.
    fn unite_placements(&mut self, clue: &Clue, line: &[Cell]) {
        let n = line.len();
        let k = clue.len();
        let stride = n + 1;

        self.out.clear();
        self.out.resize(n, Cell::EMPTY);
        self.reach.set(k * stride + n, true);

        // transitions strictly shrink the prefix, so one sweep of
        // descending i visits every reachable state in dependency order
        for i in (1..=n).rev() {
            for j in (0..=k).rev() {
                if !self.reach[j * stride + i] {
                    continue;
                }
                if self.fits[j * stride + i - 1] && line[i - 1].admits(SPACE) {
                    self.reach.set(j * stride + i - 1, true);
                    self.out[i - 1] = self.out[i - 1].union(Cell::solved(SPACE));
                }
                if j > 0 {
                    let block = clue.blocks()[j - 1];
                    let sep = usize::from(clue.separated(j - 1));
                    if i >= block.len + sep {
                        let start = i - block.len;
                        if self.fits[(j - 1) * stride + start - sep]
                            && Self::placeable(line, start, i, block.color, sep)
                        {
                            self.reach.set((j - 1) * stride + start - sep, true);
                            for cell in &mut self.out[start..i] {
                                *cell = cell.union(Cell::solved(block.color));
                            }
                            if sep == 1 {
                                self.out[start - 1] = self.out[start - 1].union(Cell::solved(SPACE));
                            }
                        }
                    }
                }
            }
        }
    }
}
