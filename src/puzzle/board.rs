#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The puzzle board: a rectangular grid of cell masks plus the frozen clue
//! tables and the color palette.
//!
//! Cells only ever refine (every write intersects with the previous mask),
//! so a board moves monotonically towards either a full solution or a
//! contradiction. Search forks clone the board; clones are independent.

use crate::puzzle::cell::{Cell, ColorCode, SPACE};
use crate::puzzle::clue::{Clue, ClueError};
use crate::puzzle::color::Palette;
use itertools::Itertools;
use std::fmt;

/// Identifies one row or column of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Line {
    /// The `index`-th row, top to bottom.
    Row(usize),
    /// The `index`-th column, left to right.
    Column(usize),
}

/// Signals that some cell admits no color at all.
///
/// This is an expected value during probing and search, not an error: a
/// contradicted clone is a deduction for the prober and a pruned branch for
/// the searcher. Only at the root board does it mean the puzzle is
/// unsatisfiable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Contradiction;

/// A puzzle definition rejected at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// The board has zero rows or zero columns.
    EmptyGrid,
    /// A clue failed structural validation.
    BadClue {
        /// The offending line.
        line: Line,
        /// What was wrong with it.
        source: ClueError,
    },
    /// A clue references a color code outside the palette.
    UnknownColor {
        /// The offending line.
        line: Line,
        /// The unregistered code.
        code: ColorCode,
    },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "the grid must have at least one row and one column"),
            Self::BadClue { line, source } => write!(f, "invalid clue for {line:?}: {source}"),
            Self::UnknownColor { line, code } => {
                write!(f, "clue for {line:?} uses color code {code} not in the palette")
            }
        }
    }
}

impl std::error::Error for BoardError {}

/// A `height x width` grid of cell masks with row and column clues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    height: usize,
    width: usize,
    palette: Palette,
    cells: Vec<Cell>,
    row_clues: Vec<Clue>,
    column_clues: Vec<Clue>,
}

impl Board {
    /// Builds a board with every cell UNKNOWN (all palette bits set).
    ///
    /// The grid is `row_clues.len()` rows by `column_clues.len()` columns.
    ///
    /// # Errors
    ///
    /// Rejects empty grids, structurally invalid clues and clue colors
    /// outside the palette. Clues that are well-formed but mutually
    /// unsatisfiable (say, row and column totals that disagree) construct
    /// fine; the contradiction surfaces during propagation.
    pub fn new(
        palette: Palette,
        row_clues: Vec<Clue>,
        column_clues: Vec<Clue>,
    ) -> Result<Self, BoardError> {
        let height = row_clues.len();
        let width = column_clues.len();
        if height == 0 || width == 0 {
            return Err(BoardError::EmptyGrid);
        }

        for (clues, len, make_line) in [
            (&row_clues, width, Line::Row as fn(usize) -> Line),
            (&column_clues, height, Line::Column as fn(usize) -> Line),
        ] {
            for (index, clue) in clues.iter().enumerate() {
                let line = make_line(index);
                clue.validate(len)
                    .map_err(|source| BoardError::BadClue { line, source })?;
                for block in clue.blocks() {
                    if !palette.contains(block.color) {
                        return Err(BoardError::UnknownColor {
                            line,
                            code: block.color,
                        });
                    }
                }
            }
        }

        let unknown = palette.full_mask();
        Ok(Self {
            height,
            width,
            cells: vec![unknown; height * width],
            palette,
            row_clues,
            column_clues,
        })
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// The puzzle's palette.
    #[must_use]
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The mask of cell `(row, column)`.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Cell {
        self.cells[row * self.width + column]
    }

    /// Refines cell `(row, column)` with `value`.
    ///
    /// The stored mask becomes the intersection of the old mask and `value`,
    /// so writes are always monotone. Returns whether the mask actually
    /// shrank.
    ///
    /// # Errors
    ///
    /// [`Contradiction`] if the intersection is empty. The empty mask is
    /// stored, so [`Self::is_contradictory`] holds afterwards.
    pub fn set(&mut self, row: usize, column: usize, value: Cell) -> Result<bool, Contradiction> {
        let slot = &mut self.cells[row * self.width + column];
        let refined = slot.intersect(value);
        if refined == *slot {
            return Ok(false);
        }
        *slot = refined;
        if refined.is_contradiction() {
            return Err(Contradiction);
        }
        Ok(true)
    }

    /// The cells of row `index` as a contiguous slice.
    #[must_use]
    pub fn row(&self, index: usize) -> &[Cell] {
        &self.cells[index * self.width..(index + 1) * self.width]
    }

    /// Copies the cells of `line` into `buf`, replacing its contents.
    pub fn copy_line(&self, line: Line, buf: &mut Vec<Cell>) {
        buf.clear();
        match line {
            Line::Row(r) => buf.extend_from_slice(self.row(r)),
            Line::Column(c) => {
                buf.extend(self.cells.iter().skip(c).step_by(self.width).copied());
            }
        }
    }

    /// The clue attached to `line`.
    #[must_use]
    pub fn clue(&self, line: Line) -> &Clue {
        match line {
            Line::Row(r) => &self.row_clues[r],
            Line::Column(c) => &self.column_clues[c],
        }
    }

    /// The row clues, top to bottom.
    #[must_use]
    pub fn row_clues(&self) -> &[Clue] {
        &self.row_clues
    }

    /// The column clues, left to right.
    #[must_use]
    pub fn column_clues(&self) -> &[Clue] {
        &self.column_clues
    }

    /// Maps position `k` along `line` to grid coordinates.
    #[must_use]
    pub const fn cell_at(line: Line, k: usize) -> (usize, usize) {
        match line {
            Line::Row(r) => (r, k),
            Line::Column(c) => (k, c),
        }
    }

    /// Whether every cell is resolved to a single color.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_resolved())
    }

    /// Whether any cell has an empty mask.
    #[must_use]
    pub fn is_contradictory(&self) -> bool {
        self.cells.iter().any(|cell| cell.is_contradiction())
    }

    /// How many cells are resolved.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_resolved()).count()
    }

    /// Iterates the unresolved cells in row-major order.
    pub fn unresolved(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            if cell.is_resolved() {
                None
            } else {
                Some((i / self.width, i % self.width, *cell))
            }
        })
    }

    /// How many of the up-to-four orthogonal neighbours of `(row, column)`
    /// are resolved.
    #[must_use]
    pub fn resolved_neighbors(&self, row: usize, column: usize) -> usize {
        let mut count = 0;
        if row > 0 && self.get(row - 1, column).is_resolved() {
            count += 1;
        }
        if row + 1 < self.height && self.get(row + 1, column).is_resolved() {
            count += 1;
        }
        if column > 0 && self.get(row, column - 1).is_resolved() {
            count += 1;
        }
        if column + 1 < self.width && self.get(row, column + 1).is_resolved() {
            count += 1;
        }
        count
    }

    /// Whether the board is fully resolved and every line's run sequence
    /// equals its clue.
    #[must_use]
    pub fn satisfies_clues(&self) -> bool {
        if !self.is_solved() {
            return false;
        }
        let mut buf = Vec::new();
        let rows = (0..self.height).map(Line::Row);
        let columns = (0..self.width).map(Line::Column);
        for line in rows.chain(columns) {
            self.copy_line(line, &mut buf);
            let runs = buf
                .iter()
                .map(|cell| cell.color().unwrap_or(0))
                .dedup_with_count()
                .filter(|&(_, color)| color != SPACE)
                .collect_vec();
            let expected = self
                .clue(line)
                .blocks()
                .iter()
                .map(|block| (block.len, block.color))
                .collect_vec();
            if runs != expected {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for Board {
    /// The bare grid, one symbol per cell. Unresolved cells print as a
    /// blank, contradictions as `!`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for cell in self.row(row) {
                let symbol = match cell.color() {
                    Some(code) => self.palette.symbol_of(code),
                    None if cell.is_contradiction() => '!',
                    None => ' ',
                };
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::clue::Block;

    fn ink() -> ColorCode {
        Palette::monochrome().ink().unwrap()
    }

    fn plus_board() -> Board {
        // the unique solution is a plus sign
        let ink = ink();
        Board::new(
            Palette::monochrome(),
            vec![
                Clue::from_lens(&[1], ink),
                Clue::from_lens(&[3], ink),
                Clue::from_lens(&[1], ink),
            ],
            vec![
                Clue::from_lens(&[1], ink),
                Clue::from_lens(&[3], ink),
                Clue::from_lens(&[1], ink),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_new_board_is_unknown() {
        let board = plus_board();
        let unknown = board.palette().full_mask();
        assert_eq!(board.get(1, 2), unknown);
        assert!(!board.is_solved());
        assert!(!board.is_contradictory());
        assert_eq!(board.resolved_count(), 0);
    }

    #[test]
    fn test_set_is_monotone() {
        let ink = ink();
        let mut board = plus_board();
        assert_eq!(board.set(0, 0, Cell::solved(ink)), Ok(true));
        // same write again is a no-op
        assert_eq!(board.set(0, 0, Cell::solved(ink)), Ok(false));
        // conflicting write empties the mask
        assert_eq!(board.set(0, 0, Cell::solved(SPACE)), Err(Contradiction));
        assert!(board.is_contradictory());
    }

    #[test]
    fn test_clone_independence() {
        let ink = ink();
        let original = plus_board();
        let mut fork = original.clone();
        fork.set(2, 2, Cell::solved(ink)).unwrap();
        assert_eq!(original.get(2, 2), original.palette().full_mask());
        assert_ne!(fork.get(2, 2), original.get(2, 2));
    }

    #[test]
    fn test_copy_line_column() {
        let ink = ink();
        let mut board = plus_board();
        board.set(1, 2, Cell::solved(ink)).unwrap();
        let mut buf = Vec::new();
        board.copy_line(Line::Column(2), &mut buf);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf[1], Cell::solved(ink));
    }

    #[test]
    fn test_rejects_overlong_clue() {
        let ink = ink();
        let result = Board::new(
            Palette::monochrome(),
            vec![Clue::from_lens(&[2, 2], ink)],
            vec![Clue::from_lens(&[1], ink); 4],
        );
        assert!(matches!(
            result,
            Err(BoardError::BadClue {
                line: Line::Row(0),
                source: ClueError::TooLong { span: 5, line_len: 4 },
            })
        ));
    }

    #[test]
    fn test_rejects_unknown_color() {
        let ink = ink();
        let result = Board::new(
            Palette::monochrome(),
            vec![Clue::new([Block::new(1, 8)])],
            vec![Clue::from_lens(&[1], ink)],
        );
        assert!(matches!(result, Err(BoardError::UnknownColor { code: 8, .. })));
    }

    #[test]
    fn test_satisfies_clues() {
        let ink = ink();
        let mut board = plus_board();
        let solution = [
            [SPACE, ink, SPACE],
            [ink, ink, ink],
            [SPACE, ink, SPACE],
        ];
        for (r, row) in solution.iter().enumerate() {
            for (c, &color) in row.iter().enumerate() {
                board.set(r, c, Cell::solved(color)).unwrap();
            }
        }
        assert!(board.is_solved());
        assert!(board.satisfies_clues());
        assert_eq!(board.to_string(), ".#.\n###\n.#.\n");
    }
}
