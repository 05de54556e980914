#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Plain-text rendering of a board with its clues.
//!
//! The renderer has read-only access to cell masks and clues: column clues
//! stack above the grid, row clues sit to its left, and each cell prints as
//! its palette symbol (blank while undetermined, `!` on contradiction).
//! Clue numbers of colored puzzles carry the color symbol as a suffix, so
//! `2r` reads "two red cells".

use crate::puzzle::board::{Board, Line};
use crate::puzzle::cell::Cell;
use crate::puzzle::clue::Block;
use itertools::Itertools;
use std::fmt;

/// Renders a board as clue-annotated ASCII.
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer<'a> {
    board: &'a Board,
}

impl<'a> TextRenderer<'a> {
    /// Wraps a read-only board view.
    #[must_use]
    pub const fn new(board: &'a Board) -> Self {
        Self { board }
    }

    fn block_text(&self, block: &Block) -> String {
        if self.board.palette().is_monochrome() {
            block.len.to_string()
        } else {
            format!("{}{}", block.len, self.board.palette().symbol_of(block.color))
        }
    }

    fn cell_symbol(&self, cell: Cell) -> char {
        match cell.color() {
            Some(code) => self.board.palette().symbol_of(code),
            None if cell.is_contradiction() => '!',
            None => ' ',
        }
    }

    /// Produces the full rendering.
    #[must_use]
    pub fn render(&self) -> String {
        let board = self.board;

        let side: Vec<String> = (0..board.height())
            .map(|r| {
                board
                    .clue(Line::Row(r))
                    .blocks()
                    .iter()
                    .map(|block| self.block_text(block))
                    .join(" ")
            })
            .collect();
        let side_width = side.iter().map(String::len).max().unwrap_or(0);

        let headers: Vec<Vec<String>> = (0..board.width())
            .map(|c| {
                board
                    .clue(Line::Column(c))
                    .blocks()
                    .iter()
                    .map(|block| self.block_text(block))
                    .collect()
            })
            .collect();
        let header_height = headers.iter().map(Vec::len).max().unwrap_or(0);
        let column_widths: Vec<usize> = headers
            .iter()
            .map(|texts| texts.iter().map(String::len).max().unwrap_or(0).max(1))
            .collect();

        let mut out = String::new();
        for level in 0..header_height {
            out.push_str(&" ".repeat(side_width + 1));
            for (texts, &width) in headers.iter().zip(&column_widths) {
                // clues hug the grid: pad missing levels at the top
                let text = (texts.len() + level)
                    .checked_sub(header_height)
                    .map_or("", |i| texts[i].as_str());
                out.push_str(&format!(" {text:>width$}"));
            }
            out.push('\n');
        }
        for (r, clue_text) in side.iter().enumerate() {
            out.push_str(&format!("{clue_text:>side_width$} |"));
            for (c, &width) in column_widths.iter().enumerate() {
                let symbol = self.cell_symbol(board.get(r, c));
                out.push_str(&format!(" {symbol:>width$}"));
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for TextRenderer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::cell::SPACE;
    use crate::puzzle::clue::Clue;
    use crate::puzzle::color::Palette;

    fn solved_plus() -> Board {
        let palette = Palette::monochrome();
        let ink = palette.ink().unwrap();
        let clue = |lens: &[usize]| Clue::from_lens(lens, ink);
        let mut board = Board::new(
            palette,
            vec![clue(&[1]), clue(&[3]), clue(&[1])],
            vec![clue(&[1]), clue(&[3]), clue(&[1])],
        )
        .unwrap();
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
        board
    }

    #[test]
    fn test_render_solved_plus() {
        let board = solved_plus();
        let text = TextRenderer::new(&board).render();
        let expected = "\
  1 3 1
1 | . # .
3 | # # #
1 | . # .
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_partial_board_blank_cells() {
        let palette = Palette::monochrome();
        let ink = palette.ink().unwrap();
        let board = Board::new(
            palette,
            vec![Clue::from_lens(&[1], ink); 2],
            vec![Clue::from_lens(&[1], ink); 2],
        )
        .unwrap();
        let text = TextRenderer::new(&board).render();
        assert_eq!(text, "  1 1\n1 |    \n1 |    \n");
    }

    #[test]
    fn test_colored_clue_suffix() {
        let mut palette = Palette::monochrome();
        let red = palette.push("red", 'r').unwrap();
        let board = Board::new(
            palette,
            vec![Clue::new([crate::puzzle::clue::Block::new(1, red)])],
            vec![Clue::new([crate::puzzle::clue::Block::new(1, red)])],
        )
        .unwrap();
        let text = TextRenderer::new(&board).render();
        assert!(text.contains("1r"));
    }
}
