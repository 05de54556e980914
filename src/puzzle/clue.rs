#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Clue sequences describing one line of the puzzle.
//!
//! A clue is an ordered sequence of blocks, each a run length paired with a
//! color. Two consecutive blocks of the *same* color require at least one
//! separating space cell; blocks of different colors may abut. That
//! distinction drives both the minimum-span computation here and the
//! placement rules in the line solver.

use crate::puzzle::cell::{ColorCode, SPACE};
use smallvec::SmallVec;
use std::fmt;

/// One run of same-colored cells within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    /// Number of consecutive cells, always positive.
    pub len: usize,
    /// The run's color code. Never [`SPACE`].
    pub color: ColorCode,
}

impl Block {
    /// Creates a block of `len` cells of `color`.
    #[must_use]
    pub const fn new(len: usize, color: ColorCode) -> Self {
        Self { len, color }
    }
}

/// The ordered block sequence of a single row or column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Clue {
    blocks: SmallVec<[Block; 8]>,
}

impl Clue {
    /// Creates a clue from a block sequence.
    #[must_use]
    pub fn new(blocks: impl IntoIterator<Item = Block>) -> Self {
        Self {
            blocks: blocks.into_iter().collect(),
        }
    }

    /// Creates a monochrome clue: every block gets the given ink color.
    #[must_use]
    pub fn from_lens(lens: &[usize], ink: ColorCode) -> Self {
        Self::new(lens.iter().map(|&len| Block::new(len, ink)))
    }

    /// The empty clue: the line must be all spaces.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The block sequence.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The number of blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the clue has no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Whether block `j` needs a separating space before it, i.e. whether it
    /// has the same color as its predecessor.
    #[must_use]
    pub fn separated(&self, j: usize) -> bool {
        j > 0 && self.blocks[j].color == self.blocks[j - 1].color
    }

    /// The minimum number of cells the whole clue can squeeze into:
    /// the block lengths plus one space per same-color adjacency.
    #[must_use]
    pub fn min_span(&self) -> usize {
        self.blocks
            .iter()
            .enumerate()
            .map(|(j, block)| block.len + usize::from(self.separated(j)))
            .sum()
    }

    /// Total number of cells of `color` demanded by this clue.
    #[must_use]
    pub fn color_total(&self, color: ColorCode) -> usize {
        self.blocks
            .iter()
            .filter(|block| block.color == color)
            .map(|block| block.len)
            .sum()
    }

    /// The distinct colors this clue mentions, lowest code first.
    #[must_use]
    pub fn colors(&self) -> SmallVec<[ColorCode; 4]> {
        let mut seen: u16 = 0;
        for block in &self.blocks {
            seen |= block.color;
        }
        let mut out = SmallVec::new();
        while seen != 0 {
            let low = seen & seen.wrapping_neg();
            seen ^= low;
            out.push(low);
        }
        out
    }

    /// Checks structural validity against a line of `line_len` cells.
    ///
    /// # Errors
    ///
    /// - a block with zero length,
    /// - a block colored [`SPACE`] or with a non-power-of-two code,
    /// - a minimum span exceeding the line length.
    pub fn validate(&self, line_len: usize) -> Result<(), ClueError> {
        for block in &self.blocks {
            if block.len == 0 {
                return Err(ClueError::ZeroBlock);
            }
            if block.color == SPACE || block.color.count_ones() != 1 {
                return Err(ClueError::BadColor(block.color));
            }
        }
        let span = self.min_span();
        if span > line_len {
            return Err(ClueError::TooLong { span, line_len });
        }
        Ok(())
    }
}

/// A structurally invalid clue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClueError {
    /// A block of zero cells.
    ZeroBlock,
    /// A block colored with space or a non-power-of-two code.
    BadColor(ColorCode),
    /// The clue cannot fit the line even when packed tight.
    TooLong {
        /// Minimum number of cells the clue needs.
        span: usize,
        /// Number of cells actually available.
        line_len: usize,
    },
}

impl fmt::Display for ClueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroBlock => write!(f, "clue contains a zero-length block"),
            Self::BadColor(code) => write!(f, "clue block has invalid color code {code}"),
            Self::TooLong { span, line_len } => {
                write!(f, "clue needs {span} cells but the line has only {line_len}")
            }
        }
    }
}

impl std::error::Error for ClueError {}
