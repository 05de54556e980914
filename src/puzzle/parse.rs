#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A parser for the line-based text puzzle format.
//!
//! The format is deliberately small:
//! - Comment lines start with `#`; blank lines are ignored.
//! - Optional `color <name> <symbol>` lines declare extra palette colors.
//!   The colors `white` (space) and `black` are always present.
//! - A `rows` line starts the row-clue section, a `columns` line the
//!   column-clue section. Each following line holds one clue: blocks
//!   separated by whitespace, written as `<len>` (black) or `<len><color>`
//!   (e.g. `2red`). A single `0` denotes the empty clue.
//!
//! ```text
//! # a 2x2 checkerboard corner
//! rows
//! 1
//! 1
//! columns
//! 1
//! 1
//! ```

use crate::puzzle::board::{Board, BoardError};
use crate::puzzle::cell::ColorCode;
use crate::puzzle::clue::{Block, Clue};
use crate::puzzle::color::{Palette, PaletteError};
use std::fmt;
use std::io::{self, BufRead};
use std::path::Path;

/// A puzzle file the parser cannot make sense of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A line outside any section that is no directive.
    StrayLine {
        /// 1-based line number.
        line: usize,
    },
    /// A malformed `color` directive.
    BadColorDirective {
        /// 1-based line number.
        line: usize,
    },
    /// A clue block token that is not `<len>[<color>]`.
    BadToken {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },
    /// A clue block names a color that was never declared.
    UnknownColor {
        /// 1-based line number.
        line: usize,
        /// The undeclared name.
        name: String,
    },
    /// The `rows` or `columns` section is missing or empty.
    MissingSection(&'static str),
    /// The palette rejected a declaration.
    Palette(PaletteError),
    /// The clues parsed but the board rejected them.
    Board(BoardError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StrayLine { line } => write!(f, "line {line}: expected a section or directive"),
            Self::BadColorDirective { line } => {
                write!(f, "line {line}: expected `color <name> <symbol>`")
            }
            Self::BadToken { line, token } => {
                write!(f, "line {line}: bad clue block {token:?}")
            }
            Self::UnknownColor { line, name } => {
                write!(f, "line {line}: color {name:?} is not declared")
            }
            Self::MissingSection(name) => write!(f, "missing or empty {name} section"),
            Self::Palette(err) => write!(f, "{err}"),
            Self::Board(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<PaletteError> for ParseError {
    fn from(err: PaletteError) -> Self {
        Self::Palette(err)
    }
}

impl From<BoardError> for ParseError {
    fn from(err: BoardError) -> Self {
        Self::Board(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Rows,
    Columns,
}

/// Parses a puzzle from a `BufRead` source. Unreadable lines are skipped.
///
/// # Errors
///
/// [`ParseError`] on malformed input.
pub fn parse_puzzle<R: BufRead>(reader: R) -> Result<Board, ParseError> {
    let mut palette = Palette::monochrome();
    let mut section = Section::Preamble;
    let mut row_clues: Vec<Clue> = Vec::new();
    let mut column_clues: Vec<Clue> = Vec::new();

    for (index, line) in reader.lines().map_while(Result::ok).enumerate() {
        let line_no = index + 1;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        match text {
            "rows" => {
                section = Section::Rows;
                continue;
            }
            "columns" => {
                section = Section::Columns;
                continue;
            }
            _ => {}
        }
        match section {
            Section::Preamble => {
                let mut parts = text.split_whitespace();
                if parts.next() != Some("color") {
                    return Err(ParseError::StrayLine { line: line_no });
                }
                let (name, symbol) = match (parts.next(), parts.next(), parts.next()) {
                    (Some(name), Some(symbol), None) if symbol.chars().count() == 1 => {
                        (name, symbol.chars().next().unwrap())
                    }
                    _ => return Err(ParseError::BadColorDirective { line: line_no }),
                };
                palette.push(name, symbol)?;
            }
            Section::Rows => row_clues.push(parse_clue(text, line_no, &palette)?),
            Section::Columns => column_clues.push(parse_clue(text, line_no, &palette)?),
        }
    }

    if row_clues.is_empty() {
        return Err(ParseError::MissingSection("rows"));
    }
    if column_clues.is_empty() {
        return Err(ParseError::MissingSection("columns"));
    }
    Ok(Board::new(palette, row_clues, column_clues)?)
}

/// Parses a puzzle held in a string.
///
/// # Errors
///
/// See [`parse_puzzle`].
pub fn parse_puzzle_text(text: &str) -> Result<Board, ParseError> {
    parse_puzzle(io::Cursor::new(text))
}

/// Parses a puzzle file.
///
/// # Errors
///
/// I/O errors are returned as-is; parse errors map to
/// [`io::ErrorKind::InvalidData`].
pub fn parse_puzzle_file(path: &Path) -> io::Result<Board> {
    let file = std::fs::File::open(path)?;
    let reader = io::BufReader::new(file);
    parse_puzzle(reader).map_err(|err| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("failed to parse {}: {err}", path.display()),
        )
    })
}

fn parse_clue(text: &str, line_no: usize, palette: &Palette) -> Result<Clue, ParseError> {
    if text == "0" {
        return Ok(Clue::empty());
    }
    let mut blocks = Vec::new();
    for token in text.split_whitespace() {
        let digits = token.chars().take_while(char::is_ascii_digit).count();
        let len: usize = token[..digits].parse().map_err(|_| ParseError::BadToken {
            line: line_no,
            token: token.to_string(),
        })?;
        let color = parse_color(&token[digits..], line_no, palette)?;
        blocks.push(Block::new(len, color));
    }
    Ok(Clue::new(blocks))
}

fn parse_color(name: &str, line_no: usize, palette: &Palette) -> Result<ColorCode, ParseError> {
    let name = if name.is_empty() { "black" } else { name };
    palette
        .find_by_name(name)
        .map(|color| color.code)
        .ok_or_else(|| ParseError::UnknownColor {
            line: line_no,
            name: name.to_string(),
        })
}
