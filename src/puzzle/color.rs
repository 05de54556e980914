#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The color palette of a puzzle.
//!
//! A palette is a small ordered set of colors. The background (space) color
//! always sits first with code 1; every further color doubles the previous
//! code, so codes stay distinct powers of two and a set of colors packs into
//! a [`Cell`] mask.

use crate::puzzle::cell::{Cell, ColorCode, SPACE};
use std::fmt;

/// The maximum number of palette entries, bounded by the `u16` cell mask.
pub const MAX_COLORS: usize = 16;

/// A single palette entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Color {
    /// Name used to refer to the color in clues (e.g. `red`).
    pub name: String,
    /// ASCII symbol used when rendering the color in a terminal.
    pub symbol: char,
    /// Power-of-two code used by the solver.
    pub code: ColorCode,
}

/// An ordered collection of colors, space first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

/// Raised when a palette cannot accommodate a requested color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// The palette already holds [`MAX_COLORS`] entries.
    Full,
    /// A color with this name is already registered.
    Duplicate(String),
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "palette already holds {MAX_COLORS} colors"),
            Self::Duplicate(name) => write!(f, "color {name:?} is already registered"),
        }
    }
}

impl std::error::Error for PaletteError {}

impl Palette {
    /// Creates a palette holding only the space color.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            colors: vec![Color {
                name: "white".to_string(),
                symbol: '.',
                code: SPACE,
            }],
        }
    }

    /// The standard black-and-white palette.
    #[must_use]
    pub fn monochrome() -> Self {
        let mut palette = Self::empty();
        palette
            .push("black", '#')
            .expect("two colors always fit");
        palette
    }

    /// Registers a new color and returns its code.
    ///
    /// # Errors
    ///
    /// Fails if the palette is full or the name is already taken.
    pub fn push(&mut self, name: &str, symbol: char) -> Result<ColorCode, PaletteError> {
        if self.colors.len() >= MAX_COLORS {
            return Err(PaletteError::Full);
        }
        if self.find_by_name(name).is_some() {
            return Err(PaletteError::Duplicate(name.to_string()));
        }
        let code = 1 << self.colors.len();
        self.colors.push(Color {
            name: name.to_string(),
            symbol,
            code,
        });
        Ok(code)
    }

    /// The number of colors, space included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether only the space color is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.len() <= 1
    }

    /// Whether the palette is the two-color black-and-white one.
    #[must_use]
    pub fn is_monochrome(&self) -> bool {
        self.colors.len() == 2
    }

    /// The mask with every palette bit set: the initial UNKNOWN cell value.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn full_mask(&self) -> Cell {
        Cell::from_mask(((1u32 << self.colors.len()) - 1) as u16)
    }

    /// The code of the single non-space color of a monochrome palette.
    #[must_use]
    pub fn ink(&self) -> Option<ColorCode> {
        if self.is_monochrome() {
            Some(self.colors[1].code)
        } else {
            None
        }
    }

    /// Looks a color up by its clue name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Color> {
        self.colors.iter().find(|c| c.name == name)
    }

    /// Looks a color up by its code.
    #[must_use]
    pub fn find_by_code(&self, code: ColorCode) -> Option<&Color> {
        self.colors.iter().find(|c| c.code == code)
    }

    /// Whether `code` names a palette color.
    #[must_use]
    pub fn contains(&self, code: ColorCode) -> bool {
        self.find_by_code(code).is_some()
    }

    /// The terminal symbol for a color code, `'?'` for unknown codes.
    #[must_use]
    pub fn symbol_of(&self, code: ColorCode) -> char {
        self.find_by_code(code).map_or('?', |c| c.symbol)
    }

    /// Iterates the palette entries in code order.
    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter()
    }
}
