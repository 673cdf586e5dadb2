//! Glyph selection - picks the character drawn for each tile.

use crate::color::luminance;
use crate::{PictileError, Result};
use image::Rgba;
use serde::Deserialize;

/// Brightness ramp, least ink first
pub const DEFAULT_RAMP: &str = " .:-=+*#%@";

/// Ordered, non-empty set of characters to draw with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
}

impl Alphabet {
    pub fn new(chars: &str) -> Result<Self> {
        let chars: Vec<char> = chars.chars().collect();
        if chars.is_empty() {
            return Err(PictileError::InvalidCharlist("character list is empty".to_string()));
        }
        Ok(Self { chars })
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Map 0-255 brightness onto the ramp; 255 lands on the last character
    pub fn by_level(&self, level: u8) -> char {
        let idx = level as usize * (self.chars.len() - 1) / 255;
        self.chars[idx]
    }

    pub fn by_index(&self, index: usize) -> char {
        self.chars[index % self.chars.len()]
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self { chars: DEFAULT_RAMP.chars().collect() }
    }
}

/// How a glyph is chosen for a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GlyphMode {
    /// Brightness of the representative color indexes the ramp
    #[default]
    Luminance,
    /// Walk the alphabet in tile order, ignoring color
    Cycle,
}

pub struct GlyphSelector {
    alphabet: Alphabet,
    mode: GlyphMode,
}

impl GlyphSelector {
    pub fn new(alphabet: Alphabet, mode: GlyphMode) -> Self {
        Self { alphabet, mode }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// `index` is the tile's row-major position in the grid
    pub fn select(&self, color: Rgba<u8>, index: usize) -> char {
        match self.mode {
            GlyphMode::Luminance => {
                let [r, g, b, _] = color.0;
                self.alphabet.by_level(luminance(r, g, b))
            }
            GlyphMode::Cycle => self.alphabet.by_index(index),
        }
    }
}

impl Default for GlyphSelector {
    fn default() -> Self {
        Self::new(Alphabet::default(), GlyphMode::default())
    }
}
