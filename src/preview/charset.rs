//! Character sets for terminal previews.

use serde::{Deserialize, Serialize};

/// Standard ASCII density ramp (10 levels), darkest first.
pub const STANDARD_CHARSET: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Unicode block ramp (5 levels).
pub const BLOCKS_CHARSET: &[char] = &[' ', '░', '▒', '▓', '█'];

/// Minimal ramp (4 levels).
pub const MINIMAL_CHARSET: &[char] = &[' ', '.', ':', '#'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharSet {
    #[default]
    Standard,
    Blocks,
    Minimal,
    /// 2x4 dots per cell; does not use a density ramp.
    Braille,
}

impl CharSet {
    /// Density ramp for this charset. Empty for braille.
    pub fn chars(&self) -> &'static [char] {
        match self {
            CharSet::Standard => STANDARD_CHARSET,
            CharSet::Blocks => BLOCKS_CHARSET,
            CharSet::Minimal => MINIMAL_CHARSET,
            CharSet::Braille => &[],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharSet::Standard => "standard",
            CharSet::Blocks => "blocks",
            CharSet::Minimal => "minimal",
            CharSet::Braille => "braille",
        }
    }

    pub fn is_braille(&self) -> bool {
        matches!(self, CharSet::Braille)
    }
}
