//! CLI enum types.

use clap::ValueEnum;

use crate::preview;

/// Preview character set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CharacterSet {
    #[default]
    Standard,
    Blocks,
    Minimal,
    Braille,
}

impl From<CharacterSet> for preview::CharSet {
    fn from(c: CharacterSet) -> Self {
        match c {
            CharacterSet::Standard => preview::CharSet::Standard,
            CharacterSet::Blocks => preview::CharSet::Blocks,
            CharacterSet::Minimal => preview::CharSet::Minimal,
            CharacterSet::Braille => preview::CharSet::Braille,
        }
    }
}
