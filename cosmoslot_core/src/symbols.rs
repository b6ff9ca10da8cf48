use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Star,
    Ship,
    Planet,
    Martian,
    King,
}

impl Symbol {
    pub const ALL: [Symbol; 5] = [
        Symbol::Star,
        Symbol::Ship,
        Symbol::Planet,
        Symbol::Martian,
        Symbol::King,
    ];

    pub fn to_index(self) -> u8 {
        match self {
            Symbol::Star => 0,
            Symbol::Ship => 1,
            Symbol::Planet => 2,
            Symbol::Martian => 3,
            Symbol::King => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Symbol::Star => "star",
            Symbol::Ship => "ship",
            Symbol::Planet => "planet",
            Symbol::Martian => "martian",
            Symbol::King => "king",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown symbol: {0}")]
pub struct UnknownSymbol(pub String);

impl FromStr for Symbol {
    type Err = UnknownSymbol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbol::ALL
            .into_iter()
            .find(|sym| sym.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSymbol(s.to_string()))
    }
}

/// The strip painted on every reel, top to bottom, and the pixel height of
/// one symbol on it. Settled symbols are read off the scroll offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelStrip {
    pub symbols: Vec<Symbol>,
    pub symbol_height_px: u64,
}

impl ReelStrip {
    pub fn default_strip() -> Self {
        Self {
            symbols: vec![
                Symbol::Star,
                Symbol::Ship,
                Symbol::Planet,
                Symbol::Martian,
                Symbol::Star,
                Symbol::Ship,
                Symbol::King,
                Symbol::Star,
                Symbol::Martian,
                Symbol::Planet,
            ],
            symbol_height_px: 170,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Full height of the strip in pixels; offsets wrap around at this value.
    pub fn length_px(&self) -> u64 {
        self.symbol_height_px * self.symbols.len() as u64
    }

    /// Symbol showing on the win line when the strip has scrolled `offset_px`.
    pub fn symbol_at(&self, offset_px: u64) -> Symbol {
        let pos = (offset_px % self.length_px()) / self.symbol_height_px;
        self.symbols[pos as usize]
    }
}

impl Default for ReelStrip {
    fn default() -> Self {
        Self::default_strip()
    }
}
