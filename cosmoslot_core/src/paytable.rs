use crate::symbols::Symbol;
use serde::{Deserialize, Serialize};

/// Pays `payout_multiplier` times the stake when exactly `count` reels of the
/// win line show `symbol`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaytableEntry {
    pub symbol: Symbol,
    pub count: u8,
    pub payout_multiplier: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paytable(pub Vec<PaytableEntry>);

impl Paytable {
    pub fn simple_default() -> Self {
        Self(vec![
            PaytableEntry {
                symbol: Symbol::King,
                count: 4,
                payout_multiplier: 10,
            },
            PaytableEntry {
                symbol: Symbol::Martian,
                count: 4,
                payout_multiplier: 6,
            },
            PaytableEntry {
                symbol: Symbol::King,
                count: 3,
                payout_multiplier: 5,
            },
            PaytableEntry {
                symbol: Symbol::Ship,
                count: 4,
                payout_multiplier: 5,
            },
            PaytableEntry {
                symbol: Symbol::Planet,
                count: 4,
                payout_multiplier: 4,
            },
            PaytableEntry {
                symbol: Symbol::Star,
                count: 4,
                payout_multiplier: 3,
            },
        ])
    }

    pub fn multiplier(&self, symbol: Symbol, count: u8) -> Option<u64> {
        self.0
            .iter()
            .find(|e| e.symbol == symbol && e.count == count)
            .map(|e| e.payout_multiplier)
    }
}

impl Default for Paytable {
    fn default() -> Self {
        Self::simple_default()
    }
}
