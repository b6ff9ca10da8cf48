//! Spin timing: how far each reel scrolls and when the round's callbacks fire.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Symbols scrolled per "turn"; also the bound of the random extra turns.
    pub symbols_per_turn: u32,

    /// Turns every reel spins before its index is added.
    pub base_turns: u32,

    /// Animation time per scrolled symbol, before the 3x easing stretch (ms)
    pub symbol_time_ms: u64,

    /// Delay from round start until each unlocked reel reports its symbol (ms)
    pub resolve_delay_ms: u64,

    /// Delay from round start until the round settles and controls return (ms)
    pub settle_delay_ms: u64,

    /// How long the win banner stays up after settlement (ms)
    pub banner_duration_ms: u64,
}

impl TimingConfig {
    pub fn normal() -> Self {
        Self {
            symbols_per_turn: 10,
            base_turns: 2,
            symbol_time_ms: 20,
            resolve_delay_ms: 4000,
            settle_delay_ms: 4100,
            banner_duration_ms: 3500,
        }
    }

    /// Number of symbols reel `index` scrolls past, given a jitter draw in
    /// `0..symbols_per_turn`.
    pub fn spin_symbols(&self, index: usize, jitter: u32) -> u64 {
        (index as u64 + self.base_turns as u64) * self.symbols_per_turn as u64 + jitter as u64
    }

    /// Length of the scroll animation for a spin of `spin_symbols`.
    pub fn animation_ms(&self, spin_symbols: u64) -> u64 {
        3 * spin_symbols * self.symbol_time_ms
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}
