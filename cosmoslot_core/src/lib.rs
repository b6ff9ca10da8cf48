pub mod config;
pub mod engine;
pub mod paytable;
pub mod presentation;
pub mod rng;
pub mod schedule;
pub mod symbols;
pub mod timing;

pub use crate::config::{ConfigError, GameConfig};
pub use crate::engine::{
    adjust_stake, evaluate_win, resolve_spin, settle, start_round, toggle_lock, Phase, Reel,
    ReelPlan, ReelSpin, RoundError, RoundOutcome, RoundState, SpinPlan, Win, MAX_STAKE,
    MIN_STAKE, REEL_COUNT,
};
pub use crate::paytable::{Paytable, PaytableEntry};
pub use crate::presentation::{LockButton, ReelView, ViewChange, ViewState, WinBanner};
pub use crate::rng::{derive_floats, Jitter, SeededJitter, ThreadJitter};
pub use crate::schedule::{Event, Notice, SlotMachine, Timeline};
pub use crate::symbols::{ReelStrip, Symbol, UnknownSymbol};
pub use crate::timing::TimingConfig;
