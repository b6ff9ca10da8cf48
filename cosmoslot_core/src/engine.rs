use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    config::GameConfig,
    paytable::Paytable,
    rng::Jitter,
    symbols::{ReelStrip, Symbol},
};

pub const REEL_COUNT: usize = 4;
pub const MIN_STAKE: u64 = 1;
pub const MAX_STAKE: u64 = 3;

pub type Line = [Option<Symbol>; REEL_COUNT];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoundError {
    #[error("balance {balance} cannot cover stake {stake}")]
    InsufficientBalance { balance: u64, stake: u64 },
    #[error("controls are disabled while the round is {0:?}")]
    NotIdle(Phase),
    #[error("locks are disabled this round")]
    LocksDisabled,
    #[error("no reel at index {0}")]
    NoSuchReel(usize),
    #[error("reel {0} has no spin in flight")]
    ReelNotPending(usize),
    #[error("{0} reel(s) still spinning")]
    ReelsPending(usize),
    #[error("no round in progress")]
    NotSpinning,
}

/// `Idle → Spinning → Settled → Idle`. `Settled` means every reel has
/// reported its symbol and the round is waiting to be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Spinning,
    Settled,
}

/// One reel's scroll for the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelSpin {
    pub index: usize,
    pub spin_symbols: u64,
    pub start_offset_px: u64,
    pub target_offset_px: u64,
    pub animation_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reel {
    pub locked: bool,
    pub offset_px: u64,
    /// Last symbol this reel settled on.
    pub symbol: Option<Symbol>,
    pub pending: Option<ReelSpin>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub balance: u64,
    pub stake: u64,
    pub reels: [Reel; REEL_COUNT],
    pub win_line: Line,
    pub locked_line: Line,
    pub lock_used_this_round: bool,
    pub disable_locks_next_round: bool,
    pub phase: Phase,
}

impl RoundState {
    /// A fresh game. Locks start disabled: there is nothing on the line to hold.
    pub fn new(balance: u64, stake: u64) -> Self {
        Self {
            balance,
            stake: stake.clamp(MIN_STAKE, MAX_STAKE),
            reels: Default::default(),
            win_line: [None; REEL_COUNT],
            locked_line: [None; REEL_COUNT],
            lock_used_this_round: false,
            disable_locks_next_round: true,
            phase: Phase::Idle,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.starting_balance, config.starting_stake)
    }

    /// Spin and bet controls are live only between rounds.
    pub fn controls_enabled(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn locks_enabled(&self) -> bool {
        self.controls_enabled() && !self.disable_locks_next_round
    }

    pub fn can_afford_round(&self) -> bool {
        self.balance > 0 && self.balance >= self.stake
    }

    pub fn pending_reels(&self) -> usize {
        self.reels.iter().filter(|r| r.pending.is_some()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReelPlan {
    Spin(ReelSpin),
    Held(Option<Symbol>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinPlan {
    pub reels: Vec<ReelPlan>,
    /// Delay after round start at which spinning reels report their symbol.
    pub resolve_after_ms: u64,
    /// Delay after round start at which the round is evaluated.
    pub settle_after_ms: u64,
}

impl SpinPlan {
    pub fn spinning(&self) -> impl Iterator<Item = &ReelSpin> {
        self.reels.iter().filter_map(|r| match r {
            ReelPlan::Spin(spin) => Some(spin),
            ReelPlan::Held(_) => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Win {
    pub symbol: Symbol,
    /// Reels on the line showing `symbol`.
    pub count: u8,
    pub multiplier: u64,
    pub payout: u64,
}

impl Win {
    pub fn is_full_line(&self) -> bool {
        self.count as usize == REEL_COUNT
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub win_line: Line,
    pub stake: u64,
    pub win: Option<Win>,
    pub balance: u64,
    pub locks_disabled_next_round: bool,
}

impl RoundOutcome {
    pub fn payout(&self) -> u64 {
        self.win.map_or(0, |w| w.payout)
    }
}

/// Flips the hold on `index`. Returns whether the reel is now locked.
pub fn toggle_lock(state: &mut RoundState, index: usize) -> Result<bool, RoundError> {
    if index >= REEL_COUNT {
        return Err(RoundError::NoSuchReel(index));
    }
    if !state.controls_enabled() {
        return Err(RoundError::NotIdle(state.phase));
    }
    if state.disable_locks_next_round {
        return Err(RoundError::LocksDisabled);
    }
    let reel = &mut state.reels[index];
    reel.locked = !reel.locked;
    if reel.locked {
        state.locked_line[index] = state.win_line[index];
        state.lock_used_this_round = true;
    } else {
        state.locked_line[index] = None;
        state.lock_used_this_round = false;
    }
    debug!(reel = index, locked = reel.locked, "lock toggled");
    Ok(reel.locked)
}

/// Charges the stake and sets every unlocked reel spinning.
pub fn start_round(
    state: &mut RoundState,
    config: &GameConfig,
    jitter: &mut dyn Jitter,
) -> Result<SpinPlan, RoundError> {
    if !state.controls_enabled() {
        return Err(RoundError::NotIdle(state.phase));
    }
    if !state.can_afford_round() {
        return Err(RoundError::InsufficientBalance {
            balance: state.balance,
            stake: state.stake,
        });
    }

    let timing = &config.timing;
    state.balance -= state.stake;
    state.win_line = [None; REEL_COUNT];

    let mut reels = Vec::with_capacity(REEL_COUNT);
    for (index, reel) in state.reels.iter_mut().enumerate() {
        if reel.locked {
            state.win_line[index] = state.locked_line[index];
            reels.push(ReelPlan::Held(state.locked_line[index]));
            continue;
        }
        let spin_symbols =
            timing.spin_symbols(index, jitter.next_below(timing.symbols_per_turn));
        let spin = ReelSpin {
            index,
            spin_symbols,
            start_offset_px: reel.offset_px,
            target_offset_px: reel.offset_px + spin_symbols * config.strip.symbol_height_px,
            animation_ms: timing.animation_ms(spin_symbols),
        };
        reel.pending = Some(spin);
        reels.push(ReelPlan::Spin(spin));
    }

    state.phase = if state.pending_reels() == 0 {
        Phase::Settled
    } else {
        Phase::Spinning
    };
    debug!(
        stake = state.stake,
        balance = state.balance,
        spinning = state.pending_reels(),
        "round started"
    );
    Ok(SpinPlan {
        reels,
        resolve_after_ms: timing.resolve_delay_ms,
        settle_after_ms: timing.settle_delay_ms,
    })
}

/// Lands reel `index` on the symbol under its final scroll offset.
pub fn resolve_spin(
    state: &mut RoundState,
    strip: &ReelStrip,
    index: usize,
) -> Result<Symbol, RoundError> {
    let reel = state
        .reels
        .get_mut(index)
        .ok_or(RoundError::NoSuchReel(index))?;
    let spin = reel.pending.take().ok_or(RoundError::ReelNotPending(index))?;
    let symbol = strip.symbol_at(spin.target_offset_px);
    reel.offset_px = spin.target_offset_px;
    reel.symbol = Some(symbol);
    state.win_line[index] = Some(symbol);
    if state.pending_reels() == 0 {
        state.phase = Phase::Settled;
    }
    debug!(reel = index, %symbol, offset_px = spin.target_offset_px, "reel resolved");
    Ok(symbol)
}

/// Pays the first symbol, in order of appearance on the line, whose count
/// has a pay table entry. Empty slots are not counted.
pub fn evaluate_win(win_line: &[Option<Symbol>], stake: u64, paytable: &Paytable) -> Option<Win> {
    let mut tally: Vec<(Symbol, u8)> = Vec::with_capacity(win_line.len());
    for &symbol in win_line.iter().flatten() {
        match tally.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, count)) => *count += 1,
            None => tally.push((symbol, 1)),
        }
    }
    tally.into_iter().find_map(|(symbol, count)| {
        paytable.multiplier(symbol, count).map(|multiplier| Win {
            symbol,
            count,
            multiplier,
            payout: stake.saturating_mul(multiplier),
        })
    })
}

/// Evaluates the settled line, pays out and releases every lock.
pub fn settle(state: &mut RoundState, paytable: &Paytable) -> Result<RoundOutcome, RoundError> {
    match state.phase {
        Phase::Settled => {}
        Phase::Spinning => return Err(RoundError::ReelsPending(state.pending_reels())),
        Phase::Idle => return Err(RoundError::NotSpinning),
    }

    let win = evaluate_win(&state.win_line, state.stake, paytable);
    // balance caps at u64::MAX rather than wrapping
    if let Some(w) = win {
        state.balance = state.balance.saturating_add(w.payout);
    }

    state.disable_locks_next_round = win.is_some() || state.lock_used_this_round;
    state.lock_used_this_round = false;
    for reel in state.reels.iter_mut() {
        reel.locked = false;
    }
    state.locked_line = [None; REEL_COUNT];
    state.phase = Phase::Idle;

    let outcome = RoundOutcome {
        win_line: state.win_line,
        stake: state.stake,
        win,
        balance: state.balance,
        locks_disabled_next_round: state.disable_locks_next_round,
    };
    match win {
        Some(w) => info!(
            symbol = %w.symbol,
            count = w.count,
            payout = w.payout,
            balance = state.balance,
            "round won"
        ),
        None => info!(balance = state.balance, "round lost"),
    }
    Ok(outcome)
}

/// Cycles the stake 1 → 2 → 3 → 1, falling back to 1 when the balance
/// cannot cover the next step.
pub fn adjust_stake(state: &mut RoundState) -> Result<u64, RoundError> {
    if !state.controls_enabled() {
        return Err(RoundError::NotIdle(state.phase));
    }
    let next = state.stake + 1;
    state.stake = if next <= MAX_STAKE && state.balance >= next {
        next
    } else {
        MIN_STAKE
    };
    Ok(state.stake)
}
