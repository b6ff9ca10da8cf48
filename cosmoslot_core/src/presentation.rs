//! Presentation sync: what a host should show, derived only from round state.
//!
//! Hosts capture a [`ViewState`] after every input or fired callback and
//! apply the [`ViewChange`]s between the previous and the new capture.

use serde::{Deserialize, Serialize};

use crate::{
    engine::{RoundState, REEL_COUNT},
    symbols::Symbol,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockButton {
    Locked,
    Unlocked,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinBanner {
    pub symbol: Symbol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelView {
    /// Scroll position the reel is showing, or heading to while it spins.
    pub offset_px: u64,
    /// Set while the reel is scrolling towards `offset_px`.
    pub animation_ms: Option<u64>,
    pub symbol: Option<Symbol>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub balance: u64,
    pub stake: u64,
    /// The balance no longer covers the current stake.
    pub stake_warning: bool,
    pub controls_enabled: bool,
    pub locks: [LockButton; REEL_COUNT],
    pub reels: [ReelView; REEL_COUNT],
    pub banner: Option<WinBanner>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewChange {
    Balance(u64),
    Stake(u64),
    StakeWarning(bool),
    Controls(bool),
    Lock { reel: usize, button: LockButton },
    Reel { reel: usize, view: ReelView },
    Banner(Option<WinBanner>),
}

impl ViewState {
    pub fn capture(state: &RoundState, banner: Option<&WinBanner>) -> Self {
        let locks_enabled = state.locks_enabled();
        let locks = std::array::from_fn(|i| {
            if state.reels[i].locked {
                LockButton::Locked
            } else if locks_enabled {
                LockButton::Unlocked
            } else {
                LockButton::Disabled
            }
        });
        let reels = std::array::from_fn(|i| {
            let reel = &state.reels[i];
            match reel.pending {
                Some(spin) => ReelView {
                    offset_px: spin.target_offset_px,
                    animation_ms: Some(spin.animation_ms),
                    symbol: None,
                },
                None => ReelView {
                    offset_px: reel.offset_px,
                    animation_ms: None,
                    symbol: reel.symbol,
                },
            }
        });
        Self {
            balance: state.balance,
            stake: state.stake,
            stake_warning: state.balance < state.stake,
            controls_enabled: state.controls_enabled(),
            locks,
            reels,
            banner: banner.copied(),
        }
    }

    /// Changes that turn `self` into `next`.
    pub fn diff(&self, next: &ViewState) -> Vec<ViewChange> {
        let mut changes = Vec::new();
        if self.balance != next.balance {
            changes.push(ViewChange::Balance(next.balance));
        }
        if self.stake != next.stake {
            changes.push(ViewChange::Stake(next.stake));
        }
        if self.stake_warning != next.stake_warning {
            changes.push(ViewChange::StakeWarning(next.stake_warning));
        }
        if self.controls_enabled != next.controls_enabled {
            changes.push(ViewChange::Controls(next.controls_enabled));
        }
        for reel in 0..REEL_COUNT {
            if self.locks[reel] != next.locks[reel] {
                changes.push(ViewChange::Lock {
                    reel,
                    button: next.locks[reel],
                });
            }
        }
        for reel in 0..REEL_COUNT {
            if self.reels[reel] != next.reels[reel] {
                changes.push(ViewChange::Reel {
                    reel,
                    view: next.reels[reel],
                });
            }
        }
        if self.banner != next.banner {
            changes.push(ViewChange::Banner(next.banner));
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::toggle_lock;

    #[test]
    fn fresh_game_shows_disabled_locks() {
        let view = ViewState::capture(&RoundState::new(5, 1), None);
        assert_eq!(view.locks, [LockButton::Disabled; REEL_COUNT]);
        assert!(view.controls_enabled);
        assert!(!view.stake_warning);
        assert_eq!(view.reels[0].symbol, None);
    }

    #[test]
    fn diff_reports_only_changed_fields() {
        let mut state = RoundState::new(5, 1);
        state.disable_locks_next_round = false;
        state.win_line = [Some(Symbol::Ship); REEL_COUNT];
        let before = ViewState::capture(&state, None);
        toggle_lock(&mut state, 1).unwrap();
        let after = ViewState::capture(&state, None);
        assert_eq!(
            before.diff(&after),
            vec![ViewChange::Lock {
                reel: 1,
                button: LockButton::Locked
            }]
        );
        assert!(after.diff(&after).is_empty());
    }

    #[test]
    fn warns_when_stake_exceeds_balance() {
        let mut state = RoundState::new(2, 3);
        assert!(ViewState::capture(&state, None).stake_warning);
        state.balance = 3;
        assert!(!ViewState::capture(&state, None).stake_warning);
    }
}
