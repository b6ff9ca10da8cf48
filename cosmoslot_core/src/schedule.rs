//! Timer-driven play on top of the round operations.
//!
//! Everything runs on one virtual timeline: a round start schedules each
//! spinning reel's resolution and the round's settlement as delayed
//! callbacks, a win schedules the banner's removal. The host owns the clock
//! and calls [`SlotMachine::advance_to`]; nothing scheduled is ever cancelled.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::{ConfigError, GameConfig},
    engine::{self, RoundError, RoundOutcome, RoundState, SpinPlan},
    presentation::{ViewState, WinBanner},
    rng::{Jitter, ThreadJitter},
    symbols::Symbol,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Event {
    ResolveReel(usize),
    Settle,
    /// Removes the banner raised by round `round`, if it is still showing.
    ClearBanner { round: u64 },
}

/// Delayed callbacks ordered by deadline, then by scheduling order.
#[derive(Debug, Default)]
pub struct Timeline {
    now_ms: u64,
    seq: u64,
    queue: BinaryHeap<Reverse<(u64, u64, Event)>>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn schedule_in(&mut self, delay_ms: u64, event: Event) {
        let at = self.now_ms + delay_ms;
        self.queue.push(Reverse((at, self.seq, event)));
        self.seq += 1;
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.queue.peek().map(|Reverse((at, _, _))| *at)
    }

    /// Pops the earliest event due at or before `until_ms`, moving the clock
    /// to its deadline.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Event> {
        if self.next_deadline()? > until_ms {
            return None;
        }
        let Reverse((at, _, event)) = self.queue.pop()?;
        self.now_ms = self.now_ms.max(at);
        Some(event)
    }

    /// Moves the clock forward; it never runs backwards.
    pub fn advance_clock(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// What a fired callback did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    ReelResolved { reel: usize, symbol: Symbol },
    RoundSettled(RoundOutcome),
    BannerCleared,
}

pub struct SlotMachine<J: Jitter = ThreadJitter> {
    config: GameConfig,
    state: RoundState,
    jitter: J,
    timeline: Timeline,
    round: u64,
    banner: Option<(u64, WinBanner)>,
}

impl SlotMachine<ThreadJitter> {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_jitter(config, ThreadJitter)
    }
}

impl<J: Jitter> SlotMachine<J> {
    pub fn with_jitter(config: GameConfig, jitter: J) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: RoundState::from_config(&config),
            config,
            jitter,
            timeline: Timeline::new(),
            round: 0,
            banner: None,
        })
    }

    /// Replaces the round state, e.g. to resume a hand-built position.
    pub fn with_state(mut self, state: RoundState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn now_ms(&self) -> u64 {
        self.timeline.now_ms()
    }

    /// Rounds started so far.
    pub fn rounds_started(&self) -> u64 {
        self.round
    }

    pub fn banner(&self) -> Option<&WinBanner> {
        self.banner.as_ref().map(|(_, b)| b)
    }

    pub fn view(&self) -> ViewState {
        ViewState::capture(&self.state, self.banner())
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.timeline.next_deadline()
    }

    /// Nothing left scheduled: no round in flight and no banner to clear.
    pub fn is_idle(&self) -> bool {
        self.timeline.is_empty()
    }

    pub fn spin(&mut self) -> Result<SpinPlan, RoundError> {
        let plan = engine::start_round(&mut self.state, &self.config, &mut self.jitter)?;
        self.round += 1;
        for spin in plan.spinning() {
            self.timeline
                .schedule_in(plan.resolve_after_ms, Event::ResolveReel(spin.index));
        }
        self.timeline.schedule_in(plan.settle_after_ms, Event::Settle);
        Ok(plan)
    }

    pub fn raise_stake(&mut self) -> Result<u64, RoundError> {
        engine::adjust_stake(&mut self.state)
    }

    pub fn toggle_lock(&mut self, reel: usize) -> Result<bool, RoundError> {
        engine::toggle_lock(&mut self.state, reel)
    }

    /// Fires every callback due at or before `now_ms`, in order.
    pub fn advance_to(&mut self, now_ms: u64) -> Result<Vec<Notice>, RoundError> {
        let mut notices = Vec::new();
        while let Some(event) = self.timeline.pop_due(now_ms) {
            if let Some(notice) = self.fire(event)? {
                notices.push(notice);
            }
        }
        self.timeline.advance_clock(now_ms);
        Ok(notices)
    }

    /// Runs the clock forward until nothing is left scheduled.
    pub fn run_until_idle(&mut self) -> Result<Vec<Notice>, RoundError> {
        let mut notices = Vec::new();
        while let Some(deadline) = self.timeline.next_deadline() {
            notices.extend(self.advance_to(deadline)?);
        }
        Ok(notices)
    }

    fn fire(&mut self, event: Event) -> Result<Option<Notice>, RoundError> {
        debug!(?event, now_ms = self.timeline.now_ms(), "timer fired");
        match event {
            Event::ResolveReel(reel) => {
                let symbol = engine::resolve_spin(&mut self.state, &self.config.strip, reel)?;
                Ok(Some(Notice::ReelResolved { reel, symbol }))
            }
            Event::Settle => {
                let outcome = engine::settle(&mut self.state, &self.config.paytable)?;
                if let Some(win) = outcome.win {
                    self.banner = Some((self.round, WinBanner { symbol: win.symbol }));
                    self.timeline.schedule_in(
                        self.config.timing.banner_duration_ms,
                        Event::ClearBanner { round: self.round },
                    );
                }
                Ok(Some(Notice::RoundSettled(outcome)))
            }
            Event::ClearBanner { round } => match self.banner {
                Some((shown, _)) if shown == round => {
                    self.banner = None;
                    Ok(Some(Notice::BannerCleared))
                }
                _ => Ok(None),
            },
        }
    }
}
