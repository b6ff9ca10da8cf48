use cosmoslot_core::{
    adjust_stake, evaluate_win, settle, start_round, toggle_lock, GameConfig, Jitter, LockButton,
    Notice, Phase, RoundError, RoundState, SeededJitter, SlotMachine, Symbol, WinBanner,
    REEL_COUNT,
};

/// Hands out the given draws in order, then zeros.
struct Draws(Vec<u32>);

impl Jitter for Draws {
    fn next_below(&mut self, bound: u32) -> u32 {
        if self.0.is_empty() {
            return 0;
        }
        self.0.remove(0) % bound.max(1)
    }
}

fn showing(symbols: [Symbol; REEL_COUNT]) -> RoundState {
    let mut state = RoundState::new(100, 1);
    state.disable_locks_next_round = false;
    state.win_line = symbols.map(Some);
    state
}

fn finish_round(state: &mut RoundState, config: &GameConfig) -> cosmoslot_core::RoundOutcome {
    for reel in 0..REEL_COUNT {
        if state.reels[reel].pending.is_some() {
            cosmoslot_core::resolve_spin(state, &config.strip, reel).unwrap();
        }
    }
    settle(state, &config.paytable).unwrap()
}

#[test]
fn start_round_deducts_stake() {
    let config = GameConfig::default();
    for stake in 1..=3 {
        for balance in stake..stake + 5 {
            let mut state = RoundState::new(balance, stake);
            start_round(&mut state, &config, &mut Draws(vec![])).unwrap();
            assert_eq!(state.balance, balance - stake);
        }
    }
}

#[test]
fn zero_balance_never_starts() {
    let config = GameConfig::default();
    let mut state = RoundState::new(0, 1);
    assert!(matches!(
        start_round(&mut state, &config, &mut Draws(vec![])),
        Err(RoundError::InsufficientBalance { .. })
    ));
    assert_eq!(state.phase, Phase::Idle);
}

#[test]
fn four_locked_kings_pay_ten_times_stake() {
    let config = GameConfig::default();
    for stake in 1..=3 {
        let mut state = showing([Symbol::King; REEL_COUNT]);
        state.stake = stake;
        for reel in 0..REEL_COUNT {
            toggle_lock(&mut state, reel).unwrap();
        }
        let plan = start_round(&mut state, &config, &mut Draws(vec![])).unwrap();
        assert_eq!(plan.spinning().count(), 0);
        assert_eq!(state.win_line, [Some(Symbol::King); REEL_COUNT]);
        assert_eq!(state.phase, Phase::Settled);

        let outcome = finish_round(&mut state, &config);
        assert_eq!(outcome.payout(), stake * 10);
        assert_eq!(state.balance, 100 - stake + stake * 10);
    }
}

#[test]
fn three_locked_kings_pay_three_king_rate() {
    let config = GameConfig::default();
    let mut state = showing([Symbol::King; REEL_COUNT]);
    state.stake = 2;
    for reel in 0..3 {
        toggle_lock(&mut state, reel).unwrap();
    }
    // reel 3 scrolls 50 symbols from offset 0 and lands on a star
    start_round(&mut state, &config, &mut Draws(vec![0])).unwrap();
    let outcome = finish_round(&mut state, &config);
    assert_eq!(outcome.win_line[3], Some(Symbol::Star));
    let win = outcome.win.unwrap();
    assert_eq!((win.symbol, win.count), (Symbol::King, 3));
    assert_eq!(win.payout, 10);
}

#[test]
fn toggle_is_ignored_while_locks_disabled() {
    let mut state = showing([Symbol::Ship; REEL_COUNT]);
    state.disable_locks_next_round = true;
    let before = state.clone();
    assert_eq!(toggle_lock(&mut state, 2), Err(RoundError::LocksDisabled));
    assert_eq!(state, before);
}

#[test]
fn raising_from_top_stake_wraps_to_one() {
    for balance in [1, 3, 10, 10_000] {
        let mut state = RoundState::new(balance, 3);
        assert_eq!(adjust_stake(&mut state), Ok(1));
    }
}

#[test]
fn a_win_disables_locks_until_a_quiet_round() {
    let config = GameConfig::default();
    let mut state = showing([Symbol::King; REEL_COUNT]);
    for reel in 0..REEL_COUNT {
        toggle_lock(&mut state, reel).unwrap();
    }
    start_round(&mut state, &config, &mut Draws(vec![])).unwrap();
    assert!(finish_round(&mut state, &config).win.is_some());

    for reel in 0..REEL_COUNT {
        assert_eq!(toggle_lock(&mut state, reel), Err(RoundError::LocksDisabled));
    }
    assert!(state.reels.iter().all(|r| !r.locked));

    // star, ship, planet, martian: no win, no locks used
    start_round(&mut state, &config, &mut Draws(vec![0, 1, 2, 3])).unwrap();
    let outcome = finish_round(&mut state, &config);
    assert_eq!(
        outcome.win_line,
        [Symbol::Star, Symbol::Ship, Symbol::Planet, Symbol::Martian].map(Some)
    );
    assert_eq!(outcome.win, None);
    assert!(!outcome.locks_disabled_next_round);

    assert_eq!(toggle_lock(&mut state, 0), Ok(true));
    assert_eq!(state.locked_line[0], Some(Symbol::Star));
}

#[test]
fn releasing_a_hold_before_spinning_keeps_locks_available() {
    let config = GameConfig::default();
    let mut state = showing([Symbol::King, Symbol::Ship, Symbol::Planet, Symbol::Martian]);
    assert_eq!(toggle_lock(&mut state, 0), Ok(true));
    assert_eq!(toggle_lock(&mut state, 0), Ok(false));
    assert!(!state.lock_used_this_round);

    start_round(&mut state, &config, &mut Draws(vec![0, 1, 2, 3])).unwrap();
    let outcome = finish_round(&mut state, &config);
    assert_eq!(outcome.win, None);
    assert!(!outcome.locks_disabled_next_round);
    assert!(state.locks_enabled());
    assert_eq!(toggle_lock(&mut state, 1), Ok(true));
    assert_eq!(state.locked_line[1], Some(Symbol::Ship));
}

#[test]
fn holding_a_reel_disables_locks_next_round() {
    let config = GameConfig::default();
    let mut state = showing([Symbol::Star, Symbol::Ship, Symbol::Planet, Symbol::Martian]);
    toggle_lock(&mut state, 3).unwrap();
    start_round(&mut state, &config, &mut Draws(vec![0, 1, 2])).unwrap();
    let outcome = finish_round(&mut state, &config);
    assert_eq!(outcome.win_line[3], Some(Symbol::Martian));
    assert!(outcome.locks_disabled_next_round);
    assert_eq!(toggle_lock(&mut state, 0), Err(RoundError::LocksDisabled));
}

#[test]
fn machine_shows_and_clears_banner() {
    let mut state = showing([Symbol::Planet; REEL_COUNT]);
    for reel in 0..REEL_COUNT {
        toggle_lock(&mut state, reel).unwrap();
    }
    let mut machine = SlotMachine::with_jitter(GameConfig::default(), Draws(vec![]))
        .unwrap()
        .with_state(state);

    let before = machine.view();
    assert_eq!(before.locks, [LockButton::Locked; REEL_COUNT]);
    machine.spin().unwrap();
    assert!(!machine.view().controls_enabled);

    let notices = machine.advance_to(4100).unwrap();
    match notices.as_slice() {
        [Notice::RoundSettled(outcome)] => assert_eq!(outcome.payout(), 4),
        other => panic!("unexpected notices: {other:?}"),
    }
    let view = machine.view();
    assert_eq!(view.banner, Some(WinBanner { symbol: Symbol::Planet }));
    assert_eq!(view.balance, 103);
    assert_eq!(view.locks, [LockButton::Disabled; REEL_COUNT]);

    assert_eq!(machine.run_until_idle().unwrap(), vec![Notice::BannerCleared]);
    assert_eq!(machine.now_ms(), 4100 + 3500);
    assert_eq!(machine.view().banner, None);
}

#[test]
fn seeded_sessions_replay_identically() {
    let play = |seed: &str| {
        let mut machine =
            SlotMachine::with_jitter(GameConfig::default(), SeededJitter::new(seed)).unwrap();
        let mut lines = Vec::new();
        for _ in 0..20 {
            if machine.spin().is_err() {
                break;
            }
            for notice in machine.run_until_idle().unwrap() {
                if let Notice::RoundSettled(outcome) = notice {
                    lines.push(outcome.win_line);
                }
            }
        }
        (lines, machine.state().balance)
    };
    assert_eq!(play("replay"), play("replay"));
}

#[test]
fn return_ratio_smoke() {
    let mut machine =
        SlotMachine::with_jitter(GameConfig::default(), SeededJitter::new("rtp")).unwrap();
    let mut staked = 0u64;
    let mut paid = 0u64;
    for _ in 0..500 {
        let stake = machine.state().stake;
        if machine.spin().is_err() {
            break;
        }
        staked += stake;
        for notice in machine.run_until_idle().unwrap() {
            if let Notice::RoundSettled(outcome) = notice {
                paid += outcome.payout();
            }
        }
    }
    assert!(staked > 0);
    // very loose bounds, the table has no partial-line wins besides three kings
    let ratio = paid as f64 / staked as f64;
    assert!((0.0..=10.0).contains(&ratio));
}

#[test]
fn payout_at_balance_ceiling_saturates() {
    let mut state = showing([Symbol::King; REEL_COUNT]);
    state.balance = u64::MAX;
    for reel in 0..REEL_COUNT {
        toggle_lock(&mut state, reel).unwrap();
    }
    let mut machine = SlotMachine::with_jitter(GameConfig::default(), Draws(vec![]))
        .unwrap()
        .with_state(state);
    machine.spin().unwrap();
    machine.run_until_idle().unwrap();
    assert_eq!(machine.state().balance, u64::MAX);
    assert_eq!(machine.state().phase, Phase::Idle);
}

#[test]
fn oversized_multiplier_saturates_payout() {
    let mut config = GameConfig::default();
    config.paytable.0[0].payout_multiplier = u64::MAX;
    let win = evaluate_win(&[Some(Symbol::King); REEL_COUNT], 3, &config.paytable).unwrap();
    assert_eq!(win.payout, u64::MAX);
}
