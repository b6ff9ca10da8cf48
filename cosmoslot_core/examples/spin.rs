use cosmoslot_core::{GameConfig, Notice, SeededJitter, SlotMachine};

fn main() {
    // One round end to end on a virtual clock
    let mut machine =
        SlotMachine::with_jitter(GameConfig::default(), SeededJitter::new("example-seed"))
            .expect("default config is valid");
    let plan = machine.spin().expect("fresh balance covers the stake");
    for spin in plan.spinning() {
        println!(
            "reel {} scrolls {} symbols over {}ms",
            spin.index, spin.spin_symbols, spin.animation_ms
        );
    }
    for notice in machine.run_until_idle().expect("scheduled callbacks fire in order") {
        match notice {
            Notice::ReelResolved { reel, symbol } => println!("reel {reel} -> {symbol}"),
            Notice::RoundSettled(outcome) => println!(
                "payout={} balance={} line={:?}",
                outcome.payout(),
                outcome.balance,
                outcome.win_line
            ),
            Notice::BannerCleared => println!("banner cleared"),
        }
    }
}
