use std::fmt;

use cosmoslot_core::{Jitter, Notice, SlotMachine, Symbol};
use tracing::info;

#[derive(Debug, Default)]
pub struct Report {
    pub rounds: u64,
    pub staked: u64,
    pub paid: u64,
    pub hits: u64,
    /// Wins per symbol, indexed by `Symbol::to_index`.
    pub wins_by_symbol: [u64; 5],
    pub final_balance: u64,
}

impl Report {
    pub fn return_ratio(&self) -> f64 {
        if self.staked == 0 {
            return 0.0;
        }
        self.paid as f64 / self.staked as f64
    }

    pub fn hit_rate(&self) -> f64 {
        if self.rounds == 0 {
            return 0.0;
        }
        self.hits as f64 / self.rounds as f64
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rounds        {}", self.rounds)?;
        writeln!(f, "staked        {}", self.staked)?;
        writeln!(f, "paid          {}", self.paid)?;
        writeln!(f, "return        {:.4}", self.return_ratio())?;
        writeln!(f, "hit rate      {:.4}", self.hit_rate())?;
        for symbol in Symbol::ALL {
            writeln!(
                f,
                "  {:<10}  {}",
                symbol.name(),
                self.wins_by_symbol[symbol.to_index() as usize]
            )?;
        }
        write!(f, "final balance {}", self.final_balance)
    }
}

/// Plays up to `rounds` rounds, stopping early once the balance is spent.
pub fn run<J: Jitter>(mut machine: SlotMachine<J>, rounds: u64) -> anyhow::Result<Report> {
    let mut report = Report::default();
    for _ in 0..rounds {
        let stake = machine.state().stake;
        if machine.spin().is_err() {
            info!(balance = machine.state().balance, "balance spent");
            break;
        }
        report.rounds += 1;
        report.staked += stake;
        for notice in machine.run_until_idle()? {
            if let Notice::RoundSettled(outcome) = notice {
                if let Some(win) = outcome.win {
                    report.hits += 1;
                    report.paid += win.payout;
                    report.wins_by_symbol[win.symbol.to_index() as usize] += 1;
                }
            }
        }
    }
    report.final_balance = machine.state().balance;
    Ok(report)
}
