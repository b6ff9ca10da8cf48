use std::path::Path;

use chrono::{DateTime, Utc};
use cosmoslot_core::RoundOutcome;

/// Rounds settled during one session, kept only for the CSV export.
#[derive(Default)]
pub struct History {
    rows: Vec<(DateTime<Utc>, RoundOutcome)>,
}

impl History {
    pub fn record(&mut self, outcome: RoundOutcome) {
        self.rows.push((Utc::now(), outcome));
    }

    #[cfg(test)]
    pub fn outcomes(&self) -> Vec<&RoundOutcome> {
        self.rows.iter().map(|(_, outcome)| outcome).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn write_csv(&self, path: &Path) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(["round", "ts", "stake", "line", "win_symbol", "payout", "balance"])?;
        for (round, (ts, outcome)) in self.rows.iter().enumerate() {
            let line = outcome
                .win_line
                .iter()
                .map(|s| s.map_or("-", |s| s.name()))
                .collect::<Vec<_>>()
                .join(" ");
            wtr.write_record(&[
                (round + 1).to_string(),
                ts.to_rfc3339(),
                outcome.stake.to_string(),
                line,
                outcome
                    .win
                    .map(|w| w.symbol.to_string())
                    .unwrap_or_default(),
                outcome.payout().to_string(),
                outcome.balance.to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}
