use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cosmoslot_core::{GameConfig, SeededJitter, SlotMachine};
use tracing_subscriber::EnvFilter;

mod history;
mod play;
mod simulate;

#[derive(Parser)]
#[command(name = "cosmoslot", about = "Four-reel space slot machine in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// JSON game config; missing fields take their defaults
    #[arg(long, value_parser, env = "COSMOSLOT_CONFIG")]
    config: Option<PathBuf>,
    /// Starting balance, overrides the config file
    #[arg(long, env = "COSMOSLOT_BALANCE")]
    balance: Option<u64>,
    /// Starting stake (1-3), overrides the config file
    #[arg(long, env = "COSMOSLOT_STAKE")]
    stake: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively: spin, bet, lock N, show, quit
    Play {
        /// Fire timers immediately instead of waiting out the animations
        #[arg(long)]
        instant: bool,
        /// Seed the reel jitter for a reproducible session
        #[arg(long)]
        seed: Option<String>,
        /// Write the session's rounds to this CSV file on exit
        #[arg(long)]
        history: Option<PathBuf>,
    },
    /// Play many rounds without locks and report the return
    Simulate {
        #[arg(long, default_value_t = 10_000)]
        rounds: u64,
        #[arg(long, default_value = "cosmoslot")]
        seed: String,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(balance) = cli.balance {
        config.starting_balance = balance;
    }
    if let Some(stake) = cli.stake {
        config.starting_stake = stake;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Play {
            instant,
            seed,
            history,
        } => {
            let opts = play::PlayOptions { instant, history };
            match seed {
                Some(seed) => {
                    let machine = SlotMachine::with_jitter(config, SeededJitter::new(seed))?;
                    play::run(machine, opts).await?;
                }
                None => play::run(SlotMachine::new(config)?, opts).await?,
            }
        }
        Commands::Simulate { rounds, seed } => {
            let machine = SlotMachine::with_jitter(config, SeededJitter::new(seed))?;
            let report = simulate::run(machine, rounds)?;
            println!("{report}");
        }
    }

    Ok(())
}
