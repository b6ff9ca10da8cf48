use std::path::PathBuf;
use std::time::Duration;

use anyhow::bail;
use cosmoslot_core::{
    Jitter, LockButton, Notice, ReelView, SlotMachine, ViewChange, ViewState, REEL_COUNT,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::history::History;

pub struct PlayOptions {
    pub instant: bool,
    pub history: Option<PathBuf>,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Spin,
    Bet,
    Lock(usize),
    Show,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let cmd = match words.next() {
            Some("spin" | "s") | None => Command::Spin,
            Some("bet" | "b") => Command::Bet,
            Some("lock" | "l") => match words.next().map(str::parse::<usize>) {
                Some(Ok(reel)) if reel < REEL_COUNT => Command::Lock(reel),
                _ => bail!("usage: lock <0-{}>", REEL_COUNT - 1),
            },
            Some("show") => Command::Show,
            Some("help" | "?") => Command::Help,
            Some("quit" | "q" | "exit") => Command::Quit,
            Some(other) => bail!("unknown command {other:?}, try help"),
        };
        Ok(cmd)
    }
}

const HELP: &str = "commands: spin (or enter), bet, lock <reel>, show, quit";

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

fn lock_label(button: LockButton) -> &'static str {
    match button {
        LockButton::Locked => "locked",
        LockButton::Unlocked => "unlocked",
        LockButton::Disabled => "disabled",
    }
}

fn reel_label(view: &ReelView) -> String {
    match (view.animation_ms, view.symbol) {
        (Some(ms), _) => format!("spinning ({ms}ms)"),
        (None, Some(symbol)) => symbol.to_string(),
        (None, None) => "-".to_string(),
    }
}

fn print_view(view: &ViewState) {
    println!("balance {}  stake {}", view.balance, view.stake);
    for reel in 0..REEL_COUNT {
        println!(
            "  reel {reel}: {:<16} lock {}",
            reel_label(&view.reels[reel]),
            lock_label(view.locks[reel])
        );
    }
}

fn print_change(change: ViewChange) {
    match change {
        ViewChange::Balance(balance) => println!("balance {balance}"),
        ViewChange::Stake(stake) => println!("stake {stake}"),
        ViewChange::StakeWarning(true) => println!("balance no longer covers the stake"),
        ViewChange::StakeWarning(false) => {}
        ViewChange::Controls(enabled) => {
            println!("{}", if enabled { "ready" } else { "spinning..." })
        }
        ViewChange::Lock { reel, button } => println!("lock {reel}: {}", lock_label(button)),
        ViewChange::Reel { reel, view } => println!("reel {reel}: {}", reel_label(&view)),
        ViewChange::Banner(Some(banner)) => println!("*** YOU WON! {} ***", banner.symbol),
        ViewChange::Banner(None) => {}
    }
}

fn record(notices: Vec<Notice>, history: &mut History) {
    for notice in notices {
        if let Notice::RoundSettled(outcome) = notice {
            history.record(outcome);
        }
    }
}

fn apply<J: Jitter>(machine: &mut SlotMachine<J>, command: Command) {
    let result = match command {
        Command::Spin => machine.spin().map(|_| ()),
        Command::Bet => machine.raise_stake().map(|_| ()),
        Command::Lock(reel) => machine.toggle_lock(reel).map(|_| ()),
        Command::Show => {
            print_view(&machine.view());
            Ok(())
        }
        Command::Help => {
            println!("{HELP}");
            Ok(())
        }
        Command::Quit => Ok(()),
    };
    // Rejected input is a no-op, same as a disabled button
    if let Err(err) = result {
        debug!(%err, "input ignored");
    }
}

fn sync(shown: &mut ViewState, next: ViewState) {
    for change in shown.diff(&next) {
        print_change(change);
    }
    *shown = next;
}

/// Feeds `input` to the machine until it ends or asks to quit, then lets any
/// round still in flight run to completion.
async fn session<J, R>(
    machine: &mut SlotMachine<J>,
    instant: bool,
    input: R,
) -> anyhow::Result<History>
where
    J: Jitter,
    R: AsyncBufRead + Unpin,
{
    let start = Instant::now();
    let mut history = History::default();
    let mut lines = input.lines();

    println!("{HELP}");
    let mut shown = machine.view();
    print_view(&shown);

    loop {
        let deadline = machine
            .next_deadline()
            .filter(|_| !instant)
            .map(|ms| start + Duration::from_millis(ms));

        tokio::select! {
            _ = sleep_until(deadline.unwrap_or(start)), if deadline.is_some() => {
                record(machine.advance_to(elapsed_ms(start))?, &mut history);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !instant {
                    record(machine.advance_to(elapsed_ms(start))?, &mut history);
                }
                match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => apply(machine, command),
                    Err(err) => println!("{err}"),
                }
                if instant {
                    record(machine.run_until_idle()?, &mut history);
                }
            }
        }

        sync(&mut shown, machine.view());
    }

    // the stake is already taken; scheduled callbacks are never dropped
    while let Some(ms) = machine.next_deadline() {
        if !instant {
            sleep_until(start + Duration::from_millis(ms)).await;
        }
        record(machine.advance_to(ms)?, &mut history);
        sync(&mut shown, machine.view());
    }
    Ok(history)
}

pub async fn run<J: Jitter>(mut machine: SlotMachine<J>, opts: PlayOptions) -> anyhow::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let history = session(&mut machine, opts.instant, stdin).await?;

    info!(
        rounds = machine.rounds_started(),
        balance = machine.state().balance,
        "session over"
    );
    if let Some(path) = opts.history {
        history.write_csv(&path)?;
        println!("wrote {} rounds to {}", history.len(), path.display());
    }
    Ok(())
}
