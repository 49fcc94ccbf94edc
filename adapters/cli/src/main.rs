#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs maze-race rounds in a terminal.
//!
//! The adapter owns everything the core does not: argument parsing,
//! timing between ticks, ANSI drawing, Ctrl-C cancellation, logging, and
//! leaderboard persistence.

mod leaderboard;
mod screen;

use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::Parser;
use maze_race_core::{RoundConfig, DEFAULT_BASE_STRENGTH, DEFAULT_MONSTER_STRENGTH};
use maze_race_system_bootstrap::generate_round;
use rand::Rng;
use tracing::{debug, info};

const DEFAULT_GAME_SPEED: u32 = 50;
const MAX_GAME_DELAY_MS: f64 = 200.0;
const STATUS_LINE_HISTORY: usize = 5;

#[derive(Debug, Parser)]
#[command(
    name = "maze-race",
    about = "Four bots race through a haunted maze, teleporters and monsters included."
)]
struct Args {
    /// Maze rows; must be odd.
    #[arg(long, default_value_t = 23)]
    rows: u32,

    /// Maze columns; must be odd.
    #[arg(long, default_value_t = 41)]
    cols: u32,

    /// Teleporter pairs; derived from the maze area when omitted.
    #[arg(short = 't', long)]
    teleporters: Option<u32>,

    /// Monsters; derived from the maze area when omitted.
    #[arg(short = 'm', long)]
    monsters: Option<u32>,

    /// Maximum monster strength.
    #[arg(short = 's', long, default_value_t = DEFAULT_MONSTER_STRENGTH)]
    monster_strength: u32,

    /// Strength every agent starts with.
    #[arg(long, default_value_t = DEFAULT_BASE_STRENGTH)]
    base_strength: u32,

    /// Game speed from 1 (slowest) to 100 (fastest).
    #[arg(short = 'g', long, default_value_t = DEFAULT_GAME_SPEED)]
    speed: u32,

    /// Rounds to play back to back.
    #[arg(short = 'r', long, default_value_t = 1)]
    rounds: u32,

    /// Seed for reproducible rounds; drawn from entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Leaderboard file path.
    #[arg(long, default_value = "maze_race_scores.toml")]
    scores: PathBuf,

    /// Skip per-tick drawing and only print final results.
    #[arg(long)]
    quiet: bool,
}

/// Entry point for the maze-race command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let delay = step_delay(args.speed);

    let abort_flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&abort_flag);
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst))
        .context("installing the Ctrl-C handler")?;

    let base_seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());

    for round_index in 0..args.rounds {
        let config = RoundConfig {
            rows: args.rows,
            cols: args.cols,
            teleporters: args.teleporters,
            monsters: args.monsters,
            monster_max_strength: args.monster_strength,
            base_strength: args.base_strength,
            seed: base_seed.wrapping_add(u64::from(round_index)),
        };

        info!(round = round_index + 1, seed = config.seed, "starting round");
        let aborted = run_round(config, delay, &args, &abort_flag)
            .with_context(|| format!("round {}", round_index + 1))?;
        if aborted {
            info!("cancellation requested, stopping");
            break;
        }
    }

    Ok(())
}

/// Drives one round to completion or cancellation. Returns true when the
/// round was aborted.
fn run_round(
    config: RoundConfig,
    delay: Duration,
    args: &Args,
    abort_flag: &AtomicBool,
) -> Result<bool> {
    let mut round = generate_round(config).context("generating the maze")?;
    let mut status_lines: Vec<String> = Vec::new();

    loop {
        if abort_flag.load(Ordering::SeqCst) {
            round.abort();
        }

        let tick = round.step();
        if tick.aborted {
            return Ok(true);
        }

        for event in &tick.events {
            debug!(?event, "tick event");
            if let Some(line) = screen::describe_event(event) {
                status_lines.push(line);
                if status_lines.len() > STATUS_LINE_HISTORY {
                    let _ = status_lines.remove(0);
                }
            }
        }

        if !args.quiet {
            screen::draw(round.state(), &status_lines);
        }

        if tick.finished {
            break;
        }
        thread::sleep(delay);
    }

    let result = round.result();
    screen::print_results(&result);

    if let Some(record) = round.winning_record(unix_timestamp()) {
        let mut board = leaderboard::load(&args.scores)
            .with_context(|| format!("reading scores from {}", args.scores.display()))?;
        board.record(record);
        board
            .save(&args.scores)
            .with_context(|| format!("writing scores to {}", args.scores.display()))?;
        screen::print_leaderboard(&board);
    }

    Ok(false)
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

/// Maps the 1..=100 speed knob logarithmically onto a per-tick delay, so
/// the perceived speed-up stays even across the range.
fn step_delay(speed: u32) -> Duration {
    let speed = if (1..=100).contains(&speed) {
        speed
    } else {
        DEFAULT_GAME_SPEED
    };
    let normalized = (f64::from(speed)).ln() / 100f64.ln();
    Duration::from_millis(((1.0 - normalized) * MAX_GAME_DELAY_MS).round() as u64)
}
