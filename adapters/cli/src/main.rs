#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives a headless Chroma Strike session.

mod high_score;
mod runner;

use std::{path::PathBuf, time::Duration};

use anyhow::ensure;
use clap::Parser;

use chroma_strike_core::WELCOME_BANNER;
use high_score::HighScoreVault;

/// Arguments accepted by the Chroma Strike headless driver.
#[derive(Debug, Parser)]
#[command(name = "chroma-strike", about = "Headless Chroma Strike session driver")]
struct Args {
    /// Textual seed hashed into the deterministic RNG streams.
    #[arg(long, default_value = "chroma")]
    seed: String,

    /// Number of frames to simulate before stopping.
    #[arg(long, default_value_t = 1200)]
    frames: u32,

    /// Simulated milliseconds per frame.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Path of the persisted high score slot.
    #[arg(long, default_value = "chroma-strike-high-score.txt")]
    high_score_path: PathBuf,
}

/// Entry point for the Chroma Strike command-line interface.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    ensure!(args.frames > 0, "at least one frame must be simulated");
    ensure!(args.frame_ms > 0, "frame duration must be positive");

    println!("{WELCOME_BANNER}");

    let vault = HighScoreVault::new(args.high_score_path.clone());
    let stored = match vault.load() {
        Ok(stored) => stored,
        Err(error) => {
            eprintln!("high score slot unreadable ({error}); starting from zero");
            0
        }
    };

    let report = runner::run(
        &args.seed,
        args.frames,
        Duration::from_millis(args.frame_ms),
        stored,
    );

    if report.high_score > stored {
        if let Err(error) = vault.save(report.high_score) {
            eprintln!("failed to persist the high score ({error})");
        }
    }

    println!(
        "session {:?} after {} frames",
        report.final_state, report.frames
    );
    println!(
        "score {} | high score {} | peak combo x{}",
        report.score, report.high_score, report.combo_peak
    );
    println!(
        "enemies spawned {} | killed {} | tokens collected {} | hits taken {}",
        report.enemies_spawned, report.enemies_killed, report.tokens_collected, report.hits_taken
    );
    if report.record_beaten {
        println!("new high score!");
    }

    Ok(())
}
