//! Block puzzle runner (default binary).
//!
//! `serve` hosts a round behind the TCP control adapter; `simulate` plays
//! rounds headless with the greedy auto-player.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::prelude::*;

use block_puzzle::adapter::{Adapter, BoardDims, RoundHost, ServerConfig};
use block_puzzle::core::{CatalogSampler, HighScoreStore, RoundEngine};
use block_puzzle::engine::autoplay;
use block_puzzle::highscore::{JsonFileStore, DEFAULT_HIGHSCORE_FILE};
use block_puzzle::types::{RoundConfig, DEFAULT_COLS, DEFAULT_ROWS};

#[derive(Debug, Subcommand)]
enum Commands {
    /// Host a round for external controllers
    Serve {
        #[arg(long, default_value_t = DEFAULT_ROWS, help = "Board rows")]
        rows: u8,

        #[arg(long, default_value_t = DEFAULT_COLS, help = "Board columns")]
        cols: u8,

        #[arg(long, help = "Piece sampler seed (defaults to the clock)")]
        seed: Option<u32>,

        #[arg(long, default_value = DEFAULT_HIGHSCORE_FILE, help = "Path to the high score file")]
        highscore_file: String,

        #[arg(long, help = "Bind address (overrides BLOCK_PUZZLE_AI_HOST)")]
        host: Option<String>,

        #[arg(long, help = "Port (overrides BLOCK_PUZZLE_AI_PORT)")]
        port: Option<u16>,
    },
    /// Play rounds with the greedy auto-player
    Simulate {
        #[arg(long, default_value = "10", help = "Number of rounds to play")]
        games: u32,

        #[arg(long, help = "Seed of the first round (defaults to the clock)")]
        seed: Option<u32>,

        #[arg(long, default_value_t = DEFAULT_ROWS, help = "Board rows")]
        rows: u8,

        #[arg(long, default_value_t = DEFAULT_COLS, help = "Board columns")]
        cols: u8,

        #[arg(long, default_value = "10000", help = "Placement cap per round")]
        max_turns: u32,
    },
}

#[derive(Debug, Parser)]
#[command(name = "block-puzzle", version, about = "Block puzzle grid simulation")]
struct Cli {
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity level (-v = DEBUG, -vv = TRACE)")]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();

    match cli.command {
        Commands::Serve {
            rows,
            cols,
            seed,
            highscore_file,
            host,
            port,
        } => serve(rows, cols, seed.unwrap_or_else(clock_seed), highscore_file, host, port),
        Commands::Simulate {
            games,
            seed,
            rows,
            cols,
            max_turns,
        } => simulate(games, seed.unwrap_or_else(clock_seed), rows, cols, max_turns),
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn round_config(rows: u8, cols: u8) -> RoundConfig {
    RoundConfig {
        rows,
        cols,
        ..RoundConfig::default()
    }
}

fn serve(
    rows: u8,
    cols: u8,
    seed: u32,
    highscore_file: String,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let store = JsonFileStore::new(highscore_file);
    let high_score = store.load();
    let round = RoundEngine::new(round_config(rows, cols), CatalogSampler::new(seed), high_score)
        .context("invalid round configuration")?;
    info!(seed, high_score, path = %store.path().display(), "round ready");

    let mut config = ServerConfig::from_env();
    config.board = BoardDims {
        rows: usize::from(rows),
        cols: usize::from(cols),
    };
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    let Some(mut adapter) = Adapter::start(config)? else {
        bail!("control adapter disabled via BLOCK_PUZZLE_AI_DISABLED");
    };

    let mut host = RoundHost::new(round, store);
    while let Some(inbound) = adapter.recv_blocking() {
        for msg in host.handle(inbound) {
            adapter.send(msg);
        }
    }
    info!(score = host.round().score(), "adapter closed");
    Ok(())
}

fn simulate(games: u32, seed: u32, rows: u8, cols: u8, max_turns: u32) -> Result<()> {
    let config = round_config(rows, cols);
    let mut high_score = 0u32;
    let mut total_score = 0u64;
    let mut total_lines = 0u64;

    for game in 0..games {
        let game_seed = seed.wrapping_add(game);
        let mut round = RoundEngine::new(config, CatalogSampler::new(game_seed), high_score)
            .context("invalid round configuration")?;
        round.reset();
        let report = autoplay(&mut round, max_turns);
        high_score = round.high_score();
        total_score += u64::from(report.score);
        total_lines += u64::from(report.lines);
        info!(
            game,
            seed = game_seed,
            turns = report.turns,
            score = report.score,
            lines = report.lines,
            game_over = report.game_over,
            "round finished"
        );
    }

    if games > 0 {
        info!(
            games,
            mean_score = total_score / u64::from(games),
            total_lines,
            best = high_score,
            "simulation complete"
        );
    }
    Ok(())
}
