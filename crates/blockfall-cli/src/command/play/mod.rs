use std::time::Duration;

use anyhow::{Context as _, ensure};
use blockfall_engine::{Board, BoardConfig, PieceSeed};
use rand::Rng as _;

use crate::{command::play::app::PlayApp, tui::Tui};

mod app;

/// Gravity speed of the classic game loop.
pub(crate) const DEFAULT_TICK_RATE: f64 = 5.0;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the piece sequence (32 hex characters); random if omitted
    #[arg(long)]
    pub(super) seed: Option<PieceSeed>,
    /// Gravity steps per second
    #[arg(long, default_value_t = DEFAULT_TICK_RATE)]
    pub(super) tick_rate: f64,
    /// Board width in cells
    #[arg(long, default_value_t = BoardConfig::DEFAULT_WIDTH)]
    pub(super) width: usize,
    /// Board height in cells
    #[arg(long, default_value_t = BoardConfig::DEFAULT_HEIGHT)]
    pub(super) height: usize,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            seed: None,
            tick_rate: DEFAULT_TICK_RATE,
            width: BoardConfig::DEFAULT_WIDTH,
            height: BoardConfig::DEFAULT_HEIGHT,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        seed,
        tick_rate,
        width,
        height,
    } = arg;

    let tick_interval = tick_interval(*tick_rate)?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let config = BoardConfig {
        width: *width,
        height: *height,
    };
    let board = Board::with_config(config, seed).context("Invalid board size")?;

    let mut app = PlayApp::new(board, tick_interval);
    Tui::new().run(&mut app)?;

    let board = app.board();
    eprintln!(
        "Score: {} ({} pieces, seed {seed}){}",
        board.score(),
        board.stats().completed_pieces(),
        if board.is_game_over() { "" } else { ", quit before game over" }
    );
    Ok(())
}

/// Converts a rate in ticks per second into the delay between two ticks.
fn tick_interval(rate: f64) -> anyhow::Result<Duration> {
    ensure!(
        rate.is_finite() && rate > 0.0,
        "tick rate must be a positive number, got {rate}"
    );
    let interval = Duration::try_from_secs_f64(rate.recip())
        .with_context(|| format!("tick rate {rate} is too low"))?;
    ensure!(!interval.is_zero(), "tick rate {rate} is too high");
    Ok(interval)
}
