use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{Board, BoardConfig, BoardSnapshot, GameStats, PieceSeed};
use chrono::{DateTime, Utc};
use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Number of games to play
    #[arg(long, default_value_t = 100)]
    games: usize,
    /// Master seed (32 hex characters) for piece sequences and inputs; random if omitted
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Stop a game after this many ticks even if it is not over
    #[arg(long, default_value_t = 100_000)]
    max_ticks: usize,
    /// Board width in cells
    #[arg(long, default_value_t = BoardConfig::DEFAULT_WIDTH)]
    width: usize,
    /// Board height in cells
    #[arg(long, default_value_t = BoardConfig::DEFAULT_HEIGHT)]
    height: usize,
    /// Include the final board of every game in the report
    #[arg(long)]
    boards: bool,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

/// One random command issued before a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Left,
    Right,
    SoftDrop,
    Rotate,
    Wait,
}

impl Input {
    const ALL: [Self; 5] = [
        Self::Left,
        Self::Right,
        Self::SoftDrop,
        Self::Rotate,
        Self::Wait,
    ];

    fn apply(self, board: &mut Board) -> bool {
        match self {
            Input::Left => board.move_left(),
            Input::Right => board.move_right(),
            Input::SoftDrop => board.soft_drop(),
            Input::Rotate => board.rotate_cw(),
            Input::Wait => false,
        }
    }
}

impl Distribution<Input> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Input {
        Input::ALL[rng.random_range(0..Input::ALL.len())]
    }
}

#[derive(Debug, Clone, Serialize)]
struct SimulationReport {
    generated_at: DateTime<Utc>,
    seed: PieceSeed,
    config: BoardConfig,
    max_ticks: usize,
    summary: Summary,
    games: Vec<GameRecord>,
}

#[derive(Debug, Clone, Serialize)]
struct GameRecord {
    seed: PieceSeed,
    ticks: usize,
    /// Whether the game reached game over within the tick limit.
    finished: bool,
    stats: GameStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    final_board: Option<BoardSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
struct Summary {
    games: usize,
    finished_games: usize,
    total_score: usize,
    max_score: usize,
    mean_score: f64,
    mean_pieces: f64,
    line_cleared_counter: [usize; 5],
}

impl Summary {
    #[expect(clippy::cast_precision_loss)]
    fn from_records(records: &[GameRecord]) -> Self {
        let mut summary = Self {
            games: records.len(),
            ..Self::default()
        };
        let mut total_pieces = 0;
        for record in records {
            let score = record.stats.score();
            summary.total_score += score;
            summary.max_score = summary.max_score.max(score);
            if record.finished {
                summary.finished_games += 1;
            }
            total_pieces += record.stats.completed_pieces();
            for (total, count) in summary
                .line_cleared_counter
                .iter_mut()
                .zip(record.stats.line_cleared_counter())
            {
                *total += count;
            }
        }
        if !records.is_empty() {
            summary.mean_score = summary.total_score as f64 / records.len() as f64;
            summary.mean_pieces = total_pieces as f64 / records.len() as f64;
        }
        summary
    }
}

/// Plays one game: each tick applies one random input, then advances the board.
fn play_game(
    config: BoardConfig,
    seed: PieceSeed,
    input_rng: &mut Pcg32,
    max_ticks: usize,
) -> anyhow::Result<(Board, usize)> {
    let mut board = Board::with_config(config, seed)?;
    let mut ticks = 0;
    while ticks < max_ticks && !board.is_game_over() {
        let input: Input = input_rng.random();
        input.apply(&mut board);
        board.advance();
        ticks += 1;
    }
    Ok((board, ticks))
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        games,
        seed,
        max_ticks,
        width,
        height,
        boards,
        output,
    } = arg;

    let config = BoardConfig {
        width: *width,
        height: *height,
    };
    config.validate().context("Invalid board size")?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());

    eprintln!(
        "Simulating {games} games on a {width}x{height} board (seed {seed}, max {max_ticks} ticks)..."
    );

    let records = simulate(config, seed, *games, *max_ticks, *boards)?;
    let summary = Summary::from_records(&records);

    eprintln!(
        "Finished {}/{} games: mean score {:.2}, max score {}, mean pieces {:.1}",
        summary.finished_games,
        summary.games,
        summary.mean_score,
        summary.max_score,
        summary.mean_pieces,
    );

    let report = SimulationReport {
        generated_at: Utc::now(),
        seed,
        config,
        max_ticks: *max_ticks,
        summary,
        games: records,
    };
    util::write_json(&report, output.as_deref())?;

    Ok(())
}

fn simulate(
    config: BoardConfig,
    seed: PieceSeed,
    games: usize,
    max_ticks: usize,
    keep_boards: bool,
) -> anyhow::Result<Vec<GameRecord>> {
    let mut master_rng = Pcg32::from_seed(seed.to_bytes());
    let progress_interval = (games / 10).max(1);
    let mut records = Vec::with_capacity(games);

    for game in 0..games {
        let game_seed: PieceSeed = master_rng.random();
        let mut input_rng = Pcg32::seed_from_u64(master_rng.random());
        let (board, ticks) = play_game(config, game_seed, &mut input_rng, max_ticks)?;

        records.push(GameRecord {
            seed: game_seed,
            ticks,
            finished: board.is_game_over(),
            stats: board.stats().clone(),
            final_board: keep_boards.then(|| board.snapshot()),
        });

        if (game + 1) % progress_interval == 0 {
            eprintln!(
                "[{}/{games}] score {} after {ticks} ticks",
                game + 1,
                board.score()
            );
        }
    }
    Ok(records)
}
