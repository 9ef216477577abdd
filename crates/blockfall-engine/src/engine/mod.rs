//! Game state engine built on the core data structures.
//!
//! - [`Board`] - The grid, the falling piece, the next piece and the score
//! - [`BoardConfig`] - Board dimensions
//! - [`PieceGenerator`] - Uniform random piece source
//! - [`PieceSeed`] - Seed for deterministic piece generation
//! - [`GameStats`] - Score and line clear statistics
//! - [`BoardSnapshot`] - Serializable view of a board
//!
//! # Game Flow
//!
//! 1. Create a [`Board`]; the first two pieces are drawn immediately
//! 2. Forward player input to the command methods (`move_left`, `rotate_cw`, ...)
//! 3. Call [`Board::advance`] once per tick; a piece that cannot fall is locked
//! 4. Full rows are cleared and the next piece spawns at the top
//! 5. Stop once [`Board::is_game_over`] reports that a piece could not spawn
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Board, Tick};
//!
//! let mut board = Board::new();
//! board.move_right();
//!
//! while !board.is_game_over() {
//!     match board.advance() {
//!         Tick::Fell => {}
//!         Tick::Locked(outcome) => assert!(outcome.cleared_lines <= 4),
//!         Tick::Halted => unreachable!(),
//!     }
//! }
//! println!("Game over! Score: {}", board.score());
//! ```

pub use self::{board::*, game_stats::*, piece_generator::*, snapshot::*};

mod board;
mod game_stats;
mod piece_generator;
mod snapshot;
