//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules of the game with no threads, timers or I/O:
//!
//! - [`piece`]: the seven tetrominoes and their pivot-based transforms
//! - [`board`]: the landed-cell grid with per-row open counts and row compaction
//! - [`rng`]: seeded 7-bag piece supply
//! - [`scoring`]: line-clear points, level formula and fall speed-up
//! - [`game`]: the match state machine driven by commands and ticks
//! - [`snapshot`]: copy-out view for presentation layers
//!
//! # Example
//!
//! ```
//! use blocktris_core::{Game, ManualTimer};
//! use blocktris_types::Command;
//!
//! let timer = ManualTimer::default();
//! let mut game = Game::new(12345);
//!
//! game.apply(Command::MoveLeft, &timer);
//! game.apply(Command::RotateRight, &timer);
//! game.apply(Command::HardDrop, &timer);
//!
//! // The hard-dropped piece landed and the next one took its place.
//! assert!(!game.hard_drop_armed());
//! game.tick(&timer);
//! assert!(game.hard_drop_armed());
//! ```

pub mod board;
pub mod game;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blocktris_types as types;

pub use board::Board;
pub use game::{FallTimer, Game, ManualTimer};
pub use piece::{Piece, PieceCells};
pub use rng::{PieceBag, SimpleRng};
pub use scoring::{level_for_lines, line_clear_score};
pub use snapshot::{FallingSnapshot, GameSnapshot};
