//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the grid simulation engine of the block puzzle: the
//! rules for placing pieces, clearing lines and detecting game over.
//! It has **zero dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same sampler produces identical rounds (for AI training)
//! - **Testable**: Comprehensive unit tests for all game rules
//! - **Portable**: Can run in any host (terminal, GUI, headless server)
//!
//! # Module Structure
//!
//! - [`board`]: rows x cols grid with placement checks and line clearing
//! - [`shape`]: the sixteen polyomino shapes
//! - [`reach`]: exhaustive "does anything still fit" search
//! - [`round`]: pending set, scoring and the round lifecycle
//! - [`rng`]: injectable piece samplers
//! - [`scoring`]: per-cell and per-line points
//! - [`snapshot`]: owned copies of round state for hosts
//! - [`highscore`]: the host-side high score store interface
//!
//! # Game Rules
//!
//! - **Pending set**: three pieces are offered at a time; a new set arrives only
//!   once all three are placed
//! - **Line clears**: every full row and full column clears at once, then each
//!   column collapses toward the bottom
//! - **Scoring**: 10 points per placed cell, 50 per cleared line
//! - **Game over**: no unused pending piece fits anywhere
//!
//! # Example
//!
//! ```
//! use block_puzzle_core::{find_shape, RoundEngine, ScriptedSampler};
//! use block_puzzle_types::RoundConfig;
//!
//! let sampler = ScriptedSampler::repeat(find_shape("square").unwrap());
//! let mut round = RoundEngine::new(RoundConfig::default(), sampler, 0).unwrap();
//! round.reset();
//!
//! let outcome = round.attempt_place(0, 0, 0).unwrap();
//! assert_eq!(outcome.cells_placed, 4);
//! assert_eq!(round.score(), 40);
//! ```

pub mod board;
pub mod error;
pub mod highscore;
pub mod reach;
pub mod rng;
pub mod round;
pub mod scoring;
pub mod shape;
pub mod snapshot;

pub use block_puzzle_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use error::{ConfigError, PlaceError};
pub use highscore::{HighScoreStore, MemoryStore};
pub use reach::{any_move_exists, any_placement_exists, count_placements, placements};
pub use rng::{CatalogSampler, PieceSampler, ScriptedSampler, SimpleRng};
pub use round::{PendingPiece, PlaceOutcome, RoundEngine};
pub use scoring::{calculate_score, ScoreResult};
pub use shape::{catalog, find_shape, Shape, CATALOG};
pub use snapshot::{PendingSnapshot, RoundSnapshot};
