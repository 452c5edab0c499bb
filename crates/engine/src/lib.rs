//! Host-side placement policies for the block puzzle round engine.
//!
//! - [`place::first_fit`]: click-to-place tie-break (lowest pending index wins)
//! - [`place::best_move`]: greedy move choice for automated players
//! - [`place::autoplay`]: drive a round with greedy moves

pub mod place;

pub use block_puzzle_core as core;
pub use block_puzzle_types as types;

pub use place::{autoplay, best_move, first_fit, place_at_cell, AutoplayReport, Move};
