//! Block puzzle (workspace facade crate).
//!
//! Re-exports the workspace crates as `block_puzzle::{core, engine, adapter, types}`
//! and adds the file-backed high score store used by the binary.

pub mod highscore;

pub use block_puzzle_adapter as adapter;
pub use block_puzzle_core as core;
pub use block_puzzle_engine as engine;
pub use block_puzzle_types as types;

pub use highscore::JsonFileStore;
