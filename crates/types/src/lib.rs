//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, host policies, AI protocol).
//!
//! # Board Dimensions
//!
//! The default playfield is a 10x10 grid:
//!
//! - **Columns**: 10 (x, indexed 0-9, left to right)
//! - **Rows**: 10 (y, indexed 0-9, top to bottom)
//! - **Anchor**: pieces are placed by their top-left cell
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `SCORE_PER_BLOCK` | 10 | Points per cell placed |
//! | `LINE_CLEAR_BONUS` | 50 | Points per row or column cleared |
//! | `PENDING_SET_SIZE` | 3 | Pieces offered at once |
//! | `TAG_COUNT` | 5 | Distinct piece colours |
//!
//! # Examples
//!
//! ```
//! use block_puzzle_types::{RoundConfig, RoundPhase, DEFAULT_COLS, DEFAULT_ROWS};
//!
//! let config = RoundConfig::default();
//! assert_eq!(config.rows, DEFAULT_ROWS);
//! assert_eq!(config.cols, DEFAULT_COLS);
//! assert_eq!(config.pending_set_size, 3);
//!
//! assert_eq!(RoundPhase::from_str("gameOver"), Some(RoundPhase::GameOver));
//! assert_eq!(RoundPhase::InProgress.as_str(), "inProgress");
//! ```

/// Default board height in cells (10 rows)
pub const DEFAULT_ROWS: u8 = 10;

/// Default board width in cells (10 columns)
pub const DEFAULT_COLS: u8 = 10;

/// Points awarded for every cell of a placed piece
pub const SCORE_PER_BLOCK: u32 = 10;

/// Points awarded for every cleared row or column
pub const LINE_CLEAR_BONUS: u32 = 50;

/// Number of pieces offered together
pub const PENDING_SET_SIZE: u8 = 3;

/// Number of distinct colour tags handed out by the default sampler (1..=TAG_COUNT)
pub const TAG_COUNT: u8 = 5;

/// Largest width or height of any piece shape
pub const MAX_SHAPE_DIM: usize = 4;

/// Largest number of occupied cells in any piece shape
pub const MAX_SHAPE_CELLS: usize = MAX_SHAPE_DIM * MAX_SHAPE_DIM;

/// A cell on the game board
///
/// - `0`: Empty cell
/// - `1..`: Opaque colour/identity tag of the piece that filled it
///
/// Tags carry no meaning for placement or clearing; they exist for presentation.
pub type Tag = u8;

/// The tag value of an empty cell
pub const EMPTY_TAG: Tag = 0;

/// Round configuration supplied by the host at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoundConfig {
    pub rows: u8,
    pub cols: u8,
    pub per_block_score: u32,
    pub line_clear_bonus: u32,
    pub pending_set_size: u8,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            per_block_score: SCORE_PER_BLOCK,
            line_clear_bonus: LINE_CLEAR_BONUS,
            pending_set_size: PENDING_SET_SIZE,
        }
    }
}

/// Lifecycle of a round
///
/// - **Idle**: Constructed, no pieces offered yet
/// - **InProgress**: Pieces offered, placements accepted
/// - **GameOver**: No pending piece fits anywhere; only `reset` leaves this state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundPhase {
    Idle,
    InProgress,
    GameOver,
}

impl RoundPhase {
    /// Parse phase from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "idle" => Some(RoundPhase::Idle),
            "inprogress" => Some(RoundPhase::InProgress),
            "gameover" => Some(RoundPhase::GameOver),
            _ => None,
        }
    }

    /// Convert to camelCase string for the AI protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundPhase::Idle => "idle",
            RoundPhase::InProgress => "inProgress",
            RoundPhase::GameOver => "gameOver",
        }
    }

    /// Whether placements are currently accepted
    pub fn playable(&self) -> bool {
        matches!(self, RoundPhase::InProgress)
    }
}

/// Core-side event recorded by the round engine.
///
/// Hosts drain these to drive effects (sound, particles) and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEvent {
    /// Board, score and pending set were reinitialised
    Reset,
    /// A fresh pending set was offered
    SetSpawned { set_id: u32 },
    /// A piece was written to the board
    Placed {
        index: u8,
        x: i32,
        y: i32,
        tag: Tag,
        cells: u32,
    },
    /// Rows and columns cleared by the last placement
    LinesCleared { lines: u32, bonus: u32 },
    /// Score surpassed the previous best
    NewHighScore { score: u32 },
    /// No pending piece can be placed anywhere
    GameOver { score: u32 },
}

impl RoundEvent {
    /// Short name used in logs and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundEvent::Reset => "reset",
            RoundEvent::SetSpawned { .. } => "setSpawned",
            RoundEvent::Placed { .. } => "placed",
            RoundEvent::LinesCleared { .. } => "linesCleared",
            RoundEvent::NewHighScore { .. } => "newHighScore",
            RoundEvent::GameOver { .. } => "gameOver",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_classic_rules() {
        let config = RoundConfig::default();
        assert_eq!(config.rows, 10);
        assert_eq!(config.cols, 10);
        assert_eq!(config.per_block_score, 10);
        assert_eq!(config.line_clear_bonus, 50);
        assert_eq!(config.pending_set_size, 3);
    }

    #[test]
    fn phase_string_roundtrip() {
        for phase in [RoundPhase::Idle, RoundPhase::InProgress, RoundPhase::GameOver] {
            assert_eq!(RoundPhase::from_str(phase.as_str()), Some(phase));
        }
        assert_eq!(RoundPhase::from_str("paused"), None);
        assert!(RoundPhase::InProgress.playable());
        assert!(!RoundPhase::GameOver.playable());
    }

    #[test]
    fn shape_limits_are_consistent() {
        assert_eq!(MAX_SHAPE_CELLS, 16);
        assert_eq!(EMPTY_TAG, 0);
        assert!(TAG_COUNT > 0);
    }
}
