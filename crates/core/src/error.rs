//! Error types for round and board operations.
//!
//! Every error here is local and recoverable: the operation that returned it
//! left all state untouched.

use std::fmt;

/// Rejected placement attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    /// Piece index out of range or already used
    InvalidIndex,
    /// Shape leaves the board or overlaps occupied cells
    InvalidPlacement,
    /// The round is not accepting placements (idle or game over)
    InvalidState,
}

impl PlaceError {
    /// Stable code used on the wire
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::InvalidIndex => "invalid_index",
            PlaceError::InvalidPlacement => "invalid_placement",
            PlaceError::InvalidState => "invalid_state",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlaceError::InvalidIndex => "piece index is out of range or already used",
            PlaceError::InvalidPlacement => "piece does not fit at the requested anchor",
            PlaceError::InvalidState => "round is not accepting placements",
        }
    }
}

impl fmt::Display for PlaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for PlaceError {}

/// Rejected round configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ZeroDimension { rows: u8, cols: u8 },
    EmptyPendingSet,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroDimension { rows, cols } => {
                write!(f, "board dimensions must be non-zero (got {rows}x{cols})")
            }
            ConfigError::EmptyPendingSet => write!(f, "pending set size must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}
