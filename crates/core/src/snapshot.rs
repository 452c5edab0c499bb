//! Snapshot module - owned copies of round state for observers

use crate::round::PendingPiece;
use crate::types::{RoundPhase, Tag};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingSnapshot {
    pub shape: &'static str,
    pub cells: Vec<Vec<u8>>,
    pub tag: Tag,
    pub used: bool,
}

impl From<&PendingPiece> for PendingSnapshot {
    fn from(value: &PendingPiece) -> Self {
        Self {
            shape: value.shape.name(),
            cells: value.shape.rows().iter().map(|row| row.to_vec()).collect(),
            tag: value.tag,
            used: value.used,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoundSnapshot {
    pub rows: usize,
    pub cols: usize,
    /// Board tags, one inner vector per row (top to bottom).
    pub board: Vec<Vec<Tag>>,
    pub pending: Vec<PendingSnapshot>,
    pub score: u32,
    pub high_score: u32,
    pub phase: RoundPhase,
    pub game_over: bool,
    pub sets_spawned: u32,
    pub placements: u32,
}

impl RoundSnapshot {
    pub fn playable(&self) -> bool {
        self.phase.playable()
    }
}
