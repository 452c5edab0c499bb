//! Round module - coordinates the board, the pending set and scoring
//!
//! A round moves through `Idle -> InProgress -> GameOver`, and `reset` returns
//! it to `InProgress` from any phase. Each successful placement:
//!
//! 1. writes the piece and marks it used,
//! 2. awards `cells * per_block_score`,
//! 3. clears full lines and awards `lines * line_clear_bonus`,
//! 4. spawns a fresh pending set once every piece is used,
//! 5. re-checks whether any unused piece still fits; if not, the round ends.
//!
//! The engine performs no I/O. Hosts observe it through [`RoundEngine::take_events`].

use std::fmt;

use tracing::debug;

use crate::board::Board;
use crate::error::{ConfigError, PlaceError};
use crate::reach::any_move_exists;
use crate::rng::PieceSampler;
use crate::scoring::calculate_score;
use crate::shape::Shape;
use crate::snapshot::{PendingSnapshot, RoundSnapshot};
use crate::types::{RoundConfig, RoundEvent, RoundPhase, Tag};

/// A piece currently offered to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPiece {
    pub shape: &'static Shape,
    pub tag: Tag,
    pub used: bool,
}

/// Result of a successful placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaceOutcome {
    pub cells_placed: u32,
    pub lines_cleared: u32,
    /// Points awarded by this placement (cells plus line bonus)
    pub points: u32,
    pub new_high_score: bool,
    /// A new pending set replaced the exhausted one
    pub set_spawned: bool,
    pub game_over: bool,
}

/// Check a configuration before building a round
pub fn validate_config(config: &RoundConfig) -> Result<(), ConfigError> {
    if config.rows == 0 || config.cols == 0 {
        return Err(ConfigError::ZeroDimension {
            rows: config.rows,
            cols: config.cols,
        });
    }
    if config.pending_set_size == 0 {
        return Err(ConfigError::EmptyPendingSet);
    }
    Ok(())
}

/// Complete round state
pub struct RoundEngine {
    config: RoundConfig,
    board: Board,
    pending: Vec<PendingPiece>,
    sampler: Box<dyn PieceSampler + Send>,
    score: u32,
    high_score: u32,
    phase: RoundPhase,
    /// Pending sets spawned since the last reset.
    sets_spawned: u32,
    /// Successful placements since the last reset.
    placements: u32,
    /// Events not yet drained by the host.
    events: Vec<RoundEvent>,
}

impl fmt::Debug for RoundEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundEngine")
            .field("config", &self.config)
            .field("board", &self.board)
            .field("pending", &self.pending)
            .field("score", &self.score)
            .field("high_score", &self.high_score)
            .field("phase", &self.phase)
            .field("sets_spawned", &self.sets_spawned)
            .field("placements", &self.placements)
            .finish_non_exhaustive()
    }
}

impl RoundEngine {
    /// Create an idle round. `high_score` is the best score loaded by the host.
    pub fn new<S>(config: RoundConfig, sampler: S, high_score: u32) -> Result<Self, ConfigError>
    where
        S: PieceSampler + Send + 'static,
    {
        validate_config(&config)?;
        Ok(Self {
            config,
            board: Board::new(config.rows, config.cols),
            pending: Vec::with_capacity(config.pending_set_size as usize),
            sampler: Box::new(sampler),
            score: 0,
            high_score,
            phase: RoundPhase::Idle,
            sets_spawned: 0,
            placements: 0,
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access for scenario setup in tests and tools.
    ///
    /// Does not re-evaluate game over; call [`RoundEngine::refresh_game_over`]
    /// after editing.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn pending(&self) -> &[PendingPiece] {
        &self.pending
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == RoundPhase::GameOver
    }

    pub fn sets_spawned(&self) -> u32 {
        self.sets_spawned
    }

    pub fn placements(&self) -> u32 {
        self.placements
    }

    /// Events recorded since the last drain
    pub fn events(&self) -> &[RoundEvent] {
        &self.events
    }

    /// Drain recorded events (oldest first)
    pub fn take_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }

    /// Start a fresh round: empty board, new pending set, zero score.
    ///
    /// Allowed from any phase. The high score is kept.
    pub fn reset(&mut self) {
        self.board.clear();
        self.score = 0;
        self.sets_spawned = 0;
        self.placements = 0;
        self.phase = RoundPhase::InProgress;
        self.events.push(RoundEvent::Reset);
        debug!(rows = self.config.rows, cols = self.config.cols, "round reset");

        self.spawn_set();
        self.refresh_game_over();
    }

    /// Whether pending piece `index` could be placed at (x, y) right now
    pub fn can_place_index(&self, index: usize, x: i32, y: i32) -> bool {
        self.phase.playable()
            && self
                .pending
                .get(index)
                .map(|p| !p.used && self.board.can_place(p.shape, x, y))
                .unwrap_or(false)
    }

    /// Place pending piece `index` with its top-left cell at (x, y).
    ///
    /// On error nothing changes.
    pub fn attempt_place(&mut self, index: usize, x: i32, y: i32) -> Result<PlaceOutcome, PlaceError> {
        if !self.phase.playable() {
            return Err(PlaceError::InvalidState);
        }
        let piece = match self.pending.get(index) {
            Some(p) if !p.used => *p,
            _ => return Err(PlaceError::InvalidIndex),
        };

        let cells = self.board.place(piece.shape, x, y, piece.tag)? as u32;
        self.pending[index].used = true;
        self.placements = self.placements.wrapping_add(1);
        self.events.push(RoundEvent::Placed {
            index: index as u8,
            x,
            y,
            tag: piece.tag,
            cells,
        });

        let lines = self.board.clear_full_lines() as u32;
        let result = calculate_score(
            cells,
            lines,
            self.config.per_block_score,
            self.config.line_clear_bonus,
        );
        self.score = self.score.saturating_add(result.total);
        if lines > 0 {
            debug!(lines, bonus = result.clear_bonus, "lines cleared");
            self.events.push(RoundEvent::LinesCleared {
                lines,
                bonus: result.clear_bonus,
            });
        }

        let new_high_score = self.update_high_score();

        let set_spawned = self.pending.iter().all(|p| p.used);
        if set_spawned {
            self.spawn_set();
        }

        let game_over = self.refresh_game_over();

        Ok(PlaceOutcome {
            cells_placed: cells,
            lines_cleared: lines,
            points: result.total,
            new_high_score,
            set_spawned,
            game_over,
        })
    }

    /// Re-evaluate reachability; enters `GameOver` when no unused piece fits.
    ///
    /// Returns true if the round is over. Has no effect while idle.
    pub fn refresh_game_over(&mut self) -> bool {
        if self.phase != RoundPhase::InProgress {
            return self.is_game_over();
        }
        if any_move_exists(&self.board, &self.pending) {
            return false;
        }
        self.phase = RoundPhase::GameOver;
        self.events.push(RoundEvent::GameOver { score: self.score });
        debug!(score = self.score, placements = self.placements, "game over");
        true
    }

    /// Build an owned snapshot for hosts
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            rows: self.board.rows(),
            cols: self.board.cols(),
            board: self.board.to_rows(),
            pending: self.pending.iter().map(PendingSnapshot::from).collect(),
            score: self.score,
            high_score: self.high_score,
            phase: self.phase,
            game_over: self.is_game_over(),
            sets_spawned: self.sets_spawned,
            placements: self.placements,
        }
    }

    /// Replace the whole pending set at once
    fn spawn_set(&mut self) {
        let size = self.config.pending_set_size as usize;
        let sampler = &mut self.sampler;
        self.pending.clear();
        self.pending.extend((0..size).map(|_| {
            let (shape, tag) = sampler.sample();
            PendingPiece {
                shape,
                tag: tag.max(1),
                used: false,
            }
        }));
        self.sets_spawned = self.sets_spawned.wrapping_add(1);
        self.events.push(RoundEvent::SetSpawned {
            set_id: self.sets_spawned,
        });
        debug!(
            set_id = self.sets_spawned,
            shapes = ?self.pending.iter().map(|p| p.shape.name()).collect::<Vec<_>>(),
            "pending set spawned"
        );
    }

    fn update_high_score(&mut self) -> bool {
        if self.score <= self.high_score {
            return false;
        }
        self.high_score = self.score;
        self.events.push(RoundEvent::NewHighScore { score: self.score });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedSampler;
    use crate::shape::find_shape;

    fn engine_with(shape: &'static str) -> RoundEngine {
        let sampler = ScriptedSampler::repeat(find_shape(shape).unwrap());
        RoundEngine::new(RoundConfig::default(), sampler, 0).unwrap()
    }

    #[test]
    fn test_new_round_is_idle() {
        let mut engine = engine_with("single");
        assert_eq!(engine.phase(), RoundPhase::Idle);
        assert!(engine.pending().is_empty());
        assert_eq!(engine.attempt_place(0, 0, 0), Err(PlaceError::InvalidState));
        assert!(!engine.refresh_game_over());
    }

    #[test]
    fn test_reset_spawns_full_set() {
        let mut engine = engine_with("single");
        engine.reset();
        assert_eq!(engine.phase(), RoundPhase::InProgress);
        assert_eq!(engine.pending().len(), 3);
        assert!(engine.pending().iter().all(|p| !p.used));
        assert_eq!(
            engine.take_events(),
            vec![RoundEvent::Reset, RoundEvent::SetSpawned { set_id: 1 }]
        );
        assert!(engine.events().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let sampler = ScriptedSampler::repeat(find_shape("single").unwrap());
        let config = RoundConfig {
            pending_set_size: 0,
            ..RoundConfig::default()
        };
        assert_eq!(
            RoundEngine::new(config, sampler.clone(), 0).err(),
            Some(ConfigError::EmptyPendingSet)
        );
        let config = RoundConfig {
            rows: 0,
            ..RoundConfig::default()
        };
        assert!(matches!(
            RoundEngine::new(config, sampler, 0),
            Err(ConfigError::ZeroDimension { rows: 0, .. })
        ));
    }

    #[test]
    fn test_used_index_rejected_without_mutation() {
        let mut engine = engine_with("single");
        engine.reset();
        engine.attempt_place(0, 0, 0).unwrap();
        let before = engine.snapshot();
        assert_eq!(engine.attempt_place(0, 5, 5), Err(PlaceError::InvalidIndex));
        assert_eq!(engine.attempt_place(3, 5, 5), Err(PlaceError::InvalidIndex));
        assert_eq!(engine.snapshot(), before);
    }
}
