//! Host placement policies
//!
//! The round engine takes an explicit piece index. Hosts that only know a
//! clicked cell use [`first_fit`] to pick the piece, and automated players
//! use [`best_move`] / [`autoplay`].

use block_puzzle_core::{count_placements, PlaceError, PlaceOutcome, RoundEngine};

/// A concrete placement: pending index plus anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub index: usize,
    pub x: i32,
    pub y: i32,
}

/// First unused pending piece (in index order) that fits with its top-left at (x, y).
///
/// This is the tie-break used by click-to-place hosts when several pieces fit
/// the same cell.
pub fn first_fit(round: &RoundEngine, x: i32, y: i32) -> Option<usize> {
    (0..round.pending().len()).find(|&i| round.can_place_index(i, x, y))
}

/// Place whichever piece [`first_fit`] picks for (x, y).
///
/// Returns the chosen index with the outcome. Fails with `InvalidState` when
/// the round is not playable and `InvalidPlacement` when no piece fits.
pub fn place_at_cell(
    round: &mut RoundEngine,
    x: i32,
    y: i32,
) -> Result<(usize, PlaceOutcome), PlaceError> {
    if !round.phase().playable() {
        return Err(PlaceError::InvalidState);
    }
    let index = first_fit(round, x, y).ok_or(PlaceError::InvalidPlacement)?;
    let outcome = round.attempt_place(index, x, y)?;
    Ok((index, outcome))
}

/// How a candidate move scores for the greedy player
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct MoveRank {
    lines: usize,
    /// Anchors left for the other unused pieces after the move.
    mobility: usize,
    /// Filled cells left on the board, fewer is better.
    crowding: std::cmp::Reverse<usize>,
}

/// Greedy choice: most lines cleared, then most room left for the other
/// pending pieces, then emptiest board. Ties go to the earliest candidate in
/// index, row, column order.
pub fn best_move(round: &RoundEngine) -> Option<Move> {
    if !round.phase().playable() {
        return None;
    }

    let mut best: Option<(MoveRank, Move)> = None;
    for (index, piece) in round.pending().iter().enumerate() {
        if piece.used {
            continue;
        }
        for (x, y) in block_puzzle_core::placements(round.board(), piece.shape) {
            let mut board = round.board().clone();
            if board.place(piece.shape, x, y, piece.tag).is_err() {
                continue;
            }
            let lines = board.clear_full_lines();
            let mobility = round
                .pending()
                .iter()
                .enumerate()
                .filter(|&(i, p)| i != index && !p.used)
                .map(|(_, p)| count_placements(&board, p.shape))
                .sum();
            let rank = MoveRank {
                lines,
                mobility,
                crowding: std::cmp::Reverse(board.filled_count()),
            };
            let candidate = Move { index, x, y };
            match &best {
                Some((r, _)) if *r >= rank => {}
                _ => best = Some((rank, candidate)),
            }
        }
    }
    best.map(|(_, m)| m)
}

/// Summary of an automated run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutoplayReport {
    pub turns: u32,
    pub score: u32,
    pub lines: u32,
    pub game_over: bool,
}

/// Play greedy moves until the round ends or `max_turns` placements were made.
///
/// The round must already be reset.
pub fn autoplay(round: &mut RoundEngine, max_turns: u32) -> AutoplayReport {
    let mut report = AutoplayReport::default();
    while report.turns < max_turns {
        let Some(mv) = best_move(round) else {
            break;
        };
        match round.attempt_place(mv.index, mv.x, mv.y) {
            Ok(outcome) => {
                report.turns += 1;
                report.lines += outcome.lines_cleared;
            }
            Err(_) => break,
        }
    }
    report.score = round.score();
    report.game_over = round.is_game_over();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use block_puzzle_core::{find_shape, ScriptedSampler};
    use block_puzzle_types::RoundConfig;

    fn round_of(script: &[&str]) -> RoundEngine {
        let script = script
            .iter()
            .map(|name| (find_shape(name).unwrap(), 1))
            .collect();
        let sampler = ScriptedSampler::new(script).unwrap();
        let mut round = RoundEngine::new(RoundConfig::default(), sampler, 0).unwrap();
        round.reset();
        round
    }

    #[test]
    fn test_first_fit_prefers_lowest_index() {
        let round = round_of(&["bar4h", "single", "square"]);
        assert_eq!(first_fit(&round, 0, 0), Some(0));
        // bar4h does not fit at x=7, the single does
        assert_eq!(first_fit(&round, 7, 0), Some(1));
    }

    #[test]
    fn test_place_at_cell_skips_used_pieces() {
        let mut round = round_of(&["single", "single", "square"]);
        let (index, _) = place_at_cell(&mut round, 0, 0).unwrap();
        assert_eq!(index, 0);
        let (index, _) = place_at_cell(&mut round, 1, 0).unwrap();
        assert_eq!(index, 1);
        assert_eq!(place_at_cell(&mut round, 9, 9), Err(PlaceError::InvalidPlacement));
    }

    #[test]
    fn test_best_move_takes_the_clear() {
        let mut round = round_of(&["single", "bar2h", "square"]);
        for x in 0..9 {
            round.board_mut().set(x, 0, 3);
        }
        let mv = best_move(&round).unwrap();
        assert_eq!(mv, Move { index: 0, x: 9, y: 0 });
    }

    #[test]
    fn test_best_move_none_when_idle() {
        let sampler = ScriptedSampler::repeat(find_shape("single").unwrap());
        let round = RoundEngine::new(RoundConfig::default(), sampler, 0).unwrap();
        assert_eq!(best_move(&round), None);
    }
}
