//! Round engine tests - scoring, pending sets, game over and high scores

use block_puzzle::core::{
    any_move_exists, find_shape, CatalogSampler, PlaceError, RoundEngine, ScriptedSampler,
};
use block_puzzle::types::{RoundConfig, RoundEvent, RoundPhase};

fn repeat_round(shape: &str, high_score: u32) -> RoundEngine {
    let sampler = ScriptedSampler::repeat(find_shape(shape).unwrap());
    let mut round = RoundEngine::new(RoundConfig::default(), sampler, high_score).unwrap();
    round.reset();
    round
}

fn scripted_round(script: &[&str]) -> RoundEngine {
    let script = script
        .iter()
        .map(|name| (find_shape(name).unwrap(), 2))
        .collect();
    let sampler = ScriptedSampler::new(script).unwrap();
    let mut round = RoundEngine::new(RoundConfig::default(), sampler, 0).unwrap();
    round.reset();
    round
}

#[test]
fn test_four_cell_piece_scores_forty() {
    let mut round = repeat_round("square", 0);
    let outcome = round.attempt_place(0, 0, 0).unwrap();
    assert_eq!(outcome.cells_placed, 4);
    assert_eq!(outcome.lines_cleared, 0);
    assert_eq!(outcome.points, 40);
    assert_eq!(round.score(), 40);
    assert!(round.pending()[0].used);
}

#[test]
fn test_cell_points_are_awarded_alongside_clears() {
    let mut round = repeat_round("square", 0);
    for x in 2..10 {
        round.board_mut().set(x, 9, 1);
    }
    let outcome = round.attempt_place(0, 0, 8).unwrap();
    assert_eq!(outcome.lines_cleared, 1);
    assert_eq!(outcome.points, 40 + 50);
    assert_eq!(round.score(), 90);
}

#[test]
fn test_row_and_column_clear_together() {
    let mut round = repeat_round("single", 0);
    for i in 1..10 {
        round.board_mut().set(i, 9, 1);
    }
    for i in 0..9 {
        round.board_mut().set(0, i, 1);
    }

    let outcome = round.attempt_place(0, 0, 9).unwrap();
    assert_eq!(outcome.lines_cleared, 2);
    assert_eq!(outcome.points, 10 + 2 * 50);
    assert_eq!(round.board().filled_count(), 0);

    let events = round.take_events();
    assert!(events.contains(&RoundEvent::LinesCleared { lines: 2, bonus: 100 }));
}

#[test]
fn test_new_set_only_after_all_used() {
    let mut round = repeat_round("single", 0);
    assert!(!round.attempt_place(0, 0, 0).unwrap().set_spawned);
    assert!(!round.attempt_place(1, 1, 0).unwrap().set_spawned);
    assert_eq!(round.attempt_place(0, 2, 0), Err(PlaceError::InvalidIndex));
    assert_eq!(round.sets_spawned(), 1);

    let outcome = round.attempt_place(2, 2, 0).unwrap();
    assert!(outcome.set_spawned);
    assert_eq!(round.sets_spawned(), 2);
    assert!(round.pending().iter().all(|p| !p.used));
}

#[test]
fn test_rejected_placement_changes_nothing() {
    let mut round = repeat_round("square", 0);
    round.attempt_place(0, 0, 0).unwrap();
    round.take_events();
    let before = round.snapshot();

    assert_eq!(round.attempt_place(1, 1, 1), Err(PlaceError::InvalidPlacement));
    assert_eq!(round.attempt_place(1, 9, 0), Err(PlaceError::InvalidPlacement));
    assert_eq!(round.snapshot(), before);
    assert!(round.events().is_empty());
}

#[test]
fn test_game_over_when_nothing_fits() {
    let mut round = repeat_round("square", 0);
    // Checkerboard: no 2x2 hole anywhere and no full line.
    for y in 0..10 {
        for x in 0..10 {
            if (x + y) % 2 == 0 {
                round.board_mut().set(x, y, 1);
            }
        }
    }
    assert!(!any_move_exists(round.board(), round.pending()));
    assert!(round.refresh_game_over());
    assert_eq!(round.phase(), RoundPhase::GameOver);
    assert_eq!(round.attempt_place(0, 1, 0), Err(PlaceError::InvalidState));
    assert_eq!(round.take_events().last(), Some(&RoundEvent::GameOver { score: 0 }));
}

#[test]
fn test_game_over_right_after_spawn() {
    let mut round = scripted_round(&["single", "single", "single", "bar4h", "bar4h", "bar4h"]);
    // Diagonal stripes leave at most two empty cells in a row or column.
    for y in 0..10 {
        for x in 0..10 {
            if (x + y) % 3 == 2 {
                round.board_mut().set(x, y, 1);
            }
        }
    }
    assert!(!round.refresh_game_over());

    round.attempt_place(0, 0, 0).unwrap();
    round.attempt_place(1, 1, 0).unwrap();
    let outcome = round.attempt_place(2, 0, 1).unwrap();
    assert!(outcome.set_spawned);
    assert!(outcome.game_over);
    assert!(round.is_game_over());
    assert!(round.pending().iter().all(|p| p.shape.name() == "bar4h"));
}

#[test]
fn test_reset_can_end_round_immediately() {
    let config = RoundConfig {
        rows: 1,
        cols: 1,
        ..RoundConfig::default()
    };
    let sampler = ScriptedSampler::repeat(find_shape("square").unwrap());
    let mut round = RoundEngine::new(config, sampler, 0).unwrap();
    round.reset();

    assert_eq!(round.phase(), RoundPhase::GameOver);
    assert!(round.is_game_over());
    assert!(!round.can_place_index(0, 0, 0));
    assert_eq!(round.attempt_place(0, 0, 0), Err(PlaceError::InvalidState));
    let events = round.take_events();
    assert_eq!(events.first(), Some(&RoundEvent::Reset));
    assert_eq!(events.last(), Some(&RoundEvent::GameOver { score: 0 }));
}

#[test]
fn test_reset_from_game_over_keeps_high_score() {
    let mut round = repeat_round("square", 0);
    round.attempt_place(0, 0, 0).unwrap();
    for y in 0..10 {
        for x in 0..10 {
            if (x + y) % 2 == 0 {
                round.board_mut().set(x, y, 1);
            }
        }
    }
    assert!(round.refresh_game_over());

    round.reset();
    assert_eq!(round.phase(), RoundPhase::InProgress);
    assert_eq!(round.score(), 0);
    assert_eq!(round.high_score(), 40);
    assert_eq!(round.board().filled_count(), 0);
}

#[test]
fn test_high_score_events() {
    let mut round = repeat_round("square", 35);
    round.take_events();

    let outcome = round.attempt_place(0, 0, 0).unwrap();
    assert!(outcome.new_high_score);
    assert_eq!(round.high_score(), 40);
    round.attempt_place(1, 4, 0).unwrap();
    assert_eq!(round.high_score(), 80);

    let records: Vec<u32> = round
        .take_events()
        .into_iter()
        .filter_map(|e| match e {
            RoundEvent::NewHighScore { score } => Some(score),
            _ => None,
        })
        .collect();
    assert_eq!(records, vec![40, 80]);
}

#[test]
fn test_no_record_below_seeded_high_score() {
    let mut round = repeat_round("square", 1000);
    let outcome = round.attempt_place(0, 0, 0).unwrap();
    assert!(!outcome.new_high_score);
    assert_eq!(round.high_score(), 1000);
}

#[test]
fn test_same_seed_same_pending_sets() {
    let mut a = RoundEngine::new(RoundConfig::default(), CatalogSampler::new(77), 0).unwrap();
    let mut b = RoundEngine::new(RoundConfig::default(), CatalogSampler::new(77), 0).unwrap();
    a.reset();
    b.reset();
    assert_eq!(a.snapshot(), b.snapshot());
    assert!(a.pending().iter().all(|p| (1..=5).contains(&p.tag)));
}

#[test]
fn test_custom_board_size() {
    let config = RoundConfig {
        rows: 4,
        cols: 6,
        ..RoundConfig::default()
    };
    let sampler = ScriptedSampler::repeat(find_shape("bar3h").unwrap());
    let mut round = RoundEngine::new(config, sampler, 0).unwrap();
    round.reset();

    let snapshot = round.snapshot();
    assert_eq!((snapshot.rows, snapshot.cols), (4, 6));
    round.attempt_place(0, 0, 3).unwrap();
    // Completing the bottom row of a 6-wide board.
    let outcome = round.attempt_place(1, 3, 3).unwrap();
    assert_eq!(outcome.lines_cleared, 1);
    assert_eq!(round.score(), 60 + 50);
}
