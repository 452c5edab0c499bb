//! Host policy tests - click-to-place and the greedy auto-player

use block_puzzle::core::{find_shape, CatalogSampler, RoundEngine, ScriptedSampler};
use block_puzzle::engine::{autoplay, best_move, first_fit, place_at_cell};
use block_puzzle::types::{RoundConfig, RoundPhase};

fn seeded_round(seed: u32) -> RoundEngine {
    let mut round = RoundEngine::new(RoundConfig::default(), CatalogSampler::new(seed), 0).unwrap();
    round.reset();
    round
}

#[test]
fn test_autoplay_is_deterministic() {
    let mut a = seeded_round(2024);
    let mut b = seeded_round(2024);
    let ra = autoplay(&mut a, 500);
    let rb = autoplay(&mut b, 500);
    assert_eq!(ra, rb);
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn test_autoplay_report_matches_round() {
    let mut round = seeded_round(5);
    let report = autoplay(&mut round, 200);
    assert_eq!(report.score, round.score());
    assert_eq!(report.turns, round.placements());
    assert_eq!(report.game_over, round.is_game_over());
    assert!(report.turns > 0);
    if !report.game_over {
        assert_eq!(report.turns, 200);
    }
}

#[test]
fn test_autoplay_stops_at_game_over() {
    // One square on a 3x3 board leaves no 2x2 hole.
    let config = RoundConfig {
        rows: 3,
        cols: 3,
        ..RoundConfig::default()
    };
    let sampler = ScriptedSampler::repeat(find_shape("square").unwrap());
    let mut round = RoundEngine::new(config, sampler, 0).unwrap();
    round.reset();

    let report = autoplay(&mut round, 100);
    assert!(report.game_over);
    assert_eq!(report.turns, 1);
    assert_eq!(report.score, 40);
    assert_eq!(round.phase(), RoundPhase::GameOver);
    assert_eq!(best_move(&round), None);
}

#[test]
fn test_click_places_first_fitting_piece() {
    let script = vec![
        (find_shape("bar4h").unwrap(), 1),
        (find_shape("square").unwrap(), 2),
        (find_shape("single").unwrap(), 3),
    ];
    let mut round =
        RoundEngine::new(RoundConfig::default(), ScriptedSampler::new(script).unwrap(), 0).unwrap();
    round.reset();

    // At column 8 only the square and the single fit; the square wins.
    assert_eq!(first_fit(&round, 8, 0), Some(1));
    let (index, outcome) = place_at_cell(&mut round, 8, 0).unwrap();
    assert_eq!(index, 1);
    assert_eq!(outcome.cells_placed, 4);
    assert_eq!(round.board().get(9, 1), Some(2));
}
