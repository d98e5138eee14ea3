//! Whole blocks in virtual time: rest, trials, rating updates and export.

mod common;

use std::time::Duration;

use common::*;
use puzzle_core::MoveSpec;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use trial_runner::{Session, TrialError};

/// Send each move once the paused clock reaches its offset from now.
fn script_input(moves: &[(u64, &str)]) -> mpsc::Receiver<MoveSpec> {
    let (tx, rx) = mpsc::channel(8);
    let start = Instant::now();
    let moves: Vec<(u64, MoveSpec)> = moves.iter().map(|&(at, m)| (at, m.parse().unwrap())).collect();
    tokio::spawn(async move {
        for (at, mv) in moves {
            sleep_until(start + Duration::from_secs(at)).await;
            if tx.send(mv).await.is_err() {
                return;
            }
        }
        // Keep input open until the session is done with it.
        tx.closed().await;
    });
    rx
}

fn markers(events: &[trial_runner::MarkerEvent]) -> Vec<String> {
    events
        .iter()
        .map(|e| e.marker.split(';').next().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_adaptive_block_solves_two_puzzles() {
    let mut session = Session::new(test_config(2), index(&[FOOLS_MATE, SCHOLARS_MATE])).with_seed(5);
    // rest 0..2s, fool 2..7s, scholar 7..10s
    let mut input = script_input(&[(4, "e7e5"), (6, "d8h4"), (9, "h5f7")]);

    let summary = session.run_block(0, &mut input).await.unwrap();
    let trials = &summary.export.trials;
    assert_eq!(trials.len(), 2);

    assert_eq!(trials[0].puzzle.id, "fool");
    assert!(trials[0].outcome.solved);
    assert_eq!((trials[0].elo_before, trials[0].elo_after), (800, 850));
    assert_eq!(trials[0].duration_ms, 4000);

    assert_eq!(trials[1].puzzle.id, "scholar");
    assert!(trials[1].outcome.solved);
    assert_eq!((trials[1].elo_before, trials[1].elo_after), (850, 900));
    assert_eq!(session.rating(), 900);

    assert_eq!(
        markers(&summary.export.events),
        vec![
            "STATUS: block_started",
            "STATUS: rest_loaded",
            "STATUS: rest_ended",
            "STATUS: puzzle_loaded",
            "STATUS: opponent_moved",
            "STATUS: correct_move",
            "STATUS: opponent_moved",
            "STATUS: puzzle_finished",
            "STATUS: trial_ended",
            "STATUS: puzzle_loaded",
            "STATUS: opponent_moved",
            "STATUS: puzzle_finished",
            "STATUS: trial_ended",
            "STATUS: block_ended",
        ]
    );
    assert!(!summary.delivered);
}

#[tokio::test(start_paused = true)]
async fn test_wrong_move_lowers_rating() {
    let mut session = Session::new(test_config(1), index(&[FOOLS_MATE])).with_seed(5);
    let mut input = script_input(&[(4, "e7e6")]);

    let summary = session.run_block(0, &mut input).await.unwrap();
    let trial = &summary.export.trials[0];
    assert!(!trial.outcome.solved);
    assert!(!trial.outcome.timed_out);
    assert_eq!(trial.outcome.failed_on_move_index, Some(1));
    assert_eq!(trial.puzzle.failed_on_move, Some(1));
    assert_eq!(trial.elo_after, 750);
}

#[tokio::test(start_paused = true)]
async fn test_silent_subject_times_out() {
    let mut session = Session::new(test_config(1), index(&[FOOLS_MATE])).with_seed(5);
    let mut input = script_input(&[]);

    let summary = session.run_block(0, &mut input).await.unwrap();
    let trial = &summary.export.trials[0];
    assert!(trial.outcome.timed_out);
    assert!(!trial.outcome.solved);
    assert_eq!(trial.outcome.failed_on_move_index, None);
    assert_eq!(trial.duration_ms, 10_000);
    assert!(summary
        .export
        .events
        .iter()
        .any(|e| e.marker.starts_with("STATUS: puzzle_finished; RESULT: timeout")));
}

#[tokio::test(start_paused = true)]
async fn test_moves_after_expiry_are_not_scored() {
    let mut session = Session::new(test_config(1), index(&[FOOLS_MATE])).with_seed(5);
    // The countdown runs out at t=12; the reply arrives a second later.
    let mut input = script_input(&[(13, "e7e5")]);

    let summary = session.run_block(0, &mut input).await.unwrap();
    assert!(summary.export.trials[0].outcome.timed_out);
    assert!(!summary
        .export
        .events
        .iter()
        .any(|e| e.marker.starts_with("STATUS: correct_move")));
}

#[tokio::test(start_paused = true)]
async fn test_each_block_resets_rating_and_pool_runs_dry() {
    let mut config = test_config(1);
    config.num_blocks = 2;
    let mut session = Session::new(config, index(&[FOOLS_MATE])).with_seed(5);
    let mut input = script_input(&[(4, "e7e5"), (6, "d8h4")]);

    // Block 0 solves the only puzzle; block 1 starts again at 800 and finds
    // nothing left to draw.
    let err = session.run(&mut input).await.unwrap_err();
    assert!(matches!(err, TrialError::ExhaustedPool(_)));
    assert_eq!(session.rating(), 800);
    assert!(session.index().puzzles()[0].solved() == Some(true));
}
