//! Loading a corpus file from disk and bucketing it.

mod common;

use std::fs;

use common::*;
use puzzle_core::{load_corpus_file, EloBucketIndex, PuzzleParseError, Resolution};

const HEADER: &str = "PuzzleId,FEN,Moves,Rating,RatingDeviation,Popularity,NbPlays,Themes,GameUrl,OpeningTags";

#[test]
fn test_load_file_skips_bad_lines_and_buckets_the_rest() {
    let text = [
        HEADER,
        FOOLS_MATE,
        SCHOLARS_MATE,
        "short,line",
        "badmove,rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1,e2,900,80,90,100,mateIn1,url",
        QUIET_FINISH,
        PROMOTION,
        "",
    ]
    .join("\n");

    let path = std::env::temp_dir().join(format!("mate-corpus-{}.csv", std::process::id()));
    fs::write(&path, text).unwrap();
    let corpus = load_corpus_file(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(corpus.puzzles.len(), 4);
    let skipped: Vec<usize> = corpus.skipped.iter().map(|s| s.line).collect();
    assert_eq!(skipped, vec![1, 4, 5]);
    assert!(matches!(corpus.skipped[1].error, PuzzleParseError::MissingFields { found: 2, .. }));
    assert!(matches!(corpus.skipped[2].error, PuzzleParseError::Move(_)));

    let index = EloBucketIndex::build(corpus.puzzles);
    let at = |rating| -> Vec<String> { index.candidates_for(rating).map(|(_, p)| p.id.clone()).collect() };
    assert_eq!(at(800), vec!["fool"]);
    assert_eq!(at(850), vec!["scholar"]);
    assert_eq!(at(1000), vec!["quiet"]);
    assert_eq!(at(1200), vec!["promo"]);
    assert!(at(550).is_empty());
}

#[test]
fn test_outcome_summary_keeps_identity() {
    let mut index = index(&[FOOLS_MATE]);
    let (key, puzzle) = index.candidates_for(810).next().unwrap();
    assert_eq!(puzzle.theme(), Some("mateIn2"));
    assert_eq!(puzzle.opening_family.as_deref(), Some("Barnes_Opening"));

    let summary = index.resolve(key, Resolution::Failed { ply: 1 }).unwrap().summary();
    let json: serde_json::Value = serde_json::from_str(&serde_json::to_string(&summary).unwrap()).unwrap();
    assert_eq!(json["id"], "fool");
    assert_eq!(json["rating"], 810);
    assert_eq!(json["move_count"], 4);
    assert_eq!(json["failed_on_move"], 1);
    assert_eq!(json["solved"], false);
}

#[test]
fn test_sample_corpus_covers_a_default_block() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/matein_sample.csv");
    let corpus = load_corpus_file(path).unwrap();

    // Only the header is rejected.
    let skipped: Vec<usize> = corpus.skipped.iter().map(|s| s.line).collect();
    assert_eq!(skipped, vec![1]);

    // Five trials from 800 can revisit one bucket at most three times.
    let index = EloBucketIndex::build(corpus.puzzles);
    for rating in (550..=1050).step_by(50) {
        assert!(
            index.candidates_for(rating).count() >= 3,
            "bucket {rating} has too few puzzles"
        );
    }
}
