#![allow(dead_code)]

use std::time::Duration;

use puzzle_core::{load_corpus, EloBucketIndex, PuzzleRecord};
use trial_runner::Config;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Opponent f2f3, then black mates in two.
pub const FOOLS_MATE: &str = "fool,rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1,\
f2f3 e7e5 g2g4 d8h4,810,76,95,1520,mate mateIn2 opening short,https://lichess.org/fool#1,Barnes_Opening,Barnes_Opening_Other_variations";

/// Black develops, white mates on f7.
pub const SCHOLARS_MATE: &str = "scholar,r1bqkbnr/pppp1ppp/2n5/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 3 3,\
g8f6 h5f7,860,80,93,2210,mate mateIn1 oneMove opening,https://lichess.org/scholar#6,Italian_Game";

/// Correct final ply that does not end the game.
pub const QUIET_FINISH: &str = "quiet,rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1,\
e2e4 e7e5,1010,80,90,300,opening,https://lichess.org/quiet";

/// Solved by promoting on e8.
pub const PROMOTION: &str = "promo,8/4P3/8/8/8/k7/8/K7 b - - 0 1,a3b3 e7e8q,1210,80,90,300,mateIn1 promotion,https://lichess.org/promo";

pub fn record(line: &str) -> PuzzleRecord {
    PuzzleRecord::parse(line).expect("fixture line parses")
}

pub fn index(lines: &[&str]) -> EloBucketIndex {
    let corpus = load_corpus(&lines.join("\n"));
    assert!(corpus.skipped.is_empty(), "fixture lines were skipped: {:?}", corpus.skipped);
    EloBucketIndex::build(corpus.puzzles)
}

/// Short timings so paused-clock tests stay readable.
pub fn test_config(trials_per_block: u32) -> Config {
    Config {
        num_blocks: 1,
        trials_per_block,
        trial_length: Duration::from_secs(10),
        rest_length: Duration::from_secs(2),
        opponent_delay: Duration::from_secs(1),
        feedback_delay: Duration::from_secs(1),
        ..Config::default()
    }
}
