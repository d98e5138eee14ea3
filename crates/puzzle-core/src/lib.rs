//! Puzzle corpus model, rating buckets and the rules-engine seam used by the
//! adaptive mate-in-X trial runner.

pub mod bucket;
pub mod corpus;
pub mod elo;
pub mod error;
pub mod move_spec;
pub mod record;
pub mod rules;

pub use bucket::{bucket_floor, EloBucketIndex, PuzzleKey};
pub use corpus::{load_corpus, load_corpus_file, Corpus, SkippedLine};
pub use elo::EloAdjuster;
pub use error::{
    AlreadyResolvedError, CorpusError, ExhaustedPoolError, IllegalMoveError, InvalidFenError,
    MoveParseError, PuzzleParseError, ResolveError,
};
pub use move_spec::MoveSpec;
pub use record::{PuzzleRecord, PuzzleSummary, Resolution};
pub use rules::{AppliedMove, Rules, ShakmatyRules};
