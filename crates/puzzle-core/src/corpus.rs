//! Loading the comma-separated mate puzzle corpus.
//!
//! Bad lines are skipped with a warning and kept in [`Corpus::skipped`];
//! a single malformed record never aborts the load.

use std::fs;
use std::path::Path;

use crate::error::{CorpusError, PuzzleParseError};
use crate::record::PuzzleRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the source text.
    pub line: usize,
    pub error: PuzzleParseError,
}

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub puzzles: Vec<PuzzleRecord>,
    pub skipped: Vec<SkippedLine>,
}

pub fn load_corpus(text: &str) -> Corpus {
    let mut corpus = Corpus::default();

    for (idx, raw) in text.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        match PuzzleRecord::parse(raw) {
            Ok(puzzle) => corpus.puzzles.push(puzzle),
            Err(error) => {
                tracing::warn!(line = idx + 1, %error, "Skipping corpus line");
                corpus.skipped.push(SkippedLine {
                    line: idx + 1,
                    error,
                });
            }
        }
    }

    tracing::info!(
        loaded = corpus.puzzles.len(),
        skipped = corpus.skipped.len(),
        "Puzzle corpus loaded"
    );
    corpus
}

pub fn load_corpus_file(path: impl AsRef<Path>) -> Result<Corpus, CorpusError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(load_corpus(&text))
}
