//! Error types for corpus parsing, puzzle selection and move application.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("move token '{0}' must be 4 or 5 characters")]
    Length(String),

    #[error("invalid square in move token '{0}'")]
    Square(String),

    #[error("invalid promotion piece in move token '{0}'")]
    Promotion(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid FEN '{fen}': {reason}")]
pub struct InvalidFenError {
    pub fen: String,
    pub reason: String,
}

/// Why a single corpus line could not become a puzzle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleParseError {
    #[error("expected at least {expected} fields, found {found}")]
    MissingFields { expected: usize, found: usize },

    #[error("empty puzzle id")]
    EmptyId,

    #[error("invalid {field} '{value}'")]
    Number { field: &'static str, value: String },

    #[error(transparent)]
    Fen(#[from] InvalidFenError),

    #[error(transparent)]
    Move(#[from] MoveParseError),

    #[error("solution needs an even number of plies (at least 2), got {0}")]
    SolutionLength(usize),

    #[error("solution move {mv} at ply {ply} is illegal")]
    IllegalScript { ply: usize, mv: String },
}

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("failed to read puzzle corpus {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no unattempted puzzle left in the {bucket} bucket ({candidates} candidates)")]
pub struct ExhaustedPoolError {
    pub bucket: i32,
    pub candidates: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("illegal move {mv} in position {fen}")]
pub struct IllegalMoveError {
    pub mv: String,
    pub fen: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("puzzle {0} already has a recorded outcome")]
pub struct AlreadyResolvedError(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no puzzle with key {0} in this index")]
    UnknownKey(usize),

    #[error(transparent)]
    AlreadyResolved(#[from] AlreadyResolvedError),
}
