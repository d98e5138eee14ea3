//! Puzzle records parsed from the mate corpus, plus their per-attempt outcome.

use std::str::FromStr;

use serde::Serialize;

use crate::error::{AlreadyResolvedError, PuzzleParseError};
use crate::move_spec::MoveSpec;
use crate::rules::{Rules, ShakmatyRules};

/// id, FEN, moves, rating, deviation, popularity, plays, themes, game url.
/// The two opening columns are optional.
const REQUIRED_FIELDS: usize = 9;

/// How an attempt on a puzzle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Solved,
    Failed { ply: usize },
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct PuzzleRecord {
    pub id: String,
    pub fen: String,
    /// Opponent's move first, then alternating; always ends on the solver's move.
    pub moves: Vec<MoveSpec>,
    pub rating: i32,
    pub rating_deviation: i32,
    pub popularity: i32,
    pub play_count: u32,
    pub themes: Vec<String>,
    pub game_url: String,
    pub opening_family: Option<String>,
    pub opening_variation: Option<String>,
    solved: Option<bool>,
    failed_on: Option<usize>,
    timed_out: bool,
}

/// What gets exported about a puzzle once a trial ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PuzzleSummary {
    pub id: String,
    pub rating: i32,
    pub theme: Option<String>,
    pub move_count: usize,
    pub solved: Option<bool>,
    pub timed_out: bool,
    pub failed_on_move: Option<usize>,
}

impl PuzzleRecord {
    /// Parse one corpus line.
    pub fn parse(line: &str) -> Result<Self, PuzzleParseError> {
        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(',').collect();
        if fields.len() < REQUIRED_FIELDS {
            return Err(PuzzleParseError::MissingFields {
                expected: REQUIRED_FIELDS,
                found: fields.len(),
            });
        }

        let id = fields[0].trim();
        if id.is_empty() {
            return Err(PuzzleParseError::EmptyId);
        }

        let fen = fields[1].trim();
        let mut position = ShakmatyRules.load(fen)?;

        let moves = fields[2]
            .split_whitespace()
            .map(MoveSpec::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        if moves.len() < 2 || moves.len() % 2 != 0 {
            return Err(PuzzleParseError::SolutionLength(moves.len()));
        }

        // Every scripted ply must replay from the starting position.
        for (ply, mv) in moves.iter().enumerate() {
            position = ShakmatyRules
                .apply_move(&position, mv)
                .map_err(|_| PuzzleParseError::IllegalScript {
                    ply,
                    mv: mv.to_string(),
                })?
                .position;
        }

        let optional = |idx: usize| {
            fields
                .get(idx)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        Ok(Self {
            id: id.to_string(),
            fen: fen.to_string(),
            moves,
            rating: parse_number("rating", fields[3])?,
            rating_deviation: parse_number("rating deviation", fields[4])?,
            popularity: parse_number("popularity", fields[5])?,
            play_count: parse_number("play count", fields[6])?,
            themes: fields[7].split_whitespace().map(String::from).collect(),
            game_url: fields[8].trim().to_string(),
            opening_family: optional(9),
            opening_variation: optional(10),
            solved: None,
            failed_on: None,
            timed_out: false,
        })
    }

    /// The `mateInN` theme, if the puzzle carries one.
    pub fn theme(&self) -> Option<&str> {
        self.themes
            .iter()
            .find(|t| t.contains("mateIn"))
            .map(String::as_str)
    }

    pub fn solved(&self) -> Option<bool> {
        self.solved
    }

    pub fn failed_on(&self) -> Option<usize> {
        self.failed_on
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// A puzzle with any recorded outcome is never drawn again.
    pub fn is_attempted(&self) -> bool {
        self.solved.is_some()
    }

    /// Record the attempt's outcome. Only the first call succeeds.
    pub fn resolve(&mut self, resolution: Resolution) -> Result<(), AlreadyResolvedError> {
        if self.solved.is_some() {
            return Err(AlreadyResolvedError(self.id.clone()));
        }
        match resolution {
            Resolution::Solved => self.solved = Some(true),
            Resolution::Failed { ply } => {
                self.solved = Some(false);
                self.failed_on = Some(ply);
            }
            Resolution::TimedOut => {
                self.solved = Some(false);
                self.timed_out = true;
            }
        }
        Ok(())
    }

    pub fn summary(&self) -> PuzzleSummary {
        PuzzleSummary {
            id: self.id.clone(),
            rating: self.rating,
            theme: self.theme().map(String::from),
            move_count: self.moves.len(),
            solved: self.solved,
            timed_out: self.timed_out,
            failed_on_move: self.failed_on,
        }
    }
}

impl FromStr for PuzzleRecord {
    type Err = PuzzleParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        Self::parse(line)
    }
}

fn parse_number<T: FromStr>(field: &'static str, raw: &str) -> Result<T, PuzzleParseError> {
    raw.trim().parse().map_err(|_| PuzzleParseError::Number {
        field,
        value: raw.to_string(),
    })
}
