//! One puzzle attempt as an explicit state machine.
//!
//! The controller owns the board position and the script cursor. It never
//! touches the clock or the UI: the session feeds it [`TrialEvent`]s and
//! turns the returned [`Transition`]s into markers and board updates.

use puzzle_core::bucket::bucket_floor;
use puzzle_core::{EloBucketIndex, ExhaustedPoolError, MoveSpec, PuzzleKey, PuzzleRecord, Resolution, Rules};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Serialize;
use shakmaty::Color;
use tracing::debug;

use crate::error::TrialError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialEvent {
    /// The scheduled opponent reply is due.
    OpponentMoveDue,
    PlayerMove(MoveSpec),
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalKind {
    Solved,
    Failed,
    TimedOut,
}

impl TerminalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TerminalKind::Solved => "solved",
            TerminalKind::Failed => "failed",
            TerminalKind::TimedOut => "timeout",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialState {
    AwaitingOpponentMove,
    AwaitingPlayerMove,
    Terminal(TerminalKind),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialOutcome {
    pub puzzle_id: String,
    pub solved: bool,
    pub timed_out: bool,
    pub failed_on_move_index: Option<usize>,
    pub final_position_fen: String,
}

impl TrialOutcome {
    pub fn resolution(&self) -> Resolution {
        if self.timed_out {
            Resolution::TimedOut
        } else if self.solved {
            Resolution::Solved
        } else {
            Resolution::Failed {
                ply: self.failed_on_move_index.unwrap_or_default(),
            }
        }
    }
}

/// What a single event did to the trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    OpponentMoved { mv: MoveSpec, ply: usize, fen: String },
    /// Illegal player move; the board is unchanged.
    Snapback { mv: MoveSpec, ply: usize, fen: String },
    CorrectMove { mv: MoveSpec, ply: usize, capture: bool, fen: String },
    Finished {
        kind: TerminalKind,
        /// The player move that ended the trial, absent on timeout.
        mv: Option<MoveSpec>,
        ply: usize,
        outcome: TrialOutcome,
    },
    /// The event does not apply in the current state.
    Ignored,
}

pub struct TrialController<R: Rules> {
    rules: R,
    key: PuzzleKey,
    puzzle_id: String,
    script: Vec<MoveSpec>,
    position: R::Position,
    player: Color,
    cursor: usize,
    state: TrialState,
    outcome: Option<TrialOutcome>,
}

impl<R: Rules> TrialController<R> {
    /// Draw an unattempted puzzle from the bucket for `rating`.
    pub fn select<G>(index: &EloBucketIndex, rating: i32, rules: R, rng: &mut G) -> Result<Self, TrialError>
    where
        G: Rng + ?Sized,
    {
        let candidates: Vec<_> = index.candidates_for(rating).collect();
        let eligible: Vec<_> = candidates
            .iter()
            .filter(|(_, puzzle)| !puzzle.is_attempted())
            .collect();

        let &&(key, puzzle) = eligible.choose(rng).ok_or(ExhaustedPoolError {
            bucket: bucket_floor(rating),
            candidates: candidates.len(),
        })?;

        debug!(puzzle_id = %puzzle.id, rating, eligible = eligible.len(), "Selected puzzle");
        Self::new(key, puzzle, rules)
    }

    pub fn new(key: PuzzleKey, puzzle: &PuzzleRecord, rules: R) -> Result<Self, TrialError> {
        let position = rules.load(&puzzle.fen).map_err(|source| TrialError::Position {
            id: puzzle.id.clone(),
            source,
        })?;
        // The opponent moves first, so the solver plays the other colour.
        let player = !rules.current_turn(&position);

        Ok(Self {
            rules,
            key,
            puzzle_id: puzzle.id.clone(),
            script: puzzle.moves.clone(),
            position,
            player,
            cursor: 0,
            state: TrialState::AwaitingOpponentMove,
            outcome: None,
        })
    }

    pub fn handle(&mut self, event: TrialEvent) -> Result<Transition, TrialError> {
        let transition = match (self.state, event) {
            (TrialState::Terminal(_), _) => Transition::Ignored,
            (_, TrialEvent::Timeout) => self.finish(TerminalKind::TimedOut, None),
            (TrialState::AwaitingOpponentMove, TrialEvent::OpponentMoveDue) => self.play_opponent()?,
            (TrialState::AwaitingPlayerMove, TrialEvent::PlayerMove(mv)) => self.play_player(mv),
            _ => Transition::Ignored,
        };

        if transition != Transition::Ignored {
            debug!(puzzle_id = %self.puzzle_id, cursor = self.cursor, state = ?self.state, "Trial transition");
        }
        Ok(transition)
    }

    fn play_opponent(&mut self) -> Result<Transition, TrialError> {
        let Some(&mv) = self.script.get(self.cursor) else {
            return Ok(Transition::Ignored);
        };
        let applied = self
            .rules
            .apply_move(&self.position, &mv)
            .map_err(|_| TrialError::ScriptRejected {
                id: self.puzzle_id.clone(),
                ply: self.cursor,
                mv: mv.to_string(),
            })?;

        self.position = applied.position;
        let ply = self.cursor;
        self.cursor += 1;
        self.state = TrialState::AwaitingPlayerMove;

        Ok(Transition::OpponentMoved {
            mv,
            ply,
            fen: self.fen(),
        })
    }

    fn play_player(&mut self, mv: MoveSpec) -> Transition {
        let ply = self.cursor;
        let applied = match self.rules.apply_move(&self.position, &mv) {
            Ok(applied) => applied,
            Err(_) => {
                return Transition::Snapback {
                    mv,
                    ply,
                    fen: self.fen(),
                }
            }
        };
        self.position = applied.position;

        if self.rules.is_game_over(&self.position) {
            return self.finish(TerminalKind::Solved, Some(mv));
        }
        if self.script.get(ply) != Some(&mv) {
            return self.finish(TerminalKind::Failed, Some(mv));
        }
        if ply + 1 == self.script.len() {
            return self.finish(TerminalKind::Solved, Some(mv));
        }

        self.cursor += 1;
        self.state = TrialState::AwaitingOpponentMove;
        Transition::CorrectMove {
            mv,
            ply,
            capture: applied.capture,
            fen: self.fen(),
        }
    }

    fn finish(&mut self, kind: TerminalKind, mv: Option<MoveSpec>) -> Transition {
        let outcome = TrialOutcome {
            puzzle_id: self.puzzle_id.clone(),
            solved: kind == TerminalKind::Solved,
            timed_out: kind == TerminalKind::TimedOut,
            failed_on_move_index: (kind == TerminalKind::Failed).then_some(self.cursor),
            final_position_fen: self.fen(),
        };
        self.state = TrialState::Terminal(kind);
        self.outcome = Some(outcome.clone());

        Transition::Finished {
            kind,
            mv,
            ply: self.cursor,
            outcome,
        }
    }

    pub fn state(&self) -> TrialState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, TrialState::Terminal(_))
    }

    pub fn outcome(&self) -> Option<&TrialOutcome> {
        self.outcome.as_ref()
    }

    pub fn key(&self) -> PuzzleKey {
        self.key
    }

    pub fn puzzle_id(&self) -> &str {
        &self.puzzle_id
    }

    /// Index of the next scripted ply.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn player_side(&self) -> Color {
        self.player
    }

    pub fn side_to_move(&self) -> Color {
        self.rules.current_turn(&self.position)
    }

    pub fn position(&self) -> &R::Position {
        &self.position
    }

    pub fn fen(&self) -> String {
        self.rules.fen(&self.position)
    }
}
