//! Seam between the trial state machine and the chess rules engine.
//!
//! The controller only needs to load a FEN, apply a move, ask whose turn it
//! is and whether the game is over. [`ShakmatyRules`] backs that with
//! `shakmaty`; tests can swap in anything else.

use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Position, Rank, Role};

use crate::error::{IllegalMoveError, InvalidFenError};
use crate::move_spec::MoveSpec;

/// Result of a legal move: the new position and whether it took a piece.
#[derive(Debug, Clone)]
pub struct AppliedMove<P> {
    pub position: P,
    pub capture: bool,
}

pub trait Rules {
    type Position: Clone;

    fn load(&self, fen: &str) -> Result<Self::Position, InvalidFenError>;

    fn apply_move(
        &self,
        position: &Self::Position,
        mv: &MoveSpec,
    ) -> Result<AppliedMove<Self::Position>, IllegalMoveError>;

    fn is_game_over(&self, position: &Self::Position) -> bool;

    fn current_turn(&self, position: &Self::Position) -> Color;

    fn fen(&self, position: &Self::Position) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShakmatyRules;

impl Rules for ShakmatyRules {
    type Position = Chess;

    fn load(&self, fen: &str) -> Result<Chess, InvalidFenError> {
        let invalid = |reason: String| InvalidFenError {
            fen: fen.to_string(),
            reason,
        };
        let parsed: Fen = fen.parse().map_err(|e| invalid(format!("{e}")))?;
        parsed
            .into_position::<Chess>(CastlingMode::Standard)
            .map_err(|e| invalid(format!("{e}")))
    }

    fn apply_move(&self, pos: &Chess, mv: &MoveSpec) -> Result<AppliedMove<Chess>, IllegalMoveError> {
        let illegal = || IllegalMoveError {
            mv: mv.to_string(),
            fen: self.fen(pos),
        };

        // The promotion piece only matters when a pawn reaches the back rank.
        let promotion = match pos.board().piece_at(mv.from()) {
            Some(piece)
                if piece.role == Role::Pawn && matches!(mv.to().rank(), Rank::First | Rank::Eighth) =>
            {
                Some(mv.promotion())
            }
            _ => None,
        };

        let uci = UciMove::Normal {
            from: mv.from(),
            to: mv.to(),
            promotion,
        };
        let m = uci.to_move(pos).map_err(|_| illegal())?;

        let capture = m.is_capture();
        let mut next = pos.clone();
        next.play_unchecked(m);

        Ok(AppliedMove {
            position: next,
            capture,
        })
    }

    fn is_game_over(&self, pos: &Chess) -> bool {
        pos.is_game_over()
    }

    fn current_turn(&self, pos: &Chess) -> Color {
        pos.turn()
    }

    fn fen(&self, pos: &Chess) -> String {
        Fen::from_position(pos, EnPassantMode::Legal).to_string()
    }
}
