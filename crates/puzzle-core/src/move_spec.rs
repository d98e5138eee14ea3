//! Scripted half-moves in UCI coordinate form.
//!
//! Promotion defaults to a queen and is never compared: a move that reaches
//! the scripted square matches whatever piece it promotes to.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use shakmaty::{Role, Square};

use crate::error::MoveParseError;

#[derive(Debug, Clone, Copy)]
pub struct MoveSpec {
    from: Square,
    to: Square,
    promotion: Role,
}

impl MoveSpec {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: Role::Queen,
        }
    }

    pub fn with_promotion(mut self, promotion: Role) -> Self {
        self.promotion = promotion;
        self
    }

    pub fn from(&self) -> Square {
        self.from
    }

    pub fn to(&self) -> Square {
        self.to
    }

    pub fn promotion(&self) -> Role {
        self.promotion
    }
}

/// Only the squares are compared.
impl PartialEq for MoveSpec {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl Eq for MoveSpec {}

impl FromStr for MoveSpec {
    type Err = MoveParseError;

    /// Parse `e2e4` or `e7e8q`.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if !token.is_ascii() || !(4..=5).contains(&token.len()) {
            return Err(MoveParseError::Length(token.to_string()));
        }

        let from: Square = token[0..2]
            .parse()
            .map_err(|_| MoveParseError::Square(token.to_string()))?;
        let to: Square = token[2..4]
            .parse()
            .map_err(|_| MoveParseError::Square(token.to_string()))?;

        let mut spec = MoveSpec::new(from, to);
        if let Some(ch) = token[4..].chars().next() {
            let role = Role::from_char(ch.to_ascii_lowercase())
                .filter(|r| matches!(r, Role::Queen | Role::Rook | Role::Bishop | Role::Knight))
                .ok_or_else(|| MoveParseError::Promotion(token.to_string()))?;
            spec = spec.with_promotion(role);
        }
        Ok(spec)
    }
}

impl fmt::Display for MoveSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if self.promotion != Role::Queen {
            write!(f, "{}", self.promotion.char())?;
        }
        Ok(())
    }
}

impl Serialize for MoveSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_four_char_token() {
        let mv: MoveSpec = "e2e4".parse().unwrap();
        assert_eq!(mv.from(), Square::E2);
        assert_eq!(mv.to(), Square::E4);
        assert_eq!(mv.promotion(), Role::Queen);
        assert_eq!(mv.to_string(), "e2e4");
    }

    #[test]
    fn test_promotion_suffix_is_ignored_for_equality() {
        let scripted: MoveSpec = "e7e8q".parse().unwrap();
        let played: MoveSpec = "e7e8".parse().unwrap();
        assert_eq!(scripted, played);

        let under: MoveSpec = "e7e8n".parse().unwrap();
        assert_eq!(under.promotion(), Role::Knight);
        assert_eq!(under, played);
        assert_eq!(under.to_string(), "e7e8n");
    }

    #[test]
    fn test_different_squares_are_not_equal() {
        let a: MoveSpec = "g1f3".parse().unwrap();
        let b: MoveSpec = "g1h3".parse().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        assert_eq!(
            "e2".parse::<MoveSpec>(),
            Err(MoveParseError::Length("e2".into()))
        );
        assert_eq!(
            "e9e4".parse::<MoveSpec>(),
            Err(MoveParseError::Square("e9e4".into()))
        );
        assert_eq!(
            "e7e8k".parse::<MoveSpec>(),
            Err(MoveParseError::Promotion("e7e8k".into()))
        );
        assert!("é2e4".parse::<MoveSpec>().is_err());
    }
}
