//! Fixed-step, clamped rating update applied after each trial.

pub const START_RATING: i32 = 800;
pub const MIN_RATING: i32 = 550;
pub const MAX_RATING: i32 = 2550;
pub const RATING_STEP: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EloAdjuster {
    pub step: i32,
    pub min: i32,
    pub max: i32,
}

impl Default for EloAdjuster {
    fn default() -> Self {
        Self {
            step: RATING_STEP,
            min: MIN_RATING,
            max: MAX_RATING,
        }
    }
}

impl EloAdjuster {
    pub fn update(&self, rating: i32, solved: bool) -> i32 {
        let next = if solved {
            rating.saturating_add(self.step)
        } else {
            rating.saturating_sub(self.step)
        };
        next.clamp(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_steps_and_clamps() {
        let elo = EloAdjuster::default();
        assert_eq!(elo.update(800, true), 850);
        assert_eq!(elo.update(800, false), 750);
        assert_eq!(elo.update(2550, true), 2550);
        assert_eq!(elo.update(550, false), 550);
        assert_eq!(elo.update(2530, true), 2550);
    }

    #[test]
    fn test_update_matches_min_max_formula_across_range() {
        let elo = EloAdjuster::default();
        for r in MIN_RATING..=MAX_RATING {
            assert_eq!(elo.update(r, true), (r + 50).min(MAX_RATING));
            assert_eq!(elo.update(r, false), (r - 50).max(MIN_RATING));
        }
    }
}
