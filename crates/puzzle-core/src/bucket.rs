//! Rating buckets over the loaded corpus.
//!
//! A bucket at floor `f` holds every puzzle rated in `[f, f + 50]`, so a
//! rating that is an exact multiple of 50 is listed in two buckets.

use std::collections::BTreeMap;

use crate::error::ResolveError;
use crate::record::{PuzzleRecord, Resolution};

pub const BUCKET_WIDTH: i32 = 50;
pub const MIN_BUCKET: i32 = 500;
pub const MAX_BUCKET: i32 = 2800;

pub fn bucket_floor(rating: i32) -> i32 {
    rating.div_euclid(BUCKET_WIDTH) * BUCKET_WIDTH
}

/// Stable handle to a puzzle owned by an [`EloBucketIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PuzzleKey(usize);

#[derive(Debug, Clone, Default)]
pub struct EloBucketIndex {
    puzzles: Vec<PuzzleRecord>,
    buckets: BTreeMap<i32, Vec<usize>>,
}

impl EloBucketIndex {
    pub fn build(puzzles: Vec<PuzzleRecord>) -> Self {
        let mut buckets: BTreeMap<i32, Vec<usize>> = (MIN_BUCKET..=MAX_BUCKET)
            .step_by(BUCKET_WIDTH as usize)
            .map(|floor| (floor, Vec::new()))
            .collect();

        for (idx, puzzle) in puzzles.iter().enumerate() {
            let floor = bucket_floor(puzzle.rating);
            buckets.entry(floor).or_default().push(idx);
            if puzzle.rating == floor {
                buckets.entry(floor - BUCKET_WIDTH).or_default().push(idx);
            }
        }

        tracing::debug!(puzzles = puzzles.len(), buckets = buckets.len(), "Built elo buckets");
        Self { puzzles, buckets }
    }

    /// Every puzzle in the bucket for `rating`, attempted or not, in load order.
    pub fn candidates_for(&self, rating: i32) -> impl Iterator<Item = (PuzzleKey, &PuzzleRecord)> + '_ {
        self.buckets
            .get(&bucket_floor(rating))
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&idx| (PuzzleKey(idx), &self.puzzles[idx]))
    }

    pub fn get(&self, key: PuzzleKey) -> Option<&PuzzleRecord> {
        self.puzzles.get(key.0)
    }

    pub fn get_mut(&mut self, key: PuzzleKey) -> Option<&mut PuzzleRecord> {
        self.puzzles.get_mut(key.0)
    }

    /// Record an outcome on the indexed puzzle and return it.
    pub fn resolve(&mut self, key: PuzzleKey, resolution: Resolution) -> Result<&PuzzleRecord, ResolveError> {
        let puzzle = self.get_mut(key).ok_or(ResolveError::UnknownKey(key.0))?;
        puzzle.resolve(resolution)?;
        Ok(puzzle)
    }

    pub fn puzzles(&self) -> &[PuzzleRecord] {
        &self.puzzles
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }
}
