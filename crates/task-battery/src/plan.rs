//! Laying out a whole task run and scoring responses.

use rand::RngCore;
use serde::Serialize;

use crate::error::BatteryError;
use crate::task::{BlockType, Task, TaskInfo, TaskKind, Trial};
use crate::tasks::{NBackTask, RotationTask, StroopTask};

#[derive(Debug, Clone, Serialize)]
pub struct BlockPlan {
    pub task: TaskKind,
    pub block_type: BlockType,
    pub block: u32,
    pub instructions: String,
    pub trials: Vec<Trial>,
    /// Practice blocks show "Correct!" or "Wrong." after every trial.
    pub feedback: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BlockScore {
    pub correct: usize,
    pub answered: usize,
    pub total: usize,
}

impl BlockScore {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}

/// Construct a task with the battery's design parameters.
pub fn build_task(kind: TaskKind, block_type: BlockType, rng: &mut dyn RngCore) -> Box<dyn Task> {
    let trials = TaskInfo::trials_for(kind, block_type);
    let blocks = TaskInfo::blocks_per_task(kind);
    match kind {
        TaskKind::NBack => Box::new(NBackTask::new(block_type, blocks, trials, rng)),
        TaskKind::Stroop => Box::new(StroopTask::new(block_type, blocks, trials)),
        TaskKind::Rotation => Box::new(RotationTask::new(block_type, blocks, trials)),
    }
}

/// Every block of `task`, in run order.
pub fn plan_blocks(task: &mut dyn Task, rng: &mut dyn RngCore) -> Result<Vec<BlockPlan>, BatteryError> {
    (0..task.block_count())
        .map(|block| {
            // Instructions first: they describe the block about to be generated.
            let instructions = task.instructions(block);
            let trials = task.make_block_trials(block, rng)?;
            Ok(BlockPlan {
                task: task.kind(),
                block_type: task.block_type(),
                block,
                instructions,
                trials,
                feedback: task.block_type() == BlockType::Practice,
            })
        })
        .collect()
}

/// Score one block; a missing response counts as wrong.
pub fn score(task: &dyn Task, trials: &[Trial], responses: &[Option<char>]) -> BlockScore {
    let mut result = BlockScore {
        total: trials.len(),
        ..BlockScore::default()
    };
    for (trial, response) in trials.iter().zip(responses.iter().chain(std::iter::repeat(&None))) {
        if let Some(key) = *response {
            result.answered += 1;
            if task.correct(trial, key) {
                result.correct += 1;
            }
        }
    }
    result
}

pub fn feedback_text(correct: bool) -> &'static str {
    if correct {
        "Correct!"
    } else {
        "Wrong."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Stimulus;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_plan_sizes() {
        let mut rng = StdRng::seed_from_u64(31);
        let cases = [
            (TaskKind::Stroop, BlockType::Task, 1, 75),
            (TaskKind::Rotation, BlockType::Task, 1, 24),
            (TaskKind::NBack, BlockType::Task, 16, 25),
            (TaskKind::NBack, BlockType::Practice, 4, 12),
            (TaskKind::Stroop, BlockType::Practice, 1, 12),
        ];
        for (kind, block_type, blocks, trials) in cases {
            let mut task = build_task(kind, block_type, &mut rng);
            let plan = plan_blocks(task.as_mut(), &mut rng).unwrap();
            assert_eq!(plan.len(), blocks, "{kind} {block_type:?}");
            assert!(plan.iter().all(|b| b.trials.len() == trials));
            assert!(plan.iter().all(|b| b.feedback == (block_type == BlockType::Practice)));
        }
    }

    #[test]
    fn test_zero_back_instructions_name_the_block_letter() {
        let mut rng = StdRng::seed_from_u64(32);
        let mut task = build_task(TaskKind::NBack, BlockType::Practice, &mut rng);
        let plan = plan_blocks(task.as_mut(), &mut rng).unwrap();

        let zero = &plan[0];
        assert!(zero.instructions.starts_with("0-Back - "));
        let letter = zero.instructions.chars().nth(9).unwrap();
        let targets: Vec<char> = zero
            .trials
            .iter()
            .filter_map(|t| match t.stimulus {
                Stimulus::Letter { letter, is_target: true, .. } => Some(letter),
                _ => None,
            })
            .collect();
        assert!(targets.iter().all(|&c| c == letter));
    }

    #[test]
    fn test_score_and_feedback() {
        let mut rng = StdRng::seed_from_u64(33);
        let mut task = build_task(TaskKind::Rotation, BlockType::Practice, &mut rng);
        let trials = task.make_block_trials(0, &mut rng).unwrap();

        let perfect: Vec<Option<char>> = trials
            .iter()
            .map(|t| match t.stimulus {
                Stimulus::Rotation { reflected, .. } => Some(if reflected { 'n' } else { 'y' }),
                _ => None,
            })
            .collect();
        let s = score(task.as_ref(), &trials, &perfect);
        assert_eq!(s, BlockScore { correct: 12, answered: 12, total: 12 });
        assert_eq!(s.accuracy(), 1.0);

        let s = score(task.as_ref(), &trials, &perfect[..4]);
        assert_eq!(s, BlockScore { correct: 4, answered: 4, total: 12 });

        assert_eq!(feedback_text(true), "Correct!");
        assert_eq!(feedback_text(false), "Wrong.");
    }
}
