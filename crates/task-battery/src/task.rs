//! Shared task types and the trait every task implements.

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use serde::Serialize;

use crate::error::BatteryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Stroop,
    NBack,
    Rotation,
}

impl TaskKind {
    pub fn name(self) -> &'static str {
        match self {
            TaskKind::Stroop => "stroop",
            TaskKind::NBack => "nback",
            TaskKind::Rotation => "rotation",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TaskKind {
    type Err = BatteryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stroop" => Ok(TaskKind::Stroop),
            "nback" => Ok(TaskKind::NBack),
            "rotation" => Ok(TaskKind::Rotation),
            _ => Err(BatteryError::UnknownTask(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Practice,
    Task,
}

impl FromStr for BlockType {
    type Err = BatteryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "practice" => Ok(BlockType::Practice),
            "task" => Ok(BlockType::Task),
            _ => Err(BatteryError::UnknownBlockType(s.to_string())),
        }
    }
}

/// Design parameters of the battery.
pub struct TaskInfo;

impl TaskInfo {
    pub fn trials_per_block(kind: TaskKind) -> usize {
        match kind {
            TaskKind::Stroop => 75,
            TaskKind::NBack => 25,
            TaskKind::Rotation => 24,
        }
    }

    pub fn practice_trials(_kind: TaskKind) -> usize {
        12
    }

    pub fn trials_for(kind: TaskKind, block_type: BlockType) -> usize {
        match block_type {
            BlockType::Practice => Self::practice_trials(kind),
            BlockType::Task => Self::trials_per_block(kind),
        }
    }

    /// Same for practice and task runs.
    pub fn blocks_per_task(kind: TaskKind) -> u32 {
        match kind {
            TaskKind::NBack => 4,
            TaskKind::Stroop | TaskKind::Rotation => 1,
        }
    }
}

/// Presentation parameters carried on every trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialTiming {
    pub trial_duration_ms: u32,
    /// `None` keeps the stimulus up for the whole trial.
    pub stimulus_duration_ms: Option<u32>,
    pub choices: Vec<char>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Stimulus {
    Letter {
        letter: char,
        is_target: bool,
        is_first_three: bool,
    },
    Word {
        /// Colour the word is printed in; the answer.
        ink: &'static str,
        word: &'static str,
        congruent: bool,
    },
    Rotation {
        image: u32,
        angle: u32,
        reflected: bool,
        file: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trial {
    pub task: TaskKind,
    pub block_type: BlockType,
    /// Position of the block in the task's plan.
    pub block: u32,
    pub stimulus: Stimulus,
    pub timing: TrialTiming,
}

pub trait Task {
    fn kind(&self) -> TaskKind;

    fn block_type(&self) -> BlockType;

    /// Number of blocks this task runs.
    fn block_count(&self) -> u32;

    /// Instruction text shown before `block`.
    fn instructions(&self, block: u32) -> String;

    /// Generate the trials of `block`. Tasks that must not reuse stimuli
    /// remember what earlier blocks consumed.
    fn make_block_trials(&mut self, block: u32, rng: &mut dyn RngCore) -> Result<Vec<Trial>, BatteryError>;

    /// Whether `response` is the right key for `trial`.
    fn correct(&self, trial: &Trial, response: char) -> bool;
}
