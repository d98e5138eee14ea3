//! Cognitive task battery: n-back, Stroop and mental rotation.
//!
//! Each task implements [`Task`] and generates its own block trials. The
//! entry point is [`plan_blocks`], which lays out every block of one task
//! for either the practice or the real run.

pub mod error;
pub mod plan;
pub mod task;
pub mod tasks;

pub use error::BatteryError;
pub use plan::{build_task, feedback_text, plan_blocks, score, BlockPlan, BlockScore};
pub use task::{BlockType, Stimulus, Task, TaskInfo, TaskKind, Trial, TrialTiming};
pub use tasks::{NBackTask, RotationTask, StroopTask};
