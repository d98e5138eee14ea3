//! Per-task implementations of [`crate::Task`].

mod nback;
mod rotation;
mod stroop;

pub use nback::NBackTask;
pub use rotation::RotationTask;
pub use stroop::StroopTask;
