use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatteryError {
    #[error("unknown task '{0}' (expected stroop, nback or rotation)")]
    UnknownTask(String),

    #[error("unknown block type '{0}' (expected practice or task)")]
    UnknownBlockType(String),

    #[error("block {block} does not exist ({blocks} blocks planned)")]
    NoSuchBlock { block: u32, blocks: u32 },

    #[error("ran out of unused rotation stimuli ({needed} more needed)")]
    StimuliExhausted { needed: usize },
}
