//! Mental rotation: are the two block figures the same object?
//!
//! Stimulus files are `<image>_<angle>[_R].jpg`; `_R` marks the mirrored
//! pair, which is the "not the same" answer. No file is shown twice within
//! a task, and the same answer never comes up three times in a row.

use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use crate::error::BatteryError;
use crate::task::{BlockType, Stimulus, Task, TaskKind, Trial, TrialTiming};

pub const IMAGES: std::ops::RangeInclusive<u32> = 1..=47;
pub const ANGLES: [u32; 4] = [0, 50, 100, 150];
const REFLECTED_PROBABILITY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RotationStimulus {
    image: u32,
    angle: u32,
    reflected: bool,
}

impl RotationStimulus {
    fn file(self) -> String {
        let suffix = if self.reflected { "_R" } else { "" };
        format!("{}_{}{suffix}.jpg", self.image, self.angle)
    }
}

pub struct RotationTask {
    block_type: BlockType,
    blocks: u32,
    trials_per_block: usize,
    unused: Vec<RotationStimulus>,
}

impl RotationTask {
    pub fn new(block_type: BlockType, blocks: u32, trials_per_block: usize) -> Self {
        let unused = IMAGES
            .flat_map(|image| {
                ANGLES.into_iter().flat_map(move |angle| {
                    [false, true].map(|reflected| RotationStimulus {
                        image,
                        angle,
                        reflected,
                    })
                })
            })
            .collect();
        Self {
            block_type,
            blocks,
            trials_per_block,
            unused,
        }
    }

    pub fn remaining_stimuli(&self) -> usize {
        self.unused.len()
    }

    fn next_reflection(previous: &[bool], rng: &mut dyn RngCore) -> bool {
        match previous {
            [.., a, b] if a == b => !*b,
            _ => rng.random_bool(REFLECTED_PROBABILITY),
        }
    }
}

impl Task for RotationTask {
    fn kind(&self) -> TaskKind {
        TaskKind::Rotation
    }

    fn block_type(&self) -> BlockType {
        self.block_type
    }

    fn block_count(&self) -> u32 {
        self.blocks
    }

    fn instructions(&self, _block: u32) -> String {
        "Rotating Blocks\n\nIn this experiment you will be presented with a series of sets of two \
         pictures of blocks.\nAs soon as you see a new set of pictures, press the y key if the two \
         blocks are in fact the same (one could be rotated to produce the other), or press the n \
         key if the two blocks are not the same (one could not be rotated to produce the other)."
            .to_string()
    }

    fn make_block_trials(&mut self, block: u32, rng: &mut dyn RngCore) -> Result<Vec<Trial>, BatteryError> {
        if block >= self.blocks {
            return Err(BatteryError::NoSuchBlock {
                block,
                blocks: self.blocks,
            });
        }

        let mut reflections = Vec::with_capacity(self.trials_per_block);
        let mut trials = Vec::with_capacity(self.trials_per_block);
        while trials.len() < self.trials_per_block {
            let reflected = Self::next_reflection(&reflections, rng);
            let options: Vec<usize> = (0..self.unused.len())
                .filter(|&i| self.unused[i].reflected == reflected)
                .collect();
            let &pick = options.choose(rng).ok_or(BatteryError::StimuliExhausted {
                needed: self.trials_per_block - trials.len(),
            })?;
            let stimulus = self.unused.swap_remove(pick);

            reflections.push(reflected);
            trials.push(Trial {
                task: TaskKind::Rotation,
                block_type: self.block_type,
                block,
                stimulus: Stimulus::Rotation {
                    image: stimulus.image,
                    angle: stimulus.angle,
                    reflected,
                    file: stimulus.file(),
                },
                timing: TrialTiming {
                    trial_duration_ms: 7500,
                    stimulus_duration_ms: None,
                    choices: vec!['y', 'n'],
                },
            });
        }
        Ok(trials)
    }

    fn correct(&self, trial: &Trial, response: char) -> bool {
        match trial.stimulus {
            Stimulus::Rotation { reflected, .. } => response.to_ascii_lowercase() == if reflected { 'n' } else { 'y' },
            _ => false,
        }
    }
}
