//! Colour-word Stroop: name the ink colour, ignore the word.

use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use crate::error::BatteryError;
use crate::task::{BlockType, Stimulus, Task, TaskKind, Trial, TrialTiming};

pub const COLOURS: [&str; 4] = ["red", "green", "blue", "yellow"];
const CONGRUENT_PROBABILITY: f64 = 0.5;

pub struct StroopTask {
    block_type: BlockType,
    blocks: u32,
    trials_per_block: usize,
}

impl StroopTask {
    pub fn new(block_type: BlockType, blocks: u32, trials_per_block: usize) -> Self {
        Self {
            block_type,
            blocks,
            trials_per_block,
        }
    }

    fn draw(&self, block: u32, rng: &mut dyn RngCore) -> Trial {
        let pair: Vec<&str> = COLOURS.choose_multiple(rng, 2).copied().collect();
        let (ink, other) = (pair[0], pair[1]);
        let word = if rng.random_bool(CONGRUENT_PROBABILITY) { ink } else { other };

        Trial {
            task: TaskKind::Stroop,
            block_type: self.block_type,
            block,
            stimulus: Stimulus::Word {
                ink,
                word,
                congruent: ink == word,
            },
            timing: TrialTiming {
                trial_duration_ms: 2000,
                stimulus_duration_ms: None,
                choices: vec!['r', 'g', 'b', 'y'],
            },
        }
    }
}

impl Task for StroopTask {
    fn kind(&self) -> TaskKind {
        TaskKind::Stroop
    }

    fn block_type(&self) -> BlockType {
        self.block_type
    }

    fn block_count(&self) -> u32 {
        self.blocks
    }

    fn instructions(&self, _block: u32) -> String {
        "Stroop Task\n\nIn this experiment you will be presented with a series of words.\n\
         Each word will be one of the words blue, red, yellow and green, and will also be \
         written in one of those colours.\nAs soon as you see a new word, press the key of the \
         first letter of the colour of the word. For example, if you see the word red written \
         in blue, you would press the b key.\nTry to answer as quickly as you can!"
            .to_string()
    }

    fn make_block_trials(&mut self, block: u32, rng: &mut dyn RngCore) -> Result<Vec<Trial>, BatteryError> {
        if block >= self.blocks {
            return Err(BatteryError::NoSuchBlock {
                block,
                blocks: self.blocks,
            });
        }
        Ok((0..self.trials_per_block).map(|_| self.draw(block, rng)).collect())
    }

    fn correct(&self, trial: &Trial, response: char) -> bool {
        match trial.stimulus {
            Stimulus::Word { ink, .. } => ink.starts_with(response.to_ascii_lowercase()),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_block_shape() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut task = StroopTask::new(BlockType::Task, 1, 75);
        let trials = task.make_block_trials(0, &mut rng).unwrap();
        assert_eq!(trials.len(), 75);

        let mut congruent = 0;
        for trial in &trials {
            let Stimulus::Word { ink, word, congruent: c } = trial.stimulus else {
                panic!("stroop produced a non-word stimulus");
            };
            assert!(COLOURS.contains(&ink) && COLOURS.contains(&word));
            assert_eq!(c, ink == word);
            congruent += usize::from(c);
        }
        // Roughly half, with a wide margin for the fixed seed.
        assert!((15..=60).contains(&congruent));
        assert!(task.make_block_trials(1, &mut rng).is_err());
    }

    #[test]
    fn test_correct_is_ink_initial() {
        let task = StroopTask::new(BlockType::Practice, 1, 12);
        let trial = Trial {
            task: TaskKind::Stroop,
            block_type: BlockType::Practice,
            block: 0,
            stimulus: Stimulus::Word {
                ink: "blue",
                word: "red",
                congruent: false,
            },
            timing: TrialTiming {
                trial_duration_ms: 2000,
                stimulus_duration_ms: None,
                choices: vec!['r', 'g', 'b', 'y'],
            },
        };
        assert!(task.correct(&trial, 'b'));
        assert!(task.correct(&trial, 'B'));
        assert!(!task.correct(&trial, 'r'));
    }
}
