//! N-back over consonants, levels 0 to 3.
//!
//! The first three letters of a block are never targets. After that each
//! letter is the target with probability 0.3 and otherwise a random
//! non-target consonant. Zero-back targets a fixed letter per block.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, RngCore};

use crate::error::BatteryError;
use crate::task::{BlockType, Stimulus, Task, TaskKind, Trial, TrialTiming};

pub const CONSONANTS: [char; 20] = [
    'B', 'C', 'D', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'V', 'W', 'Y', 'Z',
];
const LEVELS: [u32; 4] = [0, 1, 2, 3];
const TARGET_PROBABILITY: f64 = 0.3;
const LEAD_IN: usize = 3;

pub struct NBackTask {
    block_type: BlockType,
    trials_per_block: usize,
    /// n for every block, in run order.
    levels: Vec<u32>,
    zero_back_letters: Vec<char>,
}

impl NBackTask {
    /// Practice runs each level once in order; the real run repeats one
    /// shuffled level order `repeats` times.
    pub fn new(block_type: BlockType, repeats: u32, trials_per_block: usize, rng: &mut dyn RngCore) -> Self {
        let levels = match block_type {
            BlockType::Practice => LEVELS.to_vec(),
            BlockType::Task => {
                let mut order = LEVELS;
                order.shuffle(rng);
                (0..repeats).flat_map(|_| order).collect()
            }
        };
        let zero_back_letters = CONSONANTS.choose_multiple(rng, 4).copied().collect();

        Self {
            block_type,
            trials_per_block,
            levels,
            zero_back_letters,
        }
    }

    pub fn levels(&self) -> &[u32] {
        &self.levels
    }

    pub fn level(&self, block: u32) -> Option<u32> {
        self.levels.get(block as usize).copied()
    }

    /// Letter a zero-back block targets; each zero-back block takes the next one.
    pub fn zero_back_letter(&self, block: u32) -> char {
        let earlier = self
            .levels
            .iter()
            .take(block as usize)
            .filter(|&&n| n == 0)
            .count();
        self.zero_back_letters[earlier % self.zero_back_letters.len()]
    }

    fn letters(&self, n: usize, zero_letter: char, rng: &mut dyn RngCore) -> Vec<char> {
        let pool: Vec<char> = CONSONANTS
            .iter()
            .copied()
            .filter(|&c| n != 0 || c != zero_letter)
            .collect();

        let mut letters: Vec<char> = pool.choose_multiple(rng, LEAD_IN).copied().collect();
        while letters.len() < self.trials_per_block {
            let target = if n == 0 { zero_letter } else { letters[letters.len() - n] };
            let letter = if rng.random_bool(TARGET_PROBABILITY) {
                target
            } else {
                let fillers: Vec<char> = pool.iter().copied().filter(|&c| c != target).collect();
                fillers.choose(rng).copied().unwrap_or(target)
            };
            letters.push(letter);
        }
        letters.truncate(self.trials_per_block);
        letters
    }
}

impl Task for NBackTask {
    fn kind(&self) -> TaskKind {
        TaskKind::NBack
    }

    fn block_type(&self) -> BlockType {
        self.block_type
    }

    fn block_count(&self) -> u32 {
        self.levels.len() as u32
    }

    fn instructions(&self, block: u32) -> String {
        let n = self.level(block).unwrap_or_default();
        let mut text = if n == 0 {
            let letter = self.zero_back_letter(block);
            format!(
                "0-Back - {letter}\n\nIn this experiment you will be presented with a series of letters.\n\
                 As soon as you see a new letter, press the y key if it is the letter {letter}. \
                 Otherwise, press the n key. For example, for the sequence C, {letter}, F, {letter} \
                 you would press n, y, n, y."
            )
        } else {
            let example = match n {
                1 => "Q, R, R, T, T you would press n, n, y, n, y",
                2 => "B, F, G, T, G you would press n, n, n, n, y",
                _ => "R, S, T, R, T you would press n, n, n, y, n",
            };
            let plural = if n == 1 { "letter" } else { "letters" };
            format!(
                "{n}-Back\n\nIn this experiment you will be presented with a series of letters.\n\
                 As soon as you see a new letter, press the y key if it is the same as the letter \
                 you saw {n} {plural} previously. Otherwise, press the n key. For example, for the \
                 sequence {example}."
            )
        };
        if self.block_type == BlockType::Practice {
            text.push_str("\n\nThese are training trials.");
        }
        text
    }

    fn make_block_trials(&mut self, block: u32, rng: &mut dyn RngCore) -> Result<Vec<Trial>, BatteryError> {
        let n = self.level(block).ok_or(BatteryError::NoSuchBlock {
            block,
            blocks: self.block_count(),
        })? as usize;
        let zero_letter = self.zero_back_letter(block);
        let letters = self.letters(n, zero_letter, rng);

        let trials = letters
            .iter()
            .enumerate()
            .map(|(idx, &letter)| {
                let is_first_three = idx < LEAD_IN;
                let is_target = !is_first_three
                    && if n == 0 {
                        letter == zero_letter
                    } else {
                        letter == letters[idx - n]
                    };
                Trial {
                    task: TaskKind::NBack,
                    block_type: self.block_type,
                    block,
                    stimulus: Stimulus::Letter {
                        letter,
                        is_target,
                        is_first_three,
                    },
                    timing: TrialTiming {
                        trial_duration_ms: 2500,
                        stimulus_duration_ms: Some(500),
                        choices: vec!['y', 'n'],
                    },
                }
            })
            .collect();
        Ok(trials)
    }

    fn correct(&self, trial: &Trial, response: char) -> bool {
        match trial.stimulus {
            Stimulus::Letter { is_target, .. } => response.to_ascii_lowercase() == if is_target { 'y' } else { 'n' },
            _ => false,
        }
    }
}
