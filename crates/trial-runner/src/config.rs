//! Session configuration from environment variables

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Path to the mate puzzle CSV
    pub corpus_path: String,

    /// Base URL of the collection endpoint that receives block exports
    pub export_url: String,

    pub num_blocks: u32,
    pub trials_per_block: u32,

    /// Countdown per puzzle
    pub trial_length: Duration,

    /// Rest countdown before each block
    pub rest_length: Duration,

    /// Rating every block starts from
    pub start_rating: i32,

    /// Pause before each scripted opponent move
    pub opponent_delay: Duration,

    /// How long the terminal highlight stays up after a puzzle ends
    pub feedback_delay: Duration,

    pub demo_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_path: "assets/matein_sample.csv".to_string(),
            export_url: "http://localhost:8001".to_string(),
            num_blocks: 1,
            trials_per_block: 5,
            trial_length: Duration::from_secs(30),
            rest_length: Duration::from_secs(10),
            start_rating: puzzle_core::elo::START_RATING,
            opponent_delay: Duration::from_millis(1000),
            feedback_delay: Duration::from_millis(1000),
            demo_mode: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Missing keys fall back to defaults, bad
    /// values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let demo_mode = parse_key(&lookup, "DEMO_MODE", true)?;
        // Full runs use the longer experiment schedule.
        let (default_trials, default_rest) = if demo_mode { (5, 10) } else { (30, 30) };

        Ok(Self {
            corpus_path: lookup("CORPUS_PATH").unwrap_or_else(|| "assets/matein_sample.csv".to_string()),
            export_url: lookup("EXPORT_URL").unwrap_or_else(|| "http://localhost:8001".to_string()),
            num_blocks: parse_key(&lookup, "NUM_BLOCKS", 1)?,
            trials_per_block: parse_key(&lookup, "TRIALS_PER_BLOCK", default_trials)?,
            trial_length: Duration::from_secs(parse_key(&lookup, "TRIAL_LENGTH_SECS", 30)?),
            rest_length: Duration::from_secs(parse_key(&lookup, "REST_LENGTH_SECS", default_rest)?),
            start_rating: parse_key(&lookup, "START_RATING", puzzle_core::elo::START_RATING)?,
            opponent_delay: Duration::from_millis(parse_key(&lookup, "OPPONENT_DELAY_MS", 1000)?),
            feedback_delay: Duration::from_millis(parse_key(&lookup, "FEEDBACK_DELAY_MS", 1000)?),
            demo_mode,
        })
    }
}

fn parse_key<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
