//! Block export: one JSON document per block, sent as a single POST.

use chrono::{DateTime, Utc};
use puzzle_core::PuzzleSummary;
use reqwest::Client;
use serde::Serialize;

use crate::controller::TrialOutcome;
use crate::error::ExportTransmissionError;
use crate::telemetry::MarkerEvent;

#[derive(Debug, Clone, Serialize)]
pub struct TrialRecord {
    pub subject_id: String,
    pub block: u32,
    pub trial_index: u32,
    pub elo_before: i32,
    pub elo_after: i32,
    pub duration_ms: u64,
    pub puzzle: PuzzleSummary,
    pub outcome: TrialOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockExport {
    pub subject_id: String,
    pub block: u32,
    pub exported_at: DateTime<Utc>,
    pub trials: Vec<TrialRecord>,
    pub events: Vec<MarkerEvent>,
}

pub struct Exporter {
    client: Client,
    url: String,
}

impl Exporter {
    pub fn new(url: impl Into<String>) -> Result<Self, ExportTransmissionError> {
        let client = Client::builder()
            .user_agent("MateTrials/0.1")
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST the block once. The caller logs failures; nothing is retried.
    pub async fn send(&self, export: &BlockExport) -> Result<(), ExportTransmissionError> {
        let resp = self.client.post(&self.url).json(export).send().await?;

        if !resp.status().is_success() {
            return Err(ExportTransmissionError::Status {
                status: resp.status().as_u16(),
            });
        }
        Ok(())
    }
}
