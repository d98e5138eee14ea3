//! Trial runner error types

use puzzle_core::{ExhaustedPoolError, InvalidFenError, ResolveError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrialError {
    #[error(transparent)]
    ExhaustedPool(#[from] ExhaustedPoolError),

    #[error("puzzle {id} has an unusable starting position: {source}")]
    Position {
        id: String,
        #[source]
        source: InvalidFenError,
    },

    #[error("puzzle {id}: scripted move {mv} at ply {ply} is illegal")]
    ScriptRejected { id: String, ply: usize, mv: String },

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Configuration error: {key} has invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// A marker could not be delivered to a sink. Never fatal.
#[derive(Error, Debug)]
pub enum DeviceTelemetryError {
    #[error("telemetry sink disconnected")]
    Disconnected,

    #[error("telemetry sink rejected marker: {0}")]
    Rejected(String),
}

/// The block export POST failed. Logged by the caller, never retried.
#[derive(Error, Debug)]
pub enum ExportTransmissionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("export endpoint answered {status}")]
    Status { status: u16 },
}
