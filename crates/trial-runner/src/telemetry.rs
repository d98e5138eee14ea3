//! Status markers injected into the recording stream.
//!
//! A marker renders as `STATUS: <status>; KEY: value; ...`. Delivery is
//! fire-and-forget: a failing sink is logged and the trial carries on.

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use crate::controller::{TerminalKind, Transition};
use crate::error::DeviceTelemetryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStatus {
    BlockStarted,
    BlockEnded,
    RestLoaded,
    RestEnded,
    PuzzleLoaded,
    OpponentMoved,
    IllegalMove,
    CorrectMove,
    PuzzleFinished,
    TrialEnded,
}

impl MarkerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MarkerStatus::BlockStarted => "block_started",
            MarkerStatus::BlockEnded => "block_ended",
            MarkerStatus::RestLoaded => "rest_loaded",
            MarkerStatus::RestEnded => "rest_ended",
            MarkerStatus::PuzzleLoaded => "puzzle_loaded",
            MarkerStatus::OpponentMoved => "opponent_moved",
            MarkerStatus::IllegalMove => "illegal_move",
            MarkerStatus::CorrectMove => "correct_move",
            MarkerStatus::PuzzleFinished => "puzzle_finished",
            MarkerStatus::TrialEnded => "trial_ended",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    status: MarkerStatus,
    fields: Vec<(&'static str, String)>,
}

impl Marker {
    pub fn new(status: MarkerStatus) -> Self {
        Self {
            status,
            fields: Vec::new(),
        }
    }

    pub fn with(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.fields.push((key, value.to_string()));
        self
    }

    pub fn status(&self) -> MarkerStatus {
        self.status
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "STATUS: {}", self.status.as_str())?;
        for (key, value) in &self.fields {
            write!(f, "; {key}: {value}")?;
        }
        Ok(())
    }
}

/// Marker for a controller transition, `None` for ignored events.
pub fn marker_for(transition: &Transition, elo: i32) -> Option<Marker> {
    let marker = match transition {
        Transition::Ignored => return None,
        Transition::OpponentMoved { mv, ply, fen } => Marker::new(MarkerStatus::OpponentMoved)
            .with("SOURCE", mv.from())
            .with("TARGET", mv.to())
            .with("MOVE_NUM", ply)
            .with("FEN", fen),
        Transition::Snapback { mv, ply, fen } => Marker::new(MarkerStatus::IllegalMove)
            .with("RESULT", "snapback")
            .with("SOURCE", mv.from())
            .with("TARGET", mv.to())
            .with("MOVE_NUM", ply)
            .with("FEN", fen),
        Transition::CorrectMove { mv, ply, capture, fen } => Marker::new(MarkerStatus::CorrectMove)
            .with("RESULT", if *capture { "capture" } else { "move" })
            .with("SOURCE", mv.from())
            .with("TARGET", mv.to())
            .with("MOVE_NUM", ply)
            .with("FEN", fen),
        Transition::Finished { kind, mv, ply, outcome } => {
            let marker = Marker::new(MarkerStatus::PuzzleFinished).with("RESULT", kind.as_str());
            match (kind, mv) {
                (TerminalKind::TimedOut, _) | (_, None) => marker,
                (_, Some(mv)) => marker
                    .with("SOURCE", mv.from())
                    .with("TARGET", mv.to())
                    .with("MOVE_NUM", ply)
                    .with("FEN", &outcome.final_position_fen),
            }
        }
    };
    Some(marker.with("ELO", elo))
}

pub trait MarkerSink: Send {
    fn inject(&mut self, marker: &Marker) -> Result<(), DeviceTelemetryError>;
}

/// Logs every marker at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl MarkerSink for TracingSink {
    fn inject(&mut self, marker: &Marker) -> Result<(), DeviceTelemetryError> {
        info!(status = marker.status().as_str(), "{marker}");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerEvent {
    pub timestamp_ms: i64,
    pub marker: String,
}

/// Timestamped markers kept for the block export.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<MarkerEvent>,
}

impl EventLog {
    pub fn events(&self) -> &[MarkerEvent] {
        &self.events
    }

    pub fn take(&mut self) -> Vec<MarkerEvent> {
        std::mem::take(&mut self.events)
    }
}

impl MarkerSink for EventLog {
    fn inject(&mut self, marker: &Marker) -> Result<(), DeviceTelemetryError> {
        self.events.push(MarkerEvent {
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            marker: marker.to_string(),
        });
        Ok(())
    }
}

/// Fans markers out to the event log and every attached sink.
#[derive(Default)]
pub struct Telemetry {
    log: EventLog,
    sinks: Vec<Box<dyn MarkerSink>>,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: impl MarkerSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn emit(&mut self, marker: Marker) {
        // The in-memory log cannot fail.
        let _ = self.log.inject(&marker);
        for sink in &mut self.sinks {
            if let Err(e) = sink.inject(&marker) {
                warn!(status = marker.status().as_str(), error = %e, "Marker not delivered");
            }
        }
    }

    pub fn events(&self) -> &[MarkerEvent] {
        self.log.events()
    }

    /// Hand the collected events to the block export and start afresh.
    pub fn take_events(&mut self) -> Vec<MarkerEvent> {
        self.log.take()
    }
}
