//! Adaptive mate-in-X trial runner: the per-puzzle state machine, the
//! countdown, telemetry markers, block export and the session loop.

pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod input;
pub mod session;
pub mod telemetry;
pub mod timer;

pub use config::Config;
pub use controller::{TerminalKind, TrialController, TrialEvent, TrialOutcome, TrialState, Transition};
pub use error::{ConfigError, DeviceTelemetryError, ExportTransmissionError, TrialError};
pub use export::{BlockExport, Exporter, TrialRecord};
pub use session::{BlockSummary, BoardView, Highlight, NoView, Session};
pub use telemetry::{marker_for, EventLog, Marker, MarkerEvent, MarkerSink, MarkerStatus, Telemetry, TracingSink};
pub use timer::{clock_label, CountdownTimer, TimerStatus};
