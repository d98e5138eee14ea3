//! Block and session runner.
//!
//! Drives [`TrialController`] from a single-threaded event loop. Each loop
//! iteration handles exactly one event source in priority order: countdown
//! expiry, clock tick, scheduled opponent move, player input.

use std::time::Duration;

use puzzle_core::{EloAdjuster, EloBucketIndex, MoveSpec, ShakmatyRules};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shakmaty::Color;
use tokio::sync::mpsc;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::controller::{TerminalKind, TrialController, TrialEvent, TrialOutcome, Transition};
use crate::error::TrialError;
use crate::export::{BlockExport, Exporter, TrialRecord};
use crate::telemetry::{marker_for, Marker, MarkerSink, MarkerStatus, Telemetry};
use crate::timer::CountdownTimer;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// Correct intermediate move.
    Correct,
    /// Illegal move, piece snapped back.
    Illegal,
    Solved,
    Failed,
    Timeout,
}

impl From<TerminalKind> for Highlight {
    fn from(kind: TerminalKind) -> Self {
        match kind {
            TerminalKind::Solved => Highlight::Solved,
            TerminalKind::Failed => Highlight::Failed,
            TerminalKind::TimedOut => Highlight::Timeout,
        }
    }
}

/// Whatever shows the board to the subject. Every hook defaults to a no-op.
pub trait BoardView {
    fn block_started(&mut self, _block: u32) {}

    fn rest_clock(&mut self, _remaining: u32) {}

    fn position(&mut self, _fen: &str, _side_to_move: Color, _player: Color) {}

    fn clock(&mut self, _remaining: u32) {}

    fn highlight(&mut self, _highlight: Highlight) {}
}

/// Headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoView;

impl BoardView for NoView {}

#[derive(Debug, Clone)]
pub struct BlockSummary {
    pub export: BlockExport,
    /// Whether the export POST succeeded.
    pub delivered: bool,
}

pub struct Session<V: BoardView = NoView> {
    config: Config,
    index: EloBucketIndex,
    subject_id: String,
    telemetry: Telemetry,
    exporter: Option<Exporter>,
    view: V,
    rng: StdRng,
    elo: EloAdjuster,
    rating: i32,
}

impl Session<NoView> {
    pub fn new(config: Config, index: EloBucketIndex) -> Self {
        let subject_id = Uuid::new_v4().simple().to_string()[..8].to_string();
        let rating = config.start_rating;
        Self {
            config,
            index,
            subject_id,
            telemetry: Telemetry::new(),
            exporter: None,
            view: NoView,
            rng: StdRng::from_os_rng(),
            elo: EloAdjuster::default(),
            rating,
        }
    }
}

impl<V: BoardView> Session<V> {
    pub fn with_view<W: BoardView>(self, view: W) -> Session<W> {
        Session {
            config: self.config,
            index: self.index,
            subject_id: self.subject_id,
            telemetry: self.telemetry,
            exporter: self.exporter,
            view,
            rng: self.rng,
            elo: self.elo,
            rating: self.rating,
        }
    }

    pub fn with_sink(mut self, sink: impl MarkerSink + 'static) -> Self {
        self.telemetry = self.telemetry.with_sink(sink);
        self
    }

    pub fn with_exporter(mut self, exporter: Exporter) -> Self {
        self.exporter = Some(exporter);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_subject_id(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = subject_id.into();
        self
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn rating(&self) -> i32 {
        self.rating
    }

    pub fn index(&self) -> &EloBucketIndex {
        &self.index
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Run every configured block. Stops early when a rating bucket runs dry.
    pub async fn run(&mut self, input: &mut mpsc::Receiver<MoveSpec>) -> Result<Vec<BlockSummary>, TrialError> {
        info!(subject_id = %self.subject_id, blocks = self.config.num_blocks, "Session started");
        let mut blocks = Vec::new();
        for block in 0..self.config.num_blocks {
            blocks.push(self.run_block(block, input).await?);
        }
        info!(subject_id = %self.subject_id, "Session finished");
        Ok(blocks)
    }

    /// Rest, the block's trials, then one export.
    ///
    /// A trial error still exports whatever the block collected before it
    /// is returned.
    pub async fn run_block(
        &mut self,
        block: u32,
        input: &mut mpsc::Receiver<MoveSpec>,
    ) -> Result<BlockSummary, TrialError> {
        self.rating = self.config.start_rating;
        self.telemetry
            .emit(Marker::new(MarkerStatus::BlockStarted).with("BLOCK", block));
        self.view.block_started(block);

        self.rest().await;

        let mut trials = Vec::new();
        let mut failure = None;
        for trial_index in 0..self.config.trials_per_block {
            match self.run_trial(block, trial_index, input).await {
                Ok(record) => trials.push(record),
                Err(e) => {
                    warn!(block, trial_index, error = %e, "Block stopped early");
                    failure = Some(e);
                    break;
                }
            }
        }

        self.telemetry
            .emit(Marker::new(MarkerStatus::BlockEnded).with("BLOCK", block));

        let export = BlockExport {
            subject_id: self.subject_id.clone(),
            block,
            exported_at: chrono::Utc::now(),
            trials,
            events: self.telemetry.take_events(),
        };
        let delivered = self.deliver(&export).await;

        match failure {
            Some(e) => Err(e),
            None => Ok(BlockSummary { export, delivered }),
        }
    }

    async fn deliver(&self, export: &BlockExport) -> bool {
        let Some(exporter) = &self.exporter else {
            return false;
        };
        match exporter.send(export).await {
            Ok(()) => {
                info!(block = export.block, trials = export.trials.len(), "Block exported");
                true
            }
            Err(e) => {
                warn!(block = export.block, url = exporter.url(), error = %e, "Block export failed");
                false
            }
        }
    }

    /// The break screen before a block.
    pub async fn rest(&mut self) {
        self.telemetry.emit(Marker::new(MarkerStatus::RestLoaded));
        let seconds = whole_seconds(self.config.rest_length);
        self.view.rest_clock(seconds);

        let (mut timer, mut clock_rx, mut expiry_rx) = countdown(seconds);
        let mut ticker = interval_at(Instant::now() + TICK, TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = expiry_rx.recv() => break,
                _ = ticker.tick() => {
                    timer.tick();
                    while let Ok(remaining) = clock_rx.try_recv() {
                        self.view.rest_clock(remaining);
                    }
                }
            }
        }

        self.telemetry.emit(Marker::new(MarkerStatus::RestEnded));
    }

    /// Draw a puzzle at the current rating and play it to a terminal state.
    pub async fn run_trial(
        &mut self,
        block: u32,
        trial_index: u32,
        input: &mut mpsc::Receiver<MoveSpec>,
    ) -> Result<TrialRecord, TrialError> {
        // Moves typed during feedback or rest belong to no puzzle.
        while input.try_recv().is_ok() {}

        let mut trial = TrialController::select(&self.index, self.rating, ShakmatyRules, &mut self.rng)?;
        let started = Instant::now();

        self.telemetry.emit(
            Marker::new(MarkerStatus::PuzzleLoaded)
                .with("ELO", self.rating)
                .with("PUZZLE", trial.puzzle_id())
                .with("FEN", trial.fen()),
        );
        self.view
            .position(&trial.fen(), trial.side_to_move(), trial.player_side());

        let seconds = whole_seconds(self.config.trial_length);
        self.view.clock(seconds);
        let (mut timer, mut clock_rx, mut expiry_rx) = countdown(seconds);
        let mut ticker = interval_at(Instant::now() + TICK, TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let opponent = sleep(self.config.opponent_delay);
        tokio::pin!(opponent);
        let mut opponent_pending = true;
        let mut input_open = true;

        let outcome: TrialOutcome = loop {
            let event = tokio::select! {
                biased;
                Some(()) = expiry_rx.recv() => TrialEvent::Timeout,
                _ = ticker.tick() => {
                    timer.tick();
                    while let Ok(remaining) = clock_rx.try_recv() {
                        self.view.clock(remaining);
                    }
                    continue;
                }
                _ = &mut opponent, if opponent_pending => {
                    opponent_pending = false;
                    TrialEvent::OpponentMoveDue
                }
                received = input.recv(), if input_open => match received {
                    Some(mv) => TrialEvent::PlayerMove(mv),
                    None => {
                        // Abandoned: let the countdown run out.
                        input_open = false;
                        continue;
                    }
                },
            };

            let transition = trial.handle(event)?;
            if let Some(marker) = marker_for(&transition, self.rating) {
                self.telemetry.emit(marker);
            }

            match transition {
                Transition::Ignored => {}
                Transition::OpponentMoved { fen, .. } => {
                    self.view.position(&fen, trial.side_to_move(), trial.player_side());
                }
                Transition::Snapback { .. } => self.view.highlight(Highlight::Illegal),
                Transition::CorrectMove { fen, .. } => {
                    self.view.position(&fen, trial.side_to_move(), trial.player_side());
                    self.view.highlight(Highlight::Correct);
                    opponent.as_mut().reset(Instant::now() + self.config.opponent_delay);
                    opponent_pending = true;
                }
                Transition::Finished { kind, outcome, .. } => {
                    self.view
                        .position(&outcome.final_position_fen, trial.side_to_move(), trial.player_side());
                    self.view.highlight(kind.into());
                    break outcome;
                }
            }
        };
        timer.cancel();
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        sleep(self.config.feedback_delay).await;

        let puzzle = self.index.resolve(trial.key(), outcome.resolution())?.summary();

        let elo_before = self.rating;
        self.rating = self.elo.update(self.rating, outcome.solved);
        self.telemetry
            .emit(Marker::new(MarkerStatus::TrialEnded).with("TRIAL", trial_index));

        info!(
            puzzle_id = %outcome.puzzle_id,
            solved = outcome.solved,
            timed_out = outcome.timed_out,
            elo_before,
            elo = self.rating,
            "Trial finished"
        );

        Ok(TrialRecord {
            subject_id: self.subject_id.clone(),
            block,
            trial_index,
            elo_before,
            elo_after: self.rating,
            duration_ms,
            puzzle,
            outcome,
        })
    }
}

/// A started countdown whose callbacks report through channels.
fn countdown(seconds: u32) -> (CountdownTimer, mpsc::UnboundedReceiver<u32>, mpsc::UnboundedReceiver<()>) {
    let (clock_tx, clock_rx) = mpsc::unbounded_channel();
    let (expiry_tx, expiry_rx) = mpsc::unbounded_channel();
    let mut timer = CountdownTimer::new();
    timer.start(
        seconds,
        move |remaining| {
            let _ = clock_tx.send(remaining);
        },
        move || {
            let _ = expiry_tx.send(());
        },
    );
    (timer, clock_rx, expiry_rx)
}

fn whole_seconds(duration: Duration) -> u32 {
    u32::try_from(duration.as_secs()).unwrap_or(u32::MAX)
}
