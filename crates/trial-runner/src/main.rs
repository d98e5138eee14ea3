//! Terminal mate-in-X trials
//!
//! Loads the puzzle corpus, reads moves from stdin as UCI tokens and runs the
//! configured blocks, posting one export per block.

mod console;

use anyhow::Context;
use puzzle_core::{load_corpus_file, EloBucketIndex};
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{error, info};

use trial_runner::input::read_moves;
use trial_runner::{Config, Exporter, Session, TracingSink};

use crate::console::ConsoleView;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Load .env file for local dev
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    info!(corpus = %config.corpus_path, export_url = %config.export_url, demo = config.demo_mode, "Starting trial runner");

    let corpus = load_corpus_file(&config.corpus_path)?;
    let index = EloBucketIndex::build(corpus.puzzles);
    if index.is_empty() {
        anyhow::bail!("no usable puzzles in {}", config.corpus_path);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    let result = runtime.block_on(run(config, index));
    // stdin's blocking read would otherwise hold up shutdown.
    runtime.shutdown_background();
    result
}

async fn run(config: Config, index: EloBucketIndex) -> anyhow::Result<()> {
    let exporter = Exporter::new(config.export_url.clone())?;

    let (tx, mut rx) = mpsc::channel(16);
    tokio::spawn(async move {
        if let Err(e) = read_moves(BufReader::new(tokio::io::stdin()), tx).await {
            error!(error = %e, "Failed to read stdin");
        }
    });

    let mut session = Session::new(config, index)
        .with_view(ConsoleView)
        .with_sink(TracingSink)
        .with_exporter(exporter);
    println!("Subject {}. Find the mate; enter moves like e2e4.", session.subject_id());

    let blocks = session.run(&mut rx).await?;

    for block in &blocks {
        let solved = block.export.trials.iter().filter(|t| t.outcome.solved).count();
        println!(
            "Block {}: {solved}/{} solved, export {}",
            block.export.block + 1,
            block.export.trials.len(),
            if block.delivered { "sent" } else { "not sent" }
        );
    }
    println!("This session has concluded. Final rating {}.", session.rating());
    Ok(())
}
