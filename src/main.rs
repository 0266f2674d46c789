//! Headless demo runner (default binary).
//!
//! Plays one greedy game with the built-in heuristic, scored through the
//! batching scheduler, and prints the final board. Configuration comes from
//! the environment; log level from `RUST_LOG`.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use turbostack::batch::BatchConfig;
use turbostack::engine::{batched, heuristic, Autoplayer, EngineConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let engine_config = EngineConfig::from_env();
    let batch_config = BatchConfig::from_env();
    tracing::info!(?engine_config, ?batch_config, "starting game");

    let scorer = batched(batch_config, heuristic::evaluator());
    let mut player = Autoplayer::new(&engine_config, scorer);
    let summary = player.play().await?;

    println!("{}", player.board());
    println!(
        "moves: {}  lines: {}  score: {}  tetrises: {}",
        summary.moves, summary.lines_cleared, summary.score, summary.tetrises
    );
    Ok(())
}
