//! Engine - drives games on top of the core board and the batching scheduler
//!
//! # Module Structure
//!
//! - [`evaluator`]: the board evaluator seam and its batched form
//! - [`heuristic`]: a deterministic hand-tuned evaluator
//! - [`autoplay`]: greedy game loop
//! - [`preview`]: pointer-driven placement preview
//! - [`config`]: environment configuration
//! - [`error`]: internal errors vs. unavailable evaluation
//!
//! # Example
//!
//! ```
//! use turbostack_batch::BatchConfig;
//! use turbostack_engine::{batched, heuristic, Autoplayer, EngineConfig};
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! rt.block_on(async {
//!     let config = EngineConfig { max_moves: Some(5), ..EngineConfig::default() };
//!     let scorer = batched(BatchConfig::default(), heuristic::evaluator());
//!     let mut player = Autoplayer::new(&config, scorer);
//!
//!     let summary = player.play().await.unwrap();
//!     assert!(summary.moves <= 5);
//! });
//! ```

pub mod autoplay;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod heuristic;
pub mod preview;

pub use autoplay::{Autoplayer, GameSummary, StepOutcome};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use evaluator::{batched, BoardScorer, CoreBoardEvaluator};
pub use preview::{center_of_mass, closest_choice, Point};
