//! Evaluator seam
//!
//! The engine never knows what produces a score. Anything that maps an
//! ordered list of boards to an equally long list of scores will do, and
//! it is always called through a [`BatchProcessor`] so concurrent callers
//! share flushes.

use turbostack_batch::{BatchConfig, BatchProcessor};
use turbostack_core::Board;

/// Scores a batch of boards, element for element.
pub trait CoreBoardEvaluator:
    Fn(Vec<Board>) -> anyhow::Result<Vec<f64>> + Send + Sync + 'static
{
}

impl<F> CoreBoardEvaluator for F where
    F: Fn(Vec<Board>) -> anyhow::Result<Vec<f64>> + Send + Sync + 'static
{
}

/// Scheduler over boards.
pub type BoardScorer = BatchProcessor<Board, f64>;

/// Put a synchronous evaluator behind the batching scheduler.
pub fn batched<E: CoreBoardEvaluator>(config: BatchConfig, evaluator: E) -> BoardScorer {
    BatchProcessor::new(config, evaluator)
}
