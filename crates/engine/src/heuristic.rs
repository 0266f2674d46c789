//! Hand-tuned board evaluator
//!
//! Linear in four surface features, with the weights commonly used by
//! simple greedy bots. Deterministic, so tests and the demo binary can use
//! it where a trained model would normally sit.

use turbostack_core::Board;

use crate::evaluator::CoreBoardEvaluator;

const AGGREGATE_HEIGHT: f64 = -0.510066;
const LINES: f64 = 0.760666;
const HOLES: f64 = -0.35663;
const BUMPINESS: f64 = -0.184483;
const SCORE: f64 = 0.001;

/// Empty cells below the top of their column.
pub fn holes(board: &Board) -> u32 {
    (0..board.heights().len())
        .map(|j| {
            let column = board.column(j);
            column.height() as u32 - column.bits().count_ones()
        })
        .sum()
}

/// Sum of height differences between neighbouring columns.
pub fn bumpiness(board: &Board) -> u32 {
    board
        .heights()
        .windows(2)
        .map(|w| w[0].abs_diff(w[1]) as u32)
        .sum()
}

pub fn aggregate_height(board: &Board) -> u32 {
    board.heights().iter().map(|&h| h as u32).sum()
}

/// Score one board. Finished boards score negative infinity.
pub fn evaluate(board: &Board) -> f64 {
    if board.finished() && board.lines_remaining() > 0 {
        return f64::NEG_INFINITY;
    }

    AGGREGATE_HEIGHT * aggregate_height(board) as f64
        + LINES * board.lines_cleared() as f64
        + HOLES * holes(board) as f64
        + BUMPINESS * bumpiness(board) as f64
        + SCORE * board.score() as f64
}

/// [`evaluate`] as a batch evaluator.
pub fn evaluator() -> impl CoreBoardEvaluator {
    |boards: Vec<Board>| -> anyhow::Result<Vec<f64>> {
        Ok(boards.iter().map(evaluate).collect())
    }
}
