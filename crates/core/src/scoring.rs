//! Scoring module - points awarded for line clears
//!
//! Classic table with no level multiplier:
//! 1 line = 40, 2 = 100, 3 = 300, 4 (tetris) = 1200.

use crate::error::{CoreError, CoreResult};
use crate::types::LINE_SCORES;

/// Points for clearing `lines` rows in a single pass.
///
/// A single piece can never complete more than four rows, so anything above
/// that means the board was corrupted upstream.
pub fn line_clear_score(lines: usize) -> CoreResult<u32> {
    LINE_SCORES
        .get(lines)
        .copied()
        .ok_or(CoreError::TooManyClears { rows: lines })
}

/// Average points per cleared line, 0 before the first clear.
pub fn efficiency(score: u32, lines_cleared: u32) -> u32 {
    if lines_cleared == 0 {
        return 0;
    }
    ((score as f64) / (lines_cleared as f64)).round() as u32
}
