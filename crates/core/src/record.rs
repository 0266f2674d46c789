//! Record module - compact string and structured record forms of a board
//!
//! The compact form is 200 characters, one per cell in row-major order,
//! `'1'` for filled and `'0'` for empty. The record pairs it with the
//! counters and serializes with camelCase field names:
//!
//! ```json
//! {"compact":"000…","linesCleared":0,"linesClearedMax":130,"finished":false,"score":0,"tetrises":0}
//! ```

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{CoreError, CoreResult};
use crate::types::{BOARD_WIDTH, COMPACT_LEN};

/// Serializable snapshot of a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardRecord {
    pub compact: String,
    pub lines_cleared: u32,
    pub lines_cleared_max: u32,
    pub finished: bool,
    pub score: u32,
    pub tetrises: u32,
}

impl Board {
    pub fn to_compact_string(&self) -> String {
        let width = BOARD_WIDTH as usize;
        (0..COMPACT_LEN)
            .map(|x| if self.get(x / width, x % width) { '1' } else { '0' })
            .collect()
    }

    /// Parse the compact form onto a fresh board with zeroed counters.
    pub fn from_compact(lines_cleared_max: u32, s: &str) -> CoreResult<Self> {
        Self::from_compact_into(Board::new(lines_cleared_max), s)
    }

    fn from_compact_into(mut board: Board, s: &str) -> CoreResult<Self> {
        let width = BOARD_WIDTH as usize;
        let len = s.chars().count();
        if len != COMPACT_LEN {
            return Err(CoreError::ParseCompact {
                message: format!("expected {COMPACT_LEN} cells, found {len}"),
            });
        }

        for (x, c) in s.chars().enumerate() {
            match c {
                '1' => board.set(x / width, x % width, true),
                '0' => {}
                other => {
                    return Err(CoreError::ParseCompact {
                        message: format!("unexpected {other:?} at cell {x}"),
                    })
                }
            }
        }

        Ok(board)
    }

    pub fn to_record(&self) -> BoardRecord {
        BoardRecord {
            compact: self.to_compact_string(),
            lines_cleared: self.lines_cleared(),
            lines_cleared_max: self.lines_cleared_max(),
            finished: self.finished(),
            score: self.score(),
            tetrises: self.tetrises(),
        }
    }

    pub fn from_record(record: &BoardRecord) -> CoreResult<Self> {
        let board = Board::with_counters(
            record.lines_cleared_max,
            record.lines_cleared,
            record.finished,
            record.score,
            record.tetrises,
        );
        Self::from_compact_into(board, &record.compact)
    }
}

impl From<Board> for BoardRecord {
    fn from(board: Board) -> Self {
        board.to_record()
    }
}

impl TryFrom<BoardRecord> for Board {
    type Error = CoreError;

    fn try_from(record: BoardRecord) -> Result<Self, Self::Error> {
        Board::from_record(&record)
    }
}
