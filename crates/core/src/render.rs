//! Text rendering of boards
//!
//! ```text
//! Board [
//!    ....................
//!   |                    |
//!   |        []          |
//!   \--------------------/
//!
//!   lines: 0/130
//!   score: 0
//!   eff  : 0
//!   trt  : 0.0%
//! ]
//! ```

use std::fmt;

use crate::board::Board;
use crate::scoring::efficiency;
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

fn write_header(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Board [")?;
    writeln!(f, "   ....................")
}

fn write_footer(f: &mut fmt::Formatter<'_>, board: &Board) -> fmt::Result {
    writeln!(f, "  \\--------------------/")?;
    writeln!(f)?;
    writeln!(f, "  lines: {}/{}", board.lines_cleared(), board.lines_cleared_max())?;
    writeln!(f, "  score: {}", board.score())?;
    writeln!(f, "  eff  : {}", efficiency(board.score(), board.lines_cleared()))?;
    writeln!(f, "  trt  : {:.1}%", board.tetris_rate() * 100.0)?;
    write!(f, "]")
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_header(f)?;
        for i in 0..BOARD_HEIGHT as usize {
            write!(f, "  |")?;
            for j in 0..BOARD_WIDTH as usize {
                f.write_str(if self.get(i, j) { "[]" } else { "  " })?;
            }
            writeln!(f, "|")?;
        }
        write_footer(f, self)
    }
}

/// A board drawn against its predecessor: `##` for added cells, `--` for
/// cells that disappeared (cleared lines).
pub struct BoardDiff<'a> {
    board: &'a Board,
    prev: &'a Board,
}

impl Board {
    pub fn diff<'a>(&'a self, prev: &'a Board) -> BoardDiff<'a> {
        BoardDiff { board: self, prev }
    }
}

impl fmt::Display for BoardDiff<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_header(f)?;
        for i in 0..BOARD_HEIGHT as usize {
            write!(f, "  |")?;
            for j in 0..BOARD_WIDTH as usize {
                let cell = match (self.board.get(i, j), self.prev.get(i, j)) {
                    (true, false) => "##",
                    (false, true) => "--",
                    (true, true) => "[]",
                    (false, false) => "  ",
                };
                f.write_str(cell)?;
            }
            writeln!(f, "|")?;
        }
        write_footer(f, self.board)
    }
}
