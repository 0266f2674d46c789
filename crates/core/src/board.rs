//! Board module - bit-packed 10x20 occupancy grid
//!
//! The grid is stored twice: once as 20 row masks and once as 10 column
//! masks. Row masks make full-line detection a single compare; column masks
//! make stack height a `leading_zeros`. Every mutator writes both views in
//! the same call, so `rows[i].get(j) == cols[j].get(i)` always holds.
//!
//! Coordinates: `(i, j)` where `i` is the row (0 = top, 19 = bottom) and `j`
//! is the column (0 = left, 9 = right).

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::pieces::{CellPos, Piece};
use crate::record::BoardRecord;
use crate::scoring::line_clear_score;
use crate::types::{
    BOARD_HEIGHT, BOARD_WIDTH, CEILING_ROWS, DEFAULT_LINES_CLEARED_MAX, TETRIS_LINES,
};

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// Upper bound on rest positions across the whole board.
pub const MAX_REST_POSITIONS: usize = WIDTH * HEIGHT;

/// One row: bit `9 - j` is column `j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoardRow(u16);

impl BoardRow {
    const FULL: u16 = (1 << WIDTH) - 1;

    #[inline(always)]
    fn bit(j: usize) -> u16 {
        1 << (WIDTH - 1 - j)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn full(self) -> bool {
        self.0 == Self::FULL
    }

    pub fn get(self, j: usize) -> bool {
        self.0 & Self::bit(j) != 0
    }

    pub fn set(&mut self, j: usize, value: bool) {
        if value {
            self.0 |= Self::bit(j);
        } else {
            self.0 &= !Self::bit(j);
        }
    }

    pub fn flip(&mut self, j: usize) {
        self.0 ^= Self::bit(j);
    }
}

/// One column: bit `19 - i` is row `i`, so the topmost filled cell is the
/// highest set bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoardColumn(u32);

impl BoardColumn {
    #[inline(always)]
    fn bit(i: usize) -> u32 {
        1 << (HEIGHT - 1 - i)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn get(self, i: usize) -> bool {
        self.0 & Self::bit(i) != 0
    }

    pub fn set(&mut self, i: usize, value: bool) {
        if value {
            self.0 |= Self::bit(i);
        } else {
            self.0 &= !Self::bit(i);
        }
    }

    pub fn flip(&mut self, i: usize) {
        self.0 ^= Self::bit(i);
    }

    /// Rows from the topmost filled cell down to the floor, 0 when empty.
    pub fn height(self) -> u8 {
        (u32::BITS - self.0.leading_zeros()) as u8
    }

    /// Row index of the topmost filled cell, `BOARD_HEIGHT` when empty.
    pub fn top(self) -> u8 {
        BOARD_HEIGHT - self.height()
    }

    /// Drop row `i`: rows above it move down one, rows below are kept.
    pub fn remove_row(&mut self, i: usize) {
        let below = Self::bit(i) - 1;
        let shifted = self.0 >> 1;
        self.0 = (!below & shifted) | (below & self.0);
    }

    /// Rows where a single falling cell would come to rest in this column.
    ///
    /// The cell on top of the stack (or the floor when empty) comes first,
    /// followed by any empty cell under the stack that sits on a filled cell
    /// or the floor.
    pub fn rest_rows(self) -> ArrayVec<u8, HEIGHT> {
        let height = self.height() as usize;
        let mut rows = ArrayVec::new();

        if height < HEIGHT {
            rows.push((HEIGHT - 1 - height) as u8);
        }

        // Solid from the top down to the floor.
        if self.0 == (1u32 << height) - 1 {
            return rows;
        }

        for i in (HEIGHT + 1 - height)..HEIGHT {
            if !self.get(i) && (i == HEIGHT - 1 || self.get(i + 1)) {
                rows.push(i as u8);
            }
        }

        rows
    }
}

/// Game board: occupancy plus line, score and termination counters.
///
/// Boards are plain values. Search results are independent clones; clone
/// before mutating a board someone else holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BoardRecord", try_from = "BoardRecord")]
pub struct Board {
    rows: [BoardRow; HEIGHT],
    cols: [BoardColumn; WIDTH],
    lines_cleared: u32,
    lines_cleared_max: u32,
    finished: bool,
    score: u32,
    tetrises: u32,
}

impl Board {
    /// Create a new empty board that finishes after `lines_cleared_max` lines.
    pub fn new(lines_cleared_max: u32) -> Self {
        Self {
            rows: [BoardRow::default(); HEIGHT],
            cols: [BoardColumn::default(); WIDTH],
            lines_cleared: 0,
            lines_cleared_max,
            finished: false,
            score: 0,
            tetrises: 0,
        }
    }

    pub(crate) fn with_counters(
        lines_cleared_max: u32,
        lines_cleared: u32,
        finished: bool,
        score: u32,
        tetrises: u32,
    ) -> Self {
        Self {
            lines_cleared,
            finished,
            score,
            tetrises,
            ..Self::new(lines_cleared_max)
        }
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn lines_cleared_max(&self) -> u32 {
        self.lines_cleared_max
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tetrises(&self) -> u32 {
        self.tetrises
    }

    /// End the game. There is no way to un-finish a board.
    pub fn mark_finished(&mut self) {
        self.finished = true;
    }

    pub fn row(&self, i: usize) -> BoardRow {
        self.rows[i]
    }

    pub fn column(&self, j: usize) -> BoardColumn {
        self.cols[j]
    }

    pub fn get(&self, i: usize, j: usize) -> bool {
        self.rows[i].get(j)
    }

    /// Occupancy with the walls and floor counted as filled and everything
    /// above the field counted as empty.
    pub fn get_signed(&self, i: i32, j: i32) -> bool {
        if j < 0 || j >= WIDTH as i32 {
            return true;
        }
        if i >= HEIGHT as i32 {
            return true;
        }
        if i < 0 {
            return false;
        }
        self.get(i as usize, j as usize)
    }

    pub fn set(&mut self, i: usize, j: usize, value: bool) {
        self.rows[i].set(j, value);
        self.cols[j].set(i, value);
    }

    pub fn flip(&mut self, i: usize, j: usize) {
        self.rows[i].flip(j);
        self.cols[j].flip(i);
    }

    /// Remove row `i`, shifting everything above it down one and opening an
    /// empty row at the top.
    pub fn remove_row(&mut self, i: usize) {
        self.rows.copy_within(0..i, 1);
        self.rows[0] = BoardRow::default();

        for col in &mut self.cols {
            col.remove_row(i);
        }
    }

    /// Number of rows currently full.
    pub fn full_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.full()).count()
    }

    /// Clear every full row, award points, and return the number cleared.
    ///
    /// Rows are removed top to bottom. Removing row `i` only disturbs rows
    /// above `i`, which have already been scanned and were not full.
    ///
    /// More than four full rows is reported as an error and leaves the board
    /// untouched.
    pub fn remove_clears(&mut self) -> CoreResult<usize> {
        let cleared = self.full_rows();
        let points = line_clear_score(cleared)?;

        for i in 0..HEIGHT {
            if self.rows[i].full() {
                self.remove_row(i);
            }
        }

        self.score += points;
        if cleared == TETRIS_LINES {
            self.tetrises += 1;
        }
        self.lines_cleared += cleared as u32;

        if self.lines_cleared >= self.lines_cleared_max {
            self.finished = true;
        }

        Ok(cleared)
    }

    /// Every `(row, col)` where a single falling cell could come to rest.
    pub fn rest_positions(&self) -> ArrayVec<CellPos, MAX_REST_POSITIONS> {
        let mut positions = ArrayVec::new();
        for (j, col) in self.cols.iter().enumerate() {
            for i in col.rest_rows() {
                positions.push((i as i8, j as i8));
            }
        }
        positions
    }

    /// Set the piece's cells without any legality check. Cells above the
    /// field are dropped.
    pub fn insert_piece_unchecked(&mut self, piece: &Piece) -> CoreResult<()> {
        for (i, j) in piece.cells()? {
            if i < 0 {
                continue;
            }
            debug_assert!((0..BOARD_WIDTH as i8).contains(&j) && i < BOARD_HEIGHT as i8);
            self.set(i as usize, j as usize, true);
        }
        Ok(())
    }

    /// Finish the game if any column has grown past its ceiling row.
    pub fn apply_ceiling(&mut self) {
        let breached = self
            .cols
            .iter()
            .zip(CEILING_ROWS)
            .any(|(col, ceiling)| col.top() < ceiling);

        if breached {
            self.finished = true;
        }
    }

    pub fn heights(&self) -> [u8; WIDTH] {
        self.cols.map(BoardColumn::height)
    }

    pub fn max_height(&self) -> u8 {
        self.cols.iter().map(|c| c.height()).max().unwrap_or(0)
    }

    pub fn lines_remaining(&self) -> u32 {
        self.lines_cleared_max.saturating_sub(self.lines_cleared)
    }

    /// Fraction of cleared lines that came from tetrises.
    pub fn tetris_rate(&self) -> f64 {
        if self.lines_cleared == 0 {
            return 0.0;
        }
        (TETRIS_LINES as f64 * self.tetrises as f64) / self.lines_cleared as f64
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_LINES_CLEARED_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::rng::SimpleRng;

    fn fill_row(board: &mut Board, i: usize) {
        for j in 0..WIDTH {
            board.set(i, j, true);
        }
    }

    fn assert_views_agree(board: &Board) {
        for i in 0..HEIGHT {
            for j in 0..WIDTH {
                assert_eq!(
                    board.rows[i].get(j),
                    board.cols[j].get(i),
                    "views disagree at ({i}, {j})"
                );
            }
        }
    }

    #[test]
    fn row_bit_layout() {
        let mut row = BoardRow::default();
        row.set(0, true);
        assert_eq!(row.bits(), 0b10_0000_0000);
        row.set(9, true);
        assert_eq!(row.bits(), 0b10_0000_0001);
        row.flip(0);
        assert_eq!(row.bits(), 0b00_0000_0001);
        assert!(!row.full());
    }

    #[test]
    fn column_height_and_top() {
        let mut col = BoardColumn::default();
        assert_eq!(col.height(), 0);
        assert_eq!(col.top(), 20);

        col.set(19, true);
        assert_eq!(col.height(), 1);

        col.set(12, true);
        assert_eq!(col.height(), 8);
        assert_eq!(col.top(), 12);
    }

    #[test]
    fn column_remove_row_keeps_cells_below() {
        let mut col = BoardColumn::default();
        col.set(5, true);
        col.set(10, true);
        col.set(15, true);

        col.remove_row(10);

        assert!(col.get(6));
        assert!(!col.get(5));
        assert!(!col.get(10));
        assert!(col.get(15));
        assert_eq!(col.height(), 14);
    }

    #[test]
    fn rest_rows_of_empty_column_is_floor() {
        assert_eq!(BoardColumn::default().rest_rows().as_slice(), &[19]);
    }

    #[test]
    fn rest_rows_of_full_column_is_empty() {
        let col = BoardColumn((1 << HEIGHT) - 1);
        assert!(col.rest_rows().is_empty());
    }

    #[test]
    fn rest_rows_include_cells_under_overhang() {
        // Filled at 10 and 17, empty 18 and 19.
        let mut col = BoardColumn::default();
        col.set(10, true);
        col.set(17, true);

        assert_eq!(col.rest_rows().as_slice(), &[9, 16, 19]);
    }

    #[test]
    fn get_signed_walls_floor_and_sky() {
        let mut board = Board::default();
        board.set(0, 0, true);

        assert!(board.get_signed(5, -1));
        assert!(board.get_signed(5, 10));
        assert!(board.get_signed(20, 4));
        assert!(!board.get_signed(-3, 4));
        assert!(board.get_signed(0, 0));
        assert!(!board.get_signed(0, 1));
    }

    #[test]
    fn views_agree_after_random_mutation() {
        let mut rng = SimpleRng::new(99);
        let mut board = Board::default();

        for step in 0..2000 {
            let i = rng.next_range(HEIGHT as u32) as usize;
            let j = rng.next_range(WIDTH as u32) as usize;
            match rng.next_range(3) {
                0 => board.set(i, j, true),
                1 => board.set(i, j, false),
                _ => board.flip(i, j),
            }
            if step % 97 == 0 && board.full_rows() <= 4 {
                board.remove_clears().unwrap();
            }
            assert_views_agree(&board);
        }
    }

    #[test]
    fn remove_row_shifts_rows_above() {
        let mut board = Board::default();
        board.set(3, 2, true);
        board.set(7, 5, true);
        board.set(15, 0, true);
        board.set(19, 9, true);

        board.remove_row(7);

        assert!(board.get(4, 2));
        assert!(!board.get(3, 2));
        assert!(!board.get(7, 5));
        assert!(board.get(15, 0));
        assert!(board.get(19, 9));
        assert!(board.row(0).bits() == 0);
        assert_views_agree(&board);
    }

    #[test]
    fn remove_row_leaves_low_columns_alone() {
        let mut board = Board::default();
        board.set(18, 0, true);
        board.set(19, 0, true);
        board.set(5, 3, true);

        board.remove_row(10);

        assert_eq!(board.column(0).height(), 2);
        assert_eq!(board.column(3).height(), 14);
    }

    #[test]
    fn clear_scores_follow_table() {
        for (n, expected) in [(0, 0), (1, 40), (2, 100), (3, 300), (4, 1200)] {
            let mut board = Board::default();
            for i in 0..n {
                fill_row(&mut board, HEIGHT - 1 - i);
            }
            board.set(HEIGHT - 1 - n, 4, true);

            assert_eq!(board.remove_clears().unwrap(), n);
            assert_eq!(board.score(), expected);
            assert_eq!(board.tetrises(), u32::from(n == 4));
            assert_eq!(board.lines_cleared(), n as u32);
            // The marker cell above the cleared rows falls to the floor.
            assert!(board.get(HEIGHT - 1, 4));
            assert_eq!(board.full_rows(), 0);
        }
    }

    #[test]
    fn interleaved_full_rows_clear_together() {
        let mut board = Board::default();
        fill_row(&mut board, 19);
        board.set(18, 0, true);
        fill_row(&mut board, 17);
        board.set(16, 9, true);

        assert_eq!(board.remove_clears().unwrap(), 2);
        assert!(board.get(19, 0));
        assert!(board.get(18, 9));
        assert_eq!(board.row(19).bits().count_ones(), 1);
        assert_views_agree(&board);
    }

    #[test]
    fn five_full_rows_is_an_error() {
        let mut board = Board::default();
        for i in 15..20 {
            fill_row(&mut board, i);
        }
        let before = board.clone();

        assert_eq!(
            board.remove_clears(),
            Err(CoreError::TooManyClears { rows: 5 })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn reaching_line_cap_finishes() {
        let mut board = Board::new(2);
        fill_row(&mut board, 19);
        board.remove_clears().unwrap();
        assert!(!board.finished());

        fill_row(&mut board, 19);
        board.remove_clears().unwrap();
        assert!(board.finished());
        assert_eq!(board.lines_remaining(), 0);
    }

    #[test]
    fn ceiling_breach_finishes() {
        let mut board = Board::default();
        board.set(5, 3, true);
        board.apply_ceiling();
        assert!(!board.finished());

        board.set(4, 3, true);
        board.apply_ceiling();
        assert!(board.finished());
    }

    #[test]
    fn heights_and_rates() {
        let mut board = Board::default();
        board.set(19, 0, true);
        board.set(10, 4, true);
        assert_eq!(board.heights(), [1, 0, 0, 0, 10, 0, 0, 0, 0, 0]);
        assert_eq!(board.max_height(), 10);
        assert_eq!(board.tetris_rate(), 0.0);

        let board = Board::with_counters(130, 8, false, 2400, 2);
        assert_eq!(board.tetris_rate(), 1.0);
        assert_eq!(board.lines_remaining(), 122);
    }
}
