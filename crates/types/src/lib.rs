//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data with no external dependencies, so they can be used
//! by the board engine, the batching scheduler, and any driver on top.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 20 rows (indexed 0-19, top to bottom)
//!
//! Coordinates are always `(row, col)`, the row first.
//!
//! # Scoring
//!
//! | Lines | Points |
//! |-------|--------|
//! | 0 | 0 |
//! | 1 | 40 |
//! | 2 | 100 |
//! | 3 | 300 |
//! | 4 | 1200 (tetris) |
//!
//! There is no level multiplier.
//!
//! # Examples
//!
//! ```
//! use turbostack_types::{PieceKind, RotateDir, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let parsed = PieceKind::from_str("t").unwrap();
//! assert_eq!(parsed, PieceKind::T);
//! assert_eq!(parsed.rotation_period(), 4);
//!
//! assert_eq!(RotateDir::Cw.offset(), 1);
//! assert_eq!(RotateDir::Ccw.offset(), 3);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Length of the compact board string (one character per cell)
pub const COMPACT_LEN: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Line clear scoring table, indexed by lines cleared in one pass.
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Number of lines in a tetris.
pub const TETRIS_LINES: usize = 4;

/// Per-column safety ceiling.
///
/// A placement that leaves a column's topmost filled cell at a row index
/// strictly below `CEILING_ROWS[col]` ends the game.
pub const CEILING_ROWS: [u8; BOARD_WIDTH as usize] = [5; BOARD_WIDTH as usize];

/// Default number of lines after which a game is finished.
pub const DEFAULT_LINES_CLEARED_MAX: u32 = 130;

/// Default number of queued inputs that triggers an immediate batch flush.
pub const DEFAULT_BATCH_SIZE: usize = 512;

/// Default number of consecutive quiet ticks before a batch flush.
pub const DEFAULT_IDLE_TICKS: u32 = 3;


/// The seven tetromino piece kinds
///
/// The declaration order is significant: it is the index into the
/// orientation table and into [`ALL_PIECE_KINDS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    I,
    O,
    J,
    L,
    S,
    Z,
    T,
}

/// Every piece kind, in table order.
pub const ALL_PIECE_KINDS: [PieceKind; 7] = [
    PieceKind::I,
    PieceKind::O,
    PieceKind::J,
    PieceKind::L,
    PieceKind::S,
    PieceKind::Z,
    PieceKind::T,
];

impl PieceKind {
    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use turbostack_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "t" => Some(PieceKind::T),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::T => "t",
        }
    }

    /// Position of this kind in table order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Number of distinct orientations reachable by rotation (1, 2 or 4).
    pub fn rotation_period(self) -> usize {
        match self {
            PieceKind::O => 1,
            PieceKind::I | PieceKind::S | PieceKind::Z => 2,
            PieceKind::J | PieceKind::L | PieceKind::T => 4,
        }
    }
}

/// Rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotateDir {
    /// Clockwise, one step forward in the orientation table
    Cw,
    /// Counter-clockwise, three steps forward (one step back)
    Ccw,
}

impl RotateDir {
    /// Step added to the orientation index, modulo 4.
    pub fn offset(self) -> usize {
        match self {
            RotateDir::Cw => 1,
            RotateDir::Ccw => 3,
        }
    }
}
