//! Core engine - board representation and legal placement search
//!
//! This crate contains the board model and the placement enumerator. It has
//! no dependencies on evaluation, scheduling, or I/O, and no operation here
//! ever blocks or suspends.
//!
//! # Module Structure
//!
//! - [`board`]: dual row/column bit-packed 10x20 board, line clears, rest positions
//! - [`pieces`]: orientation table and piece geometry
//! - [`search`]: overlap, simplified reachability, and placement enumeration
//! - [`record`]: compact 200-character form and the serde record
//! - [`render`]: text rendering and before/after diffs
//! - [`rng`]: deterministic uniform piece draws
//! - [`scoring`]: line clear points
//!
//! # Example
//!
//! ```
//! use turbostack_core::Board;
//! use turbostack_core::types::PieceKind;
//!
//! let board = Board::default();
//! let choices = board.find_legal_placements(PieceKind::I).unwrap();
//! assert_eq!(choices.len(), 17);
//!
//! // The input board is never touched.
//! assert_eq!(board.max_height(), 0);
//! ```

pub mod board;
pub mod error;
pub mod pieces;
pub mod record;
pub mod render;
pub mod rng;
pub mod scoring;
pub mod search;

pub use turbostack_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, BoardColumn, BoardRow};
pub use error::{CoreError, CoreResult};
pub use pieces::{distinct_orientations, orientations, Piece, PlacementKey};
pub use record::BoardRecord;
pub use render::BoardDiff;
pub use rng::SimpleRng;
pub use search::Placement;
