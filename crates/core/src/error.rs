//! Error types for the core engine
//!
//! Every variant is an invariant violation or malformed external input.
//! Running out of legal placements is not an error.

use thiserror::Error;

use crate::types::PieceKind;

/// Errors that can occur in board and piece operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// More rows were full at once than a single piece can complete.
    #[error("internal error: {rows} rows full at once, at most 4 can clear")]
    TooManyClears { rows: usize },

    /// A piece mask that does not have exactly four cells.
    #[error("internal error: piece mask {mask:#06x} does not decode to 4 cells")]
    MalformedMask { mask: u16 },

    /// A piece mask that is not in its kind's orientation table.
    #[error("internal error: mask {mask:#06x} is not an orientation of {kind:?}")]
    UnknownOrientation { kind: PieceKind, mask: u16 },

    /// A compact board string that cannot be parsed.
    #[error("invalid compact board: {message}")]
    ParseCompact { message: String },
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
