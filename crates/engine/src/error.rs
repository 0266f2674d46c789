//! Engine errors

use thiserror::Error;
use turbostack_batch::BatchError;
use turbostack_core::CoreError;

/// Why a step could not complete.
///
/// Game over is not an error; see [`crate::StepOutcome::GameOver`].
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    /// A board invariant was violated. The game cannot continue.
    #[error("internal error: {0}")]
    Internal(#[from] CoreError),

    /// Scoring failed. The current board is unchanged and the step can be retried.
    #[error(transparent)]
    Unavailable(#[from] BatchError),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// True for failures that leave the game state usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::Unavailable(_))
    }
}
