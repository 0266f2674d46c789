//! Scheduler errors

use std::sync::Arc;

use thiserror::Error;

/// Failure delivered to every caller whose inputs were part of a flush.
#[derive(Error, Debug, Clone)]
pub enum BatchError {
    /// The evaluator itself failed.
    #[error("evaluation unavailable: {0}")]
    Evaluator(Arc<anyhow::Error>),

    /// The evaluator returned a different number of outputs than inputs.
    #[error("evaluation unavailable: evaluator returned {actual} outputs for {expected} inputs")]
    LengthMismatch { expected: usize, actual: usize },

    /// `submit` was called outside a tokio runtime.
    #[error("evaluation unavailable: no tokio runtime to run the scheduler")]
    NoRuntime,

    /// The scheduler went away before delivering a result.
    #[error("evaluation unavailable: scheduler dropped the request")]
    Dropped,
}
