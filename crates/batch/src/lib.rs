//! Batching scheduler - coalesce many small evaluation calls into few large ones
//!
//! Consumers call [`BatchProcessor::submit`] with a handful of inputs and
//! await the returned [`BatchHandle`]. Requests queued within a short window
//! are concatenated into one evaluator call, and each caller gets back
//! exactly the outputs for its own inputs, in order.
//!
//! # Flush Rules
//!
//! The tick loop runs on the current tokio runtime and advances one tick per
//! `yield_now`:
//!
//! - queued inputs ≥ `batch_size_threshold` → flush now
//! - queue grew since the last tick → reset the idle counter
//! - otherwise → count an idle tick; flush after `idle_ticks` of them
//!
//! After a flush the loop exits. The next `submit` starts a fresh cycle.
//! If the loop is torn down before it flushes, for instance because its
//! runtime shut down, the queued callers get [`BatchError::Dropped`] and the
//! processor stays usable.
//!
//! # Failures
//!
//! If the evaluator fails, or returns the wrong number of outputs, every
//! caller in that flush receives the same [`BatchError`]. No partial results
//! are delivered.
//!
//! # Example
//!
//! ```
//! use turbostack_batch::{BatchConfig, BatchProcessor};
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! rt.block_on(async {
//!     let squares = BatchProcessor::new(BatchConfig::new(64), |xs: Vec<u64>| {
//!         Ok(xs.into_iter().map(|x| x * x).collect())
//!     });
//!
//!     let a = squares.submit(vec![2, 3]);
//!     let b = squares.submit(vec![4]);
//!     assert_eq!(a.await.unwrap(), vec![4, 9]);
//!     assert_eq!(b.await.unwrap(), vec![16]);
//! });
//! ```

pub mod config;
pub mod error;
pub mod processor;

pub use config::BatchConfig;
pub use error::BatchError;
pub use processor::{BatchHandle, BatchProcessor, EvalFuture};
