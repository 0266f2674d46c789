//! turbostack (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof so binaries, integration
//! tests, and benches can write `turbostack::{core,batch,engine,types}`.

pub use turbostack_batch as batch;
pub use turbostack_core as core;
pub use turbostack_engine as engine;
pub use turbostack_types as types;
