//! Driver configuration

use turbostack_types::DEFAULT_LINES_CLEARED_MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Line budget for a game.
    pub lines_cleared_max: u32,
    /// Seed for piece draws.
    pub seed: u32,
    /// Stop after this many moves even if the game is still live.
    pub max_moves: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lines_cleared_max: DEFAULT_LINES_CLEARED_MAX,
            seed: 1,
            max_moves: None,
        }
    }
}

impl EngineConfig {
    /// Create from environment variables
    ///
    /// - `TURBOSTACK_MAX_LINES`: line budget (default 130)
    /// - `TURBOSTACK_SEED`: piece draw seed (default 1)
    /// - `TURBOSTACK_MAX_MOVES`: move cap (default unlimited)
    pub fn from_env() -> Self {
        use std::env;

        fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
            env::var(key).ok().and_then(|s| s.trim().parse().ok())
        }

        let defaults = Self::default();
        Self {
            lines_cleared_max: parsed("TURBOSTACK_MAX_LINES").unwrap_or(defaults.lines_cleared_max),
            seed: parsed("TURBOSTACK_SEED").unwrap_or(defaults.seed),
            max_moves: parsed("TURBOSTACK_MAX_MOVES"),
        }
    }
}
