//! RNG module - deterministic piece generation
//!
//! Pieces are drawn uniformly and independently, not from a 7-bag, so long
//! droughts are possible. A seed always reproduces the same sequence.

use crate::types::{PieceKind, ALL_PIECE_KINDS};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Draw a piece kind, each with probability 1/7.
    pub fn next_kind(&mut self) -> PieceKind {
        ALL_PIECE_KINDS[self.next_range(ALL_PIECE_KINDS.len() as u32) as usize]
    }
}
