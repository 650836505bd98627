#![warn(missing_docs)]
//! Core primitives shared across the workspace.

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Server tick rate (20 TPS => 50 ms per tick).
pub const TICKS_PER_SECOND: u64 = 20;

/// Fixed tick type driving every provider refresh.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }

    /// Wall-clock seconds covered by this many ticks.
    pub fn as_seconds(self) -> f64 {
        self.0 as f64 / TICKS_PER_SECOND as f64
    }
}

/// Build a reproducible RNG from a user seed.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Build an RNG seeded from OS entropy.
pub fn entropy_rng() -> StdRng {
    StdRng::from_entropy()
}
