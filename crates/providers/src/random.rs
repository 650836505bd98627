//! Process-wide entropy source for `random` generators.
//!
//! Nodes never persist a seed; they all draw from one RNG per thread. Drivers
//! that want reproducible runs reseed it with [`seed_random`].

use std::cell::RefCell;

use mdfx_core::{entropy_rng, seeded_rng};
use rand::rngs::StdRng;
use rand::Rng;

thread_local! {
    static TICK_RNG: RefCell<StdRng> = RefCell::new(entropy_rng());
}

/// Reseed the RNG shared by every `random` generator on this thread.
pub fn seed_random(seed: u64) {
    TICK_RNG.with(|rng| *rng.borrow_mut() = seeded_rng(seed));
}

/// Uniform sample in `[0, 1)`.
pub(crate) fn unit_sample() -> f64 {
    TICK_RNG.with(|rng| rng.borrow_mut().gen::<f64>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reseeding_replays_the_same_samples() {
        seed_random(42);
        let first: Vec<f64> = (0..8).map(|_| unit_sample()).collect();
        seed_random(42);
        let second: Vec<f64> = (0..8).map(|_| unit_sample()).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|v| (0.0..1.0).contains(v)));
    }
}
