//! Property-based tests for waveform generators
//!
//! Validates generator invariants:
//! - Bounded waveforms never leave `[min, max]`, whatever order the bounds come in
//! - Inverted `start`/`end` on a cycle ramp the same way as ordered ones
//! - Clamp output always lies inside its bounds
//! - A cycle with an integer period returns to its starting phase
//! - Rotation keeps the orbit radius

use mdfx_providers::{seed_random, DVec3, ScalarGenerator, ScalarNode, VectorGenerator, VectorNode};
use mdfx_testkit::{sample_scalar, sample_vector};
use proptest::prelude::*;

const SLACK: f64 = 1e-9;

fn c(value: f64) -> ScalarNode {
    ScalarNode::constant(value)
}

fn within(value: f64, a: f64, b: f64) -> bool {
    value >= a.min(b) - SLACK && value <= a.max(b) + SLACK
}

proptest! {
    /// Property: ping-pong stays between its bounds
    #[test]
    fn ping_pong_is_bounded(
        a in -1000.0f64..1000.0,
        b in -1000.0f64..1000.0,
        period in 1u32..200,
        initial in 0.0f64..10.0,
    ) {
        let mut node: ScalarNode =
            ScalarGenerator::ping_pong(c(a), c(b), c(f64::from(period)), initial).into();
        prop_assert!(within(node.value(), a, b));
        for value in sample_scalar(&mut node, 3 * period as usize) {
            prop_assert!(within(value, a, b), "{} outside [{}, {}]", value, a, b);
        }
    }

    /// Property: pulse stays between its bounds
    #[test]
    fn pulse_is_bounded(
        a in -1000.0f64..1000.0,
        b in -1000.0f64..1000.0,
        period in 1u32..200,
    ) {
        let mut node: ScalarNode =
            ScalarGenerator::pulse(c(a), c(b), c(f64::from(period)), 0.0).into();
        for value in sample_scalar(&mut node, 2 * period as usize) {
            prop_assert!(within(value, a, b));
        }
    }

    /// Property: inverted bounds behave exactly like ordered ones
    #[test]
    fn swapped_bounds_behave_identically(
        a in -100.0f64..100.0,
        b in -100.0f64..100.0,
        period in 1u32..50,
        initial in 0.0f64..2.0,
        seed in any::<u64>(),
    ) {
        let p = f64::from(period);
        let pairs = [
            (
                ScalarGenerator::cycle(c(a), c(b), c(p), initial),
                ScalarGenerator::cycle(c(b), c(a), c(p), initial),
            ),
            (
                ScalarGenerator::ping_pong(c(a), c(b), c(p), initial),
                ScalarGenerator::ping_pong(c(b), c(a), c(p), initial),
            ),
            (
                ScalarGenerator::pulse(c(a), c(b), c(p), initial),
                ScalarGenerator::pulse(c(b), c(a), c(p), initial),
            ),
            (ScalarGenerator::random(c(a), c(b)), ScalarGenerator::random(c(b), c(a))),
        ];
        for (forward, reverse) in pairs {
            let mut forward: ScalarNode = forward.into();
            let mut reverse: ScalarNode = reverse.into();
            seed_random(seed);
            let expected = sample_scalar(&mut forward, 2 * period as usize);
            seed_random(seed);
            let actual = sample_scalar(&mut reverse, 2 * period as usize);
            prop_assert_eq!(actual, expected);
        }
    }

    /// Property: random samples stay between their bounds
    #[test]
    fn random_is_bounded(
        a in -1000.0f64..1000.0,
        b in -1000.0f64..1000.0,
        seed in any::<u64>(),
    ) {
        seed_random(seed);
        let mut node: ScalarNode = ScalarGenerator::random(c(a), c(b)).into();
        prop_assert_eq!(node.value(), a.min(b));
        for value in sample_scalar(&mut node, 64) {
            prop_assert!(within(value, a, b));
        }
    }

    /// Property: clamp output is inside the (possibly swapped) bounds
    #[test]
    fn clamp_is_bounded(
        a in -1000.0f64..1000.0,
        b in -1000.0f64..1000.0,
        value in -5000.0f64..5000.0,
    ) {
        let mut node: ScalarNode = ScalarGenerator::clamp(c(a), c(b), c(value)).into();
        node.refresh();
        prop_assert!(within(node.value(), a, b));
        if within(value, a, b) {
            prop_assert_eq!(node.value(), value);
        }
    }

    /// Property: after `period` ticks a cycle is back at its starting phase
    #[test]
    fn cycle_returns_after_one_period(
        period in 1u32..500,
        initial in 0.0f64..1.0,
    ) {
        let generator = ScalarGenerator::cycle(c(0.0), c(1.0), c(f64::from(period)), initial);
        let start = generator.progress().unwrap_or(f64::NAN);
        let mut node: ScalarNode = generator.into();
        sample_scalar(&mut node, period as usize);
        let end = node.generator().and_then(ScalarGenerator::progress).unwrap_or(f64::NAN);
        let distance = (end - start).abs();
        prop_assert!(distance < 1e-6 || (1.0 - distance) < 1e-6, "{} vs {}", start, end);
    }

    /// Property: rotation keeps the configured radius about any axis
    #[test]
    fn rotate_keeps_radius(
        x in -10.0f64..10.0,
        y in -10.0f64..10.0,
        z in -10.0f64..10.0,
        radius in 0.0f64..50.0,
        period in 1u32..100,
    ) {
        let mut node: VectorNode = VectorGenerator::rotate(
            VectorNode::constant(DVec3::new(x, y, z)),
            c(f64::from(period)),
            c(radius),
            0.0,
        )
        .into();
        for point in sample_vector(&mut node, period as usize) {
            prop_assert!((point.length() - radius).abs() < 1e-6);
        }
    }
}
