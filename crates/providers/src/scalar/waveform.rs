//! Time-indexed waveforms advanced once per refresh.
//!
//! Each periodic generator keeps a `progress` phase accumulator and derives its
//! per-tick step from the current value of its `period` child, so a dynamic
//! period bends the waveform without resetting it.

use std::f64::consts::TAU;

use mdfx_config::{join_path, ConfigSection, Entry, ErrorSink};

use super::bounds::{Bounds, START_END};
use super::ScalarNode;
use crate::dispatch::{read_initial_progress, wrap_progress, INITIAL_PROGRESS};
use crate::error::{ProviderError, ProviderResult};
use crate::random::unit_sample;

const LAST_VALUE: &str = "lastValue";

fn read_period(
    section: &ConfigSection,
    sink: &mut dyn ErrorSink,
    path: &str,
) -> ProviderResult<ScalarNode> {
    ScalarNode::from_config(section, "period", sink, path, None)
}

/// Sawtooth: lower bound to upper bound over `period` ticks, then jump back.
///
/// The `start`/`end` pair is ordered like `min`/`max`, so writing the bounds
/// the other way round plays the same ramp.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Cycle {
    bounds: Bounds,
    period: ScalarNode,
    progress: f64,
}

impl Cycle {
    pub(crate) fn new(bounds: Bounds, period: ScalarNode, initial_progress: f64) -> Self {
        Self {
            bounds,
            period,
            progress: wrap_progress(initial_progress.abs(), 1.0),
        }
    }

    pub(crate) fn read(
        section: &ConfigSection,
        sink: &mut dyn ErrorSink,
        path: &str,
    ) -> ProviderResult<Self> {
        let bounds = Bounds::read_named(section, sink, path, START_END);
        let period = read_period(section, sink, path);
        let initial = read_initial_progress(section, sink, path);
        Ok(Self::new(bounds?, period?, initial?))
    }

    pub(crate) fn refresh(&mut self) -> f64 {
        self.bounds.refresh();
        self.period.refresh();
        self.progress = wrap_progress(self.progress + 1.0 / self.period.value(), 1.0);
        self.peek()
    }

    pub(crate) fn peek(&self) -> f64 {
        self.bounds.lerp(self.progress)
    }

    pub(crate) fn progress(&self) -> f64 {
        self.progress
    }

    pub(crate) fn write(&self, section: &mut ConfigSection) {
        self.bounds.write(section);
        self.period.serialize(section, "period");
        section.set_double(INITIAL_PROGRESS, self.progress);
    }
}

/// Triangle wave: `min -> max -> min` once per `period` ticks.
///
/// Progress lives in `[0, 2)`; the second half mirrors the first.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PingPong {
    bounds: Bounds,
    period: ScalarNode,
    progress: f64,
}

impl PingPong {
    pub(crate) fn new(bounds: Bounds, period: ScalarNode, initial_progress: f64) -> Self {
        Self {
            bounds,
            period,
            progress: wrap_progress(initial_progress.abs(), 2.0),
        }
    }

    pub(crate) fn read(
        section: &ConfigSection,
        sink: &mut dyn ErrorSink,
        path: &str,
    ) -> ProviderResult<Self> {
        let bounds = Bounds::read(section, sink, path);
        let period = read_period(section, sink, path);
        let initial = read_initial_progress(section, sink, path);
        Ok(Self::new(bounds?, period?, initial?))
    }

    pub(crate) fn refresh(&mut self) -> f64 {
        self.bounds.refresh();
        self.period.refresh();
        self.progress = wrap_progress(self.progress + 2.0 / self.period.value(), 2.0);
        self.peek()
    }

    pub(crate) fn peek(&self) -> f64 {
        let t = if self.progress <= 1.0 {
            self.progress
        } else {
            2.0 - self.progress
        };
        self.bounds.lerp(t)
    }

    pub(crate) fn progress(&self) -> f64 {
        self.progress
    }

    pub(crate) fn write(&self, section: &mut ConfigSection) {
        self.bounds.write(section);
        self.period.serialize(section, "period");
        section.set_double(INITIAL_PROGRESS, self.progress);
    }
}

/// Sine wave mapped into `[min, max]`, starting at the midpoint and rising.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Pulse {
    bounds: Bounds,
    period: ScalarNode,
    progress: f64,
}

impl Pulse {
    pub(crate) fn new(bounds: Bounds, period: ScalarNode, initial_progress: f64) -> Self {
        Self {
            bounds,
            period,
            progress: wrap_progress(initial_progress.abs(), 1.0),
        }
    }

    pub(crate) fn read(
        section: &ConfigSection,
        sink: &mut dyn ErrorSink,
        path: &str,
    ) -> ProviderResult<Self> {
        let bounds = Bounds::read(section, sink, path);
        let period = read_period(section, sink, path);
        let initial = read_initial_progress(section, sink, path);
        Ok(Self::new(bounds?, period?, initial?))
    }

    pub(crate) fn refresh(&mut self) -> f64 {
        self.bounds.refresh();
        self.period.refresh();
        self.progress = wrap_progress(self.progress + 1.0 / self.period.value(), 1.0);
        self.peek()
    }

    pub(crate) fn peek(&self) -> f64 {
        self.bounds
            .lerp((TAU * self.progress).sin() / 2.0 + 0.5)
    }

    pub(crate) fn progress(&self) -> f64 {
        self.progress
    }

    pub(crate) fn write(&self, section: &mut ConfigSection) {
        self.bounds.write(section);
        self.period.serialize(section, "period");
        section.set_double(INITIAL_PROGRESS, self.progress);
    }
}

/// Uniform sample in `[min, max]`, drawn by `refresh`, never by reads.
///
/// The last draw is kept and written as `lastValue`, so a reloaded node reads
/// the same value until its next refresh.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RandomRange {
    bounds: Bounds,
    last: f64,
}

impl RandomRange {
    /// Before the first draw the value is the lower bound.
    pub(crate) fn new(bounds: Bounds) -> Self {
        let last = bounds.min();
        Self { bounds, last }
    }

    pub(crate) fn read(
        section: &ConfigSection,
        sink: &mut dyn ErrorSink,
        path: &str,
    ) -> ProviderResult<Self> {
        let bounds = Bounds::read(section, sink, path);
        let last = match section.entry(LAST_VALUE) {
            None => Ok(None),
            Some(Entry::Number(value)) => Ok(Some(value)),
            Some(other) => Err(ProviderError::invalid(
                format!("{LAST_VALUE} must be a number, found {}", other.type_name()),
                &join_path(path, LAST_VALUE),
            )
            .report(sink)),
        };
        let mut random = Self::new(bounds?);
        if let Some(value) = last? {
            random.last = value;
        }
        Ok(random)
    }

    pub(crate) fn refresh(&mut self) -> f64 {
        self.bounds.refresh();
        self.last = self.bounds.lerp(unit_sample());
        self.last
    }

    pub(crate) fn peek(&self) -> f64 {
        self.last
    }

    pub(crate) fn write(&self, section: &mut ConfigSection) {
        self.bounds.write(section);
        section.set_double(LAST_VALUE, self.last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seed_random;

    fn c(value: f64) -> ScalarNode {
        ScalarNode::constant(value)
    }

    fn ramp(start: f64, end: f64, period: ScalarNode, initial: f64) -> Cycle {
        Cycle::new(Bounds::named(c(start), c(end), START_END), period, initial)
    }

    fn run(mut step: impl FnMut() -> f64, ticks: usize) -> Vec<f64> {
        (0..ticks).map(|_| step()).collect()
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (tick, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!((a - e).abs() < 1e-9, "tick {tick}: {a} != {e}");
        }
    }

    #[test]
    fn cycle_ramps_and_wraps() {
        let mut cycle = ramp(0.0, 10.0, c(4.0), 0.0);
        assert_eq!(cycle.peek(), 0.0);
        let values = run(|| cycle.refresh(), 9);
        assert_close(&values, &[2.5, 5.0, 7.5, 0.0, 2.5, 5.0, 7.5, 0.0, 2.5]);
    }

    #[test]
    fn cycle_with_inverted_ends_matches_ordered() {
        let mut inverted = ramp(10.0, 0.0, c(4.0), 0.0);
        assert_eq!(inverted.peek(), 0.0);
        let values = run(|| inverted.refresh(), 4);
        assert_close(&values, &[2.5, 5.0, 7.5, 0.0]);

        let mut section = ConfigSection::new();
        inverted.write(&mut section);
        assert_eq!(section.double("start"), Some(0.0));
        assert_eq!(section.double("end"), Some(10.0));
    }

    #[test]
    fn cycle_returns_to_start_after_one_period() {
        let mut cycle = ramp(0.0, 1.0, c(3.0), 0.1);
        let start = cycle.progress();
        for _ in 0..3 {
            cycle.refresh();
        }
        assert!((cycle.progress() - start).abs() < 1e-9);
    }

    #[test]
    fn initial_progress_is_mirrored_and_wrapped() {
        let cycle = ramp(0.0, 10.0, c(4.0), -1.25);
        assert!((cycle.progress() - 0.25).abs() < 1e-12);
        let ping_pong = PingPong::new(Bounds::new(c(0.0), c(1.0)), c(4.0), 3.5);
        assert!((ping_pong.progress() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn ping_pong_is_a_triangle_wave() {
        let mut ping_pong = PingPong::new(Bounds::new(c(0.0), c(8.0)), c(8.0), 0.0);
        let values = run(|| ping_pong.refresh(), 9);
        assert_close(&values, &[2.0, 4.0, 6.0, 8.0, 6.0, 4.0, 2.0, 0.0, 2.0]);
    }

    #[test]
    fn ping_pong_with_inverted_bounds_matches_ordered() {
        let mut ordered = PingPong::new(Bounds::new(c(-1.0), c(3.0)), c(6.0), 0.2);
        let mut inverted = PingPong::new(Bounds::new(c(3.0), c(-1.0)), c(6.0), 0.2);
        let a = run(|| ordered.refresh(), 12);
        let b = run(|| inverted.refresh(), 12);
        assert_close(&a, &b);
    }

    #[test]
    fn pulse_follows_a_sine() {
        let mut pulse = Pulse::new(Bounds::new(c(0.0), c(2.0)), c(4.0), 0.0);
        assert!((pulse.peek() - 1.0).abs() < 1e-12);
        let values = run(|| pulse.refresh(), 4);
        assert_close(&values, &[2.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn zero_period_poisons_progress_with_nan() {
        let mut cycle = ramp(0.0, 1.0, c(0.0), 0.0);
        assert!(cycle.refresh().is_nan());
        assert!(cycle.progress().is_nan());
    }

    #[test]
    fn random_stays_in_bounds_and_reports_min_before_refresh() {
        seed_random(11);
        let mut random = RandomRange::new(Bounds::new(c(4.0), c(-4.0)));
        assert_eq!(random.peek(), -4.0);
        for _ in 0..1000 {
            let sample = random.refresh();
            assert!((-4.0..=4.0).contains(&sample));
        }
    }

    #[test]
    fn random_keeps_its_last_draw_through_write_and_read() {
        seed_random(3);
        let mut random = RandomRange::new(Bounds::new(c(3.0), c(8.0)));
        let drawn = random.refresh();
        let mut section = ConfigSection::new();
        random.write(&mut section);
        assert_eq!(section.double(LAST_VALUE), Some(drawn));

        let mut log = mdfx_config::ErrorLog::new();
        let restored = RandomRange::read(&section, &mut log, "fx").expect("random");
        assert_eq!(restored.peek(), drawn);
        assert!(log.is_empty());

        section.set_string(LAST_VALUE, "soon");
        assert!(RandomRange::read(&section, &mut log, "fx").is_err());
        assert_eq!(log.issues()[0].path, "fx/lastValue");
    }

    #[test]
    fn period_can_be_a_generator() {
        let period = crate::ScalarGenerator::functional(crate::Func::Add, vec![c(2.0), c(2.0)])
            .expect("add");
        let mut cycle = ramp(0.0, 1.0, period.into(), 0.0);
        assert!((cycle.refresh() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn write_snapshots_progress() {
        let mut cycle = ramp(0.0, 1.0, c(4.0), 0.0);
        cycle.refresh();
        let mut section = ConfigSection::new();
        cycle.write(&mut section);
        assert_eq!(section.double(INITIAL_PROGRESS), Some(0.25));
        assert_eq!(section.double("period"), Some(4.0));
    }
}
