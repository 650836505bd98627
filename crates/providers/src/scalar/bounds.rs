//! Ordered lower/upper child pairs and the clamp generator built on them.

use mdfx_config::{ConfigSection, ErrorSink};

use super::ScalarNode;
use crate::error::ProviderResult;

/// Key names of a `min`/`max` pair.
pub(crate) const MIN_MAX: [&str; 2] = ["min", "max"];

/// Key names of a `start`/`end` pair.
pub(crate) const START_END: [&str; 2] = ["start", "end"];

/// A lower/upper pair kept in order.
///
/// Whenever the children's values come out inverted, the two nodes trade
/// places, so `min.value() <= max.value()` holds after construction and after
/// every refresh. `keys` names the pair in configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Bounds {
    min: ScalarNode,
    max: ScalarNode,
    keys: [&'static str; 2],
}

impl Bounds {
    pub(crate) fn new(min: ScalarNode, max: ScalarNode) -> Self {
        Self::named(min, max, MIN_MAX)
    }

    pub(crate) fn named(min: ScalarNode, max: ScalarNode, keys: [&'static str; 2]) -> Self {
        let mut bounds = Self { min, max, keys };
        bounds.order();
        bounds
    }

    pub(crate) fn read(
        section: &ConfigSection,
        sink: &mut dyn ErrorSink,
        path: &str,
    ) -> ProviderResult<Self> {
        Self::read_named(section, sink, path, MIN_MAX)
    }

    pub(crate) fn read_named(
        section: &ConfigSection,
        sink: &mut dyn ErrorSink,
        path: &str,
        keys: [&'static str; 2],
    ) -> ProviderResult<Self> {
        let [low, high] = keys;
        let min = ScalarNode::from_config(section, low, sink, path, None);
        let max = ScalarNode::from_config(section, high, sink, path, None);
        Ok(Self::named(min?, max?, keys))
    }

    pub(crate) fn refresh(&mut self) {
        self.min.refresh();
        self.max.refresh();
        self.order();
    }

    fn order(&mut self) {
        if self.min.value() > self.max.value() {
            std::mem::swap(&mut self.min, &mut self.max);
        }
    }

    pub(crate) fn min(&self) -> f64 {
        self.min.value()
    }

    pub(crate) fn max(&self) -> f64 {
        self.max.value()
    }

    /// Linear interpolation from `min` (t = 0) to `max` (t = 1).
    pub(crate) fn lerp(&self, t: f64) -> f64 {
        let min = self.min();
        min + (self.max() - min) * t
    }

    pub(crate) fn write(&self, section: &mut ConfigSection) {
        let [low, high] = self.keys;
        self.min.serialize(section, low);
        self.max.serialize(section, high);
    }
}

/// `value` limited to `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Clamp {
    bounds: Bounds,
    value: ScalarNode,
}

impl Clamp {
    pub(crate) fn new(bounds: Bounds, value: ScalarNode) -> Self {
        Self { bounds, value }
    }

    pub(crate) fn read(
        section: &ConfigSection,
        sink: &mut dyn ErrorSink,
        path: &str,
    ) -> ProviderResult<Self> {
        let bounds = Bounds::read(section, sink, path);
        let value = ScalarNode::from_config(section, "value", sink, path, None);
        Ok(Self::new(bounds?, value?))
    }

    pub(crate) fn refresh(&mut self) -> f64 {
        self.bounds.refresh();
        self.value.refresh();
        self.peek()
    }

    pub(crate) fn peek(&self) -> f64 {
        self.bounds
            .min()
            .max(self.bounds.max().min(self.value.value()))
    }

    pub(crate) fn write(&self, section: &mut ConfigSection) {
        self.bounds.write(section);
        self.value.serialize(section, "value");
    }
}
