//! Scalar providers: a constant or an owned generator tree producing `f64`.
//!
//! ```toml
//! [speed.cycle]
//! start = 0.0
//! end = 1.0
//! period = 20
//! initialProgress = 0
//! ```

mod bounds;
mod functional;
mod generator;
mod waveform;

pub use functional::Func;
pub use generator::{ScalarGenerator, ScalarKind};

use mdfx_config::{join_path, ConfigSection, Entry, ErrorSink};

use crate::error::{ProviderError, ProviderResult};
use crate::Provider;

/// A value source that is either fixed or delegates to a generator.
///
/// The variant is chosen at construction and never changes. Cloning copies the
/// whole tree; no two nodes ever share a child.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarNode {
    /// Fixed value.
    Constant(f64),
    /// Value recomputed by a generator on every refresh.
    Generated(Box<ScalarGenerator>),
}

impl ScalarNode {
    /// Wrap a fixed value.
    pub fn constant(value: f64) -> Self {
        Self::Constant(value)
    }

    /// Read `section[key]` as a scalar field.
    ///
    /// A bare number becomes a constant; a section must name exactly one
    /// generator tag. When the key is absent, `default` is used if given,
    /// otherwise a missing-key error is reported to `sink`.
    pub fn from_config(
        section: &ConfigSection,
        key: &str,
        sink: &mut dyn ErrorSink,
        path: &str,
        default: Option<f64>,
    ) -> ProviderResult<Self> {
        let field_path = join_path(path, key);
        match section.entry(key) {
            None => default
                .map(Self::Constant)
                .ok_or_else(|| ProviderError::missing(key, &field_path).report(sink)),
            Some(Entry::Number(value)) => Ok(Self::Constant(value)),
            Some(Entry::Section(body)) => {
                ScalarGenerator::from_section(&body, sink, &field_path).map(Self::from)
            }
            Some(other) => Err(ProviderError::invalid(
                format!(
                    "Expected a number or a provider section, found {}",
                    other.type_name()
                ),
                &field_path,
            )
            .report(sink)),
        }
    }

    /// Build a generator from a flat `[key, value, key, value, ..]` list.
    ///
    /// Each value must parse as a number; an odd-length list is rejected.
    pub fn from_pair_list(
        tag: &str,
        pairs: &[&str],
        sink: &mut dyn ErrorSink,
        path: &str,
    ) -> ProviderResult<Self> {
        if pairs.len() % 2 != 0 {
            let dangling = pairs.last().copied().unwrap_or_default();
            return Err(ProviderError::invalid(
                format!("Unpaired key in pair list: {dangling}"),
                path,
            )
            .report(sink));
        }

        let mut body = ConfigSection::new();
        for pair in pairs.chunks_exact(2) {
            let (key, raw) = (pair[0], pair[1]);
            match raw.trim().parse::<f64>() {
                Ok(value) => body.set_double(key, value),
                Err(_) => {
                    return Err(ProviderError::invalid(
                        format!("Value for {key} is not a number: {raw}"),
                        &join_path(path, key),
                    )
                    .report(sink))
                }
            }
        }

        let mut wrapper = ConfigSection::new();
        wrapper.set_section(tag, body);
        ScalarGenerator::from_section(&wrapper, sink, path).map(Self::from)
    }

    /// Whether this node is a fixed value.
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }

    /// The generator behind this node, if any.
    pub fn generator(&self) -> Option<&ScalarGenerator> {
        match self {
            Self::Constant(_) => None,
            Self::Generated(generator) => Some(generator),
        }
    }

    /// Advance one tick. No-op for constants.
    pub fn refresh(&mut self) {
        if let Self::Generated(generator) = self {
            generator.refresh();
        }
    }

    /// Last computed value.
    pub fn value(&self) -> f64 {
        match self {
            Self::Constant(value) => *value,
            Self::Generated(generator) => generator.value(),
        }
    }

    /// Write this node under `section[key]` in the shape it is parsed from.
    pub fn serialize(&self, section: &mut ConfigSection, key: &str) {
        match self {
            Self::Constant(value) => section.set_double(key, *value),
            Self::Generated(generator) => {
                let mut body = ConfigSection::new();
                generator.write(&mut body);
                section.set_section(key, body);
            }
        }
    }

    /// Fully independent copy of the tree.
    pub fn deep_copy(&self) -> Self {
        self.clone()
    }
}

impl From<f64> for ScalarNode {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

impl From<ScalarGenerator> for ScalarNode {
    fn from(generator: ScalarGenerator) -> Self {
        Self::Generated(Box::new(generator))
    }
}

impl Provider for ScalarNode {
    type Output = f64;

    fn refresh(&mut self) {
        ScalarNode::refresh(self);
    }

    fn value(&self) -> f64 {
        ScalarNode::value(self)
    }

    fn serialize(&self, section: &mut ConfigSection, key: &str) {
        ScalarNode::serialize(self, section, key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdfx_config::ErrorLog;

    fn parse(doc: &str) -> (ProviderResult<ScalarNode>, ErrorLog) {
        let section = ConfigSection::parse(doc).expect("valid toml");
        let mut log = ErrorLog::new();
        let node = ScalarNode::from_config(&section, "speed", &mut log, "effect", None);
        (node, log)
    }

    #[test]
    fn bare_number_is_constant() {
        let (node, log) = parse("speed = 3");
        let mut node = node.expect("constant");
        assert!(node.is_constant());
        node.refresh();
        assert_eq!(node.value(), 3.0);
        assert!(log.is_empty());
    }

    #[test]
    fn missing_key_uses_default_or_fails() {
        let section = ConfigSection::new();
        let mut log = ErrorLog::new();
        let node = ScalarNode::from_config(&section, "speed", &mut log, "effect", Some(1.5))
            .expect("default applies");
        assert_eq!(node.value(), 1.5);
        assert!(log.is_empty());

        let err = ScalarNode::from_config(&section, "speed", &mut log, "effect", None)
            .expect_err("required");
        assert!(matches!(err, ProviderError::MissingRequiredKey { .. }));
        assert_eq!(log.len(), 1);
        assert_eq!(log.issues()[0].path, "effect/speed");
    }

    #[test]
    fn tags_are_case_insensitive() {
        let (node, log) = parse("[speed.PingPong]\nmin = 0\nmax = 1\nperiod = 4\n");
        let node = node.expect("pingpong");
        assert_eq!(node.generator().map(|g| g.kind()), Some(ScalarKind::PingPong));
        assert!(log.is_empty());
    }

    #[test]
    fn selection_errors_are_reported_with_path() {
        let (node, log) = parse("[speed]\n");
        assert!(node.is_err());
        assert_eq!(log.issues()[0].message, "Must specify either a provider or a number");
        assert_eq!(log.issues()[0].path, "effect/speed");

        let (node, log) = parse("[speed.wobble]\nmin = 0\n");
        assert!(node.is_err());
        assert_eq!(log.issues()[0].message, "Provider type not recognised: wobble");

        let (node, log) = parse("[speed.random]\nmin = 0\nmax = 1\n[speed.cycle]\nstart = 0\n");
        assert!(node.is_err());
        assert_eq!(
            log.issues()[0].message,
            "Too many sections; choose a single provider"
        );
    }

    #[test]
    fn wrong_value_type_is_invalid() {
        let (node, log) = parse("speed = \"fast\"");
        assert!(matches!(
            node,
            Err(ProviderError::InvalidConfiguration { .. })
        ));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn every_broken_child_is_reported_once() {
        let (node, log) = parse("[speed.cycle]\nperiod = \"slow\"\n");
        assert!(node.is_err());
        let paths: Vec<&str> = log.issues().iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "effect/speed/cycle/start",
                "effect/speed/cycle/end",
                "effect/speed/cycle/period",
            ]
        );
    }

    #[test]
    fn pair_list_builds_generator() {
        let mut log = ErrorLog::new();
        let mut node = ScalarNode::from_pair_list(
            "cycle",
            &["start", "0", "end", "10", "period", "4"],
            &mut log,
            "legacy",
        )
        .expect("pair list");
        node.refresh();
        assert!((node.value() - 2.5).abs() < 1e-9);
        assert!(log.is_empty());
    }

    #[test]
    fn pair_list_rejects_odd_length_and_bad_numbers() {
        let mut log = ErrorLog::new();
        let odd = ScalarNode::from_pair_list("random", &["min", "0", "max"], &mut log, "legacy");
        assert!(odd.is_err());
        let bad = ScalarNode::from_pair_list("random", &["min", "zero", "max", "1"], &mut log, "legacy");
        assert!(bad.is_err());
        assert_eq!(log.len(), 2);
        assert_eq!(log.issues()[0].message, "Unpaired key in pair list: max");
        assert_eq!(log.issues()[1].path, "legacy/min");
    }

    #[test]
    fn constants_serialize_as_bare_numbers() {
        let mut section = ConfigSection::new();
        ScalarNode::constant(2.0).serialize(&mut section, "size");
        assert_eq!(section.entry("size"), Some(Entry::Number(2.0)));
    }

    #[test]
    fn deep_copy_is_independent() {
        let (node, _) = parse("[speed.cycle]\nstart = 0\nend = 8\nperiod = 8\n");
        let mut original = node.expect("cycle");
        let copy = original.deep_copy();
        original.refresh();
        original.refresh();
        assert_eq!(copy.value(), 0.0);
        assert!((original.value() - 2.0).abs() < 1e-9);
    }
}
