//! Vector providers: the 3-component mirror of [`crate::scalar`].
//!
//! A vector field may be written as an `[x, y, z]` array, as an `{x, y, z}`
//! section whose components are scalar fields, or as a one-tag generator
//! section such as `{ rotate = { .. } }`.

mod generator;

pub use generator::{VectorGenerator, VectorKind};

use glam::DVec3;
use mdfx_config::{join_path, ConfigSection, Entry, ErrorSink};

use crate::error::{ProviderError, ProviderResult};
use crate::scalar::ScalarNode;
use crate::Provider;

const COMPONENT_KEYS: [&str; 3] = ["x", "y", "z"];

/// A vector source that is either fixed or delegates to a generator.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorNode {
    /// Fixed vector.
    Constant(DVec3),
    /// Vector recomputed by a generator on every refresh.
    Generated(Box<VectorGenerator>),
}

impl VectorNode {
    /// Wrap a fixed vector.
    pub fn constant(value: DVec3) -> Self {
        Self::Constant(value)
    }

    /// Read `section[key]` as a vector field.
    pub fn from_config(
        section: &ConfigSection,
        key: &str,
        sink: &mut dyn ErrorSink,
        path: &str,
        default: Option<DVec3>,
    ) -> ProviderResult<Self> {
        let field_path = join_path(path, key);
        match section.entry(key) {
            None => default
                .map(Self::Constant)
                .ok_or_else(|| ProviderError::missing(key, &field_path).report(sink)),
            Some(Entry::List(values)) => match values.as_slice() {
                [x, y, z] => Ok(Self::Constant(DVec3::new(*x, *y, *z))),
                _ => Err(ProviderError::invalid(
                    format!("Expected 3 vector components, found {}", values.len()),
                    &field_path,
                )
                .report(sink)),
            },
            Some(Entry::Section(body)) if is_component_section(&body) => {
                Self::from_components(&body, sink, &field_path)
            }
            Some(Entry::Section(body)) => {
                VectorGenerator::from_section(&body, sink, &field_path).map(Self::from)
            }
            Some(other) => Err(ProviderError::invalid(
                format!(
                    "Expected [x, y, z], an x/y/z section or a provider section, found {}",
                    other.type_name()
                ),
                &field_path,
            )
            .report(sink)),
        }
    }

    /// `{x, y, z}` section: a constant when every component is a number,
    /// otherwise a per-component generator. Missing components default to 0.
    fn from_components(
        body: &ConfigSection,
        sink: &mut dyn ErrorSink,
        path: &str,
    ) -> ProviderResult<Self> {
        let x = ScalarNode::from_config(body, "x", sink, path, Some(0.0));
        let y = ScalarNode::from_config(body, "y", sink, path, Some(0.0));
        let z = ScalarNode::from_config(body, "z", sink, path, Some(0.0));
        let (x, y, z) = (x?, y?, z?);
        Ok(match (&x, &y, &z) {
            (ScalarNode::Constant(x), ScalarNode::Constant(y), ScalarNode::Constant(z)) => {
                Self::Constant(DVec3::new(*x, *y, *z))
            }
            _ => VectorGenerator::components(x, y, z).into(),
        })
    }

    /// Whether this node is a fixed vector.
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }

    /// The generator behind this node, if any.
    pub fn generator(&self) -> Option<&VectorGenerator> {
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

    /// Last computed vector.
    pub fn value(&self) -> DVec3 {
        match self {
            Self::Constant(value) => *value,
            Self::Generated(generator) => generator.value(),
        }
    }

    /// Write this node under `section[key]`. Constants become `{x, y, z}`.
    pub fn serialize(&self, section: &mut ConfigSection, key: &str) {
        let mut body = ConfigSection::new();
        match self {
            Self::Constant(value) => write_components(&mut body, *value),
            Self::Generated(generator) => generator.write(&mut body),
        }
        section.set_section(key, body);
    }

    /// Fully independent copy of the tree.
    pub fn deep_copy(&self) -> Self {
        self.clone()
    }
}

fn is_component_section(body: &ConfigSection) -> bool {
    !body.is_empty() && body.keys().all(|key| COMPONENT_KEYS.contains(&key))
}

fn write_components(body: &mut ConfigSection, value: DVec3) {
    body.set_double("x", value.x);
    body.set_double("y", value.y);
    body.set_double("z", value.z);
}

impl From<DVec3> for VectorNode {
    fn from(value: DVec3) -> Self {
        Self::Constant(value)
    }
}

impl From<VectorGenerator> for VectorNode {
    fn from(generator: VectorGenerator) -> Self {
        Self::Generated(Box::new(generator))
    }
}

impl Provider for VectorNode {
    type Output = DVec3;

    fn refresh(&mut self) {
        VectorNode::refresh(self);
    }

    fn value(&self) -> DVec3 {
        VectorNode::value(self)
    }

    fn serialize(&self, section: &mut ConfigSection, key: &str) {
        VectorNode::serialize(self, section, key);
    }
}
