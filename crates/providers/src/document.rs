//! A named collection of providers loaded from one effect document.
//!
//! ```toml
//! [scalars]
//! size = { pulse = { min = 0.5, max = 1.5, period = 40 } }
//!
//! [vectors]
//! offset = [0, 1, 0]
//! ```

use mdfx_config::{join_path, ConfigSection, Entry, ErrorSink};
use mdfx_core::SimTick;
use tracing::debug;

use crate::error::ProviderError;
use crate::scalar::ScalarNode;
use crate::vector::VectorNode;

const SCALARS: &str = "scalars";
const VECTORS: &str = "vectors";

/// Every scalar and vector field of an effect, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderDocument {
    scalars: Vec<(String, ScalarNode)>,
    vectors: Vec<(String, VectorNode)>,
    tick: SimTick,
}

impl ProviderDocument {
    /// Read the `[scalars]` and `[vectors]` tables of `root`.
    ///
    /// A malformed field is reported to `sink` and left out; the remaining
    /// fields still load.
    pub fn from_section(root: &ConfigSection, sink: &mut dyn ErrorSink, path: &str) -> Self {
        for key in root.keys().filter(|key| *key != SCALARS && *key != VECTORS) {
            debug!(path, key, "ignoring unknown top-level key");
        }

        let mut document = Self::default();
        if let Some(table) = table(root, SCALARS, sink, path) {
            let table_path = join_path(path, SCALARS);
            for key in table.keys() {
                if let Ok(node) = ScalarNode::from_config(&table, key, sink, &table_path, None) {
                    document.scalars.push((key.to_string(), node));
                }
            }
        }
        if let Some(table) = table(root, VECTORS, sink, path) {
            let table_path = join_path(path, VECTORS);
            for key in table.keys() {
                if let Ok(node) = VectorNode::from_config(&table, key, sink, &table_path, None) {
                    document.vectors.push((key.to_string(), node));
                }
            }
        }
        document
    }

    /// Add or replace a scalar field.
    pub fn insert_scalar(&mut self, name: &str, node: ScalarNode) {
        match self.scalars.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = node,
            None => self.scalars.push((name.to_string(), node)),
        }
    }

    /// Add or replace a vector field.
    pub fn insert_vector(&mut self, name: &str, node: VectorNode) {
        match self.vectors.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = node,
            None => self.vectors.push((name.to_string(), node)),
        }
    }

    /// Advance every field one tick.
    pub fn refresh(&mut self) {
        self.scalars.iter_mut().for_each(|(_, node)| node.refresh());
        self.vectors.iter_mut().for_each(|(_, node)| node.refresh());
        self.tick = self.tick.advance(1);
    }

    /// Number of refreshes applied since loading.
    pub fn tick(&self) -> SimTick {
        self.tick
    }

    /// Scalar field by name.
    pub fn scalar(&self, name: &str) -> Option<&ScalarNode> {
        self.scalars
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, node)| node)
    }

    /// Vector field by name.
    pub fn vector(&self, name: &str) -> Option<&VectorNode> {
        self.vectors
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, node)| node)
    }

    /// Scalar fields in document order.
    pub fn scalars(&self) -> impl Iterator<Item = (&str, &ScalarNode)> + '_ {
        self.scalars.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// Vector fields in document order.
    pub fn vectors(&self) -> impl Iterator<Item = (&str, &VectorNode)> + '_ {
        self.vectors.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// Total number of fields.
    pub fn len(&self) -> usize {
        self.scalars.len() + self.vectors.len()
    }

    /// Whether no field loaded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write every field back into a document of the loaded shape.
    pub fn to_section(&self) -> ConfigSection {
        let mut root = ConfigSection::new();
        if !self.scalars.is_empty() {
            let mut table = ConfigSection::new();
            for (key, node) in &self.scalars {
                node.serialize(&mut table, key);
            }
            root.set_section(SCALARS, table);
        }
        if !self.vectors.is_empty() {
            let mut table = ConfigSection::new();
            for (key, node) in &self.vectors {
                node.serialize(&mut table, key);
            }
            root.set_section(VECTORS, table);
        }
        root
    }
}

fn table(
    root: &ConfigSection,
    key: &str,
    sink: &mut dyn ErrorSink,
    path: &str,
) -> Option<ConfigSection> {
    match root.entry(key)? {
        Entry::Section(table) => Some(table),
        other => {
            ProviderError::invalid(
                format!("{key} must be a section, found {}", other.type_name()),
                &join_path(path, key),
            )
            .report(sink);
            None
        }
    }
}
