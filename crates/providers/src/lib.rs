//! Config-driven animated values.
//!
//! A configuration tree describes scalar or vector expressions built from
//! constants, arithmetic and periodic waveforms. The tree is parsed once into
//! owned nodes, advanced with `refresh()` once per tick and read with
//! `value()` as often as needed. `serialize()` writes it back in the shape it
//! was parsed from, including the current phase of every waveform.
#![warn(missing_docs)]

mod dispatch;
mod document;
mod error;
mod random;
pub mod scalar;
pub mod vector;

pub use document::ProviderDocument;
pub use error::{ProviderError, ProviderResult};
pub use glam::DVec3;
pub use random::seed_random;
pub use scalar::{Func, ScalarGenerator, ScalarKind, ScalarNode};
pub use vector::{VectorGenerator, VectorKind, VectorNode};

use mdfx_config::ConfigSection;

/// A tick-driven value source.
pub trait Provider {
    /// Value type produced each tick.
    type Output: Copy;

    /// Advance one tick: children first, then this node.
    fn refresh(&mut self);

    /// Last computed value. Never advances state.
    fn value(&self) -> Self::Output;

    /// Write this provider under `section[key]`.
    fn serialize(&self, section: &mut ConfigSection, key: &str);
}
