//! Tag table and evaluation node for vector generators.

use std::f64::consts::TAU;

use glam::{DQuat, DVec3};
use mdfx_config::{join_path, ConfigSection, ErrorSink};

use super::VectorNode;
use crate::dispatch::{
    arg_key, check_arity, read_initial_progress, select_tag, with_body, wrap_progress,
    INITIAL_PROGRESS,
};
use crate::error::ProviderResult;
use crate::scalar::ScalarNode;

/// Every vector generator type, keyed by its configuration tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorKind {
    /// Sum of all arguments.
    Add,
    /// `a - b`.
    Sub,
    /// Component-wise product of all arguments.
    Mul,
    /// `a x b`.
    Cross,
    /// Unit-length copy of a single operand.
    Normalize,
    /// Vector times a scalar factor.
    Scale,
    /// Point orbiting the origin in the plane perpendicular to `about`.
    Rotate,
    /// Three independent scalar components.
    Components,
}

impl VectorKind {
    /// All kinds, in tag-table order.
    pub const ALL: [Self; 8] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Cross,
        Self::Normalize,
        Self::Scale,
        Self::Rotate,
        Self::Components,
    ];

    /// Canonical (lower-case) configuration tag.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Cross => "cross",
            Self::Normalize => "normalize",
            Self::Scale => "scale",
            Self::Rotate => "rotate",
            Self::Components => "components",
        }
    }

    /// Resolve a tag, ignoring ASCII case.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(tag))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VectorFunc {
    Add,
    Sub,
    Mul,
    Cross,
}

impl VectorFunc {
    const fn arity(self) -> (usize, Option<usize>) {
        match self {
            Self::Add | Self::Mul => (2, None),
            Self::Sub | Self::Cross => (2, Some(2)),
        }
    }

    const fn kind(self) -> VectorKind {
        match self {
            Self::Add => VectorKind::Add,
            Self::Sub => VectorKind::Sub,
            Self::Mul => VectorKind::Mul,
            Self::Cross => VectorKind::Cross,
        }
    }

    fn apply(self, args: &[VectorNode]) -> DVec3 {
        let values = args.iter().map(VectorNode::value);
        match self {
            Self::Add => values.fold(DVec3::ZERO, |acc, v| acc + v),
            Self::Mul => values.fold(DVec3::ONE, |acc, v| acc * v),
            Self::Sub => binary(args, |a, b| a - b),
            Self::Cross => binary(args, DVec3::cross),
        }
    }
}

fn binary(args: &[VectorNode], op: fn(DVec3, DVec3) -> DVec3) -> DVec3 {
    match args {
        [a, b] => op(a.value(), b.value()),
        _ => DVec3::NAN,
    }
}

/// Circular orbit of `radius` around `about`, one lap per `period` ticks.
#[derive(Debug, Clone, PartialEq)]
struct Rotate {
    about: VectorNode,
    period: ScalarNode,
    radius: ScalarNode,
    progress: f64,
}

impl Rotate {
    fn read(section: &ConfigSection, sink: &mut dyn ErrorSink, path: &str) -> ProviderResult<Self> {
        let about = VectorNode::from_config(section, "about", sink, path, None);
        let period = ScalarNode::from_config(section, "period", sink, path, None);
        let radius = ScalarNode::from_config(section, "radius", sink, path, Some(1.0));
        let initial = read_initial_progress(section, sink, path);
        Ok(Self {
            about: about?,
            period: period?,
            radius: radius?,
            progress: wrap_progress(initial?, 1.0),
        })
    }

    fn refresh(&mut self) -> DVec3 {
        self.about.refresh();
        self.period.refresh();
        self.radius.refresh();
        self.progress = wrap_progress(self.progress + 1.0 / self.period.value(), 1.0);
        self.peek()
    }

    /// Circle in the XZ plane (Y frame), rotated so Y lands on `about`.
    /// A zero-length axis leaves the circle in the Y frame.
    fn peek(&self) -> DVec3 {
        let angle = TAU * self.progress;
        let local = DVec3::new(angle.cos(), 0.0, angle.sin()) * self.radius.value();
        let axis = self.about.value().try_normalize().unwrap_or(DVec3::Y);
        DQuat::from_rotation_arc(DVec3::Y, axis) * local
    }

    fn write(&self, section: &mut ConfigSection) {
        self.about.serialize(section, "about");
        self.period.serialize(section, "period");
        self.radius.serialize(section, "radius");
        section.set_double(INITIAL_PROGRESS, self.progress);
    }
}

#[derive(Debug, Clone, PartialEq)]
enum VectorOp {
    Functional { func: VectorFunc, args: Vec<VectorNode> },
    Normalize(VectorNode),
    Scale { vector: VectorNode, factor: ScalarNode },
    Rotate(Rotate),
    Components { x: ScalarNode, y: ScalarNode, z: ScalarNode },
}

impl VectorOp {
    fn kind(&self) -> VectorKind {
        match self {
            Self::Functional { func, .. } => func.kind(),
            Self::Normalize(_) => VectorKind::Normalize,
            Self::Scale { .. } => VectorKind::Scale,
            Self::Rotate(_) => VectorKind::Rotate,
            Self::Components { .. } => VectorKind::Components,
        }
    }

    fn read(
        kind: VectorKind,
        section: &ConfigSection,
        tag: &str,
        sink: &mut dyn ErrorSink,
        path: &str,
    ) -> ProviderResult<Self> {
        let func = match kind {
            // normalize takes its operand directly under the tag key
            VectorKind::Normalize => {
                return VectorNode::from_config(section, tag, sink, path, None).map(Self::Normalize)
            }
            VectorKind::Scale => return with_body(section, tag, sink, path, read_scale),
            VectorKind::Rotate => {
                return with_body(section, tag, sink, path, Rotate::read).map(Self::Rotate)
            }
            VectorKind::Components => return with_body(section, tag, sink, path, read_components),
            VectorKind::Add => VectorFunc::Add,
            VectorKind::Sub => VectorFunc::Sub,
            VectorKind::Mul => VectorFunc::Mul,
            VectorKind::Cross => VectorFunc::Cross,
        };

        let args = with_body(section, tag, sink, path, read_args)?;
        let (min, max) = func.arity();
        check_arity(tag, args.len(), min, max, &join_path(path, tag))
            .map_err(|err| err.report(sink))?;
        Ok(Self::Functional { func, args })
    }

    fn refresh(&mut self) -> DVec3 {
        match self {
            Self::Functional { func, args } => {
                args.iter_mut().for_each(VectorNode::refresh);
                func.apply(args)
            }
            Self::Normalize(inner) => {
                inner.refresh();
                inner.value().normalize()
            }
            Self::Scale { vector, factor } => {
                vector.refresh();
                factor.refresh();
                vector.value() * factor.value()
            }
            Self::Rotate(rotate) => rotate.refresh(),
            Self::Components { x, y, z } => {
                x.refresh();
                y.refresh();
                z.refresh();
                DVec3::new(x.value(), y.value(), z.value())
            }
        }
    }

    fn peek(&self) -> DVec3 {
        match self {
            Self::Functional { func, args } => func.apply(args),
            Self::Normalize(inner) => inner.value().normalize(),
            Self::Scale { vector, factor } => vector.value() * factor.value(),
            Self::Rotate(rotate) => rotate.peek(),
            Self::Components { x, y, z } => DVec3::new(x.value(), y.value(), z.value()),
        }
    }
}

fn read_args(
    body: &ConfigSection,
    sink: &mut dyn ErrorSink,
    path: &str,
) -> ProviderResult<Vec<VectorNode>> {
    let parsed: Vec<ProviderResult<VectorNode>> = body
        .keys()
        .map(|key| VectorNode::from_config(body, key, &mut *sink, path, None))
        .collect();
    parsed.into_iter().collect()
}

fn read_scale(
    body: &ConfigSection,
    sink: &mut dyn ErrorSink,
    path: &str,
) -> ProviderResult<VectorOp> {
    let vector = VectorNode::from_config(body, "vector", sink, path, None);
    let factor = ScalarNode::from_config(body, "factor", sink, path, None);
    Ok(VectorOp::Scale {
        vector: vector?,
        factor: factor?,
    })
}

fn read_components(
    body: &ConfigSection,
    sink: &mut dyn ErrorSink,
    path: &str,
) -> ProviderResult<VectorOp> {
    let x = ScalarNode::from_config(body, "x", sink, path, Some(0.0));
    let y = ScalarNode::from_config(body, "y", sink, path, Some(0.0));
    let z = ScalarNode::from_config(body, "z", sink, path, Some(0.0));
    Ok(VectorOp::Components {
        x: x?,
        y: y?,
        z: z?,
    })
}

/// A vector evaluation node with its last computed value.
///
/// As with scalar generators, the value is computed at construction so it can
/// be read before the first refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorGenerator {
    op: VectorOp,
    value: DVec3,
}

impl VectorGenerator {
    fn from_op(op: VectorOp) -> Self {
        let value = op.peek();
        Self { op, value }
    }

    /// Parse a one-tag section such as `{ rotate = { .. } }`.
    pub fn from_section(
        section: &ConfigSection,
        sink: &mut dyn ErrorSink,
        path: &str,
    ) -> ProviderResult<Self> {
        let (kind, tag) = select_tag(section, VectorKind::from_tag, sink, path)?;
        VectorOp::read(kind, section, &tag, sink, path).map(Self::from_op)
    }

    fn functional(func: VectorFunc, args: Vec<VectorNode>) -> ProviderResult<Self> {
        let (min, max) = func.arity();
        check_arity(func.kind().tag(), args.len(), min, max, "")?;
        Ok(Self::from_op(VectorOp::Functional { func, args }))
    }

    /// Sum of two or more vectors.
    pub fn add(args: Vec<VectorNode>) -> ProviderResult<Self> {
        Self::functional(VectorFunc::Add, args)
    }

    /// `a - b`.
    pub fn sub(a: VectorNode, b: VectorNode) -> Self {
        Self::from_op(VectorOp::Functional {
            func: VectorFunc::Sub,
            args: vec![a, b],
        })
    }

    /// Component-wise product of two or more vectors.
    pub fn mul(args: Vec<VectorNode>) -> ProviderResult<Self> {
        Self::functional(VectorFunc::Mul, args)
    }

    /// `a x b`.
    pub fn cross(a: VectorNode, b: VectorNode) -> Self {
        Self::from_op(VectorOp::Functional {
            func: VectorFunc::Cross,
            args: vec![a, b],
        })
    }

    /// Unit-length copy of `inner`. A zero vector yields `NaN` components.
    pub fn normalize(inner: VectorNode) -> Self {
        Self::from_op(VectorOp::Normalize(inner))
    }

    /// `vector * factor`.
    pub fn scale(vector: VectorNode, factor: ScalarNode) -> Self {
        Self::from_op(VectorOp::Scale { vector, factor })
    }

    /// Orbit of `radius` around `about`, one lap per `period` ticks.
    pub fn rotate(
        about: VectorNode,
        period: ScalarNode,
        radius: ScalarNode,
        initial_progress: f64,
    ) -> Self {
        Self::from_op(VectorOp::Rotate(Rotate {
            about,
            period,
            radius,
            progress: wrap_progress(initial_progress.abs(), 1.0),
        }))
    }

    /// Vector assembled from three scalar nodes.
    pub fn components(x: ScalarNode, y: ScalarNode, z: ScalarNode) -> Self {
        Self::from_op(VectorOp::Components { x, y, z })
    }

    /// Which generator this is.
    pub fn kind(&self) -> VectorKind {
        self.op.kind()
    }

    /// Current phase of `rotate`.
    pub fn progress(&self) -> Option<f64> {
        match &self.op {
            VectorOp::Rotate(rotate) => Some(rotate.progress),
            _ => None,
        }
    }

    /// Refresh children, advance state and recompute the cached value.
    pub fn refresh(&mut self) {
        self.value = self.op.refresh();
    }

    /// Last computed value.
    pub fn value(&self) -> DVec3 {
        self.value
    }

    /// Write this generator into a node body. Components are written untagged
    /// as `{x, y, z}`; every other kind as `{ tag = body }`.
    pub fn write(&self, section: &mut ConfigSection) {
        let tag = self.kind().tag();
        let mut body = ConfigSection::new();
        match &self.op {
            VectorOp::Functional { args, .. } => {
                for (index, arg) in args.iter().enumerate() {
                    arg.serialize(&mut body, &arg_key(index));
                }
            }
            VectorOp::Normalize(inner) => {
                inner.serialize(section, tag);
                return;
            }
            VectorOp::Scale { vector, factor } => {
                vector.serialize(&mut body, "vector");
                factor.serialize(&mut body, "factor");
            }
            VectorOp::Rotate(rotate) => rotate.write(&mut body),
            VectorOp::Components { x, y, z } => {
                x.serialize(section, "x");
                y.serialize(section, "y");
                z.serialize(section, "z");
                return;
            }
        }
        section.set_section(tag, body);
    }
}
