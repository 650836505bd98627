//! Tag table and evaluation node for scalar generators.

use mdfx_config::{join_path, ConfigSection, ErrorSink};

use super::bounds::{Bounds, Clamp, START_END};
use super::functional::Func;
use super::waveform::{Cycle, PingPong, Pulse, RandomRange};
use super::ScalarNode;
use crate::dispatch::{arg_key, check_arity, select_tag, with_body};
use crate::error::ProviderResult;

/// Every scalar generator type, keyed by its configuration tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Sum of all arguments.
    Add,
    /// `a - b`.
    Sub,
    /// Product of all arguments.
    Mul,
    /// `a / b`.
    Div,
    /// `a % b` (truncated remainder).
    Mod,
    /// Smallest argument.
    Min,
    /// Largest argument.
    Max,
    /// Absolute value of a single operand.
    Abs,
    /// `value` limited to `[min, max]`.
    Clamp,
    /// Sawtooth ramp from `start` to `end`.
    Cycle,
    /// Triangle wave between `min` and `max`.
    PingPong,
    /// Sine wave between `min` and `max`.
    Pulse,
    /// Uniform sample in `[min, max]`, redrawn every refresh.
    Random,
}

impl ScalarKind {
    /// All kinds, in tag-table order.
    pub const ALL: [Self; 13] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::Min,
        Self::Max,
        Self::Abs,
        Self::Clamp,
        Self::Cycle,
        Self::PingPong,
        Self::Pulse,
        Self::Random,
    ];

    /// Canonical (lower-case) configuration tag.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Mod => "mod",
            Self::Min => "min",
            Self::Max => "max",
            Self::Abs => "abs",
            Self::Clamp => "clamp",
            Self::Cycle => "cycle",
            Self::PingPong => "pingpong",
            Self::Pulse => "pulse",
            Self::Random => "random",
        }
    }

    /// Resolve a tag, ignoring ASCII case.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(tag))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ScalarOp {
    Functional { func: Func, args: Vec<ScalarNode> },
    Abs(ScalarNode),
    Clamp(Clamp),
    Cycle(Cycle),
    PingPong(PingPong),
    Pulse(Pulse),
    Random(RandomRange),
}

impl ScalarOp {
    fn kind(&self) -> ScalarKind {
        match self {
            Self::Functional { func, .. } => func.kind(),
            Self::Abs(_) => ScalarKind::Abs,
            Self::Clamp(_) => ScalarKind::Clamp,
            Self::Cycle(_) => ScalarKind::Cycle,
            Self::PingPong(_) => ScalarKind::PingPong,
            Self::Pulse(_) => ScalarKind::Pulse,
            Self::Random(_) => ScalarKind::Random,
        }
    }

    fn read(
        kind: ScalarKind,
        section: &ConfigSection,
        tag: &str,
        sink: &mut dyn ErrorSink,
        path: &str,
    ) -> ProviderResult<Self> {
        let func = match kind {
            // abs takes its operand directly under the tag key
            ScalarKind::Abs => {
                return ScalarNode::from_config(section, tag, sink, path, None).map(Self::Abs)
            }
            ScalarKind::Clamp => {
                return with_body(section, tag, sink, path, Clamp::read).map(Self::Clamp)
            }
            ScalarKind::Cycle => {
                return with_body(section, tag, sink, path, Cycle::read).map(Self::Cycle)
            }
            ScalarKind::PingPong => {
                return with_body(section, tag, sink, path, PingPong::read).map(Self::PingPong)
            }
            ScalarKind::Pulse => {
                return with_body(section, tag, sink, path, Pulse::read).map(Self::Pulse)
            }
            ScalarKind::Random => {
                return with_body(section, tag, sink, path, RandomRange::read).map(Self::Random)
            }
            ScalarKind::Add => Func::Add,
            ScalarKind::Sub => Func::Sub,
            ScalarKind::Mul => Func::Mul,
            ScalarKind::Div => Func::Div,
            ScalarKind::Mod => Func::Mod,
            ScalarKind::Min => Func::Min,
            ScalarKind::Max => Func::Max,
        };

        let args = with_body(section, tag, sink, path, read_args)?;
        let (min, max) = func.arity();
        check_arity(tag, args.len(), min, max, &join_path(path, tag))
            .map_err(|err| err.report(sink))?;
        Ok(Self::Functional { func, args })
    }

    fn refresh(&mut self) -> f64 {
        match self {
            Self::Functional { func, args } => {
                args.iter_mut().for_each(ScalarNode::refresh);
                func.apply(args)
            }
            Self::Abs(inner) => {
                inner.refresh();
                inner.value().abs()
            }
            Self::Clamp(clamp) => clamp.refresh(),
            Self::Cycle(cycle) => cycle.refresh(),
            Self::PingPong(ping_pong) => ping_pong.refresh(),
            Self::Pulse(pulse) => pulse.refresh(),
            Self::Random(random) => random.refresh(),
        }
    }

    fn peek(&self) -> f64 {
        match self {
            Self::Functional { func, args } => func.apply(args),
            Self::Abs(inner) => inner.value().abs(),
            Self::Clamp(clamp) => clamp.peek(),
            Self::Cycle(cycle) => cycle.peek(),
            Self::PingPong(ping_pong) => ping_pong.peek(),
            Self::Pulse(pulse) => pulse.peek(),
            Self::Random(random) => random.peek(),
        }
    }

    fn progress(&self) -> Option<f64> {
        match self {
            Self::Cycle(cycle) => Some(cycle.progress()),
            Self::PingPong(ping_pong) => Some(ping_pong.progress()),
            Self::Pulse(pulse) => Some(pulse.progress()),
            Self::Functional { .. } | Self::Abs(_) | Self::Clamp(_) | Self::Random(_) => None,
        }
    }

    fn write_body(&self, body: &mut ConfigSection) {
        match self {
            Self::Functional { args, .. } => {
                for (index, arg) in args.iter().enumerate() {
                    arg.serialize(body, &arg_key(index));
                }
            }
            Self::Abs(_) => {}
            Self::Clamp(clamp) => clamp.write(body),
            Self::Cycle(cycle) => cycle.write(body),
            Self::PingPong(ping_pong) => ping_pong.write(body),
            Self::Pulse(pulse) => pulse.write(body),
            Self::Random(random) => random.write(body),
        }
    }
}

fn read_args(
    body: &ConfigSection,
    sink: &mut dyn ErrorSink,
    path: &str,
) -> ProviderResult<Vec<ScalarNode>> {
    let parsed: Vec<ProviderResult<ScalarNode>> = body
        .keys()
        .map(|key| ScalarNode::from_config(body, key, &mut *sink, path, None))
        .collect();
    parsed.into_iter().collect()
}

/// A scalar evaluation node with its last computed value.
///
/// The value is computed once at construction from the initial state, so it is
/// readable before the first refresh: periodic generators report the value at
/// their initial progress, functional ones combine their children's values,
/// and `random` reports its lower bound.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarGenerator {
    op: ScalarOp,
    value: f64,
}

impl ScalarGenerator {
    fn from_op(op: ScalarOp) -> Self {
        let value = op.peek();
        Self { op, value }
    }

    /// Parse a one-tag section such as `{ cycle = { .. } }`.
    pub fn from_section(
        section: &ConfigSection,
        sink: &mut dyn ErrorSink,
        path: &str,
    ) -> ProviderResult<Self> {
        let (kind, tag) = select_tag(section, ScalarKind::from_tag, sink, path)?;
        ScalarOp::read(kind, section, &tag, sink, path).map(Self::from_op)
    }

    /// N-ary arithmetic over `args`; fails when the count is outside the
    /// operator's arity.
    pub fn functional(func: Func, args: Vec<ScalarNode>) -> ProviderResult<Self> {
        let (min, max) = func.arity();
        check_arity(func.kind().tag(), args.len(), min, max, "")?;
        Ok(Self::from_op(ScalarOp::Functional { func, args }))
    }

    /// Absolute value of `inner`.
    pub fn abs(inner: ScalarNode) -> Self {
        Self::from_op(ScalarOp::Abs(inner))
    }

    /// `value` limited to `[min, max]`; the bounds are reordered if inverted.
    pub fn clamp(min: ScalarNode, max: ScalarNode, value: ScalarNode) -> Self {
        Self::from_op(ScalarOp::Clamp(Clamp::new(Bounds::new(min, max), value)))
    }

    /// Sawtooth ramp over `period` ticks from the lower to the upper of
    /// `start` and `end`.
    pub fn cycle(
        start: ScalarNode,
        end: ScalarNode,
        period: ScalarNode,
        initial_progress: f64,
    ) -> Self {
        Self::from_op(ScalarOp::Cycle(Cycle::new(
            Bounds::named(start, end, START_END),
            period,
            initial_progress,
        )))
    }

    /// Triangle wave making one full `min -> max -> min` trip per `period` ticks.
    pub fn ping_pong(
        min: ScalarNode,
        max: ScalarNode,
        period: ScalarNode,
        initial_progress: f64,
    ) -> Self {
        Self::from_op(ScalarOp::PingPong(PingPong::new(
            Bounds::new(min, max),
            period,
            initial_progress,
        )))
    }

    /// Sine wave between `min` and `max` with the given period in ticks.
    pub fn pulse(
        min: ScalarNode,
        max: ScalarNode,
        period: ScalarNode,
        initial_progress: f64,
    ) -> Self {
        Self::from_op(ScalarOp::Pulse(Pulse::new(
            Bounds::new(min, max),
            period,
            initial_progress,
        )))
    }

    /// Uniform sample in `[min, max]`, redrawn on every refresh.
    pub fn random(min: ScalarNode, max: ScalarNode) -> Self {
        Self::from_op(ScalarOp::Random(RandomRange::new(Bounds::new(min, max))))
    }

    /// Which generator this is.
    pub fn kind(&self) -> ScalarKind {
        self.op.kind()
    }

    /// Current phase of periodic generators.
    pub fn progress(&self) -> Option<f64> {
        self.op.progress()
    }

    /// Refresh children, advance state and recompute the cached value.
    pub fn refresh(&mut self) {
        self.value = self.op.refresh();
    }

    /// Last computed value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Write `{ tag = body }` into `section`.
    pub fn write(&self, section: &mut ConfigSection) {
        let tag = self.kind().tag();
        if let ScalarOp::Abs(inner) = &self.op {
            inner.serialize(section, tag);
            return;
        }
        let mut body = ConfigSection::new();
        self.op.write_body(&mut body);
        section.set_section(tag, body);
    }
}
