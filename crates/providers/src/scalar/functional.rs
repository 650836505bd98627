//! Arity-checked arithmetic over child nodes.

use super::{ScalarKind, ScalarNode};

/// Arithmetic operator of a functional generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Func {
    /// Sum, identity 0.
    Add,
    /// `a - b`.
    Sub,
    /// Product, identity 1.
    Mul,
    /// `a / b`; dividing by zero yields `inf` or `NaN`.
    Div,
    /// `a % b`; modulo zero yields `NaN`.
    Mod,
    /// Smallest argument, seeded with `+inf`.
    Min,
    /// Largest argument, seeded with `-inf`.
    Max,
}

impl Func {
    /// Accepted argument count as `(min, max)`; `None` means unbounded.
    pub const fn arity(self) -> (usize, Option<usize>) {
        match self {
            Self::Add | Self::Mul | Self::Min | Self::Max => (2, None),
            Self::Sub | Self::Div | Self::Mod => (2, Some(2)),
        }
    }

    /// Matching tag-table entry.
    pub const fn kind(self) -> ScalarKind {
        match self {
            Self::Add => ScalarKind::Add,
            Self::Sub => ScalarKind::Sub,
            Self::Mul => ScalarKind::Mul,
            Self::Div => ScalarKind::Div,
            Self::Mod => ScalarKind::Mod,
            Self::Min => ScalarKind::Min,
            Self::Max => ScalarKind::Max,
        }
    }

    /// Combine the current values of `args`.
    pub(crate) fn apply(self, args: &[ScalarNode]) -> f64 {
        let values = args.iter().map(ScalarNode::value);
        match self {
            Self::Add => values.fold(0.0, |acc, v| acc + v),
            Self::Mul => values.fold(1.0, |acc, v| acc * v),
            Self::Min => values.fold(f64::INFINITY, f64::min),
            Self::Max => values.fold(f64::NEG_INFINITY, f64::max),
            Self::Sub => binary(args, |a, b| a - b),
            Self::Div => binary(args, |a, b| a / b),
            Self::Mod => binary(args, |a, b| a % b),
        }
    }
}

fn binary(args: &[ScalarNode], op: fn(f64, f64) -> f64) -> f64 {
    match args {
        [a, b] => op(a.value(), b.value()),
        // arity is checked at construction
        _ => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(values: &[f64]) -> Vec<ScalarNode> {
        values.iter().copied().map(ScalarNode::constant).collect()
    }

    #[test]
    fn folds_use_identity_elements() {
        assert_eq!(Func::Add.apply(&nodes(&[1.0, 2.0, 3.0])), 6.0);
        assert_eq!(Func::Mul.apply(&nodes(&[2.0, 3.0, 4.0])), 24.0);
        assert_eq!(Func::Min.apply(&nodes(&[5.0, -2.0, 3.0])), -2.0);
        assert_eq!(Func::Max.apply(&nodes(&[5.0, -2.0, 3.0])), 5.0);
    }

    #[test]
    fn max_of_all_negative_inputs_is_the_true_maximum() {
        assert_eq!(Func::Max.apply(&nodes(&[-7.0, -3.0, -12.0])), -3.0);
        assert_eq!(Func::Min.apply(&nodes(&[1e300, 2e300])), 1e300);
    }

    #[test]
    fn binary_operators_respect_order() {
        assert_eq!(Func::Sub.apply(&nodes(&[10.0, 4.0])), 6.0);
        assert_eq!(Func::Div.apply(&nodes(&[9.0, 3.0])), 3.0);
        assert_eq!(Func::Mod.apply(&nodes(&[-7.0, 3.0])), -1.0);
    }

    #[test]
    fn arity_table() {
        assert_eq!(Func::Add.arity(), (2, None));
        assert_eq!(Func::Sub.arity(), (2, Some(2)));
        assert_eq!(Func::Mod.kind(), ScalarKind::Mod);
    }
}
