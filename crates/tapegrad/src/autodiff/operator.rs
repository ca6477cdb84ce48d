//! Tape entries: one elementary operation and its gradient rule.

use super::variable::Variable;
use crate::error::{AutogradError, Result};
use crate::scalar::Scalar;
use smallvec::{SmallVec, smallvec};

/// One input of an [`Operator`]: a tracked variable or a bare constant.
#[derive(Debug, Clone)]
pub enum Operand {
    Variable(Variable),
    Constant(Scalar),
}

impl Operand {
    /// Current numeric value of the operand.
    ///
    /// For variables this is read at call time, so mutating a variable after
    /// it was recorded changes every gradient computed from it afterwards.
    pub fn value(&self) -> Scalar {
        match self {
            Operand::Variable(v) => v.value(),
            Operand::Constant(c) => *c,
        }
    }

    /// Constants never require gradients.
    pub fn requires_grad(&self) -> bool {
        match self {
            Operand::Variable(v) => v.requires_grad(),
            Operand::Constant(_) => false,
        }
    }

    /// The tracked variable, if this operand is one.
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Operand::Variable(v) => Some(v),
            Operand::Constant(_) => None,
        }
    }
}

impl From<Variable> for Operand {
    fn from(v: Variable) -> Self {
        Operand::Variable(v)
    }
}

impl From<&Variable> for Operand {
    fn from(v: &Variable) -> Self {
        Operand::Variable(v.clone())
    }
}

impl From<Scalar> for Operand {
    fn from(c: Scalar) -> Self {
        Operand::Constant(c)
    }
}

macro_rules! impl_operand_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(c: $t) -> Self {
                    Operand::Constant(Scalar::from(c))
                }
            }
        )*
    };
}

impl_operand_from_number!(i32, i64, f32, f64);

/// A recorded elementary operation.
///
/// Operand order matches construction order and is the order of the
/// partial derivatives returned by [`Operator::gradient`].
#[derive(Debug, Clone)]
pub enum Operator {
    Sum(Vec<Operand>),
    Product(Vec<Operand>),
    Division {
        numerator: Operand,
        denominator: Operand,
    },
    /// `base ^ exponent`. Only the base is differentiated.
    Power {
        base: Operand,
        exponent: Operand,
    },
    Exp(Operand),
    Cos(Operand),
    Sin(Operand),
    Tan(Operand),
    Tanh(Operand),
    Relu(Operand),
}

impl Operator {
    /// Build a division from an operand list.
    ///
    /// # Errors
    ///
    /// Returns `AutogradError::ArityViolation` unless exactly two operands
    /// are given.
    pub fn division(operands: Vec<Operand>) -> Result<Self> {
        let actual = operands.len();
        match <[Operand; 2]>::try_from(operands) {
            Ok([numerator, denominator]) => Ok(Operator::Division {
                numerator,
                denominator,
            }),
            Err(_) => Err(AutogradError::ArityViolation {
                operator: "Division",
                expected: 2,
                actual,
            }),
        }
    }

    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Sum(_) => "Sum",
            Operator::Product(_) => "Product",
            Operator::Division { .. } => "Division",
            Operator::Power { .. } => "Power",
            Operator::Exp(_) => "Exp",
            Operator::Cos(_) => "Cos",
            Operator::Sin(_) => "Sin",
            Operator::Tan(_) => "Tan",
            Operator::Tanh(_) => "Tanh",
            Operator::Relu(_) => "ReLU",
        }
    }

    /// Differentiable operands, in construction order.
    ///
    /// The exponent of a power is not listed: no gradient flows into it.
    pub fn operands(&self) -> SmallVec<[&Operand; 2]> {
        match self {
            Operator::Sum(ops) | Operator::Product(ops) => ops.iter().collect(),
            Operator::Division {
                numerator,
                denominator,
            } => smallvec![numerator, denominator],
            Operator::Power { base, .. } => smallvec![base],
            Operator::Exp(x)
            | Operator::Cos(x)
            | Operator::Sin(x)
            | Operator::Tan(x)
            | Operator::Tanh(x)
            | Operator::Relu(x) => smallvec![x],
        }
    }

    /// Consume the operator, returning every operand including a power's
    /// exponent.
    pub fn into_operands(self) -> Vec<Operand> {
        match self {
            Operator::Sum(ops) | Operator::Product(ops) => ops,
            Operator::Division {
                numerator,
                denominator,
            } => vec![numerator, denominator],
            Operator::Power { base, exponent } => vec![base, exponent],
            Operator::Exp(x)
            | Operator::Cos(x)
            | Operator::Sin(x)
            | Operator::Tan(x)
            | Operator::Tanh(x)
            | Operator::Relu(x) => vec![x],
        }
    }

    /// Partial derivative of the result with respect to each operand
    /// returned by [`Operator::operands`], evaluated at current values.
    pub fn gradient(&self) -> Vec<Scalar> {
        match self {
            Operator::Sum(ops) => vec![Scalar::one(); ops.len()],
            Operator::Product(ops) => {
                let values: Vec<Scalar> = ops.iter().map(Operand::value).collect();
                product_gradient(&values)
            }
            Operator::Division {
                numerator,
                denominator,
            } => {
                let a = numerator.value();
                let b = denominator.value();
                vec![Scalar::one() / b, -a / (b * b)]
            }
            Operator::Power { base, exponent } => {
                let a = base.value();
                let p = exponent.value();
                // x^0 is constant, including at x == 0.
                if p.is_zero() {
                    vec![Scalar::zero()]
                } else {
                    vec![p * a.pow(p - Scalar::one())]
                }
            }
            Operator::Exp(x) => vec![x.value().exp()],
            Operator::Cos(x) => vec![-x.value().sin()],
            Operator::Sin(x) => vec![x.value().cos()],
            Operator::Tan(x) => {
                let t = x.value().tan();
                vec![Scalar::one() + t * t]
            }
            Operator::Tanh(x) => {
                let t = x.value().tanh();
                vec![Scalar::one() - t * t]
            }
            Operator::Relu(x) => {
                let d = if x.value() > Scalar::zero() { 1 } else { 0 };
                vec![Scalar::from(d)]
            }
        }
    }
}

/// Partials of `v1 * v2 * ... * vn`.
///
/// When some value is zero, each zero-valued position receives the product
/// of the others and every non-zero position receives 0. With two or more
/// zeros every partial comes out 0; no undefined case is flagged.
fn product_gradient(values: &[Scalar]) -> Vec<Scalar> {
    let others = |i: usize| -> Scalar {
        values
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, &v)| v)
            .product()
    };

    if values.iter().any(|v| v.is_zero()) {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| if v.is_zero() { others(i) } else { Scalar::zero() })
            .collect()
    } else {
        (0..values.len()).map(others).collect()
    }
}
