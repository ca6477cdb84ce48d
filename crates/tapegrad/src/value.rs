//! Dynamically typed operands.
//!
//! [`Value`] is the boundary where a caller can hand in "anything numeric".
//! Tensor operations accept it to choose between elementwise and broadcast
//! forms; scalar-only contexts convert it with [`Value::to_scalar`], which
//! rejects tensors.

use crate::autodiff::{BinaryOp, Operand, Variable};
use crate::error::{AutogradError, Result};
use crate::scalar::Scalar;
use crate::tensor::Tensor;
use std::cmp::Ordering;

/// A number, a variable, or a tensor.
#[derive(Debug, Clone)]
pub enum Value<'a> {
    Number(Scalar),
    Variable(Variable),
    Tensor(&'a Tensor),
}

impl Value<'_> {
    /// Name of the held kind, as used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Variable(_) => "Variable",
            Value::Tensor(_) => "Tensor",
        }
    }

    /// Numeric value of a number or variable.
    ///
    /// # Errors
    ///
    /// Returns `AutogradError::InvalidOperandType` for a tensor.
    ///
    /// ```
    /// use tapegrad::{Tensor, Variable, value::Value};
    ///
    /// assert_eq!(Value::from(&Variable::new(3)).to_scalar().unwrap(), 3);
    /// assert_eq!(Value::from(2.5).to_scalar().unwrap(), 2.5);
    ///
    /// let t = Tensor::zeros(&[2], false);
    /// assert!(Value::from(&t).to_scalar().is_err());
    /// ```
    pub fn to_scalar(&self) -> Result<Scalar> {
        self.to_operand().map(|operand| operand.value())
    }

    /// Convert to a tape operand.
    ///
    /// # Errors
    ///
    /// Returns `AutogradError::InvalidOperandType` for a tensor.
    pub fn to_operand(&self) -> Result<Operand> {
        match self {
            Value::Number(c) => Ok(Operand::Constant(*c)),
            Value::Variable(v) => Ok(Operand::Variable(v.clone())),
            Value::Tensor(_) => Err(AutogradError::InvalidOperandType {
                expected: "Variable or number",
                found: self.kind(),
            }),
        }
    }
}

impl From<Variable> for Value<'_> {
    fn from(v: Variable) -> Self {
        Value::Variable(v)
    }
}

impl From<&Variable> for Value<'_> {
    fn from(v: &Variable) -> Self {
        Value::Variable(v.clone())
    }
}

impl<'a> From<&'a Tensor> for Value<'a> {
    fn from(t: &'a Tensor) -> Self {
        Value::Tensor(t)
    }
}

impl From<Operand> for Value<'_> {
    fn from(operand: Operand) -> Self {
        match operand {
            Operand::Variable(v) => Value::Variable(v),
            Operand::Constant(c) => Value::Number(c),
        }
    }
}

macro_rules! impl_value_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value<'_> {
                fn from(c: $t) -> Self {
                    Value::Number(Scalar::from(c))
                }
            }
        )*
    };
}

impl_value_from_number!(i32, i64, f32, f64, Scalar);

/// Convert anything numeric to a [`Scalar`].
///
/// # Errors
///
/// Returns `AutogradError::InvalidOperandType` for a tensor.
pub fn to_scalar<'a>(value: impl Into<Value<'a>>) -> Result<Scalar> {
    value.into().to_scalar()
}

impl Variable {
    /// Apply a binary operation to a dynamically typed right-hand side.
    ///
    /// # Errors
    ///
    /// Returns `AutogradError::InvalidOperandType` when `rhs` is a tensor and
    /// `AutogradError::Unimplemented` for floor division.
    pub fn try_binary<'a>(&self, op: BinaryOp, rhs: impl Into<Value<'a>>) -> Result<Variable> {
        let rhs = rhs.into().to_operand()?;
        op.apply(self.into(), rhs)
    }

    /// Compare values with a dynamically typed right-hand side.
    ///
    /// # Errors
    ///
    /// Returns `AutogradError::InvalidOperandType` when `rhs` is a tensor.
    pub fn try_compare<'a>(&self, rhs: impl Into<Value<'a>>) -> Result<Option<Ordering>> {
        let rhs = rhs.into().to_scalar()?;
        Ok(self.value().partial_cmp(&rhs))
    }
}
