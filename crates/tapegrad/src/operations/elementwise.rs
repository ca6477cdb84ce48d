//! Element-wise tensor arithmetic.
//!
//! Tensor/tensor operands must have equal shapes. Numbers and variables
//! are broadcast to every element.

use crate::autodiff::{BinaryOp, Operand};
use crate::error::{AutogradError, Result};
use crate::scalar::Scalar;
use crate::tensor::Tensor;
use crate::value::Value;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Apply a binary operation element by element.
///
/// # Errors
///
/// Returns `AutogradError::ShapeMismatch` if `rhs` is a tensor of another
/// shape and `AutogradError::Unimplemented` for floor division.
///
/// # Example
///
/// ```
/// use tapegrad::{BinaryOp, to_tensor};
/// use tapegrad::operations::apply_binary;
///
/// let a = to_tensor(vec![1, 2, 3]).unwrap();
/// let b = to_tensor(vec![10, 20, 30]).unwrap();
/// let c = apply_binary(BinaryOp::Mul, &a, &b).unwrap();
/// assert_eq!(c.at(2).unwrap(), 90);
/// ```
pub fn apply_binary<'a>(op: BinaryOp, lhs: &Tensor, rhs: impl Into<Value<'a>>) -> Result<Tensor> {
    match rhs.into() {
        Value::Tensor(rhs) => {
            if lhs.shape() != rhs.shape() {
                return Err(AutogradError::ShapeMismatch {
                    expected: lhs.shape().to_vec(),
                    actual: rhs.shape().to_vec(),
                });
            }
            let data = lhs
                .variables()
                .zip(rhs.variables())
                .map(|(a, b)| op.apply(a.into(), b.into()))
                .collect::<Result<Vec<_>>>()?;
            Tensor::from_vec(data, lhs.shape())
        }
        scalar => {
            let rhs = scalar.to_operand()?;
            lhs.try_map(|a| op.apply(a.into(), rhs.clone()))
        }
    }
}

impl Tensor {
    /// Element-wise `self + rhs`.
    ///
    /// # Errors
    ///
    /// See [`apply_binary`].
    pub fn add<'a>(&self, rhs: impl Into<Value<'a>>) -> Result<Tensor> {
        apply_binary(BinaryOp::Add, self, rhs)
    }

    /// Element-wise `self - rhs`.
    ///
    /// # Errors
    ///
    /// See [`apply_binary`].
    pub fn sub<'a>(&self, rhs: impl Into<Value<'a>>) -> Result<Tensor> {
        apply_binary(BinaryOp::Sub, self, rhs)
    }

    /// Element-wise `self * rhs`.
    ///
    /// # Errors
    ///
    /// See [`apply_binary`].
    pub fn mul<'a>(&self, rhs: impl Into<Value<'a>>) -> Result<Tensor> {
        apply_binary(BinaryOp::Mul, self, rhs)
    }

    /// Element-wise `self / rhs`.
    ///
    /// # Errors
    ///
    /// See [`apply_binary`].
    pub fn div<'a>(&self, rhs: impl Into<Value<'a>>) -> Result<Tensor> {
        apply_binary(BinaryOp::Div, self, rhs)
    }

    /// Element-wise `self ^ rhs`.
    ///
    /// # Errors
    ///
    /// See [`apply_binary`].
    pub fn pow<'a>(&self, rhs: impl Into<Value<'a>>) -> Result<Tensor> {
        apply_binary(BinaryOp::Pow, self, rhs)
    }
}

// Operators accept scalar right-hand sides only, so they cannot fail.
macro_rules! impl_broadcast_op {
    ($trait:ident, $method:ident) => {
        impl<R: Into<Operand>> $trait<R> for &Tensor {
            type Output = Tensor;

            fn $method(self, rhs: R) -> Tensor {
                let rhs = rhs.into();
                self.map(|v| v.$method(rhs.clone()))
            }
        }
    };
}

impl_broadcast_op!(Add, add);
impl_broadcast_op!(Sub, sub);
impl_broadcast_op!(Mul, mul);
impl_broadcast_op!(Div, div);

macro_rules! impl_reverse_broadcast_ops {
    ($($t:ty),*) => {
        $(
            impl Add<&Tensor> for $t {
                type Output = Tensor;
                fn add(self, rhs: &Tensor) -> Tensor {
                    rhs.map(|v| self + v)
                }
            }

            impl Sub<&Tensor> for $t {
                type Output = Tensor;
                fn sub(self, rhs: &Tensor) -> Tensor {
                    rhs.map(|v| self - v)
                }
            }

            impl Mul<&Tensor> for $t {
                type Output = Tensor;
                fn mul(self, rhs: &Tensor) -> Tensor {
                    rhs.map(|v| self * v)
                }
            }

            impl Div<&Tensor> for $t {
                type Output = Tensor;
                fn div(self, rhs: &Tensor) -> Tensor {
                    rhs.map(|v| self / v)
                }
            }
        )*
    };
}

impl_reverse_broadcast_ops!(i32, f64, Scalar);

impl Neg for &Tensor {
    type Output = Tensor;

    fn neg(self) -> Tensor {
        self.map(|v| -v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autodiff::Variable;
    use crate::tensor::to_tensor;
    use approx::assert_relative_eq;

    #[test]
    fn test_tensor_tensor() {
        let a = to_tensor(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let b = to_tensor(vec![vec![5, 6], vec![7, 8]]).unwrap();

        let sum = a.add(&b).unwrap();
        assert_eq!(sum.shape(), &[2, 2]);
        let expected: Vec<Scalar> = [6, 8, 10, 12].into_iter().map(Scalar::from).collect();
        assert_eq!(sum.values(), expected);

        let diff = b.sub(&a).unwrap();
        assert!(diff.variables().all(|v| v == &4));

        let quotient = b.div(&a).unwrap();
        assert_relative_eq!(quotient.at([1, 1]).unwrap().value().to_f64(), 2.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let a = Tensor::ones(&[2, 2], true);
        let b = Tensor::ones(&[4], true);
        assert_eq!(
            a.mul(&b).unwrap_err(),
            AutogradError::ShapeMismatch {
                expected: vec![2, 2],
                actual: vec![4]
            }
        );
    }

    #[test]
    fn test_broadcast_scalar_and_variable() {
        let a = to_tensor(vec![1.0, 2.0, 3.0]).unwrap();
        let squared = a.pow(2).unwrap();
        assert_eq!(squared.at(2).unwrap(), 9.0);

        let w = Variable::new(2.0);
        let scaled = a.mul(&w).unwrap();
        scaled.at(1).unwrap().backward().unwrap();
        assert_eq!(w.grad(), 2.0);
        assert_eq!(a.at(1).unwrap().grad(), 2.0);
    }

    #[test]
    fn test_operator_overloads() {
        let a = to_tensor(vec![2, 4]).unwrap();
        assert_eq!((&a + 1).values(), vec![Scalar::from(3), Scalar::from(5)]);
        assert_eq!((&a * 0.5).values(), vec![Scalar::from(1.0), Scalar::from(2.0)]);
        assert_eq!((10 - &a).values(), vec![Scalar::from(8), Scalar::from(6)]);
        assert_eq!((8.0 / &a).values(), vec![Scalar::from(4.0), Scalar::from(2.0)]);
        assert_eq!((-&a).values(), vec![Scalar::from(-2), Scalar::from(-4)]);
    }

    #[test]
    fn test_floor_div_unimplemented() {
        let a = Tensor::ones(&[2], false);
        assert!(matches!(
            apply_binary(BinaryOp::FloorDiv, &a, 2),
            Err(AutogradError::Unimplemented { .. })
        ));
    }
}
