//! Arithmetic and elementary functions on [`Variable`].
//!
//! Every operation computes its value eagerly and records an [`Operator`]
//! that references the exact operands used. The result requires gradients
//! when any operand does; grad mode can still veto both.
//!
//! | Expression | Recorded as |
//! |------------|-------------|
//! | `a + b` | `Sum(a, b)` |
//! | `a - b` | `Sum(a, Product(b, -1))` |
//! | `-a` | `Product(a, -1)` |
//! | `a * b` | `Product(a, b)` |
//! | `a / b` | `Division(a, b)` |
//! | `a.pow(p)` | `Power(a, p)` |

use super::operator::{Operand, Operator};
use super::variable::Variable;
use crate::error::{AutogradError, Result};
use crate::grad_mode::is_grad_enabled;
use crate::scalar::Scalar;
use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

fn record(operator: Operator, value: Scalar, requires_grad: bool) -> Variable {
    Variable::from_operation(value, requires_grad, operator)
}

pub(crate) fn sum(operands: Vec<Operand>) -> Variable {
    let value = operands.iter().map(Operand::value).sum();
    let requires_grad = operands.iter().any(Operand::requires_grad);
    record(Operator::Sum(operands), value, requires_grad)
}

pub(crate) fn product(operands: Vec<Operand>) -> Variable {
    let value = operands.iter().map(Operand::value).product();
    let requires_grad = operands.iter().any(Operand::requires_grad);
    record(Operator::Product(operands), value, requires_grad)
}

pub(crate) fn negate(operand: Operand) -> Operand {
    match operand {
        Operand::Constant(c) => Operand::Constant(-c),
        var @ Operand::Variable(_) => product(vec![var, Operand::from(-1)]).into(),
    }
}

pub(crate) fn subtract(lhs: Operand, rhs: Operand) -> Variable {
    sum(vec![lhs, negate(rhs)])
}

pub(crate) fn divide(numerator: Operand, denominator: Operand) -> Variable {
    let value = numerator.value() / denominator.value();
    let requires_grad = numerator.requires_grad() || denominator.requires_grad();
    record(
        Operator::Division {
            numerator,
            denominator,
        },
        value,
        requires_grad,
    )
}

pub(crate) fn power(base: Operand, exponent: Operand) -> Variable {
    let value = base.value().pow(exponent.value());
    let requires_grad = base.requires_grad() || exponent.requires_grad();
    record(Operator::Power { base, exponent }, value, requires_grad)
}

/// Binary operations reachable through dynamic dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    FloorDiv,
}

impl BinaryOp {
    /// Apply the operation to two operands, recording it on the tape.
    ///
    /// # Errors
    ///
    /// `FloorDiv` always fails with `AutogradError::Unimplemented`.
    pub fn apply(self, lhs: Operand, rhs: Operand) -> Result<Variable> {
        Ok(match self {
            BinaryOp::Add => sum(vec![lhs, rhs]),
            BinaryOp::Sub => subtract(lhs, rhs),
            BinaryOp::Mul => product(vec![lhs, rhs]),
            BinaryOp::Div => divide(lhs, rhs),
            BinaryOp::Pow => power(lhs, rhs),
            BinaryOp::FloorDiv => {
                return Err(AutogradError::Unimplemented {
                    operation: "floor_div",
                });
            }
        })
    }
}

impl Variable {
    fn unary(&self, value: Scalar, wrap: fn(Operand) -> Operator) -> Variable {
        record(wrap(Operand::from(self)), value, self.requires_grad())
    }

    /// Raise to a power. Only the base receives a gradient.
    pub fn pow(&self, exponent: impl Into<Operand>) -> Variable {
        power(self.into(), exponent.into())
    }

    pub fn exp(&self) -> Variable {
        self.unary(self.value().exp(), Operator::Exp)
    }

    pub fn cos(&self) -> Variable {
        self.unary(self.value().cos(), Operator::Cos)
    }

    pub fn sin(&self) -> Variable {
        self.unary(self.value().sin(), Operator::Sin)
    }

    pub fn tan(&self) -> Variable {
        self.unary(self.value().tan(), Operator::Tan)
    }

    pub fn tanh(&self) -> Variable {
        self.unary(self.value().tanh(), Operator::Tanh)
    }

    /// `max(x, 0)`; the gradient at exactly zero is 0.
    pub fn relu(&self) -> Variable {
        self.unary(self.value().relu(), Operator::Relu)
    }

    /// Floor division is not supported.
    ///
    /// # Errors
    ///
    /// Always returns `AutogradError::Unimplemented`.
    pub fn floor_div(&self, rhs: impl Into<Operand>) -> Result<Variable> {
        BinaryOp::FloorDiv.apply(self.into(), rhs.into())
    }

    /// Add to the value in place, dropping gradient state.
    ///
    /// The handle keeps its identity. This never records anything, whatever
    /// the grad mode.
    pub fn add_in_place(&self, rhs: impl Into<Operand>) {
        let value = self.value() + rhs.into().value();
        self.assign(value);
    }

    /// Subtract from the value in place, dropping gradient state.
    pub fn sub_in_place(&self, rhs: impl Into<Operand>) {
        let value = self.value() - rhs.into().value();
        self.assign(value);
    }

    /// Multiply the value in place, dropping gradient state.
    pub fn mul_in_place(&self, rhs: impl Into<Operand>) {
        let value = self.value() * rhs.into().value();
        self.assign(value);
    }

    /// Divide the value in place, dropping gradient state.
    pub fn div_in_place(&self, rhs: impl Into<Operand>) {
        let value = self.value() / rhs.into().value();
        self.assign(value);
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, |$lhs:ident, $rhs:ident| $body:expr) => {
        impl<R: Into<Operand>> $trait<R> for &Variable {
            type Output = Variable;

            fn $method(self, rhs: R) -> Variable {
                let $lhs = Operand::from(self);
                let $rhs = rhs.into();
                $body
            }
        }

        impl<R: Into<Operand>> $trait<R> for Variable {
            type Output = Variable;

            fn $method(self, rhs: R) -> Variable {
                (&self).$method(rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, |lhs, rhs| sum(vec![lhs, rhs]));
impl_binary_op!(Sub, sub, |lhs, rhs| subtract(lhs, rhs));
impl_binary_op!(Mul, mul, |lhs, rhs| product(vec![lhs, rhs]));
impl_binary_op!(Div, div, |lhs, rhs| divide(lhs, rhs));

// Number on the left: `2.0 * x`, `1 / x`, `5 - x`.
macro_rules! impl_reverse_ops {
    ($($t:ty),*) => {
        $(
            impl Add<&Variable> for $t {
                type Output = Variable;
                fn add(self, rhs: &Variable) -> Variable {
                    sum(vec![Operand::from(self), rhs.into()])
                }
            }

            impl Add<Variable> for $t {
                type Output = Variable;
                fn add(self, rhs: Variable) -> Variable {
                    self + &rhs
                }
            }

            impl Sub<&Variable> for $t {
                type Output = Variable;
                fn sub(self, rhs: &Variable) -> Variable {
                    subtract(Operand::from(self), rhs.into())
                }
            }

            impl Sub<Variable> for $t {
                type Output = Variable;
                fn sub(self, rhs: Variable) -> Variable {
                    self - &rhs
                }
            }

            impl Mul<&Variable> for $t {
                type Output = Variable;
                fn mul(self, rhs: &Variable) -> Variable {
                    product(vec![Operand::from(self), rhs.into()])
                }
            }

            impl Mul<Variable> for $t {
                type Output = Variable;
                fn mul(self, rhs: Variable) -> Variable {
                    self * &rhs
                }
            }

            impl Div<&Variable> for $t {
                type Output = Variable;
                fn div(self, rhs: &Variable) -> Variable {
                    divide(Operand::from(self), rhs.into())
                }
            }

            impl Div<Variable> for $t {
                type Output = Variable;
                fn div(self, rhs: Variable) -> Variable {
                    self / &rhs
                }
            }
        )*
    };
}

// A single integer type keeps unsuffixed literals such as `2 * &x`
// unambiguous; `i64` goes through `Scalar`.
impl_reverse_ops!(i32, f64, Scalar);

impl Neg for &Variable {
    type Output = Variable;

    fn neg(self) -> Variable {
        product(vec![self.into(), Operand::from(-1)])
    }
}

impl Neg for Variable {
    type Output = Variable;

    fn neg(self) -> Variable {
        -&self
    }
}

// Compound assignment follows grad mode: with recording on the handle is
// rebound to a freshly recorded result; with recording off the existing
// node is updated in place and keeps its identity.
macro_rules! impl_assign_op {
    ($trait:ident, $method:ident, $op:ident, $in_place:ident) => {
        impl<R: Into<Operand>> $trait<R> for Variable {
            fn $method(&mut self, rhs: R) {
                if is_grad_enabled() {
                    *self = (&*self).$op(rhs);
                } else {
                    self.$in_place(rhs);
                }
            }
        }
    };
}

impl_assign_op!(AddAssign, add_assign, add, add_in_place);
impl_assign_op!(SubAssign, sub_assign, sub, sub_in_place);
impl_assign_op!(MulAssign, mul_assign, mul, mul_in_place);
impl_assign_op!(DivAssign, div_assign, div, div_in_place);

// Comparisons look at values only and never touch the tape.
impl PartialEq for Variable {
    fn eq(&self, other: &Variable) -> bool {
        self.value() == other.value()
    }
}

impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Variable) -> Option<Ordering> {
        self.value().partial_cmp(&other.value())
    }
}

macro_rules! impl_number_comparisons {
    ($($t:ty),*) => {
        $(
            impl PartialEq<$t> for Variable {
                fn eq(&self, other: &$t) -> bool {
                    self.value() == Scalar::from(*other)
                }
            }

            impl PartialOrd<$t> for Variable {
                fn partial_cmp(&self, other: &$t) -> Option<Ordering> {
                    self.value().partial_cmp(&Scalar::from(*other))
                }
            }
        )*
    };
}

impl_number_comparisons!(i32, i64, f64);

impl PartialEq<Scalar> for Variable {
    fn eq(&self, other: &Scalar) -> bool {
        self.value() == *other
    }
}

impl PartialOrd<Scalar> for Variable {
    fn partial_cmp(&self, other: &Scalar) -> Option<Ordering> {
        self.value().partial_cmp(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grad_mode::{NoGradGuard, no_grad};
    use approx::assert_relative_eq;

    #[test]
    fn test_forward_values() {
        let x = Variable::new(6);
        let y = Variable::new(4);
        assert_eq!(&x + &y, 10);
        assert_eq!(&x - &y, 2);
        assert_eq!(&x * &y, 24);
        assert_eq!(&x / &y, 1.5);
        assert_eq!(x.pow(2), 36);
        assert_eq!(-&x, -6);
        assert_eq!(10 - &x, 4);
        assert_eq!(3.0 / &x, 0.5);
    }

    #[test]
    fn test_requires_grad_is_or_of_operands() {
        let tracked = Variable::new(1.0);
        let frozen = Variable::constant(2.0);
        assert!((&tracked + &frozen).requires_grad());
        assert!(!(&frozen * 3).requires_grad());
        assert!(!frozen.exp().requires_grad());
        assert!(Variable::constant(2).pow(&tracked).requires_grad());
    }

    #[test]
    fn test_operator_records_operands() {
        let x = Variable::new(2);
        let y = Variable::new(3);
        let z = &x * &y;
        match z.last_operation() {
            Some(Operator::Product(ops)) => {
                assert!(Variable::ptr_eq(ops[0].as_variable().unwrap(), &x));
                assert!(Variable::ptr_eq(ops[1].as_variable().unwrap(), &y));
            }
            other => panic!("expected a product, got {other:?}"),
        }
    }

    #[test]
    fn test_no_grad_records_nothing() {
        let x = Variable::new(4);
        let y = no_grad(|| x.pow(2));
        assert!(!y.requires_grad());
        assert!(y.last_operation().is_none());
        assert_eq!(y, 16);
    }

    #[test]
    fn test_elementary_functions() {
        let x = Variable::new(0.5);
        assert_relative_eq!(x.exp().value().to_f64(), 0.5_f64.exp());
        assert_relative_eq!(x.cos().value().to_f64(), 0.5_f64.cos());
        assert_relative_eq!(x.sin().value().to_f64(), 0.5_f64.sin());
        assert_relative_eq!(x.tan().value().to_f64(), 0.5_f64.tan());
        assert_relative_eq!(x.tanh().value().to_f64(), 0.5_f64.tanh());
        assert_eq!(Variable::new(-2).relu(), 0);
        assert_eq!(Variable::new(2).relu(), 2);
    }

    #[test]
    fn test_floor_div_unimplemented() {
        let x = Variable::new(7);
        assert_eq!(
            x.floor_div(2).unwrap_err(),
            AutogradError::Unimplemented {
                operation: "floor_div"
            }
        );
    }

    #[test]
    fn test_assign_rebinds_when_recording() {
        let original = Variable::new(1);
        let mut x = original.clone();
        x += 2;
        assert!(!Variable::ptr_eq(&x, &original));
        assert_eq!(x, 3);
        assert_eq!(original, 1);
        assert!(!x.is_leaf());
    }

    #[test]
    fn test_assign_mutates_without_recording() {
        let original = Variable::new(10);
        let mut x = original.clone();
        {
            let _guard = NoGradGuard::new();
            x -= 4;
            x *= 2;
            x /= 4;
        }
        assert!(Variable::ptr_eq(&x, &original));
        assert_eq!(original, 3.0);
        assert!(!original.requires_grad());
        assert!(original.is_leaf());
    }

    #[test]
    fn test_in_place_methods_ignore_mode() {
        let x = Variable::new(2);
        let y = &x * 3;
        y.backward().unwrap();
        y.add_in_place(&x);
        assert_eq!(y, 8);
        assert_eq!(y.grad(), 0);
        assert!(y.is_leaf());
        assert!(!y.requires_grad());
    }

    #[test]
    fn test_comparisons() {
        let x = Variable::new(3);
        let y = Variable::new(3.0);
        assert!(x == y);
        assert!(x != 4);
        assert!(x < 3.5);
        assert!(x >= 3);
        assert!(x > Variable::new(-1));
        assert!(x <= Scalar::from(3));
    }
}
