//! Numeric value type carried by every variable.
//!
//! A [`Scalar`] is either an integer or a float. Integer arithmetic stays
//! integral for `+`, `-`, `*` and non-negative integer powers, and falls back
//! to floating point on overflow. Any float operand, true division and every
//! transcendental function produce a float.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Storage kind of a [`Scalar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DType {
    /// 64-bit signed integer.
    Int,
    /// 64-bit IEEE float.
    #[default]
    Float,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::Int => write!(f, "int"),
            DType::Float => write!(f, "float"),
        }
    }
}

/// A number with integer or floating semantics.
#[derive(Debug, Clone, Copy)]
pub enum Scalar {
    Int(i64),
    Float(f64),
}

impl Scalar {
    /// Returns the additive identity (integer zero).
    pub const fn zero() -> Self {
        Scalar::Int(0)
    }

    /// Returns the multiplicative identity (integer one).
    pub const fn one() -> Self {
        Scalar::Int(1)
    }

    /// Storage kind of this value.
    pub fn dtype(self) -> DType {
        match self {
            Scalar::Int(_) => DType::Int,
            Scalar::Float(_) => DType::Float,
        }
    }

    /// Convert to `f64`.
    #[inline]
    pub fn to_f64(self) -> f64 {
        match self {
            Scalar::Int(v) => v as f64,
            Scalar::Float(v) => v,
        }
    }

    /// Check whether the value is numerically zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        match self {
            Scalar::Int(v) => v == 0,
            Scalar::Float(v) => v == 0.0,
        }
    }

    /// Convert to the requested storage kind.
    ///
    /// Float to int truncates toward zero (saturating at the `i64` range).
    pub fn cast(self, dtype: DType) -> Self {
        match (self, dtype) {
            (Scalar::Float(v), DType::Int) => Scalar::Int(v as i64),
            (Scalar::Int(v), DType::Float) => Scalar::Float(v as f64),
            (same, _) => same,
        }
    }

    /// Raise to a power.
    ///
    /// Integer base with a non-negative integer exponent stays integral when
    /// the result fits; everything else is computed in floating point.
    pub fn pow(self, exponent: Scalar) -> Scalar {
        match (self, exponent) {
            (Scalar::Int(base), Scalar::Int(exp)) if exp >= 0 => u32::try_from(exp)
                .ok()
                .and_then(|e| base.checked_pow(e))
                .map(Scalar::Int)
                .unwrap_or_else(|| Scalar::Float((base as f64).powf(exp as f64))),
            (Scalar::Float(base), Scalar::Int(exp)) => match i32::try_from(exp) {
                Ok(e) => Scalar::Float(base.powi(e)),
                Err(_) => Scalar::Float(base.powf(exp as f64)),
            },
            (base, exp) => Scalar::Float(base.to_f64().powf(exp.to_f64())),
        }
    }

    pub fn exp(self) -> Scalar {
        Scalar::Float(self.to_f64().exp())
    }

    pub fn cos(self) -> Scalar {
        Scalar::Float(self.to_f64().cos())
    }

    pub fn sin(self) -> Scalar {
        Scalar::Float(self.to_f64().sin())
    }

    pub fn tan(self) -> Scalar {
        Scalar::Float(self.to_f64().tan())
    }

    pub fn tanh(self) -> Scalar {
        Scalar::Float(self.to_f64().tanh())
    }

    /// `max(x, 0)`, keeping the storage kind.
    pub fn relu(self) -> Scalar {
        match self {
            Scalar::Int(v) => Scalar::Int(v.max(0)),
            Scalar::Float(v) => Scalar::Float(if v > 0.0 { v } else { 0.0 }),
        }
    }

    /// Square root, always a float.
    pub fn sqrt(self) -> Scalar {
        Scalar::Float(self.to_f64().sqrt())
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::zero()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{v}"),
            // Debug keeps the trailing `.0` so floats stay distinguishable.
            Scalar::Float(v) => write!(f, "{v:?}"),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                fn from(value: $t) -> Self {
                    Scalar::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Float(f64::from(value))
    }
}

impl From<Scalar> for f64 {
    fn from(value: Scalar) -> f64 {
        value.to_f64()
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Scalar) -> bool {
        match (*self, *other) {
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (a, b) => a.to_f64() == b.to_f64(),
        }
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Scalar) -> Option<Ordering> {
        match (*self, *other) {
            (Scalar::Int(a), Scalar::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.to_f64().partial_cmp(&b.to_f64()),
        }
    }
}

impl PartialEq<f64> for Scalar {
    fn eq(&self, other: &f64) -> bool {
        self.to_f64() == *other
    }
}

impl PartialEq<i64> for Scalar {
    fn eq(&self, other: &i64) -> bool {
        *self == Scalar::Int(*other)
    }
}

impl PartialEq<i32> for Scalar {
    fn eq(&self, other: &i32) -> bool {
        *self == Scalar::from(*other)
    }
}

impl PartialOrd<f64> for Scalar {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.to_f64().partial_cmp(other)
    }
}

impl Add for Scalar {
    type Output = Scalar;

    fn add(self, rhs: Scalar) -> Scalar {
        match (self, rhs) {
            (Scalar::Int(a), Scalar::Int(b)) => a
                .checked_add(b)
                .map_or(Scalar::Float(a as f64 + b as f64), Scalar::Int),
            (a, b) => Scalar::Float(a.to_f64() + b.to_f64()),
        }
    }
}

impl Sub for Scalar {
    type Output = Scalar;

    fn sub(self, rhs: Scalar) -> Scalar {
        match (self, rhs) {
            (Scalar::Int(a), Scalar::Int(b)) => a
                .checked_sub(b)
                .map_or(Scalar::Float(a as f64 - b as f64), Scalar::Int),
            (a, b) => Scalar::Float(a.to_f64() - b.to_f64()),
        }
    }
}

impl Mul for Scalar {
    type Output = Scalar;

    fn mul(self, rhs: Scalar) -> Scalar {
        match (self, rhs) {
            (Scalar::Int(a), Scalar::Int(b)) => a
                .checked_mul(b)
                .map_or(Scalar::Float(a as f64 * b as f64), Scalar::Int),
            (a, b) => Scalar::Float(a.to_f64() * b.to_f64()),
        }
    }
}

// True division: always a float, IEEE semantics for a zero divisor.
impl Div for Scalar {
    type Output = Scalar;

    fn div(self, rhs: Scalar) -> Scalar {
        Scalar::Float(self.to_f64() / rhs.to_f64())
    }
}

impl Neg for Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        match self {
            Scalar::Int(v) => v
                .checked_neg()
                .map_or(Scalar::Float(-(v as f64)), Scalar::Int),
            Scalar::Float(v) => Scalar::Float(-v),
        }
    }
}

impl Mul<Scalar> for f64 {
    type Output = Scalar;

    fn mul(self, rhs: Scalar) -> Scalar {
        Scalar::Float(self) * rhs
    }
}

impl std::iter::Sum for Scalar {
    fn sum<I: Iterator<Item = Scalar>>(iter: I) -> Scalar {
        iter.fold(Scalar::zero(), |acc, x| acc + x)
    }
}

impl std::iter::Product for Scalar {
    fn product<I: Iterator<Item = Scalar>>(iter: I) -> Scalar {
        iter.fold(Scalar::one(), |acc, x| acc * x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_int_arithmetic_stays_int() {
        let a = Scalar::from(6);
        let b = Scalar::from(4);
        assert!(matches!(a + b, Scalar::Int(10)));
        assert!(matches!(a - b, Scalar::Int(2)));
        assert!(matches!(a * b, Scalar::Int(24)));
        assert!(matches!(-a, Scalar::Int(-6)));
    }

    #[test]
    fn test_division_is_float() {
        let q = Scalar::from(3) / Scalar::from(2);
        assert_eq!(q.dtype(), DType::Float);
        assert_eq!(q, 1.5);
    }

    #[test]
    fn test_mixed_promotes_to_float() {
        let r = Scalar::from(2) * Scalar::from(0.5);
        assert_eq!(r.dtype(), DType::Float);
        assert_eq!(r, 1.0);
    }

    #[test]
    fn test_overflow_falls_back_to_float() {
        let r = Scalar::Int(i64::MAX) + Scalar::Int(1);
        assert_eq!(r.dtype(), DType::Float);
    }

    #[test]
    fn test_pow() {
        assert!(matches!(Scalar::from(5).pow(Scalar::from(2)), Scalar::Int(25)));
        assert_relative_eq!(Scalar::from(2).pow(Scalar::from(-1)).to_f64(), 0.5);
        assert_relative_eq!(Scalar::from(9).pow(Scalar::from(0.5)).to_f64(), 3.0);
        assert_relative_eq!(Scalar::from(1.5).pow(Scalar::from(2)).to_f64(), 2.25);
    }

    #[test]
    fn test_cross_kind_comparison() {
        assert_eq!(Scalar::Int(2), Scalar::Float(2.0));
        assert!(Scalar::Int(2) < Scalar::Float(2.5));
        assert!(Scalar::Float(-1.0) < 0.0);
    }

    #[test]
    fn test_cast() {
        assert!(matches!(Scalar::from(2.9).cast(DType::Int), Scalar::Int(2)));
        assert_eq!(Scalar::from(3).cast(DType::Float).dtype(), DType::Float);
    }

    #[test]
    fn test_relu_keeps_kind() {
        assert!(matches!(Scalar::from(-3).relu(), Scalar::Int(0)));
        assert!(matches!(Scalar::from(4).relu(), Scalar::Int(4)));
        assert_eq!(Scalar::from(-0.5).relu(), 0.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Scalar::from(3).to_string(), "3");
        assert_eq!(Scalar::from(3.0).to_string(), "3.0");
    }
}
