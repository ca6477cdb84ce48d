//! Nested input for building tensors.

use crate::autodiff::Variable;
use crate::error::{AutogradError, Result};
use crate::scalar::Scalar;

/// Arbitrarily nested lists of scalars.
///
/// Numbers become fresh leaf [`Variable`]s that require gradients; a
/// `Variable` leaf is kept as the same handle.
///
/// ```
/// use tapegrad::nested::Nested;
///
/// let nested = Nested::from(vec![vec![1, 2, 3], vec![4, 5, 6]]);
/// assert_eq!(nested.shape(), vec![2, 3]);
/// ```
#[derive(Debug, Clone)]
pub enum Nested {
    Leaf(Variable),
    List(Vec<Nested>),
}

impl Nested {
    /// Shape inferred from the first element at every level.
    ///
    /// An empty list ends the walk with a zero-sized dimension.
    pub fn shape(&self) -> Vec<usize> {
        let mut shape = Vec::new();
        let mut level = self;
        while let Nested::List(items) = level {
            shape.push(items.len());
            match items.first() {
                Some(first) => level = first,
                None => break,
            }
        }
        shape
    }

    /// Flatten into row-major order, checking every level against `shape`.
    pub(crate) fn flatten(self, shape: &[usize]) -> Result<Vec<Variable>> {
        let mut out = Vec::with_capacity(shape.iter().product());
        self.flatten_into(shape, &mut out)?;
        Ok(out)
    }

    fn flatten_into(self, shape: &[usize], out: &mut Vec<Variable>) -> Result<()> {
        match (self, shape.split_first()) {
            (Nested::Leaf(v), None) => {
                out.push(v);
                Ok(())
            }
            (Nested::List(items), Some((&len, rest))) if items.len() == len => {
                for item in items {
                    item.flatten_into(rest, out)?;
                }
                Ok(())
            }
            (Nested::List(items), Some((&len, _))) => Err(AutogradError::shape_violation(
                format!("ragged nested input: expected {len} items, found {}", items.len()),
            )),
            (Nested::Leaf(_), Some(_)) => Err(AutogradError::shape_violation(
                "ragged nested input: found a scalar where a list was expected",
            )),
            (Nested::List(_), None) => Err(AutogradError::shape_violation(
                "ragged nested input: found a list where a scalar was expected",
            )),
        }
    }
}

macro_rules! impl_nested_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Nested {
                fn from(value: $t) -> Self {
                    Nested::Leaf(Variable::new(value))
                }
            }
        )*
    };
}

impl_nested_from_number!(i32, i64, f32, f64, Scalar);

impl From<Variable> for Nested {
    fn from(v: Variable) -> Self {
        Nested::Leaf(v)
    }
}

impl From<&Variable> for Nested {
    fn from(v: &Variable) -> Self {
        Nested::Leaf(v.clone())
    }
}

impl<T: Into<Nested>> From<Vec<T>> for Nested {
    fn from(items: Vec<T>) -> Self {
        Nested::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Nested>, const N: usize> From<[T; N]> for Nested {
    fn from(items: [T; N]) -> Self {
        Nested::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_inference() {
        assert_eq!(Nested::from(3).shape(), Vec::<usize>::new());
        assert_eq!(Nested::from(vec![1.0, 2.0]).shape(), vec![2]);
        assert_eq!(Nested::from([[[1, 2], [3, 4]]]).shape(), vec![1, 2, 2]);
        assert_eq!(Nested::from(Vec::<i32>::new()).shape(), vec![0]);
    }

    #[test]
    fn test_flatten_row_major() {
        let nested = Nested::from(vec![vec![1, 2], vec![3, 4]]);
        let shape = nested.shape();
        let flat = nested.flatten(&shape).unwrap();
        let values: Vec<Scalar> = flat.iter().map(Variable::value).collect();
        assert_eq!(values, (1..=4).map(Scalar::from).collect::<Vec<_>>());
    }

    #[test]
    fn test_flatten_keeps_variable_handles() {
        let x = Variable::new(7);
        let nested = Nested::from(vec![x.clone(), Variable::new(8)]);
        let flat = nested.flatten(&[2]).unwrap();
        assert!(Variable::ptr_eq(&flat[0], &x));
        assert!(flat[1].requires_grad());
    }

    #[test]
    fn test_ragged_rejected() {
        let nested = Nested::from(vec![vec![1, 2], vec![3]]);
        let shape = nested.shape();
        assert!(matches!(
            nested.flatten(&shape),
            Err(AutogradError::ShapeViolation { .. })
        ));

        let mixed = Nested::List(vec![Nested::from(1), Nested::from(vec![2])]);
        let shape = mixed.shape();
        assert!(mixed.flatten(&shape).is_err());
    }
}
