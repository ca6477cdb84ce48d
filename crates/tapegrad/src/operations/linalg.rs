//! Matrix products built from scalar operations.

use crate::autodiff::{Operand, Variable, sum};
use crate::error::{AutogradError, Result};
use crate::tensor::Tensor;

fn require_rank(t: &Tensor, rank: usize, operation: &str) -> Result<()> {
    if t.ndim() != rank {
        return Err(AutogradError::shape_violation(format!(
            "{operation} expects {rank}-dimensional operands, got shape {:?}",
            t.shape()
        )));
    }
    Ok(())
}

/// Inner product of two vectors.
///
/// Recorded as one sum over the element products.
///
/// # Errors
///
/// Returns `AutogradError::ShapeViolation` unless both operands are 1-D and
/// `AutogradError::ShapeMismatch` if their lengths differ.
///
/// # Example
///
/// ```
/// use tapegrad::to_tensor;
/// use tapegrad::operations::dot;
///
/// let a = to_tensor(vec![1, 2, 3]).unwrap();
/// let b = to_tensor(vec![4, 5, 6]).unwrap();
/// assert_eq!(dot(&a, &b).unwrap(), 32);
/// ```
pub fn dot(a: &Tensor, b: &Tensor) -> Result<Variable> {
    require_rank(a, 1, "dot")?;
    require_rank(b, 1, "dot")?;
    if a.shape() != b.shape() {
        return Err(AutogradError::ShapeMismatch {
            expected: a.shape().to_vec(),
            actual: b.shape().to_vec(),
        });
    }
    let products = a
        .variables()
        .zip(b.variables())
        .map(|(x, y)| Operand::from(x * y))
        .collect();
    Ok(sum(products))
}

/// Matrix product of two 2-D tensors.
///
/// # Errors
///
/// Returns `AutogradError::ShapeViolation` unless both operands are 2-D and
/// `AutogradError::ShapeMismatch` if the inner dimensions differ.
///
/// # Example
///
/// ```
/// use tapegrad::to_tensor;
/// use tapegrad::operations::matmul;
///
/// let a = to_tensor(vec![vec![1, 2], vec![3, 4]]).unwrap();
/// let b = to_tensor(vec![vec![5, 6], vec![7, 8]]).unwrap();
/// let c = matmul(&a, &b).unwrap();
/// assert_eq!(c.to_string(), "tensor([[19, 22], [43, 50]])");
/// ```
pub fn matmul(a: &Tensor, b: &Tensor) -> Result<Tensor> {
    require_rank(a, 2, "matmul")?;
    require_rank(b, 2, "matmul")?;
    let (m, k) = (a.shape()[0], a.shape()[1]);
    let (k2, n) = (b.shape()[0], b.shape()[1]);
    if k != k2 {
        return Err(AutogradError::ShapeMismatch {
            expected: vec![k, n],
            actual: b.shape().to_vec(),
        });
    }

    let lhs = a.data();
    let rhs = b.data();
    let mut data = Vec::with_capacity(m * n);
    for i in 0..m {
        for j in 0..n {
            let products = (0..k)
                .map(|p| Operand::from(&lhs[i * k + p] * &rhs[p * n + j]))
                .collect();
            data.push(sum(products));
        }
    }
    Tensor::from_vec(data, &[m, n])
}

impl Tensor {
    /// Method form of [`matmul`].
    ///
    /// # Errors
    ///
    /// See [`matmul`].
    pub fn matmul(&self, other: &Tensor) -> Result<Tensor> {
        matmul(self, other)
    }

    /// Method form of [`dot`].
    ///
    /// # Errors
    ///
    /// See [`dot`].
    pub fn dot(&self, other: &Tensor) -> Result<Variable> {
        dot(self, other)
    }
}
