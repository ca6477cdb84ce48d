//! Joining tensors.

use crate::error::{AutogradError, Result};
use crate::tensor::Tensor;

/// Concatenate two tensors along the first axis.
///
/// Elements are shared with the inputs, not copied.
///
/// # Errors
///
/// Returns `AutogradError::ShapeViolation` for rank-0 operands and
/// `AutogradError::ShapeMismatch` if the trailing dimensions differ.
///
/// # Example
///
/// ```
/// use tapegrad::to_tensor;
/// use tapegrad::operations::concatenate;
///
/// let a = to_tensor(vec![vec![1, 2]]).unwrap();
/// let b = to_tensor(vec![vec![3, 4], vec![5, 6]]).unwrap();
/// let c = concatenate(&a, &b).unwrap();
/// assert_eq!(c.shape(), &[3, 2]);
/// assert_eq!(c.at([2, 1]).unwrap(), 6);
/// ```
pub fn concatenate(a: &Tensor, b: &Tensor) -> Result<Tensor> {
    let (Some((&rows_a, tail_a)), Some((&rows_b, tail_b))) =
        (a.shape().split_first(), b.shape().split_first())
    else {
        return Err(AutogradError::shape_violation(
            "cannot concatenate zero-dimensional tensors",
        ));
    };
    if tail_a != tail_b {
        return Err(AutogradError::ShapeMismatch {
            expected: tail_a.to_vec(),
            actual: tail_b.to_vec(),
        });
    }

    let mut shape = a.shape().to_vec();
    shape[0] = rows_a + rows_b;
    let data = a.data().iter().chain(b.data()).cloned().collect();
    Tensor::from_vec(data, &shape)
}
