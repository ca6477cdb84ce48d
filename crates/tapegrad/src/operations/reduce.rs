//! Reductions over all elements.

use crate::autodiff::{Operand, Variable, sum};
use crate::error::{AutogradError, Result};
use crate::tensor::Tensor;

impl Tensor {
    /// Sum all elements into one variable.
    ///
    /// The result records a single n-ary sum over every element, so backward
    /// sends a gradient of 1 to each.
    ///
    /// # Errors
    ///
    /// Returns `AutogradError::ShapeViolation` for a tensor with no elements.
    ///
    /// # Example
    ///
    /// ```
    /// use tapegrad::to_tensor;
    ///
    /// let t = to_tensor(vec![vec![1, 2], vec![3, 4]]).unwrap();
    /// let s = t.sum().unwrap();
    /// assert_eq!(s, 10);
    /// s.backward().unwrap();
    /// assert!(t.variables().all(|v| v.grad() == 1));
    /// ```
    pub fn sum(&self) -> Result<Variable> {
        if self.is_empty() {
            return Err(AutogradError::shape_violation(
                "cannot sum a tensor with no elements",
            ));
        }
        Ok(sum(self.variables().map(Operand::from).collect()))
    }

    /// Mean of all elements.
    ///
    /// # Errors
    ///
    /// Returns `AutogradError::ShapeViolation` for a tensor with no elements.
    pub fn mean(&self) -> Result<Variable> {
        Ok(self.sum()? / self.len() as i64)
    }

    /// Euclidean norm, `(sum of x^2)^(1/2)`.
    ///
    /// # Errors
    ///
    /// Returns `AutogradError::ShapeViolation` for a tensor with no elements.
    ///
    /// # Example
    ///
    /// ```
    /// use tapegrad::to_tensor;
    ///
    /// let t = to_tensor(vec![3.0, 4.0]).unwrap();
    /// assert!((t.norm().unwrap().value().to_f64() - 5.0).abs() < 1e-12);
    /// ```
    pub fn norm(&self) -> Result<Variable> {
        Ok(self.map(|v| v.pow(2)).sum()?.pow(0.5))
    }
}
