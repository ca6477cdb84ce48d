//! Fixed-shape tensor of scalar variables.
//!
//! ```text
//! Tensor
//! ├── shape    [d0, d1, ..., dn]
//! ├── strides  [d1*...*dn, ..., dn, 1]   (row-major)
//! └── data     Vec<Variable>             (flat, shared handles)
//! ```
//!
//! Every operation on a tensor is an elementwise composition of
//! [`Variable`] operations, so gradients flow through tensors with no extra
//! machinery.

use crate::autodiff::Variable;
use crate::error::{AutogradError, Result};
use crate::index::MultiIndex;
use crate::nested::Nested;
use crate::scalar::Scalar;
use crate::strides::{cartesian_to_linear, compute_strides};
use std::fmt;

/// A row-major n-dimensional array of [`Variable`]s.
///
/// Cloning a tensor copies the container but shares the element handles.
#[derive(Debug, Clone)]
pub struct Tensor {
    data: Vec<Variable>,
    shape: Vec<usize>,
    strides: Vec<usize>,
}

/// Result of indexing a tensor.
#[derive(Debug, Clone)]
pub enum Indexed {
    /// A full-rank index selects one element.
    Element(Variable),
    /// A partial index selects a contiguous sub-tensor.
    View(Tensor),
}

impl Indexed {
    pub fn into_variable(self) -> Option<Variable> {
        match self {
            Indexed::Element(v) => Some(v),
            Indexed::View(_) => None,
        }
    }

    pub fn into_tensor(self) -> Option<Tensor> {
        match self {
            Indexed::Element(_) => None,
            Indexed::View(t) => Some(t),
        }
    }
}

/// Build a tensor from nested input.
///
/// # Errors
///
/// Returns `AutogradError::ShapeViolation` for ragged input.
///
/// ```
/// use tapegrad::to_tensor;
///
/// let t = to_tensor(vec![vec![1, 2], vec![3, 4]]).unwrap();
/// assert_eq!(t.shape(), &[2, 2]);
/// assert_eq!(t.at([1, 0]).unwrap(), 3);
/// ```
pub fn to_tensor(nested: impl Into<Nested>) -> Result<Tensor> {
    Tensor::from_nested(nested)
}

impl Tensor {
    /// Build a tensor from nested input, inferring its shape.
    ///
    /// # Errors
    ///
    /// Returns `AutogradError::ShapeViolation` for ragged input.
    pub fn from_nested(nested: impl Into<Nested>) -> Result<Self> {
        let nested = nested.into();
        let shape = nested.shape();
        let data = nested.flatten(&shape)?;
        Ok(Self::from_parts(data, shape))
    }

    /// Create a tensor from row-major data and shape.
    ///
    /// # Errors
    ///
    /// Returns `AutogradError::ShapeMismatch` if the data length doesn't
    /// match the shape.
    pub fn from_vec(data: Vec<Variable>, shape: &[usize]) -> Result<Self> {
        let expected_len: usize = shape.iter().product();
        if data.len() != expected_len {
            return Err(AutogradError::ShapeMismatch {
                expected: vec![expected_len],
                actual: vec![data.len()],
            });
        }
        Ok(Self::from_parts(data, shape.to_vec()))
    }

    /// Create a tensor of fresh leaves from row-major values.
    ///
    /// # Errors
    ///
    /// Returns `AutogradError::ShapeMismatch` if the number of values doesn't
    /// match the shape.
    pub fn from_values<T: Into<Scalar>>(
        values: impl IntoIterator<Item = T>,
        shape: &[usize],
        requires_grad: bool,
    ) -> Result<Self> {
        let data = values
            .into_iter()
            .map(|v| Variable::with_requires_grad(v, requires_grad))
            .collect();
        Self::from_vec(data, shape)
    }

    pub(crate) fn from_parts(data: Vec<Variable>, shape: Vec<usize>) -> Self {
        let strides = compute_strides(&shape);
        Self {
            data,
            shape,
            strides,
        }
    }

    /// Create a tensor with every element set to `value`.
    ///
    /// Each element is its own leaf.
    ///
    /// # Examples
    ///
    /// ```
    /// use tapegrad::Tensor;
    ///
    /// let t = Tensor::full(&[2, 3], 1.5, true);
    /// assert_eq!(t.len(), 6);
    /// assert!(t.variables().all(|v| v == &1.5));
    /// ```
    pub fn full(shape: &[usize], value: impl Into<Scalar>, requires_grad: bool) -> Self {
        let value = value.into();
        let len = shape.iter().product();
        let data = (0..len)
            .map(|_| Variable::with_requires_grad(value, requires_grad))
            .collect();
        Self::from_parts(data, shape.to_vec())
    }

    pub fn zeros(shape: &[usize], requires_grad: bool) -> Self {
        Self::full(shape, 0, requires_grad)
    }

    pub fn ones(shape: &[usize], requires_grad: bool) -> Self {
        Self::full(shape, 1, requires_grad)
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get the rank (number of dimensions).
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Get total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Elements in row-major order.
    #[inline]
    pub fn data(&self) -> &[Variable] {
        &self.data
    }

    pub fn variables(&self) -> std::slice::Iter<'_, Variable> {
        self.data.iter()
    }

    /// Current values in row-major order.
    pub fn values(&self) -> Vec<Scalar> {
        self.data.iter().map(Variable::value).collect()
    }

    /// Accumulated gradients in row-major order.
    pub fn grads(&self) -> Vec<Scalar> {
        self.data.iter().map(Variable::grad).collect()
    }

    /// Validate an index and return the offset and length of the run it
    /// selects.
    fn locate(&self, index: &[usize]) -> Result<(usize, usize)> {
        if index.len() > self.ndim() {
            return Err(AutogradError::shape_violation(format!(
                "too many indices for tensor: tensor is {}-dimensional, but {} were indexed",
                self.ndim(),
                index.len()
            )));
        }
        for (&idx, &dim) in index.iter().zip(self.shape.iter()) {
            if idx >= dim {
                return Err(AutogradError::IndexOutOfBounds {
                    index: idx,
                    dim_size: dim,
                });
            }
        }
        let offset = cartesian_to_linear(index, &self.strides);
        let run = self.shape[index.len()..].iter().product();
        Ok((offset, run))
    }

    /// Index the tensor.
    ///
    /// A full-rank index yields the element itself; a shorter index yields a
    /// view over the addressed block. The view owns a new container holding
    /// the same element handles.
    ///
    /// # Errors
    ///
    /// Returns `AutogradError::ShapeViolation` for more indices than
    /// dimensions and `AutogradError::IndexOutOfBounds` for an index past the
    /// end of its dimension.
    pub fn get(&self, index: impl Into<MultiIndex>) -> Result<Indexed> {
        let index = index.into();
        let (offset, run) = self.locate(index.as_slice())?;
        if index.len() == self.ndim() {
            return Ok(Indexed::Element(self.data[offset].clone()));
        }
        let data = self.data[offset..offset + run].to_vec();
        Ok(Indexed::View(Self::from_parts(
            data,
            self.shape[index.len()..].to_vec(),
        )))
    }

    /// Get one element by a full-rank index.
    ///
    /// # Errors
    ///
    /// As [`Tensor::get`], plus `AutogradError::ShapeViolation` for a partial
    /// index.
    pub fn at(&self, index: impl Into<MultiIndex>) -> Result<Variable> {
        let index = index.into();
        let rank = index.len();
        self.get(index)?.into_variable().ok_or_else(|| {
            AutogradError::shape_violation(format!(
                "expected {} indices to select an element, got {rank}",
                self.ndim()
            ))
        })
    }

    /// Get the sub-tensor addressed by an index.
    ///
    /// A full-rank index yields a rank-0 tensor around the element.
    ///
    /// # Errors
    ///
    /// As [`Tensor::get`].
    pub fn slice(&self, index: impl Into<MultiIndex>) -> Result<Tensor> {
        Ok(match self.get(index)? {
            Indexed::Element(v) => Self::from_parts(vec![v], Vec::new()),
            Indexed::View(t) => t,
        })
    }

    /// Replace the element at a full-rank index.
    ///
    /// # Errors
    ///
    /// As [`Tensor::at`].
    pub fn set(&mut self, index: impl Into<MultiIndex>, value: impl Into<Variable>) -> Result<()> {
        let index = index.into();
        if index.len() != self.ndim() {
            return Err(AutogradError::shape_violation(format!(
                "expected {} indices to set an element, got {}",
                self.ndim(),
                index.len()
            )));
        }
        let (offset, _) = self.locate(index.as_slice())?;
        self.data[offset] = value.into();
        Ok(())
    }

    /// Replace the block addressed by a partial index.
    ///
    /// # Errors
    ///
    /// As [`Tensor::get`], plus `AutogradError::ShapeMismatch` when `values`
    /// doesn't have the shape of the block.
    pub fn set_slice(&mut self, index: impl Into<MultiIndex>, values: &Tensor) -> Result<()> {
        let index = index.into();
        let (offset, run) = self.locate(index.as_slice())?;
        let block_shape = &self.shape[index.len()..];
        if values.shape() != block_shape {
            return Err(AutogradError::ShapeMismatch {
                expected: block_shape.to_vec(),
                actual: values.shape().to_vec(),
            });
        }
        self.data[offset..offset + run].clone_from_slice(&values.data);
        Ok(())
    }

    /// Apply `f` to every element, producing a tensor of the same shape.
    pub fn map(&self, f: impl FnMut(&Variable) -> Variable) -> Tensor {
        Self::from_parts(self.data.iter().map(f).collect(), self.shape.clone())
    }

    /// Fallible [`Tensor::map`].
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_map(&self, f: impl FnMut(&Variable) -> Result<Variable>) -> Result<Tensor> {
        let data = self.data.iter().map(f).collect::<Result<Vec<_>>>()?;
        Ok(Self::from_parts(data, self.shape.clone()))
    }

    /// Reset every element, see [`Variable::reset_state`].
    pub fn reset_state(&self, requires_grad: bool) {
        for v in &self.data {
            v.reset_state(requires_grad);
        }
    }

    /// Clear the gradient of every element.
    pub fn zero_grad(&self) {
        for v in &self.data {
            v.zero_grad();
        }
    }

    /// A tensor of fresh leaves holding the current values.
    pub fn detach(&self) -> Tensor {
        self.map(Variable::detach)
    }
}

impl From<Vec<Variable>> for Tensor {
    /// A 1-D tensor over the given handles.
    fn from(data: Vec<Variable>) -> Self {
        let len = data.len();
        Self::from_parts(data, vec![len])
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_block(
            f: &mut fmt::Formatter<'_>,
            data: &[Variable],
            shape: &[usize],
        ) -> fmt::Result {
            let Some((&len, rest)) = shape.split_first() else {
                return write!(f, "{}", data[0]);
            };
            let run: usize = rest.iter().product();
            write!(f, "[")?;
            for i in 0..len {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_block(f, &data[i * run..(i + 1) * run], rest)?;
            }
            write!(f, "]")
        }

        write!(f, "tensor(")?;
        write_block(f, &self.data, &self.shape)?;
        write!(f, ")")
    }
}
