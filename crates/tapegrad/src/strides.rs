//! Stride computation utilities.
//!
//! Uses row-major (C) order: the last index varies fastest.

/// Compute row-major strides from shape.
///
/// The stride of a dimension is the product of all trailing dimension
/// sizes. For shape [d0, d1, d2], returns [d1*d2, d2, 1].
///
/// # Examples
///
/// ```
/// use tapegrad::strides::compute_strides;
///
/// assert_eq!(compute_strides(&[2, 2, 4]), vec![8, 4, 1]);
/// assert_eq!(compute_strides(&[2, 3]), vec![3, 1]);
/// assert_eq!(compute_strides(&[5]), vec![1]);
/// assert_eq!(compute_strides(&[]), Vec::<usize>::new());
/// ```
pub fn compute_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    let mut stride = 1;

    for (slot, &dim) in strides.iter_mut().zip(shape.iter()).rev() {
        *slot = stride;
        stride *= dim;
    }

    strides
}

/// Convert (possibly partial) cartesian indices to a linear offset.
///
/// Indices are matched against the leading strides; missing trailing
/// indices count as 0, which yields the start of the addressed block.
#[inline]
pub fn cartesian_to_linear(indices: &[usize], strides: &[usize]) -> usize {
    indices
        .iter()
        .zip(strides.iter())
        .map(|(&idx, &stride)| idx * stride)
        .sum()
}
