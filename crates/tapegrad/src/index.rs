//! Multi-indices and row-major index iteration.

use smallvec::SmallVec;

/// An index into a tensor: one entry per addressed dimension.
///
/// Fewer entries than the tensor's rank address a contiguous block.
///
/// ```
/// use tapegrad::index::MultiIndex;
///
/// assert_eq!(MultiIndex::from(3).as_slice(), &[3]);
/// assert_eq!(MultiIndex::from([1, 2]).as_slice(), &[1, 2]);
/// assert_eq!(MultiIndex::from(vec![0, 1, 2]).len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultiIndex(SmallVec<[usize; 4]>);

impl MultiIndex {
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<usize> for MultiIndex {
    fn from(i: usize) -> Self {
        MultiIndex(SmallVec::from_slice(&[i]))
    }
}

impl From<&[usize]> for MultiIndex {
    fn from(indices: &[usize]) -> Self {
        MultiIndex(SmallVec::from_slice(indices))
    }
}

impl<const N: usize> From<[usize; N]> for MultiIndex {
    fn from(indices: [usize; N]) -> Self {
        MultiIndex(indices.into_iter().collect())
    }
}

impl<const N: usize> From<&[usize; N]> for MultiIndex {
    fn from(indices: &[usize; N]) -> Self {
        MultiIndex(SmallVec::from_slice(indices))
    }
}

impl From<Vec<usize>> for MultiIndex {
    fn from(indices: Vec<usize>) -> Self {
        MultiIndex(SmallVec::from_vec(indices))
    }
}

/// Iterator over every multi-index of a shape in row-major order.
///
/// Yields nothing when any dimension is zero, and a single empty index for
/// a rank-0 shape.
#[derive(Debug, Clone)]
pub struct IndexIter {
    shape: Vec<usize>,
    next: Option<Vec<usize>>,
}

impl Iterator for IndexIter {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.next.take()?;

        let mut following = current.clone();
        let mut carried = true;
        for (idx, &dim) in following.iter_mut().zip(self.shape.iter()).rev() {
            *idx += 1;
            if *idx < dim {
                carried = false;
                break;
            }
            *idx = 0;
        }
        if !carried {
            self.next = Some(following);
        }

        Some(current)
    }
}

/// Iterate over all multi-indices of `shape` in row-major order.
///
/// ```
/// use tapegrad::index::indices;
///
/// let all: Vec<_> = indices(&[2, 2]).collect();
/// assert_eq!(all, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
/// ```
pub fn indices(shape: &[usize]) -> IndexIter {
    let empty = shape.contains(&0);
    IndexIter {
        shape: shape.to_vec(),
        next: (!empty).then(|| vec![0; shape.len()]),
    }
}
