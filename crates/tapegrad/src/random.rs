//! Random tensor construction.
//!
//! Every element is an independent floating-point leaf.

use rand::Rng;
use rand::distr::StandardUniform;
use rand_distr::StandardNormal;

use crate::autodiff::Variable;
use crate::tensor::Tensor;

fn sample_tensor<R: Rng>(
    shape: &[usize],
    requires_grad: bool,
    rng: &mut R,
    mut sample: impl FnMut(&mut R) -> f64,
) -> Tensor {
    let len: usize = shape.iter().product();
    let data = (0..len)
        .map(|_| Variable::with_requires_grad(sample(rng), requires_grad))
        .collect();
    Tensor::from_parts(data, shape.to_vec())
}

impl Tensor {
    /// Create a tensor with uniform random values in [0, 1).
    ///
    /// # Example
    ///
    /// ```
    /// use tapegrad::Tensor;
    ///
    /// let t = Tensor::rand(&[2, 3], true);
    /// assert_eq!(t.shape(), &[2, 3]);
    /// assert!(t.variables().all(|v| v >= &0.0 && v < &1.0));
    /// ```
    pub fn rand(shape: &[usize], requires_grad: bool) -> Self {
        Self::rand_with_rng(shape, requires_grad, &mut rand::rng())
    }

    /// Create a tensor with uniform random values using a specific RNG.
    ///
    /// # Example
    ///
    /// ```
    /// use tapegrad::Tensor;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let t1 = Tensor::rand_with_rng(&[2, 3], true, &mut rng);
    ///
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let t2 = Tensor::rand_with_rng(&[2, 3], true, &mut rng);
    ///
    /// assert_eq!(t1.values(), t2.values());
    /// ```
    pub fn rand_with_rng<R: Rng>(shape: &[usize], requires_grad: bool, rng: &mut R) -> Self {
        sample_tensor(shape, requires_grad, rng, |rng| rng.sample(StandardUniform))
    }

    /// Create a tensor with standard normal random values.
    pub fn randn(shape: &[usize], requires_grad: bool) -> Self {
        Self::randn_with_rng(shape, requires_grad, &mut rand::rng())
    }

    /// Create a tensor with standard normal random values using a specific RNG.
    pub fn randn_with_rng<R: Rng>(shape: &[usize], requires_grad: bool, rng: &mut R) -> Self {
        sample_tensor(shape, requires_grad, rng, |rng| rng.sample(StandardNormal))
    }
}
