//! Elementary functions over tensors, variables, and plain numbers.
//!
//! ```
//! use tapegrad::functional::{exp, relu};
//! use tapegrad::{Variable, to_tensor};
//!
//! assert_eq!(exp(&0.0), 1.0);
//! assert_eq!(relu(&Variable::new(-3)), 0);
//!
//! let t = to_tensor(vec![-1, 2]).unwrap();
//! assert_eq!(relu(&t).to_string(), "tensor([0, 2])");
//! ```

use crate::autodiff::Variable;
use crate::scalar::Scalar;
use crate::tensor::Tensor;

/// Types the elementary functions apply to.
///
/// Tensors map the function over their elements, variables record it on
/// the tape, numbers evaluate it directly.
pub trait Elementary {
    type Output;

    fn exp(&self) -> Self::Output;
    fn cos(&self) -> Self::Output;
    fn sin(&self) -> Self::Output;
    fn tan(&self) -> Self::Output;
    fn tanh(&self) -> Self::Output;
    fn relu(&self) -> Self::Output;
}

impl Elementary for Variable {
    type Output = Variable;

    fn exp(&self) -> Variable {
        Variable::exp(self)
    }

    fn cos(&self) -> Variable {
        Variable::cos(self)
    }

    fn sin(&self) -> Variable {
        Variable::sin(self)
    }

    fn tan(&self) -> Variable {
        Variable::tan(self)
    }

    fn tanh(&self) -> Variable {
        Variable::tanh(self)
    }

    fn relu(&self) -> Variable {
        Variable::relu(self)
    }
}

impl Elementary for Tensor {
    type Output = Tensor;

    fn exp(&self) -> Tensor {
        self.map(Variable::exp)
    }

    fn cos(&self) -> Tensor {
        self.map(Variable::cos)
    }

    fn sin(&self) -> Tensor {
        self.map(Variable::sin)
    }

    fn tan(&self) -> Tensor {
        self.map(Variable::tan)
    }

    fn tanh(&self) -> Tensor {
        self.map(Variable::tanh)
    }

    fn relu(&self) -> Tensor {
        self.map(Variable::relu)
    }
}

impl Elementary for Scalar {
    type Output = Scalar;

    fn exp(&self) -> Scalar {
        Scalar::exp(*self)
    }

    fn cos(&self) -> Scalar {
        Scalar::cos(*self)
    }

    fn sin(&self) -> Scalar {
        Scalar::sin(*self)
    }

    fn tan(&self) -> Scalar {
        Scalar::tan(*self)
    }

    fn tanh(&self) -> Scalar {
        Scalar::tanh(*self)
    }

    fn relu(&self) -> Scalar {
        Scalar::relu(*self)
    }
}

impl Elementary for f64 {
    type Output = f64;

    fn exp(&self) -> f64 {
        f64::exp(*self)
    }

    fn cos(&self) -> f64 {
        f64::cos(*self)
    }

    fn sin(&self) -> f64 {
        f64::sin(*self)
    }

    fn tan(&self) -> f64 {
        f64::tan(*self)
    }

    fn tanh(&self) -> f64 {
        f64::tanh(*self)
    }

    fn relu(&self) -> f64 {
        f64::max(*self, 0.0)
    }
}

// Integers go through `Scalar`: transcendental results are floats, relu
// stays integral. Only `i32` is implemented so `relu(&3)` infers; `i64`
// values go through `Scalar::from`.
impl Elementary for i32 {
    type Output = Scalar;

    fn exp(&self) -> Scalar {
        Scalar::from(*self).exp()
    }

    fn cos(&self) -> Scalar {
        Scalar::from(*self).cos()
    }

    fn sin(&self) -> Scalar {
        Scalar::from(*self).sin()
    }

    fn tan(&self) -> Scalar {
        Scalar::from(*self).tan()
    }

    fn tanh(&self) -> Scalar {
        Scalar::from(*self).tanh()
    }

    fn relu(&self) -> Scalar {
        Scalar::from(*self).relu()
    }
}

pub fn exp<T: Elementary + ?Sized>(x: &T) -> T::Output {
    x.exp()
}

pub fn cos<T: Elementary + ?Sized>(x: &T) -> T::Output {
    x.cos()
}

pub fn sin<T: Elementary + ?Sized>(x: &T) -> T::Output {
    x.sin()
}

pub fn tan<T: Elementary + ?Sized>(x: &T) -> T::Output {
    x.tan()
}

pub fn tanh<T: Elementary + ?Sized>(x: &T) -> T::Output {
    x.tanh()
}

/// `max(x, 0)` elementwise.
pub fn relu<T: Elementary + ?Sized>(x: &T) -> T::Output {
    x.relu()
}
