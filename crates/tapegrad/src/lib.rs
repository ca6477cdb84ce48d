//! tapegrad - scalar reverse-mode automatic differentiation
//!
//! This crate records arithmetic on scalar [`Variable`]s as a tape and
//! computes gradients by walking it backwards. [`Tensor`] arranges variables
//! in a fixed row-major shape and lifts scalar operations element by
//! element.
//!
//! # Architecture
//!
//! ```text
//! Level 1: Tensor API (tensor, operations, functional)
//!     → shape checks, indexing, elementwise dispatch
//!
//! Level 2: Scalar tape (autodiff)
//!     → Variable, Operator, backward
//!
//! Level 3: Values and mode (scalar, grad_mode)
//!     → Int/Float arithmetic, thread-local recording switch
//! ```
//!
//! # Example
//!
//! ```
//! use tapegrad::{Variable, no_grad, to_tensor};
//!
//! let x = Variable::new(4);
//! let y = &x * 2;
//! y.backward().unwrap();
//! assert_eq!(x.grad(), 2);
//!
//! let t = to_tensor(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
//! let loss = t.pow(2).unwrap().sum().unwrap();
//! loss.backward().unwrap();
//! assert_eq!(t.at([1, 1]).unwrap().grad(), 8.0);
//!
//! // Nothing is recorded inside a no-grad scope.
//! let z = no_grad(|| &x * 3);
//! assert!(z.is_leaf());
//! ```

pub mod autodiff;
pub mod error;
pub mod functional;
pub mod grad_mode;
pub mod index;
pub mod nested;
pub mod operations;
#[cfg(feature = "random")]
pub mod random;
pub mod scalar;
pub mod strides;
pub mod tensor;
pub mod value;

pub use autodiff::{BinaryOp, Operand, Operator, Variable};
pub use error::{AutogradError, Result};
pub use functional::{cos, exp, relu, sin, tan, tanh};
pub use grad_mode::{NoGradGuard, is_grad_enabled, no_grad};
pub use index::{MultiIndex, indices};
pub use nested::Nested;
pub use scalar::{DType, Scalar};
pub use tensor::{Indexed, Tensor, to_tensor};
pub use value::Value;
