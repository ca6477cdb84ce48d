//! Tensor operations.
//!
//! Every operation here is a composition of scalar [`Variable`] operations,
//! so results stay on the tape:
//!
//! ```text
//! elementwise  add, sub, mul, div, pow      → one Variable op per element
//! reduce       sum, mean, norm              → one n-ary Sum over elements
//! linalg       dot, matmul                  → Sums of Products
//! concat       concatenate                  → shares element handles
//! ```
//!
//! [`Variable`]: crate::Variable

mod concat;
mod elementwise;
mod linalg;
mod reduce;

pub use concat::concatenate;
pub use elementwise::apply_binary;
pub use linalg::{dot, matmul};
