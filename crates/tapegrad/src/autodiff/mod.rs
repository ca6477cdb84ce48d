//! Scalar reverse-mode automatic differentiation.
//!
//! Every arithmetic result is a [`Variable`] carrying the [`Operator`] that
//! produced it. The operators reference their operands, so the variables
//! form an acyclic tape that [`Variable::backward`] walks from an output to
//! its leaves.
//!
//! # Architecture
//!
//! ```text
//! Variable ──Rc──► Node { value, grad, requires_grad, last_operation }
//!                                                        │
//!                                                        ▼
//!                                         Operator::{Sum, Product, ...}
//!                                                        │
//!                                                        ▼
//!                                     Operand::{Variable(..), Constant(..)}
//! ```
//!
//! # Example
//!
//! ```
//! use tapegrad::Variable;
//!
//! let x = Variable::new(2);
//! let y = Variable::new(5);
//! let z = 1 / &x + (x.pow(2) - 1).pow(2) + &y / x.pow(2);
//! z.backward().unwrap();
//! assert_eq!(x.grad(), 22.5);
//! ```
//!
//! # Design Notes
//!
//! - Nodes are shared `Rc` handles; operands always predate their consumer,
//!   so no cycle can form.
//! - Gradients are evaluated from operands' current values, not values
//!   captured at record time.
//! - Backward uses an explicit stack rather than recursion.

mod arithmetic;
mod backward;
mod operator;
mod variable;

pub use arithmetic::BinaryOp;
pub use operator::{Operand, Operator};
pub use variable::Variable;

pub(crate) use arithmetic::sum;
