//! Variable - a scalar node in the computation tape.

use super::operator::{Operand, Operator};
use crate::grad_mode::is_grad_enabled;
use crate::scalar::{DType, Scalar};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
struct Node {
    value: Scalar,
    grad: Scalar,
    requires_grad: bool,
    last_operation: Option<Operator>,
}

// Long chains would otherwise be freed recursively, one stack frame per
// tape edge.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending: Vec<Operator> = self.last_operation.take().into_iter().collect();
        while let Some(operator) = pending.pop() {
            for operand in operator.into_operands() {
                if let Operand::Variable(var) = operand {
                    if let Ok(cell) = Rc::try_unwrap(var.node) {
                        pending.extend(cell.into_inner().last_operation.take());
                    }
                }
            }
        }
    }
}

/// A scalar that records how it was computed.
///
/// `Variable` is a shared handle: cloning it yields another handle to the
/// same node, so gradients accumulated through one handle are visible
/// through every other. Use [`Variable::ptr_eq`] to test identity and
/// [`Variable::detach`] for an independent copy.
///
/// # Example
///
/// ```
/// use tapegrad::Variable;
///
/// let x = Variable::new(5);
/// let y = x.pow(3);
/// y.backward().unwrap();
/// assert_eq!(x.grad(), 75);
/// ```
#[derive(Clone)]
pub struct Variable {
    node: Rc<RefCell<Node>>,
}

impl Variable {
    /// Create a leaf variable that requires gradients.
    ///
    /// Inside a no-grad scope the flag is forced off.
    pub fn new(value: impl Into<Scalar>) -> Self {
        Self::with_requires_grad(value, true)
    }

    /// Create a leaf variable with an explicit `requires_grad` flag.
    pub fn with_requires_grad(value: impl Into<Scalar>, requires_grad: bool) -> Self {
        Self::from_parts(value.into(), requires_grad, None)
    }

    /// Create a leaf variable whose value is converted to `dtype`.
    pub fn with_dtype(value: impl Into<Scalar>, dtype: DType, requires_grad: bool) -> Self {
        Self::with_requires_grad(value.into().cast(dtype), requires_grad)
    }

    /// Create a leaf variable that never requires gradients.
    pub fn constant(value: impl Into<Scalar>) -> Self {
        Self::with_requires_grad(value, false)
    }

    /// Create the result of a recorded operation.
    ///
    /// The operator is dropped and `requires_grad` forced off when grad mode
    /// is disabled.
    pub(crate) fn from_operation(value: Scalar, requires_grad: bool, operator: Operator) -> Self {
        Self::from_parts(value, requires_grad, Some(operator))
    }

    fn from_parts(value: Scalar, requires_grad: bool, operator: Option<Operator>) -> Self {
        let enabled = is_grad_enabled();
        Self {
            node: Rc::new(RefCell::new(Node {
                value,
                grad: Scalar::zero(),
                requires_grad: requires_grad && enabled,
                last_operation: operator.filter(|_| enabled),
            })),
        }
    }

    /// Current value.
    #[inline]
    pub fn value(&self) -> Scalar {
        self.node.borrow().value
    }

    /// Overwrite the value without touching the tape.
    ///
    /// Operators that already reference this variable will use the new value
    /// the next time their gradient is evaluated.
    pub fn set_value(&self, value: impl Into<Scalar>) {
        self.node.borrow_mut().value = value.into();
    }

    /// Storage kind of the current value.
    pub fn dtype(&self) -> DType {
        self.value().dtype()
    }

    /// Accumulated gradient.
    #[inline]
    pub fn grad(&self) -> Scalar {
        self.node.borrow().grad
    }

    pub fn set_grad(&self, grad: impl Into<Scalar>) {
        self.node.borrow_mut().grad = grad.into();
    }

    /// Whether gradients flow into this variable.
    #[inline]
    pub fn requires_grad(&self) -> bool {
        self.node.borrow().requires_grad
    }

    /// Set the `requires_grad` flag.
    ///
    /// Has no effect while grad mode is disabled, matching construction.
    pub fn set_requires_grad(&self, requires_grad: bool) {
        self.node.borrow_mut().requires_grad = requires_grad && is_grad_enabled();
    }

    /// The operation that produced this variable (`None` for leaves).
    pub fn last_operation(&self) -> Option<Operator> {
        self.node.borrow().last_operation.clone()
    }

    /// Check whether this variable is a leaf of the tape.
    pub fn is_leaf(&self) -> bool {
        self.node.borrow().last_operation.is_none()
    }

    /// Clear the gradient and recorded operation.
    ///
    /// Idempotent. Unlike [`Variable::set_requires_grad`] the flag is set as
    /// given even inside a no-grad scope, so update loops can re-arm
    /// parameters before leaving the scope.
    pub fn reset_state(&self, requires_grad: bool) {
        let mut node = self.node.borrow_mut();
        node.grad = Scalar::zero();
        node.last_operation = None;
        node.requires_grad = requires_grad;
    }

    /// Clear only the gradient accumulator.
    pub fn zero_grad(&self) {
        self.node.borrow_mut().grad = Scalar::zero();
    }

    /// A new leaf with the same value and no history.
    pub fn detach(&self) -> Self {
        Self::constant(self.value())
    }

    /// Check whether two handles refer to the same node.
    pub fn ptr_eq(a: &Variable, b: &Variable) -> bool {
        Rc::ptr_eq(&a.node, &b.node)
    }

    pub(crate) fn accumulate_grad(&self, seed: Scalar) {
        let mut node = self.node.borrow_mut();
        node.grad = node.grad + seed;
    }

    /// Overwrite the value and drop all gradient state in one step.
    pub(crate) fn assign(&self, value: Scalar) {
        let mut node = self.node.borrow_mut();
        node.value = value;
        node.grad = Scalar::zero();
        node.requires_grad = false;
        node.last_operation = None;
    }
}

impl fmt::Debug for Variable {
    // The operator is summarised by name; printing it would walk the tape.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node.borrow();
        f.debug_struct("Variable")
            .field("value", &node.value)
            .field("grad", &node.grad)
            .field("requires_grad", &node.requires_grad)
            .field(
                "last_operation",
                &node.last_operation.as_ref().map(Operator::name),
            )
            .finish()
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl Default for Variable {
    fn default() -> Self {
        Self::new(Scalar::zero())
    }
}

macro_rules! impl_variable_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Variable {
                fn from(value: $t) -> Self {
                    Variable::new(value)
                }
            }
        )*
    };
}

impl_variable_from_number!(i32, i64, f32, f64, Scalar);

impl From<&Variable> for Variable {
    fn from(v: &Variable) -> Self {
        v.clone()
    }
}

impl From<Operand> for Variable {
    /// Variables pass through; constants become fresh leaves.
    fn from(operand: Operand) -> Self {
        match operand {
            Operand::Variable(v) => v,
            Operand::Constant(c) => Variable::new(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grad_mode::no_grad;

    #[test]
    fn test_leaf_defaults() {
        let x = Variable::new(4);
        assert_eq!(x.value(), 4);
        assert_eq!(x.grad(), 0);
        assert!(x.requires_grad());
        assert!(x.is_leaf());
        assert_eq!(x.dtype(), DType::Int);
    }

    #[test]
    fn test_with_dtype() {
        let x = Variable::with_dtype(3, DType::Float, true);
        assert_eq!(x.dtype(), DType::Float);
        let y = Variable::with_dtype(2.7, DType::Int, false);
        assert_eq!(y.value(), 2);
        assert!(!y.requires_grad());
    }

    #[test]
    fn test_no_grad_forces_flag_off() {
        let x = no_grad(|| Variable::with_requires_grad(1.0, true));
        assert!(!x.requires_grad());
    }

    #[test]
    fn test_reset_state_idempotent() {
        let x = Variable::new(3);
        let y = &x * 2;
        y.backward().unwrap();
        assert!(!y.is_leaf());

        y.reset_state(false);
        assert_eq!(y.grad(), 0);
        assert!(y.last_operation().is_none());
        assert!(!y.requires_grad());

        y.reset_state(false);
        assert_eq!(y.grad(), 0);
        assert!(y.last_operation().is_none());
    }

    #[test]
    fn test_clone_shares_node() {
        let x = Variable::new(1);
        let alias = x.clone();
        alias.set_grad(5);
        assert_eq!(x.grad(), 5);
        assert!(Variable::ptr_eq(&x, &alias));

        let copy = x.detach();
        assert!(!Variable::ptr_eq(&x, &copy));
        assert!(!copy.requires_grad());
    }

    #[test]
    fn test_display_and_debug() {
        let x = Variable::new(2.5);
        assert_eq!(x.to_string(), "2.5");
        let y = &x + 1;
        assert!(format!("{y:?}").contains("Sum"));
    }
}
