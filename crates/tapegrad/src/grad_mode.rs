//! Gradient recording mode.
//!
//! Recording is on by default. Inside a no-grad scope new variables never
//! require gradients, no operator is attached to them, and
//! [`Variable::backward`](crate::Variable::backward) refuses to run.
//!
//! The flag is thread-local: every thread starts with recording enabled and
//! scopes on one thread never affect another.
//!
//! # Nesting
//!
//! Leaving a scope always re-enables recording, whatever the state was on
//! entry. An inner scope therefore turns recording back on before the outer
//! scope ends:
//!
//! ```
//! use tapegrad::grad_mode::{NoGradGuard, is_grad_enabled};
//!
//! let outer = NoGradGuard::new();
//! {
//!     let _inner = NoGradGuard::new();
//! }
//! assert!(is_grad_enabled()); // still inside `outer`
//! drop(outer);
//! ```

use std::cell::Cell;

thread_local! {
    static GRAD_ENABLED: Cell<bool> = const { Cell::new(true) };
}

/// Check whether gradient recording is currently enabled on this thread.
#[inline]
pub fn is_grad_enabled() -> bool {
    GRAD_ENABLED.with(Cell::get)
}

fn set_grad_enabled(enabled: bool) {
    GRAD_ENABLED.with(|flag| flag.set(enabled));
}

/// Scope guard that disables gradient recording until dropped.
///
/// Dropping the guard re-enables recording on every exit path, including
/// early returns through `?` and panics unwinding through the scope.
#[derive(Debug)]
#[must_use = "recording is re-enabled as soon as the guard is dropped"]
pub struct NoGradGuard {
    _private: (),
}

impl NoGradGuard {
    /// Enter a no-grad scope.
    pub fn new() -> Self {
        set_grad_enabled(false);
        tracing::debug!("entered no_grad scope");
        Self { _private: () }
    }
}

impl Default for NoGradGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for NoGradGuard {
    fn drop(&mut self) {
        set_grad_enabled(true);
        tracing::debug!("left no_grad scope");
    }
}

/// Run `f` with gradient recording disabled.
///
/// # Example
///
/// ```
/// use tapegrad::{Variable, grad_mode::no_grad};
///
/// let x = Variable::new(4);
/// let y = no_grad(|| x.pow(2));
/// assert!(!y.requires_grad());
/// ```
pub fn no_grad<R>(f: impl FnOnce() -> R) -> R {
    let _guard = NoGradGuard::new();
    f()
}
