//! Backward pass execution for reverse-mode automatic differentiation.

use super::operator::Operand;
use super::variable::Variable;
use crate::error::{AutogradError, Result};
use crate::grad_mode::is_grad_enabled;
use crate::scalar::Scalar;

impl Variable {
    /// Accumulate `d self / d v` into every upstream variable `v` that
    /// requires gradients, seeding the traversal with 1.
    ///
    /// # Errors
    ///
    /// Returns `AutogradError::GradDisabled` inside a no-grad scope.
    ///
    /// # Example
    ///
    /// ```
    /// use tapegrad::Variable;
    ///
    /// let x = Variable::new(4);
    /// let y = &x * 2;
    /// y.backward().unwrap();
    /// assert_eq!(x.grad(), 2);
    /// ```
    pub fn backward(&self) -> Result<()> {
        self.backward_with(Scalar::one())
    }

    /// Backward pass with an explicit upstream gradient.
    ///
    /// The walk is depth-first over the tape. A node reached along several
    /// paths receives one contribution per path, so its `grad` is only
    /// meaningful once the call returns. Partials are evaluated with the
    /// operands' current values.
    ///
    /// Gradients accumulate across calls; use [`Variable::zero_grad`] or
    /// [`Variable::reset_state`] between passes.
    ///
    /// # Errors
    ///
    /// Returns `AutogradError::GradDisabled` inside a no-grad scope.
    pub fn backward_with(&self, seed: impl Into<Scalar>) -> Result<()> {
        if !is_grad_enabled() {
            return Err(AutogradError::GradDisabled);
        }

        let span = tracing::debug_span!("backward");
        let _enter = span.enter();

        // Explicit stack instead of recursion: depth equals the longest tape path.
        let mut stack: Vec<(Variable, Scalar)> = vec![(self.clone(), seed.into())];
        let mut visited = 0usize;

        while let Some((var, seed)) = stack.pop() {
            visited += 1;
            var.accumulate_grad(seed);

            let Some(operator) = var.last_operation() else {
                continue;
            };

            let partials = operator.gradient();
            let inputs: Vec<(Variable, Scalar)> = operator
                .operands()
                .into_iter()
                .zip(partials)
                .filter_map(|(operand, partial)| match operand {
                    Operand::Variable(input) if input.requires_grad() => {
                        Some((input.clone(), seed * partial))
                    }
                    _ => None,
                })
                .collect();

            // Reversed so the first operand is expanded first.
            stack.extend(inputs.into_iter().rev());
        }

        tracing::trace!(visited, "backward pass finished");
        Ok(())
    }
}
