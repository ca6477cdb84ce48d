//! Integration tests for the scalar tape.
//!
//! Tests backward-mode automatic differentiation with numerical gradient checks.

use approx::assert_relative_eq;
use tapegrad::{AutogradError, Operator, Scalar, Tensor, Variable, functional};

/// Compute numerical gradient using central difference.
///
/// grad_i ≈ (f(x + eps*e_i) - f(x - eps*e_i)) / (2*eps)
fn numerical_gradient<F>(f: F, x: &[f64], eps: f64) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let mut grad = vec![0.0; x.len()];
    let mut x_plus = x.to_vec();
    let mut x_minus = x.to_vec();

    for i in 0..x.len() {
        x_plus[i] = x[i] + eps;
        x_minus[i] = x[i] - eps;

        let f_plus = f(&x_plus);
        let f_minus = f(&x_minus);
        grad[i] = (f_plus - f_minus) / (2.0 * eps);

        x_plus[i] = x[i];
        x_minus[i] = x[i];
    }
    grad
}

/// Evaluate `f` on fresh leaves and return the value and analytic gradient.
fn analytic_gradient<F>(f: F, x: &[f64]) -> (f64, Vec<f64>)
where
    F: Fn(&[Variable]) -> Variable,
{
    let vars: Vec<Variable> = x.iter().map(|&v| Variable::new(v)).collect();
    let out = f(&vars);
    out.backward().unwrap();
    (
        out.value().to_f64(),
        vars.iter().map(|v| v.grad().to_f64()).collect(),
    )
}

fn forward<F>(f: &F, x: &[f64]) -> f64
where
    F: Fn(&[Variable]) -> Variable,
{
    let vars: Vec<Variable> = x.iter().map(|&v| Variable::new(v)).collect();
    f(&vars).value().to_f64()
}

fn check_against_numerical<F>(f: F, x: &[f64])
where
    F: Fn(&[Variable]) -> Variable,
{
    let (_, analytic) = analytic_gradient(&f, x);
    let numerical = numerical_gradient(|p| forward(&f, p), x, 1e-6);
    for (a, n) in analytic.iter().zip(numerical.iter()) {
        assert_relative_eq!(a, n, epsilon = 1e-5, max_relative = 1e-5);
    }
}

#[test]
fn test_linear() {
    let x = Variable::new(4);
    let y = 2 * &x;
    y.backward().unwrap();
    assert_eq!(x.grad(), 2);
}

#[test]
fn test_zero_power_at_zero() {
    let x = Variable::new(0);
    let y = x.pow(0);
    y.backward().unwrap();
    assert_eq!(y, 1);
    assert_eq!(x.grad(), 0);
    assert!(!x.grad().to_f64().is_nan());
}

#[test]
fn test_integer_literal_on_left() {
    let x = Variable::new(4);
    let y = 3 - &x + 2 * &x;
    y.backward().unwrap();
    assert_eq!(y, 7);
    assert_eq!(x.grad(), 1);
}

#[test]
fn test_cube() {
    let x = Variable::new(5);
    let y = x.pow(3);
    y.backward().unwrap();
    assert_eq!(x.grad(), 75);
}

#[test]
fn test_composite_expression() {
    let x = Variable::new(2);
    let y = Variable::new(5);
    let z = 1 / &x + (x.pow(2) - 1).pow(2) + &y / x.pow(2);
    z.backward().unwrap();
    assert_relative_eq!(x.grad().to_f64(), 22.5);
    assert_relative_eq!(y.grad().to_f64(), 0.25);
}

#[test]
fn test_numerical_gradient_rational() {
    check_against_numerical(
        |v| (&v[0] * &v[1] - 3.0) / (&v[1] + v[0].pow(2)),
        &[1.3, -0.7],
    );
}

#[test]
fn test_numerical_gradient_transcendental() {
    check_against_numerical(
        |v| v[0].exp() * v[1].cos() + v[0].sin() / v[1].tanh() - v[0].tan(),
        &[0.4, 1.1],
    );
}

#[test]
fn test_numerical_gradient_shared_subexpression() {
    check_against_numerical(
        |v| {
            let s = &v[0] + &v[1];
            &s * &s * &v[2] - -&s
        },
        &[0.5, 1.5, -2.0],
    );
}

#[test]
fn test_numerical_gradient_tensor_norm() {
    check_against_numerical(
        |v| Tensor::from_vec(v.to_vec(), &[2, 2]).unwrap().norm().unwrap(),
        &[1.0, -2.0, 0.5, 3.0],
    );
}

#[test]
fn test_numerical_gradient_matmul() {
    // f(A) = sum(tanh(A @ B)) with B fixed
    let b_data: Vec<f64> = (1..=6).map(|x| x as f64 / 10.0).collect();
    let f = |a: &[Variable]| {
        let a = Tensor::from_vec(a.to_vec(), &[2, 3]).unwrap();
        let b = Tensor::from_values(b_data.clone(), &[3, 2], false).unwrap();
        functional::tanh(&a.matmul(&b).unwrap()).sum().unwrap()
    };
    check_against_numerical(f, &[0.1, -0.2, 0.3, 0.4, 0.5, -0.6]);
}

#[test]
fn test_gradients_accumulate_across_calls() {
    let x = Variable::new(3.0);
    let y = &x * &x;
    y.backward().unwrap();
    y.backward().unwrap();
    assert_eq!(x.grad(), 12.0);

    x.zero_grad();
    y.backward().unwrap();
    assert_eq!(x.grad(), 6.0);
}

#[test]
fn test_reset_state_clears_tape() {
    let x = Variable::new(2);
    let y = x.pow(2) + 1;
    y.backward().unwrap();
    assert_eq!(x.grad(), 4);

    y.reset_state(true);
    assert_eq!(y.grad(), 0);
    assert!(y.last_operation().is_none());

    // A reset node is a leaf: backward no longer reaches x.
    x.zero_grad();
    y.backward().unwrap();
    assert_eq!(y.grad(), 1);
    assert_eq!(x.grad(), 0);
}

#[test]
fn test_product_zero_rule() {
    let a = Variable::new(0);
    let b = Variable::new(3);
    let c = Variable::new(4);
    let p = &a * &b * &c;
    p.backward().unwrap();
    assert_eq!(a.grad(), 12);
    assert_eq!(b.grad(), 0);
    assert_eq!(c.grad(), 0);
}

#[test]
fn test_subtraction_is_recorded_as_sum_of_negation() {
    let x = Variable::new(1);
    let y = Variable::new(2);
    let z = &x - &y;
    match z.last_operation() {
        Some(Operator::Sum(ops)) => {
            assert_eq!(ops.len(), 2);
            let negated = ops[1].as_variable().unwrap();
            assert!(matches!(negated.last_operation(), Some(Operator::Product(_))));
        }
        other => panic!("expected a sum, got {other:?}"),
    }

    let w = &x - 5;
    match w.last_operation() {
        Some(Operator::Sum(ops)) => assert_eq!(ops[1].value(), Scalar::from(-5)),
        other => panic!("expected a sum, got {other:?}"),
    }
}

#[test]
fn test_power_exponent_gets_no_gradient() {
    let base = Variable::new(3.0);
    let exponent = Variable::new(2.0);
    let y = base.pow(&exponent);
    y.backward().unwrap();
    assert_eq!(base.grad(), 6.0);
    assert_eq!(exponent.grad(), 0);
}

#[test]
fn test_invalid_operand_type_for_tensor() {
    let x = Variable::new(1);
    let t = Tensor::ones(&[2], false);
    assert!(matches!(
        x.try_compare(&t),
        Err(AutogradError::InvalidOperandType { .. })
    ));
}
