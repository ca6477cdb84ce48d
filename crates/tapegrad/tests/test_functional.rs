//! Integration tests for elementary function dispatch.

use approx::assert_relative_eq;
use tapegrad::functional::Elementary;
use tapegrad::{Scalar, Tensor, Variable, cos, exp, relu, sin, tan, tanh, to_tensor};

type Unary = fn(&Variable) -> Variable;
type Derivative = fn(f64) -> f64;

/// Each function paired with its derivative.
fn cases() -> Vec<(&'static str, Unary, Derivative)> {
    vec![
        ("exp", exp::<Variable> as Unary, f64::exp as Derivative),
        ("cos", cos::<Variable> as Unary, (|x: f64| -x.sin()) as Derivative),
        ("sin", sin::<Variable> as Unary, f64::cos as Derivative),
        ("tan", tan::<Variable> as Unary, (|x: f64| 1.0 + x.tan().powi(2)) as Derivative),
        ("tanh", tanh::<Variable> as Unary, (|x: f64| 1.0 - x.tanh().powi(2)) as Derivative),
    ]
}

#[test]
fn test_variable_derivatives() {
    for (name, f, df) in cases() {
        for x in [-1.2, -0.3, 0.0, 0.7, 1.1] {
            let v = Variable::new(x);
            f(&v).backward().unwrap();
            assert_relative_eq!(v.grad().to_f64(), df(x), epsilon = 1e-12, max_relative = 1e-12);
            assert!(v.grad().to_f64().is_finite(), "{name} at {x}");
        }
    }
}

#[test]
fn test_tensor_dispatch_preserves_shape() {
    let t = Tensor::full(&[2, 3, 1], 0.5, true);
    for out in [exp(&t), cos(&t), sin(&t), tan(&t), tanh(&t), relu(&t)] {
        assert_eq!(out.shape(), &[2, 3, 1]);
        assert!(out.variables().all(|v| !v.is_leaf()));
    }
}

#[test]
fn test_number_dispatch() {
    assert_relative_eq!(exp(&2.0), 2.0_f64.exp());
    assert_relative_eq!(tan(&0.25), 0.25_f64.tan());
    assert_eq!(relu(&3), Scalar::Int(3));
    assert_eq!(relu(&Scalar::Float(-0.5)), 0.0);
    assert_relative_eq!(cos(&0).to_f64(), 1.0);
}

#[test]
fn test_trait_methods_directly() {
    let x = Variable::new(0.0);
    let y = Elementary::tanh(&x);
    assert_eq!(y, 0.0);

    let t = to_tensor(vec![-2, 0, 2]).unwrap();
    let r = Elementary::relu(&t);
    assert_eq!(r.to_string(), "tensor([0, 0, 2])");
}

#[test]
fn test_relu_network_gradient() {
    // loss = sum(relu(w * x)), gradient flows only where w * x > 0
    let w = to_tensor(vec![1.0, -1.0, 2.0]).unwrap();
    let x = Variable::new(1.5);
    let loss = relu(&w.mul(&x).unwrap()).sum().unwrap();
    loss.backward().unwrap();

    assert_relative_eq!(loss.value().to_f64(), 4.5);
    assert_relative_eq!(x.grad().to_f64(), 3.0);
    let grads: Vec<f64> = w.grads().into_iter().map(f64::from).collect();
    assert_eq!(grads, vec![1.5, 0.0, 1.5]);
}
