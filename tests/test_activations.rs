// Finite-difference checks for the activation derivatives, plus the
// softmax Jacobian-vector product against a numeric directional
// derivative.

use approx::assert_relative_eq;
use feedforward::activations::{
    Activation, LeakyReLu, Linear, ReLu, Sigmoid, Softmax, Tanh,
};
use feedforward::linalg::Vector;

const H: f64 = 1e-6;

/// Central-difference derivative of a scalar function.
fn numeric_derivative(f: impl Fn(f64) -> f64, x: f64) -> f64 {
    (f(x + H) - f(x - H)) / (2.0 * H)
}

/// Check `derivative` against central differences of `forward` at every
/// element of `points`.
fn check_elementwise(activation: &dyn Activation, points: &[f64]) {
    let input = Vector::from_slice(points);
    let analytic = activation.derivative(&input);
    for (i, &x) in points.iter().enumerate() {
        let numeric = numeric_derivative(
            |v| {
                activation
                    .forward(&Vector::from_scalar(v))
                    .get(0)
                    .unwrap()
            },
            x,
        );
        assert_relative_eq!(
            analytic.get(i).unwrap(),
            numeric,
            epsilon = 1e-5,
            max_relative = 1e-4
        );
    }
}

#[test]
fn test_linear_derivative_matches_finite_differences() {
    check_elementwise(&Linear, &[-3.0, -0.5, 0.0, 0.5, 3.0]);
}

#[test]
fn test_sigmoid_derivative_matches_finite_differences() {
    check_elementwise(&Sigmoid, &[-4.0, -1.0, 0.0, 1.0, 4.0]);
}

#[test]
fn test_tanh_derivative_matches_finite_differences() {
    check_elementwise(&Tanh, &[-2.0, -0.3, 0.0, 0.3, 2.0]);
}

#[test]
fn test_relu_derivative_matches_finite_differences_off_kink() {
    check_elementwise(&ReLu, &[-2.0, -0.5, 0.5, 2.0]);
}

#[test]
fn test_leaky_relu_derivative_matches_finite_differences_off_kink() {
    check_elementwise(&LeakyReLu::new(0.1), &[-2.0, -0.5, 0.5, 2.0]);
}

#[test]
fn test_default_backward_is_chain_rule() {
    let input = Vector::from_slice(&[-1.0, 0.5, 2.0]);
    let upstream = Vector::from_slice(&[0.3, -0.7, 1.1]);
    let grad = Tanh.backward(&input, &upstream).unwrap();
    let expected = Tanh.derivative(&input).mul(&upstream).unwrap();
    assert!(grad.is_equal(&expected, 0.0));
}

#[test]
fn test_softmax_backward_matches_directional_derivative() {
    // For L(x) = <softmax(x), g> with fixed g, the gradient of L is the
    // Jacobian-vector product J(x)^T g, which backward computes.
    let x = Vector::from_slice(&[0.4, -1.1, 2.3, 0.0]);
    let g = Vector::from_slice(&[1.0, -0.5, 0.25, 2.0]);
    let analytic = Softmax.backward(&x, &g).unwrap();

    for i in 0..x.len() {
        let numeric = numeric_derivative(
            |v| {
                let mut bumped = x.clone();
                bumped.set(i, v).unwrap();
                Softmax.forward(&bumped).dot(&g).unwrap()
            },
            x.get(i).unwrap(),
        );
        assert_relative_eq!(
            analytic.get(i).unwrap(),
            numeric,
            epsilon = 1e-6,
            max_relative = 1e-4
        );
    }
}

#[test]
fn test_softmax_backward_rejects_length_mismatch() {
    let x = Vector::from_slice(&[1.0, 2.0]);
    let g = Vector::from_slice(&[1.0, 2.0, 3.0]);
    assert!(Softmax.backward(&x, &g).is_err());
}

#[test]
fn test_softmax_is_stable_for_large_inputs() {
    let x = Vector::from_slice(&[1000.0, 1001.0, 999.0]);
    let y = Softmax.forward(&x);
    assert!(y.validate_finite("softmax").is_ok());
    assert_relative_eq!(y.sum(), 1.0, epsilon = 1e-12);
}
