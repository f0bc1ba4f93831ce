//! Differentiable activation functions
//!
//! Each activation is a stateless (or small-parameter) pure function pair
//! over vectors. `forward` computes the activation, `derivative` the
//! per-element derivative at the same point, and `backward` turns an
//! upstream gradient into an input gradient.
//!
//! For elementwise activations `backward` is the provided default,
//! `derivative(input) o upstream` (Hadamard product). Softmax is the one
//! activation whose outputs depend jointly on all inputs, so it overrides
//! `backward` with the full Jacobian-vector product instead of a
//! per-element derivative.

use crate::error::{Error, Result};
use crate::linalg::Vector;

/// A differentiable elementwise (or row-local) transform.
pub trait Activation {
    /// Registry name of this activation.
    fn name(&self) -> &'static str;

    /// Apply the activation at every element of `input`.
    fn forward(&self, input: &Vector) -> Vector;

    /// Per-element derivative evaluated at `input`.
    fn derivative(&self, input: &Vector) -> Vector;

    /// Gradient of the loss w.r.t. `input`, given the gradient w.r.t. the
    /// activation's output. Defaults to the elementwise chain rule.
    fn backward(&self, input: &Vector, upstream: &Vector) -> Result<Vector> {
        self.derivative(input).mul(upstream)
    }
}

/// Identity function.
pub struct Linear;

impl Activation for Linear {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn forward(&self, input: &Vector) -> Vector {
        input.clone()
    }

    fn derivative(&self, input: &Vector) -> Vector {
        input.apply(|_| 1.0)
    }
}

/// Step function: 1 above the threshold, 0 at or below it.
///
/// The derivative is zero everywhere (non-differentiable approximation),
/// so gradients do not flow through this activation.
pub struct BinaryStep {
    threshold: f64,
}

impl BinaryStep {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Activation for BinaryStep {
    fn name(&self) -> &'static str {
        "binary_step"
    }

    fn forward(&self, input: &Vector) -> Vector {
        let threshold = self.threshold;
        input.apply(|x| if x > threshold { 1.0 } else { 0.0 })
    }

    fn derivative(&self, input: &Vector) -> Vector {
        input.apply(|_| 0.0)
    }
}

/// Rectified linear unit: max(0, x).
pub struct ReLu;

impl Activation for ReLu {
    fn name(&self) -> &'static str {
        "relu"
    }

    fn forward(&self, input: &Vector) -> Vector {
        input.apply(|x| x.max(0.0))
    }

    fn derivative(&self, input: &Vector) -> Vector {
        input.apply(|x| if x > 0.0 { 1.0 } else { 0.0 })
    }
}

/// Leaky ReLU: max(alpha * x, x), keeping a small gradient for negatives.
pub struct LeakyReLu {
    alpha: f64,
}

impl LeakyReLu {
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }
}

impl Activation for LeakyReLu {
    fn name(&self) -> &'static str {
        "leaky_relu"
    }

    fn forward(&self, input: &Vector) -> Vector {
        let alpha = self.alpha;
        input.apply(|x| (alpha * x).max(x))
    }

    fn derivative(&self, input: &Vector) -> Vector {
        let alpha = self.alpha;
        input.apply(|x| if x > 0.0 { 1.0 } else { alpha })
    }
}

/// Logistic sigmoid: squashes the input into (0, 1).
pub struct Sigmoid;

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl Activation for Sigmoid {
    fn name(&self) -> &'static str {
        "sigmoid"
    }

    fn forward(&self, input: &Vector) -> Vector {
        input.apply(sigmoid)
    }

    fn derivative(&self, input: &Vector) -> Vector {
        input.apply(|x| {
            let s = sigmoid(x);
            s * (1.0 - s)
        })
    }
}

/// Hyperbolic tangent: squashes the input into (-1, 1).
pub struct Tanh;

impl Activation for Tanh {
    fn name(&self) -> &'static str {
        "tanh"
    }

    fn forward(&self, input: &Vector) -> Vector {
        input.apply(f64::tanh)
    }

    fn derivative(&self, input: &Vector) -> Vector {
        input.apply(|x| 1.0 - x.tanh().powi(2))
    }
}

/// Softmax: normalizes the input into a probability distribution.
///
/// The forward pass subtracts the row maximum before exponentiation to
/// avoid overflow. The backward pass applies the true softmax Jacobian to
/// the upstream gradient rather than a per-element derivative.
pub struct Softmax;

impl Activation for Softmax {
    fn name(&self) -> &'static str {
        "softmax"
    }

    fn forward(&self, input: &Vector) -> Vector {
        let max = input.max();
        let shifted = input.sub_scalar(max).exp();
        let sum = shifted.sum();
        shifted.mul_scalar(1.0 / sum)
    }

    /// Diagonal of the Jacobian, s_i * (1 - s_i). Kept for the uniform
    /// interface; the layer path routes through `backward`.
    fn derivative(&self, input: &Vector) -> Vector {
        let s = self.forward(input);
        s.apply(|x| x * (1.0 - x))
    }

    /// Full Jacobian-vector product:
    /// out_i = sum_j s_i * (delta_ij - s_j) * upstream_j.
    fn backward(&self, input: &Vector, upstream: &Vector) -> Result<Vector> {
        if input.len() != upstream.len() {
            return Err(Error::ShapeMismatch {
                op: "softmax backward",
                lhs_rows: 1,
                lhs_cols: input.len(),
                rhs_rows: 1,
                rhs_cols: upstream.len(),
            });
        }
        let s = self.forward(input);
        // J . g = s o (g - <s, g>), the standard contraction of the
        // softmax Jacobian with the incoming gradient.
        let weighted = s.dot(upstream)?;
        s.mul(&upstream.sub_scalar(weighted))
    }
}

/// Parameters an activation config may carry.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivationParams {
    /// Threshold for `binary_step` (default 0.0).
    pub threshold: Option<f64>,
    /// Slope for `leaky_relu` (default 0.01).
    pub alpha: Option<f64>,
}

/// Explicit name registry: build an activation from its config name.
///
/// Unknown names are an `InvalidConfiguration` error.
pub fn from_name(name: &str, params: &ActivationParams) -> Result<Box<dyn Activation>> {
    match name {
        "linear" => Ok(Box::new(Linear)),
        "binary_step" => Ok(Box::new(BinaryStep::new(params.threshold.unwrap_or(0.0)))),
        "relu" => Ok(Box::new(ReLu)),
        "leaky_relu" => Ok(Box::new(LeakyReLu::new(params.alpha.unwrap_or(0.01)))),
        "sigmoid" => Ok(Box::new(Sigmoid)),
        "tanh" => Ok(Box::new(Tanh)),
        "softmax" => Ok(Box::new(Softmax)),
        _ => Err(Error::InvalidConfiguration(format!(
            "unknown activation '{name}'. Must be one of: linear, binary_step, relu, leaky_relu, sigmoid, tanh, softmax"
        ))),
    }
}
