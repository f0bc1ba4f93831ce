//! Loss functions
//!
//! Each loss is a pure function pair: `forward` reduces a (target,
//! prediction) pair to a scalar, `backward` returns the gradient of that
//! scalar with respect to the prediction.
//!
//! Sign convention: `backward` returns dLoss/dPrediction, and the dense
//! layer's update subtracts `lr * gradient`, so the loss decreases under a
//! small enough learning rate. Predictions are clipped with [`EPSILON`]
//! before logarithms and reciprocals rather than erroring mid-computation.

use crate::error::{Error, Result};
use crate::linalg::{Matrix, Vector};

/// Clip floor keeping `log` and reciprocals well-defined.
pub const EPSILON: f64 = 1e-7;

/// A scalar objective with a hand-derived gradient.
pub trait Loss {
    /// Registry name of this loss.
    fn name(&self) -> &'static str;

    /// Scalar loss for a (target, prediction) pair.
    fn forward(&self, target: &Matrix, prediction: &Matrix) -> Result<f64>;

    /// Gradient of the loss w.r.t. the prediction.
    fn backward(&self, target: &Matrix, prediction: &Matrix) -> Result<Matrix>;
}

fn check_shapes(target: &Matrix, prediction: &Matrix, op: &'static str) -> Result<()> {
    if target.shape() != prediction.shape() {
        return Err(Error::ShapeMismatch {
            op,
            lhs_rows: target.rows(),
            lhs_cols: target.cols(),
            rhs_rows: prediction.rows(),
            rhs_cols: prediction.cols(),
        });
    }
    Ok(())
}

/// Mean squared error: mean over rows of (target - prediction)^2.
pub struct MeanSquaredError;

impl Loss for MeanSquaredError {
    fn name(&self) -> &'static str {
        "mse"
    }

    fn forward(&self, target: &Matrix, prediction: &Matrix) -> Result<f64> {
        check_shapes(target, prediction, "mse forward")?;
        Ok(target.sub(prediction)?.powi(2).sum() / target.rows() as f64)
    }

    fn backward(&self, target: &Matrix, prediction: &Matrix) -> Result<Matrix> {
        check_shapes(target, prediction, "mse backward")?;
        Ok(prediction
            .sub(target)?
            .mul_scalar(2.0 / target.rows() as f64))
    }
}

/// Cross-entropy over one-hot (or soft) targets.
pub struct CrossEntropy;

impl Loss for CrossEntropy {
    fn name(&self) -> &'static str {
        "crossentropy"
    }

    fn forward(&self, target: &Matrix, prediction: &Matrix) -> Result<f64> {
        check_shapes(target, prediction, "crossentropy forward")?;
        let clipped = prediction.clip(EPSILON, f64::INFINITY);
        Ok(-target.mul(&clipped.log())?.sum() / target.rows() as f64)
    }

    fn backward(&self, target: &Matrix, prediction: &Matrix) -> Result<Matrix> {
        check_shapes(target, prediction, "crossentropy backward")?;
        let clipped = prediction.clip(EPSILON, f64::INFINITY);
        Ok(target
            .div(&clipped)?
            .mul_scalar(-1.0 / target.rows() as f64))
    }
}

/// Binary cross-entropy for targets in {0, 1}.
pub struct BinaryCrossEntropy;

impl Loss for BinaryCrossEntropy {
    fn name(&self) -> &'static str {
        "binarycrossentropy"
    }

    fn forward(&self, target: &Matrix, prediction: &Matrix) -> Result<f64> {
        check_shapes(target, prediction, "binarycrossentropy forward")?;
        let p = prediction.clip(EPSILON, f64::INFINITY);
        let one_minus_p = prediction
            .mul_scalar(-1.0)
            .add_scalar(1.0)
            .clip(EPSILON, f64::INFINITY);
        let one_minus_t = target.mul_scalar(-1.0).add_scalar(1.0);
        let per_element = target.mul(&p.log())?.add(&one_minus_t.mul(&one_minus_p.log())?)?;
        Ok(-per_element.sum() / target.rows() as f64)
    }

    fn backward(&self, target: &Matrix, prediction: &Matrix) -> Result<Matrix> {
        check_shapes(target, prediction, "binarycrossentropy backward")?;
        let p = prediction.clip(EPSILON, f64::INFINITY);
        let one_minus_p = prediction
            .mul_scalar(-1.0)
            .add_scalar(1.0)
            .clip(EPSILON, f64::INFINITY);
        let one_minus_t = target.mul_scalar(-1.0).add_scalar(1.0);
        // -(t/p - (1-t)/(1-p))
        let grad = target
            .div(&p)?
            .sub(&one_minus_t.div(&one_minus_p)?)?
            .mul_scalar(-1.0);
        grad.validate_finite("binarycrossentropy gradient")?;
        Ok(grad)
    }
}

/// Fused softmax + cross-entropy fast path, explicitly named.
///
/// Takes raw logits: `forward` applies a numerically-stable row-wise
/// softmax before the cross-entropy reduction, and `backward` returns the
/// fused gradient `(softmax(prediction) - target) / rows`.
///
/// This is the shortcut for networks whose last layer produces logits
/// (no trailing Softmax activation layer); pairing it with an explicit
/// Softmax layer would apply the softmax twice.
pub struct SoftmaxCrossEntropy;

fn softmax_rows(logits: &Matrix) -> Result<Matrix> {
    logits.apply_rows(|row: &Vector| {
        let shifted = row.sub_scalar(row.max()).exp();
        let sum = shifted.sum();
        Ok(shifted.mul_scalar(1.0 / sum))
    })
}

impl Loss for SoftmaxCrossEntropy {
    fn name(&self) -> &'static str {
        "softmaxcrossentropy"
    }

    fn forward(&self, target: &Matrix, prediction: &Matrix) -> Result<f64> {
        check_shapes(target, prediction, "softmaxcrossentropy forward")?;
        let probs = softmax_rows(prediction)?.clip(EPSILON, f64::INFINITY);
        Ok(-target.mul(&probs.log())?.sum() / target.rows() as f64)
    }

    fn backward(&self, target: &Matrix, prediction: &Matrix) -> Result<Matrix> {
        check_shapes(target, prediction, "softmaxcrossentropy backward")?;
        softmax_rows(prediction)?
            .sub(target)?
            .div_scalar(target.rows() as f64)
    }
}

/// Explicit name registry: build a loss from its config name.
pub fn from_name(name: &str) -> Result<Box<dyn Loss>> {
    match name {
        "mse" => Ok(Box::new(MeanSquaredError)),
        "crossentropy" => Ok(Box::new(CrossEntropy)),
        "binarycrossentropy" => Ok(Box::new(BinaryCrossEntropy)),
        "softmaxcrossentropy" => Ok(Box::new(SoftmaxCrossEntropy)),
        _ => Err(Error::InvalidConfiguration(format!(
            "unknown loss '{name}'. Must be one of: mse, crossentropy, binarycrossentropy, softmaxcrossentropy"
        ))),
    }
}

/// True if a loss is one of the cross-entropy family, the only losses a
/// softmax output layer may be paired with.
pub fn is_cross_entropy(name: &str) -> bool {
    matches!(name, "crossentropy" | "binarycrossentropy")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[Vec<f64>]) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_mse_zero_on_exact_match() {
        let t = m(&[vec![1.0], vec![1.0], vec![1.0]]);
        assert_eq!(MeanSquaredError.forward(&t, &t).unwrap(), 0.0);
        let grad = MeanSquaredError.backward(&t, &t).unwrap();
        assert!(grad.is_equal(&Matrix::new(3, 1), 0.0));
    }

    #[test]
    fn test_mse_values() {
        let t = m(&[vec![0.0], vec![1.0], vec![1.0], vec![0.0]]);
        let p = m(&[vec![0.1], vec![0.9], vec![0.8], vec![0.2]]);
        // sum of squared errors = 0.01 + 0.01 + 0.04 + 0.04 = 0.1
        let loss = MeanSquaredError.forward(&t, &p).unwrap();
        assert!((loss - 0.025).abs() < 1e-12);
        // dL/dp = 2(p - t)/rows
        let grad = MeanSquaredError.backward(&t, &p).unwrap();
        let expected = m(&[vec![0.05], vec![-0.05], vec![-0.1], vec![0.1]]);
        assert!(grad.is_equal(&expected, 1e-12));
    }

    #[test]
    fn test_crossentropy_clips_zero_predictions() {
        let t = m(&[vec![1.0, 0.0]]);
        let p = m(&[vec![0.0, 1.0]]);
        let loss = CrossEntropy.forward(&t, &p).unwrap();
        assert!(loss.is_finite());
        let grad = CrossEntropy.backward(&t, &p).unwrap();
        assert!(grad.validate_finite("test").is_ok());
    }

    #[test]
    fn test_binary_crossentropy_confident_correct_is_small() {
        let t = m(&[vec![1.0], vec![0.0]]);
        let good = m(&[vec![0.99], vec![0.01]]);
        let bad = m(&[vec![0.01], vec![0.99]]);
        let low = BinaryCrossEntropy.forward(&t, &good).unwrap();
        let high = BinaryCrossEntropy.forward(&t, &bad).unwrap();
        assert!(low < high);
    }

    #[test]
    fn test_fused_softmax_crossentropy_gradient() {
        let t = m(&[vec![0.0, 1.0, 0.0]]);
        let logits = m(&[vec![0.5, 1.5, -0.3]]);
        let grad = SoftmaxCrossEntropy.backward(&t, &logits).unwrap();
        // Gradient elements sum to zero: softmax sums to 1, target sums to 1.
        assert!(grad.sum().abs() < 1e-12);
        // The true-class component must be negative (push its logit up).
        assert!(grad.get(0, 1).unwrap() < 0.0);
    }

    #[test]
    fn test_loss_registry() {
        assert_eq!(from_name("mse").unwrap().name(), "mse");
        assert!(from_name("hinge").is_err());
        assert!(is_cross_entropy("crossentropy"));
        assert!(!is_cross_entropy("mse"));
    }
}
