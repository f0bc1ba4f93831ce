//! Activation layer
//!
//! Wraps an [`Activation`] and applies it row-wise, treating each row of
//! the input matrix as one sample vector.

use crate::activations::Activation;
use crate::error::{Error, Result};
use crate::layers::Layer;
use crate::linalg::Matrix;

/// Applies an activation function elementwise (row-wise for softmax).
///
/// Owns no trainable parameters; caches the last input so the backward
/// pass can evaluate the activation's derivative at the right point.
pub struct ActivationLayer {
    activation: Box<dyn Activation>,
    input: Option<Matrix>,
    label: String,
}

impl ActivationLayer {
    pub fn new(activation: Box<dyn Activation>) -> Self {
        Self {
            activation,
            input: None,
            label: String::new(),
        }
    }
}

impl Layer for ActivationLayer {
    fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        let output = input.apply_rows(|row| Ok(self.activation.forward(row)))?;
        output.validate_finite("activation forward output")?;
        self.input = Some(input.clone());
        Ok(output)
    }

    fn backward(&mut self, upstream: &Matrix, _lr: f64, _momentum: f64) -> Result<Matrix> {
        let input = self.input.as_ref().ok_or_else(|| {
            Error::InvalidConfiguration(format!(
                "{}: backward called before forward",
                self.label
            ))
        })?;
        if input.shape() != upstream.shape() {
            return Err(Error::ShapeMismatch {
                op: "activation backward",
                lhs_rows: input.rows(),
                lhs_cols: input.cols(),
                rhs_rows: upstream.rows(),
                rhs_cols: upstream.cols(),
            });
        }

        let mut gradient = Matrix::new(input.rows(), input.cols());
        for i in 0..input.rows() {
            let row_grad = self
                .activation
                .backward(&input.row(i)?, &upstream.row(i)?)?;
            gradient.set_row(i, &row_grad)?;
        }
        gradient.validate_finite("activation backward gradient")?;
        Ok(gradient)
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn set_label(&mut self, label: String) {
        self.label = label;
    }

    fn activation_name(&self) -> Option<&'static str> {
        Some(self.activation.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activations::{ReLu, Softmax};

    #[test]
    fn test_relu_layer_forward() {
        let mut layer = ActivationLayer::new(Box::new(ReLu));
        let input = Matrix::from_rows(&[vec![-1.0, 2.0], vec![3.0, -4.0]]).unwrap();
        let output = layer.forward(&input).unwrap();
        assert_eq!(output.to_rows(), vec![vec![0.0, 2.0], vec![3.0, 0.0]]);
    }

    #[test]
    fn test_relu_layer_backward_masks_gradient() {
        let mut layer = ActivationLayer::new(Box::new(ReLu));
        let input = Matrix::from_rows(&[vec![-1.0, 2.0]]).unwrap();
        layer.forward(&input).unwrap();
        let upstream = Matrix::from_rows(&[vec![5.0, 5.0]]).unwrap();
        let grad = layer.backward(&upstream, 0.1, 0.0).unwrap();
        assert_eq!(grad.to_rows(), vec![vec![0.0, 5.0]]);
    }

    #[test]
    fn test_backward_before_forward_is_error() {
        let mut layer = ActivationLayer::new(Box::new(ReLu));
        let upstream = Matrix::new(1, 2);
        assert!(matches!(
            layer.backward(&upstream, 0.1, 0.0),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_reports_activation_name() {
        let layer = ActivationLayer::new(Box::new(Softmax));
        assert_eq!(layer.activation_name(), Some("softmax"));
    }
}
