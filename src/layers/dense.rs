//! Dense (fully connected) layer
//!
//! Performs the transformation `output = input . W + b` on 1 x input_size
//! row matrices, and owns the hand-derived gradients for both its
//! parameters and its input.

use crate::error::{Error, Result};
use crate::layers::Layer;
use crate::linalg::Matrix;
use crate::utils::SimpleRng;

/// Fully connected layer with weights, biases, and momentum velocities.
///
/// Weights are input_size x output_size, biases 1 x output_size, both
/// initialized uniformly in [-1, 1]. The velocity accumulators share the
/// parameter shapes and start at zero; they are only touched when training
/// with a non-zero momentum coefficient.
pub struct DenseLayer {
    input_size: usize,
    output_size: usize,
    weights: Matrix,
    biases: Matrix,
    velocity_weights: Matrix,
    velocity_biases: Matrix,
    input: Option<Matrix>,
    label: String,
}

impl DenseLayer {
    /// Create a new layer with randomly initialized parameters.
    pub fn new(input_size: usize, output_size: usize, rng: &mut SimpleRng) -> Self {
        let mut weights = Matrix::new(input_size, output_size);
        let mut biases = Matrix::new(1, output_size);
        weights.rand(rng);
        biases.rand(rng);

        Self {
            input_size,
            output_size,
            weights,
            biases,
            velocity_weights: Matrix::new(input_size, output_size),
            velocity_biases: Matrix::new(1, output_size),
            input: None,
            label: String::new(),
        }
    }

    /// Number of input features.
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Number of output features.
    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Borrow the (weights, biases) pair.
    ///
    /// Extension point for persistence; unused internally.
    pub fn parameters(&self) -> (&Matrix, &Matrix) {
        (&self.weights, &self.biases)
    }

    /// Replace the (weights, biases) pair, validating shapes.
    ///
    /// Extension point for persistence; unused internally.
    pub fn set_parameters(&mut self, weights: Matrix, biases: Matrix) -> Result<()> {
        if weights.shape() != (self.input_size, self.output_size) {
            return Err(Error::ShapeMismatch {
                op: "set_parameters weights",
                lhs_rows: self.input_size,
                lhs_cols: self.output_size,
                rhs_rows: weights.rows(),
                rhs_cols: weights.cols(),
            });
        }
        if biases.shape() != (1, self.output_size) {
            return Err(Error::ShapeMismatch {
                op: "set_parameters biases",
                lhs_rows: 1,
                lhs_cols: self.output_size,
                rhs_rows: biases.rows(),
                rhs_cols: biases.cols(),
            });
        }
        self.weights = weights;
        self.biases = biases;
        Ok(())
    }
}

impl Layer for DenseLayer {
    fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        if input.cols() != self.input_size {
            return Err(Error::ShapeMismatch {
                op: "dense forward",
                lhs_rows: input.rows(),
                lhs_cols: input.cols(),
                rhs_rows: self.input_size,
                rhs_cols: self.output_size,
            });
        }
        let output = input.dot(&self.weights)?.add(&self.biases)?;
        output.validate_finite("dense forward output")?;
        self.input = Some(input.clone());
        Ok(output)
    }

    fn backward(&mut self, upstream: &Matrix, lr: f64, momentum: f64) -> Result<Matrix> {
        let input = self.input.as_ref().ok_or_else(|| {
            Error::InvalidConfiguration(format!(
                "{}: backward called before forward",
                self.label
            ))
        })?;

        let input_gradient = upstream.dot(&self.weights.t())?;
        let weight_gradient = input.t().dot(upstream)?;
        let bias_gradient = upstream;
        input_gradient.validate_finite("dense backward gradient")?;

        if momentum == 0.0 {
            self.weights = self.weights.sub(&weight_gradient.mul_scalar(lr))?;
            self.biases = self.biases.sub(&bias_gradient.mul_scalar(lr))?;
        } else {
            self.velocity_weights = self
                .velocity_weights
                .mul_scalar(momentum)
                .sub(&weight_gradient.mul_scalar(lr))?;
            self.velocity_biases = self
                .velocity_biases
                .mul_scalar(momentum)
                .sub(&bias_gradient.mul_scalar(lr))?;
            self.weights = self.weights.add(&self.velocity_weights)?;
            self.biases = self.biases.add(&self.velocity_biases)?;
        }

        Ok(input_gradient)
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn set_label(&mut self, label: String) {
        self.label = label;
    }

    fn parameter_count(&self) -> usize {
        self.input_size * self.output_size + self.output_size
    }
}
