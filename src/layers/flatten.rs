//! Flatten layer
//!
//! Reshapes an R x C input into a single 1 x (R*C) row so that
//! grid-shaped data (e.g. image patches) can feed a dense layer. The
//! backward pass restores the cached shape.

use crate::error::{Error, Result};
use crate::layers::Layer;
use crate::linalg::Matrix;

/// Row-major reshape to 1 x (rows * cols) and back.
pub struct FlattenLayer {
    input_shape: Option<(usize, usize)>,
    label: String,
}

impl FlattenLayer {
    pub fn new() -> Self {
        Self {
            input_shape: None,
            label: String::new(),
        }
    }
}

impl Default for FlattenLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Layer for FlattenLayer {
    fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        self.input_shape = Some(input.shape());
        Ok(input.flatten())
    }

    fn backward(&mut self, upstream: &Matrix, _lr: f64, _momentum: f64) -> Result<Matrix> {
        let (rows, cols) = self.input_shape.ok_or_else(|| {
            Error::InvalidConfiguration(format!(
                "{}: backward called before forward",
                self.label
            ))
        })?;
        upstream.reshape(rows, cols)
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn set_label(&mut self, label: String) {
        self.label = label;
    }
}
