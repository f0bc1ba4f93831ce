//! Layer trait definition
//!
//! All layer types implement this trait to provide a uniform interface for
//! forward propagation and backpropagation. Layers are stateful: `forward`
//! caches whatever the matching `backward` needs, and parameterized layers
//! mutate their parameters in place during `backward`.

use crate::error::Result;
use crate::linalg::Matrix;

/// Core trait for network layers.
///
/// For a given sample, `forward` must complete before `backward` is invoked
/// for that same sample; the network processes samples strictly
/// sequentially, so each layer only ever holds one cached input.
pub trait Layer {
    /// Forward propagation. Caches the input (or its shape) for the
    /// backward pass and returns the layer output.
    fn forward(&mut self, input: &Matrix) -> Result<Matrix>;

    /// Backward propagation. Consumes the gradient of the loss w.r.t. this
    /// layer's output and returns the gradient w.r.t. its input.
    ///
    /// Parameterized layers additionally apply the gradient-descent update
    /// (`lr`, optionally smoothed by `momentum`) to their parameters as a
    /// side effect.
    fn backward(&mut self, upstream: &Matrix, lr: f64, momentum: f64) -> Result<Matrix>;

    /// Human-readable label assigned by the network ("Layer N").
    fn label(&self) -> &str;

    /// Assign the layer's label.
    fn set_label(&mut self, label: String);

    /// Name of the wrapped activation, if this is an activation layer.
    /// Used by the network to validate loss pairing.
    fn activation_name(&self) -> Option<&'static str> {
        None
    }

    /// Number of trainable parameters in the layer.
    fn parameter_count(&self) -> usize {
        0
    }
}
