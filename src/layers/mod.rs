//! Layer abstractions
//!
//! This module provides the Layer trait and the three layer types the
//! engine composes: dense, activation, and flatten.

mod r#trait;
pub mod activation;
pub mod dense;
pub mod flatten;

// Re-export the Layer trait for convenience
pub use activation::ActivationLayer;
pub use dense::DenseLayer;
pub use flatten::FlattenLayer;
pub use r#trait::Layer;
