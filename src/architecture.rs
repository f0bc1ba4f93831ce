//! Architecture configuration
//!
//! Defines network topologies via JSON files so architectures can be
//! experimented with without code changes. Different layer types require
//! different fields:
//!
//! - **dense**: requires `input_size` and `output_size`
//! - **activation**: requires `activation` (a registry name), with optional
//!   `threshold` (binary_step) and `alpha` (leaky_relu)
//! - **flatten**: no parameters
//!
//! # Example
//!
//! ```json
//! {
//!   "layers": [
//!     { "layer_type": "dense", "input_size": 2, "output_size": 9 },
//!     { "layer_type": "activation", "activation": "tanh" },
//!     { "layer_type": "dense", "input_size": 9, "output_size": 1 },
//!     { "layer_type": "activation", "activation": "tanh" }
//!   ]
//! }
//! ```

use crate::activations::{self, ActivationParams};
use crate::error::{Error, Result};
use crate::layers::{ActivationLayer, DenseLayer, FlattenLayer, Layer};
use crate::utils::SimpleRng;
use serde::Deserialize;
use std::fs;

/// Configuration for a single layer.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerConfig {
    /// Type of layer: "dense", "activation", or "flatten".
    pub layer_type: String,

    // Dense layer parameters
    /// Input size for a dense layer.
    pub input_size: Option<usize>,
    /// Output size for a dense layer.
    pub output_size: Option<usize>,

    // Activation layer parameters
    /// Activation registry name for an activation layer.
    pub activation: Option<String>,
    /// Threshold for the binary_step activation (default 0.0).
    pub threshold: Option<f64>,
    /// Slope for the leaky_relu activation (default 0.01).
    pub alpha: Option<f64>,
}

/// Configuration for the entire network topology.
///
/// Layers are applied in the order they appear.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchitectureConfig {
    /// Sequence of layer configurations defining the network structure.
    pub layers: Vec<LayerConfig>,
}

/// Load an architecture configuration from a JSON file.
pub fn load_architecture(path: &str) -> Result<ArchitectureConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::InvalidConfiguration(format!("cannot read '{path}': {e}")))?;
    let config: ArchitectureConfig = serde_json::from_str(&contents)
        .map_err(|e| Error::InvalidConfiguration(format!("invalid JSON in '{path}': {e}")))?;
    validate_architecture(&config)?;
    Ok(config)
}

/// Validate an architecture configuration.
///
/// Checks that the architecture is non-empty, each layer has the fields
/// its type requires, and consecutive dense layers chain (output size of
/// one matches input size of the next, ignoring size-preserving layers
/// in between).
pub fn validate_architecture(config: &ArchitectureConfig) -> Result<()> {
    if config.layers.is_empty() {
        return Err(Error::InvalidConfiguration(
            "architecture must have at least one layer".to_string(),
        ));
    }

    for (i, layer) in config.layers.iter().enumerate() {
        validate_layer(layer, i)?;
    }

    // Dense-to-dense chaining. Activation layers preserve size; flatten
    // preserves element count, which a dense layer consumes as width.
    let mut previous_output: Option<(usize, usize)> = None;
    for (i, layer) in config.layers.iter().enumerate() {
        if layer.layer_type != "dense" {
            continue;
        }
        let input_size = layer.input_size.unwrap_or(0);
        if let Some((j, output_size)) = previous_output {
            if output_size != input_size {
                return Err(Error::InvalidConfiguration(format!(
                    "layer connection mismatch: layer {j} output size ({output_size}) \
                     does not match layer {i} input size ({input_size})"
                )));
            }
        }
        previous_output = Some((i, layer.output_size.unwrap_or(0)));
    }

    Ok(())
}

fn validate_layer(layer: &LayerConfig, index: usize) -> Result<()> {
    match layer.layer_type.as_str() {
        "dense" => {
            let input_size = layer.input_size.ok_or_else(|| {
                Error::InvalidConfiguration(format!(
                    "layer {index}: dense layer requires 'input_size'"
                ))
            })?;
            let output_size = layer.output_size.ok_or_else(|| {
                Error::InvalidConfiguration(format!(
                    "layer {index}: dense layer requires 'output_size'"
                ))
            })?;
            if input_size == 0 || output_size == 0 {
                return Err(Error::InvalidConfiguration(format!(
                    "layer {index}: dense sizes must be greater than 0"
                )));
            }
        }
        "activation" => {
            let name = layer.activation.as_deref().ok_or_else(|| {
                Error::InvalidConfiguration(format!(
                    "layer {index}: activation layer requires 'activation'"
                ))
            })?;
            // Resolve through the registry so unknown names fail at load time.
            activations::from_name(
                name,
                &ActivationParams {
                    threshold: layer.threshold,
                    alpha: layer.alpha,
                },
            )?;
            if let Some(alpha) = layer.alpha {
                if alpha < 0.0 {
                    return Err(Error::InvalidConfiguration(format!(
                        "layer {index}: alpha must be non-negative"
                    )));
                }
            }
        }
        "flatten" => {}
        other => {
            return Err(Error::InvalidConfiguration(format!(
                "layer {index}: invalid layer type '{other}'. \
                 Must be one of: dense, activation, flatten"
            )));
        }
    }
    Ok(())
}

/// Build the layer stack described by an architecture configuration.
///
/// Each layer is constructed in order; dense layers draw their initial
/// parameters from `rng`.
pub fn build_model(
    config: &ArchitectureConfig,
    rng: &mut SimpleRng,
) -> Result<Vec<Box<dyn Layer>>> {
    validate_architecture(config)?;

    let mut layers: Vec<Box<dyn Layer>> = Vec::with_capacity(config.layers.len());
    for layer_config in &config.layers {
        match layer_config.layer_type.as_str() {
            "dense" => {
                // Validated above, so the sizes are present.
                let input_size = layer_config.input_size.unwrap_or(0);
                let output_size = layer_config.output_size.unwrap_or(0);
                layers.push(Box::new(DenseLayer::new(input_size, output_size, rng)));
            }
            "activation" => {
                let name = layer_config.activation.as_deref().unwrap_or("linear");
                let activation = activations::from_name(
                    name,
                    &ActivationParams {
                        threshold: layer_config.threshold,
                        alpha: layer_config.alpha,
                    },
                )?;
                layers.push(Box::new(ActivationLayer::new(activation)));
            }
            "flatten" => layers.push(Box::new(FlattenLayer::new())),
            other => {
                return Err(Error::InvalidConfiguration(format!(
                    "invalid layer type '{other}'"
                )));
            }
        }
    }

    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense(input: usize, output: usize) -> LayerConfig {
        LayerConfig {
            layer_type: "dense".to_string(),
            input_size: Some(input),
            output_size: Some(output),
            activation: None,
            threshold: None,
            alpha: None,
        }
    }

    fn activation(name: &str) -> LayerConfig {
        LayerConfig {
            layer_type: "activation".to_string(),
            input_size: None,
            output_size: None,
            activation: Some(name.to_string()),
            threshold: None,
            alpha: None,
        }
    }

    #[test]
    fn test_validate_valid_architecture() {
        let config = ArchitectureConfig {
            layers: vec![dense(2, 9), activation("tanh"), dense(9, 1)],
        };
        assert!(validate_architecture(&config).is_ok());
    }

    #[test]
    fn test_validate_empty_architecture() {
        let config = ArchitectureConfig { layers: vec![] };
        assert!(validate_architecture(&config).is_err());
    }

    #[test]
    fn test_validate_connection_mismatch() {
        let config = ArchitectureConfig {
            layers: vec![dense(2, 9), activation("tanh"), dense(8, 1)],
        };
        let err = validate_architecture(&config).unwrap_err();
        assert!(err.to_string().contains("connection mismatch"));
    }

    #[test]
    fn test_validate_missing_dense_fields() {
        let mut layer = dense(2, 9);
        layer.output_size = None;
        let config = ArchitectureConfig {
            layers: vec![layer],
        };
        assert!(validate_architecture(&config).is_err());
    }

    #[test]
    fn test_validate_unknown_activation() {
        let config = ArchitectureConfig {
            layers: vec![activation("gelu")],
        };
        assert!(validate_architecture(&config).is_err());
    }

    #[test]
    fn test_build_model() {
        let config = ArchitectureConfig {
            layers: vec![dense(2, 9), activation("tanh"), dense(9, 1)],
        };
        let mut rng = SimpleRng::new(42);
        let layers = build_model(&config, &mut rng).unwrap();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0].parameter_count(), 2 * 9 + 9);
        assert_eq!(layers[1].activation_name(), Some("tanh"));
    }

    #[test]
    fn test_build_model_invalid_layer_type() {
        let config = ArchitectureConfig {
            layers: vec![LayerConfig {
                layer_type: "conv2d".to_string(),
                input_size: None,
                output_size: None,
                activation: None,
                threshold: None,
                alpha: None,
            }],
        };
        let mut rng = SimpleRng::new(42);
        assert!(build_model(&config, &mut rng).is_err());
    }
}
