//! Feedforward Neural-Network Engine
//!
//! This library provides a small CPU-only neural-network computation
//! engine: tensor primitives, differentiable activation and loss
//! functions, composable layers with hand-derived backpropagation, and a
//! network orchestrator for training, prediction, and evaluation.
//!
//! # Modules
//!
//! - `linalg`: Vector and Matrix primitives
//! - `activations`: Activation trait and implementations
//! - `losses`: Loss trait and implementations
//! - `layers`: Layer trait and implementations (Dense, Activation, Flatten)
//! - `network`: FeedForwardNetwork training/evaluation orchestrator
//! - `config`: Training hyperparameter configuration
//! - `architecture`: JSON-driven topology configuration and model building
//! - `utils`: Shared utilities (seedable RNG)
//!
//! # Example
//!
//! ```
//! use feedforward::activations::Tanh;
//! use feedforward::layers::{ActivationLayer, DenseLayer};
//! use feedforward::linalg::Matrix;
//! use feedforward::network::{FeedForwardNetwork, TrainOptions};
//! use feedforward::utils::SimpleRng;
//!
//! let mut rng = SimpleRng::new(42);
//! let mut net = FeedForwardNetwork::new();
//! net.add(Box::new(DenseLayer::new(2, 9, &mut rng)));
//! net.add(Box::new(ActivationLayer::new(Box::new(Tanh))));
//! net.add(Box::new(DenseLayer::new(9, 1, &mut rng)));
//! net.add(Box::new(ActivationLayer::new(Box::new(Tanh))));
//!
//! let x: Vec<Matrix> = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]
//!     .iter()
//!     .map(|row| Matrix::from_rows(&[row.to_vec()]).unwrap())
//!     .collect();
//! let y: Vec<Matrix> = [0.0, 1.0, 1.0, 0.0]
//!     .iter()
//!     .map(|&label| Matrix::from_rows(&[vec![label]]).unwrap())
//!     .collect();
//!
//! let report = net.fit(&x, &y, &TrainOptions::new(0.1, 50)).unwrap();
//! assert_eq!(report.epoch_losses.len(), 50);
//! ```

pub mod activations;
pub mod architecture;
pub mod config;
pub mod error;
pub mod layers;
pub mod linalg;
pub mod losses;
pub mod network;
pub mod utils;

pub use error::{Error, Result};
