//! Training configuration
//!
//! Parses training hyperparameters from JSON files so runs can be tuned
//! without code changes.
//!
//! # Example
//!
//! ```json
//! {
//!   "learning_rate": 0.1,
//!   "epochs": 300,
//!   "momentum": 0.9,
//!   "loss": "mse",
//!   "error_policy": "abort",
//!   "seed": 42
//! }
//! ```

use crate::error::{Error, Result};
use crate::losses;
use crate::network::{ErrorPolicy, TrainOptions};
use crate::utils::SimpleRng;
use serde::Deserialize;
use std::fs;

/// Hyperparameters for a training run.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    /// Gradient-descent step size (positive).
    pub learning_rate: f64,

    /// Number of passes over the training set (positive).
    pub epochs: usize,

    /// Momentum coefficient in [0, 1). Omitted means no momentum.
    pub momentum: Option<f64>,

    /// Loss name: "mse", "crossentropy", "binarycrossentropy", or
    /// "softmaxcrossentropy". Omitted means "mse".
    pub loss: Option<String>,

    /// "abort" (default) or "skip" on sample failure.
    pub error_policy: Option<String>,

    /// RNG seed for parameter initialization. Omitted means seed from time.
    pub seed: Option<u64>,
}

impl TrainingConfig {
    /// The loss name, defaulting to "mse".
    pub fn loss_name(&self) -> &str {
        self.loss.as_deref().unwrap_or("mse")
    }

    /// Convert into validated [`TrainOptions`].
    pub fn train_options(&self) -> Result<TrainOptions> {
        let policy = match self.error_policy.as_deref() {
            None | Some("abort") => ErrorPolicy::Abort,
            Some("skip") => ErrorPolicy::Skip,
            Some(other) => {
                return Err(Error::InvalidConfiguration(format!(
                    "unknown error_policy '{other}'. Must be 'abort' or 'skip'"
                )))
            }
        };
        Ok(TrainOptions::new(self.learning_rate, self.epochs)
            .with_momentum(self.momentum.unwrap_or(0.0))
            .with_error_policy(policy))
    }

    /// RNG for parameter initialization: deterministic when `seed` is
    /// present, otherwise seeded from the clock.
    pub fn rng(&self) -> SimpleRng {
        match self.seed {
            Some(seed) => SimpleRng::new(seed),
            None => {
                let mut rng = SimpleRng::new(0);
                rng.reseed_from_time();
                rng
            }
        }
    }
}

/// Load a training configuration from a JSON file.
pub fn load_config(path: &str) -> Result<TrainingConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::InvalidConfiguration(format!("cannot read '{path}': {e}")))?;
    let config: TrainingConfig = serde_json::from_str(&contents)
        .map_err(|e| Error::InvalidConfiguration(format!("invalid JSON in '{path}': {e}")))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &TrainingConfig) -> Result<()> {
    if !(config.learning_rate > 0.0 && config.learning_rate.is_finite()) {
        return Err(Error::InvalidConfiguration(format!(
            "learning_rate must be positive, got {}",
            config.learning_rate
        )));
    }
    if config.epochs == 0 {
        return Err(Error::InvalidConfiguration(
            "epochs must be positive".to_string(),
        ));
    }
    if let Some(momentum) = config.momentum {
        if !(0.0..1.0).contains(&momentum) {
            return Err(Error::InvalidConfiguration(format!(
                "momentum must be in [0, 1), got {momentum}"
            )));
        }
    }
    // Surfaces unknown loss names at load time instead of first use.
    losses::from_name(config.loss_name())?;
    config.train_options()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> TrainingConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_minimal_config_defaults() {
        let config = parse(r#"{"learning_rate": 0.1, "epochs": 10}"#);
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.loss_name(), "mse");
        let options = config.train_options().unwrap();
        assert_eq!(options.momentum, 0.0);
        assert_eq!(options.error_policy, ErrorPolicy::Abort);
    }

    #[test]
    fn test_rejects_non_positive_learning_rate() {
        let config = parse(r#"{"learning_rate": 0.0, "epochs": 10}"#);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_unknown_loss() {
        let config = parse(r#"{"learning_rate": 0.1, "epochs": 10, "loss": "hinge"}"#);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_momentum_out_of_range() {
        let config = parse(r#"{"learning_rate": 0.1, "epochs": 10, "momentum": 1.0}"#);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rng_is_deterministic_with_seed() {
        let config = parse(r#"{"learning_rate": 0.1, "epochs": 10, "seed": 42}"#);
        let mut a = config.rng();
        let mut b = config.rng();
        for _ in 0..100 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn test_rng_without_seed_draws_from_clock() {
        let config = parse(r#"{"learning_rate": 0.1, "epochs": 10}"#);
        let mut rng = config.rng();
        for _ in 0..100 {
            assert!((0.0..1.0).contains(&rng.next_f64()));
        }
    }

    #[test]
    fn test_skip_policy_parses() {
        let config =
            parse(r#"{"learning_rate": 0.1, "epochs": 10, "error_policy": "skip"}"#);
        let options = config.train_options().unwrap();
        assert_eq!(options.error_policy, ErrorPolicy::Skip);
    }
}
