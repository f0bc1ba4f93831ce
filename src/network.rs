//! Feedforward network orchestrator
//!
//! Composes an ordered list of layers with a selected loss and drives
//! forward inference, backpropagation, the per-sample training loop,
//! prediction, and accuracy evaluation.
//!
//! Processing is strictly sequential: for a given sample, `forward` runs
//! before `backward`, and the parameters mutated by sample i's backward
//! pass are the parameters seen by sample i+1's forward pass. Layers are
//! exclusively owned by their network.

use crate::error::{Error, Result};
use crate::layers::Layer;
use crate::linalg::Matrix;
use crate::losses::{self, Loss, MeanSquaredError};

/// What `fit` does when a sample fails mid-epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Abort the whole run, wrapping the error with epoch/sample context.
    #[default]
    Abort,
    /// Skip the offending sample, recording a diagnostic in the report.
    Skip,
}

/// Training options for [`FeedForwardNetwork::fit`].
#[derive(Debug, Clone, Copy)]
pub struct TrainOptions {
    /// Gradient-descent step size. Must be positive.
    pub learning_rate: f64,
    /// Momentum coefficient in [0, 1). Zero disables momentum.
    pub momentum: f64,
    /// Number of full passes over the training set. Must be positive.
    pub epochs: usize,
    /// Abort-vs-skip behavior on sample failure.
    pub error_policy: ErrorPolicy,
}

impl TrainOptions {
    /// Plain gradient descent without momentum, aborting on failure.
    pub fn new(learning_rate: f64, epochs: usize) -> Self {
        Self {
            learning_rate,
            momentum: 0.0,
            epochs,
            error_policy: ErrorPolicy::Abort,
        }
    }

    /// Set the momentum coefficient.
    pub fn with_momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    /// Set the error policy.
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(Error::InvalidConfiguration(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(Error::InvalidConfiguration(format!(
                "momentum must be in [0, 1), got {}",
                self.momentum
            )));
        }
        if self.epochs == 0 {
            return Err(Error::InvalidConfiguration(
                "epoch count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// A sample skipped under [`ErrorPolicy::Skip`].
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSample {
    pub epoch: usize,
    pub sample: usize,
    pub error: Error,
}

/// Outcome of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    /// Mean loss per epoch, in epoch order. An epoch whose samples were
    /// all skipped records NaN to keep epoch indices aligned.
    pub epoch_losses: Vec<f64>,
    /// Samples skipped under the skip policy, with their errors.
    pub skipped: Vec<SkippedSample>,
}

/// Accuracy plus a bounded sample of (input, target, output) triples.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Fraction of samples matching their target within tolerance.
    pub accuracy: f64,
    /// Up to the requested number of (input, target, output) triples.
    pub samples: Vec<(Matrix, Matrix, Matrix)>,
}

/// An ordered composition of layers plus a selected loss.
pub struct FeedForwardNetwork {
    layers: Vec<Box<dyn Layer>>,
    loss: Box<dyn Loss>,
}

impl FeedForwardNetwork {
    /// Create an empty network with mean squared error selected.
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            loss: Box::new(MeanSquaredError),
        }
    }

    /// Append a layer, labeling it "Layer N" (1-based).
    pub fn add(&mut self, mut layer: Box<dyn Layer>) {
        layer.set_label(format!("Layer {}", self.layers.len() + 1));
        self.layers.push(layer);
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// True if no layers have been added.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Name of the currently selected loss.
    pub fn loss_name(&self) -> &'static str {
        self.loss.name()
    }

    /// Select the active loss.
    ///
    /// A softmax output layer only composes correctly with a
    /// cross-entropy loss, so any other pairing is rejected. Networks that
    /// want the fused fast path should end in a linear layer and select
    /// `softmaxcrossentropy` instead.
    pub fn use_loss(&mut self, loss: Box<dyn Loss>) -> Result<()> {
        let last_activation = self.layers.last().and_then(|l| l.activation_name());
        if last_activation == Some("softmax") && !losses::is_cross_entropy(loss.name()) {
            return Err(Error::InvalidConfiguration(format!(
                "a softmax output layer requires a cross-entropy loss, got '{}'",
                loss.name()
            )));
        }
        self.loss = loss;
        Ok(())
    }

    /// Forward propagation: fold the layers left to right.
    pub fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        let mut output = input.clone();
        for layer in &mut self.layers {
            output = layer.forward(&output)?;
        }
        Ok(output)
    }

    /// Backward propagation: fold the layers right to left, updating each
    /// parameterized layer in place.
    pub fn backward(&mut self, gradient: &Matrix, lr: f64, momentum: f64) -> Result<Matrix> {
        let mut gradient = gradient.clone();
        for layer in self.layers.iter_mut().rev() {
            gradient = layer.backward(&gradient, lr, momentum)?;
        }
        Ok(gradient)
    }

    /// Train on (x, y) sample pairs.
    ///
    /// Each epoch walks the samples in order: forward, loss accumulation,
    /// loss gradient, backward (which mutates parameters). The mean loss
    /// of every epoch is logged and recorded in the report.
    pub fn fit(&mut self, x: &[Matrix], y: &[Matrix], options: &TrainOptions) -> Result<FitReport> {
        options.validate()?;
        if x.len() != y.len() {
            return Err(Error::InvalidConfiguration(format!(
                "sample/label count mismatch: {} inputs vs {} labels",
                x.len(),
                y.len()
            )));
        }
        if x.is_empty() {
            return Err(Error::InvalidConfiguration(
                "training set is empty".to_string(),
            ));
        }

        log::info!("training with {} samples for {} epochs", x.len(), options.epochs);

        let mut report = FitReport {
            epoch_losses: Vec::with_capacity(options.epochs),
            skipped: Vec::new(),
        };

        for epoch in 0..options.epochs {
            let mut epoch_loss = 0.0;
            let mut counted = 0usize;

            for (i, (input, target)) in x.iter().zip(y.iter()).enumerate() {
                match self.train_sample(input, target, options) {
                    Ok(sample_loss) => {
                        epoch_loss += sample_loss;
                        counted += 1;
                    }
                    Err(err) => match options.error_policy {
                        ErrorPolicy::Abort => return Err(err.in_training(epoch, i)),
                        ErrorPolicy::Skip => {
                            log::warn!(
                                "skipping sample {} in epoch {}: {}",
                                i,
                                epoch,
                                err
                            );
                            report.skipped.push(SkippedSample {
                                epoch,
                                sample: i,
                                error: err,
                            });
                        }
                    },
                }
            }

            let mean_loss = if counted > 0 {
                epoch_loss / counted as f64
            } else {
                log::warn!(
                    "epoch {}/{}: every sample was skipped, recording NaN loss",
                    epoch + 1,
                    options.epochs
                );
                f64::NAN
            };
            log::info!(
                "epoch {}/{}: mean loss {}",
                epoch + 1,
                options.epochs,
                mean_loss
            );
            report.epoch_losses.push(mean_loss);
        }

        Ok(report)
    }

    fn train_sample(
        &mut self,
        input: &Matrix,
        target: &Matrix,
        options: &TrainOptions,
    ) -> Result<f64> {
        let output = self.forward(input)?;
        let sample_loss = self.loss.forward(target, &output)?;
        let gradient = self.loss.backward(target, &output)?;
        self.backward(&gradient, options.learning_rate, options.momentum)?;
        Ok(sample_loss)
    }

    /// Forward-only inference over a batch of samples. No parameters are
    /// mutated (layer input caches are refreshed as a side effect).
    pub fn predict(&mut self, x: &[Matrix]) -> Result<Vec<Matrix>> {
        x.iter().map(|input| self.forward(input)).collect()
    }

    /// Fraction of samples whose output matches the target elementwise
    /// within `tolerance`. Tolerance 0 counts exact matches only; a larger
    /// tolerance counts a superset of the exact matches.
    pub fn accuracy(&mut self, x: &[Matrix], y: &[Matrix], tolerance: f64) -> Result<f64> {
        Ok(self.evaluate(x, y, tolerance, 0)?.accuracy)
    }

    /// Accuracy plus up to `sample_limit` (input, target, output) triples
    /// for inspection.
    pub fn evaluate(
        &mut self,
        x: &[Matrix],
        y: &[Matrix],
        tolerance: f64,
        sample_limit: usize,
    ) -> Result<Evaluation> {
        if x.len() != y.len() {
            return Err(Error::InvalidConfiguration(format!(
                "sample/label count mismatch: {} inputs vs {} labels",
                x.len(),
                y.len()
            )));
        }
        if x.is_empty() {
            return Err(Error::InvalidConfiguration(
                "evaluation set is empty".to_string(),
            ));
        }
        if tolerance < 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "tolerance must be non-negative, got {tolerance}"
            )));
        }

        let mut correct = 0usize;
        let mut samples = Vec::new();
        for (input, target) in x.iter().zip(y.iter()) {
            let output = self.forward(input)?;
            if output.is_equal(target, tolerance) {
                correct += 1;
            }
            if samples.len() < sample_limit {
                samples.push((input.clone(), target.clone(), output));
            }
        }

        Ok(Evaluation {
            accuracy: correct as f64 / x.len() as f64,
            samples,
        })
    }
}

impl Default for FeedForwardNetwork {
    fn default() -> Self {
        Self::new()
    }
}
