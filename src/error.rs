//! Error taxonomy for tensor, layer, and training failures
//!
//! Every fallible operation in the crate returns [`Result`]. Tensor- and
//! layer-level errors abort the current sample's processing and propagate to
//! the caller; the training loop either aborts with full context or, under
//! the skip policy, records the failure as a diagnostic event.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by tensor operations, layers, losses, and training.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Two tensors had incompatible shapes for the attempted operation.
    #[error("shape mismatch in {op}: {lhs_rows}x{lhs_cols} vs {rhs_rows}x{rhs_cols}")]
    ShapeMismatch {
        op: &'static str,
        lhs_rows: usize,
        lhs_cols: usize,
        rhs_rows: usize,
        rhs_cols: usize,
    },

    /// A scalar or elementwise divisor was zero.
    #[error("division by zero in {op}")]
    DivisionByZero { op: &'static str },

    /// An index was outside the tensor's fixed dimensions.
    #[error("index ({row}, {col}) out of bounds for {rows}x{cols} tensor")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Invalid training options, layer/loss pairing, or config file contents.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A NaN or infinite value appeared in a forward or backward tensor.
    #[error("numeric instability (NaN/Inf) in {context}")]
    NumericInstability { context: &'static str },

    /// A failure during training, tagged with the epoch and sample index.
    #[error("training failed at epoch {epoch}, sample {sample}: {source}")]
    Training {
        epoch: usize,
        sample: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap an error with the epoch and sample index it occurred at.
    pub fn in_training(self, epoch: usize, sample: usize) -> Error {
        Error::Training {
            epoch,
            sample,
            source: Box::new(self),
        }
    }
}
