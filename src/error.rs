//! Error types shared by the summary pipeline.

use thiserror::Error;

/// Coarse classification of [`SummaryError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied an argument the computation cannot accept.
    InvalidArgument,
    /// Too few samples to form an interval.
    InsufficientSamples,
}

/// Errors returned while validating inputs or computing summaries.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SummaryError {
    #[error("credible mass must lie strictly between 0 and 1; got {ci}")]
    InvalidCredibleMass { ci: f64 },
    #[error("variable `{name}` not found in the {group} group")]
    MissingVariable { name: String, group: &'static str },
    #[error("variable `{variable}` is missing the `{dim}` dimension")]
    MissingDimension { variable: String, dim: &'static str },
    #[error("dimension `{dim}` appears more than once")]
    DuplicateDimension { dim: String },
    #[error("shape implies {expected} values but {found} were supplied")]
    ShapeMismatch { expected: usize, found: usize },
    #[error(
        "chain/draw sizes differ: `{mu_var}` has {mu_chains}x{mu_draws}, `{obs_var}` has {obs_chains}x{obs_draws}"
    )]
    ChainDrawMismatch {
        mu_var: String,
        obs_var: String,
        mu_chains: usize,
        mu_draws: usize,
        obs_chains: usize,
        obs_draws: usize,
    },
    #[error("retained shapes differ: `{mu_var}` has {mu_shape:?}, `{obs_var}` has {obs_shape:?}")]
    PositionMismatch {
        mu_var: String,
        obs_var: String,
        mu_shape: Vec<usize>,
        obs_shape: Vec<usize>,
    },
    #[error("credible mass spans {span} samples but only {samples} are available")]
    SpanExceedsSamples { span: usize, samples: usize },
    #[error("at least {minimum} samples are required; found {found}")]
    InsufficientSamples { found: usize, minimum: usize },
    #[error("samples contain non-finite values")]
    NonFiniteSamples,
    #[error("affine scale must be finite and non-zero; got {scale}")]
    InvalidScale { scale: f64 },
    #[error("Box-Cox lambda must be finite; got {lambda}")]
    InvalidBoxCoxLambda { lambda: f64 },
}

impl SummaryError {
    /// Classify the error as an invalid argument or a sample-count shortfall.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientSamples { .. } => ErrorKind::InsufficientSamples,
            _ => ErrorKind::InvalidArgument,
        }
    }
}
