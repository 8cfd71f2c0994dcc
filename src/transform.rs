//! # Preprocessing transforms
//!
//! Outcome data is often modelled on a transformed scale: log first, then
//! standardized. A [`Transform`] records those stages in the order they were
//! applied. Inversion walks them backwards, so a `[Log, Affine]` pipeline is
//! undone by the inverse affine map followed by `exp`. Swapping those two steps
//! gives different numbers whenever the affine map is not the identity.
//!
//! # Examples
//!
//! ```
//! use posterior_intervals::{AffineScaler, Transform};
//!
//! let scaler = AffineScaler::new(2.0, 0.5).unwrap();
//! let transform = Transform::scaled_log(scaler);
//!
//! let original = [1.0, 10.0, 100.0];
//! let model_space = transform.forward(&original);
//! let restored = transform.invert(&model_space);
//! for (a, b) in original.iter().zip(&restored) {
//!     assert!((a - b).abs() < 1e-9 * a.abs());
//! }
//! ```

use num_traits::ToPrimitive;

use crate::error::SummaryError;

/// Affine rescaling: forward `(x - shift) / scale`, inverse `y * scale + shift`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineScaler {
    shift: f64,
    scale: f64,
}

impl AffineScaler {
    /// # Errors
    ///
    /// Returns `SummaryError::InvalidScale` if `scale` is zero or non-finite.
    pub fn new(shift: f64, scale: f64) -> Result<Self, SummaryError> {
        if !scale.is_finite() || scale == 0.0 {
            return Err(SummaryError::InvalidScale { scale });
        }
        Ok(Self { shift, scale })
    }

    #[must_use]
    pub const fn identity() -> Self {
        Self {
            shift: 0.0,
            scale: 1.0,
        }
    }

    #[must_use]
    pub const fn shift(self) -> f64 {
        self.shift
    }

    #[must_use]
    pub const fn scale(self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn forward(self, value: f64) -> f64 {
        (value - self.shift) / self.scale
    }

    #[must_use]
    pub fn inverse(self, value: f64) -> f64 {
        value.mul_add(self.scale, self.shift)
    }
}

/// Fit a standardizing scaler (mean, population standard deviation).
///
/// Constant data keeps a unit scale so the map stays invertible.
///
/// # Errors
///
/// Returns `SummaryError` if `values` is empty or contains non-finite values.
pub fn fit_standard_scaler(values: &[f64]) -> Result<AffineScaler, SummaryError> {
    if values.is_empty() {
        return Err(SummaryError::InsufficientSamples {
            found: 0,
            minimum: 1,
        });
    }
    if values.iter().any(|value| !value.is_finite()) {
        return Err(SummaryError::NonFiniteSamples);
    }

    let n = values.len().to_f64().unwrap_or(f64::MAX);
    let mean = values.iter().sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|value| {
            let centered = value - mean;
            centered * centered
        })
        .sum::<f64>()
        / n;
    let std_dev = variance.sqrt();
    let scale = if std_dev > f64::EPSILON { std_dev } else { 1.0 };

    AffineScaler::new(mean, scale)
}

/// One invertible preprocessing step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformStage {
    /// Affine rescaling such as standardization.
    Affine(AffineScaler),
    /// Natural logarithm.
    Log,
    /// Box-Cox power transform; `lambda == 0` is the log transform.
    BoxCox { lambda: f64 },
}

impl TransformStage {
    /// # Errors
    ///
    /// Returns `SummaryError::InvalidBoxCoxLambda` if `lambda` is non-finite.
    pub fn box_cox(lambda: f64) -> Result<Self, SummaryError> {
        if lambda.is_finite() {
            Ok(Self::BoxCox { lambda })
        } else {
            Err(SummaryError::InvalidBoxCoxLambda { lambda })
        }
    }

    #[must_use]
    pub fn forward(self, value: f64) -> f64 {
        match self {
            Self::Affine(scaler) => scaler.forward(value),
            Self::Log => value.ln(),
            Self::BoxCox { lambda } if lambda == 0.0 => value.ln(),
            Self::BoxCox { lambda } => (value.powf(lambda) - 1.0) / lambda,
        }
    }

    #[must_use]
    pub fn inverse(self, value: f64) -> f64 {
        match self {
            Self::Affine(scaler) => scaler.inverse(value),
            Self::Log => value.exp(),
            Self::BoxCox { lambda } if lambda == 0.0 => value.exp(),
            Self::BoxCox { lambda } => lambda.mul_add(value, 1.0).powf(lambda.recip()),
        }
    }

    #[must_use]
    pub const fn is_rescale(self) -> bool {
        matches!(self, Self::Affine(_))
    }

    #[must_use]
    pub const fn is_log(self) -> bool {
        matches!(self, Self::Log)
    }

    /// Whether the stage preserves ordering (a negative affine scale reverses it).
    #[must_use]
    pub fn is_increasing(self) -> bool {
        match self {
            Self::Affine(scaler) => scaler.scale > 0.0,
            Self::Log | Self::BoxCox { .. } => true,
        }
    }
}

/// Preprocessing stages in the order they were applied to the data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transform {
    stages: Vec<TransformStage>,
}

impl Transform {
    #[must_use]
    pub const fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage applied after all existing ones.
    #[must_use]
    pub fn then(mut self, stage: TransformStage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Rescaling only.
    #[must_use]
    pub fn scaled(scaler: AffineScaler) -> Self {
        Self::new().then(TransformStage::Affine(scaler))
    }

    /// Log, then rescaling: the usual pipeline for positive, right-skewed outcomes.
    #[must_use]
    pub fn scaled_log(scaler: AffineScaler) -> Self {
        Self::new()
            .then(TransformStage::Log)
            .then(TransformStage::Affine(scaler))
    }

    #[must_use]
    pub fn stages(&self) -> &[TransformStage] {
        &self.stages
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    #[must_use]
    pub fn has_log_stage(&self) -> bool {
        self.stages.iter().any(|stage| stage.is_log())
    }

    /// Whether the full pipeline preserves ordering.
    #[must_use]
    pub fn is_increasing(&self) -> bool {
        self.stages
            .iter()
            .filter(|stage| !stage.is_increasing())
            .count()
            % 2
            == 0
    }

    #[must_use]
    pub fn forward_value(&self, value: f64) -> f64 {
        self.stages
            .iter()
            .fold(value, |acc, stage| stage.forward(acc))
    }

    #[must_use]
    pub fn inverse_value(&self, value: f64) -> f64 {
        self.stages
            .iter()
            .rev()
            .fold(value, |acc, stage| stage.inverse(acc))
    }

    #[must_use]
    pub fn forward(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&value| self.forward_value(value)).collect()
    }

    /// Map model-space values back to original units.
    #[must_use]
    pub fn invert(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&value| self.inverse_value(value)).collect()
    }

    /// Undo only the rescaling stages, leaving any log stage in place.
    #[must_use]
    pub fn inverse_rescale(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .map(|&value| {
                self.stages
                    .iter()
                    .rev()
                    .filter(|stage| stage.is_rescale())
                    .fold(value, |acc, stage| stage.inverse(acc))
            })
            .collect()
    }
}
