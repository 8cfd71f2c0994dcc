//! # Highest-density intervals
//!
//! Shortest fixed-mass intervals over empirical samples. For a credible mass
//! `ci` and `n` sorted samples the interval spans `k = floor(ci * n)` steps:
//! every window `sorted[i]..=sorted[i + k]` is a candidate and the narrowest
//! wins, ties going to the lowest start. Unlike an equal-tailed interval the
//! result follows the bulk of a skewed distribution.

use faer::Mat;
use log::trace;
use num_traits::ToPrimitive;

use crate::error::SummaryError;

/// Minimum pooled samples needed to form an interval.
pub const MIN_SAMPLES: usize = 2;

/// A closed interval with `lower <= upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

/// Interval returned by the highest-density estimator.
pub type HdiInterval = Interval;

impl Interval {
    /// Build an interval from two endpoints in either order.
    #[must_use]
    pub const fn ordered(a: f64, b: f64) -> Self {
        if a <= b {
            Self { lower: a, upper: b }
        } else {
            Self { lower: b, upper: a }
        }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.upper - self.lower
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    #[must_use]
    pub fn midpoint(self) -> f64 {
        0.5f64.mul_add(self.width(), self.lower)
    }
}

/// Per-position interval bounds, aligned column-wise with the position index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HdiBounds {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl HdiBounds {
    #[must_use]
    pub fn from_intervals(intervals: &[Interval]) -> Self {
        Self {
            lower: intervals.iter().map(|interval| interval.lower).collect(),
            upper: intervals.iter().map(|interval| interval.upper).collect(),
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.lower.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<Interval> {
        Some(Interval {
            lower: *self.lower.get(position)?,
            upper: *self.upper.get(position)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Interval> + '_ {
        self.lower
            .iter()
            .zip(&self.upper)
            .map(|(&lower, &upper)| Interval { lower, upper })
    }

    #[must_use]
    pub fn widths(&self) -> Vec<f64> {
        self.iter().map(Interval::width).collect()
    }

    /// Bounds as a `2 x n` matrix: row 0 lower, row 1 upper.
    #[must_use]
    pub fn as_matrix(&self) -> Mat<f64> {
        Mat::from_fn(2, self.len(), |row, col| {
            if row == 0 {
                self.lower[col]
            } else {
                self.upper[col]
            }
        })
    }
}

/// # Errors
///
/// Returns `SummaryError::InvalidCredibleMass` unless `0 < ci < 1`.
pub fn validate_credible_mass(ci: f64) -> Result<(), SummaryError> {
    if ci.is_finite() && ci > 0.0 && ci < 1.0 {
        Ok(())
    } else {
        Err(SummaryError::InvalidCredibleMass { ci })
    }
}

/// Number of sorted-sample steps an interval of mass `ci` spans over `n` samples.
///
/// # Errors
///
/// Returns `SummaryError` if `ci` is out of range, `n` is below
/// [`MIN_SAMPLES`], or the span reaches `n`.
pub fn interval_span(ci: f64, n: usize) -> Result<usize, SummaryError> {
    validate_credible_mass(ci)?;
    if n < MIN_SAMPLES {
        return Err(SummaryError::InsufficientSamples {
            found: n,
            minimum: MIN_SAMPLES,
        });
    }
    let span = (ci * usize_to_f64(n)).floor().to_usize().unwrap_or(usize::MAX);
    if span >= n {
        return Err(SummaryError::SpanExceedsSamples { span, samples: n });
    }
    Ok(span)
}

/// Highest-density interval of unsorted `samples`.
///
/// # Errors
///
/// See [`hdi_sorted`].
pub fn hdi(samples: &[f64], ci: f64) -> Result<HdiInterval, SummaryError> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    hdi_sorted(&sorted, ci)
}

/// Highest-density interval of samples already sorted ascending.
///
/// # Errors
///
/// Returns `SummaryError` if `ci` is out of range, there are too few samples,
/// the span reaches the sample count, or any sample is non-finite.
pub fn hdi_sorted(sorted: &[f64], ci: f64) -> Result<HdiInterval, SummaryError> {
    let span = interval_span(ci, sorted.len())?;
    if sorted.iter().any(|value| !value.is_finite()) {
        return Err(SummaryError::NonFiniteSamples);
    }

    let mut best_start = 0;
    let mut best_width = f64::INFINITY;
    for start in 0..sorted.len() - span {
        let width = sorted[start + span] - sorted[start];
        if width < best_width {
            best_width = width;
            best_start = start;
        }
    }

    Ok(Interval {
        lower: sorted[best_start],
        upper: sorted[best_start + span],
    })
}

/// Highest-density interval of every column of an `n_samples x n_positions`
/// matrix.
///
/// # Errors
///
/// See [`hdi_sorted`]; the first failing column aborts the computation.
pub fn hdi_columns(samples: &Mat<f64>, ci: f64) -> Result<HdiBounds, SummaryError> {
    interval_span(ci, samples.nrows())?;

    let mut column = Vec::with_capacity(samples.nrows());
    let mut lower = Vec::with_capacity(samples.ncols());
    let mut upper = Vec::with_capacity(samples.ncols());
    for col in 0..samples.ncols() {
        column.clear();
        column.extend((0..samples.nrows()).map(|row| samples[(row, col)]));
        column.sort_by(f64::total_cmp);
        let interval = hdi_sorted(&column, ci)?;
        trace!(
            "position {col}: hdi [{:.6}, {:.6}]",
            interval.lower, interval.upper
        );
        lower.push(interval.lower);
        upper.push(interval.upper);
    }

    Ok(HdiBounds { lower, upper })
}

/// Equal-tailed interval at `(1 - ci) / 2` and `(1 + ci) / 2`, using linear
/// interpolation between order statistics.
///
/// # Errors
///
/// Returns `SummaryError` under the same `ci`, sample-count and finiteness
/// rules as [`hdi_sorted`].
pub fn equal_tailed_interval(samples: &[f64], ci: f64) -> Result<Interval, SummaryError> {
    interval_span(ci, samples.len())?;
    if samples.iter().any(|value| !value.is_finite()) {
        return Err(SummaryError::NonFiniteSamples);
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let tail = 0.5 * (1.0 - ci);
    Ok(Interval {
        lower: percentile(&sorted, tail),
        upper: percentile(&sorted, 1.0 - tail),
    })
}

fn percentile(sorted_values: &[f64], probability: f64) -> f64 {
    let last = sorted_values.len() - 1;
    let position = probability.clamp(0.0, 1.0) * usize_to_f64(last);
    let lower = position.floor().to_usize().unwrap_or(0);
    let upper = position.ceil().to_usize().unwrap_or(last).min(last);

    if lower == upper {
        sorted_values[lower]
    } else {
        let weight = position - usize_to_f64(lower);
        (1.0 - weight).mul_add(sorted_values[lower], weight * sorted_values[upper])
    }
}

fn usize_to_f64(value: usize) -> f64 {
    value.to_f64().unwrap_or(f64::MAX)
}
