//! # Posterior interval summaries
//!
//! Reduces sampler output for a latent mean variable and a posterior-predictive
//! variable to a point estimate and highest-density bands per position,
//! optionally mapped back to the units the data was recorded in.

use log::debug;
use num_traits::ToPrimitive;

use crate::draws::{Dimension, Draws, PosteriorBundle};
use crate::error::SummaryError;
use crate::hdi::{HdiBounds, Interval, hdi_columns, interval_span, validate_credible_mass};
use crate::transform::Transform;

/// Which variables to summarize and at what credible mass.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryOptions {
    /// Probability mass each interval must contain, in `(0, 1)`.
    pub ci: f64,
    /// Posterior variable holding the latent expected value.
    pub mu_var: String,
    /// Posterior-predictive variable holding simulated observations.
    pub obs_var: String,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            ci: 0.89,
            mu_var: "mu".to_string(),
            obs_var: "obs".to_string(),
        }
    }
}

impl SummaryOptions {
    #[must_use]
    pub fn with_ci(mut self, ci: f64) -> Self {
        self.ci = ci;
        self
    }

    #[must_use]
    pub fn with_mu_var(mut self, mu_var: impl Into<String>) -> Self {
        self.mu_var = mu_var.into();
        self
    }

    #[must_use]
    pub fn with_obs_var(mut self, obs_var: impl Into<String>) -> Self {
        self.obs_var = obs_var.into();
        self
    }

    /// # Errors
    ///
    /// Returns `SummaryError::InvalidCredibleMass` unless `0 < ci < 1`.
    pub fn validate(&self) -> Result<(), SummaryError> {
        validate_credible_mass(self.ci)
    }
}

/// Mean and interval bands for one `summarize` call, aligned by position.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalSummary {
    pub ci: f64,
    /// Posterior mean of the latent variable.
    pub mean_mu: Vec<f64>,
    /// Highest-density interval of the latent variable.
    pub hdi_mu: HdiBounds,
    /// Highest-density interval of the posterior-predictive variable.
    pub hdi_obs: HdiBounds,
    /// Retained dimensions of the latent variable.
    pub mu_dims: Vec<Dimension>,
    /// Retained dimensions of the posterior-predictive variable.
    pub obs_dims: Vec<Dimension>,
    /// `true` when a transform was reversed.
    pub original_units: bool,
}

impl IntervalSummary {
    #[must_use]
    pub const fn n_positions(&self) -> usize {
        self.mean_mu.len()
    }
}

/// Summarize the variables named in `options`, reading the latent variable
/// from the posterior group and the simulated observations from the
/// posterior-predictive group.
///
/// # Errors
///
/// Returns `SummaryError` if `ci` is out of range, a variable is missing,
/// the two variables disagree on chain/draw or retained shapes, or the pooled
/// sample count cannot support an interval.
pub fn summarize(
    bundle: &PosteriorBundle,
    options: &SummaryOptions,
    transform: Option<&Transform>,
) -> Result<IntervalSummary, SummaryError> {
    options.validate()?;
    let mu = bundle.posterior(&options.mu_var)?;
    let obs = bundle.posterior_predictive(&options.obs_var)?;
    summarize_draws(mu, obs, options.ci, transform)
}

/// [`summarize`] over two already-resolved variables.
///
/// # Errors
///
/// Same conditions as [`summarize`], apart from variable lookup.
pub fn summarize_draws(
    mu: &Draws,
    obs: &Draws,
    ci: f64,
    transform: Option<&Transform>,
) -> Result<IntervalSummary, SummaryError> {
    validate_credible_mass(ci)?;
    check_alignment(mu, obs)?;
    interval_span(ci, mu.n_samples())?;

    debug!(
        "summarizing `{}` and `{}`: {} chains x {} draws, {} positions, ci = {ci}",
        mu.name(),
        obs.name(),
        mu.n_chains(),
        mu.n_draws(),
        mu.n_positions()
    );

    let mean_mu = posterior_mean(mu);
    let hdi_mu = hdi_columns(&mu.pooled(), ci)?;
    let hdi_obs = hdi_columns(&obs.pooled(), ci)?;

    let (mean_mu, hdi_mu, hdi_obs) = match transform {
        Some(transform) => {
            debug!(
                "reversing {} preprocessing stage(s)",
                transform.stages().len()
            );
            (
                transform.invert(&mean_mu),
                restore_bounds(transform, &hdi_mu),
                restore_bounds(transform, &hdi_obs),
            )
        }
        None => (mean_mu, hdi_mu, hdi_obs),
    };

    Ok(IntervalSummary {
        ci,
        mean_mu,
        hdi_mu,
        hdi_obs,
        mu_dims: mu.retained_dims(),
        obs_dims: obs.retained_dims(),
        original_units: transform.is_some(),
    })
}

/// Mean over chains and draws, one value per retained position.
#[must_use]
pub fn posterior_mean(draws: &Draws) -> Vec<f64> {
    let pooled = draws.pooled();
    let n = pooled.nrows().to_f64().unwrap_or(f64::MAX);
    (0..pooled.ncols())
        .map(|col| (0..pooled.nrows()).map(|row| pooled[(row, col)]).sum::<f64>() / n)
        .collect()
}

/// Highest-density interval per retained position.
///
/// # Errors
///
/// See [`crate::hdi::hdi_sorted`].
pub fn hdi_draws(draws: &Draws, ci: f64) -> Result<HdiBounds, SummaryError> {
    hdi_columns(&draws.pooled(), ci)
}

/// Map model-space bounds back to original units.
///
/// Each bound is inverted independently; pairs are re-ordered when the
/// pipeline is decreasing.
#[must_use]
pub fn restore_bounds(transform: &Transform, bounds: &HdiBounds) -> HdiBounds {
    let lower = transform.invert(&bounds.lower);
    let upper = transform.invert(&bounds.upper);
    if transform.is_increasing() {
        return HdiBounds { lower, upper };
    }
    let intervals: Vec<Interval> = lower
        .iter()
        .zip(&upper)
        .map(|(&a, &b)| Interval::ordered(a, b))
        .collect();
    HdiBounds::from_intervals(&intervals)
}

fn check_alignment(mu: &Draws, obs: &Draws) -> Result<(), SummaryError> {
    if mu.n_chains() != obs.n_chains() || mu.n_draws() != obs.n_draws() {
        return Err(SummaryError::ChainDrawMismatch {
            mu_var: mu.name().to_string(),
            obs_var: obs.name().to_string(),
            mu_chains: mu.n_chains(),
            mu_draws: mu.n_draws(),
            obs_chains: obs.n_chains(),
            obs_draws: obs.n_draws(),
        });
    }

    let mu_shape = retained_shape(mu);
    let obs_shape = retained_shape(obs);
    if mu_shape != obs_shape {
        return Err(SummaryError::PositionMismatch {
            mu_var: mu.name().to_string(),
            obs_var: obs.name().to_string(),
            mu_shape,
            obs_shape,
        });
    }
    Ok(())
}

fn retained_shape(draws: &Draws) -> Vec<usize> {
    draws.retained_dims().iter().map(|dim| dim.size).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::transform::AffineScaler;
    use approx::assert_relative_eq;

    fn idx_to_f64(idx: usize) -> f64 {
        f64::from(u32::try_from(idx).unwrap_or(u32::MAX))
    }

    fn ramp_bundle(chains: usize, draws: usize, positions: usize) -> PosteriorBundle {
        let mu = Draws::from_fn(
            "mu",
            [("chain", chains), ("draw", draws), ("time", positions)],
            |i| idx_to_f64(i[2]) + idx_to_f64(i[1]) / idx_to_f64(draws),
        )
        .expect("valid mu");
        let obs = Draws::from_fn(
            "obs",
            [("chain", chains), ("draw", draws), ("obs_id", positions)],
            |i| idx_to_f64(i[2]) + 2.0 * idx_to_f64(i[1]) / idx_to_f64(draws),
        )
        .expect("valid obs");
        PosteriorBundle::new()
            .with_posterior(mu)
            .with_posterior_predictive(obs)
    }

    #[test]
    fn defaults_match_conventional_names() {
        let options = SummaryOptions::default();
        assert_relative_eq!(options.ci, 0.89);
        assert_eq!(options.mu_var, "mu");
        assert_eq!(options.obs_var, "obs");
        assert!(options.validate().is_ok());
        assert!(SummaryOptions::default().with_ci(1.0).validate().is_err());
    }

    #[test]
    fn summary_aligns_positions_across_variables() {
        let bundle = ramp_bundle(2, 10, 3);
        let summary =
            summarize(&bundle, &SummaryOptions::default(), None).expect("summary succeeds");

        assert_eq!(summary.n_positions(), 3);
        assert_eq!(summary.hdi_mu.len(), 3);
        assert_eq!(summary.hdi_obs.len(), 3);
        assert!(!summary.original_units);
        assert_eq!(summary.mu_dims[0].name, "time");
        assert_eq!(summary.obs_dims[0].name, "obs_id");

        for position in 0..3 {
            let offset = idx_to_f64(position);
            assert_relative_eq!(summary.mean_mu[position], offset + 0.45, epsilon = 1e-12);
            let mu = summary.hdi_mu.get(position).expect("interval");
            let obs = summary.hdi_obs.get(position).expect("interval");
            assert!(mu.lower >= offset && mu.upper <= offset + 0.9 + 1e-12);
            assert!(obs.width() > mu.width());
        }
    }

    #[test]
    fn variable_names_are_configurable() {
        let mu = Draws::new("theta", vec![1.0; 8], [("chain", 2), ("draw", 4)]).expect("valid");
        let obs = Draws::new("y_rep", vec![2.0; 8], [("chain", 2), ("draw", 4)]).expect("valid");
        let bundle = PosteriorBundle::new()
            .with_posterior(mu)
            .with_posterior_predictive(obs);
        let options = SummaryOptions::default()
            .with_mu_var("theta")
            .with_obs_var("y_rep");
        let summary = summarize(&bundle, &options, None).expect("summary succeeds");
        assert_eq!(summary.mean_mu, vec![1.0]);

        let err = summarize(&bundle, &SummaryOptions::default(), None)
            .expect_err("default names are absent");
        assert!(matches!(err, SummaryError::MissingVariable { .. }));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn mismatched_chain_counts_are_rejected() {
        let mu = Draws::new("mu", vec![0.0; 8], [("chain", 2), ("draw", 4)]).expect("valid");
        let obs = Draws::new("obs", vec![0.0; 8], [("chain", 4), ("draw", 2)]).expect("valid");
        let err = summarize_draws(&mu, &obs, 0.5, None).expect_err("chain mismatch");
        assert!(matches!(err, SummaryError::ChainDrawMismatch { .. }));
    }

    #[test]
    fn mismatched_retained_shapes_are_rejected() {
        let mu = Draws::new("mu", vec![0.0; 24], [("chain", 1), ("draw", 4), ("a", 2), ("b", 3)])
            .expect("valid");
        let obs = Draws::new("obs", vec![0.0; 24], [("chain", 1), ("draw", 4), ("a", 3), ("b", 2)])
            .expect("valid");
        let err = summarize_draws(&mu, &obs, 0.5, None).expect_err("shape mismatch");
        assert_eq!(
            err,
            SummaryError::PositionMismatch {
                mu_var: "mu".to_string(),
                obs_var: "obs".to_string(),
                mu_shape: vec![2, 3],
                obs_shape: vec![3, 2],
            }
        );
    }

    #[test]
    fn single_sample_is_insufficient() {
        let mu = Draws::new("mu", vec![0.0; 3], [("chain", 1), ("draw", 1), ("t", 3)])
            .expect("valid");
        let obs = mu.clone();
        let err = summarize_draws(&mu, &obs, 0.5, None).expect_err("too few samples");
        assert_eq!(err.kind(), ErrorKind::InsufficientSamples);
    }

    #[test]
    fn invalid_mass_is_reported_before_lookup() {
        let err = summarize(
            &PosteriorBundle::new(),
            &SummaryOptions::default().with_ci(0.0),
            None,
        )
        .expect_err("invalid mass");
        assert!(matches!(err, SummaryError::InvalidCredibleMass { .. }));
    }

    #[test]
    fn transform_reversal_applies_to_all_five_arrays() {
        let bundle = ramp_bundle(2, 10, 2);
        let scaler = AffineScaler::new(0.5, 2.0).expect("valid scaler");
        let transform = Transform::scaled_log(scaler);

        let raw = summarize(&bundle, &SummaryOptions::default(), None).expect("raw summary");
        let restored = summarize(&bundle, &SummaryOptions::default(), Some(&transform))
            .expect("restored summary");
        assert!(restored.original_units);

        let back = |value: f64| value.mul_add(2.0, 0.5).exp();
        for position in 0..2 {
            assert_relative_eq!(
                restored.mean_mu[position],
                back(raw.mean_mu[position]),
                max_relative = 1e-12
            );
            assert_relative_eq!(restored.hdi_mu.lower[position], back(raw.hdi_mu.lower[position]));
            assert_relative_eq!(restored.hdi_mu.upper[position], back(raw.hdi_mu.upper[position]));
            assert_relative_eq!(restored.hdi_obs.lower[position], back(raw.hdi_obs.lower[position]));
            assert_relative_eq!(restored.hdi_obs.upper[position], back(raw.hdi_obs.upper[position]));
        }
    }

    #[test]
    fn decreasing_transform_keeps_bounds_ordered() {
        let flip = AffineScaler::new(0.0, -1.0).expect("valid scaler");
        let bounds = HdiBounds {
            lower: vec![1.0, -3.0],
            upper: vec![2.0, 4.0],
        };
        let restored = restore_bounds(&Transform::scaled(flip), &bounds);
        assert_eq!(restored.lower, vec![-2.0, -4.0]);
        assert_eq!(restored.upper, vec![-1.0, 3.0]);
    }
}
