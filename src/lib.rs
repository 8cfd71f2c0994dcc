#![forbid(unsafe_code)]

//! # `posterior_intervals`
//!
//! Posterior summaries for sampler output: the mean of a latent expectation
//! variable and highest-density intervals for both that variable and a
//! posterior-predictive observation variable, optionally mapped back through
//! the preprocessing applied to the data before modelling.
//!
//! ```
//! use posterior_intervals::{Draws, PosteriorBundle, SummaryOptions, summarize};
//!
//! let mu = Draws::from_fn("mu", [("chain", 2), ("draw", 50), ("time", 3)], |i| {
//!     i[2] as f64 + (i[1] as f64 - 25.0) / 100.0
//! })
//! .unwrap();
//! let obs = Draws::from_fn("obs", [("chain", 2), ("draw", 50), ("time", 3)], |i| {
//!     i[2] as f64 + (i[1] as f64 - 25.0) / 25.0
//! })
//! .unwrap();
//! let bundle = PosteriorBundle::new()
//!     .with_posterior(mu)
//!     .with_posterior_predictive(obs);
//!
//! let summary = summarize(&bundle, &SummaryOptions::default(), None).unwrap();
//! assert_eq!(summary.n_positions(), 3);
//! assert!(summary.hdi_obs.widths()[0] > summary.hdi_mu.widths()[0]);
//! ```

pub mod draws;
pub mod error;
pub mod hdi;
pub mod report;
pub mod summary;
pub mod transform;

pub use draws::{CHAIN_DIM, DRAW_DIM, Dimension, Draws, PosteriorBundle};
pub use error::{ErrorKind, SummaryError};
pub use hdi::{
    HdiBounds, HdiInterval, Interval, MIN_SAMPLES, equal_tailed_interval, hdi, hdi_columns,
    hdi_sorted, interval_span, validate_credible_mass,
};
pub use report::{
    BandRow, ErrorBar, band_rows, error_bars, position_labels, predictive_coverage,
    render_summary_table,
};
pub use summary::{
    IntervalSummary, SummaryOptions, hdi_draws, posterior_mean, restore_bounds, summarize,
    summarize_draws,
};
pub use transform::{AffineScaler, Transform, TransformStage, fit_standard_scaler};
