//! # Reporting views
//!
//! Presentation-neutral accessors over an [`IntervalSummary`]: per-position
//! rows for band plots, error-bar offsets for observed-vs-modelled scatter
//! plots, predictive coverage of observed data, and a text table rendered with
//! `comfy_table`.

use comfy_table::{
    Attribute, Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED,
};
use num_traits::ToPrimitive;

use crate::draws::Dimension;
use crate::error::SummaryError;
use crate::hdi::Interval;
use crate::summary::IntervalSummary;

/// One x-position of a band plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRow {
    pub position: usize,
    pub mean: f64,
    pub mu: Interval,
    pub obs: Interval,
}

/// Asymmetric error-bar lengths around the posterior mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorBar {
    pub below: f64,
    pub above: f64,
}

#[must_use]
pub fn band_rows(summary: &IntervalSummary) -> Vec<BandRow> {
    summary
        .mean_mu
        .iter()
        .zip(summary.hdi_mu.iter())
        .zip(summary.hdi_obs.iter())
        .enumerate()
        .map(|(position, ((&mean, mu), obs))| BandRow {
            position,
            mean,
            mu,
            obs,
        })
        .collect()
}

/// Distances from the mean to the predictive bounds, for scatter plots of
/// modelled against observed values.
#[must_use]
pub fn error_bars(summary: &IntervalSummary) -> Vec<ErrorBar> {
    summary
        .mean_mu
        .iter()
        .zip(summary.hdi_obs.iter())
        .map(|(&mean, obs)| ErrorBar {
            below: mean - obs.lower,
            above: obs.upper - mean,
        })
        .collect()
}

/// Fraction of observed values inside their predictive interval.
///
/// # Errors
///
/// Returns `SummaryError::ShapeMismatch` if `observed` is not aligned with the
/// summary positions.
pub fn predictive_coverage(
    summary: &IntervalSummary,
    observed: &[f64],
) -> Result<f64, SummaryError> {
    if observed.len() != summary.hdi_obs.len() {
        return Err(SummaryError::ShapeMismatch {
            expected: summary.hdi_obs.len(),
            found: observed.len(),
        });
    }
    if observed.is_empty() {
        return Ok(0.0);
    }
    let inside = summary
        .hdi_obs
        .iter()
        .zip(observed)
        .filter(|(interval, value)| interval.contains(**value))
        .count();
    Ok(usize_to_f64(inside) / usize_to_f64(observed.len()))
}

/// Human-readable labels such as `time=3` or `site=1, day=0` for each position.
#[must_use]
pub fn position_labels(dims: &[Dimension], n_positions: usize) -> Vec<String> {
    (0..n_positions)
        .map(|position| {
            if dims.is_empty() {
                return position.to_string();
            }
            let mut rem = position;
            let mut parts = vec![String::new(); dims.len()];
            for (axis, dim) in dims.iter().enumerate().rev() {
                let size = dim.size.max(1);
                parts[axis] = format!("{}={}", dim.name, rem % size);
                rem /= size;
            }
            parts.join(", ")
        })
        .collect()
}

/// Render a summary as a table. Means outside their own latent interval are
/// highlighted.
#[must_use]
pub fn render_summary_table(summary: &IntervalSummary, precision: usize) -> String {
    let percent = summary.ci * 100.0;
    let mu_lower = format!("mu {percent:.0}% lower");
    let mu_upper = format!("mu {percent:.0}% upper");
    let obs_lower = format!("obs {percent:.0}% lower");
    let obs_upper = format!("obs {percent:.0}% upper");
    let mut table = make_table(&[
        "position",
        "mean",
        mu_lower.as_str(),
        mu_upper.as_str(),
        obs_lower.as_str(),
        obs_upper.as_str(),
    ]);

    let labels = position_labels(&summary.mu_dims, summary.n_positions());
    for (row, label) in band_rows(summary).iter().zip(labels) {
        table.add_row(vec![
            Cell::new(label),
            mean_cell(row.mean, row.mu, precision),
            Cell::new(format!("{:.precision$}", row.mu.lower)),
            Cell::new(format!("{:.precision$}", row.mu.upper)),
            Cell::new(format!("{:.precision$}", row.obs.lower)),
            Cell::new(format!("{:.precision$}", row.obs.upper)),
        ]);
    }
    table.to_string()
}

fn make_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| Cell::new(*h)).collect::<Vec<_>>());
    table
}

fn mean_cell(mean: f64, interval: Interval, precision: usize) -> Cell {
    let cell = Cell::new(format!("{mean:.precision$}"));
    if interval.contains(mean) {
        cell
    } else {
        cell.fg(Color::Yellow).add_attribute(Attribute::Bold)
    }
}

fn usize_to_f64(value: usize) -> f64 {
    value.to_f64().unwrap_or(f64::MAX)
}
