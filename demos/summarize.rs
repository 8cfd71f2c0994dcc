use posterior_intervals::{
    Draws, PosteriorBundle, SummaryOptions, Transform, error_bars, fit_standard_scaler,
    predictive_coverage, render_summary_table, summarize,
};

const CHAINS: usize = 4;
const DRAWS: usize = 250;
const PERIODS: usize = 8;

fn main() {
    // Positive, growing series modelled on a standardized log scale.
    let observed: Vec<f64> = (0..PERIODS)
        .map(|t| 20.0 * (0.15 * idx_to_f64(t)).exp())
        .collect();
    let log_observed: Vec<f64> = observed.iter().map(|value| value.ln()).collect();
    let scaler = fit_standard_scaler(&log_observed).expect("scaler");
    let transform = Transform::scaled_log(scaler);
    let model_space = transform.forward(&observed);

    let mu = Draws::from_fn(
        "mu",
        [("chain", CHAINS), ("draw", DRAWS), ("time", PERIODS)],
        |i| model_space[i[2]] + 0.05 * wobble(i[0] * DRAWS + i[1], i[2]),
    )
    .expect("mu draws");
    let obs = Draws::from_fn(
        "obs",
        [("chain", CHAINS), ("draw", DRAWS), ("time", PERIODS)],
        |i| model_space[i[2]] + 0.4 * wobble(i[0] * DRAWS + i[1], i[2] + 17),
    )
    .expect("obs draws");

    let bundle = PosteriorBundle::new()
        .with_posterior(mu)
        .with_posterior_predictive(obs);
    let summary =
        summarize(&bundle, &SummaryOptions::default(), Some(&transform)).expect("summary");

    println!("{}", render_summary_table(&summary, 2));
    let coverage = predictive_coverage(&summary, &observed).expect("coverage");
    println!("observed inside predictive band: {:.0}%", coverage * 100.0);
    let widest = error_bars(&summary)
        .iter()
        .map(|bar| bar.below + bar.above)
        .fold(0.0, f64::max);
    println!("widest predictive error bar: {widest:.2}");
}

/// Deterministic pseudo-noise in `[-1, 1]`.
fn wobble(sample: usize, position: usize) -> f64 {
    let phase = idx_to_f64(sample).mul_add(0.618_033_988_75, idx_to_f64(position) * 0.318_309_886);
    2.0f64.mul_add(phase.fract(), -1.0)
}

fn idx_to_f64(idx: usize) -> f64 {
    f64::from(u32::try_from(idx).unwrap_or(u32::MAX))
}
