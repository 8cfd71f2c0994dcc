//! Property-based checks of the interval estimator and transform reversal.

use approx::assert_relative_eq;
use posterior_intervals::{AffineScaler, Transform, TransformStage, hdi, interval_span};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

fn samples_strategy() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(-100.0f64..100.0, 2..200)
}

fn sample_standard_normal(rng: &mut StdRng) -> f64 {
    let u1 = (1.0_f64 - rng.random::<f64>()).max(f64::MIN_POSITIVE);
    let u2 = rng.random::<f64>();
    (-2.0_f64 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn width_grows_with_credible_mass(
        samples in samples_strategy(),
        a in 0.01f64..0.99,
        b in 0.01f64..0.99,
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let narrow = hdi(&samples, low).expect("valid hdi");
        let wide = hdi(&samples, high).expect("valid hdi");
        prop_assert!(wide.width() >= narrow.width());
    }

    #[test]
    fn interval_is_ordered_and_covers_the_mass(
        samples in samples_strategy(),
        ci in 0.01f64..0.99,
    ) {
        let interval = hdi(&samples, ci).expect("valid hdi");
        prop_assert!(interval.lower <= interval.upper);

        let span = interval_span(ci, samples.len()).expect("valid span");
        let inside = samples.iter().filter(|value| interval.contains(**value)).count();
        prop_assert!(inside > span);
    }

    #[test]
    fn interval_endpoints_are_samples(samples in samples_strategy(), ci in 0.01f64..0.99) {
        let interval = hdi(&samples, ci).expect("valid hdi");
        prop_assert!(samples.contains(&interval.lower));
        prop_assert!(samples.contains(&interval.upper));
    }

    #[test]
    fn scaled_log_round_trips(
        values in proptest::collection::vec(0.01f64..1_000.0, 1..32),
        shift in -5.0f64..5.0,
        scale in 0.1f64..10.0,
    ) {
        let transform = Transform::scaled_log(AffineScaler::new(shift, scale).expect("valid scaler"));
        let restored = transform.invert(&transform.forward(&values));
        for (value, back) in values.iter().zip(&restored) {
            prop_assert!((value - back).abs() <= 1e-9 * value.abs());
        }
    }
}

#[test]
fn gaussian_interval_is_centred_on_the_mean() {
    let mut rng = StdRng::seed_from_u64(99);
    let samples: Vec<f64> = (0..4_000)
        .map(|_| 2.0f64.mul_add(sample_standard_normal(&mut rng), 10.0))
        .collect();
    let mean = samples.iter().sum::<f64>() / 4_000.0;

    let interval = hdi(&samples, 0.89).expect("valid hdi");
    assert!((interval.midpoint() - mean).abs() < 0.2);
}

#[test]
fn vanishing_mass_selects_one_sample() {
    let samples = [3.0, 1.0, 4.0, 1.5, 9.0, 2.6];
    let interval = hdi(&samples, 1.0e-6).expect("valid hdi");
    assert_relative_eq!(interval.width(), 0.0);
    assert!(samples.contains(&interval.lower));
}

#[test]
fn near_full_mass_spans_the_sample_range() {
    let samples: Vec<f64> = (0..100)
        .map(|i| f64::from(i).mul_add(0.5, -7.0))
        .collect();
    let interval = hdi(&samples, 0.999).expect("valid hdi");
    assert_relative_eq!(interval.lower, -7.0);
    assert_relative_eq!(interval.upper, 42.5);
}

#[test]
fn rescale_must_precede_exponentiation() {
    let scaler = AffineScaler::new(4.0, 3.0).expect("valid scaler");
    let correct = Transform::scaled_log(scaler);
    let swapped = Transform::new()
        .then(TransformStage::Affine(scaler))
        .then(TransformStage::Log);

    let original = [2.0, 50.0, 400.0];
    let model_space = correct.forward(&original);
    let restored = correct.invert(&model_space);
    let misordered = swapped.invert(&model_space);
    for ((value, good), bad) in original.iter().zip(&restored).zip(&misordered) {
        assert_relative_eq!(*good, *value, max_relative = 1e-12);
        assert!((bad - value).abs() > 1e-3 * value);
    }
}
