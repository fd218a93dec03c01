use forecast_math::regression::LinearTrend;
use forecast_math::statistics::{pearson_correlation, population_std_dev, sample_std_dev};
use proptest::prelude::*;

proptest! {
    #[test]
    fn trend_recovers_exact_lines(slope in -50.0f64..50.0, intercept in -1e3f64..1e3, n in 3usize..60) {
        let values: Vec<f64> = (0..n).map(|i| slope * i as f64 + intercept).collect();
        let trend = LinearTrend::fit_series(&values).unwrap();

        prop_assert!((trend.slope() - slope).abs() < 1e-6 * (1.0 + slope.abs()));
        prop_assert!(trend.r_squared() > 0.999_999);
    }

    #[test]
    fn correlation_is_bounded(values in prop::collection::vec(-1e4f64..1e4, 3..40)) {
        let index: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
        if let Ok(r) = pearson_correlation(&index, &values) {
            prop_assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&r));
        }
    }

    #[test]
    fn sample_spread_exceeds_population_spread(values in prop::collection::vec(-1e4f64..1e4, 2..40)) {
        let sample = sample_std_dev(&values).unwrap();
        let population = population_std_dev(&values).unwrap();
        prop_assert!(sample + 1e-9 >= population);
    }
}
