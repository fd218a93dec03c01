use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use sales_forecast::anomaly::detect_anomalies;
use sales_forecast::seasonality::{analyze_seasonality, monthly_variance_ratio};
use sales_forecast::trend::analyze_trend;
use sales_forecast::{Observation, TrendDirection};

fn series(start_offset: u64, revenues: &[f64]) -> Vec<Observation> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + Days::new(start_offset);
    revenues
        .iter()
        .enumerate()
        .map(|(i, &r)| Observation::new(start + Days::new(i as u64), r))
        .collect()
}

fn spread(values: &[f64]) -> f64 {
    let max = values.iter().cloned().fold(f64::MIN, f64::max);
    let min = values.iter().cloned().fold(f64::MAX, f64::min);
    max - min
}

proptest! {
    #[test]
    fn anomaly_bounds_surround_mean(
        revenues in prop::collection::vec(-1000.0..1000.0f64, 2..80)
    ) {
        prop_assume!(spread(&revenues) > 1e-6);
        let report = detect_anomalies(&series(0, &revenues), 2.0, 3.0);

        prop_assert!(report.lower_bound < report.mean);
        prop_assert!(report.mean < report.upper_bound);
        prop_assert_eq!(report.count, report.anomalies.len());
        for anomaly in &report.anomalies {
            prop_assert!(anomaly.value < report.lower_bound || anomaly.value > report.upper_bound);
        }
    }

    #[test]
    fn constant_series_has_no_anomalies(value in -1e6..1e6f64, len in 1usize..60) {
        let report = detect_anomalies(&series(0, &vec![value; len]), 2.0, 3.0);
        prop_assert_eq!(report.count, 0);
    }

    #[test]
    fn seasonal_strength_is_a_ratio(
        revenues in prop::collection::vec(0.0..5000.0f64, 12..200),
        start_offset in 0u64..365,
    ) {
        let observations = series(start_offset, &revenues);
        let summary = analyze_seasonality(&observations, 12);
        let expected = monthly_variance_ratio(&observations).map_or(0.0, |r| r.clamp(0.0, 1.0));
        prop_assert_eq!(summary.seasonal_strength, expected);
        prop_assert!((1..=12).contains(&summary.peak_month));
    }

    #[test]
    fn steady_growth_is_confidently_increasing(
        steps in prop::collection::vec(1.0..2.0f64, 11..60),
        base in 0.0..1000.0f64,
    ) {
        let revenues: Vec<f64> = std::iter::once(base)
            .chain(steps.iter().scan(base, |level, step| {
                *level += step;
                Some(*level)
            }))
            .collect();
        let summary = analyze_trend(&revenues);

        prop_assert_eq!(summary.direction, TrendDirection::Increasing);
        prop_assert!(summary.trend_confidence > 0.9);
    }
}

#[test]
fn uneven_months_push_the_raw_ratio_above_one() {
    // 2023-01-26 onward: six January days and six February days
    let revenues: Vec<f64> = (0..12).map(|i| if i % 2 == 0 { 0.0 } else { 10.0 }).collect();
    let observations = series(25, &revenues);

    let ratio = monthly_variance_ratio(&observations).unwrap();
    assert!((ratio - 1.1).abs() < 1e-12, "ratio {}", ratio);
    assert_eq!(analyze_seasonality(&observations, 12).seasonal_strength, 1.0);
}
