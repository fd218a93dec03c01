//! Straight-line growth projection from the average daily revenue

use crate::data::SalesSeries;
use crate::utils::future_dates;
use chrono::NaiveDate;
use forecast_math::statistics::mean;
use serde::{Deserialize, Serialize};

const BASELINE_DAYS: usize = 30;
const CONFIDENCE_FLOOR: f64 = 0.7;
const CONFIDENCE_DECAY: f64 = 0.01;

/// One projected day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselinePoint {
    pub date: NaiveDate,
    pub predicted_revenue: f64,
    pub confidence: f64,
}

/// Thirty-day projection that scales the average revenue by the observed growth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineForecast {
    pub daily_average: f64,
    /// `(last - first) / first` over the whole series
    pub growth_rate: f64,
    pub points: Vec<BaselinePoint>,
    pub total_revenue: f64,
}

/// Baseline projection, or `None` for an empty series
pub fn baseline_forecast(series: SalesSeries<'_>) -> Option<BaselineForecast> {
    let revenues = series.revenues();
    let daily_average = mean(&revenues).ok()?;
    let last_date = series.last_date()?;

    let growth_rate = match (revenues.first(), revenues.last()) {
        (Some(&first), Some(&last)) if revenues.len() > 1 && first > 0.0 => (last - first) / first,
        _ => 0.0,
    };

    let points: Vec<BaselinePoint> = future_dates(last_date, BASELINE_DAYS)
        .into_iter()
        .enumerate()
        .map(|(i, date)| {
            let step = i as f64;
            BaselinePoint {
                date,
                predicted_revenue: daily_average
                    * (1.0 + growth_rate * step / BASELINE_DAYS as f64),
                confidence: (1.0 - step * CONFIDENCE_DECAY).max(CONFIDENCE_FLOOR),
            }
        })
        .collect();

    let total_revenue = points.iter().map(|p| p.predicted_revenue).sum();
    Some(BaselineForecast {
        daily_average,
        growth_rate,
        points,
        total_revenue,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Observation;
    use approx::assert_relative_eq;
    use chrono::Days;

    fn series(revenues: &[f64]) -> Vec<Observation> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        revenues
            .iter()
            .enumerate()
            .map(|(i, &r)| Observation::new(start + Days::new(i as u64), r))
            .collect()
    }

    #[test]
    fn test_growth_projection() {
        let observations = series(&[100.0, 150.0, 200.0]);
        let baseline = baseline_forecast(SalesSeries::new(&observations)).unwrap();

        assert_relative_eq!(baseline.daily_average, 150.0);
        assert_relative_eq!(baseline.growth_rate, 1.0);
        assert_eq!(baseline.points.len(), 30);
        assert_eq!(
            baseline.points[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 4).unwrap()
        );
        assert_relative_eq!(baseline.points[0].predicted_revenue, 150.0);
        assert_relative_eq!(baseline.points[15].predicted_revenue, 225.0);

        assert_relative_eq!(baseline.points[0].confidence, 1.0);
        assert_relative_eq!(baseline.points[10].confidence, 0.9);
        assert_relative_eq!(baseline.points[29].confidence, 0.71, epsilon = 1e-12);

        // 150 * sum(1 + i / 30) for i in 0..30 = 150 * (30 + 14.5)
        assert_relative_eq!(baseline.total_revenue, 6675.0, epsilon = 1e-9);
    }

    #[test]
    fn test_confidence_floor() {
        let baseline = baseline_forecast(SalesSeries::new(&series(&[1.0]))).unwrap();
        assert!(baseline.points.iter().all(|p| p.confidence >= 0.7));
        assert_eq!(baseline.growth_rate, 0.0);
    }

    #[test]
    fn test_non_positive_start_has_no_growth() {
        let baseline = baseline_forecast(SalesSeries::new(&series(&[0.0, 10.0]))).unwrap();
        assert_eq!(baseline.growth_rate, 0.0);
        assert_relative_eq!(baseline.points[29].predicted_revenue, 5.0);
    }

    #[test]
    fn test_empty_series() {
        assert!(baseline_forecast(SalesSeries::new(&[])).is_none());
    }
}
