//! Independent demand trend per tracked item

use crate::data::SalesSeries;
use forecast_math::{LinearTrend, TrendDirection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Linear demand trend and short projection for one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemForecast {
    pub direction: TrendDirection,
    pub slope: f64,
    pub trend_strength: f64,
    /// Quantities for the periods after the last observation
    pub forecast: Vec<f64>,
    /// R² of the quantity fit
    pub confidence: f64,
    /// Observations that recorded the item
    pub data_points: usize,
}

/// Fit each item's quantities against series position and project `horizon` periods.
///
/// Items recorded by fewer than two observations get no entry.
pub fn forecast_items(series: SalesSeries<'_>, horizon: usize) -> BTreeMap<String, ItemForecast> {
    let mut forecasts = BTreeMap::new();

    for item in series.item_names() {
        let points = series.item_points(item);
        if points.len() < 2 {
            debug!(item, points = points.len(), "item skipped: not enough data");
            continue;
        }

        let fit = match LinearTrend::fit_points(&points) {
            Ok(fit) => fit,
            Err(e) => {
                debug!(item, error = %e, "item skipped");
                continue;
            }
        };

        forecasts.insert(
            item.to_string(),
            ItemForecast {
                direction: fit.direction(),
                slope: fit.slope(),
                trend_strength: fit.strength(),
                forecast: fit.project(series.len(), horizon),
                confidence: fit.r_squared(),
                data_points: fit.points(),
            },
        );
    }

    forecasts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Observation;
    use approx::assert_relative_eq;
    use chrono::{Days, NaiveDate};

    fn day(offset: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap() + Days::new(offset)
    }

    #[test]
    fn test_item_projection() {
        let observations: Vec<Observation> = (0..5)
            .map(|i| Observation::new(day(i), 100.0).with_item("iron", 2.0 * i as f64 + 1.0))
            .collect();
        let forecasts = forecast_items(SalesSeries::new(&observations), 3);

        let iron = &forecasts["iron"];
        assert_eq!(iron.direction, TrendDirection::Increasing);
        assert_eq!(iron.data_points, 5);
        assert_relative_eq!(iron.slope, 2.0, epsilon = 1e-10);
        assert_relative_eq!(iron.confidence, 1.0, epsilon = 1e-10);
        assert_eq!(iron.forecast.len(), 3);
        assert_relative_eq!(iron.forecast[0], 11.0, epsilon = 1e-10);
        assert_relative_eq!(iron.forecast[2], 15.0, epsilon = 1e-10);
    }

    #[test]
    fn test_sparse_item_uses_series_positions() {
        let observations = vec![
            Observation::new(day(0), 10.0).with_item("battery", 4.0),
            Observation::new(day(1), 10.0),
            Observation::new(day(2), 10.0),
            Observation::new(day(3), 10.0).with_item("battery", 1.0),
        ];
        let forecasts = forecast_items(SalesSeries::new(&observations), 2);

        let battery = &forecasts["battery"];
        assert_eq!(battery.direction, TrendDirection::Decreasing);
        assert_relative_eq!(battery.slope, -1.0, epsilon = 1e-10);
        // Projection starts at position 4
        assert_relative_eq!(battery.forecast[0], 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_single_point_items_are_skipped() {
        let observations = vec![
            Observation::new(day(0), 10.0).with_item("iron", 1.0),
            Observation::new(day(1), 12.0)
                .with_item("iron", 2.0)
                .with_item("aluminum", 9.0),
        ];
        let forecasts = forecast_items(SalesSeries::new(&observations), 7);

        assert!(forecasts.contains_key("iron"));
        assert!(!forecasts.contains_key("aluminum"));
    }
}
