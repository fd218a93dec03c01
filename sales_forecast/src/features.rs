//! Feature engineering for the revenue models
//!
//! Each observation with enough history becomes one [`FeatureVector`]:
//! calendar fields of its date, the three previous revenues, trailing 3-
//! and 7-period means (including the row itself) and the squared and cubed
//! revenue. Observations without a full window are dropped, never imputed.

use crate::data::Observation;
use crate::utils::future_dates;
use chrono::{Datelike, NaiveDate};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Number of engineered predictors per row
pub const FEATURE_COUNT: usize = 13;

/// Column names in design-matrix order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "day_of_week",
    "month",
    "day",
    "quarter",
    "day_of_year",
    "week_of_year",
    "revenue_lag1",
    "revenue_lag2",
    "revenue_lag3",
    "revenue_ma3",
    "revenue_ma7",
    "revenue_squared",
    "revenue_cubed",
];

const MAX_LAG: usize = 3;
const SHORT_WINDOW: usize = 3;
const LONG_WINDOW: usize = 7;

/// Index of the first observation whose lag and rolling fields are all defined
pub const FIRST_COMPLETE_ROW: usize = if MAX_LAG > LONG_WINDOW - 1 {
    MAX_LAG
} else {
    LONG_WINDOW - 1
};

/// Engineered predictors for one observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Monday = 0
    pub day_of_week: u32,
    pub month: u32,
    pub day: u32,
    pub quarter: u32,
    pub day_of_year: u32,
    /// ISO week number
    pub week_of_year: u32,
    pub revenue_lag1: f64,
    pub revenue_lag2: f64,
    pub revenue_lag3: f64,
    pub revenue_ma3: f64,
    pub revenue_ma7: f64,
    pub revenue_squared: f64,
    pub revenue_cubed: f64,
}

impl FeatureVector {
    fn new(date: NaiveDate, lags: [f64; MAX_LAG], ma3: f64, ma7: f64, revenue: f64) -> Self {
        Self {
            day_of_week: date.weekday().num_days_from_monday(),
            month: date.month(),
            day: date.day(),
            quarter: (date.month() - 1) / 3 + 1,
            day_of_year: date.ordinal(),
            week_of_year: date.iso_week().week(),
            revenue_lag1: lags[0],
            revenue_lag2: lags[1],
            revenue_lag3: lags[2],
            revenue_ma3: ma3,
            revenue_ma7: ma7,
            revenue_squared: revenue.powi(2),
            revenue_cubed: revenue.powi(3),
        }
    }

    /// Values in [`FEATURE_NAMES`] order
    pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
        [
            self.day_of_week as f64,
            self.month as f64,
            self.day as f64,
            self.quarter as f64,
            self.day_of_year as f64,
            self.week_of_year as f64,
            self.revenue_lag1,
            self.revenue_lag2,
            self.revenue_lag3,
            self.revenue_ma3,
            self.revenue_ma7,
            self.revenue_squared,
            self.revenue_cubed,
        ]
    }
}

/// Supervised-learning table: one feature row and target per usable observation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    dates: Vec<NaiveDate>,
    rows: Vec<FeatureVector>,
    targets: Vec<f64>,
}

impl FeatureTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rows(&self) -> &[FeatureVector] {
        &self.rows
    }

    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    /// Rows as an `n x FEATURE_COUNT` matrix
    pub fn design_matrix(&self) -> Array2<f64> {
        design_matrix(&self.rows)
    }

    pub fn target_vector(&self) -> Array1<f64> {
        Array1::from_vec(self.targets.clone())
    }

    /// Design matrix and target restricted to `indices`, in that order
    pub fn select(&self, indices: &[usize]) -> (Array2<f64>, Array1<f64>) {
        let rows: Vec<FeatureVector> = indices.iter().map(|&i| self.rows[i]).collect();
        let targets: Vec<f64> = indices.iter().map(|&i| self.targets[i]).collect();
        (design_matrix(&rows), Array1::from_vec(targets))
    }
}

/// Stack feature vectors into a design matrix
pub fn design_matrix(rows: &[FeatureVector]) -> Array2<f64> {
    let mut matrix = Array2::zeros((rows.len(), FEATURE_COUNT));
    for (mut target, row) in matrix.rows_mut().into_iter().zip(rows) {
        for (cell, value) in target.iter_mut().zip(row.to_row()) {
            *cell = value;
        }
    }
    matrix
}

fn trailing_mean(values: &[f64], end: usize, window: usize) -> f64 {
    let start = (end + 1).saturating_sub(window);
    let slice = &values[start..=end];
    slice.iter().sum::<f64>() / slice.len() as f64
}

/// Builds feature tables from observation sequences
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureBuilder;

impl FeatureBuilder {
    /// Engineer one row per observation that has a complete history window
    pub fn build(observations: &[Observation]) -> FeatureTable {
        let revenues: Vec<f64> = observations.iter().map(Observation::revenue).collect();
        let mut table = FeatureTable::default();

        for (i, obs) in observations.iter().enumerate().skip(FIRST_COMPLETE_ROW) {
            let lags = [revenues[i - 1], revenues[i - 2], revenues[i - 3]];
            let row = FeatureVector::new(
                obs.date(),
                lags,
                trailing_mean(&revenues, i, SHORT_WINDOW),
                trailing_mean(&revenues, i, LONG_WINDOW),
                obs.revenue(),
            );

            table.dates.push(obs.date());
            table.rows.push(row);
            table.targets.push(obs.revenue());
        }

        table
    }

    /// Rows for the `horizon` days after the last observation.
    ///
    /// Lag, rolling and polynomial fields are frozen at their values for the
    /// last known revenue; only the calendar fields advance.
    pub fn projection_rows(
        observations: &[Observation],
        horizon: usize,
    ) -> Vec<(NaiveDate, FeatureVector)> {
        let Some(last) = observations.last() else {
            return Vec::new();
        };

        let revenues: Vec<f64> = observations.iter().map(Observation::revenue).collect();
        let n = revenues.len();
        let lag1 = revenues[n - 1];
        let lag2 = if n > 1 { revenues[n - 2] } else { lag1 };
        let lag3 = if n > 2 { revenues[n - 3] } else { lag2 };
        let ma3 = trailing_mean(&revenues, n - 1, SHORT_WINDOW);
        let ma7 = trailing_mean(&revenues, n - 1, LONG_WINDOW);

        future_dates(last.date(), horizon)
            .into_iter()
            .map(|date| {
                (
                    date,
                    FeatureVector::new(date, [lag1, lag2, lag3], ma3, ma7, lag1),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn test_drops_rows_without_history() {
        assert!(FeatureBuilder::build(&series(&[1.0; 6])).is_empty());

        let table = FeatureBuilder::build(&series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]));
        assert_eq!(table.len(), 2);
        assert_eq!(table.targets(), &[7.0, 8.0]);
    }

    #[test]
    fn test_row_values() {
        let table = FeatureBuilder::build(&series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]));
        let row = table.rows()[0];

        // 2024-01-07 is a Sunday in ISO week 1
        assert_eq!(row.day_of_week, 6);
        assert_eq!(row.month, 1);
        assert_eq!(row.day, 7);
        assert_eq!(row.quarter, 1);
        assert_eq!(row.day_of_year, 7);
        assert_eq!(row.week_of_year, 1);
        assert_eq!(
            (row.revenue_lag1, row.revenue_lag2, row.revenue_lag3),
            (6.0, 5.0, 4.0)
        );
        assert_relative_eq!(row.revenue_ma3, 6.0);
        assert_relative_eq!(row.revenue_ma7, 4.0);
        assert_relative_eq!(row.revenue_squared, 49.0);
        assert_relative_eq!(row.revenue_cubed, 343.0);

        let matrix = table.design_matrix();
        assert_eq!(matrix.dim(), (1, FEATURE_COUNT));
        assert_relative_eq!(matrix[[0, 10]], 4.0);
    }

    #[test]
    fn test_projection_rows_hold_history_constant() {
        let observations = series(&[10.0, 20.0, 30.0, 40.0]);
        let rows = FeatureBuilder::projection_rows(&observations, 3);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].0, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        for (_, row) in &rows {
            assert_eq!(
                (row.revenue_lag1, row.revenue_lag2, row.revenue_lag3),
                (40.0, 30.0, 20.0)
            );
            assert_relative_eq!(row.revenue_ma3, 30.0);
            assert_relative_eq!(row.revenue_ma7, 25.0);
            assert_relative_eq!(row.revenue_squared, 1600.0);
        }
        assert_ne!(rows[0].1.day_of_week, rows[1].1.day_of_week);
    }

    #[test]
    fn test_projection_of_short_history() {
        let rows = FeatureBuilder::projection_rows(&series(&[5.0]), 2);
        assert_eq!(rows[1].1.revenue_lag3, 5.0);
        assert!(FeatureBuilder::projection_rows(&[], 5).is_empty());
    }
}
