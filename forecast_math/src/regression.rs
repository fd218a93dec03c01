//! Least-squares trend fitting
//!
//! A single ordinary-least-squares fit of a value against its position.
//! Aggregate revenue trends, the sparse-data fallback forecast and the
//! per-item demand forecasts all go through [`LinearTrend`].

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a fitted trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    /// Not enough data to fit a line
    Unknown,
}

impl TrendDirection {
    /// Classify a slope. A flat line counts as decreasing.
    pub fn from_slope(slope: f64) -> Self {
        if slope.is_nan() {
            TrendDirection::Unknown
        } else if slope > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrendDirection::Increasing => "Increasing",
            TrendDirection::Decreasing => "Decreasing",
            TrendDirection::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// Fitted line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    slope: f64,
    intercept: f64,
    r_squared: f64,
    points: usize,
}

impl LinearTrend {
    /// Fit against the implicit index `0, 1, .., n - 1`
    pub fn fit_series(values: &[f64]) -> Result<Self> {
        let points: Vec<(f64, f64)> = values
            .iter()
            .enumerate()
            .map(|(i, &y)| (i as f64, y))
            .collect();
        Self::fit_points(&points)
    }

    /// Fit against explicit `(x, y)` pairs
    pub fn fit_points(points: &[(f64, f64)]) -> Result<Self> {
        if points.len() < 2 {
            return Err(MathError::InsufficientData(format!(
                "Linear trend requires at least 2 points, have {}",
                points.len()
            )));
        }
        if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(MathError::InvalidInput(
                "Linear trend requires finite points".to_string(),
            ));
        }

        let n = points.len() as f64;
        let x_mean = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for &(x, y) in points {
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        if denominator.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        let intercept = y_mean - slope * x_mean;

        // A constant target is explained perfectly by a flat line
        let constant = points.iter().all(|(_, y)| *y == points[0].1);
        let r_squared = if constant {
            1.0
        } else {
            let (ss_total, ss_residual) =
                points
                    .iter()
                    .fold((0.0, 0.0), |(total, residual), &(x, y)| {
                        let predicted = slope * x + intercept;
                        (
                            total + (y - y_mean).powi(2),
                            residual + (y - predicted).powi(2),
                        )
                    });
            1.0 - ss_residual / ss_total
        };

        Ok(Self {
            slope,
            intercept,
            r_squared,
            points: points.len(),
        })
    }

    /// Signed slope per period
    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Coefficient of determination of the fit
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Magnitude of the slope
    pub fn strength(&self) -> f64 {
        self.slope.abs()
    }

    /// Number of points the line was fitted on
    pub fn points(&self) -> usize {
        self.points
    }

    pub fn direction(&self) -> TrendDirection {
        TrendDirection::from_slope(self.slope)
    }

    /// Value of the line at `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Values at positions `start, start + 1, .., start + periods - 1`
    pub fn project(&self, start: usize, periods: usize) -> Vec<f64> {
        (start..start + periods)
            .map(|x| self.predict(x as f64))
            .collect()
    }
}
