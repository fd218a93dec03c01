//! Trend analysis of the revenue series

use forecast_math::statistics::{mean, sample_std_dev};
use forecast_math::{LinearTrend, TrendDirection};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of the fit of `ln(revenue + 1)` against position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExponentialTrend {
    #[serde(rename = "Exponential Growth")]
    Growth,
    #[serde(rename = "Exponential Decay")]
    Decay,
    Unknown,
}

impl fmt::Display for ExponentialTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExponentialTrend::Growth => "Exponential Growth",
            ExponentialTrend::Decay => "Exponential Decay",
            ExponentialTrend::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// Direction, strength and spread of the revenue series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub direction: TrendDirection,
    /// Signed slope per period
    pub slope: f64,
    /// `|slope|`
    pub trend_strength: f64,
    /// R² of the linear fit
    pub trend_confidence: f64,
    pub exponential_trend: ExponentialTrend,
    /// Slope of the log-linear fit
    pub growth_rate: f64,
    /// Sample standard deviation of revenue
    pub volatility: f64,
    pub coefficient_of_variation: f64,
}

impl TrendSummary {
    /// Summary for a series too short to fit
    pub fn unknown() -> Self {
        Self {
            direction: TrendDirection::Unknown,
            slope: 0.0,
            trend_strength: 0.0,
            trend_confidence: 0.0,
            exponential_trend: ExponentialTrend::Unknown,
            growth_rate: 0.0,
            volatility: 0.0,
            coefficient_of_variation: 0.0,
        }
    }
}

/// Fit linear and log-linear trends over the position index
pub fn analyze_trend(revenues: &[f64]) -> TrendSummary {
    let Ok(linear) = LinearTrend::fit_series(revenues) else {
        return TrendSummary::unknown();
    };

    let logs: Vec<f64> = revenues.iter().map(|r| (r + 1.0).ln()).collect();
    let (exponential_trend, growth_rate) = match LinearTrend::fit_series(&logs) {
        Ok(fit) if fit.slope() > 0.0 => (ExponentialTrend::Growth, fit.slope()),
        Ok(fit) => (ExponentialTrend::Decay, fit.slope()),
        Err(_) => (ExponentialTrend::Unknown, 0.0),
    };

    let volatility = sample_std_dev(revenues).unwrap_or(0.0);
    let average = mean(revenues).unwrap_or(0.0);
    let coefficient_of_variation = if average == 0.0 {
        0.0
    } else {
        volatility / average
    };

    TrendSummary {
        direction: linear.direction(),
        slope: linear.slope(),
        trend_strength: linear.strength(),
        trend_confidence: linear.r_squared(),
        exponential_trend,
        growth_rate,
        volatility,
        coefficient_of_variation,
    }
}
