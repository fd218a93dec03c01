//! Aggregate forecast risk

use forecast_math::statistics::{mean, pearson_correlation, sample_std_dev};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Low below 0.3, Medium below 0.6, High otherwise
    pub fn from_score(score: f64) -> Self {
        if score < 0.3 {
            RiskLevel::Low
        } else if score < 0.6 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        f.write_str(label)
    }
}

/// Individual risk signals. None of them is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    /// Coefficient of variation of revenue
    pub volatility_risk: f64,
    /// `1 - |corr(revenue, position)|`
    pub trend_risk: f64,
    /// `1 - seasonal strength`
    pub seasonal_risk: f64,
    /// `1 - observations / target`; negative for long histories
    pub data_sufficiency_risk: f64,
}

impl RiskFactors {
    pub fn mean(&self) -> f64 {
        (self.volatility_risk + self.trend_risk + self.seasonal_risk + self.data_sufficiency_risk)
            / 4.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub factors: RiskFactors,
    pub overall_risk_score: f64,
    pub risk_level: RiskLevel,
    /// `1 - overall_risk_score`
    pub prediction_confidence: f64,
}

/// Combine volatility, trend fit, seasonality and history length into one score
pub fn assess_risk(revenues: &[f64], seasonal_strength: f64, sufficiency_target: usize) -> RiskAssessment {
    let average = mean(revenues).unwrap_or(0.0);
    let volatility_risk = if average > 0.0 {
        sample_std_dev(revenues).unwrap_or(0.0) / average
    } else {
        0.0
    };

    let positions: Vec<f64> = (0..revenues.len()).map(|i| i as f64).collect();
    let correlation = pearson_correlation(revenues, &positions).unwrap_or(0.0);

    let factors = RiskFactors {
        volatility_risk,
        trend_risk: 1.0 - correlation.abs(),
        seasonal_risk: 1.0 - seasonal_strength,
        data_sufficiency_risk: 1.0 - revenues.len() as f64 / sufficiency_target as f64,
    };

    let overall_risk_score = factors.mean();
    RiskAssessment {
        factors,
        overall_risk_score,
        risk_level: RiskLevel::from_score(overall_risk_score),
        prediction_confidence: 1.0 - overall_risk_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, RiskLevel::Low)]
    #[case(0.29, RiskLevel::Low)]
    #[case(0.3, RiskLevel::Medium)]
    #[case(0.59, RiskLevel::Medium)]
    #[case(0.6, RiskLevel::High)]
    #[case(1.4, RiskLevel::High)]
    fn test_risk_levels(#[case] score: f64, #[case] expected: RiskLevel) {
        assert_eq!(RiskLevel::from_score(score), expected);
    }

    #[test]
    fn test_perfect_trend() {
        let revenues: Vec<f64> = (1..=30).map(|i| i as f64).collect();
        let risk = assess_risk(&revenues, 1.0, 30);

        assert_relative_eq!(risk.factors.trend_risk, 0.0, epsilon = 1e-10);
        assert_relative_eq!(risk.factors.seasonal_risk, 0.0);
        assert_relative_eq!(risk.factors.data_sufficiency_risk, 0.0);
        // sample std of 1..=30 over its mean 15.5
        let expected = (2247.5_f64 / 29.0).sqrt() / 15.5;
        assert_relative_eq!(risk.factors.volatility_risk, expected, epsilon = 1e-10);
        assert_relative_eq!(risk.overall_risk_score, expected / 4.0, epsilon = 1e-10);
        assert_eq!(risk.risk_level, RiskLevel::Low);
        assert_relative_eq!(risk.prediction_confidence, 1.0 - expected / 4.0, epsilon = 1e-10);
    }

    #[test]
    fn test_long_history_is_not_clamped() {
        let revenues = vec![5.0; 60];
        let risk = assess_risk(&revenues, 0.0, 30);

        assert_relative_eq!(risk.factors.data_sufficiency_risk, -1.0);
        // constant series: no correlation, no volatility
        assert_eq!(risk.factors.trend_risk, 1.0);
        assert_eq!(risk.factors.volatility_risk, 0.0);
        assert_relative_eq!(risk.overall_risk_score, 0.25);
    }

    #[test]
    fn test_empty_series() {
        let risk = assess_risk(&[], 0.0, 30);
        assert_relative_eq!(risk.overall_risk_score, 0.75);
        assert_eq!(risk.risk_level, RiskLevel::High);
        assert_relative_eq!(risk.prediction_confidence, 0.25);
    }
}
