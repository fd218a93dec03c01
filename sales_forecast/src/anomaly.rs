//! Batch outlier detection over the revenue series

use crate::data::Observation;
use chrono::NaiveDate;
use forecast_math::statistics::{mean, population_std_dev};
use serde::{Deserialize, Serialize};

/// How far outside the expected band an observation lies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

/// One flagged observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    /// Position in the observation series
    pub index: usize,
    pub date: NaiveDate,
    pub value: f64,
    /// `(lower, upper)` band the value fell outside of
    pub expected_range: (f64, f64),
    pub severity: Severity,
}

/// Flagged observations and the band they were tested against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub anomalies: Vec<Anomaly>,
    pub count: usize,
    /// `count / observations`, 0 for an empty series
    pub rate: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl AnomalyReport {
    fn empty(mean: f64, std_dev: f64, lower_bound: f64, upper_bound: f64) -> Self {
        Self {
            anomalies: Vec::new(),
            count: 0,
            rate: 0.0,
            mean,
            std_dev,
            lower_bound,
            upper_bound,
        }
    }
}

/// Flag every revenue outside `mean ± sigma * std_dev`.
///
/// Deviations beyond `high_sigma * std_dev` are high severity.
pub fn detect_anomalies(observations: &[Observation], sigma: f64, high_sigma: f64) -> AnomalyReport {
    let revenues: Vec<f64> = observations.iter().map(Observation::revenue).collect();
    let (Ok(mu), Ok(std_dev)) = (mean(&revenues), population_std_dev(&revenues)) else {
        return AnomalyReport::empty(0.0, 0.0, 0.0, 0.0);
    };

    let lower_bound = mu - sigma * std_dev;
    let upper_bound = mu + sigma * std_dev;
    if std_dev == 0.0 {
        return AnomalyReport::empty(mu, std_dev, lower_bound, upper_bound);
    }

    let anomalies: Vec<Anomaly> = observations
        .iter()
        .enumerate()
        .filter(|(_, obs)| obs.revenue() < lower_bound || obs.revenue() > upper_bound)
        .map(|(index, obs)| {
            let severity = if (obs.revenue() - mu).abs() > high_sigma * std_dev {
                Severity::High
            } else {
                Severity::Medium
            };
            Anomaly {
                index,
                date: obs.date(),
                value: obs.revenue(),
                expected_range: (lower_bound, upper_bound),
                severity,
            }
        })
        .collect();

    let count = anomalies.len();
    AnomalyReport {
        anomalies,
        count,
        rate: count as f64 / observations.len() as f64,
        mean: mu,
        std_dev,
        lower_bound,
        upper_bound,
    }
}
