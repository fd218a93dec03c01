//! Monthly and weekly revenue structure

use crate::data::Observation;
use chrono::Datelike;
use forecast_math::statistics::{argmax, mean, sample_variance};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Revenue statistics of one calendar group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub mean: f64,
    /// Sample variance; absent for a single observation
    pub variance: Option<f64>,
    pub count: usize,
}

impl GroupStats {
    fn from_values(values: &[f64]) -> Option<Self> {
        Some(Self {
            mean: mean(values).ok()?,
            variance: sample_variance(values).ok(),
            count: values.len(),
        })
    }
}

/// Periodic structure of the revenue series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalSummary {
    /// Month (1-12) to revenue statistics
    pub monthly_pattern: BTreeMap<u32, GroupStats>,
    /// Weekday (Monday = 0) to revenue statistics
    pub weekly_pattern: BTreeMap<u32, GroupStats>,
    pub peak_month: u32,
    pub peak_weekday: Option<u32>,
    pub peak_revenue: f64,
    /// Mean within-month variance over total variance, in [0, 1]
    pub seasonal_strength: f64,
}

fn group_by(
    observations: &[Observation],
    key: impl Fn(&Observation) -> u32,
) -> BTreeMap<u32, GroupStats> {
    let mut groups: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for obs in observations {
        groups.entry(key(obs)).or_default().push(obs.revenue());
    }

    groups
        .into_iter()
        .filter_map(|(k, values)| GroupStats::from_values(&values).map(|stats| (k, stats)))
        .collect()
}

/// Key of the group with the highest mean; the smallest key wins ties
fn peak(pattern: &BTreeMap<u32, GroupStats>) -> Option<(u32, f64)> {
    let means: Vec<f64> = pattern.values().map(|g| g.mean).collect();
    let index = argmax(&means)?;
    pattern.keys().nth(index).map(|&k| (k, means[index]))
}

/// Summary for a series too short to decompose: the busiest month and the
/// largest single revenue
fn sparse_summary(observations: &[Observation]) -> SeasonalSummary {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for obs in observations {
        *counts.entry(obs.date().month()).or_default() += 1;
    }
    let peak_month = counts
        .iter()
        .fold(None, |best: Option<(u32, usize)>, (&month, &count)| match best {
            Some((_, c)) if c >= count => best,
            _ => Some((month, count)),
        })
        .map_or(1, |(month, _)| month);

    let peak_revenue = observations
        .iter()
        .map(Observation::revenue)
        .fold(None, |best: Option<f64>, r| Some(best.map_or(r, |b| b.max(r))))
        .unwrap_or(0.0);

    SeasonalSummary {
        monthly_pattern: BTreeMap::new(),
        weekly_pattern: BTreeMap::new(),
        peak_month,
        peak_weekday: None,
        peak_revenue,
        seasonal_strength: 0.0,
    }
}

/// Mean within-month sample variance over total sample variance.
///
/// Not clamped: uneven months can push the ratio above one. `None` when
/// either variance is undefined or the series is constant.
pub fn monthly_variance_ratio(observations: &[Observation]) -> Option<f64> {
    variance_ratio(observations, &group_by(observations, |obs| obs.date().month()))
}

fn variance_ratio(
    observations: &[Observation],
    monthly_pattern: &BTreeMap<u32, GroupStats>,
) -> Option<f64> {
    let revenues: Vec<f64> = observations.iter().map(Observation::revenue).collect();
    let within: Vec<f64> = monthly_pattern.values().filter_map(|g| g.variance).collect();
    let total = sample_variance(&revenues).ok()?;
    if total <= 0.0 {
        return None;
    }
    Some(mean(&within).ok()? / total)
}

/// Decompose revenue by month and weekday.
///
/// Below `min_observations` only the peak month and revenue are reported.
pub fn analyze_seasonality(observations: &[Observation], min_observations: usize) -> SeasonalSummary {
    if observations.len() < min_observations.max(2) {
        return sparse_summary(observations);
    }

    let monthly_pattern = group_by(observations, |obs| obs.date().month());
    let weekly_pattern = group_by(observations, |obs| {
        obs.date().weekday().num_days_from_monday()
    });

    let (peak_month, peak_revenue) = peak(&monthly_pattern).unwrap_or((1, 0.0));
    let peak_weekday = peak(&weekly_pattern).map(|(day, _)| day);

    let seasonal_strength = variance_ratio(observations, &monthly_pattern)
        .map_or(0.0, |ratio| ratio.clamp(0.0, 1.0));

    SeasonalSummary {
        monthly_pattern,
        weekly_pattern,
        peak_month,
        peak_weekday,
        peak_revenue,
        seasonal_strength,
    }
}
