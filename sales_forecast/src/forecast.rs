//! Revenue forecast from the best candidate model
//!
//! The full path trains the candidate pool on the feature table, picks the
//! winner on the held-out split and projects it over carried-forward feature
//! rows. Whenever that is impossible (too little history, no candidate
//! survived, projection failed) a linear fit over the observation index
//! produces a short forecast instead.

use crate::config::AnalyzerConfig;
use crate::data::{Observation, SalesSeries};
use crate::error::{ForecastError, Result};
use crate::features::{design_matrix, FeatureBuilder, FeatureVector};
use crate::metrics::{evaluate, rank, select_best, ModelPerformance};
use crate::models::{CandidateOutcome, ModelPool, TrainedRegressor};
use crate::trend::TrendSummary;
use crate::utils::{future_dates, train_test_split};
use chrono::NaiveDate;
use forecast_math::{LinearTrend, TrendDirection};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const WEEK: usize = 7;
const MONTH: usize = 30;
const QUARTER: usize = 90;

/// Which forecasting strategy produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastPath {
    /// Best candidate model over engineered features
    Full,
    /// Linear fit over the observation index
    Degraded,
}

/// Point forecasts at several horizons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub next_7_days: Vec<f64>,
    /// Empty on the degraded path
    pub next_30_days: Vec<f64>,
    /// Empty on the degraded path
    pub next_90_days: Vec<f64>,
    /// Date of every value in the longest non-empty horizon
    pub dates: Vec<NaiveDate>,
    pub trend: TrendDirection,
    pub trend_strength: f64,
    pub best_model: Option<String>,
    /// Test-set R² of the winner, or R² of the fallback fit
    pub confidence: f64,
    pub path: ForecastPath,
}

/// Forecast together with the evaluation table it was chosen from
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRun {
    pub forecast: ForecastResult,
    /// Best first; empty on the degraded path
    pub model_performance: Vec<ModelPerformance>,
}

/// Linear forecast over the observation index.
///
/// An empty series yields `horizon` zeros and a single observation a flat
/// line, both with zero confidence.
pub fn degraded_forecast(observations: &[Observation], horizon: usize) -> ForecastResult {
    let series = SalesSeries::new(observations);
    let revenues = series.revenues();

    let (values, trend, trend_strength, confidence) = match LinearTrend::fit_series(&revenues) {
        Ok(fit) => (
            fit.project(revenues.len(), horizon),
            fit.direction(),
            fit.strength(),
            fit.r_squared(),
        ),
        Err(_) => {
            let level = revenues.last().copied().unwrap_or(0.0);
            (vec![level; horizon], TrendDirection::Unknown, 0.0, 0.0)
        }
    };

    ForecastResult {
        next_7_days: values,
        next_30_days: Vec::new(),
        next_90_days: Vec::new(),
        dates: series
            .last_date()
            .map(|last| future_dates(last, horizon))
            .unwrap_or_default(),
        trend,
        trend_strength,
        best_model: None,
        confidence,
        path: ForecastPath::Degraded,
    }
}

/// Drives the candidate pool and falls back when it cannot deliver
#[derive(Debug)]
pub struct ForecastGenerator<'a> {
    config: &'a AnalyzerConfig,
    pool: &'a ModelPool,
}

impl<'a> ForecastGenerator<'a> {
    pub fn new(config: &'a AnalyzerConfig, pool: &'a ModelPool) -> Self {
        Self { config, pool }
    }

    /// Forecast `observations`; `trend` labels the full-path result
    pub fn generate(&self, observations: &[Observation], trend: &TrendSummary) -> ForecastRun {
        match self.full_path(observations, trend) {
            Ok(run) => run,
            Err(reason) => {
                info!(
                    path = "degraded",
                    reason = %reason,
                    observations = observations.len(),
                    "using fallback forecast"
                );
                ForecastRun {
                    forecast: degraded_forecast(observations, WEEK),
                    model_performance: Vec::new(),
                }
            }
        }
    }

    fn full_path(
        &self,
        observations: &[Observation],
        trend: &TrendSummary,
    ) -> Result<ForecastRun> {
        let table = FeatureBuilder::build(observations);
        if table.len() < self.config.min_feature_rows {
            return Err(ForecastError::DataError(format!(
                "{} feature rows, need {}",
                table.len(),
                self.config.min_feature_rows
            )));
        }

        let split = train_test_split(table.len(), self.config.test_ratio, self.config.seed)
            .ok_or_else(|| {
                ForecastError::DataError("split leaves an empty partition".to_string())
            })?;
        let (x_train, y_train) = table.select(&split.train);
        let (x_test, y_test) = table.select(&split.test);
        debug!(train = split.train.len(), test = split.test.len(), "feature table split");

        let actual = y_test.to_vec();
        let mut survivors: Vec<(ModelPerformance, Box<dyn TrainedRegressor>)> = Vec::new();
        for outcome in self.pool.train(x_train.view(), y_train.view()) {
            // Training failures were already reported by the pool
            let CandidateOutcome::Trained(model) = outcome else {
                continue;
            };
            let scored = model
                .predict(x_test.view())
                .and_then(|predicted| evaluate(&predicted.to_vec(), &actual));
            match scored {
                Ok(metrics) => {
                    debug!(
                        model = model.name(),
                        r2 = metrics.r2_score,
                        rmse = metrics.rmse,
                        "candidate evaluated"
                    );
                    survivors.push((ModelPerformance::new(model.name(), metrics), model));
                }
                Err(e) => warn!(model = model.name(), error = %e, "candidate dropped from pool"),
            }
        }

        let mut performances: Vec<ModelPerformance> =
            survivors.iter().map(|(p, _)| p.clone()).collect();
        let winner = select_best(&performances)
            .cloned()
            .ok_or_else(|| ForecastError::ValidationError("every candidate failed".to_string()))?;
        let model = survivors
            .iter()
            .find(|(p, _)| p.model == winner.model)
            .map(|(_, m)| m)
            .ok_or_else(|| ForecastError::model(&winner.model, "trained model missing"))?;

        let projected = project(model.as_ref(), observations, self.config.projection_horizon)?;
        rank(&mut performances);

        info!(
            path = "full",
            model = %winner.model,
            r2 = winner.metrics.r2_score,
            candidates = performances.len(),
            "forecast generated"
        );

        let (dates, values): (Vec<NaiveDate>, Vec<f64>) = projected.into_iter().unzip();
        let slice = |k: usize| values[..k.min(values.len())].to_vec();
        Ok(ForecastRun {
            forecast: ForecastResult {
                next_7_days: slice(WEEK),
                next_30_days: slice(MONTH),
                next_90_days: slice(QUARTER),
                dates: dates[..QUARTER.min(dates.len())].to_vec(),
                trend: trend.direction,
                trend_strength: trend.trend_strength,
                best_model: Some(winner.model),
                confidence: winner.metrics.r2_score,
                path: ForecastPath::Full,
            },
            model_performance: performances,
        })
    }
}

/// Predict the carried-forward rows after the last observation
fn project(
    model: &dyn TrainedRegressor,
    observations: &[Observation],
    horizon: usize,
) -> Result<Vec<(NaiveDate, f64)>> {
    let rows = FeatureBuilder::projection_rows(observations, horizon);
    let (dates, vectors): (Vec<NaiveDate>, Vec<FeatureVector>) = rows.into_iter().unzip();

    let predicted = model.predict(design_matrix(&vectors).view())?;
    if predicted.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::model(model.name(), "projected non-finite values"));
    }

    Ok(dates.into_iter().zip(predicted).collect())
}
