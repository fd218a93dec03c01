//! One-call predictive analysis of a sales history

use crate::anomaly::{detect_anomalies, AnomalyReport};
use crate::baseline::{baseline_forecast, BaselineForecast};
use crate::config::AnalyzerConfig;
use crate::data::{Observation, SalesSeries};
use crate::error::Result;
use crate::forecast::{ForecastGenerator, ForecastResult};
use crate::items::{forecast_items, ItemForecast};
use crate::metrics::ModelPerformance;
use crate::models::ModelPool;
use crate::risk::{assess_risk, RiskAssessment};
use crate::seasonality::{analyze_seasonality, SeasonalSummary};
use crate::trend::{analyze_trend, TrendSummary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Everything derived from one observation sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub forecast: ForecastResult,
    /// Evaluation of every surviving candidate, best first
    pub model_performance: Vec<ModelPerformance>,
    pub trend: TrendSummary,
    pub seasonal: SeasonalSummary,
    pub anomalies: AnomalyReport,
    pub item_forecasts: BTreeMap<String, ItemForecast>,
    pub risk: RiskAssessment,
    /// Absent for an empty history
    pub baseline: Option<BaselineForecast>,
}

/// Configured analysis pipeline
#[derive(Debug)]
pub struct Analyzer {
    config: AnalyzerConfig,
    pool: ModelPool,
}

impl Analyzer {
    /// Validate `config` and build the candidate pool
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        let pool = ModelPool::standard(&config)?;
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze a date-sorted, de-duplicated observation sequence.
    ///
    /// Never fails: sparse or degenerate input degrades to simpler
    /// estimates and zero-valued defaults.
    pub fn analyze(&self, observations: &[Observation]) -> AnalysisReport {
        let series = SalesSeries::new(observations);
        let revenues = series.revenues();
        info!(observations = series.len(), "starting sales analysis");

        let trend = analyze_trend(&revenues);
        debug!(direction = %trend.direction, slope = trend.slope, "trend analyzed");

        let seasonal = analyze_seasonality(observations, self.config.seasonal_min_observations);
        let anomalies = detect_anomalies(
            observations,
            self.config.anomaly_sigma,
            self.config.high_severity_sigma,
        );
        let item_forecasts = forecast_items(series, self.config.item_horizon);
        let risk = assess_risk(
            &revenues,
            seasonal.seasonal_strength,
            self.config.data_sufficiency_target,
        );
        let run = ForecastGenerator::new(&self.config, &self.pool).generate(observations, &trend);

        info!(
            anomalies = anomalies.count,
            items = item_forecasts.len(),
            risk = %risk.risk_level,
            "sales analysis finished"
        );

        AnalysisReport {
            forecast: run.forecast,
            model_performance: run.model_performance,
            trend,
            seasonal,
            anomalies,
            item_forecasts,
            risk,
            baseline: baseline_forecast(series),
        }
    }
}

impl Default for Analyzer {
    /// Default configuration; a pool that cannot be built leaves every
    /// analysis on the fallback forecast
    fn default() -> Self {
        let config = AnalyzerConfig::default();
        let pool = ModelPool::standard(&config).unwrap_or_else(|e| {
            warn!(error = %e, "default candidate pool rejected");
            ModelPool::new(Vec::new(), config.parallel_training)
        });
        Self { config, pool }
    }
}

/// Analyze `observations` with the default configuration
pub fn analyze(observations: &[Observation]) -> AnalysisReport {
    Analyzer::default().analyze(observations)
}
