//! # Sales Forecast
//!
//! Predictive analytics over a date-ordered sales history.
//!
//! ## Features
//!
//! - Feature engineering (calendar fields, revenue lags, rolling means, polynomial terms)
//! - A pool of seven regression candidates trained in parallel and ranked on a held-out split
//! - 7/30/90-day revenue forecasts from the winning model, with a linear fallback for short histories
//! - Linear and exponential trend, monthly and weekly seasonality
//! - Two-sigma anomaly detection
//! - Per-item demand trends
//! - An aggregate risk score
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{Days, NaiveDate};
//! use sales_forecast::{analyze, Observation, TrendDirection};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let observations: Vec<Observation> = (0..5)
//!     .map(|i| Observation::new(start + Days::new(i), 100.0 + 5.0 * i as f64).with_item("iron", 2.0))
//!     .collect();
//!
//! let report = analyze(&observations);
//! assert_eq!(report.trend.direction, TrendDirection::Increasing);
//! assert_eq!(report.forecast.next_7_days.len(), 7);
//! ```
//!
//! A custom configuration goes through [`Analyzer`]:
//!
//! ```rust
//! use sales_forecast::{Analyzer, AnalyzerConfig};
//!
//! let config = AnalyzerConfig::from_json_str(r#"{"seed": 7, "parallel_training": false}"#)?;
//! let analyzer = Analyzer::new(config)?;
//! let report = analyzer.analyze(&[]);
//! assert!(report.item_forecasts.is_empty());
//! # Ok::<(), sales_forecast::ForecastError>(())
//! ```

pub mod analyzer;
pub mod anomaly;
pub mod baseline;
pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod forecast;
pub mod items;
pub mod metrics;
pub mod models;
pub mod risk;
pub mod seasonality;
pub mod trend;
pub mod utils;

// Re-export commonly used types
pub use crate::analyzer::{analyze, AnalysisReport, Analyzer};
pub use crate::anomaly::{Anomaly, AnomalyReport, Severity};
pub use crate::baseline::BaselineForecast;
pub use crate::config::{AnalyzerConfig, ModelPoolConfig};
pub use crate::data::{Observation, SalesSeries};
pub use crate::error::ForecastError;
pub use crate::features::{FeatureBuilder, FeatureTable, FeatureVector};
pub use crate::forecast::{ForecastPath, ForecastResult};
pub use crate::items::ItemForecast;
pub use crate::metrics::{EvaluationResult, ModelPerformance};
pub use crate::models::{Regressor, TrainedRegressor};
pub use crate::risk::{RiskAssessment, RiskLevel};
pub use crate::seasonality::SeasonalSummary;
pub use crate::trend::{ExponentialTrend, TrendSummary};
pub use forecast_math::TrendDirection;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
