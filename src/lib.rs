//! # Sales Insight
//!
//! Workspace facade over the numeric primitives in [`forecast_math`] and the
//! analysis pipeline in [`sales_forecast`].
//!
//! ## Example
//!
//! ```
//! use sales_insight_workspace::sales_forecast::{analyze, ForecastPath};
//!
//! let report = analyze(&[]);
//! assert_eq!(report.forecast.path, ForecastPath::Degraded);
//! assert_eq!(report.forecast.next_7_days, vec![0.0; 7]);
//! ```

pub use forecast_math;
pub use sales_forecast;

pub use sales_forecast::{analyze, AnalysisReport, Analyzer, AnalyzerConfig, Observation};
