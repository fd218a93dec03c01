// Runs the full analysis over a synthetic two-month sales history
use chrono::{Days, NaiveDate};
use sales_insight_workspace::{Analyzer, AnalyzerConfig, Observation};

fn sample_history() -> Vec<Observation> {
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    (0..60u64)
        .map(|i| {
            let weekend = if i % 7 >= 5 { 35.0 } else { 0.0 };
            let noise = ((i * 37) % 11) as f64 - 5.0;
            let revenue = 400.0 + 3.5 * i as f64 + weekend + noise;

            let mut obs = Observation::new(start + Days::new(i), revenue)
                .with_item("aluminum cans", 20.0 + (i % 5) as f64 + i as f64 * 0.3)
                .with_item("copper wire", 8.0 - i as f64 * 0.05);
            if i == 41 {
                obs = obs.with_item("car battery", 1.0);
            }
            obs
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let analyzer = Analyzer::new(AnalyzerConfig::default())?;
    let report = analyzer.analyze(&sample_history());

    println!("=== Forecast ===");
    println!(
        "Best model: {}",
        report.forecast.best_model.as_deref().unwrap_or("linear fallback")
    );
    println!("Confidence (R2): {:.3}", report.forecast.confidence);
    for (date, value) in report.forecast.dates.iter().zip(&report.forecast.next_7_days) {
        println!("  {}  {:>10.2}", date, value);
    }

    println!("\n=== Candidates ===");
    for performance in &report.model_performance {
        println!(
            "  {:<18} R2 {:>8.3}  RMSE {:>8.2}",
            performance.model, performance.metrics.r2_score, performance.metrics.rmse
        );
    }

    println!("\n=== Trend ===");
    println!(
        "{} ({}), strength {:.2}",
        report.trend.direction, report.trend.exponential_trend, report.trend.trend_strength
    );

    println!("\n=== Risk ===");
    println!(
        "{} (score {:.3}, confidence {:.3})",
        report.risk.risk_level, report.risk.overall_risk_score, report.risk.prediction_confidence
    );

    println!("\n=== Items ===");
    for (item, forecast) in &report.item_forecasts {
        println!("  {:<14} {} slope {:+.3}", item, forecast.direction, forecast.slope);
    }

    println!("\n=== Full report ===");
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
