use chrono::{Days, NaiveDate};
use rstest::rstest;
use sales_forecast::features::FeatureBuilder;
use sales_forecast::models::{
    GradientBoosting, KernelSvr, LassoRegression, LinearRegression, ModelPool, NeuralNetwork,
    RandomForest, Regressor, RidgeRegression,
};
use sales_forecast::{AnalyzerConfig, Observation};

/// Seventy days across three months with an irregular wobble, so no
/// feature column is an exact linear combination of the others
fn feature_table_inputs() -> Vec<Observation> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
    (0..70)
        .map(|i| {
            let bump = if i % 7 == 5 { 40.0 } else { 0.0 };
            let revenue = 500.0 + 5.0 * i as f64 + bump + ((i * 37) % 11) as f64;
            Observation::new(start + Days::new(i), revenue)
        })
        .collect()
}

#[rstest]
#[case(Box::new(LinearRegression::new()))]
#[case(Box::new(RidgeRegression::new(1.0).unwrap()))]
#[case(Box::new(LassoRegression::new(0.1, 1000).unwrap()))]
#[case(Box::new(RandomForest::new(20, None, 42).unwrap()))]
#[case(Box::new(GradientBoosting::new(50, 0.1, 3).unwrap()))]
#[case(Box::new(KernelSvr::new(1.0, 0.1).unwrap()))]
#[case(Box::new(NeuralNetwork::new(vec![16], 100, 0.01, 42).unwrap()))]
fn test_candidate_fits_feature_table(#[case] candidate: Box<dyn Regressor>) {
    let table = FeatureBuilder::build(&feature_table_inputs());
    let x = table.design_matrix();
    let y = table.target_vector();

    let model = candidate.fit(x.view(), y.view()).unwrap();
    assert_eq!(model.name(), candidate.name());

    let predicted = model.predict(x.view()).unwrap();
    assert_eq!(predicted.len(), table.len());
    assert!(predicted.iter().all(|v| v.is_finite()));

    let projection: Vec<_> = FeatureBuilder::projection_rows(&feature_table_inputs(), 5)
        .into_iter()
        .map(|(_, row)| row)
        .collect();
    let future = model
        .predict(sales_forecast::features::design_matrix(&projection).view())
        .unwrap();
    assert_eq!(future.len(), 5);
}

#[test]
fn test_standard_pool_trains_every_candidate() {
    let mut config = AnalyzerConfig::default();
    config.models.forest_trees = 10;
    config.models.mlp_hidden_layers = vec![8];
    config.models.mlp_epochs = 30;

    let pool = ModelPool::standard(&config).unwrap();
    let table = FeatureBuilder::build(&feature_table_inputs());
    let outcomes = pool.train(table.design_matrix().view(), table.target_vector().view());

    assert_eq!(outcomes.len(), 7);
    assert!(outcomes.iter().all(|o| o.is_trained()));
    let names: Vec<&str> = outcomes.iter().map(|o| o.name()).collect();
    assert_eq!(names, pool.names());
}

#[test]
fn test_prediction_width_is_checked() {
    let table = FeatureBuilder::build(&feature_table_inputs());
    let model = LinearRegression::new()
        .fit(table.design_matrix().view(), table.target_vector().view())
        .unwrap();

    let narrow = ndarray::Array2::<f64>::zeros((2, 3));
    assert!(model.predict(narrow.view()).is_err());
}
