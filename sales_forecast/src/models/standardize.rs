//! Column standardization for the scale-sensitive candidates
//!
//! Calendar columns are often constant over a short history (a single
//! quarter, a single month). Those columns are dropped before scaling so
//! the remaining design has full column variance.

use crate::error::{ForecastError, Result};
use crate::models::check_width;
use linfa::traits::{Fit, Transformer};
use linfa::Dataset;
use linfa_preprocessing::linear_scaling::LinearScaler;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

/// Columns whose spread falls below this carry no information
const MIN_SPREAD: f64 = 1e-12;

/// Learned column selection and zero-mean, unit-variance scaling
#[derive(Debug)]
pub struct Standardizer {
    name: String,
    width: usize,
    kept: Vec<usize>,
    scaler: LinearScaler<f64>,
}

impl Standardizer {
    /// Learn the transform on a training design and return the scaled copy
    pub fn fit(
        name: &str,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<(Self, Array2<f64>)> {
        let kept: Vec<usize> = x
            .axis_iter(Axis(1))
            .enumerate()
            .filter(|(_, column)| column.std(0.0) > MIN_SPREAD)
            .map(|(j, _)| j)
            .collect();
        if kept.is_empty() {
            return Err(ForecastError::model(name, "every feature column is constant"));
        }

        let informative = x.select(Axis(1), &kept);
        let dataset = Dataset::new(informative.clone(), y.to_owned());
        let scaler = LinearScaler::<f64>::standard()
            .fit(&dataset)
            .map_err(|e| ForecastError::model(name, e.to_string()))?;
        let scaled = scaler.transform(informative);

        Ok((
            Self {
                name: name.to_string(),
                width: x.ncols(),
                kept,
                scaler,
            },
            scaled,
        ))
    }

    /// Apply the learned transform to a design with the training width
    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        check_width(&self.name, x, self.width)?;
        Ok(self.scaler.transform(x.select(Axis(1), &self.kept)))
    }

    /// Width of the design the transform was learned on
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of columns that survive the constant-column filter
    pub fn kept(&self) -> usize {
        self.kept.len()
    }
}
