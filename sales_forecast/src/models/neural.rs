//! Small feed-forward network trained with Adam

use crate::error::{ForecastError, Result};
use crate::models::{check_training_data, Regressor, Standardizer, TrainedRegressor};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

const BETA1: f64 = 0.9;
const BETA2: f64 = 0.999;
const ADAM_EPSILON: f64 = 1e-8;
/// L2 penalty on the weights
const WEIGHT_DECAY: f64 = 1e-4;
/// Training stops once the loss improves by less than this for `PATIENCE` epochs
const LOSS_TOLERANCE: f64 = 1e-4;
const PATIENCE: usize = 10;

/// Multi-layer perceptron regressor with ReLU hidden layers
#[derive(Debug, Clone)]
pub struct NeuralNetwork {
    name: String,
    hidden_layers: Vec<usize>,
    epochs: usize,
    learning_rate: f64,
    seed: u64,
}

#[derive(Debug, Clone)]
struct Layer {
    weights: Array2<f64>,
    biases: Array1<f64>,
}

/// Mean and spread of the training target
#[derive(Debug, Clone, Copy)]
struct TargetScale {
    mean: f64,
    std: f64,
}

impl TargetScale {
    fn fit(y: ArrayView1<'_, f64>) -> Self {
        let std = y.std(0.0);
        Self {
            mean: y.mean().unwrap_or(0.0),
            std: if std > 0.0 { std } else { 1.0 },
        }
    }

    fn transform(&self, y: ArrayView1<'_, f64>) -> Array1<f64> {
        y.mapv(|v| (v - self.mean) / self.std)
    }

    fn inverse(&self, z: ArrayView1<'_, f64>) -> Array1<f64> {
        z.mapv(|v| v * self.std + self.mean)
    }
}

/// Trained network together with its input and target scaling
#[derive(Debug)]
pub struct TrainedNeuralNetwork {
    name: String,
    standardizer: Standardizer,
    target: TargetScale,
    layers: Vec<Layer>,
}

/// First and second moment estimates for one layer
#[derive(Debug, Clone)]
struct Moments {
    weights_m: Array2<f64>,
    weights_v: Array2<f64>,
    biases_m: Array1<f64>,
    biases_v: Array1<f64>,
}

struct Pass {
    /// Input of every layer, starting with the design matrix
    inputs: Vec<Array2<f64>>,
    /// Pre-activation of every hidden layer
    hidden: Vec<Array2<f64>>,
    output: Array2<f64>,
}

fn forward(layers: &[Layer], x: Array2<f64>) -> Pass {
    let mut inputs = vec![x];
    let mut hidden = Vec::with_capacity(layers.len().saturating_sub(1));
    let mut output = Array2::zeros((0, 1));

    for (k, layer) in layers.iter().enumerate() {
        let z = inputs[k].dot(&layer.weights) + &layer.biases;
        if k + 1 < layers.len() {
            inputs.push(z.mapv(|v| v.max(0.0)));
            hidden.push(z);
        } else {
            output = z;
        }
    }

    Pass {
        inputs,
        hidden,
        output,
    }
}

impl NeuralNetwork {
    pub fn new(
        hidden_layers: Vec<usize>,
        epochs: usize,
        learning_rate: f64,
        seed: u64,
    ) -> Result<Self> {
        if hidden_layers.is_empty() || hidden_layers.contains(&0) {
            return Err(ForecastError::InvalidParameter(
                "Hidden layers must be non-empty".to_string(),
            ));
        }
        if epochs == 0 {
            return Err(ForecastError::InvalidParameter(
                "Network needs at least one epoch".to_string(),
            ));
        }
        if !(learning_rate > 0.0) {
            return Err(ForecastError::InvalidParameter(
                "Learning rate must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: "Neural Network".to_string(),
            hidden_layers,
            epochs,
            learning_rate,
            seed,
        })
    }

    fn initialize(&self, inputs: usize) -> Result<Vec<Layer>> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut sizes = vec![inputs];
        sizes.extend(&self.hidden_layers);
        sizes.push(1);

        sizes
            .windows(2)
            .map(|pair| {
                let (fan_in, fan_out) = (pair[0], pair[1]);
                let normal = Normal::new(0.0, (2.0 / fan_in as f64).sqrt())
                    .map_err(|e| ForecastError::model(&self.name, e.to_string()))?;
                Ok(Layer {
                    weights: Array2::from_shape_fn((fan_in, fan_out), |_| normal.sample(&mut rng)),
                    biases: Array1::zeros(fan_out),
                })
            })
            .collect()
    }
}

impl Regressor for NeuralNetwork {
    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Box<dyn TrainedRegressor>> {
        check_training_data(&self.name, x, y)?;

        let (standardizer, scaled) = Standardizer::fit(&self.name, x, y)?;
        let target = TargetScale::fit(y);
        let y_col = target.transform(y).insert_axis(Axis(1));
        let n = scaled.nrows() as f64;

        let mut layers = self.initialize(scaled.ncols())?;
        let mut moments: Vec<Moments> = layers
            .iter()
            .map(|layer| Moments {
                weights_m: Array2::zeros(layer.weights.raw_dim()),
                weights_v: Array2::zeros(layer.weights.raw_dim()),
                biases_m: Array1::zeros(layer.biases.raw_dim()),
                biases_v: Array1::zeros(layer.biases.raw_dim()),
            })
            .collect();

        let mut best_loss = f64::INFINITY;
        let mut stalled = 0;

        for epoch in 1..=self.epochs {
            let pass = forward(&layers, scaled.clone());
            let error = &pass.output - &y_col;

            let penalty: f64 = layers.iter().map(|l| l.weights.mapv(|w| w * w).sum()).sum();
            let loss = error.mapv(|e| e * e).sum() / (2.0 * n) + WEIGHT_DECAY * penalty / (2.0 * n);
            if !loss.is_finite() {
                return Err(ForecastError::model(
                    &self.name,
                    format!("loss became non-finite at epoch {}", epoch),
                ));
            }

            // Backpropagate through every layer before touching the weights
            let mut delta = error / n;
            let mut gradients = Vec::with_capacity(layers.len());
            for k in (0..layers.len()).rev() {
                let grad_w = pass.inputs[k].t().dot(&delta) + &(&layers[k].weights * (WEIGHT_DECAY / n));
                let grad_b = delta.sum_axis(Axis(0));
                if k > 0 {
                    let mask = pass.hidden[k - 1].mapv(|v| if v > 0.0 { 1.0 } else { 0.0 });
                    delta = delta.dot(&layers[k].weights.t()) * &mask;
                }
                gradients.push((k, grad_w, grad_b));
            }

            let step = epoch as i32;
            let correction1 = 1.0 - BETA1.powi(step);
            let correction2 = 1.0 - BETA2.powi(step);
            for (k, grad_w, grad_b) in gradients {
                let m = &mut moments[k];
                m.weights_m = &m.weights_m * BETA1 + &(&grad_w * (1.0 - BETA1));
                m.weights_v = &m.weights_v * BETA2 + &(grad_w.mapv(|g| g * g) * (1.0 - BETA2));
                m.biases_m = &m.biases_m * BETA1 + &(&grad_b * (1.0 - BETA1));
                m.biases_v = &m.biases_v * BETA2 + &(grad_b.mapv(|g| g * g) * (1.0 - BETA2));

                let lr = self.learning_rate;
                let weight_rms = m.weights_v.mapv(|v| (v / correction2).sqrt() + ADAM_EPSILON);
                let weight_step = (&m.weights_m / correction1) / &weight_rms * lr;
                layers[k].weights -= &weight_step;

                let bias_rms = m.biases_v.mapv(|v| (v / correction2).sqrt() + ADAM_EPSILON);
                let bias_step = (&m.biases_m / correction1) / &bias_rms * lr;
                layers[k].biases -= &bias_step;
            }

            if loss < best_loss - LOSS_TOLERANCE {
                best_loss = loss;
                stalled = 0;
            } else {
                stalled += 1;
                if stalled >= PATIENCE {
                    debug!(model = %self.name, epoch, loss, "network stopped improving");
                    break;
                }
            }
        }

        Ok(Box::new(TrainedNeuralNetwork {
            name: self.name.clone(),
            standardizer,
            target,
            layers,
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedRegressor for TrainedNeuralNetwork {
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let pass = forward(&self.layers, self.standardizer.transform(x)?);
        Ok(self.target.inverse(pass.output.column(0)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
