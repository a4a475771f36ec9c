//! Regression model behind the pipeline.
//!
//! The pipeline only relies on [`Estimator`] and [`Predictor`]; the shipped
//! implementation is a closed-form ridge regression.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use crate::error::PipelineError;

/// A fitted model scoring one feature vector at a time.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &[f64]) -> f64;

    fn predict_batch(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        rows.iter().map(|row| self.predict(row)).collect()
    }
}

/// Something that can be fit on a feature matrix and target vector.
pub trait Estimator {
    type Model: Predictor;

    fn fit(&self, features: &[Vec<f64>], targets: &[f64]) -> Result<Self::Model, PipelineError>;
}

// ---------------------------------------------------------------------------
// Ridge regression
// ---------------------------------------------------------------------------

/// L2-penalized least squares. The intercept is not penalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RidgeRegression {
    pub penalty: f64,
}

impl Default for RidgeRegression {
    fn default() -> Self {
        RidgeRegression { penalty: 0.1 }
    }
}

/// Linear model with bias.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl Predictor for LinearModel {
    fn predict(&self, features: &[f64]) -> f64 {
        features
            .iter()
            .zip(&self.weights)
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.bias
    }
}

impl Estimator for RidgeRegression {
    type Model = LinearModel;

    fn fit(&self, features: &[Vec<f64>], targets: &[f64]) -> Result<LinearModel, PipelineError> {
        if features.is_empty() {
            return Err(PipelineError::EmptyDataset);
        }
        if features.len() != targets.len() {
            return Err(PipelineError::Training(format!(
                "{} feature rows but {} targets",
                features.len(),
                targets.len()
            )));
        }
        if self.penalty <= 0.0 {
            return Err(PipelineError::Training("ridge penalty must be positive".into()));
        }
        let dim = features[0].len();
        if features.iter().any(|row| row.len() != dim) {
            return Err(PipelineError::Training("ragged feature matrix".into()));
        }

        let n = features.len() as f64;
        let x_mean: Vec<f64> = (0..dim)
            .map(|j| features.iter().map(|row| row[j]).sum::<f64>() / n)
            .collect();
        let y_mean = targets.iter().sum::<f64>() / n;

        // centered normal equations: (XᵀX + λI) w = Xᵀy
        let mut gram = vec![vec![0.0; dim]; dim];
        let mut rhs = vec![0.0; dim];
        for (row, y) in features.iter().zip(targets) {
            let centered: Vec<f64> = row.iter().zip(&x_mean).map(|(x, m)| x - m).collect();
            let yc = y - y_mean;
            for i in 0..dim {
                rhs[i] += centered[i] * yc;
                for j in i..dim {
                    gram[i][j] += centered[i] * centered[j];
                }
            }
        }
        for i in 0..dim {
            for j in 0..i {
                gram[i][j] = gram[j][i];
            }
            gram[i][i] += self.penalty;
        }

        let weights = solve(gram, rhs)?;
        let bias = y_mean - weights.iter().zip(&x_mean).map(|(w, m)| w * m).sum::<f64>();
        Ok(LinearModel { weights, bias })
    }
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, PipelineError> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < 1e-12 {
            return Err(PipelineError::Training("singular system".into()));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Ok(x)
}

// ---------------------------------------------------------------------------
// Hold-out evaluation
// ---------------------------------------------------------------------------

/// Row indices of a seeded train/test split. Tables under five rows are
/// used entirely for training.
pub fn holdout_split(rows: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..rows).collect();
    if rows < 5 || test_fraction <= 0.0 {
        return (indices, Vec::new());
    }
    indices.shuffle(&mut StdRng::seed_from_u64(seed));
    let test_len = ((rows as f64) * test_fraction.min(0.5)).ceil() as usize;
    let train = indices.split_off(test_len);
    (train, indices)
}

/// Hold-out quality of a fitted model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub samples: usize,
    pub mean_absolute_error: f64,
    pub r_squared: f64,
}

pub fn evaluate<P: Predictor + ?Sized>(model: &P, features: &[Vec<f64>], targets: &[f64]) -> Evaluation {
    let predictions = model.predict_batch(features);
    let n = targets.len().max(1) as f64;
    let mean = targets.iter().sum::<f64>() / n;
    let mae = predictions
        .iter()
        .zip(targets)
        .map(|(p, y)| (p - y).abs())
        .sum::<f64>()
        / n;
    let ss_res: f64 = predictions.iter().zip(targets).map(|(p, y)| (y - p).powi(2)).sum();
    let ss_tot: f64 = targets.iter().map(|y| (y - mean).powi(2)).sum();
    Evaluation {
        samples: targets.len(),
        mean_absolute_error: mae,
        r_squared: if ss_tot == 0.0 { 0.0 } else { 1.0 - ss_res / ss_tot },
    }
}
