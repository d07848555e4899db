//! Linear soft-margin SVM with Platt-scaled probabilities.
//!
//! Weights come from Pegasos-style hinge-loss subgradient steps over a
//! seeded shuffle of the rows. The sigmoid `p = 1 / (1 + exp(-(a*f + b)))`
//! over decision values `f` is then fitted on the training split.

use ndarray::{Array1, Array2, ArrayView1};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::common::error::HireResult;

use super::{check_training_input, sigmoid, Classifier};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SupportVectorClassifier {
    pub lambda: f64,
    pub epochs: usize,
    pub seed: u64,
    weights: Vec<f64>,
    bias: f64,
    platt_a: f64,
    platt_b: f64,
}

impl SupportVectorClassifier {
    pub fn new(seed: u64) -> Self {
        Self {
            lambda: 1e-3,
            epochs: 40,
            seed,
            weights: Vec::new(),
            bias: 0.0,
            platt_a: 1.0,
            platt_b: 0.0,
        }
    }

    fn decision(&self, x: &Array2<f64>) -> Array1<f64> {
        x.dot(&ArrayView1::from(&self.weights[..])) + self.bias
    }

    fn fit_platt(&mut self, scores: &Array1<f64>, y: &[bool]) {
        let pos = y.iter().filter(|&&l| l).count() as f64;
        let neg = y.len() as f64 - pos;
        // Platt targets: (N+ + 1) / (N+ + 2) for positives, 1 / (N- + 2) for negatives.
        let hi = (pos + 1.0) / (pos + 2.0);
        let lo = 1.0 / (neg + 2.0);
        let targets: Array1<f64> = y.iter().map(|&l| if l { hi } else { lo }).collect();
        let n = y.len() as f64;

        let (mut a, mut b) = (1.0, 0.0);
        for _ in 0..300 {
            let p = scores.mapv(|f| sigmoid(a * f + b));
            let err = p - &targets;
            a -= 0.1 * (&err * scores).sum() / n;
            b -= 0.1 * err.sum() / n;
        }
        self.platt_a = a;
        self.platt_b = b;
    }
}

impl Classifier for SupportVectorClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &[bool]) -> HireResult<()> {
        check_training_input(x, y)?;
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut order: Vec<usize> = (0..x.nrows()).collect();
        let mut w = Array1::<f64>::zeros(x.ncols());
        let mut b = 0.0;
        let mut t = 0usize;

        for _ in 0..self.epochs {
            order.shuffle(&mut rng);
            for &i in &order {
                let eta = 1.0 / (self.lambda * t as f64 + 1.0);
                let label = if y[i] { 1.0 } else { -1.0 };
                let row = x.row(i);
                let margin = label * (row.dot(&w) + b);
                w *= 1.0 - eta * self.lambda;
                if margin < 1.0 {
                    w.scaled_add(eta * label, &row);
                    b += eta * label;
                }
                t += 1;
            }
        }

        self.weights = w.to_vec();
        self.bias = b;
        let scores = self.decision(x);
        self.fit_platt(&scores, y);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Vec<bool> {
        self.decision(x).iter().map(|&f| f >= 0.0).collect()
    }

    fn predict_probability(&self, x: &Array2<f64>) -> Option<Vec<f64>> {
        Some(
            self.decision(x)
                .iter()
                .map(|&f| sigmoid(self.platt_a * f + self.platt_b))
                .collect(),
        )
    }

    fn input_width(&self) -> usize {
        self.weights.len()
    }

    fn is_finite(&self) -> bool {
        [self.bias, self.platt_a, self.platt_b]
            .iter()
            .chain(self.weights.iter())
            .all(|v| v.is_finite())
    }
}
