//! Logistic regression fitted with full-batch gradient descent.

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::common::error::HireResult;

use super::{check_training_input, sigmoid, Classifier};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogisticClassifier {
    pub epochs: usize,
    pub learning_rate: f64,
    pub l2: f64,
    weights: Vec<f64>,
    bias: f64,
}

impl Default for LogisticClassifier {
    fn default() -> Self {
        Self {
            epochs: 400,
            learning_rate: 0.5,
            l2: 1e-4,
            weights: Vec::new(),
            bias: 0.0,
        }
    }
}

impl LogisticClassifier {
    fn decision(&self, x: &Array2<f64>) -> Array1<f64> {
        x.dot(&ArrayView1::from(&self.weights[..])) + self.bias
    }
}

impl Classifier for LogisticClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &[bool]) -> HireResult<()> {
        check_training_input(x, y)?;
        let n = x.nrows() as f64;
        let target: Array1<f64> = y.iter().map(|&l| if l { 1.0 } else { 0.0 }).collect();
        let mut w = Array1::<f64>::zeros(x.ncols());
        let mut b = 0.0;

        for _ in 0..self.epochs {
            let p = (x.dot(&w) + b).mapv(sigmoid);
            let err = p - &target;
            let grad_w = x.t().dot(&err) / n + &w * self.l2;
            let grad_b = err.sum() / n;
            w = w - grad_w * self.learning_rate;
            b -= grad_b * self.learning_rate;
        }

        self.weights = w.to_vec();
        self.bias = b;
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Vec<bool> {
        self.decision(x).iter().map(|&z| z >= 0.0).collect()
    }

    fn predict_probability(&self, x: &Array2<f64>) -> Option<Vec<f64>> {
        Some(self.decision(x).iter().map(|&z| sigmoid(z)).collect())
    }

    fn input_width(&self) -> usize {
        self.weights.len()
    }

    fn is_finite(&self) -> bool {
        self.bias.is_finite() && self.weights.iter().all(|w| w.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn separates_a_linear_boundary() {
        let x = array![[-2.0], [-1.0], [-0.5], [0.5], [1.0], [2.0]];
        let y = [false, false, false, true, true, true];
        let mut model = LogisticClassifier::default();
        model.fit(&x, &y).unwrap();
        assert_eq!(model.predict(&x), y.to_vec());
        let p = model.predict_probability(&x).unwrap();
        assert!(p[0] < 0.5 && p[5] > 0.5);
        assert_eq!(model.input_width(), 1);
    }
}
