//! Bagged CART ensemble with sqrt-feature subsampling.

use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::common::error::HireResult;

use super::tree::DecisionTree;
use super::{check_training_input, Classifier};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_trees: usize,
    pub max_depth: usize,
    pub seed: u64,
    width: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(n_trees: usize, max_depth: usize, seed: u64) -> Self {
        Self {
            n_trees,
            max_depth,
            seed,
            width: 0,
            trees: Vec::new(),
        }
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }
}

impl Classifier for RandomForest {
    fn fit(&mut self, x: &Array2<f64>, y: &[bool]) -> HireResult<()> {
        check_training_input(x, y)?;
        let n = x.nrows();
        let max_features = ((x.ncols() as f64).sqrt().ceil() as usize).max(1);
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);

        self.trees = (0..self.n_trees)
            .map(|t| {
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                let mut tree = DecisionTree::new(self.max_depth, self.seed.wrapping_add(t as u64 + 1));
                tree.max_features = Some(max_features);
                tree.fit_rows(x, y, sample);
                tree
            })
            .collect();
        self.width = x.ncols();
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Vec<bool> {
        self.predict_probability(x)
            .unwrap_or_default()
            .into_iter()
            .map(|p| p >= 0.5)
            .collect()
    }

    fn predict_probability(&self, x: &Array2<f64>) -> Option<Vec<f64>> {
        if self.trees.is_empty() {
            return None;
        }
        let mut acc = vec![0.0; x.nrows()];
        for tree in &self.trees {
            for (sum, p) in acc.iter_mut().zip(tree.predict_probability(x)?) {
                *sum += p;
            }
        }
        let k = self.trees.len() as f64;
        Some(acc.into_iter().map(|s| s / k).collect())
    }

    fn input_width(&self) -> usize {
        self.width
    }

    fn is_finite(&self) -> bool {
        self.trees.iter().all(|t| t.is_finite())
    }
}
