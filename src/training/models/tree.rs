//! CART decision tree with Gini impurity.

use ndarray::Array2;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::common::error::HireResult;

use super::{check_training_input, Classifier};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    Leaf {
        positive_rate: f64,
        samples: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn probability(&self, row: &[f64]) -> f64 {
        let mut node = self;
        loop {
            match node {
                Node::Leaf { positive_rate, .. } => return *positive_rate,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    };
                }
            }
        }
    }

    fn is_finite(&self) -> bool {
        match self {
            Node::Leaf { positive_rate, .. } => positive_rate.is_finite(),
            Node::Split {
                threshold,
                left,
                right,
                ..
            } => threshold.is_finite() && left.is_finite() && right.is_finite(),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub max_depth: usize,
    pub min_samples_split: usize,
    /// Features considered per split; `None` means all of them.
    pub max_features: Option<usize>,
    pub seed: u64,
    width: usize,
    root: Option<Node>,
}

impl DecisionTree {
    pub fn new(max_depth: usize, seed: u64) -> Self {
        Self {
            max_depth,
            min_samples_split: 2,
            max_features: None,
            seed,
            width: 0,
            root: None,
        }
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// Fit on the given subset of rows (repeats allowed, as in a bootstrap sample).
    pub(crate) fn fit_rows(&mut self, x: &Array2<f64>, y: &[bool], rows: Vec<usize>) {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.width = x.ncols();
        self.root = Some(self.grow(x, y, rows, 0, &mut rng));
    }

    fn grow(
        &self,
        x: &Array2<f64>,
        y: &[bool],
        rows: Vec<usize>,
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> Node {
        let positives = rows.iter().filter(|&&r| y[r]).count();
        let leaf = Node::Leaf {
            positive_rate: if rows.is_empty() {
                0.0
            } else {
                positives as f64 / rows.len() as f64
            },
            samples: rows.len(),
        };

        if depth >= self.max_depth
            || rows.len() < self.min_samples_split
            || positives == 0
            || positives == rows.len()
        {
            return leaf;
        }

        let mut features: Vec<usize> = (0..x.ncols()).collect();
        if let Some(k) = self.max_features {
            features.shuffle(rng);
            features.truncate(k.clamp(1, x.ncols()));
        }

        let Some((feature, threshold)) = best_split(x, y, &rows, positives, &features) else {
            return leaf;
        };

        let (left, right): (Vec<usize>, Vec<usize>) =
            rows.into_iter().partition(|&r| x[[r, feature]] <= threshold);

        Node::Split {
            feature,
            threshold,
            left: Box::new(self.grow(x, y, left, depth + 1, rng)),
            right: Box::new(self.grow(x, y, right, depth + 1, rng)),
        }
    }
}

fn gini(pos: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = pos as f64 / total as f64;
    2.0 * p * (1.0 - p)
}

/// Lowest weighted-Gini split over `features`, if any improves on the parent.
fn best_split(
    x: &Array2<f64>,
    y: &[bool],
    rows: &[usize],
    positives: usize,
    features: &[usize],
) -> Option<(usize, f64)> {
    let n = rows.len();
    let parent = gini(positives, n);
    let mut best: Option<(usize, f64, f64)> = None;
    let mut pairs: Vec<(f64, bool)> = Vec::with_capacity(n);

    for &f in features {
        pairs.clear();
        pairs.extend(rows.iter().map(|&r| (x[[r, f]], y[r])));
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut left_pos = 0usize;
        for k in 0..n - 1 {
            if pairs[k].1 {
                left_pos += 1;
            }
            if pairs[k].0 == pairs[k + 1].0 {
                continue;
            }
            let left_n = k + 1;
            let right_n = n - left_n;
            let impurity = (left_n as f64 * gini(left_pos, left_n)
                + right_n as f64 * gini(positives - left_pos, right_n))
                / n as f64;
            if impurity < parent - 1e-12 && best.map_or(true, |(_, _, b)| impurity < b) {
                let threshold = (pairs[k].0 + pairs[k + 1].0) / 2.0;
                best = Some((f, threshold, impurity));
            }
        }
    }

    best.map(|(f, t, _)| (f, t))
}

impl Classifier for DecisionTree {
    fn fit(&mut self, x: &Array2<f64>, y: &[bool]) -> HireResult<()> {
        check_training_input(x, y)?;
        self.fit_rows(x, y, (0..x.nrows()).collect());
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
        let root = self.root.as_ref()?;
        Some(
            x.rows()
                .into_iter()
                .map(|row| root.probability(&row.to_vec()))
                .collect(),
        )
    }

    fn input_width(&self) -> usize {
        self.width
    }

    fn is_finite(&self) -> bool {
        self.root.as_ref().map_or(true, Node::is_finite)
    }
}
