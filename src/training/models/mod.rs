//! Classifier variants behind one capability surface.

pub mod forest;
pub mod logistic;
pub mod svm;
pub mod tree;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::common::error::{HireError, HireResult};

pub use forest::RandomForest;
pub use logistic::LogisticClassifier;
pub use svm::SupportVectorClassifier;
pub use tree::DecisionTree;

/// Uniform surface every variant exposes.
///
/// `predict` and `predict_probability` assume `x` has `input_width()` columns;
/// callers validate that first.
pub trait Classifier {
    fn fit(&mut self, x: &Array2<f64>, y: &[bool]) -> HireResult<()>;
    fn predict(&self, x: &Array2<f64>) -> Vec<bool>;
    /// Positive-class probability per row, `None` when the variant has no calibrated output.
    fn predict_probability(&self, x: &Array2<f64>) -> Option<Vec<f64>>;
    fn input_width(&self) -> usize;
    /// False when any fitted parameter is NaN or infinite.
    fn is_finite(&self) -> bool;
}

/// Closed set of fitted variants, serialisable as one artifact blob.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum FittedClassifier {
    Logistic(LogisticClassifier),
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
    Svm(SupportVectorClassifier),
}

impl FittedClassifier {
    fn inner(&self) -> &dyn Classifier {
        match self {
            FittedClassifier::Logistic(m) => m,
            FittedClassifier::DecisionTree(m) => m,
            FittedClassifier::RandomForest(m) => m,
            FittedClassifier::Svm(m) => m,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Classifier {
        match self {
            FittedClassifier::Logistic(m) => m,
            FittedClassifier::DecisionTree(m) => m,
            FittedClassifier::RandomForest(m) => m,
            FittedClassifier::Svm(m) => m,
        }
    }
}

impl Classifier for FittedClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &[bool]) -> HireResult<()> {
        self.inner_mut().fit(x, y)
    }

    fn predict(&self, x: &Array2<f64>) -> Vec<bool> {
        self.inner().predict(x)
    }

    fn predict_probability(&self, x: &Array2<f64>) -> Option<Vec<f64>> {
        self.inner().predict_probability(x)
    }

    fn input_width(&self) -> usize {
        self.inner().input_width()
    }

    fn is_finite(&self) -> bool {
        self.inner().is_finite()
    }
}

pub(crate) fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

pub(crate) fn check_training_input(x: &Array2<f64>, y: &[bool]) -> HireResult<()> {
    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(HireError::malformed("cannot fit on an empty matrix"));
    }
    if x.nrows() != y.len() {
        return Err(HireError::malformed(format!(
            "{} rows but {} labels",
            x.nrows(),
            y.len()
        )));
    }
    Ok(())
}
