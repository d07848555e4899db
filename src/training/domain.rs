//! Domain types for model training and persistence.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::common::error::{HireError, HireResult};
use crate::evaluation::domain::EvaluationResult;
use crate::features::encoder::EncodedMatrix;
use crate::features::scaler::Standardizer;

use super::models::{
    Classifier, DecisionTree, FittedClassifier, LogisticClassifier, RandomForest,
    SupportVectorClassifier,
};

/// Supported classifier variants. There is no default fallback.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    LogisticClassifier,
    DecisionTree,
    RandomForest,
    SupportVectorClassifier,
}

impl ModelVariant {
    /// Canonical request spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelVariant::LogisticClassifier => "logreg",
            ModelVariant::DecisionTree => "tree",
            ModelVariant::RandomForest => "forest",
            ModelVariant::SupportVectorClassifier => "svm",
        }
    }

    /// Linear variants are fitted on standardised inputs; trees are not.
    pub fn uses_scaling(&self) -> bool {
        matches!(
            self,
            ModelVariant::LogisticClassifier | ModelVariant::SupportVectorClassifier
        )
    }

    /// Fresh, unfitted classifier for this variant.
    pub fn classifier(&self, seed: u64) -> FittedClassifier {
        match self {
            ModelVariant::LogisticClassifier => {
                FittedClassifier::Logistic(LogisticClassifier::default())
            }
            ModelVariant::DecisionTree => FittedClassifier::DecisionTree(DecisionTree::new(5, seed)),
            ModelVariant::RandomForest => {
                FittedClassifier::RandomForest(RandomForest::new(25, 8, seed))
            }
            ModelVariant::SupportVectorClassifier => {
                FittedClassifier::Svm(SupportVectorClassifier::new(seed))
            }
        }
    }
}

impl FromStr for ModelVariant {
    type Err = HireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "logreg" | "logistic" => Ok(ModelVariant::LogisticClassifier),
            "tree" | "decision_tree" => Ok(ModelVariant::DecisionTree),
            "forest" | "random_forest" => Ok(ModelVariant::RandomForest),
            "svm" | "svc" => Ok(ModelVariant::SupportVectorClassifier),
            other => Err(HireError::UnsupportedModelVariant(other.to_string())),
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Columns used when a request names no features.
pub const DEFAULT_FEATURES: [&str; 5] = ["age", "gender", "experience", "zone", "education"];
/// Sensitive attribute used when a request names none.
pub const DEFAULT_SENSITIVE: &str = "zone";

#[derive(Debug, Deserialize)]
struct TrainRequest {
    #[serde(default)]
    features: Vec<String>,
    #[serde(default)]
    model_type: Option<String>,
    #[serde(default)]
    threshold: Option<f64>,
    #[serde(default)]
    sensitive: Option<String>,
}

/// Validated training/evaluation request.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainConfig {
    pub features: Vec<String>,
    pub variant: ModelVariant,
    pub threshold: f64,
    pub sensitive: String,
}

impl TrainConfig {
    /// Parse the JSON request body, applying defaults for absent fields.
    pub fn parse(raw: &str) -> HireResult<Self> {
        let req: TrainRequest = serde_json::from_str(raw)
            .map_err(|e| HireError::malformed(format!("training request: {e}")))?;

        let features = if req.features.is_empty() {
            DEFAULT_FEATURES.iter().map(|s| s.to_string()).collect()
        } else {
            req.features
        };
        let variant = req.model_type.as_deref().unwrap_or("logreg").parse()?;
        let threshold = req.threshold.unwrap_or(0.5);
        if !(0.0..=1.0).contains(&threshold) {
            return Err(HireError::malformed(format!(
                "threshold must lie in [0, 1], got {threshold}"
            )));
        }

        Ok(Self {
            features,
            variant,
            threshold,
            sensitive: req
                .sensitive
                .unwrap_or_else(|| DEFAULT_SENSITIVE.to_string()),
        })
    }
}

/// Fitted classifier plus the exact encoded columns it consumes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    variant: ModelVariant,
    features: Vec<String>,
    scaler: Option<Standardizer>,
    classifier: FittedClassifier,
}

impl TrainedModel {
    pub(crate) fn new(
        variant: ModelVariant,
        features: Vec<String>,
        scaler: Option<Standardizer>,
        classifier: FittedClassifier,
    ) -> Self {
        Self {
            variant,
            features,
            scaler,
            classifier,
        }
    }

    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn input_width(&self) -> usize {
        self.classifier.input_width()
    }

    /// False when the classifier or the scaler holds a NaN or infinite parameter.
    pub fn is_finite(&self) -> bool {
        self.classifier.is_finite() && self.scaler.as_ref().map_or(true, Standardizer::is_finite)
    }

    /// Check the matrix matches the training column space and apply scaling.
    fn prepare(&self, matrix: &EncodedMatrix) -> HireResult<Array2<f64>> {
        if matrix.n_cols() != self.input_width() {
            return Err(HireError::ModelArtifactMismatch {
                expected: self.input_width(),
                actual: matrix.n_cols(),
            });
        }
        if matrix.columns() != self.features.as_slice() {
            return Err(HireError::malformed(
                "matrix columns differ from the model's feature list",
            ));
        }
        Ok(match &self.scaler {
            Some(scaler) => scaler.transform(matrix.values()),
            None => matrix.values().clone(),
        })
    }

    pub fn predict(&self, matrix: &EncodedMatrix) -> HireResult<Vec<bool>> {
        let x = self.prepare(matrix)?;
        Ok(self.classifier.predict(&x))
    }

    pub fn predict_probability(&self, matrix: &EncodedMatrix) -> HireResult<Option<Vec<f64>>> {
        let x = self.prepare(matrix)?;
        Ok(self.classifier.predict_probability(&x))
    }
}

/// Training metadata stored next to the model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub variant: ModelVariant,
    pub threshold: f64,
    pub trained_at: DateTime<Utc>,
    pub train_rows: usize,
    pub test_rows: usize,
    pub evaluation: Option<EvaluationResult>,
}

/// The durable pair of a fitted model and its ordered feature list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model: TrainedModel,
    pub feature_list: Vec<String>,
    pub manifest: ArtifactManifest,
}

impl ModelArtifact {
    pub fn new(model: TrainedModel, manifest: ArtifactManifest) -> Self {
        Self {
            feature_list: model.features().to_vec(),
            model,
            manifest,
        }
    }

    /// Fails with `ModelArtifactMismatch` when the model width disagrees with the feature list,
    /// and with `Storage` when a parameter or the threshold is not finite.
    pub fn validate(&self) -> HireResult<()> {
        let expected = self.model.input_width();
        if expected != self.feature_list.len() {
            return Err(HireError::ModelArtifactMismatch {
                expected,
                actual: self.feature_list.len(),
            });
        }
        if !self.manifest.threshold.is_finite() {
            return Err(HireError::Storage("artifact threshold is not finite".into()));
        }
        if !self.model.is_finite() {
            return Err(HireError::Storage(
                "artifact holds non-finite model parameters".into(),
            ));
        }
        Ok(())
    }
}

/// Persistence seam for the single current artifact.
pub trait ModelArtifactStore {
    /// Replace the current artifact as one unit.
    fn save(&self, artifact: &ModelArtifact) -> HireResult<()>;
    /// Fails with `ArtifactNotFound` when nothing has been saved.
    fn load(&self) -> HireResult<ModelArtifact>;
}
