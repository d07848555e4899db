//! Error handling primitives shared across the core.
//!
//! Every failure the pipeline can report maps onto one [`HireError`] variant,
//! and every variant carries a stable [`HireCode`] that the invocation
//! boundary renders into the structured error response.

use thiserror::Error;

/// Stable error codes that cross the process boundary.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum HireCode {
    /// Structured input could not be parsed or failed validation.
    MalformedRequest = 1,
    /// A feature key or encoded column is not declared in the schema.
    UnknownFeatureKey = 2,
    /// The requested keys resolved to zero encoded columns.
    NoValidFeatures = 3,
    /// `model_type` does not name a supported classifier.
    UnsupportedModelVariant = 4,
    /// No artifact has been saved yet.
    ArtifactNotFound = 5,
    /// The persisted model and its feature list disagree on width.
    ModelArtifactMismatch = 6,
    /// The tabular dataset is missing or malformed.
    DatasetUnavailable = 7,
    /// Catch-all for persistence failures.
    Storage = 8,
}

impl HireCode {
    /// Machine readable name used in error payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            HireCode::MalformedRequest => "malformed_request",
            HireCode::UnknownFeatureKey => "unknown_feature_key",
            HireCode::NoValidFeatures => "no_valid_features",
            HireCode::UnsupportedModelVariant => "unsupported_model_variant",
            HireCode::ArtifactNotFound => "artifact_not_found",
            HireCode::ModelArtifactMismatch => "model_artifact_mismatch",
            HireCode::DatasetUnavailable => "dataset_unavailable",
            HireCode::Storage => "storage",
        }
    }
}

/// Canonical error type for the core.
#[derive(Error, Debug)]
pub enum HireError {
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("unknown feature key: {0}")]
    UnknownFeatureKey(String),

    #[error("no valid features requested")]
    NoValidFeatures,

    #[error("unsupported model variant: {0}")]
    UnsupportedModelVariant(String),

    #[error("model artifact not found: {0}")]
    ArtifactNotFound(String),

    /// The fitted model expects `expected` inputs but the feature list has `actual`.
    #[error("model expects {expected} input columns but feature list has {actual}")]
    ModelArtifactMismatch { expected: usize, actual: usize },

    #[error("dataset unavailable: {0}")]
    DatasetUnavailable(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Result alias used throughout the crate.
pub type HireResult<T> = Result<T, HireError>;

impl HireError {
    /// Stable code for this error.
    pub fn code(&self) -> HireCode {
        match self {
            HireError::MalformedRequest(_) => HireCode::MalformedRequest,
            HireError::UnknownFeatureKey(_) => HireCode::UnknownFeatureKey,
            HireError::NoValidFeatures => HireCode::NoValidFeatures,
            HireError::UnsupportedModelVariant(_) => HireCode::UnsupportedModelVariant,
            HireError::ArtifactNotFound(_) => HireCode::ArtifactNotFound,
            HireError::ModelArtifactMismatch { .. } => HireCode::ModelArtifactMismatch,
            HireError::DatasetUnavailable(_) => HireCode::DatasetUnavailable,
            HireError::Storage(_) => HireCode::Storage,
        }
    }

    /// Validation helper.
    pub fn malformed(msg: impl Into<String>) -> Self {
        HireError::MalformedRequest(msg.into())
    }

    /// Persistence helper, keeps the underlying cause in the message.
    pub fn storage(ctx: &str, err: impl std::fmt::Display) -> Self {
        HireError::Storage(format!("{ctx}: {err}"))
    }
}
