//! Fairness-aware evaluation.

pub mod domain;
pub mod service;

pub use domain::{EvaluationResult, FairnessPolicy, OneHotFairnessPolicy};
