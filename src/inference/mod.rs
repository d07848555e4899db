//! Inference domain: single-record predictions from the persisted artifact.

pub mod domain;
pub mod service;

pub use domain::{PredictRequest, Prediction};
