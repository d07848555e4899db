//! Data domain: applicant records, dataset loading and synthetic fixtures.

pub mod domain;
pub mod repo_fs;
pub mod service;
pub mod synth;

pub use domain::{Category, DataRepo, Dataset, Education, Gender, RawRecord, RawValue, Zone};
