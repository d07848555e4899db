//! Prediction requests and results.

use serde::{Deserialize, Serialize};

use crate::common::error::{HireError, HireResult};
use crate::data::domain::{Category, Education, Gender, RawRecord, Zone};

/// Prediction request; every absent field takes the documented default.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PredictRequest {
    pub age: i64,
    pub gender: String,
    pub income: f64,
    pub experience: i64,
    pub zone: String,
    pub education: String,
}

impl Default for PredictRequest {
    fn default() -> Self {
        Self {
            age: 30,
            gender: "M".to_string(),
            income: 2000.0,
            experience: 5,
            zone: "Center".to_string(),
            education: "HighSchool".to_string(),
        }
    }
}

impl PredictRequest {
    pub fn parse(raw: &str) -> HireResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| HireError::malformed(format!("prediction request: {e}")))
    }

    /// Validate categorical fields against their domains.
    pub fn into_record(self) -> HireResult<RawRecord> {
        Ok(RawRecord {
            age: self.age,
            gender: Gender::parse(&self.gender)?,
            income: self.income,
            experience: self.experience,
            zone: Zone::parse(&self.zone)?,
            education: Education::parse(&self.education)?,
            hired: None,
        })
    }
}

/// Single-record prediction.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Prediction {
    /// `0` or `1`.
    pub prediction: u8,
    /// Positive-class probability in percent, one decimal; absent for
    /// variants without calibrated output.
    pub confidence: Option<f64>,
    pub features_used: Vec<String>,
}
