//! CSV-backed dataset repository.
//!
//! The header must be `age,gender,income,experience,zone,education,hired`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::config::AppCfg;
use crate::common::error::{HireError, HireResult};

use super::domain::{DataRepo, Dataset, Education, Gender, RawRecord, Zone};

/// Raw CSV columns in the exact order the file declares them.
pub const CSV_HEADER: [&str; 7] = [
    "age",
    "gender",
    "income",
    "experience",
    "zone",
    "education",
    "hired",
];

/// On-disk row. `hired` is kept as text so both `0/1` and `true/false` load.
#[derive(Debug, Deserialize, Serialize)]
struct CsvRow {
    age: i64,
    gender: Gender,
    income: f64,
    experience: i64,
    zone: Zone,
    education: Education,
    #[serde(default)]
    hired: Option<String>,
}

impl CsvRow {
    fn into_record(self, line: usize) -> HireResult<RawRecord> {
        let invalid = |msg: String| HireError::DatasetUnavailable(format!("line {line}: {msg}"));
        if !self.income.is_finite() {
            return Err(invalid(format!("`income` must be finite, got {}", self.income)));
        }
        if self.age < 0 || self.experience < 0 {
            return Err(invalid(format!(
                "`age` and `experience` must be non-negative, got {} and {}",
                self.age, self.experience
            )));
        }
        if self.experience > self.age {
            return Err(invalid(format!(
                "`experience` {} exceeds `age` {}",
                self.experience, self.age
            )));
        }
        let hired = match self.hired.as_deref().map(str::trim) {
            None | Some("") => None,
            Some("1") | Some("true") | Some("True") => Some(true),
            Some("0") | Some("false") | Some("False") => Some(false),
            Some(other) => return Err(invalid(format!("`hired` must be 0 or 1, got {other:?}"))),
        };
        Ok(RawRecord {
            age: self.age,
            gender: self.gender,
            income: self.income,
            experience: self.experience,
            zone: self.zone,
            education: self.education,
            hired,
        })
    }

    fn from_record(record: &RawRecord) -> Self {
        Self {
            age: record.age,
            gender: record.gender,
            income: record.income,
            experience: record.experience,
            zone: record.zone,
            education: record.education,
            hired: record.hired.map(|h| if h { "1" } else { "0" }.to_string()),
        }
    }
}

/// Filesystem repository reading the dataset at `cfg.dataset_path`.
pub struct FsDataRepo {
    path: PathBuf,
}

impl FsDataRepo {
    pub fn new(cfg: &AppCfg) -> Self {
        Self {
            path: cfg.dataset_path.clone(),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

}

impl DataRepo for FsDataRepo {
    fn load_dataset(&self) -> HireResult<Dataset> {
        let records = read_csv(&self.path)?;
        Dataset::new(records)
    }
}

/// Read every record in `path`, validating the header first.
pub fn read_csv(path: &Path) -> HireResult<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| HireError::DatasetUnavailable(format!("{}: {e}", path.display())))?;

    let headers = reader
        .headers()
        .map_err(|e| HireError::DatasetUnavailable(format!("{}: {e}", path.display())))?
        .clone();
    for column in &CSV_HEADER[..6] {
        if !headers.iter().any(|h| h == *column) {
            return Err(HireError::DatasetUnavailable(format!(
                "{}: missing column `{column}`",
                path.display()
            )));
        }
    }

    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<CsvRow>().enumerate() {
        // +2: one for the header, one for 1-based numbering.
        let line = idx + 2;
        let row = row.map_err(|e| {
            HireError::DatasetUnavailable(format!("{} line {line}: {e}", path.display()))
        })?;
        records.push(row.into_record(line)?);
    }

    debug!(path = %path.display(), rows = records.len(), "dataset read");
    Ok(records)
}

/// Write records with the canonical header, replacing any existing file.
pub fn write_csv(path: &Path, records: &[RawRecord]) -> HireResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| HireError::storage("create dataset dir", e))?;
    }
    let mut writer =
        csv::Writer::from_path(path).map_err(|e| HireError::storage("open dataset", e))?;
    for record in records {
        writer
            .serialize(CsvRow::from_record(record))
            .map_err(|e| HireError::storage("write dataset row", e))?;
    }
    writer
        .flush()
        .map_err(|e| HireError::storage("flush dataset", e))?;
    Ok(())
}
