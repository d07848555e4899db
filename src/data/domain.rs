//! Applicant records and their categorical domains.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::common::error::{HireError, HireResult};

/// A categorical attribute with a fixed, ordered value domain.
pub trait Category: Copy + Sized + 'static {
    /// Every legal value, in declaration order.
    const DOMAIN: &'static [&'static str];

    /// Canonical spelling of this value.
    fn as_str(&self) -> &'static str;

    /// Parse a value, rejecting anything outside `DOMAIN`.
    fn parse(raw: &str) -> HireResult<Self>;
}

macro_rules! category {
    ($(#[$meta:meta])* $name:ident, $field:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl Category for $name {
            const DOMAIN: &'static [&'static str] = &[$($text),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            fn parse(raw: &str) -> HireResult<Self> {
                match raw {
                    $($text => Ok($name::$variant),)+
                    other => Err(HireError::malformed(format!(
                        "{} must be one of {:?}, got {:?}",
                        $field,
                        Self::DOMAIN,
                        other
                    ))),
                }
            }
        }

        impl FromStr for $name {
            type Err = HireError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as Category>::parse(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                <Self as Category>::parse(raw.trim()).map_err(serde::de::Error::custom)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

category!(
    /// Applicant gender.
    Gender, "gender" { M => "M", F => "F" }
);

category!(
    /// Residential zone.
    Zone, "zone" {
        Center => "Center",
        Periphery => "Periphery",
        Suburb => "Suburb",
    }
);

category!(
    /// Highest completed education.
    Education, "education" {
        Nothing => "None",
        HighSchool => "HighSchool",
        Degree => "Degree",
        Master => "Master",
    }
);

/// One applicant. `hired` is only present in training data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub age: i64,
    pub gender: Gender,
    pub income: f64,
    pub experience: i64,
    pub zone: Zone,
    pub education: Education,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hired: Option<bool>,
}

/// A raw attribute value as seen by the encoder.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RawValue {
    Number(f64),
    Category(&'static str),
}

impl RawRecord {
    /// Look up the attribute named `key`; `None` for keys that are not raw columns.
    pub fn value_of(&self, key: &str) -> Option<RawValue> {
        let value = match key {
            "age" => RawValue::Number(self.age as f64),
            "income" => RawValue::Number(self.income),
            "experience" => RawValue::Number(self.experience as f64),
            "gender" => RawValue::Category(self.gender.as_str()),
            "zone" => RawValue::Category(self.zone.as_str()),
            "education" => RawValue::Category(self.education.as_str()),
            _ => return None,
        };
        Some(value)
    }
}

/// Loaded training data with every record labelled.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub records: Vec<RawRecord>,
}

impl Dataset {
    /// Wrap records, requiring every one of them to carry a label.
    pub fn new(records: Vec<RawRecord>) -> HireResult<Self> {
        if records.is_empty() {
            return Err(HireError::DatasetUnavailable("dataset has no rows".into()));
        }
        if let Some(idx) = records.iter().position(|r| r.hired.is_none()) {
            return Err(HireError::DatasetUnavailable(format!(
                "row {} has no `hired` label",
                idx + 1
            )));
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Labels in record order.
    pub fn labels(&self) -> Vec<bool> {
        self.records
            .iter()
            .map(|r| r.hired.unwrap_or(false))
            .collect()
    }

    /// Fraction of positive labels.
    pub fn positive_rate(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let positives = self.records.iter().filter(|r| r.hired == Some(true)).count();
        positives as f64 / self.records.len() as f64
    }
}

/// Repository contract for reading the training dataset.
pub trait DataRepo {
    fn load_dataset(&self) -> HireResult<Dataset>;
}

#[cfg(test)]
pub(crate) fn sample_record(zone: Zone, gender: Gender, hired: Option<bool>) -> RawRecord {
    RawRecord {
        age: 30,
        gender,
        income: 2000.0,
        experience: 5,
        zone,
        education: Education::HighSchool,
        hired,
    }
}
