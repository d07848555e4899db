//! Static feature schema: raw columns and their encoded expansion.
//!
//! Column existence is fixed here, never derived from which rows happen to
//! appear in a batch.

use crate::common::error::{HireError, HireResult};
use crate::data::domain::{Category, Education, Gender, Zone};

/// How a raw attribute turns into encoded columns.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FeatureKind {
    /// Passed through as a single column named after the key.
    Numeric,
    /// One indicator column per domain value, in domain order.
    Categorical(&'static [&'static str]),
}

/// One schema entry.
#[derive(Copy, Clone, Debug)]
pub struct FeatureSpec {
    pub key: &'static str,
    pub kind: FeatureKind,
}

/// Source of a single encoded column.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ColumnRef {
    Numeric { key: &'static str },
    OneHot { key: &'static str, value: &'static str },
}

impl ColumnRef {
    pub fn key(&self) -> &'static str {
        match self {
            ColumnRef::Numeric { key } | ColumnRef::OneHot { key, .. } => key,
        }
    }
}

static REGISTRY: [FeatureSpec; 6] = [
    FeatureSpec {
        key: "age",
        kind: FeatureKind::Numeric,
    },
    FeatureSpec {
        key: "gender",
        kind: FeatureKind::Categorical(Gender::DOMAIN),
    },
    FeatureSpec {
        key: "income",
        kind: FeatureKind::Numeric,
    },
    FeatureSpec {
        key: "experience",
        kind: FeatureKind::Numeric,
    },
    FeatureSpec {
        key: "zone",
        kind: FeatureKind::Categorical(Zone::DOMAIN),
    },
    FeatureSpec {
        key: "education",
        kind: FeatureKind::Categorical(Education::DOMAIN),
    },
];

/// Immutable registry over the fixed applicant schema.
#[derive(Copy, Clone, Debug)]
pub struct FeatureSchema {
    specs: &'static [FeatureSpec],
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Name of the indicator column for `value` of categorical `key`.
pub fn one_hot_name(key: &str, value: &str) -> String {
    format!("{key}_{value}")
}

impl FeatureSchema {
    /// The applicant schema every component shares.
    pub fn canonical() -> Self {
        Self { specs: &REGISTRY }
    }

    /// All declared entries, in declaration order.
    pub fn specs(&self) -> &'static [FeatureSpec] {
        self.specs
    }

    /// Look up a feature key.
    pub fn spec(&self, key: &str) -> HireResult<&'static FeatureSpec> {
        self.specs
            .iter()
            .find(|s| s.key == key)
            .ok_or_else(|| HireError::UnknownFeatureKey(key.to_string()))
    }

    /// Ordered encoded columns for `key`.
    pub fn columns_for(&self, key: &str) -> HireResult<Vec<String>> {
        let spec = self.spec(key)?;
        Ok(match spec.kind {
            FeatureKind::Numeric => vec![spec.key.to_string()],
            FeatureKind::Categorical(domain) => domain
                .iter()
                .map(|value| one_hot_name(spec.key, value))
                .collect(),
        })
    }

    /// Expand keys into encoded columns: key order first, then intra-feature order.
    ///
    /// Repeated keys are only expanded once.
    pub fn expand(&self, keys: &[String]) -> HireResult<Vec<String>> {
        let mut seen: Vec<&str> = Vec::with_capacity(keys.len());
        let mut columns = Vec::new();
        for key in keys {
            let key = key.as_str();
            if seen.contains(&key) {
                continue;
            }
            columns.extend(self.columns_for(key)?);
            seen.push(key);
        }
        Ok(columns)
    }

    /// Map an encoded column name back to the attribute that produces it.
    pub fn resolve_column(&self, name: &str) -> HireResult<ColumnRef> {
        for spec in self.specs {
            match spec.kind {
                FeatureKind::Numeric if spec.key == name => {
                    return Ok(ColumnRef::Numeric { key: spec.key });
                }
                FeatureKind::Categorical(domain) => {
                    let Some(suffix) = name
                        .strip_prefix(spec.key)
                        .and_then(|rest| rest.strip_prefix('_'))
                    else {
                        continue;
                    };
                    if let Some(value) = domain.iter().copied().find(|v| *v == suffix) {
                        return Ok(ColumnRef::OneHot {
                            key: spec.key,
                            value,
                        });
                    }
                }
                _ => {}
            }
        }
        Err(HireError::UnknownFeatureKey(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorical_keys_expand_in_domain_order() {
        let schema = FeatureSchema::canonical();
        assert_eq!(
            schema.columns_for("zone").unwrap(),
            vec!["zone_Center", "zone_Periphery", "zone_Suburb"]
        );
        assert_eq!(
            schema.columns_for("education").unwrap(),
            vec![
                "education_None",
                "education_HighSchool",
                "education_Degree",
                "education_Master"
            ]
        );
    }

    #[test]
    fn numeric_keys_map_to_themselves() {
        let schema = FeatureSchema::canonical();
        assert_eq!(schema.columns_for("income").unwrap(), vec!["income"]);
    }

    #[test]
    fn unknown_key_is_an_error() {
        let schema = FeatureSchema::canonical();
        let err = schema.columns_for("salary").unwrap_err();
        assert!(matches!(err, HireError::UnknownFeatureKey(k) if k == "salary"));
        // The label is not a feature.
        assert!(schema.columns_for("hired").is_err());
    }

    #[test]
    fn expand_keeps_request_order_and_dedups() {
        let schema = FeatureSchema::canonical();
        let keys: Vec<String> = ["gender", "age", "gender"].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            schema.expand(&keys).unwrap(),
            vec!["gender_M", "gender_F", "age"]
        );
    }

    #[test]
    fn resolve_column_inverts_expansion() {
        let schema = FeatureSchema::canonical();
        for spec in schema.specs() {
            for column in schema.columns_for(spec.key).unwrap() {
                assert_eq!(schema.resolve_column(&column).unwrap().key(), spec.key);
            }
        }
        assert_eq!(
            schema.resolve_column("education_None").unwrap(),
            ColumnRef::OneHot {
                key: "education",
                value: "None"
            }
        );
        assert!(schema.resolve_column("zone_Downtown").is_err());
        assert!(schema.resolve_column("zone").is_err());
    }
}
