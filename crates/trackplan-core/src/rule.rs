//! Value validation rules attached to parameters

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Validation rule for a parameter value
///
/// Closed set of shapes, tagged by `type` in definition files. Unknown tags
/// fail deserialization, so a typo surfaces as a parse error instead of a
/// silently dropped rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ValidationRule {
    /// Value must be one of a fixed set
    Enum {
        #[serde(deserialize_with = "scalar_strings")]
        values: Vec<String>,
    },
    /// Value must match a regular expression
    Regex {
        #[serde(deserialize_with = "scalar_string")]
        pattern: String,
    },
    GreaterThan { value: f64 },
    GreaterThanOrEqual { value: f64 },
    LessThan { value: f64 },
    LessThanOrEqual { value: f64 },
    /// Inclusive range
    Between { min: f64, max: f64 },
}

/// A YAML scalar read as its text
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(s) => s,
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(n) => n.to_string(),
            Scalar::Uint(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
        }
    }
}

fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(String::from)
}

fn scalar_strings<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Scalar>::deserialize(deserializer)?;
    Ok(values.into_iter().map(String::from).collect())
}

impl ValidationRule {
    /// Tag used for this rule in definition files
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Enum { .. } => "enum",
            Self::Regex { .. } => "regex",
            Self::GreaterThan { .. } => "greaterThan",
            Self::GreaterThanOrEqual { .. } => "greaterThanOrEqual",
            Self::LessThan { .. } => "lessThan",
            Self::LessThanOrEqual { .. } => "lessThanOrEqual",
            Self::Between { .. } => "between",
        }
    }

    /// Check that the rule itself can ever be satisfied
    pub fn check(&self) -> Result<()> {
        match self {
            Self::Enum { values } if values.is_empty() => {
                Err(Error::InvalidRule("enum has no values".to_string()))
            }
            Self::Regex { pattern } => Regex::new(pattern)
                .map(|_| ())
                .map_err(|e| Error::InvalidRule(format!("bad pattern {:?}: {}", pattern, e))),
            Self::Between { min, max } if min > max => Err(Error::InvalidRule(format!(
                "between min {} is greater than max {}",
                min, max
            ))),
            _ => Ok(()),
        }
    }

    /// Whether `value` satisfies this rule
    ///
    /// Numeric rules parse the value as a float; anything unparsable is
    /// rejected. Regex rules use search semantics (anchors belong in the
    /// pattern).
    pub fn accepts(&self, value: &str) -> Result<bool> {
        let number = || value.trim().parse::<f64>().ok();
        let accepted = match self {
            Self::Enum { values } => values.iter().any(|v| v == value),
            Self::Regex { pattern } => {
                let re = Regex::new(pattern).map_err(|e| {
                    Error::InvalidRule(format!("bad pattern {:?}: {}", pattern, e))
                })?;
                re.is_match(value)
            }
            Self::GreaterThan { value: bound } => number().is_some_and(|n| n > *bound),
            Self::GreaterThanOrEqual { value: bound } => number().is_some_and(|n| n >= *bound),
            Self::LessThan { value: bound } => number().is_some_and(|n| n < *bound),
            Self::LessThanOrEqual { value: bound } => number().is_some_and(|n| n <= *bound),
            Self::Between { min, max } => number().is_some_and(|n| n >= *min && n <= *max),
        };
        Ok(accepted)
    }
}

impl std::fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enum { values } => write!(f, "enum [{}]", values.join(", ")),
            Self::Regex { pattern } => write!(f, "regex /{}/", pattern),
            Self::GreaterThan { value }
            | Self::GreaterThanOrEqual { value }
            | Self::LessThan { value }
            | Self::LessThanOrEqual { value } => write!(f, "{} {}", self.kind(), value),
            Self::Between { min, max } => write!(f, "between {} and {}", min, max),
        }
    }
}
