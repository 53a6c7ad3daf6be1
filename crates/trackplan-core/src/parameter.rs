//! Parameter (leaf node) definitions

use serde::{Deserialize, Serialize};

use crate::rule::ValidationRule;

/// A named, typed attribute that events can reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name (unique across all definition files)
    pub name: String,

    /// Declared data type tag, free-form
    #[serde(rename = "type", default)]
    pub param_type: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Illustrative value
    #[serde(default)]
    pub example: String,

    /// Optional rule values must satisfy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRule>,
}

impl Parameter {
    /// Create a new parameter
    pub fn new(name: impl Into<String>, param_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            description: String::new(),
            example: String::new(),
            validation: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = example.into();
        self
    }

    pub fn with_validation(mut self, rule: ValidationRule) -> Self {
        self.validation = Some(rule);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_creation() {
        let param = Parameter::new("age", "number")
            .with_description("Age of the user")
            .with_example("42");

        assert_eq!(param.name, "age");
        assert_eq!(param.param_type, "number");
        assert_eq!(param.example, "42");
        assert!(param.validation.is_none());
    }

    #[test]
    fn test_parameter_from_yaml() {
        let yaml = r#"
name: plan
type: string
description: Subscription plan
example: pro
validation:
  type: enum
  values: [free, pro]
"#;
        let param: Parameter = serde_yaml_ng::from_str(yaml).unwrap();

        assert_eq!(param.param_type, "string");
        assert_eq!(
            param.validation,
            Some(ValidationRule::Enum {
                values: vec!["free".to_string(), "pro".to_string()]
            })
        );
    }

    #[test]
    fn test_parameter_optional_fields() {
        let param: Parameter = serde_yaml_ng::from_str("name: age\ntype: number").unwrap();
        assert!(param.description.is_empty());
        assert!(param.example.is_empty());
        assert!(param.validation.is_none());
    }
}
