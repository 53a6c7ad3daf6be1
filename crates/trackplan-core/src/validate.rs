//! Name uniqueness validation

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::aggregate::Aggregate;

/// Which names must be mutually unique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NamespacePolicy {
    /// Parameters and events share one namespace
    #[default]
    Shared,
    /// Parameters and events are checked independently
    Separate,
}

impl std::str::FromStr for NamespacePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shared" => Ok(Self::Shared),
            "separate" => Ok(Self::Separate),
            other => Err(format!(
                "Unknown namespace policy: {} (expected shared or separate)",
                other
            )),
        }
    }
}

// Config files go through the same parser as the command line
impl<'de> Deserialize<'de> for NamespacePolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for NamespacePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shared => write!(f, "shared"),
            Self::Separate => write!(f, "separate"),
        }
    }
}

/// Validation error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateParameterName(String),
    DuplicateEventName(String),
}

impl ValidationError {
    /// The name that collided
    pub fn name(&self) -> &str {
        match self {
            Self::DuplicateParameterName(name) | Self::DuplicateEventName(name) => name,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateParameterName(name) => write!(f, "Duplicate parameter name: {}", name),
            Self::DuplicateEventName(name) => write!(f, "Duplicate event name: {}", name),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check that every parameter and event name is unique
///
/// Every repeated sighting produces one error, so a name declared three
/// times yields two. An empty result means the aggregate may be turned into
/// a graph.
pub fn validate(aggregate: &Aggregate, policy: NamespacePolicy) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for param in &aggregate.parameters {
        if !seen.insert(param.name.as_str()) {
            errors.push(ValidationError::DuplicateParameterName(param.name.clone()));
        }
    }

    if policy == NamespacePolicy::Separate {
        seen.clear();
    }

    for event in &aggregate.events {
        if !seen.insert(event.name.as_str()) {
            errors.push(ValidationError::DuplicateEventName(event.name.clone()));
        }
    }

    tracing::debug!(
        "Validated {} names ({} namespace): {} error(s)",
        aggregate.parameters.len() + aggregate.events.len(),
        policy,
        errors.len()
    );

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::parameter::Parameter;

    fn aggregate(params: &[&str], events: &[&str]) -> Aggregate {
        Aggregate {
            parameters: params.iter().map(|n| Parameter::new(*n, "string")).collect(),
            events: events.iter().map(|n| Event::new(*n)).collect(),
        }
    }

    #[test]
    fn test_valid_aggregate() {
        let data = aggregate(&["age", "plan"], &["signup", "login"]);
        assert!(validate(&data, NamespacePolicy::Shared).is_empty());
    }

    #[test]
    fn test_every_repeat_is_reported() {
        let data = aggregate(&["age", "age", "plan", "age"], &["signup", "signup"]);
        let errors = validate(&data, NamespacePolicy::Shared);

        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "Duplicate parameter name: age",
                "Duplicate parameter name: age",
                "Duplicate event name: signup",
            ]
        );
    }

    #[test]
    fn test_shared_namespace_collision() {
        let data = aggregate(&["checkout"], &["checkout"]);

        let errors = validate(&data, NamespacePolicy::Shared);
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateEventName("checkout".to_string())]
        );

        assert!(validate(&data, NamespacePolicy::Separate).is_empty());
    }

    #[test]
    fn test_validation_does_not_mutate_and_is_repeatable() {
        let data = aggregate(&["age", "age"], &[]);
        let before = data.clone();

        let first = validate(&data, NamespacePolicy::Shared);
        let second = validate(&data, NamespacePolicy::Shared);

        assert_eq!(first, second);
        assert_eq!(data, before);
        assert_eq!(first[0].name(), "age");
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("Shared".parse::<NamespacePolicy>(), Ok(NamespacePolicy::Shared));
        assert_eq!("separate".parse::<NamespacePolicy>(), Ok(NamespacePolicy::Separate));
        assert!("global".parse::<NamespacePolicy>().is_err());
    }

    #[test]
    fn test_policy_deserialize_matches_parsing() {
        let policy: NamespacePolicy = serde_yaml_ng::from_str("Shared").unwrap();
        assert_eq!(policy, NamespacePolicy::Shared);
        let policy: NamespacePolicy = serde_yaml_ng::from_str("SEPARATE").unwrap();
        assert_eq!(policy, NamespacePolicy::Separate);
        assert!(serde_yaml_ng::from_str::<NamespacePolicy>("global").is_err());
    }
}
