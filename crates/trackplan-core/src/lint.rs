//! Non-fatal checks over a built graph

use std::collections::HashSet;

use serde::Serialize;

use crate::error::Error;
use crate::graph::DefinitionGraph;

/// A problem worth reporting that does not fail a run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// No event references this parameter
    UnusedParameter { parameter: String },
    /// An event lists the same parameter more than once
    RepeatedReference { event: String, parameter: String },
    /// The parameter's example does not satisfy its own rule
    ExampleRejected { parameter: String, rule: String },
    /// The rule can never be satisfied
    InvalidRule { parameter: String, reason: String },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnusedParameter { parameter } => {
                write!(f, "Parameter '{}' is not used by any event", parameter)
            }
            Self::RepeatedReference { event, parameter } => write!(
                f,
                "Event '{}' lists parameter '{}' more than once",
                event, parameter
            ),
            Self::ExampleRejected { parameter, rule } => write!(
                f,
                "Example for parameter '{}' does not satisfy {}",
                parameter, rule
            ),
            Self::InvalidRule { parameter, reason } => {
                write!(f, "Parameter '{}' has an unusable rule: {}", parameter, reason)
            }
        }
    }
}

/// Collect warnings in node order
pub fn lint(graph: &DefinitionGraph) -> Vec<Warning> {
    let mut warnings = Vec::new();

    for param in graph.parameters() {
        if graph.incoming(&param.name).is_empty() {
            warnings.push(Warning::UnusedParameter {
                parameter: param.name.clone(),
            });
        }

        let Some(rule) = &param.validation else {
            continue;
        };
        if let Err(Error::InvalidRule(reason)) = rule.check() {
            warnings.push(Warning::InvalidRule {
                parameter: param.name.clone(),
                reason,
            });
            continue;
        }
        // An empty example means none was given
        if !param.example.is_empty() && !rule.accepts(&param.example).unwrap_or(false) {
            warnings.push(Warning::ExampleRejected {
                parameter: param.name.clone(),
                rule: rule.to_string(),
            });
        }
    }

    for event in graph.events() {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for param in &event.parameters {
            if !seen.insert(param.as_str()) && reported.insert(param.as_str()) {
                warnings.push(Warning::RepeatedReference {
                    event: event.name.clone(),
                    parameter: param.clone(),
                });
            }
        }
    }

    for warning in &warnings {
        tracing::debug!("Lint: {}", warning);
    }

    warnings
}
