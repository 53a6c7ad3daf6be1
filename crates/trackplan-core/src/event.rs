//! Event definitions

use serde::{Deserialize, Serialize};

use crate::aggregate::null_as_empty;

/// A named occurrence that references parameters by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event name (unique across all definition files)
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Screenshot paths or URLs, in display order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub screenshots: Vec<String>,

    /// Names of the parameters this event uses, resolved when the graph is built
    #[serde(default, deserialize_with = "null_as_empty")]
    pub parameters: Vec<String>,
}

impl Event {
    /// Create a new event
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            screenshots: Vec::new(),
            parameters: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_screenshot(mut self, screenshot: impl Into<String>) -> Self {
        self.screenshots.push(screenshot.into());
        self
    }

    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameters.push(parameter.into());
        self
    }
}
