//! Definition documents and their aggregation

use serde::{Deserialize, Deserializer, Serialize};

use crate::event::Event;
use crate::parameter::Parameter;

/// Contents of one definition file
///
/// Both lists are optional in the file; a missing or null list is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub parameters: Vec<Parameter>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub events: Vec<Event>,
}

/// Treat an explicit null list (`events:` with nothing after it) as empty
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty() && self.events.is_empty()
    }
}

/// Every parameter and event across all loaded documents
///
/// Order is document order, then declaration order. Duplicates are kept;
/// uniqueness is checked by [`crate::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub parameters: Vec<Parameter>,
    pub events: Vec<Event>,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten documents in the order given
    pub fn from_documents<I>(documents: I) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        let mut aggregate = Self::new();
        for document in documents {
            aggregate.extend(document);
        }
        tracing::debug!(
            "Aggregated {} parameters and {} events",
            aggregate.parameters.len(),
            aggregate.events.len()
        );
        aggregate
    }

    /// Append one document's definitions
    pub fn extend(&mut self, document: Document) {
        self.parameters.extend(document.parameters);
        self.events.extend(document.events);
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty() && self.events.is_empty()
    }
}
