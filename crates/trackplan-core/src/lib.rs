//! Trackplan Core - Definition model and reference graph
//!
//! This crate provides the parameter and event types, the aggregation and
//! uniqueness validation of definitions loaded from many files, and the
//! directed graph linking events to the parameters they use.

pub mod aggregate;
pub mod error;
pub mod event;
pub mod graph;
pub mod lint;
pub mod parameter;
pub mod rule;
pub mod validate;

pub use aggregate::{Aggregate, Document};
pub use error::{Error, Result};
pub use event::Event;
pub use graph::{DanglingReference, DefinitionGraph, Direction, Edge, Node, NodeKind};
pub use lint::{lint, Warning};
pub use parameter::Parameter;
pub use rule::ValidationRule;
pub use validate::{validate, NamespacePolicy, ValidationError};
