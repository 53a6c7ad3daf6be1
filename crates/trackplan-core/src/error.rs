//! Error types for Trackplan Core

use thiserror::Error;

use crate::graph::DanglingReference;

/// Result type alias using Trackplan's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Trackplan error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Node already exists: {0}")]
    DuplicateNode(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("{} dangling reference(s): {}", .0.len(), join_references(.0))]
    DanglingReferences(Vec<DanglingReference>),

    #[error("Invalid rule: {0}")]
    InvalidRule(String),
}

fn join_references(refs: &[DanglingReference]) -> String {
    refs.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
