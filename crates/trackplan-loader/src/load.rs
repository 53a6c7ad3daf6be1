//! Decoding definition files into documents

use std::path::Path;

use trackplan_core::Document;

use crate::error::ParseError;

/// Decode one definition file
///
/// An empty file, or one holding only comments, is an empty document.
pub fn parse_document(path: &Path, content: &[u8]) -> Result<Document, ParseError> {
    let text = std::str::from_utf8(content)
        .map_err(|e| ParseError::new(path, format!("invalid UTF-8: {}", e)))?;

    if is_blank(text) {
        return Ok(Document::default());
    }

    let document: Option<Document> =
        serde_yaml_ng::from_str(text).map_err(|e| ParseError::new(path, e.to_string()))?;

    let document = document.unwrap_or_default();
    tracing::debug!(
        "Parsed {:?}: {} parameters, {} events",
        path,
        document.parameters.len(),
        document.events.len()
    );
    Ok(document)
}

/// No content beyond whitespace, comments and document markers
fn is_blank(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}
