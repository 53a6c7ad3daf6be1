//! In-memory definition source for testing

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{LoaderError, LoaderResult};
use crate::traits::DefinitionSource;

/// In-memory definition source
///
/// Useful for testing and for embedding definitions. Files are listed in
/// path order.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[async_trait]
impl DefinitionSource for MemorySource {
    async fn list_files(&self) -> LoaderResult<Vec<PathBuf>> {
        Ok(self.files.keys().cloned().collect())
    }

    async fn read(&self, path: &Path) -> LoaderResult<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| LoaderError::NotFound(path.to_path_buf()))
    }

    fn describe(&self) -> String {
        format!("memory ({} files)", self.files.len())
    }
}
