//! Definition source trait

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::LoaderResult;

/// Where definition files come from
///
/// A source lists its files and hands out their raw bytes; decoding happens
/// in the pipeline, so every source shares the same parse rules.
#[async_trait]
pub trait DefinitionSource: Send + Sync {
    /// Paths of all definition files, in a deterministic order
    async fn list_files(&self) -> LoaderResult<Vec<PathBuf>>;

    /// Raw content of one file returned by [`Self::list_files`]
    async fn read(&self, path: &Path) -> LoaderResult<Vec<u8>>;

    /// Human readable location, for logs and reports
    fn describe(&self) -> String;
}
