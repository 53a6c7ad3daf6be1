//! Filesystem definition source

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{LoaderError, LoaderResult};
use crate::locate::{locate, DEFAULT_EXTENSIONS};
use crate::traits::DefinitionSource;

/// Definition files found recursively under a root directory
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Replace the extension allow-list
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

#[async_trait]
impl DefinitionSource for DirSource {
    async fn list_files(&self) -> LoaderResult<Vec<PathBuf>> {
        let root = self.root.clone();
        let extensions = self.extensions.clone();
        tokio::task::spawn_blocking(move || locate(&root, &extensions))
            .await
            .map_err(|e| LoaderError::Join(e.to_string()))?
    }

    async fn read(&self, path: &Path) -> LoaderResult<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LoaderError::NotFound(path.to_path_buf()),
            _ => LoaderError::file_system(path, e),
        })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
