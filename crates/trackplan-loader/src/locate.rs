//! Recursive discovery of definition files

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{LoaderError, LoaderResult};

/// Extensions searched when none are configured
pub const DEFAULT_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// List every file under `root` whose extension is in `extensions`
///
/// Extensions are compared case-insensitively and may be given with or
/// without a leading dot. The result is sorted by path. A missing root or an
/// unreadable directory is an error.
pub fn locate<S: AsRef<str>>(root: &Path, extensions: &[S]) -> LoaderResult<Vec<PathBuf>> {
    let allowed: Vec<String> = extensions
        .iter()
        .map(|ext| normalize_extension(ext.as_ref()))
        .collect();

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if has_extension(entry.path(), &allowed) {
            files.push(entry.into_path());
        }
    }
    files.sort();

    tracing::debug!("Located {} definition files under {:?}", files.len(), root);
    Ok(files)
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

fn has_extension(path: &Path, allowed: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

fn walk_error(root: &Path, err: walkdir::Error) -> LoaderError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let message = err.to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, message));
    LoaderError::file_system(path, source)
}
