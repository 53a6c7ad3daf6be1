//! CLI configuration

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use trackplan_core::NamespacePolicy;
use trackplan_loader::DEFAULT_EXTENSIONS;

/// Project-local config file name
pub const CONFIG_FILE_NAME: &str = "trackplan.toml";

/// Get default definitions directory
pub fn default_definitions_dir() -> PathBuf {
    PathBuf::from("definitions")
}

/// Config file used when none is given on the command line
///
/// A `trackplan.toml` in the working directory wins, then the user config
/// directory. When neither exists the project-local path is returned so
/// `config init` creates it there.
pub fn config_file_path() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(user) = dirs::config_dir().map(|d| d.join("trackplan").join("config.toml")) {
        if user.exists() {
            return user;
        }
    }
    local
}

/// Configuration for the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the definition tree
    pub definitions_dir: PathBuf,
    /// File extensions treated as definition files
    pub extensions: Vec<String>,
    /// Whether parameters and events share one namespace
    pub namespace: NamespacePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            definitions_dir: default_definitions_dir(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            namespace: NamespacePolicy::default(),
        }
    }
}

impl Config {
    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("writing config file {}", path.display()))?;
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["definitions_dir", "extensions", "namespace"]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "definitions_dir" => Some(self.definitions_dir.display().to_string()),
            "extensions" => Some(self.extensions.join(",")),
            "namespace" => Some(self.namespace.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "definitions_dir" => self.definitions_dir = PathBuf::from(value),
            "extensions" => {
                let extensions: Vec<String> = value
                    .split(',')
                    .map(|e| e.trim().to_string())
                    .filter(|e| !e.is_empty())
                    .collect();
                if extensions.is_empty() {
                    anyhow::bail!("extensions cannot be empty");
                }
                self.extensions = extensions;
            }
            "namespace" => {
                self.namespace = value.parse().map_err(anyhow::Error::msg)?;
            }
            _ => anyhow::bail!(
                "Unknown config key: {}. Available keys: {}",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }
}
