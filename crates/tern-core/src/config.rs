//! Configuration types and parsing for tern.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the graph document, relative to the project root
pub const DEFAULT_GRAPH_PATH: &str = "target/graph.json";

/// Project configuration from tern.yml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Graph document path, relative to the project root
    #[serde(default = "default_graph_path")]
    pub graph: String,

    /// Default selectors applied by `ls` and as the lineage scope
    #[serde(default)]
    pub select: Vec<String>,

    /// Fail on references to unknown nodes instead of dropping them
    #[serde(default)]
    pub strict: bool,

    /// Column lineage defaults
    #[serde(default)]
    pub lineage: LineageConfig,
}

/// Column lineage defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LineageConfig {
    /// Follow filter and join edges as well as data edges
    #[serde(default)]
    pub include_structural: bool,

    /// Hop limit; unbounded when absent
    #[serde(default)]
    pub max_depth: Option<usize>,
}

fn default_graph_path() -> String {
    DEFAULT_GRAPH_PATH.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graph: default_graph_path(),
            select: Vec::new(),
            strict: false,
            lineage: LineageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for tern.yml or tern.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        match Self::find_in_dir(dir) {
            Some(path) => Self::load(&path),
            None => Err(CoreError::ConfigNotFound {
                path: dir.join("tern.yml").display().to_string(),
            }),
        }
    }

    /// Like [`load_from_dir`](Self::load_from_dir), falling back to defaults
    /// when the directory has no config file
    pub fn load_or_default(dir: &Path) -> CoreResult<Self> {
        match Self::find_in_dir(dir) {
            Some(path) => Self::load(&path),
            None => {
                log::debug!("No tern.yml in {}, using defaults", dir.display());
                Ok(Self::default())
            }
        }
    }

    fn find_in_dir(dir: &Path) -> Option<PathBuf> {
        ["tern.yml", "tern.yaml"]
            .into_iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.graph.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "graph path cannot be empty".to_string(),
            });
        }

        if self.lineage.max_depth == Some(0) {
            return Err(CoreError::ConfigInvalid {
                message: "lineage.max_depth must be at least 1; omit it for unbounded traversal"
                    .to_string(),
            });
        }

        if self.select.iter().any(|s| s.trim().is_empty()) {
            log::warn!("Empty entry in 'select' matches every node");
        }

        Ok(())
    }

    /// Get absolute graph document path relative to a project root
    pub fn graph_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.graph)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
