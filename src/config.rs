//! Configuration File
//!
//! Optional TOML file supplying defaults for the CLI. Every key may be
//! omitted; command-line flags override whatever the file sets.
//!
//! ```toml
//! max_depth = 5000
//! import_names = "local-and-imported"
//! jobs = 4
//! skip_dirs = ["node_modules", "vendor"]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::extractor::{ExtractConfig, ImportNames, DEFAULT_MAX_DEPTH};
use crate::infrastructure::source_loader::DEFAULT_SKIP_DIRS;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoutConfig {
    /// Depth limit for the traversal; `0` disables it.
    pub max_depth: usize,
    pub import_names: ImportNames,
    pub jobs: Option<usize>,
    pub skip_dirs: Vec<String>,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            import_names: ImportNames::default(),
            jobs: None,
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScoutConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("In config file {}", path.display()))
    }

    pub fn extract_config(&self) -> ExtractConfig {
        ExtractConfig {
            max_depth: (self.max_depth > 0).then_some(self.max_depth),
            import_names: self.import_names,
        }
    }
}
