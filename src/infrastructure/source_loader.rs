use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::domain::language::SourceLanguage;

/// Directory names skipped while collecting sources unless configured otherwise.
pub const DEFAULT_SKIP_DIRS: &[&str] = &["node_modules", ".git", "target", "dist", "build"];

/// A source file found on disk, tagged with the language that will parse it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub language: SourceLanguage,
}

pub struct SourceLoader {
    skip_dirs: Vec<String>,
}

impl Default for SourceLoader {
    fn default() -> Self {
        Self::new(DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect())
    }
}

impl SourceLoader {
    pub fn new(skip_dirs: Vec<String>) -> Self {
        Self { skip_dirs }
    }

    /// Read a file as UTF-8 text.
    pub fn read(path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
    }

    /// Collect every source file under `dir`, sorted by path. Only `dir`
    /// itself must be readable; unreadable entries below it are logged and
    /// skipped.
    pub fn collect(&self, dir: &Path) -> Result<Vec<SourceFile>> {
        let mut files = Vec::new();
        self.collect_recursive(dir, &mut files)?;
        files.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(dir = %dir.display(), count = files.len(), "collected source files");
        Ok(files)
    }

    fn is_skipped(&self, dir: &Path) -> bool {
        dir.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.skip_dirs.iter().any(|skip| skip == name))
    }

    fn collect_recursive(&self, dir: &Path, out: &mut Vec<SourceFile>) -> Result<()> {
        if self.is_skipped(dir) {
            return Ok(());
        }

        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?;
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %dir.display(), "skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    warn!(path = %path.display(), "skipping entry: {}", e);
                    continue;
                }
            };

            if file_type.is_dir() {
                if let Err(e) = self.collect_recursive(&path, out) {
                    warn!(path = %path.display(), "skipping directory: {:#}", e);
                }
            } else if file_type.is_file() {
                if let Some(language) = SourceLanguage::from_path(&path) {
                    if language.is_source_text() {
                        out.push(SourceFile { path, language });
                    }
                }
            }
        }
        Ok(())
    }
}
