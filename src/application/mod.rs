use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use indexmap::IndexSet;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::domain::ast::SyntaxTree;
use crate::domain::extractor::SymbolExtractor;
use crate::domain::inventory::SymbolInventory;
use crate::domain::language::SourceLanguage;
use crate::infrastructure::source_loader::{SourceFile, SourceLoader};
use crate::ports::{InventoryExporter, InventoryRecord, TreeSourceResolver};

/// Everything one file contributes: what it declares and what it refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileAnalysis {
    pub inventory: SymbolInventory,
    pub used: IndexSet<String>,
}

impl FileAnalysis {
    /// Declared names the file itself never refers to.
    pub fn unreferenced(&self) -> SymbolInventory {
        self.inventory.unreferenced(&self.used)
    }
}

/// Result of analyzing one file during a directory scan.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<FileAnalysis>,
}

/// Counters reported after a directory scan has been written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub files: usize,
    pub failed: usize,
}

impl ScanSummary {
    pub fn all_failed(&self) -> bool {
        self.files > 0 && self.failed == self.files
    }
}

pub struct ExtractUsecase<'a> {
    pub sources: &'a dyn TreeSourceResolver,
    pub extractor: &'a SymbolExtractor,
    pub exporter: &'a dyn InventoryExporter,
}

impl<'a> ExtractUsecase<'a> {
    /// Parse `text` as `language` and extract its inventory.
    pub fn extract_text(&self, language: SourceLanguage, text: &str) -> Result<SymbolInventory> {
        let tree = self.parse(language, text)?;
        let inventory = self.extractor.extract(&tree)?;
        Ok(inventory)
    }

    /// Parse `text` as `language`; extract its inventory and the names it uses.
    pub fn analyze_text(&self, language: SourceLanguage, text: &str) -> Result<FileAnalysis> {
        let tree = self.parse(language, text)?;
        let inventory = self.extractor.extract(&tree)?;
        let used = self.extractor.used_names(&tree)?;
        Ok(FileAnalysis { inventory, used })
    }

    fn parse(&self, language: SourceLanguage, text: &str) -> Result<SyntaxTree> {
        self.sources
            .source_for(language)
            .parse(text)
            .with_context(|| format!("Failed to parse {} input", language))
    }

    /// Read and analyze one file. `language` overrides extension detection.
    pub fn extract_file(&self, path: &Path, language: Option<SourceLanguage>) -> Result<SymbolInventory> {
        let (language, text) = self.load(path, language)?;
        self.extract_text(language, &text)
            .with_context(|| format!("Failed to analyze {}", path.display()))
    }

    /// Like `extract_file`, also collecting the names the file uses.
    pub fn analyze_file(&self, path: &Path, language: Option<SourceLanguage>) -> Result<FileAnalysis> {
        let (language, text) = self.load(path, language)?;
        self.analyze_text(language, &text)
            .with_context(|| format!("Failed to analyze {}", path.display()))
    }

    fn load(&self, path: &Path, language: Option<SourceLanguage>) -> Result<(SourceLanguage, String)> {
        let Some(language) = language.or_else(|| SourceLanguage::from_path(path)) else {
            bail!(
                "Unsupported file type: {} (use --language to pick a parser)",
                path.display()
            );
        };
        debug!(path = %path.display(), %language, "analyzing file");
        let text = SourceLoader::read(path)?;
        Ok((language, text))
    }

    /// Analyze files in parallel. Outcomes come back in the input order.
    pub fn scan(&self, files: &[SourceFile]) -> Vec<FileOutcome> {
        files
            .par_iter()
            .map(|file| FileOutcome {
                path: file.path.clone(),
                result: self.analyze_file(&file.path, Some(file.language)),
            })
            .collect()
    }

    /// Write a single-file inventory.
    pub fn write_inventory(&self, inventory: &SymbolInventory, out: &mut dyn Write) -> Result<()> {
        let record = InventoryRecord {
            path: None,
            inventory,
        };
        self.exporter
            .export(&record, out)
            .context("Failed to write inventory")
    }

    /// Write scan outcomes: one record per analyzed file, or a single merged
    /// record when `merged` is set. Failed files are logged and skipped.
    pub fn write_scan(
        &self,
        outcomes: &[FileOutcome],
        merged: bool,
        out: &mut dyn Write,
    ) -> Result<ScanSummary> {
        let mut union = SymbolInventory::new();

        let summary = self.for_each_analysis(outcomes, |path, analysis| {
            if merged {
                union.merge(&analysis.inventory);
                return Ok(());
            }
            let path = path.display().to_string();
            let record = InventoryRecord {
                path: Some(&path),
                inventory: &analysis.inventory,
            };
            self.exporter
                .export(&record, out)
                .context("Failed to write inventory")
        })?;

        if merged {
            self.write_inventory(&union, out)?;
        }
        Ok(summary)
    }

    /// Write one record of the names declared anywhere in the scan that no
    /// scanned file refers to.
    pub fn write_unused(&self, outcomes: &[FileOutcome], out: &mut dyn Write) -> Result<ScanSummary> {
        let mut project = FileAnalysis::default();

        let summary = self.for_each_analysis(outcomes, |_, analysis| {
            project.inventory.merge(&analysis.inventory);
            for name in &analysis.used {
                if !project.used.contains(name) {
                    project.used.insert(name.clone());
                }
            }
            Ok(())
        })?;

        self.write_inventory(&project.unreferenced(), out)?;
        Ok(summary)
    }

    fn for_each_analysis(
        &self,
        outcomes: &[FileOutcome],
        mut accept: impl FnMut(&Path, &FileAnalysis) -> Result<()>,
    ) -> Result<ScanSummary> {
        let mut summary = ScanSummary {
            files: outcomes.len(),
            failed: 0,
        };

        for outcome in outcomes {
            match &outcome.result {
                Ok(analysis) => accept(outcome.path.as_path(), analysis)?,
                Err(e) => {
                    summary.failed += 1;
                    warn!(path = %outcome.path.display(), "skipping file: {:#}", e);
                }
            }
        }

        info!(
            files = summary.files,
            failed = summary.failed,
            "scan complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extractor::ExtractConfig;
    use crate::infrastructure::{DefaultSources, JsonExporter};

    #[test]
    fn test_extract_text_javascript() {
        let sources = DefaultSources::default();
        let extractor = SymbolExtractor::new(ExtractConfig::default());
        let usecase = ExtractUsecase {
            sources: &sources,
            extractor: &extractor,
            exporter: &JsonExporter,
        };

        let inv = usecase
            .extract_text(
                SourceLanguage::JavaScript,
                "import a from 'a';\nclass B {}\nfunction c() {}\n",
            )
            .unwrap();
        let mut out = Vec::new();
        usecase.write_inventory(&inv, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"functions\":[\"c\"],\"classes\":[\"B\"],\"imports\":[\"a\"]}\n"
        );
    }

    #[test]
    fn test_parse_failure_is_reported_with_language() {
        let sources = DefaultSources::default();
        let extractor = SymbolExtractor::default();
        let usecase = ExtractUsecase {
            sources: &sources,
            extractor: &extractor,
            exporter: &JsonExporter,
        };

        let err = usecase
            .extract_text(SourceLanguage::EstreeJson, "{oops")
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse ESTree JSON input"));
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let sources = DefaultSources::default();
        let extractor = SymbolExtractor::default();
        let usecase = ExtractUsecase {
            sources: &sources,
            extractor: &extractor,
            exporter: &JsonExporter,
        };

        let err = usecase
            .extract_file(Path::new("notes.txt"), None)
            .unwrap_err();
        assert!(err.to_string().contains("Unsupported file type"));
    }

    #[test]
    fn test_analyze_text_reports_unreferenced_names() {
        let sources = DefaultSources::default();
        let extractor = SymbolExtractor::default();
        let usecase = ExtractUsecase {
            sources: &sources,
            extractor: &extractor,
            exporter: &JsonExporter,
        };

        let analysis = usecase
            .analyze_text(
                SourceLanguage::Python,
                "import os\nimport json\n\ndef used():\n    return os.getcwd()\n\ndef unused():\n    pass\n\nused()\n",
            )
            .unwrap();
        let unused = analysis.unreferenced();
        assert_eq!(unused.functions.iter().collect::<Vec<_>>(), vec!["unused"]);
        assert_eq!(unused.imports.iter().collect::<Vec<_>>(), vec!["json"]);
    }

    #[test]
    fn test_write_unused_unions_across_files() {
        let sources = DefaultSources::default();
        let extractor = SymbolExtractor::default();
        let usecase = ExtractUsecase {
            sources: &sources,
            extractor: &extractor,
            exporter: &JsonExporter,
        };

        let outcomes = vec![
            FileOutcome {
                path: PathBuf::from("a.js"),
                result: usecase.analyze_text(
                    SourceLanguage::JavaScript,
                    "export function shared() {}\nexport function lonely() {}\n",
                ),
            },
            FileOutcome {
                path: PathBuf::from("b.js"),
                result: usecase.analyze_text(
                    SourceLanguage::JavaScript,
                    "import { shared } from './a';\nshared();\n",
                ),
            },
            FileOutcome {
                path: PathBuf::from("broken.js"),
                result: usecase.analyze_text(SourceLanguage::JavaScript, "function (\n"),
            },
        ];

        let mut out = Vec::new();
        let summary = usecase.write_unused(&outcomes, &mut out).unwrap();
        assert_eq!(summary, ScanSummary { files: 3, failed: 1 });
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"functions\":[\"lonely\"],\"classes\":[],\"imports\":[]}\n"
        );
    }

    #[test]
    fn test_summary_all_failed() {
        assert!(!ScanSummary::default().all_failed());
        assert!(ScanSummary { files: 2, failed: 2 }.all_failed());
        assert!(!ScanSummary { files: 2, failed: 1 }.all_failed());
    }
}
