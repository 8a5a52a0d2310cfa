//! Language Domain Module
//!
//! Defines the inputs Symbol Scout can turn into a syntax tree.

use std::path::Path;

/// Supported inputs, each backed by one Tree Source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLanguage {
    JavaScript,
    TypeScript,
    Tsx,
    Python,
    /// An ESTree JSON document written by an external parser.
    EstreeJson,
}

impl SourceLanguage {
    pub const ALL: [SourceLanguage; 5] = [
        SourceLanguage::JavaScript,
        SourceLanguage::TypeScript,
        SourceLanguage::Tsx,
        SourceLanguage::Python,
        SourceLanguage::EstreeJson,
    ];

    /// Parse language from string (CLI input).
    pub fn from_name(s: &str) -> Option<SourceLanguage> {
        match s.to_lowercase().as_str() {
            "javascript" | "js" | "jsx" => Some(SourceLanguage::JavaScript),
            "typescript" | "ts" => Some(SourceLanguage::TypeScript),
            "tsx" => Some(SourceLanguage::Tsx),
            "python" | "py" => Some(SourceLanguage::Python),
            "estree" | "json" => Some(SourceLanguage::EstreeJson),
            _ => None,
        }
    }

    /// Infer language from file extension.
    pub fn from_extension(ext: &str) -> Option<SourceLanguage> {
        let ext = ext.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext.as_str()))
    }

    /// Infer language from a file path.
    pub fn from_path(path: &Path) -> Option<SourceLanguage> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Get the display name of the language.
    pub fn name(&self) -> &'static str {
        match self {
            SourceLanguage::JavaScript => "JavaScript",
            SourceLanguage::TypeScript => "TypeScript",
            SourceLanguage::Tsx => "TSX",
            SourceLanguage::Python => "Python",
            SourceLanguage::EstreeJson => "ESTree JSON",
        }
    }

    /// Get the file extensions for this language.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            SourceLanguage::JavaScript => &["js", "mjs", "cjs", "jsx"],
            SourceLanguage::TypeScript => &["ts", "mts", "cts"],
            SourceLanguage::Tsx => &["tsx"],
            SourceLanguage::Python => &["py", "pyi"],
            SourceLanguage::EstreeJson => &["json"],
        }
    }

    /// Whether directory scans should pick up files of this language.
    /// ESTree JSON is only read when a file is named explicitly.
    pub fn is_source_text(&self) -> bool {
        !matches!(self, SourceLanguage::EstreeJson)
    }
}

impl std::str::FromStr for SourceLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            format!(
                "unknown language `{}` (expected javascript, typescript, tsx, python or estree)",
                s
            )
        })
    }
}

impl std::fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
