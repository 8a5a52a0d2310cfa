// Infrastructure implementations for Symbol Scout.

pub mod concurrency;
pub mod estree_json;
pub mod json_exporter;
pub mod source_loader;
pub mod tree_sitter_source;

pub use estree_json::EstreeJsonSource;
pub use json_exporter::JsonExporter;
pub use source_loader::{SourceFile, SourceLoader};
pub use tree_sitter_source::TreeSitterSource;

use crate::domain::language::SourceLanguage;
use crate::ports::{TreeSource, TreeSourceResolver};

/// Wires every `SourceLanguage` to its Tree Source.
#[derive(Debug)]
pub struct DefaultSources {
    javascript: TreeSitterSource,
    typescript: TreeSitterSource,
    tsx: TreeSitterSource,
    python: TreeSitterSource,
    estree: EstreeJsonSource,
}

impl Default for DefaultSources {
    fn default() -> Self {
        Self {
            javascript: TreeSitterSource::javascript(),
            typescript: TreeSitterSource::typescript(),
            tsx: TreeSitterSource::tsx(),
            python: TreeSitterSource::python(),
            estree: EstreeJsonSource,
        }
    }
}

impl TreeSourceResolver for DefaultSources {
    fn source_for(&self, language: SourceLanguage) -> &dyn TreeSource {
        match language {
            SourceLanguage::JavaScript => &self.javascript,
            SourceLanguage::TypeScript => &self.typescript,
            SourceLanguage::Tsx => &self.tsx,
            SourceLanguage::Python => &self.python,
            SourceLanguage::EstreeJson => &self.estree,
        }
    }
}
