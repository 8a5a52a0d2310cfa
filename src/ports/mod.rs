use std::io::{self, Write};

use serde::Serialize;

use crate::domain::ast::SyntaxTree;
use crate::domain::error::ParseError;
use crate::domain::inventory::SymbolInventory;
use crate::domain::language::SourceLanguage;

/// Turns text into a `SyntaxTree`.
pub trait TreeSource: Send + Sync {
    fn language(&self) -> SourceLanguage;
    fn parse(&self, text: &str) -> Result<SyntaxTree, ParseError>;
}

/// Picks the Tree Source for a language.
pub trait TreeSourceResolver: Send + Sync {
    fn source_for(&self, language: SourceLanguage) -> &dyn TreeSource;
}

/// One output line: an inventory, optionally tagged with the file it came from.
#[derive(Debug, Serialize)]
pub struct InventoryRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<&'a str>,
    #[serde(flatten)]
    pub inventory: &'a SymbolInventory,
}

pub trait InventoryExporter: Send + Sync {
    fn export(&self, record: &InventoryRecord<'_>, out: &mut dyn Write) -> io::Result<()>;
}
