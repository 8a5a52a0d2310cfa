// Main library entry point for Symbol Scout.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::ast::{FieldValue, NodeId, Primitive, SyntaxNode, SyntaxTree, TreeBuilder};
pub use domain::error::{ExtractError, ParseError};
pub use domain::extractor::{extract, walk, ExtractConfig, ImportNames, SymbolExtractor};
pub use domain::inventory::{SymbolCategory, SymbolInventory};
pub use domain::language::SourceLanguage;
pub use domain::shapes::{Shape, ShapeTable};
