// Domain layer for Symbol Scout: the syntax tree model, the inventory, and
// the extraction engine. Nothing here performs I/O.

pub mod ast;
pub mod error;
pub mod extractor;
pub mod inventory;
pub mod language;
pub mod shapes;
pub mod usage;
