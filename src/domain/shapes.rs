//! Shape Table
//!
//! Maps node discriminators to extraction actions. The engine asks the table
//! about every node it visits; the first shape whose kind matches wins.
//! Support for a new declaration form is added by pushing a shape, never by
//! touching the traversal.

use crate::domain::ast::{NodeId, SyntaxNode, SyntaxTree};
use crate::domain::extractor::{ExtractConfig, ImportNames};
use crate::domain::inventory::{SymbolCategory, SymbolInventory};

/// Extraction action run when a shape matches.
pub type ShapeAction = fn(&SyntaxTree, &SyntaxNode, &ExtractConfig, &mut SymbolInventory);

/// One recognized node shape.
#[derive(Clone, Copy)]
pub struct Shape {
    pub kind: &'static str,
    pub action: ShapeAction,
}

impl std::fmt::Debug for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shape").field("kind", &self.kind).finish()
    }
}

/// Ordered list of shapes; earlier entries have priority.
#[derive(Debug, Clone)]
pub struct ShapeTable {
    shapes: Vec<Shape>,
}

impl Default for ShapeTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ShapeTable {
    /// The reference shapes: named functions, named classes, import specifiers.
    pub fn standard() -> Self {
        Self {
            shapes: vec![
                Shape {
                    kind: "FunctionDeclaration",
                    action: collect_function,
                },
                Shape {
                    kind: "ClassDeclaration",
                    action: collect_class,
                },
                Shape {
                    kind: "ImportDeclaration",
                    action: collect_imports,
                },
            ],
        }
    }

    pub fn empty() -> Self {
        Self { shapes: Vec::new() }
    }

    /// Append a shape at the lowest priority.
    pub fn push(&mut self, shape: Shape) -> &mut Self {
        self.shapes.push(shape);
        self
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Run the first matching shape's action. Returns the matched kind.
    pub fn apply(
        &self,
        tree: &SyntaxTree,
        node: &SyntaxNode,
        config: &ExtractConfig,
        inventory: &mut SymbolInventory,
    ) -> Option<&'static str> {
        let shape = self.shapes.iter().find(|s| s.kind == node.kind())?;
        (shape.action)(tree, node, config, inventory);
        Some(shape.kind)
    }
}

/// Name carried by an identifier reference. Nodes without a string `name`
/// yield `None`.
pub fn identifier_name(tree: &SyntaxTree, id: NodeId) -> Option<&str> {
    tree.node(id)?.field("name").and_then(|v| v.as_str())
}

/// Name of the identifier held in `field` of `node`.
pub fn field_name<'t>(tree: &'t SyntaxTree, node: &'t SyntaxNode, field: &str) -> Option<&'t str> {
    let id = node.field(field)?.as_node()?;
    identifier_name(tree, id)
}

/// Exported name of a specifier: an identifier, or a string literal
/// (`import { "kebab-name" as k }`).
fn imported_name<'t>(tree: &'t SyntaxTree, spec: &'t SyntaxNode) -> Option<&'t str> {
    let id = spec.field("imported")?.as_node()?;
    let node = tree.node(id)?;
    node.field("name")
        .or_else(|| node.field("value"))
        .and_then(|v| v.as_str())
}

fn collect_function(
    tree: &SyntaxTree,
    node: &SyntaxNode,
    _config: &ExtractConfig,
    inventory: &mut SymbolInventory,
) {
    if let Some(name) = field_name(tree, node, "id") {
        inventory.add(SymbolCategory::Function, name);
    }
}

fn collect_class(
    tree: &SyntaxTree,
    node: &SyntaxNode,
    _config: &ExtractConfig,
    inventory: &mut SymbolInventory,
) {
    if let Some(name) = field_name(tree, node, "id") {
        inventory.add(SymbolCategory::Class, name);
    }
}

fn collect_imports(
    tree: &SyntaxTree,
    node: &SyntaxNode,
    config: &ExtractConfig,
    inventory: &mut SymbolInventory,
) {
    let Some(specifiers) = node.field("specifiers").and_then(|v| v.as_sequence()) else {
        return;
    };

    for spec in specifiers.iter().filter_map(|v| v.as_node()) {
        let Some(spec) = tree.node(spec) else {
            continue;
        };
        let local = field_name(tree, spec, "local");
        if let Some(local) = local {
            inventory.add(SymbolCategory::Import, local);
        }
        if config.import_names == ImportNames::LocalAndImported {
            if let Some(imported) = imported_name(tree, spec) {
                if Some(imported) != local {
                    inventory.add(SymbolCategory::Import, imported);
                }
            }
        }
    }
}
