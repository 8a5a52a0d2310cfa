//! Symbol Extraction Engine
//!
//! Walks a `SyntaxTree` once, depth-first and pre-order, and hands every
//! node to the shape table. The walk uses an explicit work-list instead of
//! host recursion, remembers visited ids so shared subtrees and cycles are
//! entered only once, and can refuse trees deeper than a configured limit.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::domain::ast::{NodeId, SyntaxNode, SyntaxTree};
use crate::domain::error::ExtractError;
use crate::domain::inventory::SymbolInventory;
use crate::domain::shapes::ShapeTable;
use crate::domain::usage;

/// Default depth limit. Parser output for real code stays far below it.
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Which names an import specifier contributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportNames {
    /// Only the name bound in the importing file (`y` in `import {x as y}`).
    #[default]
    Local,
    /// The local name, followed by the imported name when it differs.
    LocalAndImported,
}

impl std::str::FromStr for ImportNames {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(ImportNames::Local),
            "local-and-imported" | "both" => Ok(ImportNames::LocalAndImported),
            other => Err(format!(
                "unknown import name mode `{}` (expected `local` or `local-and-imported`)",
                other
            )),
        }
    }
}

/// Tuning knobs for one `SymbolExtractor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Deepest node depth (root = 0) that may be visited. `None` = unlimited.
    pub max_depth: Option<usize>,
    pub import_names: ImportNames,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            import_names: ImportNames::Local,
        }
    }
}

/// Extract with the default configuration and the standard shapes.
pub fn extract(tree: &SyntaxTree) -> Result<SymbolInventory, ExtractError> {
    SymbolExtractor::default().extract(tree)
}

/// The traversal engine. Holds no per-call state, so one instance can be
/// shared across threads.
#[derive(Debug, Clone, Default)]
pub struct SymbolExtractor {
    config: ExtractConfig,
    shapes: ShapeTable,
}

impl SymbolExtractor {
    pub fn new(config: ExtractConfig) -> Self {
        Self {
            config,
            shapes: ShapeTable::standard(),
        }
    }

    pub fn with_shapes(config: ExtractConfig, shapes: ShapeTable) -> Self {
        Self { config, shapes }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Walk `tree` from its root and build a fresh inventory.
    pub fn extract(&self, tree: &SyntaxTree) -> Result<SymbolInventory, ExtractError> {
        let mut inventory = SymbolInventory::new();
        walk(tree, self.config.max_depth, |id, node| {
            if let Some(kind) = self.shapes.apply(tree, node, &self.config, &mut inventory) {
                trace!(node = id.index(), kind, "shape matched");
            }
        })?;
        Ok(inventory)
    }

    /// Names of the identifiers `tree` refers to, under the same depth limit
    /// as `extract`.
    pub fn used_names(&self, tree: &SyntaxTree) -> Result<IndexSet<String>, ExtractError> {
        usage::used_names(tree, self.config.max_depth)
    }
}

/// Depth-first pre-order walk over an explicit work-list. Every reachable
/// node is handed to `visit` once; dangling ids are skipped, and a node
/// deeper than `max_depth` (root = 0) aborts the walk.
pub fn walk<'t>(
    tree: &'t SyntaxTree,
    max_depth: Option<usize>,
    mut visit: impl FnMut(NodeId, &'t SyntaxNode),
) -> Result<(), ExtractError> {
    let Some(root) = tree.root() else {
        return Ok(());
    };

    let mut visited = vec![false; tree.len()];
    let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];
    let mut children: Vec<NodeId> = Vec::new();

    while let Some((id, depth)) = stack.pop() {
        let Some(node) = tree.node(id) else {
            warn!(node = id.index(), "skipping dangling node reference");
            continue;
        };
        if std::mem::replace(&mut visited[id.index()], true) {
            trace!(node = id.index(), kind = node.kind(), "node already visited");
            continue;
        }
        if let Some(limit) = max_depth {
            if depth > limit {
                return Err(ExtractError::DepthExceeded {
                    limit,
                    kind: node.kind().to_string(),
                });
            }
        }

        visit(id, node);

        children.clear();
        for field in node.fields() {
            field.value.collect_children(&mut children);
        }
        // Reversed so the first field's first child is popped next.
        stack.extend(children.iter().rev().map(|&child| (child, depth + 1)));
    }

    Ok(())
}
