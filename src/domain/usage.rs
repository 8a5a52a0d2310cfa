//! Name Usage
//!
//! Collects the names of identifiers that sit in reference position, so an
//! inventory can be reduced to the declarations nothing refers to. Matching
//! is by plain name: no scopes, no shadowing, no cross-file linking beyond
//! taking the union of per-file results.

use indexmap::IndexSet;

use crate::domain::ast::{FieldValue, NodeId, Primitive, SyntaxNode, SyntaxTree};
use crate::domain::error::ExtractError;
use crate::domain::extractor::walk;

/// Fields whose identifier declares or labels a name instead of referring to
/// one, keyed by parent kind. `*` covers every field of that parent.
const NON_REFERENCE_FIELDS: &[(&str, &str)] = &[
    ("FunctionDeclaration", "id"),
    ("ClassDeclaration", "id"),
    ("ImportSpecifier", "*"),
    ("ImportDefaultSpecifier", "*"),
    ("ImportNamespaceSpecifier", "*"),
    // ESTree members and keys
    ("MemberExpression", "property"),
    ("OptionalMemberExpression", "property"),
    ("Property", "key"),
    ("ObjectProperty", "key"),
    ("ObjectMethod", "key"),
    ("MethodDefinition", "key"),
    ("PropertyDefinition", "key"),
    ("ClassProperty", "key"),
    ("ClassMethod", "key"),
    ("LabeledStatement", "label"),
    ("BreakStatement", "label"),
    ("ContinueStatement", "label"),
    // tree-sitter JavaScript / TypeScript
    ("labeled_statement", "label"),
    ("break_statement", "label"),
    ("continue_statement", "label"),
    // tree-sitter Python
    ("attribute", "attribute"),
    ("keyword_argument", "name"),
    ("parameters", "*"),
    ("lambda_parameters", "*"),
    ("default_parameter", "name"),
    ("typed_default_parameter", "name"),
    ("typed_parameter", "children"),
];

/// Whether an identifier held in `field` of `parent` refers to a binding.
/// Computed members (`obj[key]`) always refer.
pub fn is_reference(parent: &SyntaxNode, field: &str) -> bool {
    if (field == "property" || field == "key") && is_computed(parent) {
        return true;
    }
    !NON_REFERENCE_FIELDS
        .iter()
        .any(|&(kind, name)| kind == parent.kind() && (name == "*" || name == field))
}

fn is_computed(node: &SyntaxNode) -> bool {
    matches!(
        node.field("computed"),
        Some(FieldValue::Primitive(Primitive::Bool(true)))
    )
}

/// Every identifier name in reference position, in first-visited order.
pub fn used_names(
    tree: &SyntaxTree,
    max_depth: Option<usize>,
) -> Result<IndexSet<String>, ExtractError> {
    let mut used = IndexSet::new();
    let mut children: Vec<NodeId> = Vec::new();

    walk(tree, max_depth, |_, node| {
        for field in node.fields() {
            if !is_reference(node, &field.name) {
                continue;
            }
            children.clear();
            field.value.collect_children(&mut children);
            for &child in &children {
                let Some(child) = tree.node(child) else {
                    continue;
                };
                if child.kind() != "Identifier" {
                    continue;
                }
                if let Some(name) = child.field("name").and_then(FieldValue::as_str) {
                    if !used.contains(name) {
                        used.insert(name.to_string());
                    }
                }
            }
        }
    })?;

    Ok(used)
}
