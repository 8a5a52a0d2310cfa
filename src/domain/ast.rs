// AST data structures for Symbol Scout.
// A generic, self-describing syntax tree: every node carries a kind
// discriminator and an ordered list of named fields. Nodes live in an arena
// and refer to each other by `NodeId`, so any Tree Source (tree-sitter,
// ESTree JSON, hand-built fixtures) can produce the same shape.

/// Index of a node inside its `SyntaxTree` arena. Ids are the arena's own
/// `usize` indices, so they cannot overflow before the arena does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A leaf value stored directly in a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Str(String),
    Number(f64),
    Bool(bool),
}

impl Primitive {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Primitive::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// The value of one field of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Absent,
    Primitive(Primitive),
    Node(NodeId),
    Sequence(Vec<FieldValue>),
}

impl FieldValue {
    pub fn str(value: impl Into<String>) -> Self {
        FieldValue::Primitive(Primitive::Str(value.into()))
    }

    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            FieldValue::Node(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Primitive(p) => p.as_str(),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Append every child node reachable from this value, in stored order.
    /// Nested sequences are flattened; primitives and absent values add nothing.
    pub fn collect_children(&self, out: &mut Vec<NodeId>) {
        match self {
            FieldValue::Node(id) => out.push(*id),
            FieldValue::Sequence(items) => {
                for item in items {
                    item.collect_children(out);
                }
            }
            FieldValue::Absent | FieldValue::Primitive(_) => {}
        }
    }
}

/// A named field. Field order inside a node is the order the Tree Source
/// inserted them, and traversal follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
}

/// A node in the syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    kind: String,
    fields: Vec<Field>,
}

impl SyntaxNode {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// First field with the given name.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }
}

/// Arena owning every node of one parsed file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    root: Option<NodeId>,
}

impl SyntaxTree {
    /// A tree with no root: the empty program.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Resolve an id. Returns `None` for ids that do not belong to this arena.
    pub fn node(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node in arena order (not traversal order).
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SyntaxNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i), node))
    }

    /// Follow `field` of `id` to the node it holds, if any.
    pub fn child(&self, id: NodeId, field: &str) -> Option<(NodeId, &SyntaxNode)> {
        let child = self.node(id)?.field(field)?.as_node()?;
        self.node(child).map(|node| (child, node))
    }
}

/// Incremental construction of a `SyntaxTree`.
///
/// Ids are handed out before fields are filled in, so Tree Sources can build
/// iteratively, and fixtures can wire shared subtrees or even cycles.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<SyntaxNode>,
    root: Option<NodeId>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, kind: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SyntaxNode {
            kind: kind.into(),
            fields: Vec::new(),
        });
        id
    }

    /// Append a field to `node`. Ids from another builder are ignored.
    pub fn push_field(&mut self, node: NodeId, name: impl Into<String>, value: FieldValue) {
        if let Some(target) = self.nodes.get_mut(node.index()) {
            target.fields.push(Field {
                name: name.into(),
                value,
            });
        }
    }

    /// Convenience for the common `{ type: "Identifier", name }` leaf.
    pub fn add_identifier(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.add_node("Identifier");
        self.push_field(id, "name", FieldValue::str(name));
        id
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn finish(self) -> SyntaxTree {
        SyntaxTree {
            nodes: self.nodes,
            root: self.root,
        }
    }
}
