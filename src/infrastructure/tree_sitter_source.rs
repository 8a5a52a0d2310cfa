//! tree-sitter Tree Source
//!
//! Parses JavaScript, TypeScript, TSX and Python with the tree-sitter
//! grammars and lowers the concrete syntax tree into a `SyntaxTree`.
//! Declarations and imports are renamed to their ESTree discriminators
//! (`FunctionDeclaration`, `ClassDeclaration`, `ImportDeclaration` with
//! `specifiers`) so the standard shape table applies unchanged; every other
//! node keeps its grammar kind. Named children become one field entry each,
//! in source order.

use tree_sitter::{Node, Parser};

use crate::domain::ast::{FieldValue, NodeId, SyntaxTree, TreeBuilder};
use crate::domain::error::ParseError;
use crate::domain::language::SourceLanguage;
use crate::ports::TreeSource;

/// Leaves lowered to `Identifier`. Property names (`obj.prop`, method and
/// key names) keep their grammar kind: they label members, they do not refer
/// to bindings.
const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "type_identifier",
    "shorthand_property_identifier",
    "shorthand_property_identifier_pattern",
    "statement_identifier",
];

/// Field holding children that the grammar leaves unnamed.
const UNNAMED_FIELD: &str = "children";

/// Grammar family; decides how declarations and imports are lowered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    EcmaScript,
    Python,
}

#[derive(Debug, Clone, Copy)]
pub struct TreeSitterSource {
    language: SourceLanguage,
}

impl TreeSitterSource {
    pub fn javascript() -> Self {
        Self {
            language: SourceLanguage::JavaScript,
        }
    }

    pub fn typescript() -> Self {
        Self {
            language: SourceLanguage::TypeScript,
        }
    }

    pub fn tsx() -> Self {
        Self {
            language: SourceLanguage::Tsx,
        }
    }

    pub fn python() -> Self {
        Self {
            language: SourceLanguage::Python,
        }
    }

    fn grammar(&self) -> tree_sitter::Language {
        match self.language {
            SourceLanguage::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            SourceLanguage::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            SourceLanguage::Python => tree_sitter_python::LANGUAGE.into(),
            _ => tree_sitter_javascript::LANGUAGE.into(),
        }
    }

    fn dialect(&self) -> Dialect {
        match self.language {
            SourceLanguage::Python => Dialect::Python,
            _ => Dialect::EcmaScript,
        }
    }

    fn grammar_error(&self, message: impl Into<String>) -> ParseError {
        ParseError::Grammar {
            language: self.language.name().to_string(),
            message: message.into(),
        }
    }
}

impl TreeSource for TreeSitterSource {
    fn language(&self) -> SourceLanguage {
        self.language
    }

    fn parse(&self, text: &str) -> Result<SyntaxTree, ParseError> {
        // tree_sitter::Parser is not Sync, so one is created per call.
        let mut parser = Parser::new();
        parser
            .set_language(&self.grammar())
            .map_err(|e| self.grammar_error(e.to_string()))?;
        let tree = parser
            .parse(text, None)
            .ok_or_else(|| self.grammar_error("parser returned no tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(syntax_error(self.language, first_error(root), text));
        }

        Ok(Lowering::new(text, self.dialect()).run(root))
    }
}

/// Descend along the erroneous children to the first ERROR or MISSING node.
fn first_error(root: Node<'_>) -> Node<'_> {
    let mut node = root;
    loop {
        if node.is_error() || node.is_missing() {
            return node;
        }
        let mut cursor = node.walk();
        let next = node
            .children(&mut cursor)
            .find(|child| child.is_error() || child.is_missing() || child.has_error());
        match next {
            Some(child) => node = child,
            None => return node,
        }
    }
}

fn syntax_error(language: SourceLanguage, node: Node<'_>, text: &str) -> ParseError {
    let position = node.start_position();
    let snippet = if node.is_missing() {
        format!("missing {}", node.kind())
    } else {
        node.utf8_text(text.as_bytes())
            .unwrap_or("")
            .lines()
            .next()
            .unwrap_or("")
            .chars()
            .take(40)
            .collect()
    };
    ParseError::Syntax {
        language: language.name().to_string(),
        line: position.row + 1,
        column: position.column + 1,
        snippet,
    }
}

/// ESTree discriminator for a grammar node, or the grammar kind itself.
fn lowered_kind(node: Node<'_>, dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::EcmaScript => ecmascript_kind(node),
        Dialect::Python => python_kind(node),
    }
}

fn ecmascript_kind(node: Node<'_>) -> &'static str {
    match node.kind() {
        "program" => "Program",
        "function_declaration" | "generator_function_declaration" => "FunctionDeclaration",
        "class_declaration" | "abstract_class_declaration" => "ClassDeclaration",
        "import_statement" if has_child_kind(node, "import_require_clause") => {
            "TSImportEqualsDeclaration"
        }
        "import_statement" => "ImportDeclaration",
        "string" => "StringLiteral",
        kind if IDENTIFIER_KINDS.contains(&kind) => "Identifier",
        kind => kind,
    }
}

fn python_kind(node: Node<'_>) -> &'static str {
    match node.kind() {
        "module" => "Program",
        "function_definition" => "FunctionDeclaration",
        "class_definition" => "ClassDeclaration",
        "import_statement" | "import_from_statement" | "future_import_statement" => {
            "ImportDeclaration"
        }
        "identifier" => "Identifier",
        kind => kind,
    }
}

fn has_child_kind(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).any(|c| c.kind() == kind);
    found
}

fn unquote(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Dotted module path without the whitespace the grammar tolerates.
fn compact(s: &str) -> String {
    s.split_whitespace().collect()
}

struct Lowering<'s> {
    text: &'s str,
    dialect: Dialect,
    builder: TreeBuilder,
}

impl<'s> Lowering<'s> {
    fn new(text: &'s str, dialect: Dialect) -> Self {
        Self {
            text,
            dialect,
            builder: TreeBuilder::new(),
        }
    }

    fn run<'t>(mut self, root: Node<'t>) -> SyntaxTree {
        let mut pending: Vec<(Node<'t>, NodeId)> = Vec::new();
        let root_id = self.alloc(root, &mut pending);
        self.builder.set_root(root_id);

        while let Some((node, id)) = pending.pop() {
            match lowered_kind(node, self.dialect) {
                "ImportDeclaration" if self.dialect == Dialect::Python => {
                    self.lower_python_import(node, id)
                }
                "ImportDeclaration" => self.lower_import(node, id, &mut pending),
                "StringLiteral" => {
                    let value = unquote(self.node_text(node)).to_string();
                    self.builder.push_field(id, "value", FieldValue::str(value));
                }
                "Identifier" => {
                    let name = self.node_text(node).to_string();
                    self.builder.push_field(id, "name", FieldValue::str(name));
                }
                "Program" => self.lower_children(node, id, "Program", &mut pending),
                _ if node.named_child_count() == 0 => {
                    let text = self.node_text(node).to_string();
                    self.builder.push_field(id, "text", FieldValue::str(text));
                }
                kind => self.lower_children(node, id, kind, &mut pending),
            }
        }

        self.builder.finish()
    }

    fn node_text(&self, node: Node<'_>) -> &'s str {
        node.utf8_text(self.text.as_bytes()).unwrap_or("")
    }

    /// Reserve an arena slot for `node`; its fields are filled when popped.
    fn alloc<'t>(&mut self, node: Node<'t>, pending: &mut Vec<(Node<'t>, NodeId)>) -> NodeId {
        let id = self.builder.add_node(lowered_kind(node, self.dialect));
        pending.push((node, id));
        id
    }

    /// One field entry per named child, in source order. A field the grammar
    /// repeats (TypeScript `decorator`s between class members) appears once
    /// per child, so interleaved fields keep their relative order.
    fn lower_children<'t>(
        &mut self,
        node: Node<'t>,
        id: NodeId,
        kind: &str,
        pending: &mut Vec<(Node<'t>, NodeId)>,
    ) {
        let is_declaration = kind == "FunctionDeclaration" || kind == "ClassDeclaration";

        let mut cursor = node.walk();
        if !cursor.goto_first_child() {
            return;
        }
        loop {
            let child = cursor.node();
            if child.is_named() {
                let field = match cursor.field_name() {
                    Some("name") if is_declaration => "id",
                    Some(field) => field,
                    None => UNNAMED_FIELD,
                };
                let child_id = self.alloc(child, pending);
                self.builder.push_field(id, field, FieldValue::Node(child_id));
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }

    fn lower_import<'t>(
        &mut self,
        node: Node<'t>,
        id: NodeId,
        pending: &mut Vec<(Node<'t>, NodeId)>,
    ) {
        let mut specifiers = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "import_clause" {
                self.lower_import_clause(child, &mut specifiers);
            }
        }
        self.builder
            .push_field(id, "specifiers", FieldValue::Sequence(specifiers));

        let source = match node.child_by_field_name("source") {
            Some(source) => FieldValue::Node(self.alloc(source, pending)),
            None => FieldValue::Absent,
        };
        self.builder.push_field(id, "source", source);
    }

    fn lower_import_clause(&mut self, clause: Node<'_>, specifiers: &mut Vec<FieldValue>) {
        let mut cursor = clause.walk();
        for child in clause.named_children(&mut cursor) {
            match child.kind() {
                // import x from 'm'
                "identifier" => {
                    let spec = self.specifier("ImportDefaultSpecifier", None, self.node_text(child));
                    specifiers.push(FieldValue::Node(spec));
                }
                // import * as ns from 'm'
                "namespace_import" => {
                    let mut inner = child.walk();
                    let local = child
                        .named_children(&mut inner)
                        .find(|n| n.kind() == "identifier");
                    if let Some(local) = local {
                        let spec =
                            self.specifier("ImportNamespaceSpecifier", None, self.node_text(local));
                        specifiers.push(FieldValue::Node(spec));
                    }
                }
                // import { a, b as c, "d-e" as f } from 'm'
                "named_imports" => {
                    let mut inner = child.walk();
                    for item in child.named_children(&mut inner) {
                        if item.kind() != "import_specifier" {
                            continue;
                        }
                        let Some(name) = item.child_by_field_name("name") else {
                            continue;
                        };
                        let local = item
                            .child_by_field_name("alias")
                            .map(|alias| self.node_text(alias))
                            .unwrap_or_else(|| unquote(self.node_text(name)));
                        let spec = self.specifier("ImportSpecifier", Some(name), local);
                        specifiers.push(FieldValue::Node(spec));
                    }
                }
                _ => {}
            }
        }
    }

    /// Python imports record the dotted path as written, prefixed with the
    /// module for `from` imports: `import os.path` gives `os.path`,
    /// `from a.b import c as d` gives `a.b.c`, `from m import *` gives `m.*`.
    /// Relative-import dots are dropped.
    fn lower_python_import(&mut self, node: Node<'_>, id: NodeId) {
        let module = match node.kind() {
            "future_import_statement" => Some("__future__".to_string()),
            _ => node
                .child_by_field_name("module_name")
                .map(|module| compact(self.node_text(module)).trim_start_matches('.').to_string()),
        }
        .filter(|module| !module.is_empty());

        let mut names: Vec<String> = Vec::new();
        let mut cursor = node.walk();
        for name in node.children_by_field_name("name", &mut cursor) {
            let target = match name.kind() {
                "aliased_import" => name.child_by_field_name("name"),
                _ => Some(name),
            };
            if let Some(target) = target {
                names.push(compact(self.node_text(target)));
            }
        }
        if has_child_kind(node, "wildcard_import") {
            names.push("*".to_string());
        }

        let mut specifiers = Vec::with_capacity(names.len());
        for name in names {
            let local = match &module {
                Some(module) => format!("{}.{}", module, name),
                None => name,
            };
            let spec = self.specifier("ImportSpecifier", None, &local);
            specifiers.push(FieldValue::Node(spec));
        }
        self.builder
            .push_field(id, "specifiers", FieldValue::Sequence(specifiers));

        let source = match module {
            Some(module) => {
                let literal = self.builder.add_node("StringLiteral");
                self.builder.push_field(literal, "value", FieldValue::str(module));
                FieldValue::Node(literal)
            }
            None => FieldValue::Absent,
        };
        self.builder.push_field(id, "source", source);
    }

    /// Build a synthetic specifier node: `imported` (when given) then `local`.
    fn specifier(&mut self, kind: &str, imported: Option<Node<'_>>, local: &str) -> NodeId {
        let spec = self.builder.add_node(kind);
        if let Some(imported) = imported {
            let text = self.node_text(imported);
            let imported_id = if imported.kind() == "string" {
                let literal = self.builder.add_node("StringLiteral");
                self.builder
                    .push_field(literal, "value", FieldValue::str(unquote(text)));
                literal
            } else {
                self.builder.add_identifier(text)
            };
            self.builder
                .push_field(spec, "imported", FieldValue::Node(imported_id));
        }
        let local_id = self.builder.add_identifier(local);
        self.builder.push_field(spec, "local", FieldValue::Node(local_id));
        spec
    }
}
