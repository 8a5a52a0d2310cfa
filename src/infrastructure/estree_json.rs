//! ESTree JSON Tree Source
//!
//! Accepts the JSON AST emitted by any ESTree-conformant parser (Babel,
//! Acorn, Espree, ...). Objects become nodes discriminated by their `type`
//! member; every other member becomes a field, in document order.
//!
//! Parser output for generated or bundled code nests far deeper than
//! `serde_json`'s default recursion limit, so decoding runs without that
//! limit on a stack grown on demand, and the decoded value is converted and
//! torn down iteratively.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::ast::{FieldValue, NodeId, Primitive, SyntaxTree, TreeBuilder};
use crate::domain::error::ParseError;
use crate::domain::language::SourceLanguage;
use crate::ports::TreeSource;

#[derive(Debug, Default, Clone, Copy)]
pub struct EstreeJsonSource;

impl TreeSource for EstreeJsonSource {
    fn language(&self) -> SourceLanguage {
        SourceLanguage::EstreeJson
    }

    fn parse(&self, text: &str) -> Result<SyntaxTree, ParseError> {
        if text.trim().is_empty() {
            return Ok(SyntaxTree::empty());
        }
        let value = decode(text).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
        let tree = tree_from_value(&value);
        dismantle(value);
        tree
    }
}

fn decode(text: &str) -> serde_json::Result<Value> {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

/// Drop a decoded document without recursing once per nesting level.
fn dismantle(value: Value) {
    let mut pending = vec![value];
    while let Some(value) = pending.pop() {
        match value {
            Value::Array(items) => pending.extend(items),
            Value::Object(object) => pending.extend(object.into_iter().map(|(_, v)| v)),
            _ => {}
        }
    }
}

/// Convert an already-decoded JSON value into a `SyntaxTree`.
pub fn tree_from_value(value: &Value) -> Result<SyntaxTree, ParseError> {
    let object = match value {
        Value::Null => return Ok(SyntaxTree::empty()),
        Value::Object(object) => object,
        other => return Err(ParseError::UnexpectedRoot(json_type(other))),
    };

    let mut builder = TreeBuilder::new();
    let root = builder.add_node(kind_of(object));
    builder.set_root(root);

    let mut pending: Vec<(NodeId, &Map<String, Value>)> = vec![(root, object)];
    while let Some((id, object)) = pending.pop() {
        for (key, member) in object {
            if key == "type" && member.is_string() {
                continue;
            }
            let value = field_value(&mut builder, member, &mut pending);
            builder.push_field(id, key.as_str(), value);
        }
    }

    Ok(builder.finish())
}

fn field_value<'v>(
    builder: &mut TreeBuilder,
    value: &'v Value,
    pending: &mut Vec<(NodeId, &'v Map<String, Value>)>,
) -> FieldValue {
    match value {
        Value::Null => FieldValue::Absent,
        Value::Bool(b) => FieldValue::Primitive(Primitive::Bool(*b)),
        Value::Number(n) => FieldValue::Primitive(Primitive::Number(n.as_f64().unwrap_or(f64::NAN))),
        Value::String(s) => FieldValue::str(s.as_str()),
        Value::Array(items) => FieldValue::Sequence(
            items
                .iter()
                .map(|item| field_value(builder, item, pending))
                .collect(),
        ),
        Value::Object(object) => {
            let id = builder.add_node(kind_of(object));
            pending.push((id, object));
            FieldValue::Node(id)
        }
    }
}

/// Objects without a string `type` (Babel's `loc`, `extra`, ...) get an
/// empty kind; they are still walked.
fn kind_of(object: &Map<String, Value>) -> &str {
    object.get("type").and_then(Value::as_str).unwrap_or("")
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_member_becomes_kind() {
        let tree = EstreeJsonSource
            .parse(r#"{"type":"Identifier","start":0,"name":"foo"}"#)
            .unwrap();
        let root = tree.node(tree.root().unwrap()).unwrap();
        assert_eq!(root.kind(), "Identifier");
        let names: Vec<&str> = root.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["start", "name"]);
        assert_eq!(root.field("name").and_then(FieldValue::as_str), Some("foo"));
    }

    #[test]
    fn test_members_keep_document_order() {
        let tree = EstreeJsonSource
            .parse(r#"{"type":"X","zeta":1,"alpha":true,"mid":null}"#)
            .unwrap();
        let root = tree.node(tree.root().unwrap()).unwrap();
        let names: Vec<&str> = root.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(root.field("mid"), Some(&FieldValue::Absent));
    }

    #[test]
    fn test_untyped_objects_are_nodes() {
        let tree = EstreeJsonSource
            .parse(r#"{"type":"Program","loc":{"start":{"line":1}}}"#)
            .unwrap();
        let (_, loc) = tree.child(tree.root().unwrap(), "loc").unwrap();
        assert_eq!(loc.kind(), "");
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_arrays_become_sequences() {
        let tree = EstreeJsonSource
            .parse(r#"{"type":"ArrayPattern","elements":[null,{"type":"Identifier","name":"a"}]}"#)
            .unwrap();
        let root = tree.node(tree.root().unwrap()).unwrap();
        let elements = root.field("elements").and_then(FieldValue::as_sequence).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0], FieldValue::Absent);
        assert!(elements[1].as_node().is_some());
    }

    #[test]
    fn test_empty_and_null_inputs_are_empty_trees() {
        assert!(EstreeJsonSource.parse("").unwrap().root().is_none());
        assert!(EstreeJsonSource.parse("  \n").unwrap().root().is_none());
        assert!(EstreeJsonSource.parse("null").unwrap().root().is_none());
    }

    fn nested_binary_expressions(depth: usize) -> String {
        let mut json = String::new();
        for _ in 0..depth {
            json.push_str(r#"{"type":"BinaryExpression","operator":"+","left":"#);
        }
        json.push_str(r#"{"type":"StringLiteral","value":"a"}"#);
        for _ in 0..depth {
            json.push_str(r#","right":{"type":"StringLiteral","value":"b"}}"#);
        }
        json
    }

    #[test]
    fn test_deeply_nested_document_is_accepted() {
        let tree = EstreeJsonSource.parse(&nested_binary_expressions(5_000)).unwrap();
        // Each level holds the expression and its right-hand literal.
        assert_eq!(tree.len(), 5_000 * 2 + 1);
        let root = tree.node(tree.root().unwrap()).unwrap();
        assert_eq!(root.kind(), "BinaryExpression");
    }

    #[test]
    fn test_trailing_content_is_rejected() {
        assert!(matches!(
            EstreeJsonSource.parse(r#"{"type":"Program"} {"type":"Program"}"#),
            Err(ParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_documents() {
        assert!(matches!(
            EstreeJsonSource.parse("{not json"),
            Err(ParseError::InvalidJson(_))
        ));
        assert_eq!(
            EstreeJsonSource.parse("[1, 2]"),
            Err(ParseError::UnexpectedRoot("an array"))
        );
    }
}
