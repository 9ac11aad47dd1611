//! JSON tree form.
//!
//! Mirrors the binary tag set (see [`crate::binary`]): each node is an
//! object `{"context", "kind", "id", "tag", "surface", "children"}` with
//! blobs carried as arrays of byte values.

use serde_json::{Value, json};

use crate::semid::{SemId, SemKind};
use crate::surface::Surface;
use crate::tree::{NodeId, Tree};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JsonError {
    #[error("expected {what} in node object")]
    Missing { what: &'static str },
    #[error("unknown surface tag {tag}")]
    BadTag { tag: u64 },
    #[error("unknown identifier kind {code}")]
    BadKind { code: i64 },
    #[error("surface value does not match its tag")]
    BadSurface,
}

/// Encode the subtree at `node` as a JSON value.
pub fn to_json(tree: &Tree, node: NodeId) -> Value {
    let symbol = tree.symbol(node);
    let (tag, surface) = surface_to_json(tree.surface(node));
    let children: Vec<Value> = tree
        .children(node)
        .iter()
        .map(|&child| to_json(tree, child))
        .collect();
    json!({
        "context": symbol.context,
        "kind": symbol.kind.code(),
        "id": symbol.id,
        "tag": tag,
        "surface": surface,
        "children": children,
    })
}

fn surface_to_json(surface: &Surface) -> (u8, Value) {
    match surface {
        Surface::Null => (0, Value::Null),
        Surface::Int(v) => (1, json!(*v as f64)),
        Surface::Float(v) => (1, json!(v)),
        Surface::Char(c) => (2, json!(c.to_string())),
        Surface::Str(s) => (2, json!(s)),
        Surface::Bool(v) => (3, json!(v)),
        Surface::Bytes(b) => (4, json!(b)),
        Surface::Id(id) => (5, json!([id.context, id.kind.code(), id.id])),
    }
}

/// Decode a tree from its JSON form.
pub fn from_json(value: &Value) -> Result<(Tree, NodeId), JsonError> {
    let mut tree = Tree::new();
    let root = decode_node(value, &mut tree)?;
    Ok((tree, root))
}

fn decode_node(value: &Value, tree: &mut Tree) -> Result<NodeId, JsonError> {
    let obj = value.as_object().ok_or(JsonError::Missing { what: "object" })?;
    let context = obj
        .get("context")
        .and_then(Value::as_u64)
        .ok_or(JsonError::Missing { what: "context" })? as u32;
    let code = obj
        .get("kind")
        .and_then(Value::as_i64)
        .ok_or(JsonError::Missing { what: "kind" })?;
    let id = obj
        .get("id")
        .and_then(Value::as_u64)
        .ok_or(JsonError::Missing { what: "id" })? as u32;
    let kind = SemKind::from_code(code as i32).ok_or(JsonError::BadKind { code })?;
    let tag = obj
        .get("tag")
        .and_then(Value::as_u64)
        .ok_or(JsonError::Missing { what: "tag" })?;
    let surface = decode_surface(tag, obj.get("surface").unwrap_or(&Value::Null))?;

    let node = tree.new_node(SemId::new(context, kind, id), surface);
    if let Some(children) = obj.get("children").and_then(Value::as_array) {
        for child_value in children {
            let child = decode_node(child_value, tree)?;
            tree.add_child(node, child);
        }
    }
    Ok(node)
}

fn decode_surface(tag: u64, value: &Value) -> Result<Surface, JsonError> {
    match tag {
        0 => Ok(Surface::Null),
        1 => value
            .as_f64()
            .map(Surface::Float)
            .ok_or(JsonError::BadSurface),
        2 => value
            .as_str()
            .map(|s| Surface::Str(s.to_owned()))
            .ok_or(JsonError::BadSurface),
        3 => value
            .as_bool()
            .map(Surface::Bool)
            .ok_or(JsonError::BadSurface),
        4 => {
            let array = value.as_array().ok_or(JsonError::BadSurface)?;
            let bytes = array
                .iter()
                .map(|v| {
                    v.as_u64()
                        .and_then(|b| u8::try_from(b).ok())
                        .ok_or(JsonError::BadSurface)
                })
                .collect::<Result<Vec<u8>, _>>()?;
            Ok(Surface::Bytes(bytes))
        }
        5 => {
            let array = value.as_array().ok_or(JsonError::BadSurface)?;
            if array.len() != 3 {
                return Err(JsonError::BadSurface);
            }
            let context = array[0].as_u64().ok_or(JsonError::BadSurface)? as u32;
            let code = array[1].as_i64().ok_or(JsonError::BadSurface)?;
            let id = array[2].as_u64().ok_or(JsonError::BadSurface)? as u32;
            let kind = SemKind::from_code(code as i32).ok_or(JsonError::BadKind { code })?;
            Ok(Surface::Id(SemId::new(context, kind, id)))
        }
        _ => Err(JsonError::BadTag { tag }),
    }
}
