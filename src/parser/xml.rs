//! XML schema file front-end.
//!
//! Reduces an XML document to the canonical nested value: element children
//! become map entries, repeated child names collect into a list under the
//! shared name, attributes become scalar entries, and text-only elements
//! become strings.

use roxmltree::{Document, Node};
use serde_json::{Map, Value};

use crate::error::DboGenError;

pub fn parse_xml_text(text: &str) -> Result<Value, DboGenError> {
    let doc =
        Document::parse(text).map_err(|e| DboGenError::structural(format!("bad xml: {e}")))?;
    let root = element_value(doc.root_element());
    // The document element is itself a wrapper: <schema><table>...</table></schema>
    // parses into the map inside it.
    Ok(root)
}

fn element_value(node: Node<'_, '_>) -> Value {
    let child_elements: Vec<Node> = node.children().filter(|c| c.is_element()).collect();

    if child_elements.is_empty() && node.attributes().next().is_none() {
        // Leaf: plain text content.
        return Value::String(node.text().unwrap_or("").trim().to_string());
    }

    let mut map = Map::new();
    for attr in node.attributes() {
        map.insert(
            attr.name().to_string(),
            Value::String(attr.value().to_string()),
        );
    }
    for child in child_elements {
        let key = child.tag_name().name().to_string();
        let value = element_value(child);
        match map.get_mut(&key) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(key, value);
            }
        }
    }
    Value::Object(map)
}
