//! Re-expression of a merged condition tree in the caller-facing nested
//! filter shape, suitable for handing to a downstream query-condition
//! consumer without further transformation.

use serde_json::{Map, Value as Json};

use crate::types::{ConditionTree, Connective, FilterObject, Operand};

pub(crate) fn serialize(tree: &ConditionTree) -> FilterObject {
    match tree {
        ConditionTree::Compound { connective, children } => match connective {
            Connective::And if children.is_empty() => Map::new(),
            // A lone single-element OR unwraps so single-rule policies emit
            // flat, minimal filters.
            Connective::Or if children.len() == 1 => serialize(&children[0]),
            Connective::Not if children.len() == 1 => {
                single(connective.keyword(), Json::Object(serialize(&children[0])))
            }
            _ => single(connective.keyword(), children_array(children)),
        },
        ConditionTree::Field { field, op, operand } => {
            let payload = match operand {
                Operand::Value(value) => value.clone(),
                Operand::Tree(subtree) => Json::Object(serialize(subtree)),
            };
            single(field, Json::Object(single(op.name(), payload)))
        }
    }
}

fn children_array(children: &[ConditionTree]) -> Json {
    Json::Array(
        children
            .iter()
            .map(|child| Json::Object(serialize(child)))
            .collect(),
    )
}

fn single(key: &str, value: Json) -> FilterObject {
    let mut map = Map::new();
    map.insert(key.to_owned(), value);
    map
}
