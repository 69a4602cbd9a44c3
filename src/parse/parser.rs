use serde_json::Value as Json;

use super::error::ParseError;
use crate::types::{
    lookup, ConditionTree, Connective, FieldOp, FilterObject, Instruction, Kind, Operand,
    OperandShape,
};

/// Walk one filter-object level. Multiple entries conjoin under `AND`; a
/// single entry yields its node bare.
pub(crate) fn parse_filter(filter: &FilterObject) -> Result<ConditionTree, ParseError> {
    let mut children = Vec::with_capacity(filter.len());
    for (key, value) in filter {
        parse_entry(key, value, &mut children)?;
    }
    Ok(ConditionTree::and(children))
}

fn parse_entry(
    key: &str,
    value: &Json,
    out: &mut Vec<ConditionTree>,
) -> Result<(), ParseError> {
    let name = strip_alias(key);
    if let Some(&Instruction {
        kind: Kind::Compound(connective),
        ..
    }) = lookup(name)
    {
        out.push(parse_compound(connective, value)?);
        return Ok(());
    }
    // Anything else at filter level is a field name.
    out.extend(parse_field(key, value)?);
    Ok(())
}

/// Parse one field's value, in field scope: the returned conditions all
/// target `field` and are conjoined by the caller, so no `AND` level is
/// injected here. Relation operators and field-scoped `not` recurse through
/// this same path.
fn parse_field(field: &str, value: &Json) -> Result<Vec<ConditionTree>, ParseError> {
    if let Json::Object(map) = value {
        if is_operator_map(map)? {
            return parse_operator_map(field, map);
        }
    }
    // Bare (non-operator) value: implied default operator.
    Ok(vec![ConditionTree::leaf(
        field,
        FieldOp::Eq,
        Operand::Value(value.clone()),
    )])
}

/// Classify an object value: an operator map iff it is non-empty and every
/// key resolves to a field-level instruction (or `mode`). A mix of operator
/// and non-operator keys is an error, never silently ignored.
fn is_operator_map(map: &FilterObject) -> Result<bool, ParseError> {
    if map.is_empty() {
        return Ok(false);
    }
    let mut recognized = 0;
    let mut unknown: Option<&String> = None;
    for key in map.keys() {
        match lookup(strip_alias(key)) {
            Some(inst) if matches!(inst.kind, Kind::Field(_) | Kind::Mode) => recognized += 1,
            _ => unknown = unknown.or(Some(key)),
        }
    }
    if recognized == 0 {
        Ok(false)
    } else if let Some(key) = unknown {
        Err(ParseError::UnknownOperator { name: key.clone() })
    } else {
        Ok(true)
    }
}

fn parse_operator_map(field: &str, map: &FilterObject) -> Result<Vec<ConditionTree>, ParseError> {
    // `mode` is a sibling pseudo-operator: resolve it first so the rewrite
    // applies regardless of key order.
    let mut insensitive = false;
    for (key, value) in map {
        let inst = lookup(strip_alias(key)).expect("classified as operator map");
        if matches!(inst.kind, Kind::Mode) {
            validate(inst, value)?;
            insensitive = value.as_str() == Some("insensitive");
        }
    }

    let mut out = Vec::with_capacity(map.len());
    for (key, value) in map {
        let inst = lookup(strip_alias(key)).expect("classified as operator map");
        let Kind::Field(op) = inst.kind else {
            continue; // `mode` emits no leaf
        };
        validate(inst, value)?;
        if op == FieldOp::Not {
            // Field-scoped negation: re-parse the operand against the same
            // field and wrap the result in a NOT compound.
            let negated = ConditionTree::and(parse_field(field, value)?);
            out.push(ConditionTree::not(negated));
            continue;
        }
        let op = if insensitive { op.case_insensitive() } else { op };
        let operand = if inst.shape == OperandShape::Relation {
            let nested = value.as_object().expect("validated as object");
            Operand::Tree(Box::new(parse_filter(nested)?))
        } else {
            Operand::Value(value.clone())
        };
        out.push(ConditionTree::leaf(field, op, operand));
    }
    Ok(out)
}

fn parse_compound(connective: Connective, value: &Json) -> Result<ConditionTree, ParseError> {
    match value {
        Json::Object(map) => {
            let child = parse_filter(map)?;
            Ok(match connective {
                // A single nested filter is its own conjunction; re-wrapping
                // it would inject a spurious level.
                Connective::And | Connective::Or => child,
                Connective::Not => ConditionTree::not(child),
            })
        }
        Json::Array(items) => {
            let mut children = Vec::with_capacity(items.len());
            for item in items {
                let map = item
                    .as_object()
                    .ok_or_else(|| ParseError::InvalidCompound {
                        connective: connective.keyword(),
                        received: item.clone(),
                    })?;
                children.push(parse_filter(map)?);
            }
            Ok(match connective {
                Connective::And => ConditionTree::and(children),
                Connective::Or => ConditionTree::or(children),
                Connective::Not => ConditionTree::Compound {
                    connective: Connective::Not,
                    children,
                },
            })
        }
        other => Err(ParseError::InvalidCompound {
            connective: connective.keyword(),
            received: other.clone(),
        }),
    }
}

fn validate(inst: &Instruction, value: &Json) -> Result<(), ParseError> {
    let ok = match inst.shape {
        OperandShape::Any | OperandShape::Raw => true,
        OperandShape::Comparable => matches!(value, Json::Number(_) | Json::String(_)),
        OperandShape::List => value.is_array(),
        OperandShape::Pattern => value.is_string(),
        OperandShape::Bool => value.is_boolean(),
        OperandShape::Relation => value.is_object(),
        OperandShape::CaseMode => matches!(value.as_str(), Some("insensitive" | "default")),
    };
    if ok {
        Ok(())
    } else {
        Err(ParseError::InvalidArgument {
            operator: inst.name,
            expected: inst.shape.expected(),
            received: value.clone(),
        })
    }
}

fn strip_alias(key: &str) -> &str {
    key.strip_prefix('$').unwrap_or(key)
}
