use std::cmp::Ordering;

use serde_json::Value as Json;

use crate::types::{
    compare, like_match, loose_eq, ConditionTree, Connective, EvalError, FieldOp, Operand,
};

pub(crate) fn evaluate(tree: &ConditionTree, record: &Json) -> Result<bool, EvalError> {
    match tree {
        ConditionTree::Compound { connective, children } => match connective {
            Connective::And => {
                for child in children {
                    if !evaluate(child, record)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Connective::Or => {
                for child in children {
                    if evaluate(child, record)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            // Satisfied iff no child is satisfied.
            Connective::Not => {
                for child in children {
                    if evaluate(child, record)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        },
        ConditionTree::Field { field, op, operand } => eval_field(field, *op, operand, record),
    }
}

fn eval_field(
    field: &str,
    op: FieldOp,
    operand: &Operand,
    record: &Json,
) -> Result<bool, EvalError> {
    // Negated operators evaluate as the negation of their registry base.
    if let Some(base) = op.inverts() {
        return Ok(!eval_field(field, base, operand, record)?);
    }
    match operand {
        Operand::Tree(subtree) => Ok(eval_relation(field, op, subtree, record)?),
        Operand::Value(value) => eval_value(field, op, value, record),
    }
}

fn get<'a>(record: &'a Json, field: &str) -> Option<&'a Json> {
    record.as_object().and_then(|map| map.get(field))
}

fn eval_relation(
    field: &str,
    op: FieldOp,
    tree: &ConditionTree,
    record: &Json,
) -> Result<bool, EvalError> {
    match (op, get(record, field)) {
        (FieldOp::Is, Some(target @ Json::Object(_))) => evaluate(tree, target),
        (FieldOp::Some, Some(Json::Array(items))) => {
            for item in items {
                if evaluate(tree, item)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        // An empty collection never satisfies `every`.
        (FieldOp::Every, Some(Json::Array(items))) if !items.is_empty() => {
            for item in items {
                if !evaluate(tree, item)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn eval_value(field: &str, op: FieldOp, value: &Json, record: &Json) -> Result<bool, EvalError> {
    let target = get(record, field);
    match op {
        FieldOp::Eq => Ok(target.is_some_and(|t| loose_eq(t, value))),
        FieldOp::Ne => Ok(target.is_some_and(|t| !loose_eq(t, value))),
        FieldOp::Lt => Ok(ordered(target, value, Ordering::is_lt)),
        FieldOp::Lte => Ok(ordered(target, value, Ordering::is_le)),
        FieldOp::Gt => Ok(ordered(target, value, Ordering::is_gt)),
        FieldOp::Gte => Ok(ordered(target, value, Ordering::is_ge)),
        FieldOp::In => {
            Ok(target.is_some_and(|t| list(value).iter().any(|item| loose_eq(t, item))))
        }
        FieldOp::StartsWith
        | FieldOp::EndsWith
        | FieldOp::Contains
        | FieldOp::IStartsWith
        | FieldOp::IEndsWith
        | FieldOp::IContains => {
            let pattern = value.as_str().unwrap_or_default();
            match target {
                None | Some(Json::Null) => Ok(false),
                Some(Json::String(s)) => Ok(string_op(op, s, pattern)),
                Some(other) => Err(EvalError::TypeMismatch {
                    operator: op.name(),
                    field: field.to_owned(),
                    expected: "a string",
                    received: other.clone(),
                }),
            }
        }
        // `like`/`ilike` are total: non-string targets are unsatisfied.
        FieldOp::Like => {
            let pattern = value.as_str().unwrap_or_default();
            Ok(target
                .and_then(Json::as_str)
                .is_some_and(|s| like_match(pattern, s)))
        }
        FieldOp::Ilike => {
            let pattern = value.as_str().unwrap_or_default().to_lowercase();
            Ok(target
                .and_then(Json::as_str)
                .is_some_and(|s| like_match(&pattern, &s.to_lowercase())))
        }
        FieldOp::Has => Ok(target
            .and_then(Json::as_array)
            .is_some_and(|arr| arr.iter().any(|item| loose_eq(item, value)))),
        FieldOp::HasSome | FieldOp::ArrayOverlaps => Ok(target
            .and_then(Json::as_array)
            .is_some_and(|arr| {
                list(value)
                    .iter()
                    .any(|v| arr.iter().any(|item| loose_eq(item, v)))
            })),
        FieldOp::HasEvery | FieldOp::ArrayContains => Ok(target
            .and_then(Json::as_array)
            .is_some_and(|arr| {
                list(value)
                    .iter()
                    .all(|v| arr.iter().any(|item| loose_eq(item, v)))
            })),
        FieldOp::ArrayContained => Ok(target
            .and_then(Json::as_array)
            .is_some_and(|arr| {
                arr.iter()
                    .all(|item| list(value).iter().any(|v| loose_eq(item, v)))
            })),
        FieldOp::IsEmpty => Ok(target
            .and_then(Json::as_array)
            .is_some_and(|arr| arr.is_empty() == expects(value))),
        FieldOp::IsNull => {
            let is_null = matches!(target, None | Some(Json::Null));
            Ok(is_null == expects(value))
        }
        FieldOp::IsNotNull => {
            let is_null = matches!(target, None | Some(Json::Null));
            Ok(!is_null == expects(value))
        }
        FieldOp::IsSet => Ok(target.is_some() == expects(value)),
        // Opaque payload: defer to the backend, trivially satisfied here.
        FieldOp::Raw => Ok(true),
        // Relation operators carry tree operands, negated operators resolve
        // to their base before this match, and field-scoped `not` is expanded
        // by the parser; none of these can reach a parser-built leaf.
        FieldOp::Is
        | FieldOp::Some
        | FieldOp::Every
        | FieldOp::IsNot
        | FieldOp::None
        | FieldOp::Not
        | FieldOp::NotIn
        | FieldOp::NotLike
        | FieldOp::NotIlike => Ok(false),
    }
}

fn string_op(op: FieldOp, target: &str, pattern: &str) -> bool {
    match op {
        FieldOp::StartsWith => target.starts_with(pattern),
        FieldOp::EndsWith => target.ends_with(pattern),
        FieldOp::Contains => target.contains(pattern),
        FieldOp::IStartsWith => target.to_lowercase().starts_with(&pattern.to_lowercase()),
        FieldOp::IEndsWith => target.to_lowercase().ends_with(&pattern.to_lowercase()),
        FieldOp::IContains => target.to_lowercase().contains(&pattern.to_lowercase()),
        _ => false,
    }
}

fn ordered(target: Option<&Json>, value: &Json, pred: fn(Ordering) -> bool) -> bool {
    target.and_then(|t| compare(t, value)).is_some_and(pred)
}

fn list(value: &Json) -> &[Json] {
    value.as_array().map_or(&[], Vec::as_slice)
}

// Operand validated as a boolean at parse time.
fn expects(value: &Json) -> bool {
    value.as_bool().unwrap_or(false)
}
