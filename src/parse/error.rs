use serde_json::Value as Json;
use thiserror::Error;

/// Errors produced when parsing a filter object.
///
/// `InvalidArgument` is the validation class: an operator rejected its
/// operand's shape. The other variants are structural.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("unknown operator '{name}'")]
    UnknownOperator { name: String },

    #[error("invalid argument for operator '{operator}': expected {expected}, got {received}")]
    InvalidArgument {
        operator: &'static str,
        expected: &'static str,
        received: Json,
    },

    #[error("'{connective}' expects a filter object or a list of filter objects, got {received}")]
    InvalidCompound {
        connective: &'static str,
        received: Json,
    },

    #[error("filter must be an object, got {received}")]
    InvalidFilter { received: Json },
}
