use serde_json::Value as Json;
use thiserror::Error;

use crate::parse::ParseError;

/// Errors produced when compiling a policy's rules into a merged filter.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("no rule allows action '{action}' on subject '{subject}'")]
    Forbidden { action: String, subject: String },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Runtime type errors from the interpreter.
///
/// Only the non-total operators raise these; `like`/`ilike` and every other
/// operator return `false` on unexpected field values instead.
#[derive(Debug, Error, PartialEq)]
pub enum EvalError {
    #[error("operator '{operator}' on field '{field}' expects {expected}, got {received}")]
    TypeMismatch {
        operator: &'static str,
        field: String,
        expected: &'static str,
        received: Json,
    },
}
