use thiserror::Error;

use crate::parse::ParseError;
use crate::types::{CompileError, EvalError};

/// Unified error type covering parsing, rule compilation, and evaluation.
///
/// Returned by convenience methods like [`Policy::can()`](crate::Policy::can)
/// that cross more than one stage.
#[derive(Debug, Error)]
pub enum WardenError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}
