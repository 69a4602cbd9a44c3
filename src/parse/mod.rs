mod error;
mod parser;

pub use error::ParseError;

use serde_json::Value as Json;

use crate::types::ConditionTree;

/// Parse a caller-authored filter object into a [`ConditionTree`].
///
/// # Errors
///
/// Returns [`ParseError`] if the filter is not an object, uses an unknown
/// operator, hands a compound keyword the wrong operand shape, or an
/// operator rejects its operand.
pub fn parse(filter: &Json) -> Result<ConditionTree, ParseError> {
    match filter {
        Json::Object(map) => parser::parse_filter(map),
        other => Err(ParseError::InvalidFilter {
            received: other.clone(),
        }),
    }
}
