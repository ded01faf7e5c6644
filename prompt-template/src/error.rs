//! Render errors reported by the engine and carried into the preview response.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a failed render, serialized as the `errorType` wire string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    /// A variable, map key or list index could not be resolved (strict mode only).
    UndefinedVariable,
    /// A `fn.*` call failed: wrong arity, unsupported operand, bad pattern or path.
    FunctionError,
    /// An operator was applied to operands it does not support.
    TypeError,
    /// Malformed delimiters, expression grammar, block structure or unknown function.
    SyntaxError,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::UndefinedVariable => "UNDEFINED_VARIABLE",
            ErrorType::FunctionError => "FUNCTION_ERROR",
            ErrorType::TypeError => "TYPE_ERROR",
            ErrorType::SyntaxError => "SYNTAX_ERROR",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A render failure pinned to one expression of the template.
///
/// `expression` is the trimmed text between the delimiters (or the block tag text for
/// structural block errors); `offset` is the byte offset of the span in the template and
/// decides which error wins when more than one would be reported.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{error_type} in `{expression}`: {message}")]
pub struct RenderError {
    pub error_type: ErrorType,
    pub expression: String,
    pub message: String,
    pub offset: usize,
}

impl RenderError {
    pub fn new(
        error_type: ErrorType,
        expression: impl Into<String>,
        message: impl Into<String>,
        offset: usize,
    ) -> Self {
        Self {
            error_type,
            expression: expression.into(),
            message: message.into(),
            offset,
        }
    }

    pub fn syntax(expression: impl Into<String>, message: impl Into<String>, offset: usize) -> Self {
        Self::new(ErrorType::SyntaxError, expression, message, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&ErrorType::UndefinedVariable).unwrap(),
            "\"UNDEFINED_VARIABLE\""
        );
        assert_eq!(ErrorType::FunctionError.as_str(), "FUNCTION_ERROR");
        assert_eq!(ErrorType::SyntaxError.to_string(), "SYNTAX_ERROR");
        let parsed: ErrorType = serde_json::from_str("\"TYPE_ERROR\"").unwrap();
        assert_eq!(parsed, ErrorType::TypeError);
    }

    #[test]
    fn display_includes_expression_and_message() {
        let err = RenderError::syntax("fn.nope(1)", "unknown function `nope`", 3);
        assert_eq!(
            err.to_string(),
            "SYNTAX_ERROR in `fn.nope(1)`: unknown function `nope`"
        );
    }
}
