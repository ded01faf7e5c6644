//! Expression language used inside template spans.
//!
//! [`parse`] turns expression text into an [`Expr`]; [`Evaluator`] runs it against a
//! [`Scope`]. Only `fn.<name>(...)` calls of catalog functions are allowed, so unknown function
//! names are rejected while parsing.

mod ast;
mod eval;
mod lexer;
mod parser;
mod scope;

use std::fmt;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use eval::{EvalError, Evaluator, RenderMode};
pub use parser::parse;
pub use scope::{Frame, Scope};

/// Parse failure; `offset` is a byte position within the expression text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub offset: usize,
}

impl SyntaxError {
    pub(crate) fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.message, self.offset)
    }
}

impl std::error::Error for SyntaxError {}
