//! Recursive-descent parser
//!
//!     The parser pulls tokens from the [Bridge](super::bridge::Bridge) on demand and
//!     builds one [Configuration](super::ast::Configuration). Blocks close when a token
//!     appears at a lower depth than the block's members; there is no dedent token, and
//!     the end of input closes whatever is still open.
//!
//!     Errors do not stop the run. The parser records the error, skips to the next line
//!     that starts with a keyword at depth 0 and carries on, so one pass reports every
//!     broken section. A lexical error is the exception: the token stream itself is
//!     unusable after it, so it aborts at once.
//!
//! Layout
//!
//!     parser.rs: the parser state, token helpers, block handling and recovery.
//!     sections.rs: configuration sections (version, type, title, people, publication,
//!         style).
//!     content.rs: content sections, sentences and the bibliography.

mod content;
mod parser;
mod sections;

pub use parser::Parser;

use super::token::{Position, Token};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at {position}: {message}")]
pub struct ParseError {
    pub message: String,
    /// Description of the offending token; `None` at end of input
    pub found: Option<String>,
    pub position: Position,
}

impl ParseError {
    pub fn new(message: impl Into<String>, token: &Token) -> Self {
        Self {
            message: message.into(),
            found: Some(token.describe()),
            position: token.position,
        }
    }

    pub fn unexpected(expected: &str, token: &Token) -> Self {
        let found = if token.is_keyword() && token.keyword().is_none() {
            format!("unknown keyword `{}`", token.value)
        } else {
            token.describe()
        };
        Self {
            message: format!("expected {expected}, found {found}"),
            found: Some(found),
            position: token.position,
        }
    }

    pub fn end_of_input(expected: &str, position: Position) -> Self {
        Self {
            message: format!("expected {expected}, found end of input"),
            found: None,
            position,
        }
    }
}

/// Every parse error of one pass, in source order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseErrors(Vec<ParseError>);

impl ParseErrors {
    pub fn new(errors: Vec<ParseError>) -> Self {
        Self(errors)
    }

    pub fn first(&self) -> Option<&ParseError> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParseError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<ParseError> {
        self.0
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&lines.join("\n"))
    }
}
