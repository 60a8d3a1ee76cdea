// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # spacey-syntax
//!
//! A JavaScript lexer and recursive-descent parser producing an
//! ESTree-shaped AST in which every node carries its byte [`Span`].
//!
//! ## Quick Start
//!
//! ```rust
//! use spacey_syntax::{ast::Statement, parse};
//!
//! let program = parse("module.exports = 42;").expect("Should parse");
//! assert!(matches!(program.body[0], Statement::Expression(_)));
//! ```

#![warn(missing_docs)]

pub mod ast;
pub mod lexer;
pub mod parser;

pub use lexer::Span;

/// Parses a script or module into a [`ast::Program`].
pub fn parse(source: &str) -> Result<ast::Program, Error> {
    parser::Parser::new(source).parse_program()
}

/// Error type for parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Syntax error during parsing
    SyntaxError {
        /// Human readable description
        message: String,
        /// Location of the offending token
        span: Span,
    },
}

impl Error {
    /// Source location of the error.
    pub fn span(&self) -> Span {
        match self {
            Error::SyntaxError { span, .. } => *span,
        }
    }

    /// One-based line and column of the error within `source`.
    pub fn location(&self, source: &str) -> (usize, usize) {
        let offset = self.span().start.min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let column = before
            .rfind('\n')
            .map_or(before.chars().count(), |nl| before[nl + 1..].chars().count())
            + 1;
        (line, column)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::SyntaxError { message, span } => {
                write!(f, "SyntaxError: {} ({}..{})", message, span.start, span.end)
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry_point() {
        let program = parse("var a = require('a');").expect("Should parse");
        assert_eq!(program.body.len(), 1);
        assert_eq!(program.span, Span::new(0, 21));
    }

    #[test]
    fn test_error_display() {
        let err = parse("var = 1").expect_err("Should fail");
        assert!(err.to_string().starts_with("SyntaxError: "));
        assert_eq!(err.span(), Span::new(4, 5));
    }

    #[test]
    fn test_error_location() {
        let source = "var a = 1;\nvar b = ;";
        let err = parse(source).expect_err("Should fail");
        assert_eq!(err.location(source), (2, 9));
    }
}
