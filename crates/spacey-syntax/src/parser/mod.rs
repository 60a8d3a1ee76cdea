//! Parser for JavaScript source code.
//!
//! Transforms a stream of tokens into an Abstract Syntax Tree (AST).
//!
//! ## Structure
//!
//! - `parser` - Parser state, token helpers and error reporting
//! - `statements` - Statements, declarations, classes, `import`/`export`
//! - `expressions` - Operators, literals, calls, arrows and patterns
//!
//! ## Usage
//!
//! ```rust
//! use spacey_syntax::parser::Parser;
//!
//! let mut parser = Parser::new("const x = require('x');\nmodule.exports = x;");
//! let program = parser.parse_program().expect("Should parse");
//! assert_eq!(program.body.len(), 2);
//! ```

mod expressions;
#[allow(clippy::module_inception)]
mod parser;
mod statements;

pub use parser::Parser;
