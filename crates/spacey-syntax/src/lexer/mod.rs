//! Lexical analysis (tokenization) for JavaScript source code.
//!
//! The lexer transforms JavaScript source text into a stream of tokens
//! that can be consumed by the parser. Every token carries its byte span
//! and whether a line break preceded it, which the parser needs for
//! automatic semicolon insertion.
//!
//! ## Structure
//!
//! - `scanner.rs` - Main `Scanner` struct that produces tokens
//! - `token.rs` - `Token`, `TokenKind` and `Span` definitions
//!
//! ## Usage
//!
//! ```rust
//! use spacey_syntax::lexer::{Scanner, TokenKind};
//!
//! let mut scanner = Scanner::new("const x = require('x');");
//!
//! loop {
//!     let token = scanner.next_token();
//!     if matches!(token.kind, TokenKind::Eof) {
//!         break;
//!     }
//!     println!("{:?} at {:?}", token.kind, token.span);
//! }
//! ```

mod scanner;
mod token;

pub use scanner::{is_id_continue, is_id_start, Scanner};
pub use token::{Span, Token, TokenKind};
