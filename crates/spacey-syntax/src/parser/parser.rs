//! The main parser implementation.

use crate::Error;
use crate::ast::*;
use crate::lexer::{Scanner, Span, Token, TokenKind};

/// A recursive descent parser for JavaScript.
///
/// Accepts both scripts and modules: `import` and `export` declarations are
/// parsed wherever a statement may appear, which lets CommonJS sources that
/// already mix in ES syntax be inspected without a second pass.
pub struct Parser<'a> {
    pub(super) scanner: Scanner<'a>,
    pub(super) source: &'a str,
    pub(super) current: Token,
    pub(super) previous: Token,
    /// Set while parsing a `for` head, where `in` ends the initializer.
    pub(super) no_in: bool,
    pub(super) in_async: bool,
    pub(super) in_generator: bool,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given source code.
    pub fn new(source: &'a str) -> Self {
        let mut scanner = Scanner::new(source);
        let current = scanner.next_token();
        Self {
            scanner,
            source,
            current,
            previous: Token::new(TokenKind::Eof, Span::new(0, 0)),
            no_in: false,
            in_async: false,
            in_generator: false,
        }
    }

    /// Parses the source code into a Program AST node.
    pub fn parse_program(&mut self) -> Result<Program, Error> {
        let mut body = Vec::new();

        while !self.is_at_end() {
            body.push(self.parse_statement()?);
        }

        Ok(Program {
            body,
            span: Span::new(0, self.source.len()),
        })
    }

    // ==================== Token helpers ====================

    pub(super) fn advance(&mut self) {
        let next = self.scanner.next_token();
        self.previous = std::mem::replace(&mut self.current, next);
    }

    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        &self.current.kind == kind
    }

    /// Returns true if the current token is the identifier `word`.
    pub(super) fn check_word(&self, word: &str) -> bool {
        matches!(&self.current.kind, TokenKind::Identifier(name) if name == word)
    }

    pub(super) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn expect(&mut self, kind: &TokenKind) -> Result<Span, Error> {
        if self.check(kind) {
            self.advance();
            Ok(self.previous.span)
        } else {
            Err(self.error(format!(
                "Expected {}, found {}",
                describe(kind),
                self.describe_current()
            )))
        }
    }

    pub(super) fn expect_word(&mut self, word: &str) -> Result<Span, Error> {
        if self.check_word(word) {
            self.advance();
            Ok(self.previous.span)
        } else {
            Err(self.error(format!(
                "Expected '{}', found {}",
                word,
                self.describe_current()
            )))
        }
    }

    /// Returns true if the current `let` starts a declaration. Elsewhere it
    /// is an ordinary identifier, as in `var let = 1;`.
    pub(super) fn let_declaration_follows(&self) -> bool {
        self.check(&TokenKind::Let)
            && matches!(
                self.scanner.peek_token().kind,
                TokenKind::Identifier(_) | TokenKind::LeftBracket | TokenKind::LeftBrace
            )
    }

    /// Parses a binding identifier (contextual words and `let` included).
    pub(super) fn expect_identifier(&mut self) -> Result<Identifier, Error> {
        let name = match &self.current.kind {
            TokenKind::Identifier(name) => Some(name.clone()),
            TokenKind::Let => Some("let".to_string()),
            _ => None,
        };
        if let Some(name) = name {
            self.advance();
            Ok(Identifier {
                name,
                span: self.previous.span,
            })
        } else {
            Err(self.error(format!(
                "Expected identifier, found {}",
                self.describe_current()
            )))
        }
    }

    /// Parses any identifier name, reserved words included (`a.default`).
    pub(super) fn expect_identifier_name(&mut self) -> Result<Identifier, Error> {
        match self.identifier_name(&self.current) {
            Some(name) => {
                self.advance();
                Ok(Identifier {
                    name,
                    span: self.previous.span,
                })
            }
            None => Err(self.error(format!(
                "Expected property name, found {}",
                self.describe_current()
            ))),
        }
    }

    pub(super) fn identifier_name(&self, token: &Token) -> Option<String> {
        match &token.kind {
            TokenKind::Identifier(name) => Some(name.clone()),
            kind if kind.is_identifier_name() => {
                Some(token.span.source_text(self.source).to_string())
            }
            _ => None,
        }
    }

    /// Consumes a statement terminator, applying automatic semicolon insertion.
    pub(super) fn consume_semicolon(&mut self) -> Result<(), Error> {
        if self.eat(&TokenKind::Semicolon) || self.can_insert_semicolon() {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    pub(super) fn can_insert_semicolon(&self) -> bool {
        self.current.newline_before
            || matches!(self.current.kind, TokenKind::RightBrace | TokenKind::Eof)
    }

    pub(super) fn is_at_end(&self) -> bool {
        self.check(&TokenKind::Eof)
    }

    /// Span from `start` to the end of the last consumed token.
    pub(super) fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.previous.span.end.max(start))
    }

    /// Runs `f` with `in` allowed as a binary operator again.
    pub(super) fn allow_in<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let saved = std::mem::replace(&mut self.no_in, false);
        let result = f(self);
        self.no_in = saved;
        result
    }

    /// Runs `f` inside a function body with the given async/generator context.
    pub(super) fn in_function_context<T>(
        &mut self,
        is_async: bool,
        is_generator: bool,
        f: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let saved = (self.no_in, self.in_async, self.in_generator);
        self.no_in = false;
        self.in_async = is_async;
        self.in_generator = is_generator;
        let result = f(self);
        (self.no_in, self.in_async, self.in_generator) = saved;
        result
    }

    // ==================== Errors ====================

    pub(super) fn error(&self, message: impl Into<String>) -> Error {
        Error::SyntaxError {
            message: message.into(),
            span: self.current.span,
        }
    }

    pub(super) fn unexpected(&self) -> Error {
        match self.current.kind {
            TokenKind::Eof => self.error("Unexpected end of input"),
            TokenKind::Invalid => self.error("Invalid or unexpected token"),
            _ => self.error(format!("Unexpected token {}", self.describe_current())),
        }
    }

    fn describe_current(&self) -> String {
        match self.current.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("'{}'", self.current.span.source_text(self.source)),
        }
    }
}

fn describe(kind: &TokenKind) -> &'static str {
    match kind {
        TokenKind::LeftBrace => "'{'",
        TokenKind::RightBrace => "'}'",
        TokenKind::LeftParen => "'('",
        TokenKind::RightParen => "')'",
        TokenKind::LeftBracket => "'['",
        TokenKind::RightBracket => "']'",
        TokenKind::Semicolon => "';'",
        TokenKind::Comma => "','",
        TokenKind::Colon => "':'",
        TokenKind::Equal => "'='",
        TokenKind::Arrow => "'=>'",
        TokenKind::While => "'while'",
        TokenKind::Function => "'function'",
        _ => "token",
    }
}
