//! The scanner that produces tokens from source text.
//!
//! The scanner works on byte offsets so the parser can rewind it: regular
//! expression literals and template continuations are only distinguishable
//! from division and `}` with parser context, so the parser asks for a
//! rescan at a known offset.

use super::{Span, Token, TokenKind};

/// A scanner that tokenizes JavaScript source code.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner for the given source code.
    pub fn new(source: &'a str) -> Self {
        let mut scanner = Self { source, pos: 0 };
        scanner.skip_hashbang();
        scanner
    }

    /// Returns the source text being scanned.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        let newline_before = self.skip_whitespace_and_comments();

        let start = self.pos;

        let Some(ch) = self.advance() else {
            let mut token = Token::new(TokenKind::Eof, Span::new(start, start));
            token.newline_before = newline_before;
            return token;
        };

        let kind = match ch {
            // Single-character tokens
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '~' => TokenKind::Tilde,

            // Numbers starting with a dot
            '.' if matches!(self.peek(), Some('0'..='9')) => self.scan_number(start),

            // Multi-character tokens
            '.' => self.scan_dot(),
            '+' => self.scan_plus(),
            '-' => self.scan_minus(),
            '*' => self.scan_star(),
            '/' => self.scan_slash(),
            '%' => self.scan_percent(),
            '<' => self.scan_less_than(),
            '>' => self.scan_greater_than(),
            '=' => self.scan_equal(),
            '!' => self.scan_bang(),
            '&' => self.scan_ampersand(),
            '|' => self.scan_pipe(),
            '^' => self.scan_caret(),
            '?' => self.scan_question(),

            // String literals
            '"' | '\'' => self.scan_string(ch),

            // Template literals
            '`' => self.scan_template_chunk(),

            // Numbers
            '0'..='9' => self.scan_number(start),

            // Identifiers and keywords
            _ if is_id_start(ch) => self.scan_identifier(start),

            // Private identifiers
            '#' => self.scan_private_identifier(),

            _ => TokenKind::Invalid,
        };

        let mut token = Token::new(kind, Span::new(start, self.pos));
        token.newline_before = newline_before;
        token
    }

    /// Returns the token after the current position without consuming it.
    pub fn peek_token(&self) -> Token {
        self.clone().next_token()
    }

    /// Re-reads the source at `start` (a `/` or `/=` token) as a regular
    /// expression literal.
    pub fn rescan_regex(&mut self, start: usize, newline_before: bool) -> Token {
        self.pos = start + 1;
        let mut pattern = String::new();
        let mut in_class = false;

        let kind = loop {
            match self.advance() {
                None | Some('\n' | '\r' | '\u{2028}' | '\u{2029}') => break TokenKind::Invalid,
                Some('\\') => {
                    pattern.push('\\');
                    match self.advance() {
                        Some(escaped) => pattern.push(escaped),
                        None => break TokenKind::Invalid,
                    }
                }
                Some('[') => {
                    in_class = true;
                    pattern.push('[');
                }
                Some(']') => {
                    in_class = false;
                    pattern.push(']');
                }
                Some('/') if !in_class => {
                    let flags_start = self.pos;
                    while matches!(self.peek(), Some(c) if is_id_continue(c)) {
                        self.advance();
                    }
                    let flags = self.source[flags_start..self.pos].to_string();
                    break TokenKind::RegExp { pattern, flags };
                }
                Some(ch) => pattern.push(ch),
            }
        };

        let mut token = Token::new(kind, Span::new(start, self.pos));
        token.newline_before = newline_before;
        token
    }

    /// Re-reads the source at `start` (the `}` closing a template
    /// substitution) as the next template chunk.
    pub fn rescan_template_continuation(&mut self, start: usize) -> Token {
        self.pos = start + 1;
        let kind = self.scan_template_chunk();
        Token::new(kind, Span::new(start, self.pos))
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.pos..].chars();
        iter.next();
        iter.next()
    }

    fn skip_hashbang(&mut self) {
        if self.source.starts_with("#!") {
            while let Some(ch) = self.peek() {
                if is_line_terminator(ch) {
                    break;
                }
                self.advance();
            }
        }
    }

    /// Skips trivia, returning true if a line terminator was crossed.
    fn skip_whitespace_and_comments(&mut self) -> bool {
        let mut newline = false;
        loop {
            match self.peek() {
                Some(ch) if is_line_terminator(ch) => {
                    newline = true;
                    self.advance();
                }
                Some(' ' | '\t' | '\u{0b}' | '\u{0c}' | '\u{a0}' | '\u{feff}') => {
                    self.advance();
                }
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') => match self.peek_next() {
                    Some('/') => {
                        // Single-line comment: skip until end of line
                        self.skip_line();
                    }
                    Some('*') => {
                        // Multi-line comment: skip until */
                        self.advance();
                        self.advance();
                        let mut prev = ' ';
                        while let Some(ch) = self.advance() {
                            if is_line_terminator(ch) {
                                newline = true;
                            }
                            if prev == '*' && ch == '/' {
                                break;
                            }
                            prev = ch;
                        }
                    }
                    _ => break, // Not a comment, it's a division operator
                },
                Some('<') if self.source[self.pos..].starts_with("<!--") => {
                    self.skip_line();
                }
                Some('-') if newline && self.source[self.pos..].starts_with("-->") => {
                    self.skip_line();
                }
                _ => break,
            }
        }
        newline
    }

    fn skip_line(&mut self) {
        while let Some(ch) = self.peek() {
            if is_line_terminator(ch) {
                break;
            }
            self.advance();
        }
    }

    fn scan_dot(&mut self) -> TokenKind {
        if self.peek() == Some('.') && self.peek_next() == Some('.') {
            self.advance();
            self.advance();
            TokenKind::Ellipsis
        } else {
            TokenKind::Dot
        }
    }

    fn scan_plus(&mut self) -> TokenKind {
        match self.peek() {
            Some('+') => {
                self.advance();
                TokenKind::PlusPlus
            }
            Some('=') => {
                self.advance();
                TokenKind::PlusEqual
            }
            _ => TokenKind::Plus,
        }
    }

    fn scan_minus(&mut self) -> TokenKind {
        match self.peek() {
            Some('-') => {
                self.advance();
                TokenKind::MinusMinus
            }
            Some('=') => {
                self.advance();
                TokenKind::MinusEqual
            }
            _ => TokenKind::Minus,
        }
    }

    fn scan_star(&mut self) -> TokenKind {
        match self.peek() {
            Some('*') => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::StarStarEqual
                } else {
                    TokenKind::StarStar
                }
            }
            Some('=') => {
                self.advance();
                TokenKind::StarEqual
            }
            _ => TokenKind::Star,
        }
    }

    fn scan_slash(&mut self) -> TokenKind {
        match self.peek() {
            Some('=') => {
                self.advance();
                TokenKind::SlashEqual
            }
            _ => TokenKind::Slash,
        }
    }

    fn scan_percent(&mut self) -> TokenKind {
        if self.peek() == Some('=') {
            self.advance();
            TokenKind::PercentEqual
        } else {
            TokenKind::Percent
        }
    }

    fn scan_less_than(&mut self) -> TokenKind {
        match self.peek() {
            Some('<') => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::LeftShiftEqual
                } else {
                    TokenKind::LeftShift
                }
            }
            Some('=') => {
                self.advance();
                TokenKind::LessThanEqual
            }
            _ => TokenKind::LessThan,
        }
    }

    fn scan_greater_than(&mut self) -> TokenKind {
        match self.peek() {
            Some('>') => {
                self.advance();
                match self.peek() {
                    Some('>') => {
                        self.advance();
                        if self.peek() == Some('=') {
                            self.advance();
                            TokenKind::UnsignedRightShiftEqual
                        } else {
                            TokenKind::UnsignedRightShift
                        }
                    }
                    Some('=') => {
                        self.advance();
                        TokenKind::RightShiftEqual
                    }
                    _ => TokenKind::RightShift,
                }
            }
            Some('=') => {
                self.advance();
                TokenKind::GreaterThanEqual
            }
            _ => TokenKind::GreaterThan,
        }
    }

    fn scan_equal(&mut self) -> TokenKind {
        match self.peek() {
            Some('=') => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::StrictEqual
                } else {
                    TokenKind::EqualEqual
                }
            }
            Some('>') => {
                self.advance();
                TokenKind::Arrow
            }
            _ => TokenKind::Equal,
        }
    }

    fn scan_bang(&mut self) -> TokenKind {
        match self.peek() {
            Some('=') => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::StrictNotEqual
                } else {
                    TokenKind::NotEqual
                }
            }
            _ => TokenKind::Bang,
        }
    }

    fn scan_ampersand(&mut self) -> TokenKind {
        match self.peek() {
            Some('&') => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::AmpersandAmpersandEqual
                } else {
                    TokenKind::AmpersandAmpersand
                }
            }
            Some('=') => {
                self.advance();
                TokenKind::AmpersandEqual
            }
            _ => TokenKind::Ampersand,
        }
    }

    fn scan_pipe(&mut self) -> TokenKind {
        match self.peek() {
            Some('|') => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::PipePipeEqual
                } else {
                    TokenKind::PipePipe
                }
            }
            Some('=') => {
                self.advance();
                TokenKind::PipeEqual
            }
            _ => TokenKind::Pipe,
        }
    }

    fn scan_caret(&mut self) -> TokenKind {
        if self.peek() == Some('=') {
            self.advance();
            TokenKind::CaretEqual
        } else {
            TokenKind::Caret
        }
    }

    fn scan_question(&mut self) -> TokenKind {
        match self.peek() {
            Some('?') => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::QuestionQuestionEqual
                } else {
                    TokenKind::QuestionQuestion
                }
            }
            // `a?.5:b` is a conditional, not optional chaining
            Some('.') if !matches!(self.peek_next(), Some('0'..='9')) => {
                self.advance();
                TokenKind::QuestionDot
            }
            _ => TokenKind::Question,
        }
    }

    fn scan_string(&mut self, quote: char) -> TokenKind {
        let mut value = String::new();

        loop {
            match self.advance() {
                None => return TokenKind::Invalid, // Unterminated string
                Some(ch) if ch == quote => break,
                Some('\n' | '\r') => return TokenKind::Invalid,
                Some('\\') => {
                    if !self.scan_escape(&mut value) {
                        return TokenKind::Invalid;
                    }
                }
                Some(ch) => value.push(ch),
            }
        }

        TokenKind::String(value)
    }

    /// Scans a template chunk after a backtick or a substitution's `}`.
    fn scan_template_chunk(&mut self) -> TokenKind {
        let mut cooked = String::new();

        loop {
            match self.advance() {
                None => return TokenKind::Invalid, // Unterminated template
                Some('`') => return TokenKind::Template { cooked, tail: true },
                Some('$') if self.peek() == Some('{') => {
                    self.advance();
                    return TokenKind::Template {
                        cooked,
                        tail: false,
                    };
                }
                Some('\\') => {
                    if !self.scan_escape(&mut cooked) {
                        return TokenKind::Invalid;
                    }
                }
                Some(ch) => cooked.push(ch),
            }
        }
    }

    /// Decodes one escape sequence after a backslash into `out`.
    fn scan_escape(&mut self, out: &mut String) -> bool {
        let Some(escaped) = self.advance() else {
            return false;
        };
        match escaped {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'v' => out.push('\u{0b}'),
            '0' if !matches!(self.peek(), Some('0'..='9')) => out.push('\0'),
            'x' => {
                let Some(code) = self.scan_hex_digits(2) else {
                    return false;
                };
                out.extend(char::from_u32(code));
            }
            'u' => {
                let code = if self.peek() == Some('{') {
                    self.advance();
                    let start = self.pos;
                    while matches!(self.peek(), Some(c) if c.is_ascii_hexdigit()) {
                        self.advance();
                    }
                    let digits = &self.source[start..self.pos];
                    if self.advance() != Some('}') {
                        return false;
                    }
                    u32::from_str_radix(digits, 16).ok()
                } else {
                    self.scan_hex_digits(4)
                };
                match code {
                    Some(code) => out.push(char::from_u32(code).unwrap_or('\u{fffd}')),
                    None => return false,
                }
            }
            // Line continuation
            '\r' => {
                if self.peek() == Some('\n') {
                    self.advance();
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
        true
    }

    fn scan_hex_digits(&mut self, count: usize) -> Option<u32> {
        let start = self.pos;
        for _ in 0..count {
            match self.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    self.advance();
                }
                _ => return None,
            }
        }
        u32::from_str_radix(&self.source[start..self.pos], 16).ok()
    }

    fn scan_number(&mut self, start: usize) -> TokenKind {
        let first = self.source[start..].chars().next();

        // Handle hex, octal, binary
        if first == Some('0') {
            match self.peek() {
                Some('x' | 'X') => return self.scan_radix_number(16, "0x"),
                Some('o' | 'O') => return self.scan_radix_number(8, "0o"),
                Some('b' | 'B') => return self.scan_radix_number(2, "0b"),
                _ => {}
            }
        }

        // Integer part (the leading digit or dot was already consumed)
        self.skip_digits();

        // Fractional part
        if first != Some('.') && self.peek() == Some('.') {
            self.advance();
            self.skip_digits();
        }

        // Exponent part
        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            self.skip_digits();
        }

        let value: String = self.source[start..self.pos]
            .chars()
            .filter(|c| *c != '_')
            .collect();

        // BigInt suffix
        if self.peek() == Some('n') {
            self.advance();
            return TokenKind::BigInt(value);
        }

        match value.parse::<f64>() {
            Ok(n) => TokenKind::Number(n),
            Err(_) => TokenKind::Invalid,
        }
    }

    fn skip_digits(&mut self) {
        while matches!(self.peek(), Some('0'..='9' | '_')) {
            self.advance();
        }
    }

    fn scan_radix_number(&mut self, radix: u32, prefix: &str) -> TokenKind {
        self.advance(); // consume radix letter
        let mut value = String::new();

        while let Some(ch) = self.peek() {
            if ch.is_digit(radix) || ch == '_' {
                if ch != '_' {
                    value.push(ch);
                }
                self.advance();
            } else {
                break;
            }
        }

        if self.peek() == Some('n') {
            self.advance();
            return TokenKind::BigInt(format!("{}{}", prefix, value));
        }

        match u64::from_str_radix(&value, radix) {
            Ok(n) => TokenKind::Number(n as f64),
            Err(_) => TokenKind::Invalid,
        }
    }

    fn scan_identifier(&mut self, start: usize) -> TokenKind {
        while matches!(self.peek(), Some(ch) if is_id_continue(ch)) {
            self.advance();
        }

        let name = &self.source[start..self.pos];
        TokenKind::keyword(name).unwrap_or_else(|| TokenKind::Identifier(name.to_string()))
    }

    fn scan_private_identifier(&mut self) -> TokenKind {
        let start = self.pos;

        while matches!(self.peek(), Some(ch) if is_id_continue(ch)) {
            self.advance();
        }

        if start == self.pos {
            TokenKind::Invalid
        } else {
            TokenKind::PrivateIdentifier(self.source[start..self.pos].to_string())
        }
    }
}

/// Checks if a character can start an identifier.
pub fn is_id_start(ch: char) -> bool {
    ch == '_' || ch == '$' || unicode_xid::UnicodeXID::is_xid_start(ch)
}

/// Checks if a character can continue an identifier.
pub fn is_id_continue(ch: char) -> bool {
    ch == '$' || ch == '\u{200c}' || ch == '\u{200d}' || unicode_xid::UnicodeXID::is_xid_continue(ch)
}

fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut scanner = Scanner::new(source);
        let mut out = Vec::new();
        loop {
            let token = scanner.next_token();
            if token.kind == TokenKind::Eof {
                break;
            }
            out.push(token.kind);
        }
        out
    }

    #[test]
    fn test_scan_punctuation_and_identifiers() {
        assert_eq!(
            kinds("module.exports = x;"),
            vec![
                TokenKind::Identifier("module".to_string()),
                TokenKind::Dot,
                TokenKind::Identifier("exports".to_string()),
                TokenKind::Equal,
                TokenKind::Identifier("x".to_string()),
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_contextual_words_are_identifiers() {
        assert_eq!(
            kinds("async await yield static of"),
            vec![
                TokenKind::Identifier("async".to_string()),
                TokenKind::Identifier("await".to_string()),
                TokenKind::Identifier("yield".to_string()),
                TokenKind::Identifier("static".to_string()),
                TokenKind::Identifier("of".to_string()),
            ]
        );
    }

    #[test]
    fn test_token_spans() {
        let mut scanner = Scanner::new("  require('x')");
        let token = scanner.next_token();
        assert_eq!(token.span, Span::new(2, 9));
        scanner.next_token();
        let string = scanner.next_token();
        assert_eq!(string.kind, TokenKind::String("x".to_string()));
        assert_eq!(string.span, Span::new(10, 13));
    }

    #[test]
    fn test_newline_before() {
        let mut scanner = Scanner::new("a\nb /* \n */ c d");
        assert!(!scanner.next_token().newline_before);
        assert!(scanner.next_token().newline_before);
        assert!(scanner.next_token().newline_before);
        assert!(!scanner.next_token().newline_before);
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            kinds("// require('a')\n/* module */ x"),
            vec![TokenKind::Identifier("x".to_string())]
        );
    }

    #[test]
    fn test_hashbang_skipped() {
        assert_eq!(
            kinds("#!/usr/bin/env node\nx"),
            vec![TokenKind::Identifier("x".to_string())]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#"'a\n\x41B\u{43}\'' "q\"""#),
            vec![
                TokenKind::String("a\nABC'".to_string()),
                TokenKind::String("q\"".to_string()),
            ]
        );
    }

    #[test]
    fn test_unterminated_string_is_invalid() {
        assert_eq!(kinds("'abc"), vec![TokenKind::Invalid]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("42 3.5 .5 1e3 0xff 0b11 0o7 1_000 10n"),
            vec![
                TokenKind::Number(42.0),
                TokenKind::Number(3.5),
                TokenKind::Number(0.5),
                TokenKind::Number(1000.0),
                TokenKind::Number(255.0),
                TokenKind::Number(3.0),
                TokenKind::Number(7.0),
                TokenKind::Number(1000.0),
                TokenKind::BigInt("10".to_string()),
            ]
        );
    }

    #[test]
    fn test_template_chunks() {
        let mut scanner = Scanner::new("`a${b}c`");
        let head = scanner.next_token();
        assert_eq!(
            head.kind,
            TokenKind::Template {
                cooked: "a".to_string(),
                tail: false
            }
        );
        let b = scanner.next_token();
        assert_eq!(b.kind, TokenKind::Identifier("b".to_string()));
        let brace = scanner.next_token();
        assert_eq!(brace.kind, TokenKind::RightBrace);
        let tail = scanner.rescan_template_continuation(brace.span.start);
        assert_eq!(
            tail.kind,
            TokenKind::Template {
                cooked: "c".to_string(),
                tail: true
            }
        );
        assert_eq!(tail.span, Span::new(5, 8));
    }

    #[test]
    fn test_rescan_regex() {
        let mut scanner = Scanner::new("/[/]\\//g.test(x)");
        let slash = scanner.next_token();
        assert_eq!(slash.kind, TokenKind::Slash);
        let regex = scanner.rescan_regex(slash.span.start, false);
        assert_eq!(
            regex.kind,
            TokenKind::RegExp {
                pattern: "[/]\\/".to_string(),
                flags: "g".to_string()
            }
        );
        assert_eq!(scanner.next_token().kind, TokenKind::Dot);
    }

    #[test]
    fn test_optional_chaining_vs_conditional() {
        assert_eq!(
            kinds("a?.b"),
            vec![
                TokenKind::Identifier("a".to_string()),
                TokenKind::QuestionDot,
                TokenKind::Identifier("b".to_string()),
            ]
        );
        assert_eq!(
            kinds("a?.5:1"),
            vec![
                TokenKind::Identifier("a".to_string()),
                TokenKind::Question,
                TokenKind::Number(0.5),
                TokenKind::Colon,
                TokenKind::Number(1.0),
            ]
        );
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut scanner = Scanner::new("a b");
        assert_eq!(scanner.peek_token().kind, TokenKind::Identifier("a".to_string()));
        assert_eq!(scanner.next_token().kind, TokenKind::Identifier("a".to_string()));
        assert_eq!(scanner.next_token().kind, TokenKind::Identifier("b".to_string()));
    }

    #[test]
    fn test_private_identifier() {
        assert_eq!(
            kinds("#secret"),
            vec![TokenKind::PrivateIdentifier("secret".to_string())]
        );
    }
}
