//! Expression parsing.
//!
//! Binary operators are parsed by precedence climbing. Arrow parameters and
//! destructuring assignment targets are first parsed as expressions and then
//! reinterpreted as patterns.

use super::Parser;
use crate::Error;
use crate::ast::*;
use crate::lexer::{Span, TokenKind};

impl<'a> Parser<'a> {
    /// Parses an expression, including comma sequences.
    pub fn parse_expression(&mut self) -> Result<Expression, Error> {
        let first = self.parse_assignment()?;
        if !self.check(&TokenKind::Comma) {
            return Ok(first);
        }

        let start = first.span().start;
        let mut expressions = vec![first];
        while self.eat(&TokenKind::Comma) {
            expressions.push(self.parse_assignment()?);
        }
        Ok(Expression::Sequence(SequenceExpression {
            expressions,
            span: self.span_from(start),
        }))
    }

    pub(super) fn parse_assignment(&mut self) -> Result<Expression, Error> {
        if self.in_generator && self.check_word("yield") {
            return self.parse_yield();
        }

        let left = self.parse_conditional()?;
        if matches!(left, Expression::Arrow(_)) {
            return Ok(left);
        }

        let Some(operator) = assignment_operator(&self.current.kind) else {
            return Ok(left);
        };

        let start = left.span().start;
        let target = if operator == AssignmentOperator::Assign {
            self.to_pattern(left)?
        } else {
            match left {
                Expression::Identifier(id) => Pattern::Identifier(id),
                member @ Expression::Member(_) => Pattern::Expression(Box::new(member)),
                other => {
                    return Err(Error::SyntaxError {
                        message: "Invalid left-hand side in assignment".into(),
                        span: other.span(),
                    });
                }
            }
        };
        self.advance();
        let right = self.parse_assignment()?;

        Ok(Expression::Assignment(AssignmentExpression {
            operator,
            left: Box::new(target),
            right: Box::new(right),
            span: self.span_from(start),
        }))
    }

    fn parse_yield(&mut self) -> Result<Expression, Error> {
        let start = self.current.span.start;
        self.advance(); // consume 'yield'

        let delegate = !self.current.newline_before && self.eat(&TokenKind::Star);
        let argument = if delegate || (!self.current.newline_before && self.starts_expression()) {
            Some(Box::new(self.parse_assignment()?))
        } else {
            None
        };

        Ok(Expression::Yield(YieldExpression {
            argument,
            delegate,
            span: self.span_from(start),
        }))
    }

    fn starts_expression(&self) -> bool {
        !matches!(
            self.current.kind,
            TokenKind::RightParen
                | TokenKind::RightBracket
                | TokenKind::RightBrace
                | TokenKind::Comma
                | TokenKind::Semicolon
                | TokenKind::Colon
                | TokenKind::Eof
                | TokenKind::In
                | TokenKind::Question
        ) && self.current.kind != TokenKind::Identifier("of".into())
    }

    fn parse_conditional(&mut self) -> Result<Expression, Error> {
        let test = self.parse_binary(0)?;
        if !self.check(&TokenKind::Question) {
            return Ok(test);
        }
        self.advance();

        let start = test.span().start;
        let consequent = self.allow_in(|p| p.parse_assignment())?;
        self.expect(&TokenKind::Colon)?;
        let alternate = self.parse_assignment()?;

        Ok(Expression::Conditional(ConditionalExpression {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            span: self.span_from(start),
        }))
    }

    fn parse_binary(&mut self, min_precedence: u8) -> Result<Expression, Error> {
        let mut left = self.parse_unary()?;

        while let Some((operator, precedence)) = self.binary_operator() {
            if precedence < min_precedence {
                break;
            }
            self.advance();

            // `**` is the only right-associative binary operator.
            let right = if operator == BinaryOperator::Exponent {
                self.parse_binary(precedence)?
            } else {
                self.parse_binary(precedence + 1)?
            };

            let start = left.span().start;
            left = Expression::Binary(BinaryExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
                span: self.span_from(start),
            });
        }

        Ok(left)
    }

    fn binary_operator(&self) -> Option<(BinaryOperator, u8)> {
        let entry = match self.current.kind {
            TokenKind::QuestionQuestion => (BinaryOperator::NullishCoalescing, 1),
            TokenKind::PipePipe => (BinaryOperator::LogicalOr, 2),
            TokenKind::AmpersandAmpersand => (BinaryOperator::LogicalAnd, 3),
            TokenKind::Pipe => (BinaryOperator::BitwiseOr, 4),
            TokenKind::Caret => (BinaryOperator::BitwiseXor, 5),
            TokenKind::Ampersand => (BinaryOperator::BitwiseAnd, 6),
            TokenKind::EqualEqual => (BinaryOperator::Equal, 7),
            TokenKind::NotEqual => (BinaryOperator::NotEqual, 7),
            TokenKind::StrictEqual => (BinaryOperator::StrictEqual, 7),
            TokenKind::StrictNotEqual => (BinaryOperator::StrictNotEqual, 7),
            TokenKind::LessThan => (BinaryOperator::LessThan, 8),
            TokenKind::GreaterThan => (BinaryOperator::GreaterThan, 8),
            TokenKind::LessThanEqual => (BinaryOperator::LessThanEqual, 8),
            TokenKind::GreaterThanEqual => (BinaryOperator::GreaterThanEqual, 8),
            TokenKind::Instanceof => (BinaryOperator::InstanceOf, 8),
            TokenKind::In if !self.no_in => (BinaryOperator::In, 8),
            TokenKind::LeftShift => (BinaryOperator::LeftShift, 9),
            TokenKind::RightShift => (BinaryOperator::RightShift, 9),
            TokenKind::UnsignedRightShift => (BinaryOperator::UnsignedRightShift, 9),
            TokenKind::Plus => (BinaryOperator::Add, 10),
            TokenKind::Minus => (BinaryOperator::Subtract, 10),
            TokenKind::Star => (BinaryOperator::Multiply, 11),
            TokenKind::Slash => (BinaryOperator::Divide, 11),
            TokenKind::Percent => (BinaryOperator::Modulo, 11),
            TokenKind::StarStar => (BinaryOperator::Exponent, 12),
            _ => return None,
        };
        Some(entry)
    }

    fn parse_unary(&mut self) -> Result<Expression, Error> {
        let start = self.current.span.start;

        let operator = match self.current.kind {
            TokenKind::Bang => Some(UnaryOperator::LogicalNot),
            TokenKind::Minus => Some(UnaryOperator::Minus),
            TokenKind::Plus => Some(UnaryOperator::Plus),
            TokenKind::Tilde => Some(UnaryOperator::BitwiseNot),
            TokenKind::Typeof => Some(UnaryOperator::Typeof),
            TokenKind::Void => Some(UnaryOperator::Void),
            TokenKind::Delete => Some(UnaryOperator::Delete),
            _ => None,
        };
        if let Some(operator) = operator {
            self.advance();
            let argument = self.parse_unary()?;
            return Ok(Expression::Unary(UnaryExpression {
                operator,
                argument: Box::new(argument),
                span: self.span_from(start),
            }));
        }

        if matches!(self.current.kind, TokenKind::PlusPlus | TokenKind::MinusMinus) {
            let operator = if self.check(&TokenKind::PlusPlus) {
                UpdateOperator::Increment
            } else {
                UpdateOperator::Decrement
            };
            self.advance();
            let argument = self.parse_unary()?;
            return Ok(Expression::Update(UpdateExpression {
                operator,
                argument: Box::new(argument),
                prefix: true,
                span: self.span_from(start),
            }));
        }

        if self.in_async && self.check_word("await") {
            self.advance();
            let argument = self.parse_unary()?;
            return Ok(Expression::Await(AwaitExpression {
                argument: Box::new(argument),
                span: self.span_from(start),
            }));
        }

        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expression, Error> {
        let expr = self.parse_left_hand_side()?;

        // No line terminator is allowed before a postfix operator.
        if matches!(self.current.kind, TokenKind::PlusPlus | TokenKind::MinusMinus)
            && !self.current.newline_before
        {
            let operator = if self.check(&TokenKind::PlusPlus) {
                UpdateOperator::Increment
            } else {
                UpdateOperator::Decrement
            };
            self.advance();
            let start = expr.span().start;
            return Ok(Expression::Update(UpdateExpression {
                operator,
                argument: Box::new(expr),
                prefix: false,
                span: self.span_from(start),
            }));
        }

        Ok(expr)
    }

    pub(super) fn parse_left_hand_side(&mut self) -> Result<Expression, Error> {
        let expr = if self.check(&TokenKind::New) {
            self.parse_new_expression()?
        } else {
            self.parse_primary()?
        };
        if matches!(expr, Expression::Arrow(_)) {
            return Ok(expr);
        }
        self.parse_member_tail(expr, true)
    }

    /// Parses `.x`, `[x]`, `?.`, tagged templates and (optionally) calls
    /// following `expr`.
    fn parse_member_tail(&mut self, mut expr: Expression, allow_calls: bool) -> Result<Expression, Error> {
        loop {
            let start = expr.span().start;
            match &self.current.kind {
                TokenKind::Dot => {
                    self.advance();
                    let property = self.parse_member_property()?;
                    expr = Expression::Member(MemberExpression {
                        object: Box::new(expr),
                        property,
                        computed: false,
                        optional: false,
                        span: self.span_from(start),
                    });
                }
                TokenKind::LeftBracket => {
                    self.advance();
                    let property = self.allow_in(|p| p.parse_expression())?;
                    self.expect(&TokenKind::RightBracket)?;
                    expr = Expression::Member(MemberExpression {
                        object: Box::new(expr),
                        property: MemberProperty::Expression(Box::new(property)),
                        computed: true,
                        optional: false,
                        span: self.span_from(start),
                    });
                }
                TokenKind::QuestionDot if allow_calls => {
                    self.advance();
                    if self.check(&TokenKind::LeftParen) {
                        let arguments = self.parse_arguments()?;
                        expr = Expression::Call(CallExpression {
                            callee: Box::new(expr),
                            arguments,
                            optional: true,
                            span: self.span_from(start),
                        });
                    } else if self.eat(&TokenKind::LeftBracket) {
                        let property = self.allow_in(|p| p.parse_expression())?;
                        self.expect(&TokenKind::RightBracket)?;
                        expr = Expression::Member(MemberExpression {
                            object: Box::new(expr),
                            property: MemberProperty::Expression(Box::new(property)),
                            computed: true,
                            optional: true,
                            span: self.span_from(start),
                        });
                    } else {
                        let property = self.parse_member_property()?;
                        expr = Expression::Member(MemberExpression {
                            object: Box::new(expr),
                            property,
                            computed: false,
                            optional: true,
                            span: self.span_from(start),
                        });
                    }
                }
                TokenKind::LeftParen if allow_calls => {
                    let arguments = self.parse_arguments()?;
                    expr = Expression::Call(CallExpression {
                        callee: Box::new(expr),
                        arguments,
                        optional: false,
                        span: self.span_from(start),
                    });
                }
                TokenKind::Template { .. } => {
                    let quasi = self.parse_template()?;
                    expr = Expression::TaggedTemplate(TaggedTemplateExpression {
                        tag: Box::new(expr),
                        quasi,
                        span: self.span_from(start),
                    });
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_member_property(&mut self) -> Result<MemberProperty, Error> {
        if let TokenKind::PrivateIdentifier(name) = &self.current.kind {
            let name = name.clone();
            self.advance();
            return Ok(MemberProperty::PrivateName(Identifier {
                name,
                span: self.previous.span,
            }));
        }
        Ok(MemberProperty::Identifier(self.expect_identifier_name()?))
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expression>, Error> {
        self.expect(&TokenKind::LeftParen)?;
        self.allow_in(|p| {
            let mut arguments = Vec::new();
            while !p.check(&TokenKind::RightParen) {
                arguments.push(p.parse_spread_or_assignment()?);
                if !p.eat(&TokenKind::Comma) {
                    break;
                }
            }
            p.expect(&TokenKind::RightParen)?;
            Ok(arguments)
        })
    }

    fn parse_spread_or_assignment(&mut self) -> Result<Expression, Error> {
        if !self.check(&TokenKind::Ellipsis) {
            return self.parse_assignment();
        }
        let start = self.current.span.start;
        self.advance();
        let argument = self.parse_assignment()?;
        Ok(Expression::Spread(SpreadElement {
            argument: Box::new(argument),
            span: self.span_from(start),
        }))
    }

    fn parse_new_expression(&mut self) -> Result<Expression, Error> {
        let start = self.current.span.start;
        self.advance(); // consume 'new'

        if self.check(&TokenKind::Dot) {
            let meta = Identifier {
                name: "new".into(),
                span: self.previous.span,
            };
            self.advance();
            let property = self.expect_identifier_name()?;
            return Ok(Expression::MetaProperty(MetaProperty {
                meta,
                property,
                span: self.span_from(start),
            }));
        }

        let callee = if self.check(&TokenKind::New) {
            self.parse_new_expression()?
        } else {
            self.parse_primary()?
        };
        let callee = self.parse_member_tail(callee, false)?;

        let arguments = if self.check(&TokenKind::LeftParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };

        Ok(Expression::New(NewExpression {
            callee: Box::new(callee),
            arguments,
            span: self.span_from(start),
        }))
    }

    fn parse_primary(&mut self) -> Result<Expression, Error> {
        // A `/` in operand position starts a regular expression.
        if matches!(self.current.kind, TokenKind::Slash | TokenKind::SlashEqual) {
            self.current = self
                .scanner
                .rescan_regex(self.current.span.start, self.current.newline_before);
        }

        let start = self.current.span.start;
        let value = match &self.current.kind {
            TokenKind::Number(n) => Some(LiteralValue::Number(*n)),
            TokenKind::String(s) => Some(LiteralValue::String(s.clone())),
            TokenKind::BigInt(digits) => Some(LiteralValue::BigInt(digits.clone())),
            TokenKind::True => Some(LiteralValue::Boolean(true)),
            TokenKind::False => Some(LiteralValue::Boolean(false)),
            TokenKind::Null => Some(LiteralValue::Null),
            TokenKind::RegExp { pattern, flags } => Some(LiteralValue::RegExp {
                pattern: pattern.clone(),
                flags: flags.clone(),
            }),
            _ => None,
        };
        if let Some(value) = value {
            self.advance();
            return Ok(Expression::Literal(Literal {
                value,
                span: self.previous.span,
            }));
        }

        match &self.current.kind {
            TokenKind::Template { .. } => Ok(Expression::Template(self.parse_template()?)),
            TokenKind::Identifier(name) if name == "async" => self.parse_async_primary(),
            TokenKind::Identifier(_) | TokenKind::Let => {
                let id = self.expect_identifier()?;
                if self.check(&TokenKind::Arrow) && !self.current.newline_before {
                    return self.parse_arrow_body(start, vec![Pattern::Identifier(id)], false);
                }
                Ok(Expression::Identifier(id))
            }
            TokenKind::This => {
                self.advance();
                Ok(Expression::This(self.previous.span))
            }
            TokenKind::Super => {
                self.advance();
                Ok(Expression::Super(self.previous.span))
            }
            TokenKind::Function => {
                let function = self.parse_function(start, false)?;
                Ok(Expression::Function(Box::new(function)))
            }
            TokenKind::Class => {
                let class = self.parse_class(false)?;
                Ok(Expression::Class(Box::new(class)))
            }
            TokenKind::LeftParen => self.parse_parenthesized_or_arrow(),
            TokenKind::LeftBracket => self.parse_array_literal(),
            TokenKind::LeftBrace => self.parse_object_literal(),
            TokenKind::Import => self.parse_import_expression(),
            // `#x in obj` brand check
            TokenKind::PrivateIdentifier(name)
                if self.scanner.peek_token().kind == TokenKind::In =>
            {
                let name = name.clone();
                self.advance();
                Ok(Expression::PrivateName(Identifier {
                    name,
                    span: self.previous.span,
                }))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// `async function`, `async x => ...`, `async (...) => ...` or a plain
    /// identifier/call named `async`.
    fn parse_async_primary(&mut self) -> Result<Expression, Error> {
        let start = self.current.span.start;
        let mut lookahead = self.scanner.clone();
        let next = lookahead.next_token();

        if !next.newline_before {
            match next.kind {
                TokenKind::Function => {
                    self.advance(); // consume 'async'
                    let function = self.parse_function(start, true)?;
                    return Ok(Expression::Function(Box::new(function)));
                }
                TokenKind::Identifier(_) => {
                    let after = lookahead.next_token();
                    if after.kind == TokenKind::Arrow && !after.newline_before {
                        self.advance(); // consume 'async'
                        let param = self.expect_identifier()?;
                        return self.parse_arrow_body(start, vec![Pattern::Identifier(param)], true);
                    }
                }
                TokenKind::LeftParen => {
                    let callee = self.expect_identifier()?;
                    let arguments = self.parse_arguments()?;
                    if self.check(&TokenKind::Arrow) && !self.current.newline_before {
                        let params = arguments
                            .into_iter()
                            .map(|arg| self.to_pattern(arg))
                            .collect::<Result<Vec<_>, _>>()?;
                        return self.parse_arrow_body(start, params, true);
                    }
                    return Ok(Expression::Call(CallExpression {
                        callee: Box::new(Expression::Identifier(callee)),
                        arguments,
                        optional: false,
                        span: self.span_from(start),
                    }));
                }
                _ => {}
            }
        }

        let id = self.expect_identifier()?;
        if self.check(&TokenKind::Arrow) && !self.current.newline_before {
            return self.parse_arrow_body(start, vec![Pattern::Identifier(id)], false);
        }
        Ok(Expression::Identifier(id))
    }

    fn parse_import_expression(&mut self) -> Result<Expression, Error> {
        let start = self.current.span.start;
        self.advance(); // consume 'import'

        if self.check(&TokenKind::Dot) {
            let meta = Identifier {
                name: "import".into(),
                span: self.previous.span,
            };
            self.advance();
            let property = self.expect_identifier_name()?;
            return Ok(Expression::MetaProperty(MetaProperty {
                meta,
                property,
                span: self.span_from(start),
            }));
        }

        self.expect(&TokenKind::LeftParen)?;
        let source = self.allow_in(|p| p.parse_assignment())?;
        self.eat(&TokenKind::Comma);
        self.expect(&TokenKind::RightParen)?;
        Ok(Expression::Import(ImportExpression {
            source: Box::new(source),
            span: self.span_from(start),
        }))
    }

    /// Parses a template literal starting at the current template chunk.
    pub(super) fn parse_template(&mut self) -> Result<TemplateLiteral, Error> {
        let start = self.current.span.start;
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();

        loop {
            let TokenKind::Template { cooked, tail } = &self.current.kind else {
                return Err(self.unexpected());
            };
            let tail = *tail;
            quasis.push(cooked.clone());
            self.advance();
            if tail {
                break;
            }

            expressions.push(self.allow_in(|p| p.parse_expression())?);
            if !self.check(&TokenKind::RightBrace) {
                return Err(self.error(format!(
                    "Expected '}}' in template substitution, found '{}'",
                    self.current.span.source_text(self.source)
                )));
            }
            self.current = self.scanner.rescan_template_continuation(self.current.span.start);
        }

        Ok(TemplateLiteral {
            quasis,
            expressions,
            span: self.span_from(start),
        })
    }

    fn parse_parenthesized_or_arrow(&mut self) -> Result<Expression, Error> {
        let start = self.current.span.start;
        self.advance(); // consume '('

        if self.eat(&TokenKind::RightParen) {
            if self.check(&TokenKind::Arrow) && !self.current.newline_before {
                return self.parse_arrow_body(start, Vec::new(), false);
            }
            return Err(self.unexpected());
        }

        let items = self.allow_in(|p| {
            let mut items = Vec::new();
            loop {
                items.push(p.parse_spread_or_assignment()?);
                if !p.eat(&TokenKind::Comma) || p.check(&TokenKind::RightParen) {
                    break;
                }
            }
            Ok(items)
        })?;
        self.expect(&TokenKind::RightParen)?;

        if self.check(&TokenKind::Arrow) && !self.current.newline_before {
            let params = items
                .into_iter()
                .map(|item| self.to_pattern(item))
                .collect::<Result<Vec<_>, _>>()?;
            return self.parse_arrow_body(start, params, false);
        }

        if let Some(spread) = items.iter().find(|item| matches!(item, Expression::Spread(_))) {
            return Err(Error::SyntaxError {
                message: "Unexpected token '...'".into(),
                span: spread.span(),
            });
        }

        let mut items = items;
        if items.len() == 1 {
            return Ok(items.remove(0));
        }
        let span = Span::new(items[0].span().start, items[items.len() - 1].span().end);
        Ok(Expression::Sequence(SequenceExpression {
            expressions: items,
            span,
        }))
    }

    /// Parses `=> body` once the parameters are known.
    fn parse_arrow_body(
        &mut self,
        start: usize,
        params: Vec<Pattern>,
        is_async: bool,
    ) -> Result<Expression, Error> {
        self.expect(&TokenKind::Arrow)?;

        let no_in = self.no_in;
        let body = self.in_function_context(is_async, false, |p| {
            if p.check(&TokenKind::LeftBrace) {
                Ok(ArrowBody::Block(p.parse_function_body()?))
            } else {
                p.no_in = no_in;
                Ok(ArrowBody::Expression(Box::new(p.parse_assignment()?)))
            }
        })?;

        Ok(Expression::Arrow(Box::new(ArrowFunctionExpression {
            params,
            body,
            is_async,
            span: self.span_from(start),
        })))
    }

    fn parse_array_literal(&mut self) -> Result<Expression, Error> {
        let start = self.current.span.start;
        self.advance(); // consume '['

        let elements = self.allow_in(|p| {
            let mut elements = Vec::new();
            while !p.check(&TokenKind::RightBracket) {
                if p.eat(&TokenKind::Comma) {
                    elements.push(None);
                    continue;
                }
                elements.push(Some(p.parse_spread_or_assignment()?));
                if !p.eat(&TokenKind::Comma) {
                    break;
                }
            }
            p.expect(&TokenKind::RightBracket)?;
            Ok(elements)
        })?;

        Ok(Expression::Array(ArrayExpression {
            elements,
            span: self.span_from(start),
        }))
    }

    fn parse_object_literal(&mut self) -> Result<Expression, Error> {
        let start = self.current.span.start;
        self.advance(); // consume '{'

        let properties = self.allow_in(|p| {
            let mut properties = Vec::new();
            while !p.check(&TokenKind::RightBrace) {
                properties.push(p.parse_object_member()?);
                if !p.eat(&TokenKind::Comma) {
                    break;
                }
            }
            p.expect(&TokenKind::RightBrace)?;
            Ok(properties)
        })?;

        Ok(Expression::Object(ObjectExpression {
            properties,
            span: self.span_from(start),
        }))
    }

    fn parse_object_member(&mut self) -> Result<ObjectMember, Error> {
        let start = self.current.span.start;

        if self.eat(&TokenKind::Ellipsis) {
            let argument = self.parse_assignment()?;
            return Ok(ObjectMember::Spread(SpreadElement {
                argument: Box::new(argument),
                span: self.span_from(start),
            }));
        }

        let mut kind = PropertyKind::Init;
        let mut is_async = false;
        let mut is_generator = false;

        if self.modifier_applies("get") || self.modifier_applies("set") {
            kind = if self.check_word("get") {
                PropertyKind::Get
            } else {
                PropertyKind::Set
            };
            self.advance();
        } else if self.modifier_applies("async") {
            is_async = true;
            self.advance();
        }
        if self.eat(&TokenKind::Star) {
            is_generator = true;
        }

        let key = self.parse_property_key()?;

        if kind != PropertyKind::Init || is_async || is_generator || self.check(&TokenKind::LeftParen) {
            let value = self.parse_method(is_async, is_generator)?;
            return Ok(ObjectMember::Property(Property {
                key,
                value: Expression::Function(Box::new(value)),
                kind,
                method: kind == PropertyKind::Init,
                shorthand: false,
                span: self.span_from(start),
            }));
        }

        if self.eat(&TokenKind::Colon) {
            let value = self.parse_assignment()?;
            return Ok(ObjectMember::Property(Property {
                key,
                value,
                kind,
                method: false,
                shorthand: false,
                span: self.span_from(start),
            }));
        }

        // Shorthand `{ a }`, or `{ a = 1 }` which is only valid as a pattern.
        let PropertyKey::Identifier(id) = &key else {
            return Err(self.unexpected());
        };
        let mut value = Expression::Identifier(id.clone());
        if self.eat(&TokenKind::Equal) {
            let default = self.parse_assignment()?;
            value = Expression::Assignment(AssignmentExpression {
                operator: AssignmentOperator::Assign,
                left: Box::new(Pattern::Identifier(id.clone())),
                right: Box::new(default),
                span: self.span_from(start),
            });
        }
        Ok(ObjectMember::Property(Property {
            key,
            value,
            kind,
            method: false,
            shorthand: true,
            span: self.span_from(start),
        }))
    }

    /// Returns true if the current word (`get`, `set`, `async`, `static`)
    /// acts as a modifier rather than as the property name itself.
    pub(super) fn modifier_applies(&self, word: &str) -> bool {
        if !self.check_word(word) {
            return false;
        }
        let next = self.scanner.peek_token();
        if word == "async" && next.newline_before {
            return false;
        }
        !matches!(
            next.kind,
            TokenKind::LeftParen
                | TokenKind::Colon
                | TokenKind::Comma
                | TokenKind::RightBrace
                | TokenKind::Equal
                | TokenKind::Semicolon
                | TokenKind::Eof
        )
    }

    pub(super) fn parse_property_key(&mut self) -> Result<PropertyKey, Error> {
        let key = match &self.current.kind {
            TokenKind::String(s) => {
                let value = LiteralValue::String(s.clone());
                self.advance();
                PropertyKey::Literal(Literal {
                    value,
                    span: self.previous.span,
                })
            }
            TokenKind::Number(n) => {
                let value = LiteralValue::Number(*n);
                self.advance();
                PropertyKey::Literal(Literal {
                    value,
                    span: self.previous.span,
                })
            }
            TokenKind::BigInt(digits) => {
                let value = LiteralValue::BigInt(digits.clone());
                self.advance();
                PropertyKey::Literal(Literal {
                    value,
                    span: self.previous.span,
                })
            }
            TokenKind::PrivateIdentifier(name) => {
                let name = name.clone();
                self.advance();
                PropertyKey::PrivateName(Identifier {
                    name,
                    span: self.previous.span,
                })
            }
            TokenKind::LeftBracket => {
                self.advance();
                let expr = self.allow_in(|p| p.parse_assignment())?;
                self.expect(&TokenKind::RightBracket)?;
                PropertyKey::Computed(Box::new(expr))
            }
            _ => PropertyKey::Identifier(self.expect_identifier_name()?),
        };
        Ok(key)
    }

    /// Parses `(params) { body }` of a method or accessor.
    pub(super) fn parse_method(&mut self, is_async: bool, is_generator: bool) -> Result<Function, Error> {
        let start = self.current.span.start;
        self.in_function_context(is_async, is_generator, |p| {
            let params = p.parse_params()?;
            let body = p.parse_function_body()?;
            Ok(Function {
                id: None,
                params,
                body,
                is_async,
                is_generator,
                span: p.span_from(start),
            })
        })
    }

    // ==================== Patterns ====================

    /// Reinterprets an expression parsed in a cover position as a pattern.
    pub(super) fn to_pattern(&self, expr: Expression) -> Result<Pattern, Error> {
        let pattern = match expr {
            Expression::Identifier(id) => Pattern::Identifier(id),
            member @ Expression::Member(_) => Pattern::Expression(Box::new(member)),
            Expression::Spread(spread) => Pattern::Rest(RestElement {
                argument: Box::new(self.to_pattern(*spread.argument)?),
                span: spread.span,
            }),
            Expression::Assignment(assign) if assign.operator == AssignmentOperator::Assign => {
                Pattern::Assignment(AssignmentPattern {
                    left: assign.left,
                    right: assign.right,
                    span: assign.span,
                })
            }
            Expression::Array(array) => {
                let elements = array
                    .elements
                    .into_iter()
                    .map(|element| element.map(|e| self.to_pattern(e)).transpose())
                    .collect::<Result<Vec<_>, _>>()?;
                Pattern::Array(ArrayPattern {
                    elements,
                    span: array.span,
                })
            }
            Expression::Object(object) => {
                let mut properties = Vec::new();
                for member in object.properties {
                    properties.push(match member {
                        ObjectMember::Property(property) if property.kind == PropertyKind::Init && !property.method => {
                            ObjectPatternMember::Property(PatternProperty {
                                key: property.key,
                                value: self.to_pattern(property.value)?,
                                shorthand: property.shorthand,
                                span: property.span,
                            })
                        }
                        ObjectMember::Spread(spread) => ObjectPatternMember::Rest(RestElement {
                            argument: Box::new(self.to_pattern(*spread.argument)?),
                            span: spread.span,
                        }),
                        ObjectMember::Property(property) => {
                            return Err(Error::SyntaxError {
                                message: "Invalid destructuring target".into(),
                                span: property.span,
                            });
                        }
                    });
                }
                Pattern::Object(ObjectPattern {
                    properties,
                    span: object.span,
                })
            }
            other => {
                return Err(Error::SyntaxError {
                    message: "Invalid destructuring assignment target".into(),
                    span: other.span(),
                });
            }
        };
        Ok(pattern)
    }

    /// Parses a binding target: identifier, object pattern or array pattern.
    pub(super) fn parse_binding_target(&mut self) -> Result<Pattern, Error> {
        match self.current.kind {
            TokenKind::LeftBracket => self.parse_array_pattern(),
            TokenKind::LeftBrace => self.parse_object_pattern(),
            _ => Ok(Pattern::Identifier(self.expect_identifier()?)),
        }
    }

    /// Parses a binding target with an optional `= default`.
    pub(super) fn parse_binding_element(&mut self) -> Result<Pattern, Error> {
        let target = self.parse_binding_target()?;
        if !self.eat(&TokenKind::Equal) {
            return Ok(target);
        }
        let start = target.span().start;
        let default = self.allow_in(|p| p.parse_assignment())?;
        Ok(Pattern::Assignment(AssignmentPattern {
            left: Box::new(target),
            right: Box::new(default),
            span: self.span_from(start),
        }))
    }

    fn parse_rest_element(&mut self) -> Result<RestElement, Error> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Ellipsis)?;
        let argument = self.parse_binding_target()?;
        Ok(RestElement {
            argument: Box::new(argument),
            span: self.span_from(start),
        })
    }

    fn parse_array_pattern(&mut self) -> Result<Pattern, Error> {
        let start = self.current.span.start;
        self.advance(); // consume '['

        let mut elements = Vec::new();
        while !self.check(&TokenKind::RightBracket) {
            if self.eat(&TokenKind::Comma) {
                elements.push(None);
                continue;
            }
            if self.check(&TokenKind::Ellipsis) {
                elements.push(Some(Pattern::Rest(self.parse_rest_element()?)));
            } else {
                elements.push(Some(self.parse_binding_element()?));
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RightBracket)?;

        Ok(Pattern::Array(ArrayPattern {
            elements,
            span: self.span_from(start),
        }))
    }

    fn parse_object_pattern(&mut self) -> Result<Pattern, Error> {
        let start = self.current.span.start;
        self.advance(); // consume '{'

        let mut properties = Vec::new();
        while !self.check(&TokenKind::RightBrace) {
            if self.check(&TokenKind::Ellipsis) {
                properties.push(ObjectPatternMember::Rest(self.parse_rest_element()?));
            } else {
                let property_start = self.current.span.start;
                let key = self.parse_property_key()?;
                let (value, shorthand) = if self.eat(&TokenKind::Colon) {
                    (self.parse_binding_element()?, false)
                } else {
                    let PropertyKey::Identifier(id) = &key else {
                        return Err(self.unexpected());
                    };
                    let mut value = Pattern::Identifier(id.clone());
                    if self.eat(&TokenKind::Equal) {
                        let default = self.allow_in(|p| p.parse_assignment())?;
                        value = Pattern::Assignment(AssignmentPattern {
                            left: Box::new(value),
                            right: Box::new(default),
                            span: self.span_from(property_start),
                        });
                    }
                    (value, true)
                };
                properties.push(ObjectPatternMember::Property(PatternProperty {
                    key,
                    value,
                    shorthand,
                    span: self.span_from(property_start),
                }));
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RightBrace)?;

        Ok(Pattern::Object(ObjectPattern {
            properties,
            span: self.span_from(start),
        }))
    }
}

fn assignment_operator(kind: &TokenKind) -> Option<AssignmentOperator> {
    let operator = match kind {
        TokenKind::Equal => AssignmentOperator::Assign,
        TokenKind::PlusEqual => AssignmentOperator::AddAssign,
        TokenKind::MinusEqual => AssignmentOperator::SubtractAssign,
        TokenKind::StarEqual => AssignmentOperator::MultiplyAssign,
        TokenKind::SlashEqual => AssignmentOperator::DivideAssign,
        TokenKind::PercentEqual => AssignmentOperator::ModuloAssign,
        TokenKind::StarStarEqual => AssignmentOperator::ExponentAssign,
        TokenKind::LeftShiftEqual => AssignmentOperator::LeftShiftAssign,
        TokenKind::RightShiftEqual => AssignmentOperator::RightShiftAssign,
        TokenKind::UnsignedRightShiftEqual => AssignmentOperator::UnsignedRightShiftAssign,
        TokenKind::AmpersandEqual => AssignmentOperator::BitwiseAndAssign,
        TokenKind::PipeEqual => AssignmentOperator::BitwiseOrAssign,
        TokenKind::CaretEqual => AssignmentOperator::BitwiseXorAssign,
        TokenKind::AmpersandAmpersandEqual => AssignmentOperator::LogicalAndAssign,
        TokenKind::PipePipeEqual => AssignmentOperator::LogicalOrAssign,
        TokenKind::QuestionQuestionEqual => AssignmentOperator::NullishCoalescingAssign,
        _ => return None,
    };
    Some(operator)
}
