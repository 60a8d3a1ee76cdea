//! Statement, declaration, class and module parsing.

use super::Parser;
use crate::Error;
use crate::ast::*;
use crate::lexer::{Span, TokenKind};

impl<'a> Parser<'a> {
    /// Parses a single statement.
    pub fn parse_statement(&mut self) -> Result<Statement, Error> {
        let start = self.current.span.start;
        match &self.current.kind {
            TokenKind::Var | TokenKind::Const => self.parse_declaration_statement(start),
            TokenKind::Let if self.let_declaration_follows() => {
                self.parse_declaration_statement(start)
            }
            TokenKind::Function => Ok(Statement::FunctionDeclaration(self.parse_function(start, false)?)),
            TokenKind::Identifier(name) if name == "async" && self.async_function_follows() => {
                self.advance(); // consume 'async'
                Ok(Statement::FunctionDeclaration(self.parse_function(start, true)?))
            }
            TokenKind::Class => Ok(Statement::ClassDeclaration(self.parse_class(true)?)),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::Switch => self.parse_switch_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Do => self.parse_do_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Break | TokenKind::Continue => self.parse_jump_statement(),
            TokenKind::Throw => self.parse_throw_statement(),
            TokenKind::Try => self.parse_try_statement(),
            TokenKind::With => self.parse_with_statement(),
            TokenKind::Debugger => {
                self.advance();
                self.consume_semicolon()?;
                Ok(Statement::Debugger(self.span_from(start)))
            }
            TokenKind::LeftBrace => Ok(Statement::Block(self.parse_block()?)),
            TokenKind::Semicolon => {
                self.advance();
                Ok(Statement::Empty(self.previous.span))
            }
            TokenKind::Import
                if !matches!(
                    self.scanner.peek_token().kind,
                    TokenKind::LeftParen | TokenKind::Dot
                ) =>
            {
                self.parse_import_declaration()
            }
            TokenKind::Export => self.parse_export_declaration(),
            TokenKind::Identifier(_) if self.scanner.peek_token().kind == TokenKind::Colon => {
                self.parse_labeled_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_declaration_statement(&mut self, start: usize) -> Result<Statement, Error> {
        let declaration = self.parse_variable_declaration()?;
        self.consume_semicolon()?;
        Ok(Statement::VariableDeclaration(VariableDeclaration {
            span: self.span_from(start),
            ..declaration
        }))
    }

    fn async_function_follows(&self) -> bool {
        let next = self.scanner.peek_token();
        next.kind == TokenKind::Function && !next.newline_before
    }

    /// Parses `var`/`let`/`const` and its declarators, without the terminator.
    fn parse_variable_declaration(&mut self) -> Result<VariableDeclaration, Error> {
        let start = self.current.span.start;
        let kind = match &self.current.kind {
            TokenKind::Var => VariableKind::Var,
            TokenKind::Let => VariableKind::Let,
            TokenKind::Const => VariableKind::Const,
            _ => return Err(self.error("Expected variable keyword")),
        };
        self.advance();

        let mut declarations = Vec::new();
        loop {
            let declarator_start = self.current.span.start;
            let id = self.parse_binding_target()?;
            let init = if self.eat(&TokenKind::Equal) {
                Some(self.parse_assignment()?)
            } else {
                None
            };
            declarations.push(VariableDeclarator {
                id,
                init,
                span: self.span_from(declarator_start),
            });

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        Ok(VariableDeclaration {
            kind,
            declarations,
            span: self.span_from(start),
        })
    }

    /// Parses `function [*] [name] (params) { body }`; `async` has already
    /// been consumed when `is_async` is set.
    pub(super) fn parse_function(&mut self, start: usize, is_async: bool) -> Result<Function, Error> {
        self.expect(&TokenKind::Function)?;
        let is_generator = self.eat(&TokenKind::Star);

        let id = if matches!(self.current.kind, TokenKind::Identifier(_)) {
            Some(self.expect_identifier()?)
        } else {
            None
        };

        self.in_function_context(is_async, is_generator, |p| {
            let params = p.parse_params()?;
            let body = p.parse_function_body()?;
            Ok(Function {
                id,
                params,
                body,
                is_async,
                is_generator,
                span: p.span_from(start),
            })
        })
    }

    pub(super) fn parse_params(&mut self) -> Result<Vec<Pattern>, Error> {
        self.expect(&TokenKind::LeftParen)?;

        let mut params = Vec::new();
        while !self.check(&TokenKind::RightParen) {
            if self.check(&TokenKind::Ellipsis) {
                let start = self.current.span.start;
                self.advance();
                let argument = self.parse_binding_target()?;
                params.push(Pattern::Rest(RestElement {
                    argument: Box::new(argument),
                    span: self.span_from(start),
                }));
            } else {
                params.push(self.parse_binding_element()?);
            }

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RightParen)?;
        Ok(params)
    }

    pub(super) fn parse_function_body(&mut self) -> Result<Vec<Statement>, Error> {
        self.expect(&TokenKind::LeftBrace)?;
        let mut body = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            body.push(self.parse_statement()?);
        }
        self.expect(&TokenKind::RightBrace)?;
        Ok(body)
    }

    fn parse_block(&mut self) -> Result<BlockStatement, Error> {
        let start = self.current.span.start;
        let body = self.parse_function_body()?;
        Ok(BlockStatement {
            body,
            span: self.span_from(start),
        })
    }

    /// Parses a class declaration (`is_declaration`) or expression.
    pub(super) fn parse_class(&mut self, is_declaration: bool) -> Result<Class, Error> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Class)?;

        let id = if matches!(self.current.kind, TokenKind::Identifier(_)) {
            Some(self.expect_identifier()?)
        } else if is_declaration {
            return Err(self.error("Class declarations require a name"));
        } else {
            None
        };

        let super_class = if self.eat(&TokenKind::Extends) {
            Some(Box::new(self.parse_left_hand_side()?))
        } else {
            None
        };

        self.expect(&TokenKind::LeftBrace)?;
        let mut body = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            if self.eat(&TokenKind::Semicolon) {
                continue;
            }
            body.push(self.parse_class_member()?);
        }
        self.expect(&TokenKind::RightBrace)?;

        Ok(Class {
            id,
            super_class,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_class_member(&mut self) -> Result<ClassMember, Error> {
        let start = self.current.span.start;

        let mut is_static = false;
        if self.modifier_applies("static") {
            self.advance();
            if self.check(&TokenKind::LeftBrace) {
                let block = self.in_function_context(false, false, |p| p.parse_block())?;
                return Ok(ClassMember::StaticBlock(block));
            }
            is_static = true;
        }

        let mut kind = MethodKind::Method;
        let mut is_async = false;
        if self.modifier_applies("get") || self.modifier_applies("set") {
            kind = if self.check_word("get") {
                MethodKind::Get
            } else {
                MethodKind::Set
            };
            self.advance();
        } else if self.modifier_applies("async") {
            is_async = true;
            self.advance();
        }
        let is_generator = self.eat(&TokenKind::Star);

        let key = self.parse_property_key()?;

        if self.check(&TokenKind::LeftParen) {
            if kind == MethodKind::Method && !is_static && is_constructor_key(&key) {
                kind = MethodKind::Constructor;
            }
            let value = self.parse_method(is_async, is_generator)?;
            return Ok(ClassMember::Method(MethodDefinition {
                key,
                value,
                kind,
                is_static,
                span: self.span_from(start),
            }));
        }

        if kind != MethodKind::Method || is_async || is_generator {
            return Err(self.unexpected());
        }

        // Field initializers see the instance as `this`, like a method body.
        let value = if self.eat(&TokenKind::Equal) {
            Some(self.in_function_context(false, false, |p| p.parse_assignment())?)
        } else {
            None
        };
        self.consume_semicolon()?;

        Ok(ClassMember::Property(PropertyDefinition {
            key,
            value,
            is_static,
            span: self.span_from(start),
        }))
    }

    /// `else if` chains are collected in a loop and linked afterwards, so
    /// long chains do not deepen the parser's stack.
    fn parse_if_statement(&mut self) -> Result<Statement, Error> {
        let mut branches = Vec::new();
        let mut tail = loop {
            let start = self.current.span.start;
            self.advance(); // consume 'if'
            self.expect(&TokenKind::LeftParen)?;
            let test = self.allow_in(|p| p.parse_expression())?;
            self.expect(&TokenKind::RightParen)?;
            let consequent = Box::new(self.parse_statement()?);
            branches.push((start, test, consequent));

            if !self.eat(&TokenKind::Else) {
                break None;
            }
            if !self.check(&TokenKind::If) {
                break Some(Box::new(self.parse_statement()?));
            }
        };

        let end = self.previous.span.end;
        let mut chain: Option<IfStatement> = None;
        for (start, test, consequent) in branches.into_iter().rev() {
            let alternate = match chain.take() {
                Some(inner) => Some(Box::new(Statement::If(inner))),
                None => tail.take(),
            };
            chain = Some(IfStatement {
                test,
                consequent,
                alternate,
                span: Span::new(start, end.max(start)),
            });
        }
        chain.map(Statement::If).ok_or_else(|| self.unexpected())
    }

    fn parse_switch_statement(&mut self) -> Result<Statement, Error> {
        let start = self.current.span.start;
        self.advance(); // consume 'switch'
        self.expect(&TokenKind::LeftParen)?;
        let discriminant = self.allow_in(|p| p.parse_expression())?;
        self.expect(&TokenKind::RightParen)?;
        self.expect(&TokenKind::LeftBrace)?;

        let mut cases = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            let case_start = self.current.span.start;
            let test = if self.eat(&TokenKind::Case) {
                Some(self.allow_in(|p| p.parse_expression())?)
            } else {
                self.expect(&TokenKind::Default)?;
                None
            };
            self.expect(&TokenKind::Colon)?;

            let mut consequent = Vec::new();
            while !matches!(
                self.current.kind,
                TokenKind::Case | TokenKind::Default | TokenKind::RightBrace | TokenKind::Eof
            ) {
                consequent.push(self.parse_statement()?);
            }

            cases.push(SwitchCase {
                test,
                consequent,
                span: self.span_from(case_start),
            });
        }
        self.expect(&TokenKind::RightBrace)?;

        Ok(Statement::Switch(SwitchStatement {
            discriminant,
            cases,
            span: self.span_from(start),
        }))
    }

    fn parse_while_statement(&mut self) -> Result<Statement, Error> {
        let start = self.current.span.start;
        self.advance(); // consume 'while'
        self.expect(&TokenKind::LeftParen)?;
        let test = self.allow_in(|p| p.parse_expression())?;
        self.expect(&TokenKind::RightParen)?;
        let body = Box::new(self.parse_statement()?);

        Ok(Statement::While(WhileStatement {
            test,
            body,
            span: self.span_from(start),
        }))
    }

    fn parse_do_while_statement(&mut self) -> Result<Statement, Error> {
        let start = self.current.span.start;
        self.advance(); // consume 'do'
        let body = Box::new(self.parse_statement()?);
        self.expect(&TokenKind::While)?;
        self.expect(&TokenKind::LeftParen)?;
        let test = self.allow_in(|p| p.parse_expression())?;
        self.expect(&TokenKind::RightParen)?;
        // A semicolon is always inserted after do-while.
        self.eat(&TokenKind::Semicolon);

        Ok(Statement::DoWhile(DoWhileStatement {
            body,
            test,
            span: self.span_from(start),
        }))
    }

    fn parse_for_statement(&mut self) -> Result<Statement, Error> {
        let start = self.current.span.start;
        self.advance(); // consume 'for'
        let is_await = self.in_async && self.check_word("await");
        if is_await {
            self.advance();
        }
        self.expect(&TokenKind::LeftParen)?;

        // Initializer, parsed with `in` disabled so `for (x in y)` is seen.
        let saved_no_in = std::mem::replace(&mut self.no_in, true);
        let init = if self.check(&TokenKind::Semicolon) {
            Ok(None)
        } else if matches!(
            self.current.kind,
            TokenKind::Var | TokenKind::Const
        ) || self.let_declaration_follows()
        {
            self.parse_variable_declaration()
                .map(|decl| Some(ForInit::Declaration(Box::new(decl))))
        } else {
            self.parse_expression().map(|expr| Some(ForInit::Expression(expr)))
        };
        self.no_in = saved_no_in;
        let init = init?;

        if self.check(&TokenKind::In) || self.check_word("of") {
            let is_of = self.check_word("of");
            let left = match init {
                Some(ForInit::Declaration(decl)) => ForInLeft::Declaration(decl),
                Some(ForInit::Expression(expr)) => ForInLeft::Pattern(self.to_pattern(expr)?),
                None => return Err(self.unexpected()),
            };
            self.advance(); // consume 'in' / 'of'
            let right = self.allow_in(|p| {
                if is_of {
                    p.parse_assignment()
                } else {
                    p.parse_expression()
                }
            })?;
            self.expect(&TokenKind::RightParen)?;
            let body = Box::new(self.parse_statement()?);

            let span = self.span_from(start);
            return Ok(if is_of {
                Statement::ForOf(ForOfStatement {
                    left,
                    right,
                    body,
                    is_await,
                    span,
                })
            } else {
                Statement::ForIn(ForInStatement {
                    left,
                    right,
                    body,
                    span,
                })
            });
        }

        self.expect(&TokenKind::Semicolon)?;
        let test = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.allow_in(|p| p.parse_expression())?)
        };
        self.expect(&TokenKind::Semicolon)?;
        let update = if self.check(&TokenKind::RightParen) {
            None
        } else {
            Some(self.allow_in(|p| p.parse_expression())?)
        };
        self.expect(&TokenKind::RightParen)?;
        let body = Box::new(self.parse_statement()?);

        Ok(Statement::For(ForStatement {
            init,
            test,
            update,
            body,
            span: self.span_from(start),
        }))
    }

    fn parse_return_statement(&mut self) -> Result<Statement, Error> {
        let start = self.current.span.start;
        self.advance(); // consume 'return'

        // No line terminator is allowed between `return` and its argument.
        let argument = if self.check(&TokenKind::Semicolon) || self.can_insert_semicolon() {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_semicolon()?;

        Ok(Statement::Return(ReturnStatement {
            argument,
            span: self.span_from(start),
        }))
    }

    fn parse_jump_statement(&mut self) -> Result<Statement, Error> {
        let start = self.current.span.start;
        let is_break = self.check(&TokenKind::Break);
        self.advance(); // consume 'break' / 'continue'

        let label = if matches!(self.current.kind, TokenKind::Identifier(_)) && !self.current.newline_before {
            Some(self.expect_identifier()?)
        } else {
            None
        };
        self.consume_semicolon()?;

        let jump = JumpStatement {
            label,
            span: self.span_from(start),
        };
        Ok(if is_break {
            Statement::Break(jump)
        } else {
            Statement::Continue(jump)
        })
    }

    fn parse_throw_statement(&mut self) -> Result<Statement, Error> {
        let start = self.current.span.start;
        self.advance(); // consume 'throw'
        if self.current.newline_before {
            return Err(self.error("Illegal newline after throw"));
        }
        let argument = self.parse_expression()?;
        self.consume_semicolon()?;

        Ok(Statement::Throw(ThrowStatement {
            argument,
            span: self.span_from(start),
        }))
    }

    fn parse_try_statement(&mut self) -> Result<Statement, Error> {
        let start = self.current.span.start;
        self.advance(); // consume 'try'
        let block = self.parse_block()?;

        let handler = if self.check(&TokenKind::Catch) {
            let catch_start = self.current.span.start;
            self.advance();
            let param = if self.eat(&TokenKind::LeftParen) {
                let param = self.parse_binding_target()?;
                self.expect(&TokenKind::RightParen)?;
                Some(param)
            } else {
                None
            };
            let body = self.parse_block()?;
            Some(CatchClause {
                param,
                body,
                span: self.span_from(catch_start),
            })
        } else {
            None
        };

        let finalizer = if self.eat(&TokenKind::Finally) {
            Some(self.parse_block()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(self.error("Missing catch or finally after try"));
        }

        Ok(Statement::Try(TryStatement {
            block,
            handler,
            finalizer,
            span: self.span_from(start),
        }))
    }

    fn parse_with_statement(&mut self) -> Result<Statement, Error> {
        let start = self.current.span.start;
        self.advance(); // consume 'with'
        self.expect(&TokenKind::LeftParen)?;
        let object = self.allow_in(|p| p.parse_expression())?;
        self.expect(&TokenKind::RightParen)?;
        let body = Box::new(self.parse_statement()?);

        Ok(Statement::With(WithStatement {
            object,
            body,
            span: self.span_from(start),
        }))
    }

    fn parse_labeled_statement(&mut self) -> Result<Statement, Error> {
        let start = self.current.span.start;
        let label = self.expect_identifier()?;
        self.expect(&TokenKind::Colon)?;
        let body = Box::new(self.parse_statement()?);

        Ok(Statement::Labeled(LabeledStatement {
            label,
            body,
            span: self.span_from(start),
        }))
    }

    fn parse_expression_statement(&mut self) -> Result<Statement, Error> {
        let start = self.current.span.start;
        let expression = self.parse_expression()?;
        self.consume_semicolon()?;

        Ok(Statement::Expression(ExpressionStatement {
            expression,
            span: self.span_from(start),
        }))
    }

    // ==================== Modules ====================

    fn parse_module_source(&mut self) -> Result<StringLiteral, Error> {
        if let TokenKind::String(value) = &self.current.kind {
            let value = value.clone();
            self.advance();
            Ok(StringLiteral {
                value,
                span: self.previous.span,
            })
        } else {
            Err(self.error("Expected module specifier string"))
        }
    }

    /// Parses an export/import name, which may be a string literal.
    fn parse_module_export_name(&mut self) -> Result<Identifier, Error> {
        if let TokenKind::String(value) = &self.current.kind {
            let name = value.clone();
            self.advance();
            return Ok(Identifier {
                name,
                span: self.previous.span,
            });
        }
        self.expect_identifier_name()
    }

    fn parse_import_declaration(&mut self) -> Result<Statement, Error> {
        let start = self.current.span.start;
        self.advance(); // consume 'import'

        let mut specifiers = Vec::new();

        if !matches!(self.current.kind, TokenKind::String(_)) {
            if matches!(self.current.kind, TokenKind::Identifier(_)) {
                specifiers.push(ImportSpecifier::Default(self.expect_identifier()?));
                self.eat(&TokenKind::Comma);
            }

            if self.eat(&TokenKind::Star) {
                self.expect_word("as")?;
                specifiers.push(ImportSpecifier::Namespace(self.expect_identifier()?));
            } else if self.eat(&TokenKind::LeftBrace) {
                while !self.check(&TokenKind::RightBrace) {
                    let imported = self.parse_module_export_name()?;
                    let local = if self.check_word("as") {
                        self.advance();
                        self.expect_identifier()?
                    } else {
                        imported.clone()
                    };
                    specifiers.push(ImportSpecifier::Named { imported, local });
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(&TokenKind::RightBrace)?;
            }

            self.expect_word("from")?;
        }

        let source = self.parse_module_source()?;
        self.consume_semicolon()?;

        Ok(Statement::Import(ImportDeclaration {
            specifiers,
            source,
            span: self.span_from(start),
        }))
    }

    fn parse_export_declaration(&mut self) -> Result<Statement, Error> {
        let start = self.current.span.start;
        self.advance(); // consume 'export'

        if self.eat(&TokenKind::Star) {
            let exported = if self.check_word("as") {
                self.advance();
                Some(self.parse_module_export_name()?)
            } else {
                None
            };
            self.expect_word("from")?;
            let source = self.parse_module_source()?;
            self.consume_semicolon()?;
            return Ok(Statement::ExportAll(ExportAllDeclaration {
                exported,
                source,
                span: self.span_from(start),
            }));
        }

        if self.eat(&TokenKind::Default) {
            let declaration_start = self.current.span.start;
            let declaration = match &self.current.kind {
                TokenKind::Function => ExportDefaultKind::Function(self.parse_function(declaration_start, false)?),
                TokenKind::Identifier(name) if name == "async" && self.async_function_follows() => {
                    self.advance();
                    ExportDefaultKind::Function(self.parse_function(declaration_start, true)?)
                }
                TokenKind::Class => ExportDefaultKind::Class(self.parse_class(false)?),
                _ => {
                    let expr = self.allow_in(|p| p.parse_assignment())?;
                    self.consume_semicolon()?;
                    ExportDefaultKind::Expression(expr)
                }
            };
            return Ok(Statement::ExportDefault(ExportDefaultDeclaration {
                declaration,
                span: self.span_from(start),
            }));
        }

        if self.eat(&TokenKind::LeftBrace) {
            let mut specifiers = Vec::new();
            while !self.check(&TokenKind::RightBrace) {
                let specifier_start = self.current.span.start;
                let local = self.parse_module_export_name()?;
                let exported = if self.check_word("as") {
                    self.advance();
                    self.parse_module_export_name()?
                } else {
                    local.clone()
                };
                specifiers.push(ExportSpecifier {
                    local,
                    exported,
                    span: self.span_from(specifier_start),
                });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RightBrace)?;

            let source = if self.check_word("from") {
                self.advance();
                Some(self.parse_module_source()?)
            } else {
                None
            };
            self.consume_semicolon()?;

            return Ok(Statement::ExportNamed(ExportNamedDeclaration {
                declaration: None,
                specifiers,
                source,
                span: self.span_from(start),
            }));
        }

        let declaration = match &self.current.kind {
            TokenKind::Var | TokenKind::Let | TokenKind::Const | TokenKind::Function | TokenKind::Class => {
                self.parse_statement()?
            }
            TokenKind::Identifier(name) if name == "async" && self.async_function_follows() => {
                self.parse_statement()?
            }
            _ => return Err(self.unexpected()),
        };

        Ok(Statement::ExportNamed(ExportNamedDeclaration {
            declaration: Some(Box::new(declaration)),
            specifiers: Vec::new(),
            source: None,
            span: self.span_from(start),
        }))
    }
}

fn is_constructor_key(key: &PropertyKey) -> bool {
    match key {
        PropertyKey::Identifier(id) => id.name == "constructor",
        PropertyKey::Literal(Literal {
            value: LiteralValue::String(s),
            ..
        }) => s == "constructor",
        _ => false,
    }
}
