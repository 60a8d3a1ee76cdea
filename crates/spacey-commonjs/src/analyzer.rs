// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! CommonJS detection and analysis
//!
//! A single depth-first walk over a parsed module finds genuine references
//! to `module`, `exports` and `global`, rewrites top-level `this`, infers
//! named exports from `exports.x = ...` style assignments and schedules the
//! rewrites of `require('...')` call sites.

use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use rustc_hash::FxBuildHasher;
use std::sync::LazyLock;

use spacey_syntax::Span;
use spacey_syntax::ast::*;

use crate::edit::Edit;
use crate::error::{CommonJsError, Result};
use crate::legalize::make_legal_identifier;
use crate::runtime::GLOBAL_NAME;
use crate::scope::{ScopeStack, declaration_names, lexical_names, param_names, var_names};

static FIRST_PASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:require|module|exports|global)\b").expect("first pass pattern is valid")
});

static FIRST_PASS_NO_GLOBAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:require|module|exports)\b").expect("first pass pattern is valid")
});

static EXPORTS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:module\.)?exports(?:\.([a-zA-Z_$][a-zA-Z_$0-9]*))?$")
        .expect("exports pattern is valid")
});

/// Cheap textual test run before parsing: a module that never mentions
/// `require`, `module`, `exports` (or `global`) cannot be CommonJS.
pub fn may_be_commonjs(code: &str, ignore_global: bool) -> bool {
    if ignore_global {
        FIRST_PASS_NO_GLOBAL.is_match(code)
    } else {
        FIRST_PASS.is_match(code)
    }
}

/// Which CommonJS free variables a module refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageFlags {
    /// `module` is referenced
    pub module: bool,
    /// `exports` is referenced
    pub exports: bool,
    /// `global` or top-level `this` is referenced
    pub global: bool,
}

impl UsageFlags {
    /// Returns true if any flag is set.
    pub fn any(&self) -> bool {
        self.module || self.exports || self.global
    }
}

/// One `require('...')` source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredModule {
    /// The literal specifier
    pub source: String,
    /// Binding the import is bound to (`require$$N`)
    pub alias: String,
    /// Whether any call site uses the value
    pub imports_default: bool,
}

/// Everything the rewriter needs to know about one module.
#[derive(Debug, Clone, Default)]
pub struct ModuleAnalysis {
    /// Free-variable usage
    pub uses: UsageFlags,
    /// Required sources in first-encountered order
    pub required: Vec<RequiredModule>,
    /// Named exports in insertion order (overrides first)
    pub named_exports: Vec<String>,
    /// Scheduled rewrites
    pub edits: Vec<Edit>,
    /// Start offsets of visited nodes, for source maps
    pub locations: Vec<usize>,
}

impl ModuleAnalysis {
    /// A module is CommonJS-shaped if it requires something or refers to
    /// `module`, `exports` or `global`.
    pub fn is_commonjs(&self) -> bool {
        !self.required.is_empty() || self.uses.any()
    }
}

/// Options for [`analyze`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeOptions {
    /// Leave `global` and top-level `this` alone
    pub ignore_global: bool,
    /// Record node start offsets for source maps
    pub record_locations: bool,
}

/// Analyze a parsed module.
///
/// `overrides` seeds the named exports; supplying overrides for a module
/// that turns out not to be CommonJS is an error.
pub fn analyze(
    id: &str,
    program: &Program,
    overrides: &[String],
    options: AnalyzeOptions,
) -> Result<ModuleAnalysis> {
    let mut analyzer = Analyzer::new(options);
    for name in overrides {
        analyzer.add_named_export(name);
    }
    analyzer.visit_program(program);

    let analysis = analyzer.finish();
    if !analysis.is_commonjs() && !overrides.is_empty() {
        return Err(CommonJsError::NamedExportsMismatch { id: id.to_string() });
    }
    Ok(analysis)
}

/// Walk state for one module.
struct Analyzer {
    options: AnalyzeOptions,
    scopes: ScopeStack,
    /// Number of enclosing functions that bind their own `this`
    function_depth: usize,
    uses: UsageFlags,
    /// Keyed by source, in first-encountered order
    required: IndexMap<String, RequiredModule, FxBuildHasher>,
    named_exports: IndexSet<String, FxBuildHasher>,
    edits: Vec<Edit>,
    locations: Vec<usize>,
}

impl Analyzer {
    fn new(options: AnalyzeOptions) -> Self {
        Self {
            options,
            scopes: ScopeStack::new(),
            function_depth: 0,
            uses: UsageFlags::default(),
            required: IndexMap::default(),
            named_exports: IndexSet::default(),
            edits: Vec::new(),
            locations: Vec::new(),
        }
    }

    fn finish(self) -> ModuleAnalysis {
        ModuleAnalysis {
            uses: self.uses,
            required: self.required.into_values().collect(),
            named_exports: self.named_exports.into_iter().collect(),
            edits: self.edits,
            locations: self.locations,
        }
    }

    fn record(&mut self, span: Span) {
        if self.options.record_locations {
            self.locations.push(span.start);
        }
    }

    fn add_named_export(&mut self, name: &str) {
        if !self.named_exports.contains(name) {
            self.named_exports.insert(name.to_string());
        }
    }

    /// Register a required source, returning its alias.
    fn add_required(&mut self, source: String, used_as_value: bool) -> String {
        let index = self.required.len();
        let required = self
            .required
            .entry(source)
            .or_insert_with_key(|source| RequiredModule {
                source: source.clone(),
                alias: format!("require$${index}"),
                imports_default: false,
            });
        required.imports_default |= used_as_value;
        required.alias.clone()
    }

    /// Flag a genuine reference to `module`, `exports` or `global`.
    fn reference(&mut self, id: &Identifier) {
        let already = match id.name.as_str() {
            "module" => self.uses.module,
            "exports" => self.uses.exports,
            "global" if !self.options.ignore_global => self.uses.global,
            _ => return,
        };
        if already || self.scopes.is_local(&id.name) {
            return;
        }
        match id.name.as_str() {
            "module" => self.uses.module = true,
            "exports" => self.uses.exports = true,
            _ => self.uses.global = true,
        }
    }

    /// The specifier of `require('literal')` when `require` is the free
    /// CommonJS function.
    fn require_source(&self, expr: &Expression) -> Option<String> {
        let Expression::Call(call) = expr else {
            return None;
        };
        if call.optional || call.callee.as_identifier() != Some("require") {
            return None;
        }
        let [Expression::Literal(Literal {
            value: LiteralValue::String(source),
            ..
        })] = call.arguments.as_slice()
        else {
            return None;
        };
        if self.scopes.is_local("require") {
            return None;
        }
        Some(source.clone())
    }

    // ==================== Statements ====================

    fn visit_program(&mut self, program: &Program) {
        let mut names = Vec::new();
        var_names(&program.body, &mut names);
        lexical_names(&program.body, &mut names);

        self.scopes.begin_scope(names);
        self.visit_statements(&program.body);
        self.scopes.end_scope();
    }

    fn visit_statements(&mut self, body: &[Statement]) {
        for stmt in body {
            self.visit_statement(stmt, true);
        }
    }

    fn visit_block(&mut self, body: &[Statement]) {
        let mut names = Vec::new();
        lexical_names(body, &mut names);

        self.scopes.begin_scope(names);
        self.visit_statements(body);
        self.scopes.end_scope();
    }

    /// `in_list` is false for single-statement positions such as an `if`
    /// branch, where a removed statement must leave an empty statement.
    fn visit_statement(&mut self, stmt: &Statement, in_list: bool) {
        self.record(stmt.span());

        match stmt {
            Statement::VariableDeclaration(decl) => self.visit_declaration(decl),
            Statement::FunctionDeclaration(function) => self.visit_function(function, false),
            Statement::ClassDeclaration(class) => self.visit_class(class, false),
            Statement::Expression(stmt) => {
                if let Some(source) = self.require_source(&stmt.expression) {
                    self.add_required(source, false);
                    self.edits.push(if in_list {
                        Edit::Remove { span: stmt.span }
                    } else {
                        Edit::Overwrite {
                            span: stmt.span,
                            text: ";".to_string(),
                        }
                    });
                } else {
                    self.visit_expression(&stmt.expression);
                }
            }
            Statement::Block(block) => self.visit_block(&block.body),
            Statement::If(s) => {
                // Walk `else if` chains iteratively.
                let mut current = s;
                loop {
                    self.visit_expression(&current.test);
                    self.visit_statement(&current.consequent, false);
                    match current.alternate.as_deref() {
                        Some(Statement::If(next)) => {
                            self.record(next.span);
                            current = next;
                        }
                        Some(alternate) => {
                            self.visit_statement(alternate, false);
                            break;
                        }
                        None => break,
                    }
                }
            }
            Statement::Switch(s) => {
                self.visit_expression(&s.discriminant);
                let mut names = Vec::new();
                for case in &s.cases {
                    lexical_names(&case.consequent, &mut names);
                }
                self.scopes.begin_scope(names);
                for case in &s.cases {
                    if let Some(test) = &case.test {
                        self.visit_expression(test);
                    }
                    self.visit_statements(&case.consequent);
                }
                self.scopes.end_scope();
            }
            Statement::While(s) => {
                self.visit_expression(&s.test);
                self.visit_statement(&s.body, false);
            }
            Statement::DoWhile(s) => {
                self.visit_statement(&s.body, false);
                self.visit_expression(&s.test);
            }
            Statement::For(s) => {
                let head_scope = match &s.init {
                    Some(ForInit::Declaration(decl)) if decl.kind != VariableKind::Var => {
                        self.scopes.begin_scope(declaration_names(decl));
                        true
                    }
                    _ => false,
                };
                match &s.init {
                    Some(ForInit::Declaration(decl)) => self.visit_declaration(decl),
                    Some(ForInit::Expression(expr)) => self.visit_expression(expr),
                    None => {}
                }
                if let Some(test) = &s.test {
                    self.visit_expression(test);
                }
                if let Some(update) = &s.update {
                    self.visit_expression(update);
                }
                self.visit_statement(&s.body, false);
                if head_scope {
                    self.scopes.end_scope();
                }
            }
            Statement::ForIn(ForInStatement {
                left, right, body, ..
            })
            | Statement::ForOf(ForOfStatement {
                left, right, body, ..
            }) => {
                let head_scope = match left {
                    ForInLeft::Declaration(decl) if decl.kind != VariableKind::Var => {
                        self.scopes.begin_scope(declaration_names(decl));
                        true
                    }
                    _ => false,
                };
                match left {
                    ForInLeft::Declaration(decl) => self.visit_declaration(decl),
                    ForInLeft::Pattern(pattern) => self.visit_pattern(pattern, false),
                }
                self.visit_expression(right);
                self.visit_statement(body, false);
                if head_scope {
                    self.scopes.end_scope();
                }
            }
            Statement::Return(s) => {
                if let Some(argument) = &s.argument {
                    self.visit_expression(argument);
                }
            }
            Statement::Throw(s) => self.visit_expression(&s.argument),
            Statement::Try(s) => {
                self.visit_block(&s.block.body);
                if let Some(handler) = &s.handler {
                    let mut names = Vec::new();
                    if let Some(param) = &handler.param {
                        param_names(std::slice::from_ref(param), &mut names);
                    }
                    self.scopes.begin_scope(names);
                    if let Some(param) = &handler.param {
                        self.visit_pattern(param, true);
                    }
                    self.visit_block(&handler.body.body);
                    self.scopes.end_scope();
                }
                if let Some(finalizer) = &s.finalizer {
                    self.visit_block(&finalizer.body);
                }
            }
            Statement::With(s) => {
                self.visit_expression(&s.object);
                self.visit_statement(&s.body, false);
            }
            Statement::Labeled(s) => self.visit_statement(&s.body, false),
            Statement::ExportNamed(export) => {
                if let Some(declaration) = &export.declaration {
                    self.visit_statement(declaration, true);
                }
                // `export { module }` refers to a local; with `from` it names
                // something in another module.
                if export.source.is_none() {
                    for specifier in &export.specifiers {
                        self.reference(&specifier.local);
                    }
                }
            }
            Statement::ExportDefault(export) => match &export.declaration {
                ExportDefaultKind::Function(function) => self.visit_function(function, false),
                ExportDefaultKind::Class(class) => self.visit_class(class, false),
                ExportDefaultKind::Expression(expr) => self.visit_expression(expr),
            },
            Statement::Break(_)
            | Statement::Continue(_)
            | Statement::Debugger(_)
            | Statement::Empty(_)
            | Statement::Import(_)
            | Statement::ExportAll(_) => {}
        }
    }

    fn visit_declaration(&mut self, decl: &VariableDeclaration) {
        for declarator in &decl.declarations {
            self.visit_pattern(&declarator.id, true);
            if let Some(init) = &declarator.init {
                self.visit_expression(init);
            }
        }
    }

    /// Visit a pattern. Identifiers in binding positions declare names and
    /// are not references; in assignment targets they are.
    fn visit_pattern(&mut self, pattern: &Pattern, binding: bool) {
        self.record(pattern.span());

        match pattern {
            Pattern::Identifier(id) => {
                if !binding {
                    self.reference(id);
                }
            }
            Pattern::Object(object) => {
                for member in &object.properties {
                    match member {
                        ObjectPatternMember::Property(property) => {
                            self.visit_property_key(&property.key);
                            self.visit_pattern(&property.value, binding);
                        }
                        ObjectPatternMember::Rest(rest) => {
                            self.visit_pattern(&rest.argument, binding)
                        }
                    }
                }
            }
            Pattern::Array(array) => {
                for element in array.elements.iter().flatten() {
                    self.visit_pattern(element, binding);
                }
            }
            Pattern::Assignment(assignment) => {
                self.visit_pattern(&assignment.left, binding);
                self.visit_expression(&assignment.right);
            }
            Pattern::Rest(rest) => self.visit_pattern(&rest.argument, binding),
            Pattern::Expression(expr) => self.visit_expression(expr),
        }
    }

    /// Only computed keys contain references.
    fn visit_property_key(&mut self, key: &PropertyKey) {
        if let PropertyKey::Computed(expr) = key {
            self.visit_expression(expr);
        }
    }

    /// Functions bind their own `this`, so they open a new function level.
    fn visit_function(&mut self, function: &Function, is_expression: bool) {
        let mut names = Vec::new();
        param_names(&function.params, &mut names);
        var_names(&function.body, &mut names);
        lexical_names(&function.body, &mut names);
        if is_expression {
            if let Some(id) = &function.id {
                names.push(id.name.clone());
            }
        }

        self.function_depth += 1;
        self.scopes.begin_scope(names);
        for param in &function.params {
            self.visit_pattern(param, true);
        }
        self.visit_statements(&function.body);
        self.scopes.end_scope();
        self.function_depth -= 1;
    }

    /// Arrow functions see the enclosing `this`.
    fn visit_arrow(&mut self, arrow: &ArrowFunctionExpression) {
        let mut names = Vec::new();
        param_names(&arrow.params, &mut names);
        if let ArrowBody::Block(body) = &arrow.body {
            var_names(body, &mut names);
            lexical_names(body, &mut names);
        }

        self.scopes.begin_scope(names);
        for param in &arrow.params {
            self.visit_pattern(param, true);
        }
        match &arrow.body {
            ArrowBody::Block(body) => self.visit_statements(body),
            ArrowBody::Expression(expr) => self.visit_expression(expr),
        }
        self.scopes.end_scope();
    }

    fn visit_class(&mut self, class: &Class, is_expression: bool) {
        if let Some(super_class) = &class.super_class {
            self.visit_expression(super_class);
        }

        let own_scope = match (&class.id, is_expression) {
            (Some(id), true) => {
                self.scopes.begin_scope([id.name.as_str()]);
                true
            }
            _ => false,
        };

        for member in &class.body {
            match member {
                ClassMember::Method(method) => {
                    self.visit_property_key(&method.key);
                    self.visit_function(&method.value, false);
                }
                ClassMember::Property(property) => {
                    self.visit_property_key(&property.key);
                    if let Some(value) = &property.value {
                        self.function_depth += 1;
                        self.visit_expression(value);
                        self.function_depth -= 1;
                    }
                }
                ClassMember::StaticBlock(block) => {
                    self.function_depth += 1;
                    self.visit_block(&block.body);
                    self.function_depth -= 1;
                }
            }
        }

        if own_scope {
            self.scopes.end_scope();
        }
    }

    // ==================== Expressions ====================

    fn visit_expression(&mut self, expr: &Expression) {
        self.record(expr.span());

        match expr {
            Expression::Literal(_)
            | Expression::PrivateName(_)
            | Expression::Super(_)
            | Expression::MetaProperty(_) => {}
            Expression::Identifier(id) => self.reference(id),
            Expression::This(span) => {
                if self.function_depth == 0 && !self.options.ignore_global {
                    self.uses.global = true;
                    self.edits.push(Edit::Overwrite {
                        span: *span,
                        text: GLOBAL_NAME.to_string(),
                    });
                }
            }
            Expression::Array(array) => {
                for element in array.elements.iter().flatten() {
                    self.visit_expression(element);
                }
            }
            Expression::Object(object) => {
                for member in &object.properties {
                    match member {
                        ObjectMember::Property(property) => {
                            self.visit_property_key(&property.key);
                            self.visit_expression(&property.value);
                        }
                        ObjectMember::Spread(spread) => self.visit_expression(&spread.argument),
                    }
                }
            }
            Expression::Template(template) => {
                for expr in &template.expressions {
                    self.visit_expression(expr);
                }
            }
            Expression::TaggedTemplate(tagged) => {
                self.visit_expression(&tagged.tag);
                for expr in &tagged.quasi.expressions {
                    self.visit_expression(expr);
                }
            }
            Expression::Binary(binary) => {
                // Long left-nested chains such as string concatenations are
                // unwound along the left spine instead of recursing.
                let mut rights = vec![&binary.right];
                let mut left = &binary.left;
                while let Expression::Binary(inner) = &**left {
                    self.record(inner.span);
                    rights.push(&inner.right);
                    left = &inner.left;
                }
                self.visit_expression(left);
                for right in rights.into_iter().rev() {
                    self.visit_expression(right);
                }
            }
            Expression::Unary(unary) => self.visit_expression(&unary.argument),
            Expression::Update(update) => self.visit_expression(&update.argument),
            Expression::Assignment(assignment) => {
                self.check_export_assignment(assignment);
                self.visit_pattern(&assignment.left, false);
                self.visit_expression(&assignment.right);
            }
            Expression::Call(call) => {
                if let Some(source) = self.require_source(expr) {
                    let alias = self.add_required(source, true);
                    self.edits.push(Edit::Overwrite {
                        span: call.span,
                        text: alias,
                    });
                    return;
                }
                self.visit_expression(&call.callee);
                for argument in &call.arguments {
                    self.visit_expression(argument);
                }
            }
            Expression::Member(member) => {
                self.visit_expression(&member.object);
                if let MemberProperty::Expression(property) = &member.property {
                    self.visit_expression(property);
                }
            }
            Expression::Conditional(conditional) => {
                self.visit_expression(&conditional.test);
                self.visit_expression(&conditional.consequent);
                self.visit_expression(&conditional.alternate);
            }
            Expression::Function(function) => self.visit_function(function, true),
            Expression::Arrow(arrow) => self.visit_arrow(arrow),
            Expression::Class(class) => self.visit_class(class, true),
            Expression::New(new) => {
                self.visit_expression(&new.callee);
                for argument in &new.arguments {
                    self.visit_expression(argument);
                }
            }
            Expression::Sequence(sequence) => {
                for expr in &sequence.expressions {
                    self.visit_expression(expr);
                }
            }
            Expression::Spread(spread) => self.visit_expression(&spread.argument),
            Expression::Await(await_expr) => self.visit_expression(&await_expr.argument),
            Expression::Yield(yield_expr) => {
                if let Some(argument) = &yield_expr.argument {
                    self.visit_expression(argument);
                }
            }
            Expression::Import(import) => self.visit_expression(&import.source),
        }
    }

    /// Infer named exports from `exports.x = ...`, `module.exports.x = ...`
    /// and `module.exports = { x, ... }`.
    fn check_export_assignment(&mut self, assignment: &AssignmentExpression) {
        let Pattern::Expression(target) = assignment.left.as_ref() else {
            return;
        };
        let Some((root, path)) = flatten(target) else {
            return;
        };
        if self.scopes.is_local(&root) {
            return;
        }
        let Some(captures) = EXPORTS_PATTERN.captures(&path) else {
            return;
        };

        if path == "module.exports" {
            if let Expression::Object(object) = assignment.right.as_ref() {
                for member in &object.properties {
                    if let ObjectMember::Property(Property {
                        key: PropertyKey::Identifier(key),
                        ..
                    }) = member
                    {
                        if key.name == make_legal_identifier(&key.name) {
                            self.add_named_export(&key.name);
                        }
                    }
                }
            }
        } else if let Some(name) = captures.get(1) {
            self.add_named_export(name.as_str());
        }
    }
}

/// Flatten a non-computed member chain such as `a.b.c` into its root name
/// and dotted path.
fn flatten(expr: &Expression) -> Option<(String, String)> {
    let mut parts = Vec::new();
    let mut current = expr;
    let root = loop {
        match current {
            Expression::Member(member) if !member.computed => {
                let MemberProperty::Identifier(property) = &member.property else {
                    return None;
                };
                parts.push(property.name.as_str());
                current = &member.object;
            }
            Expression::Identifier(id) => break id.name.as_str(),
            _ => return None,
        }
    };

    parts.push(root);
    parts.reverse();
    Some((root.to_string(), parts.join(".")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &str) -> ModuleAnalysis {
        run_with(src, &[], AnalyzeOptions::default())
    }

    fn run_with(src: &str, overrides: &[&str], options: AnalyzeOptions) -> ModuleAnalysis {
        let program = spacey_syntax::parse(src).expect("Should parse");
        let overrides: Vec<String> = overrides.iter().map(|s| s.to_string()).collect();
        analyze("test.js", &program, &overrides, options).expect("Should analyze")
    }

    fn sources(analysis: &ModuleAnalysis) -> Vec<(&str, &str, bool)> {
        analysis
            .required
            .iter()
            .map(|r| (r.source.as_str(), r.alias.as_str(), r.imports_default))
            .collect()
    }

    #[test]
    fn test_first_pass() {
        assert!(may_be_commonjs("var x = require('x');", false));
        assert!(may_be_commonjs("global.foo = 1", false));
        assert!(!may_be_commonjs("global.foo = 1", true));
        assert!(!may_be_commonjs("export default 42;", false));
        assert!(!may_be_commonjs("var requirement = modules;", false));
    }

    #[test]
    fn test_plain_module_is_not_commonjs() {
        let analysis = run("var a = 1; function f() { return a; }");
        assert!(!analysis.is_commonjs());
        assert!(analysis.edits.is_empty());
    }

    #[test]
    fn test_require_statement_is_removed() {
        let analysis = run("require('x');\nfoo();");
        assert_eq!(sources(&analysis), vec![("x", "require$$0", false)]);
        assert_eq!(
            analysis.edits,
            vec![Edit::Remove {
                span: Span::new(0, 13)
            }]
        );
    }

    #[test]
    fn test_require_value_is_overwritten() {
        let analysis = run("var y = require('x');");
        assert_eq!(sources(&analysis), vec![("x", "require$$0", true)]);
        assert_eq!(
            analysis.edits,
            vec![Edit::Overwrite {
                span: Span::new(8, 20),
                text: "require$$0".to_string()
            }]
        );
    }

    #[test]
    fn test_duplicate_require_shares_alias() {
        let analysis = run("require('x');\nvar a = require('x'), b = require('y'), c = require('x');");
        assert_eq!(
            sources(&analysis),
            vec![("x", "require$$0", true), ("y", "require$$1", true)]
        );
        let aliases: Vec<_> = analysis
            .edits
            .iter()
            .filter_map(|e| match e {
                Edit::Overwrite { text, .. } => Some(text.as_str()),
                Edit::Remove { .. } => None,
            })
            .collect();
        assert_eq!(aliases, vec!["require$$0", "require$$1", "require$$0"]);
    }

    #[test]
    fn test_chains_keep_source_order() {
        let analysis = run(
            "var s = require('a') + require('b') * 2 + require('c');\n\
             if (x) require('d'); else if (y) z = require('e'); else require('a');",
        );
        assert_eq!(
            sources(&analysis),
            vec![
                ("a", "require$$0", true),
                ("b", "require$$1", true),
                ("c", "require$$2", true),
                ("d", "require$$3", false),
                ("e", "require$$4", true),
            ]
        );
    }

    #[test]
    fn test_deep_chains() {
        let mut src = String::from("if (k === 0) exports.v0 = 0;");
        for i in 1..3000 {
            src.push_str(&format!(" else if (k === {i}) exports.v{i} = {i};"));
        }
        src.push_str("\nmodule.exports.text = 'a'");
        for _ in 0..3000 {
            src.push_str(" + 'a'");
        }
        src.push_str(" + require('tail');");

        let analysis = run(&src);
        assert_eq!(analysis.named_exports.len(), 3001);
        assert_eq!(analysis.named_exports[2999], "v2999");
        assert_eq!(analysis.named_exports[3000], "text");
        assert_eq!(sources(&analysis), vec![("tail", "require$$0", true)]);
    }

    #[test]
    fn test_require_in_if_branch_leaves_empty_statement() {
        let analysis = run("if (a) require('x');");
        assert_eq!(
            analysis.edits,
            vec![Edit::Overwrite {
                span: Span::new(7, 20),
                text: ";".to_string()
            }]
        );
    }

    #[test]
    fn test_unsupported_require_shapes_untouched() {
        let analysis = run("require(name); require('a', 'b'); require(`x`); obj.require('y'); require?.('z');");
        assert!(analysis.required.is_empty());
        assert!(analysis.edits.is_empty());
    }

    #[test]
    fn test_shadowed_require() {
        let analysis = run("function f(require) { return require('x'); }");
        assert!(analysis.required.is_empty());
        let analysis = run("var require = load; require('x');");
        assert!(analysis.required.is_empty());
    }

    #[test]
    fn test_non_reference_positions() {
        let analysis = run("var o = { module: 1, exports() {}, global: 2 }; o.module; class A { exports() {} }");
        assert!(!analysis.uses.any());
        let analysis = run("var o = { require: 1 }; obj.require();");
        assert!(!analysis.is_commonjs());
    }

    #[test]
    fn test_shorthand_property_is_reference() {
        let analysis = run("var o = { module };");
        assert!(analysis.uses.module);
    }

    #[test]
    fn test_computed_member_property_is_reference() {
        let analysis = run("o[exports];");
        assert!(analysis.uses.exports);
    }

    #[test]
    fn test_shadowing_scopes() {
        assert!(!run("function f(module) { module.exports = 1; }").uses.module);
        assert!(!run("var exports = {}; exports.a = 1;").is_commonjs());
        assert!(!run("try {} catch (module) { module.x = 1; }").uses.module);
        assert!(!run("{ let module = {}; module.x = 1; }").uses.module);
        assert!(!run("for (const exports of list) { exports.y = 1; }").uses.exports);
        assert!(!run("(function module() { module.z = 1; })").uses.module);
        assert!(!run("var f = ({ exports }) => exports.a;").uses.exports);
        assert!(!run("import module from 'm'; module.x = 1;").uses.module);
        // A block-scoped binding does not leak out of its block.
        assert!(run("{ let module = {}; } module.exports = 1;").uses.module);
    }

    #[test]
    fn test_var_is_hoisted_out_of_blocks() {
        let analysis = run("module.exports = 1; if (x) { var module = {}; }");
        assert!(!analysis.uses.module);
    }

    #[test]
    fn test_export_list_local_is_reference() {
        assert!(run("export { module };").uses.module);
        assert!(!run("export { module } from 'x';").uses.module);
        assert!(!run("export { a as module };").uses.module);
    }

    #[test]
    fn test_named_exports_from_object_literal() {
        let analysis = run("module.exports = { a: 1, b: 2, 'c': 3, [d]: 4, 'e-f': 5, g() {} };");
        assert_eq!(analysis.named_exports, vec!["a", "b", "g"]);
        assert!(analysis.uses.module);
    }

    #[test]
    fn test_named_exports_from_property_assignments() {
        let analysis = run("exports.foo = 1; module.exports.bar = 2; exports.foo = 3; exports['baz'] = 4;");
        assert_eq!(analysis.named_exports, vec!["foo", "bar"]);
    }

    #[test]
    fn test_bare_exports_assignment_has_no_named_exports() {
        let analysis = run("exports = {};");
        assert!(analysis.named_exports.is_empty());
        assert!(analysis.uses.exports);
    }

    #[test]
    fn test_deep_paths_are_not_exports() {
        let analysis = run("exports.a.b = 1; module.exports.a.b = 2; other.exports.c = 3;");
        assert!(analysis.named_exports.is_empty());
    }

    #[test]
    fn test_shadowed_exports_root_is_not_export() {
        let analysis = run("function f(exports) { exports.a = 1; }");
        assert!(analysis.named_exports.is_empty());
    }

    #[test]
    fn test_overrides_seed_named_exports() {
        let analysis = run_with("exports.b = 1;", &["a", "b"], AnalyzeOptions::default());
        assert_eq!(analysis.named_exports, vec!["a", "b"]);
    }

    #[test]
    fn test_overrides_on_non_commonjs_module_fail() {
        let program = spacey_syntax::parse("export default 1;").unwrap();
        let err = analyze("lib.js", &program, &["a".to_string()], AnalyzeOptions::default())
            .unwrap_err();
        assert!(matches!(err, CommonJsError::NamedExportsMismatch { id } if id == "lib.js"));
    }

    #[test]
    fn test_top_level_this() {
        let analysis = run("this.foo = 1;");
        assert!(analysis.uses.global);
        assert_eq!(
            analysis.edits,
            vec![Edit::Overwrite {
                span: Span::new(0, 4),
                text: GLOBAL_NAME.to_string()
            }]
        );
    }

    #[test]
    fn test_this_inside_functions_untouched() {
        let analysis = run(
            "function f() { return this; }\n\
             var o = { m() { return this; }, get g() { return this; } };\n\
             class C { x = this; static { this.y = 1; } m() { this; } }",
        );
        assert!(analysis.edits.is_empty());
        assert!(!analysis.uses.global);
    }

    #[test]
    fn test_arrow_this_is_lexical() {
        let analysis = run("var f = () => this;");
        assert!(analysis.uses.global);
        assert_eq!(analysis.edits.len(), 1);
    }

    #[test]
    fn test_ignore_global() {
        let options = AnalyzeOptions {
            ignore_global: true,
            ..AnalyzeOptions::default()
        };
        let analysis = run_with("this.a = global.b;", &[], options);
        assert!(!analysis.uses.global);
        assert!(analysis.edits.is_empty());
    }

    #[test]
    fn test_global_reference() {
        assert!(run("global.setTimeout(f);").uses.global);
        assert!(!run("function f(global) { global.x; }").uses.global);
    }

    #[test]
    fn test_umd_wrapper_is_commonjs() {
        let analysis = run(
            "(function (root, factory) {\n\
               if (typeof module === 'object' && module.exports) module.exports = factory(require('dep'));\n\
               else root.lib = factory(root.dep);\n\
             }(this, function (dep) { return {}; }));",
        );
        assert!(analysis.uses.module);
        assert!(analysis.uses.global);
        assert_eq!(sources(&analysis), vec![("dep", "require$$0", true)]);
        assert_eq!(analysis.edits.len(), 2);
    }

    #[test]
    fn test_locations_recorded_when_enabled() {
        let options = AnalyzeOptions {
            record_locations: true,
            ..AnalyzeOptions::default()
        };
        let analysis = run_with("var a = b;", &[], options);
        assert!(analysis.locations.contains(&0));
        assert!(analysis.locations.contains(&4));
        assert!(analysis.locations.contains(&8));
        assert!(run("var a = b;").locations.is_empty());
    }

    #[test]
    fn test_flatten() {
        let program = spacey_syntax::parse("module.exports.foo; a[b].c;").unwrap();
        let exprs: Vec<&Expression> = program
            .body
            .iter()
            .map(|s| match s {
                Statement::Expression(e) => &e.expression,
                _ => panic!("expected expression"),
            })
            .collect();
        assert_eq!(
            flatten(exprs[0]),
            Some(("module".to_string(), "module.exports.foo".to_string()))
        );
        assert_eq!(flatten(exprs[1]), None);
    }
}
