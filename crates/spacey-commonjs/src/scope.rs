// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Lexical scope tracking while walking a module.
//!
//! Scopes live in an owned stack indexed by depth; the parent of depth `d`
//! is depth `d - 1`. Name lookup walks from the innermost scope outwards.

use rustc_hash::FxHashSet;

use spacey_syntax::ast::*;

/// The names declared directly in one scope.
#[derive(Debug, Default)]
pub struct Scope {
    names: FxHashSet<String>,
}

impl Scope {
    /// Returns true if `name` is declared in this scope.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

/// A stack of scopes.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new scope containing `names`.
    pub fn begin_scope<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes.push(Scope {
            names: names.into_iter().map(Into::into).collect(),
        });
    }

    /// End the innermost scope.
    pub fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Resolve a name, returning the depth of the scope that declares it.
    pub fn resolve(&self, name: &str) -> Option<usize> {
        self.scopes.iter().rposition(|scope| scope.contains(name))
    }

    /// Check if a name is bound by any open scope.
    pub fn is_local(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }
}

// ==================== Declaration collection ====================

/// Names a function body or program hoists with `var`, looking through
/// nested blocks and control flow but not into nested functions.
pub fn var_names(body: &[Statement], out: &mut Vec<String>) {
    for stmt in body {
        collect_vars(stmt, out);
    }
}

fn collect_vars(stmt: &Statement, out: &mut Vec<String>) {
    match stmt {
        Statement::VariableDeclaration(decl) if decl.kind == VariableKind::Var => {
            declarator_names(decl, out);
        }
        Statement::Block(block) => var_names(&block.body, out),
        Statement::If(s) => {
            let mut current = s;
            loop {
                collect_vars(&current.consequent, out);
                match current.alternate.as_deref() {
                    Some(Statement::If(next)) => current = next,
                    Some(alternate) => {
                        collect_vars(alternate, out);
                        break;
                    }
                    None => break,
                }
            }
        }
        Statement::While(s) => collect_vars(&s.body, out),
        Statement::DoWhile(s) => collect_vars(&s.body, out),
        Statement::For(s) => {
            if let Some(ForInit::Declaration(decl)) = &s.init {
                if decl.kind == VariableKind::Var {
                    declarator_names(decl, out);
                }
            }
            collect_vars(&s.body, out);
        }
        Statement::ForIn(ForInStatement { left, body, .. })
        | Statement::ForOf(ForOfStatement { left, body, .. }) => {
            if let ForInLeft::Declaration(decl) = left {
                if decl.kind == VariableKind::Var {
                    declarator_names(decl, out);
                }
            }
            collect_vars(body, out);
        }
        Statement::Switch(s) => {
            for case in &s.cases {
                var_names(&case.consequent, out);
            }
        }
        Statement::Try(s) => {
            var_names(&s.block.body, out);
            if let Some(handler) = &s.handler {
                var_names(&handler.body.body, out);
            }
            if let Some(finalizer) = &s.finalizer {
                var_names(&finalizer.body, out);
            }
        }
        Statement::Labeled(s) => collect_vars(&s.body, out),
        Statement::With(s) => collect_vars(&s.body, out),
        Statement::ExportNamed(ExportNamedDeclaration {
            declaration: Some(declaration),
            ..
        }) => collect_vars(declaration, out),
        _ => {}
    }
}

/// Names declared directly in a statement list by `let`, `const`, `class`
/// and function declarations.
pub fn lexical_names(body: &[Statement], out: &mut Vec<String>) {
    for stmt in body {
        lexical_declaration(stmt, out);
    }
}

fn lexical_declaration(stmt: &Statement, out: &mut Vec<String>) {
    match stmt {
        Statement::VariableDeclaration(decl) if decl.kind != VariableKind::Var => {
            declarator_names(decl, out);
        }
        Statement::FunctionDeclaration(function) => {
            if let Some(id) = &function.id {
                out.push(id.name.clone());
            }
        }
        Statement::ClassDeclaration(class) => {
            if let Some(id) = &class.id {
                out.push(id.name.clone());
            }
        }
        Statement::ExportNamed(ExportNamedDeclaration {
            declaration: Some(declaration),
            ..
        }) => lexical_declaration(declaration, out),
        Statement::ExportDefault(ExportDefaultDeclaration { declaration, .. }) => {
            match declaration {
                ExportDefaultKind::Function(Function { id: Some(id), .. })
                | ExportDefaultKind::Class(Class { id: Some(id), .. }) => {
                    out.push(id.name.clone())
                }
                _ => {}
            }
        }
        Statement::Import(import) => {
            out.extend(import.specifiers.iter().map(|s| s.local().name.clone()));
        }
        _ => {}
    }
}

/// Names bound by the parameters of a function.
pub fn param_names(params: &[Pattern], out: &mut Vec<String>) {
    let mut names = Vec::new();
    for param in params {
        param.bound_names(&mut names);
    }
    out.extend(names.into_iter().map(str::to_string));
}

fn declarator_names(decl: &VariableDeclaration, out: &mut Vec<String>) {
    let mut names = Vec::new();
    for declarator in &decl.declarations {
        declarator.id.bound_names(&mut names);
    }
    out.extend(names.into_iter().map(str::to_string));
}

/// Names bound by a `for` head declaration.
pub fn declaration_names(decl: &VariableDeclaration) -> Vec<String> {
    let mut out = Vec::new();
    declarator_names(decl, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(src: &str) -> Program {
        spacey_syntax::parse(src).expect("Should parse")
    }

    #[test]
    fn test_scope_begin_end() {
        let mut scopes = ScopeStack::new();
        scopes.begin_scope(["x"]);
        assert_eq!(scopes.resolve("x"), Some(0));
        scopes.end_scope();
        assert!(!scopes.is_local("x"));
        // Ending a scope that was never opened is harmless.
        scopes.end_scope();
    }

    #[test]
    fn test_scope_resolve_walks_outwards() {
        let mut scopes = ScopeStack::new();
        scopes.begin_scope(["require"]);
        scopes.begin_scope(["module"]);
        assert_eq!(scopes.resolve("require"), Some(0));
        assert_eq!(scopes.resolve("module"), Some(1));
        assert_eq!(scopes.resolve("exports"), None);
        scopes.end_scope();
        assert!(!scopes.is_local("module"));
        assert!(scopes.is_local("require"));
    }

    #[test]
    fn test_var_names_are_hoisted_through_blocks() {
        let program = program(
            "var a; if (x) { var b; } for (var c = 0;;) {} try { var d } catch (e) { var f }\n\
             function g() { var inner; }\n\
             let notVar;",
        );
        let mut names = Vec::new();
        var_names(&program.body, &mut names);
        assert_eq!(names, vec!["a", "b", "c", "d", "f"]);
    }

    #[test]
    fn test_var_names_in_else_if_chain() {
        let program = program("if (x) var a; else if (y) { var b; } else if (z) ; else var c;");
        let mut names = Vec::new();
        var_names(&program.body, &mut names);
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_lexical_names() {
        let program = program(
            "let a = 1; const { b, c: [d] } = o; class E {} function f() {} var g;\n\
             import h, { i as j } from 'k';",
        );
        let mut names = Vec::new();
        lexical_names(&program.body, &mut names);
        assert_eq!(names, vec!["a", "b", "d", "E", "f", "h", "j"]);
    }

    #[test]
    fn test_param_names() {
        let program = program("function f(a, { b }, [c = 1], ...d) {}");
        let Statement::FunctionDeclaration(function) = &program.body[0] else {
            panic!("expected function");
        };
        let mut names = Vec::new();
        param_names(&function.params, &mut names);
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }
}
