//! Source locations recorded on parsed nodes.

use spacey_syntax::ast::*;
use spacey_syntax::{Span, parse};

fn text<'a>(source: &'a str, span: Span) -> &'a str {
    span.source_text(source)
}

#[test]
fn require_call_spans_cover_callee_and_argument() {
    let source = "var foo = require('./foo');\n";
    let program = parse(source).expect("Should parse");

    let Statement::VariableDeclaration(decl) = &program.body[0] else {
        panic!("expected declaration");
    };
    let Some(Expression::Call(call)) = &decl.declarations[0].init else {
        panic!("expected call");
    };
    assert_eq!(text(source, call.span), "require('./foo')");
    assert_eq!(text(source, call.callee.span()), "require");
    assert_eq!(text(source, call.arguments[0].span()), "'./foo'");
    assert_eq!(text(source, decl.span), "var foo = require('./foo');");
}

#[test]
fn statement_spans_include_semicolon_only_when_present() {
    let source = "module.exports = a;\nexports.b = c\n";
    let program = parse(source).expect("Should parse");
    assert_eq!(text(source, program.body[0].span()), "module.exports = a;");
    assert_eq!(text(source, program.body[1].span()), "exports.b = c");
}

#[test]
fn member_chain_spans() {
    let source = "module.exports.foo.bar = 1;";
    let program = parse(source).expect("Should parse");
    let Statement::Expression(stmt) = &program.body[0] else {
        panic!("expected expression statement");
    };
    let Expression::Assignment(assign) = &stmt.expression else {
        panic!("expected assignment");
    };
    let Pattern::Expression(target) = assign.left.as_ref() else {
        panic!("expected member target");
    };
    assert_eq!(text(source, target.span()), "module.exports.foo.bar");
    let Expression::Member(member) = target.as_ref() else {
        panic!("expected member");
    };
    assert_eq!(text(source, member.object.span()), "module.exports.foo");
}

#[test]
fn this_and_function_spans() {
    let source = "(function () { return this; }).call(this);";
    let program = parse(source).expect("Should parse");
    let Statement::Expression(stmt) = &program.body[0] else {
        panic!("expected expression statement");
    };
    let Expression::Call(call) = &stmt.expression else {
        panic!("expected call");
    };
    let Expression::This(span) = &call.arguments[0] else {
        panic!("expected this");
    };
    assert_eq!(span.start, 36);
    let Expression::Member(member) = call.callee.as_ref() else {
        panic!("expected member");
    };
    assert_eq!(
        text(source, member.object.span()),
        "function () { return this; }"
    );
}

#[test]
fn bound_names_of_destructuring() {
    let source = "const { a, b: [c, d = 1], ...e } = f;";
    let program = parse(source).expect("Should parse");
    let Statement::VariableDeclaration(decl) = &program.body[0] else {
        panic!("expected declaration");
    };
    let mut names = Vec::new();
    decl.declarations[0].id.bound_names(&mut names);
    assert_eq!(names, vec!["a", "c", "d", "e"]);
}

#[test]
fn hashbang_is_skipped_but_offsets_are_preserved() {
    let source = "#!/usr/bin/env node\nrequire('x');";
    let program = parse(source).expect("Should parse");
    assert_eq!(text(source, program.body[0].span()), "require('x');");
}

#[test]
fn umd_wrapper_parses() {
    let source = r#"(function (root, factory) {
    if (typeof define === 'function' && define.amd) {
        define([], factory);
    } else if (typeof module === 'object' && module.exports) {
        module.exports = factory();
    } else {
        root.thing = factory();
    }
}(this, function () {
    'use strict';
    var re = /^[a-z]+$/i, n = 10 / 2;
    return { test: function (s) { return re.test(s) && n > 1 } };
}));
"#;
    let program = parse(source).expect("Should parse");
    assert_eq!(program.body.len(), 1);
}
