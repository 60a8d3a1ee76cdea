//! End-to-end tests of the transform hook

use spacey_commonjs::{CommonJsOptions, CommonJsPlugin, TransformOutput};
use std::path::Path;

fn plugin() -> CommonJsPlugin {
    let options = CommonJsOptions {
        source_map: false,
        ..CommonJsOptions::default()
    };
    CommonJsPlugin::with_base_dir(options, Path::new("/")).expect("Should create plugin")
}

fn transform(code: &str) -> Option<TransformOutput> {
    plugin()
        .transform(code, "/project/src/lib.js")
        .expect("Should transform")
}

fn converted(code: &str) -> String {
    transform(code).expect("Should be converted").code
}

fn import_lines(code: &str) -> Vec<&str> {
    code.lines().filter(|l| l.starts_with("import ")).collect()
}

fn named_exports(code: &str) -> Vec<&str> {
    code.lines()
        .filter_map(|l| l.strip_prefix("export var "))
        .filter_map(|l| l.split(' ').next())
        .collect()
}

#[test]
fn test_plain_modules_pass_through() {
    assert!(transform("var a = 1;\nconsole.log(a);").is_none());
    assert!(transform("import x from './x.js';\nexport default x;").is_none());
    // Mentions the names but never as free references.
    assert!(transform("var o = { module: 1 };\nfunction f(exports) { return exports; }").is_none());
}

#[test]
fn test_bare_require_statement_disappears() {
    let code = converted("require('x');\nrun();");
    assert_eq!(import_lines(&code), vec!["import 'x';"]);
    assert!(!code.contains("require('x')"));
    assert!(code.contains("run();"));
}

#[test]
fn test_require_value_becomes_alias() {
    let code = converted("var y = require('x');\ny();");
    assert_eq!(import_lines(&code), vec!["import require$$0 from 'x';"]);
    assert!(code.contains("var y = require$$0;"));
}

#[test]
fn test_repeated_require_shares_one_import() {
    let code = converted("var a = require('x');\nvar b = require('x').b;");
    assert_eq!(import_lines(&code), vec!["import require$$0 from 'x';"]);
    assert!(code.contains("var a = require$$0;"));
    assert!(code.contains("var b = require$$0.b;"));
}

#[test]
fn test_import_order_follows_first_encounter() {
    let code = converted("var b = require('b');\nrequire('a');\nvar c = require('c');");
    assert_eq!(
        import_lines(&code),
        vec![
            "import require$$0 from 'b';",
            "import 'a';",
            "import require$$2 from 'c';"
        ]
    );
}

#[test]
fn test_module_exports_object_literal() {
    let code = converted("module.exports = { a: 1, b: 2 };");
    assert_eq!(named_exports(&code), vec!["a", "b"]);
    assert!(code.contains(
        "export default (lib && lib.__esModule ? lib['default'] : lib);"
    ));
}

#[test]
fn test_exports_property() {
    let code = converted("exports.foo = 1;");
    assert_eq!(named_exports(&code), vec!["foo"]);
}

#[test]
fn test_bare_exports_assignment() {
    let code = converted("exports = {};");
    assert!(named_exports(&code).is_empty());
    assert!(code.contains("export default"));
}

#[test]
fn test_require_named_members_are_not_imports() {
    assert!(transform("var o = { require: 1 };").is_none());
    assert!(transform("obj.require('x');").is_none());
    let code = converted("var o = { require: 1 };\nobj.require('x');\nmodule.exports = o;");
    assert!(import_lines(&code).is_empty());
    assert!(code.contains("obj.require('x');"));
}

#[test]
fn test_top_level_this() {
    let code = converted("this.answer = 42;\nfunction f() { return this; }\nmodule.exports = f;");
    assert!(code.contains("__commonjs_global.answer = 42;"));
    assert!(code.contains("function f() { return this; }"));
    assert!(code.contains("function (module, exports, global) {"));
}

#[test]
fn test_top_level_this_with_global_handling_disabled() {
    let options = CommonJsOptions {
        ignore_global: true,
        source_map: false,
        ..CommonJsOptions::default()
    };
    let plugin = CommonJsPlugin::with_base_dir(options, Path::new("/")).unwrap();
    let output = plugin
        .transform("this.answer = 42;\nmodule.exports = 1;", "/m.js")
        .unwrap()
        .unwrap();
    assert!(output.code.contains("this.answer = 42;"));
    assert!(!output.needs.global_accessor);
    assert!(plugin.transform("this.x = global.y;", "/g.js").unwrap().is_none());
}

#[test]
fn test_reserved_words_and_interop_marker_never_exported() {
    let code = converted(
        "module.exports = { __esModule: true, default: 1, class: 2, new: 3, ok: 4 };",
    );
    assert_eq!(named_exports(&code), vec!["ok"]);
}

#[test]
fn test_overrides_for_plain_module_are_fatal() {
    let options = CommonJsOptions {
        named_exports: [("/lib/esm.js".to_string(), vec!["x".to_string()])]
            .into_iter()
            .collect(),
        ..CommonJsOptions::default()
    };
    let plugin = CommonJsPlugin::with_base_dir(options, Path::new("/")).unwrap();
    let err = plugin
        .transform("var requireable = 1; export { requireable };", "/lib/esm.js")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Custom named exports were specified for /lib/esm.js but it does not appear to be a CommonJS module"
    );
}

#[test]
fn test_shadowed_names_are_not_commonjs() {
    assert!(transform("function load(require) { return require('x'); }").is_none());
    assert!(transform("var module = {}; module.exports = 1;").is_none());
    assert!(transform("try { f(); } catch (exports) { exports.x = 1; }").is_none());
    assert!(transform("{ let exports = {}; exports.y = 2; }").is_none());
}

#[test]
fn test_wrapped_body_is_trimmed() {
    let code = converted("\n\n  module.exports = 1;  \n\n");
    assert!(code.contains("function (module, exports) {\nmodule.exports = 1;\n});"));
}

#[test]
fn test_intro_has_each_helper_once() {
    let plugin = plugin();
    for (i, code) in ["module.exports = 1;", "this.x = 1;", "exports.y = this;"]
        .iter()
        .enumerate()
    {
        plugin.transform(code, &format!("/m{i}.js")).unwrap();
    }
    let intro = plugin.intro();
    assert_eq!(intro.matches("var __commonjs_global").count(), 1);
    assert_eq!(intro.matches("function __commonjs(").count(), 1);
    assert_eq!(intro, plugin.intro());
}

#[test]
fn test_source_map_points_at_original_lines() {
    let plugin = CommonJsPlugin::with_base_dir(CommonJsOptions::default(), Path::new("/")).unwrap();
    let source = "var a = require('a');\n\nmodule.exports = a;\n";
    let output = plugin.transform(source, "/src/in.js").unwrap().unwrap();
    let map = output.map.expect("Source map should be produced");

    assert_eq!(map.sources, vec!["/src/in.js"]);
    let generated_line = output
        .code
        .lines()
        .position(|l| l == "module.exports = a;")
        .unwrap() as u32;
    let mapping = map
        .decoded_mappings()
        .into_iter()
        .find(|m| m.generated_line == generated_line && m.generated_column == 0)
        .expect("Line should be mapped");
    assert_eq!(mapping.original_line, 2);
    assert_eq!(mapping.original_column, 0);
}

#[test]
fn test_executable_script_keeps_hashbang_on_first_line() {
    let code = converted("#!/usr/bin/env node\nvar run = require('./run');\nrun(process.argv);\n");
    let lines: Vec<&str> = code.lines().collect();
    assert_eq!(lines[0], "#!/usr/bin/env node");
    assert_eq!(lines[1], "import require$$0 from './run';");
    assert_eq!(code.matches("#!/usr/bin/env node").count(), 1);
    assert!(code.contains("function (module) {\nvar run = require$$0;\nrun(process.argv);\n});"));
}

#[test]
fn test_private_brand_check_module_converts() {
    let code = converted("class A { #x = 1; static is(o) { return #x in o; } }\nmodule.exports = A;");
    assert!(code.contains("return #x in o;"));
    assert!(code.contains("var lib = __commonjs(function (module, exports) {"));
}
