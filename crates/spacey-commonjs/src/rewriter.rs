// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Rewriting an analyzed CommonJS module into an ES module
//!
//! The output has three parts:
//!
//! ```text
//! #!/usr/bin/env node                      // kept first, if present
//! import require$$0 from './dep';          // one line per required source
//!
//! var name = __commonjs(function (module, exports) {
//! ...original body, with edits applied and trimmed...
//! });
//!
//! export default (name && name.__esModule ? name['default'] : name);
//! export var foo = name.foo;               // one line per named export
//! ```

use spacey_syntax::Span;
use std::path::Path;
use tracing::trace;

use crate::analyzer::ModuleAnalysis;
use crate::edit::EditBuffer;
use crate::error::Result;
use crate::legalize::{is_valid_identifier, make_legal_identifier};
use crate::runtime::{FACTORY_NAME, GLOBAL_NAME, RuntimeNeeds};
use crate::sourcemap::SourceMap;

/// The result of converting one module.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    /// Generated ES module text
    pub code: String,
    /// Source map, when requested
    pub map: Option<SourceMap>,
    /// Helpers the generated code calls
    pub needs: RuntimeNeeds,
    /// Required sources in import order
    pub dependencies: Vec<String>,
}

/// Rewrite a module. Returns `None` when the analysis found nothing
/// CommonJS-shaped, in which case the module is left as it is.
pub fn rewrite(
    id: &str,
    source: &str,
    analysis: &ModuleAnalysis,
    source_map: bool,
) -> Result<Option<TransformOutput>> {
    if !analysis.is_commonjs() {
        return Ok(None);
    }

    let mut buffer = EditBuffer::new(source);
    let interpreter = match hashbang(source) {
        Some(span) => {
            buffer.remove(span)?;
            format!("{}\n", span.source_text(source))
        }
        None => String::new(),
    };
    for edit in &analysis.edits {
        buffer.apply(edit.clone())?;
    }

    let name = wrapper_name(id, analysis);
    trace!(id, name = %name, "Wrapping module");

    let import_block = import_block(analysis);
    let params = wrapper_params(analysis);
    let head =
        format!("{interpreter}{import_block}var {name} = {FACTORY_NAME}(function ({params}) {{\n");

    let mut tail = format!(
        "\n}});\n\nexport default ({name} && {name}.__esModule ? {name}['default'] : {name});\n"
    );
    for export in exportable_names(analysis) {
        tail.push_str(&format!("export var {export} = {name}.{export};\n"));
    }

    buffer.trim().prepend(&head).append(&tail);

    let (code, map) = if source_map {
        let (code, map) = buffer.render_with_map(id, &analysis.locations);
        (code, Some(map))
    } else {
        (buffer.render(), None)
    };

    Ok(Some(TransformOutput {
        code,
        map,
        needs: RuntimeNeeds {
            global_accessor: analysis.uses.global,
            factory: true,
        },
        dependencies: analysis.required.iter().map(|r| r.source.clone()).collect(),
    }))
}

/// The `#!` line a module may start with. It must stay the first line of
/// the output.
fn hashbang(source: &str) -> Option<Span> {
    if !source.starts_with("#!") {
        return None;
    }
    let end = source
        .find(['\n', '\r', '\u{2028}', '\u{2029}'])
        .unwrap_or(source.len());
    Some(Span::new(0, end))
}

/// `import alias from 'source';` for sources whose value is used,
/// `import 'source';` for the rest.
fn import_block(analysis: &ModuleAnalysis) -> String {
    if analysis.required.is_empty() {
        return String::new();
    }

    let mut block = String::new();
    for required in &analysis.required {
        let source = quote(&required.source);
        if required.imports_default {
            block.push_str(&format!("import {} from {source};\n", required.alias));
        } else {
            block.push_str(&format!("import {source};\n"));
        }
    }
    block.push('\n');
    block
}

fn wrapper_params(analysis: &ModuleAnalysis) -> String {
    let uses = analysis.uses;
    let mut params = String::from("module");
    if uses.any() {
        params.push_str(", exports");
    }
    if uses.global {
        params.push_str(", global");
    }
    params
}

/// Named exports that can be re-exported as bindings.
fn exportable_names(analysis: &ModuleAnalysis) -> impl Iterator<Item = &str> {
    analysis
        .named_exports
        .iter()
        .map(String::as_str)
        .filter(|name| *name != "__esModule" && is_valid_identifier(name))
}

/// The module-level binding for the wrapped module, derived from the file
/// name and kept clear of every other module-level name the output binds.
fn wrapper_name(id: &str, analysis: &ModuleAnalysis) -> String {
    let stem = Path::new(id)
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    let mut name = make_legal_identifier(&stem);

    let taken = |candidate: &str| {
        candidate == FACTORY_NAME
            || candidate == GLOBAL_NAME
            || analysis.named_exports.iter().any(|e| e == candidate)
            || analysis.required.iter().any(|r| r.alias == candidate)
    };
    while taken(&name) {
        name.push('$');
    }
    name
}

/// Single-quoted string literal.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{AnalyzeOptions, analyze};

    fn convert(id: &str, src: &str) -> Option<TransformOutput> {
        let program = spacey_syntax::parse(src).expect("Should parse");
        let analysis = analyze(id, &program, &[], AnalyzeOptions::default()).unwrap();
        rewrite(id, src, &analysis, false).unwrap()
    }

    #[test]
    fn test_not_commonjs_is_untouched() {
        assert!(convert("a.js", "var a = 1;").is_none());
    }

    #[test]
    fn test_full_layout() {
        let output = convert(
            "/src/foo.js",
            "var dep = require('./dep');\nrequire('./side');\n\nexports.answer = dep + 1;\n",
        )
        .unwrap();
        assert_eq!(
            output.code,
            "import require$$0 from './dep';\n\
             import './side';\n\
             \n\
             var foo = __commonjs(function (module, exports) {\n\
             var dep = require$$0;\n\
             \n\
             \n\
             exports.answer = dep + 1;\n\
             });\n\
             \n\
             export default (foo && foo.__esModule ? foo['default'] : foo);\n\
             export var answer = foo.answer;\n"
        );
        assert_eq!(output.dependencies, vec!["./dep", "./side"]);
        assert_eq!(
            output.needs,
            RuntimeNeeds {
                global_accessor: false,
                factory: true
            }
        );
        assert!(output.map.is_none());
    }

    #[test]
    fn test_require_only_module_has_module_param() {
        let output = convert("x.js", "require('a');").unwrap();
        assert!(output.code.starts_with("import 'a';\n\nvar x = __commonjs(function (module) {\n"));
    }

    #[test]
    fn test_global_param() {
        let output = convert("g.js", "global.x = this;").unwrap();
        assert!(output.code.contains("function (module, exports, global) {\nglobal.x = __commonjs_global;\n"));
        assert!(output.needs.global_accessor);
    }

    #[test]
    fn test_reserved_and_esmodule_exports_skipped() {
        let output = convert(
            "m.js",
            "exports.__esModule = true; exports.default = 1; exports.ok = 2;",
        )
        .unwrap();
        assert!(output.code.contains("export var ok = m.ok;"));
        assert!(!output.code.contains("export var default"));
        assert!(!output.code.contains("export var __esModule"));
    }

    #[test]
    fn test_wrapper_name_avoids_collisions() {
        let output = convert("lib/foo-bar.js", "exports.fooBar = 1;").unwrap();
        assert!(output.code.contains("var fooBar$ = __commonjs("));
        assert!(output.code.contains("export var fooBar = fooBar$.fooBar;"));

        let output = convert("require$$0.js", "module.exports = require('x');").unwrap();
        assert!(output.code.contains("var require$$0$ = __commonjs("));
    }

    #[test]
    fn test_wrapper_name_is_legalized() {
        let output = convert("jquery.min.js", "module.exports = 1;").unwrap();
        assert!(output.code.contains("var jquery_min = __commonjs("));
        let output = convert("class.js", "module.exports = 1;").unwrap();
        assert!(output.code.contains("var _class = __commonjs("));
    }

    #[test]
    fn test_hashbang_stays_first() {
        let output = convert("/bin/lib.js", "#!/usr/bin/env node\nmodule.exports = 1;").unwrap();
        assert_eq!(
            output.code,
            "#!/usr/bin/env node\n\
             var lib = __commonjs(function (module, exports) {\n\
             module.exports = 1;\n\
             });\n\
             \n\
             export default (lib && lib.__esModule ? lib['default'] : lib);\n"
        );

        let output = convert("cli.js", "#!/usr/bin/env node\r\nrequire('./main');").unwrap();
        assert!(output.code.starts_with("#!/usr/bin/env node\nimport './main';\n\nvar cli = "));
        assert_eq!(output.code.matches("#!").count(), 1);
    }

    #[test]
    fn test_hashbang() {
        assert_eq!(hashbang("#!/bin/node\nx"), Some(Span::new(0, 11)));
        assert_eq!(hashbang("#!node"), Some(Span::new(0, 6)));
        assert_eq!(hashbang("x; #!"), None);
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("a'b"), "'a\\'b'");
        assert_eq!(quote("c:\\x"), "'c:\\\\x'");
    }

    #[test]
    fn test_source_map_is_produced() {
        let src = "var a = require('a');\nmodule.exports = a;";
        let program = spacey_syntax::parse(src).unwrap();
        let options = AnalyzeOptions {
            record_locations: true,
            ..AnalyzeOptions::default()
        };
        let analysis = analyze("in.js", &program, &[], options).unwrap();
        let output = rewrite("in.js", src, &analysis, true).unwrap().unwrap();
        let map = output.map.unwrap();
        assert_eq!(map.sources, vec!["in.js"]);
        assert!(!map.mappings.is_empty());
    }
}
