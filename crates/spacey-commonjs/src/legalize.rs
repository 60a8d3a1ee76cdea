// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Turning arbitrary strings into legal JavaScript binding names

use spacey_syntax::lexer::{is_id_continue, is_id_start};

/// Words that can never be used as a binding name.
pub const RESERVED_WORDS: &[&str] = &[
    "break", "case", "class", "catch", "const", "continue", "debugger", "default", "delete", "do",
    "else", "export", "extends", "finally", "for", "function", "if", "import", "in", "instanceof",
    "let", "new", "return", "super", "switch", "this", "throw", "try", "typeof", "var", "void",
    "while", "with", "yield", "enum", "await", "implements", "package", "protected", "static",
    "interface", "private", "public",
];

/// Global names a generated binding must not shadow.
const BUILTINS: &[&str] = &[
    "Infinity", "NaN", "undefined", "null", "true", "false", "eval", "uneval", "isFinite",
    "isNaN", "parseFloat", "parseInt", "decodeURI", "decodeURIComponent", "encodeURI",
    "encodeURIComponent", "escape", "unescape", "Object", "Function", "Boolean", "Symbol",
    "Error", "EvalError", "InternalError", "RangeError", "ReferenceError", "SyntaxError",
    "TypeError", "URIError", "Number", "Math", "Date", "String", "RegExp", "Array", "Int8Array",
    "Uint8Array", "Uint8ClampedArray", "Int16Array", "Uint16Array", "Int32Array", "Uint32Array",
    "Float32Array", "Float64Array", "Map", "Set", "WeakMap", "WeakSet", "SIMD", "ArrayBuffer",
    "DataView", "JSON", "Promise", "Generator", "GeneratorFunction", "Reflect", "Proxy", "Intl",
];

/// Returns true for reserved words (including strict-mode reservations).
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

fn is_blacklisted(name: &str) -> bool {
    is_reserved_word(name) || BUILTINS.contains(&name)
}

/// Returns true if `name` can be written as a binding identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    is_id_start(first) && chars.all(is_id_continue) && !is_reserved_word(name)
}

/// Derive a legal identifier from `name`.
///
/// `-x` becomes `X`, every other character outside `[$_a-zA-Z0-9]` becomes
/// `_`, and a leading digit or a reserved/builtin name gets a `_` prefix.
pub fn make_legal_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '-' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' {
                    out.push(next.to_ascii_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        if ch == '$' || ch == '_' || ch.is_ascii_alphanumeric() {
            out.push(ch);
        } else {
            out.push('_');
        }
    }

    if out.starts_with(|c: char| c.is_ascii_digit()) || is_blacklisted(&out) {
        out.insert(0, '_');
    }
    if out.is_empty() {
        out.push('_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case_is_camel_cased() {
        assert_eq!(make_legal_identifier("foo-bar"), "fooBar");
        assert_eq!(make_legal_identifier("lodash-es-x"), "lodashEsX");
    }

    #[test]
    fn test_invalid_characters_replaced() {
        assert_eq!(make_legal_identifier("jquery.min"), "jquery_min");
        assert_eq!(make_legal_identifier("a b"), "a_b");
        assert_eq!(make_legal_identifier("a--b"), "a_B");
        assert_eq!(make_legal_identifier("$ok_1"), "$ok_1");
    }

    #[test]
    fn test_leading_digit_prefixed() {
        assert_eq!(make_legal_identifier("1up"), "_1up");
    }

    #[test]
    fn test_reserved_and_builtin_prefixed() {
        assert_eq!(make_legal_identifier("default"), "_default");
        assert_eq!(make_legal_identifier("Object"), "_Object");
        assert_eq!(make_legal_identifier("index"), "index");
    }

    #[test]
    fn test_empty_becomes_underscore() {
        assert_eq!(make_legal_identifier(""), "_");
    }

    #[test]
    fn test_is_valid_identifier() {
        assert!(is_valid_identifier("foo"));
        assert!(is_valid_identifier("$"));
        assert!(is_valid_identifier("café"));
        assert!(!is_valid_identifier("foo-bar"));
        assert!(!is_valid_identifier("1a"));
        assert!(!is_valid_identifier("class"));
        assert!(!is_valid_identifier(""));
    }
}
