// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Conversion options.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

/// Default configuration file name looked up by the CLI.
pub const CONFIG_FILE: &str = "spacey-cjs.json";

/// Options controlling which modules are converted and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommonJsOptions {
    /// Recognized extensions, in probe order
    pub extensions: Vec<String>,

    /// Glob patterns a module id must match (empty means all)
    pub include: Vec<String>,

    /// Glob patterns that reject a module id
    pub exclude: Vec<String>,

    /// Leave `global` and top-level `this` alone
    pub ignore_global: bool,

    /// Generate source maps
    pub source_map: bool,

    /// Specifier -> explicit named exports
    pub named_exports: BTreeMap<String, Vec<String>>,
}

impl Default for CommonJsOptions {
    fn default() -> Self {
        Self {
            extensions: vec![".js".to_string()],
            include: Vec::new(),
            exclude: Vec::new(),
            ignore_global: false,
            source_map: true,
            named_exports: BTreeMap::new(),
        }
    }
}

impl CommonJsOptions {
    /// Load options from a JSON file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse options from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        let mut options: CommonJsOptions = serde_json::from_str(content)?;
        options.normalize_extensions();
        Ok(options)
    }

    /// Ensure every extension starts with a dot (`js` -> `.js`).
    pub fn normalize_extensions(&mut self) {
        for ext in &mut self.extensions {
            if !ext.starts_with('.') {
                ext.insert(0, '.');
            }
        }
    }

    /// Returns true if `id` ends with one of the configured extensions.
    pub fn has_extension(&self, id: &str) -> bool {
        self.extensions.iter().any(|ext| id.ends_with(ext.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CommonJsOptions::default();
        assert_eq!(options.extensions, vec![".js"]);
        assert!(options.include.is_empty());
        assert!(!options.ignore_global);
        assert!(options.source_map);
        assert!(options.named_exports.is_empty());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options = CommonJsOptions::from_json(r#"{ "ignoreGlobal": true }"#).unwrap();
        assert!(options.ignore_global);
        assert_eq!(options.extensions, vec![".js"]);
        assert!(options.source_map);
    }

    #[test]
    fn test_full_json() {
        let options = CommonJsOptions::from_json(
            r#"{
                "extensions": ["js", ".cjs"],
                "include": ["node_modules/**"],
                "exclude": ["**/*.test.js"],
                "sourceMap": false,
                "namedExports": { "./vendor/lib.js": ["a", "b"] }
            }"#,
        )
        .unwrap();
        assert_eq!(options.extensions, vec![".js", ".cjs"]);
        assert_eq!(options.include, vec!["node_modules/**"]);
        assert!(!options.source_map);
        assert_eq!(
            options.named_exports.get("./vendor/lib.js"),
            Some(&vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(CommonJsOptions::from_json("{ nope").is_err());
    }

    #[test]
    fn test_has_extension() {
        let mut options = CommonJsOptions::default();
        options.extensions.push(".cjs".to_string());
        assert!(options.has_extension("/a/b.js"));
        assert!(options.has_extension("/a/b.cjs"));
        assert!(!options.has_extension("/a/b.json"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "extensions": [".js", ".jsx"] }"#).unwrap();
        let options = CommonJsOptions::from_file(&path).unwrap();
        assert_eq!(options.extensions, vec![".js", ".jsx"]);
    }
}
