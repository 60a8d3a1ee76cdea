// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Relative module specifier resolution by probing the file system

use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};

/// Resolves relative specifiers (`./x`, `../y`) to files on disk.
///
/// Bare specifiers are left to other resolvers. Nothing is cached: every
/// call probes the file system again.
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    /// File extensions to try, in order
    extensions: Vec<String>,
}

impl ModuleResolver {
    /// Create a resolver probing the given extensions (e.g. `.js`)
    pub fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    /// Resolve `specifier` as imported from the file `importer`.
    pub fn resolve(&self, specifier: &str, importer: Option<&Path>) -> Option<PathBuf> {
        if !specifier.starts_with('.') {
            return None;
        }
        let importer = importer?;
        let dir = importer.parent().unwrap_or(Path::new("."));
        self.resolve_from_dir(specifier, dir)
    }

    /// Resolve `specifier` relative to the directory `dir`.
    pub fn resolve_from_dir(&self, specifier: &str, dir: &Path) -> Option<PathBuf> {
        let base = normalize(&dir.join(specifier));
        let resolved = self.candidates(&base).into_iter().find(|candidate| {
            let found = is_file(candidate);
            trace!("probe {} -> {}", candidate.display(), found);
            found
        });

        match &resolved {
            Some(path) => debug!("resolved '{}' to {}", specifier, path.display()),
            None => debug!("could not resolve '{}' from {}", specifier, dir.display()),
        }
        resolved
    }

    /// Candidate files for `base`: itself, then `base + ext` and
    /// `base/index + ext` for each extension.
    pub fn candidates(&self, base: &Path) -> Vec<PathBuf> {
        let mut candidates = vec![base.to_path_buf()];
        for ext in &self.extensions {
            let mut with_ext = base.as_os_str().to_os_string();
            with_ext.push(ext);
            candidates.push(PathBuf::from(with_ext));
            candidates.push(base.join(format!("index{}", ext)));
        }
        candidates
    }
}

impl Default for ModuleResolver {
    fn default() -> Self {
        Self::new(vec![".js".to_string()])
    }
}

/// Errors while reading metadata mean "absent".
fn is_file(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

/// Lexically normalize a path: drop `.` components and fold `..` into
/// the preceding component. Symlinks are not consulted.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                ) && normalized.pop();
                if !popped && !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture(files: &[&str]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "module.exports = 1;").unwrap();
        }
        dir
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/a/b/../../..")), PathBuf::from("/"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn test_bare_specifier_declined() {
        let dir = fixture(&["lodash.js"]);
        let resolver = ModuleResolver::default();
        let importer = dir.path().join("main.js");
        assert_eq!(resolver.resolve("lodash", Some(&importer)), None);
    }

    #[test]
    fn test_no_importer_declined() {
        assert_eq!(ModuleResolver::default().resolve("./a", None), None);
    }

    #[test]
    fn test_exact_file_first() {
        let dir = fixture(&["foo", "foo.js", "foo/index.js"]);
        let resolver = ModuleResolver::default();
        let importer = dir.path().join("main.js");
        assert_eq!(
            resolver.resolve("./foo", Some(&importer)),
            Some(dir.path().join("foo"))
        );
    }

    #[test]
    fn test_extension_before_index() {
        let dir = fixture(&["foo.js", "foo/index.js"]);
        let resolver = ModuleResolver::default();
        let importer = dir.path().join("main.js");
        assert_eq!(
            resolver.resolve("./foo", Some(&importer)),
            Some(dir.path().join("foo.js"))
        );
    }

    #[test]
    fn test_directory_index() {
        let dir = fixture(&["foo/index.js"]);
        let resolver = ModuleResolver::default();
        let importer = dir.path().join("main.js");
        assert_eq!(
            resolver.resolve("./foo", Some(&importer)),
            Some(dir.path().join("foo").join("index.js"))
        );
    }

    #[test]
    fn test_parent_directory() {
        let dir = fixture(&["lib/util.js", "src/main.js"]);
        let resolver = ModuleResolver::default();
        let importer = dir.path().join("src").join("main.js");
        assert_eq!(
            resolver.resolve("../lib/util", Some(&importer)),
            Some(dir.path().join("lib").join("util.js"))
        );
    }

    #[test]
    fn test_missing_declined() {
        let dir = fixture(&[]);
        let resolver = ModuleResolver::default();
        let importer = dir.path().join("main.js");
        assert_eq!(resolver.resolve("./nope", Some(&importer)), None);
    }

    #[test]
    fn test_extension_order_is_configured_order() {
        let dir = fixture(&["foo.cjs", "foo.js"]);
        let resolver = ModuleResolver::new(vec![".cjs".to_string(), ".js".to_string()]);
        let importer = dir.path().join("main.js");
        assert_eq!(
            resolver.resolve("./foo", Some(&importer)),
            Some(dir.path().join("foo.cjs"))
        );
    }

    #[test]
    fn test_extension_is_appended_not_replaced() {
        let dir = fixture(&["jquery.min.js"]);
        let resolver = ModuleResolver::default();
        let importer = dir.path().join("main.js");
        assert_eq!(
            resolver.resolve("./jquery.min", Some(&importer)),
            Some(dir.path().join("jquery.min.js"))
        );
    }

    #[test]
    fn test_candidates_order() {
        let resolver = ModuleResolver::new(vec![".js".to_string(), ".json".to_string()]);
        let candidates = resolver.candidates(Path::new("/x/foo"));
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/x/foo"),
                PathBuf::from("/x/foo.js"),
                PathBuf::from("/x/foo/index.js"),
                PathBuf::from("/x/foo.json"),
                PathBuf::from("/x/foo/index.json"),
            ]
        );
    }
}
