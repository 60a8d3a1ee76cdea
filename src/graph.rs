// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module graph driver
//!
//! Walks the graph breadth-first from the entry modules. Every layer is
//! transformed in parallel; discovered relative dependencies form the next
//! layer. Results are cached by absolute path so each module is read and
//! transformed once. Transforms run on a dedicated pool whose workers get a
//! large stack, since parsing and analysis recurse with the nesting depth of
//! the source.

use anyhow::{Context, Result};
use dashmap::DashMap;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use spacey_commonjs::resolver::normalize;
use spacey_commonjs::{CommonJsPlugin, TransformOutput};
use spacey_syntax::ast::Statement;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File the build prologue is written to.
pub const RUNTIME_FILE: &str = "commonjs-runtime.js";

/// Stack size of each transform worker.
const WORKER_STACK_SIZE: usize = 64 * 1024 * 1024;

/// A loaded module and its transform result.
#[derive(Debug, Clone)]
pub struct BuiltModule {
    /// Absolute path
    pub path: PathBuf,
    /// Original text
    pub source: String,
    /// `None` if the module was left unchanged
    pub output: Option<TransformOutput>,
    /// Resolved relative dependencies
    pub dependencies: Vec<PathBuf>,
}

impl BuiltModule {
    /// The text to emit for this module.
    pub fn code(&self) -> &str {
        match &self.output {
            Some(output) => &output.code,
            None => &self.source,
        }
    }
}

/// What [`ModuleGraph::write`] produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    /// Modules written
    pub modules: usize,
    /// Modules that were converted
    pub converted: usize,
    /// Whether a prologue file was written
    pub runtime_written: bool,
}

/// Every module reachable from the entries.
pub struct ModuleGraph<'a> {
    plugin: &'a CommonJsPlugin,
    modules: DashMap<PathBuf, BuiltModule>,
    pool: ThreadPool,
}

impl<'a> ModuleGraph<'a> {
    /// Create an empty graph transforming modules with `plugin`.
    pub fn new(plugin: &'a CommonJsPlugin) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .thread_name(|index| format!("spacey-cjs-{index}"))
            .stack_size(WORKER_STACK_SIZE)
            .build()
            .context("Failed to start transform workers")?;

        Ok(Self {
            plugin,
            modules: DashMap::new(),
            pool,
        })
    }

    /// Load and transform everything reachable from `entries`.
    pub fn build(&self, entries: &[PathBuf]) -> Result<()> {
        let mut layer = entries
            .iter()
            .map(|entry| {
                std::path::absolute(entry)
                    .map(|path| normalize(&path))
                    .with_context(|| format!("Invalid entry {}", entry.display()))
            })
            .collect::<Result<Vec<_>>>()?;
        layer.sort();
        layer.dedup();

        while !layer.is_empty() {
            debug!("Transforming {} modules", layer.len());
            let built = self.pool.install(|| {
                layer
                    .par_iter()
                    .map(|path| self.load(path))
                    .collect::<Result<Vec<_>>>()
            })?;

            let mut next: Vec<PathBuf> = built
                .iter()
                .flat_map(|module| module.dependencies.iter().cloned())
                .collect();
            for module in built {
                self.modules.insert(module.path.clone(), module);
            }
            next.retain(|path| !self.modules.contains_key(path));
            next.sort();
            next.dedup();
            layer = next;
        }

        info!("Built {} modules", self.modules.len());
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<BuiltModule> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let id = path.to_string_lossy();
        let output = self.plugin.transform(&source, &id)?;

        let specifiers = match &output {
            Some(output) => output.dependencies.clone(),
            None => static_imports(&source, &id),
        };

        let dependencies = specifiers
            .iter()
            .filter(|specifier| specifier.starts_with('.'))
            .filter_map(|specifier| {
                let resolved = self.plugin.resolve_id(specifier, Some(path));
                if resolved.is_none() {
                    warn!("Cannot resolve '{}' from {}", specifier, path.display());
                }
                resolved
            })
            .collect();

        Ok(BuiltModule {
            path: path.to_path_buf(),
            source,
            output,
            dependencies,
        })
    }

    /// Number of modules in the graph.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// A built module by absolute path.
    pub fn get(&self, path: &Path) -> Option<BuiltModule> {
        self.modules.get(path).map(|entry| entry.clone())
    }

    /// Write every module under `out_dir`, keeping paths relative to the
    /// deepest directory containing all of them, plus source maps and the
    /// prologue.
    pub fn write(&self, out_dir: &Path) -> Result<BuildSummary> {
        let mut paths: Vec<PathBuf> = self.modules.iter().map(|e| e.key().clone()).collect();
        paths.sort();
        let root = common_root(&paths);

        let mut summary = BuildSummary::default();
        for path in &paths {
            let Some(module) = self.get(path) else {
                continue;
            };
            let relative = path.strip_prefix(&root).unwrap_or(path);
            let dest = out_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }

            let mut code = module.code().to_string();
            if let Some(mut map) = module.output.as_ref().and_then(|output| output.map.clone()) {
                let file_name = dest
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default();
                let map_path = dest.with_file_name(format!("{file_name}.map"));
                map.file = Some(file_name.clone());
                fs::write(&map_path, map.to_json()?)
                    .with_context(|| format!("Failed to write {}", map_path.display()))?;
                code.push_str(&format!("//# sourceMappingURL={file_name}.map\n"));
            }

            fs::write(&dest, code).with_context(|| format!("Failed to write {}", dest.display()))?;
            debug!("Wrote {}", dest.display());

            summary.modules += 1;
            if module.output.is_some() {
                summary.converted += 1;
            }
        }

        let intro = self.plugin.intro();
        if !intro.is_empty() {
            fs::create_dir_all(out_dir)
                .with_context(|| format!("Failed to create {}", out_dir.display()))?;
            let runtime = out_dir.join(RUNTIME_FILE);
            fs::write(&runtime, format!("{intro}\n"))
                .with_context(|| format!("Failed to write {}", runtime.display()))?;
            summary.runtime_written = true;
        }

        Ok(summary)
    }
}

/// Sources of static `import`/`export ... from` declarations. Modules that do
/// not parse contribute nothing.
fn static_imports(source: &str, id: &str) -> Vec<String> {
    let program = match spacey_syntax::parse(source) {
        Ok(program) => program,
        Err(err) => {
            warn!("Skipping imports of {}: {}", id, err);
            return Vec::new();
        }
    };

    program
        .body
        .iter()
        .filter_map(|stmt| match stmt {
            Statement::Import(import) => Some(import.source.value.clone()),
            Statement::ExportNamed(export) => export.source.as_ref().map(|s| s.value.clone()),
            Statement::ExportAll(export) => Some(export.source.value.clone()),
            _ => None,
        })
        .collect()
}

/// Deepest directory containing every path.
fn common_root(paths: &[PathBuf]) -> PathBuf {
    let mut iter = paths.iter();
    let Some(first) = iter.next() else {
        return PathBuf::new();
    };
    let mut root = first.parent().map(Path::to_path_buf).unwrap_or_default();
    for path in iter {
        while !path.starts_with(&root) {
            if !root.pop() {
                break;
            }
        }
    }
    root
}
