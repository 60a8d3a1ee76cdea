// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Bundler-facing entry points
//!
//! A [`CommonJsPlugin`] is created once per build. The bundler calls
//! [`CommonJsPlugin::resolve_id`] for every specifier, then
//! [`CommonJsPlugin::transform`] for every loaded module, and finally
//! [`CommonJsPlugin::intro`] to get the prologue for the whole bundle.
//! `transform` takes `&self` and may be called from several threads.

use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::analyzer::{AnalyzeOptions, analyze, may_be_commonjs};
use crate::config::CommonJsOptions;
use crate::error::{CommonJsError, Result};
use crate::filter::ModuleFilter;
use crate::resolver::{ModuleResolver, normalize};
use crate::rewriter::{TransformOutput, rewrite};
use crate::runtime::BuildAccumulator;

/// CommonJS to ES module conversion for one build.
#[derive(Debug)]
pub struct CommonJsPlugin {
    options: CommonJsOptions,
    resolver: ModuleResolver,
    filter: ModuleFilter,
    /// Resolved module path -> explicit named exports
    named_exports: FxHashMap<PathBuf, Vec<String>>,
    accumulator: BuildAccumulator,
}

impl CommonJsPlugin {
    /// Create a plugin, resolving configured named-export keys against the
    /// current directory.
    pub fn new(options: CommonJsOptions) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::with_base_dir(options, &cwd)
    }

    /// Create a plugin, resolving configured named-export keys against
    /// `base_dir`. Keys that do not resolve to a file are kept as the
    /// normalized path they name.
    pub fn with_base_dir(mut options: CommonJsOptions, base_dir: &Path) -> Result<Self> {
        options.normalize_extensions();

        let resolver = ModuleResolver::new(options.extensions.clone());
        let filter = ModuleFilter::new(&options.include, &options.exclude)?;

        let named_exports = options
            .named_exports
            .iter()
            .map(|(key, names)| {
                let path = resolver
                    .resolve_from_dir(key, base_dir)
                    .unwrap_or_else(|| normalize(&base_dir.join(key)));
                debug!("named exports for {}: {:?}", path.display(), names);
                (path, names.clone())
            })
            .collect();

        Ok(Self {
            options,
            resolver,
            filter,
            named_exports,
            accumulator: BuildAccumulator::new(),
        })
    }

    /// The effective options.
    pub fn options(&self) -> &CommonJsOptions {
        &self.options
    }

    /// Resolve a relative specifier against the importing file. Returns
    /// `None` for entry modules, bare specifiers and anything that does not
    /// exist, leaving those to other resolvers.
    pub fn resolve_id(&self, specifier: &str, importer: Option<&Path>) -> Option<PathBuf> {
        self.resolver.resolve(specifier, importer)
    }

    /// Convert one module. Returns `None` when the module is left unchanged.
    pub fn transform(&self, code: &str, id: &str) -> Result<Option<TransformOutput>> {
        if !self.filter.matches(id) || !self.options.has_extension(id) {
            trace!("skipping {}: filtered out", id);
            return Ok(None);
        }

        let overrides = self
            .named_exports
            .get(&normalize(Path::new(id)))
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        if !may_be_commonjs(code, self.options.ignore_global) {
            if !overrides.is_empty() {
                return Err(CommonJsError::NamedExportsMismatch { id: id.to_string() });
            }
            trace!("skipping {}: no CommonJS names", id);
            return Ok(None);
        }

        let program = spacey_syntax::parse(code).map_err(|err| CommonJsError::parse(id, err))?;
        let options = AnalyzeOptions {
            ignore_global: self.options.ignore_global,
            record_locations: self.options.source_map,
        };
        let analysis = analyze(id, &program, overrides, options)?;
        let output = rewrite(id, code, &analysis, self.options.source_map)?;

        match &output {
            Some(output) => {
                debug!(
                    "converted {} ({} requires, {} named exports)",
                    id,
                    analysis.required.len(),
                    analysis.named_exports.len()
                );
                self.accumulator.record(output.needs);
            }
            None => trace!("skipping {}: not a CommonJS module", id),
        }
        Ok(output)
    }

    /// The build prologue. Empty if no module was converted.
    pub fn intro(&self) -> String {
        self.accumulator.intro()
    }
}
