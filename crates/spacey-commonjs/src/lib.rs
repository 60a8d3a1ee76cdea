// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # Spacey CommonJS
//!
//! Converts CommonJS modules into ES modules so a bundler that only
//! understands `import`/`export` can consume them.
//!
//! ## Features
//!
//! - **Scope-aware detection**: `module`, `exports`, `global` and `require`
//!   are only treated as CommonJS when they are not shadowed
//! - **Named export inference** from `exports.x = ...` and
//!   `module.exports = { ... }`, plus configured overrides
//! - **Wrapper runtime** emitted once per build
//! - **Relative resolution** with extension and `index` probing
//! - **Source maps** back to the original module
//!
//! ## Example
//!
//! ```rust,ignore
//! use spacey_commonjs::{CommonJsOptions, CommonJsPlugin};
//!
//! let plugin = CommonJsPlugin::new(CommonJsOptions::default())?;
//! if let Some(output) = plugin.transform("module.exports = 42;", "/src/answer.js")? {
//!     println!("{}", output.code);
//! }
//! println!("{}", plugin.intro());
//! ```

#![warn(missing_docs)]

pub mod analyzer;
pub mod config;
pub mod edit;
pub mod error;
pub mod filter;
pub mod legalize;
pub mod plugin;
pub mod resolver;
pub mod rewriter;
pub mod runtime;
pub mod scope;
pub mod sourcemap;

pub use analyzer::{ModuleAnalysis, RequiredModule, UsageFlags, analyze, may_be_commonjs};
pub use config::{CONFIG_FILE, CommonJsOptions};
pub use error::{CommonJsError, Result};
pub use plugin::CommonJsPlugin;
pub use resolver::ModuleResolver;
pub use rewriter::TransformOutput;
pub use runtime::{BuildAccumulator, RuntimeNeeds, emit_intro};
pub use sourcemap::SourceMap;
