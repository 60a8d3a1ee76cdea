// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The wrapper runtime shared by every converted module
//!
//! Converted modules call a factory helper that builds a fresh
//! `{ exports: {} }` record, runs the module body against it and returns
//! the final `module.exports`. Modules that touch the global object also
//! receive a portable global accessor. Both helpers are emitted once per
//! build, ahead of all module code.

use std::sync::atomic::{AtomicBool, Ordering};

/// Name of the global object accessor.
pub const GLOBAL_NAME: &str = "__commonjs_global";

/// Name of the wrapper factory.
pub const FACTORY_NAME: &str = "__commonjs";

/// Which helpers a build needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeNeeds {
    /// The global object accessor
    pub global_accessor: bool,
    /// The wrapper factory
    pub factory: bool,
}

/// Build-wide record of needed helpers.
///
/// Modules may be transformed from several threads; flags only ever go
/// from unset to set, so the final state is independent of ordering.
#[derive(Debug, Default)]
pub struct BuildAccumulator {
    global_accessor: AtomicBool,
    factory: AtomicBool,
}

impl BuildAccumulator {
    /// Creates an accumulator with nothing recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the needs of one transformed module.
    pub fn record(&self, needs: RuntimeNeeds) {
        if needs.global_accessor {
            self.global_accessor.store(true, Ordering::Relaxed);
        }
        if needs.factory {
            self.factory.store(true, Ordering::Relaxed);
        }
    }

    /// Snapshot of everything recorded so far.
    pub fn needs(&self) -> RuntimeNeeds {
        RuntimeNeeds {
            global_accessor: self.global_accessor.load(Ordering::Relaxed),
            factory: self.factory.load(Ordering::Relaxed),
        }
    }

    /// The build prologue for everything recorded so far.
    pub fn intro(&self) -> String {
        emit_intro(self.needs())
    }
}

/// Render the prologue for a set of needs. Empty needs give an empty
/// prologue; identical needs always give identical text.
pub fn emit_intro(needs: RuntimeNeeds) -> String {
    let mut parts = Vec::with_capacity(2);

    if needs.global_accessor {
        parts.push(format!(
            "var {GLOBAL_NAME} = typeof window !== 'undefined' ? window : \
             typeof global !== 'undefined' ? global : \
             typeof self !== 'undefined' ? self : {{}};"
        ));
    }

    if needs.factory {
        let global_arg = if needs.global_accessor {
            format!(", {GLOBAL_NAME}")
        } else {
            String::new()
        };
        parts.push(format!(
            "function {FACTORY_NAME}(fn, module) {{ return module = {{ exports: {{}} }}, \
             fn(module, module.exports{global_arg}), module.exports; }}"
        ));
    }

    parts.join("\n")
}
