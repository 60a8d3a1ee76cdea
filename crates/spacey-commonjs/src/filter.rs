// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! include/exclude filtering of module ids

use glob::{MatchOptions, Pattern};

use crate::error::{CommonJsError, Result};

/// Decides which module ids are considered for conversion.
#[derive(Debug, Clone, Default)]
pub struct ModuleFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl ModuleFilter {
    /// Compile include and exclude glob patterns.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// Returns true if `id` passes the filter: it matches an include pattern
    /// (or none are configured) and matches no exclude pattern.
    pub fn matches(&self, id: &str) -> bool {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        let included = self.include.is_empty()
            || self
                .include
                .iter()
                .any(|pattern| matches_id(pattern, id, options));
        included
            && !self
                .exclude
                .iter()
                .any(|pattern| matches_id(pattern, id, options))
    }
}

/// Relative patterns such as `node_modules/**` match anywhere in an
/// absolute id.
fn matches_id(pattern: &Pattern, id: &str, options: MatchOptions) -> bool {
    if pattern.matches_with(id, options) {
        return true;
    }
    if pattern.as_str().starts_with('/') {
        return false;
    }
    id.match_indices('/')
        .any(|(index, _)| pattern.matches_with(&id[index + 1..], options))
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|err| CommonJsError::InvalidPattern {
                pattern: pattern.clone(),
                reason: err.msg.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(include: &[&str], exclude: &[&str]) -> ModuleFilter {
        let include: Vec<String> = include.iter().map(|s| s.to_string()).collect();
        let exclude: Vec<String> = exclude.iter().map(|s| s.to_string()).collect();
        ModuleFilter::new(&include, &exclude).unwrap()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(ModuleFilter::default().matches("/any/file.js"));
    }

    #[test]
    fn test_include() {
        let f = filter(&["**/node_modules/**"], &[]);
        assert!(f.matches("/app/node_modules/lib/index.js"));
        assert!(!f.matches("/app/src/main.js"));
    }

    #[test]
    fn test_relative_include_matches_suffix() {
        let f = filter(&["node_modules/**"], &[]);
        assert!(f.matches("/app/node_modules/lib/index.js"));
        assert!(!f.matches("/app/src/main.js"));
    }

    #[test]
    fn test_exclude_wins() {
        let f = filter(&["**/*.js"], &["**/vendor/**"]);
        assert!(f.matches("/app/src/a.js"));
        assert!(!f.matches("/app/vendor/b.js"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = ModuleFilter::new(&["a/***/b".to_string()], &[]).unwrap_err();
        assert!(matches!(err, CommonJsError::InvalidPattern { .. }));
    }
}
