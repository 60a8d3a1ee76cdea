// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for CommonJS conversion

use thiserror::Error;

/// Result type for CommonJS conversion
pub type Result<T> = std::result::Result<T, CommonJsError>;

/// Errors that can occur while converting a module
#[derive(Debug, Error)]
pub enum CommonJsError {
    /// The module could not be parsed
    #[error("Error parsing {id}: {source}")]
    Parse {
        /// Module id
        id: String,
        /// Underlying syntax error
        source: spacey_syntax::Error,
    },

    /// Named exports were configured for a module that is not CommonJS
    #[error(
        "Custom named exports were specified for {id} but it does not appear to be a CommonJS module"
    )]
    NamedExportsMismatch {
        /// Module id
        id: String,
    },

    /// Two edits touched the same source range
    #[error("Cannot edit {start}..{end}: range overlaps an earlier edit")]
    OverlappingEdit {
        /// Start of the rejected range
        start: usize,
        /// End of the rejected range
        end: usize,
    },

    /// An include/exclude pattern is not a valid glob
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as written
        pattern: String,
        /// Reason for failure
        reason: String,
    },

    /// File system error
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommonJsError {
    /// Create a parse error for a module
    pub fn parse(id: impl Into<String>, source: spacey_syntax::Error) -> Self {
        CommonJsError::Parse {
            id: id.into(),
            source,
        }
    }
}
