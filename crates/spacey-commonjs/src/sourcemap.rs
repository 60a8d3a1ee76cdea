// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Version 3 source maps

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A version 3 source map for one generated file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    /// Always 3
    pub version: u8,
    /// Name of the generated file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Original sources
    pub sources: Vec<String>,
    /// Original source text, parallel to `sources`
    pub sources_content: Vec<Option<String>>,
    /// Symbol names (unused)
    pub names: Vec<String>,
    /// Base64 VLQ encoded mappings
    pub mappings: String,
}

impl SourceMap {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode the mappings into absolute positions.
    pub fn decoded_mappings(&self) -> Vec<Mapping> {
        decode_mappings(&self.mappings)
    }
}

/// A single mapping; lines are zero-based, columns count UTF-16 units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    /// Line in the generated text
    pub generated_line: u32,
    /// Column in the generated text
    pub generated_column: u32,
    /// Line in the original text
    pub original_line: u32,
    /// Column in the original text
    pub original_column: u32,
}

/// Accumulates mappings in generated order and encodes them.
#[derive(Debug, Default)]
pub struct MappingsBuilder {
    mappings: String,
    current_line: u32,
    line_has_segment: bool,
    prev_generated_column: i64,
    prev_original_line: i64,
    prev_original_column: i64,
}

impl MappingsBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping. Mappings must be added in generated order.
    pub fn add(&mut self, mapping: Mapping) {
        while self.current_line < mapping.generated_line {
            self.mappings.push(';');
            self.current_line += 1;
            self.line_has_segment = false;
            self.prev_generated_column = 0;
        }
        if self.line_has_segment {
            self.mappings.push(',');
        }

        let generated_column = i64::from(mapping.generated_column);
        let original_line = i64::from(mapping.original_line);
        let original_column = i64::from(mapping.original_column);

        vlq::encode(generated_column - self.prev_generated_column, &mut self.mappings);
        vlq::encode(0, &mut self.mappings);
        vlq::encode(original_line - self.prev_original_line, &mut self.mappings);
        vlq::encode(original_column - self.prev_original_column, &mut self.mappings);

        self.prev_generated_column = generated_column;
        self.prev_original_line = original_line;
        self.prev_original_column = original_column;
        self.line_has_segment = true;
    }

    /// Finish, returning the encoded mappings.
    pub fn finish(self) -> String {
        self.mappings
    }
}

/// Decode a mappings string. Malformed segments are skipped.
pub fn decode_mappings(mappings: &str) -> Vec<Mapping> {
    let mut decoded = Vec::new();
    let mut prev_original_line = 0i64;
    let mut prev_original_column = 0i64;

    for (generated_line, line) in mappings.split(';').enumerate() {
        let mut prev_generated_column = 0i64;

        for segment in line.split(',').filter(|s| !s.is_empty()) {
            let mut fields = [0i64; 4];
            let mut rest = segment;
            let mut count = 0;
            while !rest.is_empty() && count < fields.len() {
                let Some((value, consumed)) = vlq::decode(rest) else {
                    break;
                };
                fields[count] = value;
                count += 1;
                rest = &rest[consumed..];
            }

            prev_generated_column += fields[0];
            if count < 4 {
                continue;
            }
            prev_original_line += fields[2];
            prev_original_column += fields[3];

            decoded.push(Mapping {
                generated_line: generated_line as u32,
                generated_column: prev_generated_column as u32,
                original_line: prev_original_line as u32,
                original_column: prev_original_column as u32,
            });
        }
    }

    decoded
}

/// Base64 variable-length quantities.
pub mod vlq {
    const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    const SHIFT: u32 = 5;
    const CONTINUATION: i64 = 1 << SHIFT;
    const MASK: i64 = CONTINUATION - 1;

    /// Append the encoding of `value` to `out`.
    pub fn encode(value: i64, out: &mut String) {
        // The sign lives in the least significant bit.
        let mut rest = if value < 0 { (-value << 1) | 1 } else { value << 1 };
        loop {
            let mut digit = rest & MASK;
            rest >>= SHIFT;
            if rest > 0 {
                digit |= CONTINUATION;
            }
            out.push(BASE64[digit as usize] as char);
            if rest == 0 {
                break;
            }
        }
    }

    /// Decode one value from the front of `input`, returning it and the
    /// number of bytes consumed.
    pub fn decode(input: &str) -> Option<(i64, usize)> {
        let mut result = 0i64;
        let mut shift = 0u32;

        for (index, byte) in input.bytes().enumerate() {
            let digit = BASE64.iter().position(|&b| b == byte)? as i64;
            result += (digit & MASK) << shift;
            if digit & CONTINUATION == 0 {
                let value = if result & 1 == 1 { -(result >> 1) } else { result >> 1 };
                return Some((value, index + 1));
            }
            shift += SHIFT;
            if shift > 60 {
                return None;
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(value: i64) -> String {
        let mut out = String::new();
        vlq::encode(value, &mut out);
        out
    }

    #[test]
    fn test_vlq_known_values() {
        assert_eq!(encoded(0), "A");
        assert_eq!(encoded(1), "C");
        assert_eq!(encoded(-1), "D");
        assert_eq!(encoded(15), "e");
        assert_eq!(encoded(16), "gB");
        assert_eq!(encoded(-16), "hB");
        assert_eq!(encoded(1000), "w+B");
    }

    #[test]
    fn test_vlq_decode_reports_consumed() {
        assert_eq!(vlq::decode("gBC"), Some((16, 2)));
        assert_eq!(vlq::decode("g"), None);
        assert_eq!(vlq::decode("!"), None);
    }

    #[test]
    fn test_builder_lines_and_segments() {
        let mut builder = MappingsBuilder::new();
        builder.add(Mapping {
            generated_line: 0,
            generated_column: 0,
            original_line: 0,
            original_column: 0,
        });
        builder.add(Mapping {
            generated_line: 0,
            generated_column: 4,
            original_line: 0,
            original_column: 4,
        });
        builder.add(Mapping {
            generated_line: 2,
            generated_column: 2,
            original_line: 1,
            original_column: 0,
        });
        let mappings = builder.finish();
        assert_eq!(mappings, "AAAA,IAAI;;EACJ");

        let decoded = decode_mappings(&mappings);
        assert_eq!(decoded.len(), 3);
        assert_eq!(
            decoded[2],
            Mapping {
                generated_line: 2,
                generated_column: 2,
                original_line: 1,
                original_column: 0,
            }
        );
    }

    #[test]
    fn test_json_field_names() {
        let map = SourceMap {
            version: 3,
            file: Some("out.js".to_string()),
            sources: vec!["in.js".to_string()],
            sources_content: vec![Some("x".to_string())],
            names: Vec::new(),
            mappings: "AAAA".to_string(),
        };
        let json = map.to_json().unwrap();
        assert!(json.contains("\"sourcesContent\":[\"x\"]"));
        assert!(json.contains("\"version\":3"));
        let parsed: SourceMap = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, map);
    }
}
