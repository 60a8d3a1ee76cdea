// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Positional text edits over an original source

use spacey_syntax::Span;

use crate::error::{CommonJsError, Result};
use crate::sourcemap::{Mapping, MappingsBuilder, SourceMap};

/// A scheduled change to the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Replace `span` with `text`
    Overwrite {
        /// Range being replaced
        span: Span,
        /// Replacement text
        text: String,
    },
    /// Delete `span`
    Remove {
        /// Range being deleted
        span: Span,
    },
}

impl Edit {
    /// The original range this edit replaces.
    pub fn span(&self) -> Span {
        match self {
            Edit::Overwrite { span, .. } | Edit::Remove { span } => *span,
        }
    }

    fn text(&self) -> &str {
        match self {
            Edit::Overwrite { text, .. } => text,
            Edit::Remove { .. } => "",
        }
    }
}

/// A piece of output: either untouched original text or edit output.
#[derive(Debug, Clone)]
struct Chunk {
    start: usize,
    content: String,
    edited: bool,
}

/// The original text plus non-overlapping edits, an intro and an outro.
#[derive(Debug)]
pub struct EditBuffer<'a> {
    original: &'a str,
    /// Sorted by start offset
    edits: Vec<Edit>,
    intro: String,
    outro: String,
    trim: bool,
}

impl<'a> EditBuffer<'a> {
    /// Creates a buffer over `original` with no edits.
    pub fn new(original: &'a str) -> Self {
        Self {
            original,
            edits: Vec::new(),
            intro: String::new(),
            outro: String::new(),
            trim: false,
        }
    }

    /// Schedule an edit. Its range must be within the original text and must
    /// not overlap any earlier edit.
    pub fn apply(&mut self, edit: Edit) -> Result<()> {
        let span = edit.span();
        let conflict = span.start > span.end
            || span.end > self.original.len()
            || !self.original.is_char_boundary(span.start)
            || !self.original.is_char_boundary(span.end)
            || self.edits.iter().any(|e| e.span().overlaps(span));
        if conflict {
            return Err(CommonJsError::OverlappingEdit {
                start: span.start,
                end: span.end,
            });
        }

        let index = self.edits.partition_point(|e| e.span().start < span.start);
        self.edits.insert(index, edit);
        Ok(())
    }

    /// Delete `span`.
    pub fn remove(&mut self, span: Span) -> Result<()> {
        self.apply(Edit::Remove { span })
    }

    /// Trim leading and trailing whitespace of the edited body. The intro and
    /// outro are not affected.
    pub fn trim(&mut self) -> &mut Self {
        self.trim = true;
        self
    }

    /// Insert text before the body.
    pub fn prepend(&mut self, text: &str) -> &mut Self {
        self.intro.insert_str(0, text);
        self
    }

    /// Insert text after the body.
    pub fn append(&mut self, text: &str) -> &mut Self {
        self.outro.push_str(text);
        self
    }

    /// Render the final text.
    pub fn render(&self) -> String {
        let mut out = self.intro.clone();
        for chunk in self.chunks() {
            out.push_str(&chunk.content);
        }
        out.push_str(&self.outro);
        out
    }

    /// Render the final text and a source map back to the original.
    ///
    /// Untouched text is mapped at every chunk start, every line start and
    /// every offset in `locations`. Edited text is mapped at its start.
    pub fn render_with_map(&self, source_name: &str, locations: &[usize]) -> (String, SourceMap) {
        let lines = LineIndex::new(self.original);
        let mut locations: Vec<usize> = locations.to_vec();
        locations.sort_unstable();
        locations.dedup();

        let mut out = String::new();
        let mut cursor = GeneratedCursor::default();
        let mut builder = MappingsBuilder::new();
        let mut last: Option<(u32, u32)> = None;

        let mut emit = |cursor: &GeneratedCursor, offset: usize, builder: &mut MappingsBuilder| {
            let position = (cursor.line, cursor.column);
            if last == Some(position) {
                return;
            }
            last = Some(position);
            let (original_line, original_column) = lines.position(offset);
            builder.add(Mapping {
                generated_line: cursor.line,
                generated_column: cursor.column,
                original_line,
                original_column,
            });
        };

        cursor.advance(&self.intro);
        out.push_str(&self.intro);

        for chunk in self.chunks() {
            if chunk.edited {
                if !chunk.content.is_empty() {
                    emit(&cursor, chunk.start, &mut builder);
                }
                cursor.advance(&chunk.content);
                out.push_str(&chunk.content);
                continue;
            }

            let first = locations.partition_point(|&l| l < chunk.start);
            let mut pending = locations[first..].iter().copied().peekable();
            let mut at_line_start = true;
            for (index, ch) in chunk.content.char_indices() {
                let offset = chunk.start + index;
                while pending.next_if(|&l| l < offset).is_some() {}
                let at_location = pending.next_if_eq(&offset).is_some();
                if at_line_start || at_location {
                    emit(&cursor, offset, &mut builder);
                }
                at_line_start = ch == '\n';
                cursor.advance_char(ch);
            }
            out.push_str(&chunk.content);
        }

        cursor.advance(&self.outro);
        out.push_str(&self.outro);

        let map = SourceMap {
            version: 3,
            file: None,
            sources: vec![source_name.to_string()],
            sources_content: vec![Some(self.original.to_string())],
            names: Vec::new(),
            mappings: builder.finish(),
        };
        (out, map)
    }

    /// Split the original into untouched and edited chunks, then trim.
    fn chunks(&self) -> Vec<Chunk> {
        let mut chunks = Vec::with_capacity(self.edits.len() * 2 + 1);
        let mut pos = 0;
        for edit in &self.edits {
            let span = edit.span();
            if span.start > pos {
                chunks.push(Chunk {
                    start: pos,
                    content: self.original[pos..span.start].to_string(),
                    edited: false,
                });
            }
            chunks.push(Chunk {
                start: span.start,
                content: edit.text().to_string(),
                edited: true,
            });
            pos = span.end;
        }
        if pos < self.original.len() {
            chunks.push(Chunk {
                start: pos,
                content: self.original[pos..].to_string(),
                edited: false,
            });
        }

        if self.trim {
            trim_chunks(&mut chunks);
        }
        chunks
    }
}

fn trim_chunks(chunks: &mut [Chunk]) {
    for chunk in chunks.iter_mut() {
        let trimmed = chunk.content.trim_start();
        let removed = chunk.content.len() - trimmed.len();
        if !chunk.edited {
            chunk.start += removed;
        }
        chunk.content.drain(..removed);
        if !chunk.content.is_empty() {
            break;
        }
    }
    for chunk in chunks.iter_mut().rev() {
        let kept = chunk.content.trim_end().len();
        chunk.content.truncate(kept);
        if !chunk.content.is_empty() {
            break;
        }
    }
}

/// Line/column (UTF-16) of generated text written so far.
#[derive(Debug, Default)]
struct GeneratedCursor {
    line: u32,
    column: u32,
}

impl GeneratedCursor {
    fn advance(&mut self, text: &str) {
        for ch in text.chars() {
            self.advance_char(ch);
        }
    }

    fn advance_char(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += ch.len_utf16() as u32;
        }
    }
}

/// Maps byte offsets of the original text to line/column (UTF-16).
struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(text: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, line_starts }
    }

    fn position(&self, offset: usize) -> (u32, u32) {
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let column = self.text[self.line_starts[line]..offset].encode_utf16().count();
        (line as u32, column as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overwrite(buffer: &mut EditBuffer<'_>, start: usize, end: usize, text: &str) -> Result<()> {
        buffer.apply(Edit::Overwrite {
            span: Span::new(start, end),
            text: text.to_string(),
        })
    }

    #[test]
    fn test_render_without_edits() {
        let buffer = EditBuffer::new("var a = 1;");
        assert_eq!(buffer.render(), "var a = 1;");
    }

    #[test]
    fn test_overwrite_and_remove() {
        let source = "var a = require('a');\nrequire('b');\nuse(a);";
        let mut buffer = EditBuffer::new(source);
        overwrite(&mut buffer, 8, 20, "require$$0").unwrap();
        buffer.remove(Span::new(22, 35)).unwrap();
        assert_eq!(buffer.render(), "var a = require$$0;\n\nuse(a);");
    }

    #[test]
    fn test_edits_applied_in_source_order() {
        let mut buffer = EditBuffer::new("abcdef");
        overwrite(&mut buffer, 4, 5, "E").unwrap();
        overwrite(&mut buffer, 0, 1, "A").unwrap();
        assert_eq!(buffer.render(), "AbcdEf");
    }

    #[test]
    fn test_overlapping_edit_rejected() {
        let mut buffer = EditBuffer::new("abcdef");
        overwrite(&mut buffer, 1, 4, "x").unwrap();
        let err = buffer.remove(Span::new(3, 5)).unwrap_err();
        assert!(matches!(err, CommonJsError::OverlappingEdit { start: 3, end: 5 }));
        assert!(overwrite(&mut buffer, 1, 4, "y").is_err());
        assert!(overwrite(&mut buffer, 4, 6, "z").is_ok());
    }

    #[test]
    fn test_out_of_range_edit_rejected() {
        let mut buffer = EditBuffer::new("abc");
        assert!(buffer.remove(Span::new(2, 10)).is_err());
    }

    #[test]
    fn test_trim_then_wrap() {
        let source = "require('x');\n\n  var a = 1;  \n";
        let mut buffer = EditBuffer::new(source);
        buffer.remove(Span::new(0, 13)).unwrap();
        buffer.trim().prepend("{\n").append("\n}");
        assert_eq!(buffer.render(), "{\nvar a = 1;\n}");
    }

    #[test]
    fn test_prepend_order() {
        let mut buffer = EditBuffer::new("body");
        buffer.prepend("b").prepend("a");
        assert_eq!(buffer.render(), "abbody");
    }

    #[test]
    fn test_map_points_at_original_positions() {
        let source = "var a = require('a');\nfoo(a);\n";
        let mut buffer = EditBuffer::new(source);
        overwrite(&mut buffer, 8, 20, "require$$0").unwrap();
        buffer.trim().prepend("import require$$0 from 'a';\nvar x = __commonjs(function (module) {\n");
        let (code, map) = buffer.render_with_map("input.js", &[22, 26]);
        assert!(code.contains("var a = require$$0;\nfoo(a);"));

        let mappings = map.decoded_mappings();
        // `var` starts line 2 of the output and line 0 of the input.
        assert!(mappings.contains(&Mapping {
            generated_line: 2,
            generated_column: 0,
            original_line: 0,
            original_column: 0,
        }));
        // The overwritten call maps to the call start.
        assert!(mappings.contains(&Mapping {
            generated_line: 2,
            generated_column: 8,
            original_line: 0,
            original_column: 8,
        }));
        // `a` inside `foo(a)` was a recorded location.
        assert!(mappings.contains(&Mapping {
            generated_line: 3,
            generated_column: 4,
            original_line: 1,
            original_column: 4,
        }));
        assert_eq!(map.sources, vec!["input.js"]);
        assert_eq!(map.sources_content, vec![Some(source.to_string())]);
    }

    #[test]
    fn test_map_columns_are_utf16() {
        let source = "var s = '😀'; go();";
        let buffer = EditBuffer::new(source);
        let offset = source.find("go").unwrap();
        let (_, map) = buffer.render_with_map("u.js", &[offset]);
        let mapping = map
            .decoded_mappings()
            .into_iter()
            .find(|m| m.generated_column > 0)
            .unwrap();
        assert_eq!(mapping.original_column, 14);
        assert_eq!(mapping.generated_column, 14);
    }
}
