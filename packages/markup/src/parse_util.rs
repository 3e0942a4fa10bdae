//! Parse Utilities
//!
//! Text ranges, source locations and located parse errors

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chars;
use crate::ml_parser::messages::ParseMessage;

/// Half-open byte range `[start, end)` into the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "invalid range {}..{}", start, end);
        TextRange { start, end }
    }

    pub fn empty(offset: usize) -> Self {
        TextRange { start: offset, end: offset }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains_range(&self, other: TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParseSourceFile {
    pub content: String,
    pub url: String,
}

impl ParseSourceFile {
    pub fn new(content: String, url: String) -> Self {
        ParseSourceFile { content, url }
    }

    /// Resolve a byte offset to a zero-based line/column location.
    /// Offsets past the end of the content are clamped.
    pub fn location(&self, offset: usize) -> ParseLocation {
        let offset = offset.min(self.content.len());
        let mut line = 0;
        let mut col = 0;
        for ch in self.content[..offset].chars() {
            if ch == chars::LF {
                line += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        ParseLocation::new(offset, line, col)
    }

    pub fn span(&self, range: TextRange) -> ParseSourceSpan {
        ParseSourceSpan::new(self.location(range.start), self.location(range.end))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseLocation {
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

impl ParseLocation {
    pub fn new(offset: usize, line: usize, col: usize) -> Self {
        ParseLocation { offset, line, col }
    }
}

impl fmt::Display for ParseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParseSourceSpan {
    pub start: ParseLocation,
    pub end: ParseLocation,
}

impl ParseSourceSpan {
    pub fn new(start: ParseLocation, end: ParseLocation) -> Self {
        ParseSourceSpan { start, end }
    }

    pub fn range(&self) -> TextRange {
        TextRange::new(self.start.offset, self.end.offset)
    }
}

/// A diagnostic lifted out of the syntax tree, with resolved locations
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParseError {
    pub span: ParseSourceSpan,
    pub message: ParseMessage,
}

impl ParseError {
    pub fn new(span: ParseSourceSpan, message: ParseMessage) -> Self {
        ParseError { span, message }
    }

    pub fn msg(&self) -> String {
        self.message.to_string()
    }

    /// Message followed by the source around the error start, e.g.
    /// `Element div is not closed ("<div>[ERROR ->]")`
    pub fn contextual_message(&self, file: &ParseSourceFile) -> String {
        let (before, after) = source_context(&file.content, self.span.start.offset, 100, 3);
        format!("{} (\"{}[ERROR ->]{}\")", self.message, before, after)
    }

    pub fn to_string_in(&self, file: &ParseSourceFile) -> String {
        format!("{}: {}@{}", self.contextual_message(file), file.url, self.span.start)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.span.start)
    }
}

/// Source text on each side of `offset`, bounded by `max_chars` characters
/// and `max_lines` line breaks per side
fn source_context(content: &str, offset: usize, max_chars: usize, max_lines: usize) -> (&str, &str) {
    let offset = offset.min(content.len());

    let mut start = offset;
    let mut lines = 0;
    for (taken, (idx, ch)) in content[..offset].char_indices().rev().enumerate() {
        if taken >= max_chars {
            break;
        }
        if ch == chars::LF {
            lines += 1;
            if lines >= max_lines {
                break;
            }
        }
        start = idx;
    }

    let mut end = offset;
    let mut lines = 0;
    for (taken, (idx, ch)) in content[offset..].char_indices().enumerate() {
        if taken >= max_chars {
            break;
        }
        if ch == chars::LF {
            lines += 1;
            if lines >= max_lines {
                break;
            }
        }
        end = offset + idx + ch.len_utf8();
    }

    (&content[start..offset], &content[offset..end])
}
