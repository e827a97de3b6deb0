/*
 * scanner.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Balanced-brace scanning of `${...}` placeholders.
//!
//! The scanner walks a template once, left to right, and yields every
//! outermost `${...}` span. Braces inside a span (including nested `${`)
//! only move the depth counter; they are kept verbatim in the span content
//! and are never reported as separate spans. Callers that need the nested
//! placeholders scan the content again.
//!
//! A `${` whose depth never returns to zero swallows the rest of the input:
//! nothing after it is reported, and the caller treats it as literal text.

/// Opening sequence of a placeholder.
pub const OPEN: &str = "${";

/// A top-level placeholder found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Byte offset of the `$`.
    pub start: usize,
    /// Byte offset just past the closing `}`.
    pub end: usize,
    /// The full source text, `${` through `}`.
    pub matched: String,
    /// Everything between the opening `${` and its matching `}`.
    pub content: String,
}

/// Iterator over the top-level spans of a template.
///
/// Lazily scans so that callers like [`crate::has_alternation`] can stop at
/// the first interesting span.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() {
            let start = self.pos;
            if bytes[start] == b'$' && bytes.get(start + 1) == Some(&b'{') {
                let Some(close) = matching_close(bytes, start + 2) else {
                    // Unbalanced: the remainder is literal text.
                    self.pos = bytes.len();
                    return None;
                };
                self.pos = close + 1;
                return Some(Span {
                    start,
                    end: close + 1,
                    matched: self.text[start..=close].to_string(),
                    content: self.text[start + 2..close].to_string(),
                });
            }
            self.pos += 1;
        }
        None
    }
}

/// Collect every top-level `${...}` span in `text`.
pub fn scan(text: &str) -> Vec<Span> {
    Scanner::new(text).collect()
}

/// Find the `}` that brings the depth opened just before `from` back to zero.
fn matching_close(bytes: &[u8], from: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (offset, byte) in bytes[from..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(from + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split `content` on `separator`, ignoring occurrences inside nested braces.
///
/// Always returns at least one piece. Pieces keep their original text,
/// including nested placeholders.
pub fn split_top_level<'a>(content: &'a str, separator: &str) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut piece_start = 0;
    for_each_top_level(content, separator, |at| {
        pieces.push(&content[piece_start..at]);
        piece_start = at + separator.len();
    });
    pieces.push(&content[piece_start..]);
    pieces
}

/// Check whether `separator` appears in `content` outside nested braces.
pub fn contains_top_level(content: &str, separator: &str) -> bool {
    let mut found = false;
    for_each_top_level(content, separator, |_| found = true);
    found
}

fn for_each_top_level(content: &str, separator: &str, mut on_match: impl FnMut(usize)) {
    let bytes = content.as_bytes();
    let sep = separator.as_bytes();
    if sep.is_empty() {
        return;
    }
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            _ if depth == 0 && bytes[i..].starts_with(sep) => {
                on_match(i);
                i += sep.len();
                continue;
            }
            _ => {}
        }
        i += 1;
    }
}
