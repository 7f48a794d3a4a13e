//! Record location inside a text-block document.
//!
//! The document is never parsed into a tree. A record is a brace-delimited
//! field group whose first field is `name: "<string>"`; its span runs from
//! that opening brace to the matching closing brace. Preconditions, checked
//! while locating:
//!
//! - braces inside double-quoted strings and `//` / `/* */` comments are
//!   ignored, all others must balance
//! - records are not nested: no record header appears inside another record
//!
//! A violated precondition is a [`LakeKitError::Layout`], never a silent
//! mis-splice.

use std::ops::Range;

use regex::Regex;
use tracing::debug;

use lakekit_shared::{FieldNames, LakeKitError, Result};

/// Compiled patterns for one [`FieldNames`] schema.
#[derive(Debug, Clone)]
pub struct RecordPatterns {
    /// `{ name: "<string>"`, capture 1 is the raw name.
    header: Regex,
    /// The marker field used as an eligibility test.
    marker: Regex,
    /// Marker field, then whitespace/newline up to the record's closing brace.
    anchor: Regex,
}

/// A double-quoted string literal with backslash escapes.
const QUOTED: &str = r#""(?:[^"\\\n]|\\.)*""#;

impl RecordPatterns {
    /// Compile the patterns for a schema.
    pub fn new(fields: &FieldNames) -> Result<Self> {
        let key = |k: &str| format!(r#""?{}"?\s*:"#, regex::escape(k));
        let compile = |pattern: String| {
            Regex::new(&pattern)
                .map_err(|e| LakeKitError::config(format!("invalid record pattern: {e}")))
        };

        Ok(Self {
            header: compile(format!(r#"\{{\s*{}\s*({QUOTED})"#, key(&fields.name)))?,
            marker: compile(format!(r#"\b{}\s*{QUOTED}"#, key(&fields.marker)))?,
            anchor: compile(format!(
                r#"(\b{}\s*{QUOTED})(\s*\n\s*\}}\z)"#,
                key(&fields.marker)
            ))?,
        })
    }

    /// Whether a record span carries the marker field.
    pub fn has_marker(&self, record_text: &str) -> bool {
        self.marker.is_match(record_text)
    }

    /// Byte range of the marker field (key through closing quote) when it is
    /// immediately followed by the record's closing brace.
    pub(crate) fn anchor(&self, record_text: &str) -> Option<Range<usize>> {
        self.anchor
            .captures(record_text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.range())
    }
}

/// A record header found during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    /// The record name as written between the quotes.
    pub name: String,
    /// Offset of the record's opening brace.
    pub start: usize,
}

/// The exact textual extent of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSpan {
    /// Offset of the opening brace.
    pub start: usize,
    /// Offset one past the matching closing brace.
    pub end: usize,
}

impl RecordSpan {
    /// The record's text, braces included.
    pub fn text<'a>(&self, doc: &'a str) -> &'a str {
        &doc[self.start..self.end]
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// All record headers in document order, duplicates included.
pub fn discover_records(doc: &str, patterns: &RecordPatterns) -> Vec<RecordHeader> {
    patterns
        .header
        .captures_iter(doc)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let quoted = caps.get(1)?.as_str();
            Some(RecordHeader {
                name: unquote(quoted).to_string(),
                start: whole.start(),
            })
        })
        .collect()
}

/// Locate the first record named `name`.
///
/// Returns `Ok(None)` if no record with that name exists.
pub fn locate_record(
    doc: &str,
    name: &str,
    patterns: &RecordPatterns,
) -> Result<Option<RecordSpan>> {
    let Some(header) = discover_records(doc, patterns)
        .into_iter()
        .find(|h| h.name == name)
    else {
        return Ok(None);
    };

    let end = matching_close(doc, header.start).ok_or_else(|| {
        LakeKitError::layout(format!(
            "record {name:?} at byte {} is never closed",
            header.start
        ))
    })?;

    let span = RecordSpan {
        start: header.start,
        end,
    };

    // The record's own header sits at offset 0; any later one is nested.
    let inner = &doc[span.start + 1..span.end];
    if let Some(nested) = patterns.header.find(inner) {
        return Err(LakeKitError::layout(format!(
            "record {name:?} contains another record header at byte {}",
            span.start + 1 + nested.start()
        )));
    }

    debug!(name, start = span.start, end = span.end, "located record");
    Ok(Some(span))
}

/// Offset one past the brace closing the group opened at `open`.
fn matching_close(doc: &str, open: usize) -> Option<usize> {
    let bytes = doc.as_bytes();
    debug_assert_eq!(bytes.get(open), Some(&b'{'));

    let mut depth = 0usize;
    let mut state = Scan::Code;
    let mut i = open;

    while let Some(&b) = bytes.get(i) {
        let next = bytes.get(i + 1).copied();
        match state {
            Scan::String => match b {
                b'\\' => i += 1,
                b'"' => state = Scan::Code,
                _ => {}
            },
            Scan::LineComment => {
                if b == b'\n' {
                    state = Scan::Code;
                }
            }
            Scan::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    state = Scan::Code;
                    i += 1;
                }
            }
            Scan::Code => match (b, next) {
                (b'"', _) => state = Scan::String,
                (b'/', Some(b'/')) => {
                    state = Scan::LineComment;
                    i += 1;
                }
                (b'/', Some(b'*')) => {
                    state = Scan::BlockComment;
                    i += 1;
                }
                (b'{', _) => depth += 1,
                (b'}', _) => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i + 1);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }
    None
}

/// Lexical context of the brace scanner.
#[derive(Clone, Copy)]
enum Scan {
    Code,
    String,
    LineComment,
    BlockComment,
}

/// Strip the surrounding quotes of a matched string literal.
fn unquote(quoted: &str) -> &str {
    quoted
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(quoted)
}
