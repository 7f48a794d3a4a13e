//! Insertion of the enrichment fragment into a located record.

use crate::fragment::EnrichmentFragment;
use crate::locate::RecordPatterns;

/// Insert `fragment` right after the marker field's value.
///
/// The record's closing brace and the whitespace before it are kept exactly.
/// The fragment uses the line ending found before that brace.
/// Returns `None` when the marker is not immediately followed by the closing
/// brace; the caller must then leave the record untouched.
pub fn splice(
    record_text: &str,
    fragment: &EnrichmentFragment<'_>,
    patterns: &RecordPatterns,
) -> Option<String> {
    let anchor = patterns.anchor(record_text)?;
    let indent = line_indent(record_text, anchor.start);
    let newline = if record_text[anchor.end..].contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    };

    let mut out = String::with_capacity(record_text.len() + 1024);
    out.push_str(&record_text[..anchor.end]);
    out.push_str(&fragment.render(indent, newline));
    out.push_str(&record_text[anchor.end..]);
    Some(out)
}

/// Leading whitespace of the line containing byte `at`, or two spaces when
/// `at` shares the record's first line.
fn line_indent(text: &str, at: usize) -> &str {
    match text[..at].rfind('\n') {
        Some(nl) => {
            let line = &text[nl + 1..at];
            let width = line.len() - line.trim_start_matches([' ', '\t']).len();
            &line[..width]
        }
        None => "  ",
    }
}
