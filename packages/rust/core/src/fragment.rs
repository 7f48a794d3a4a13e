//! The fixed-shape enrichment fragment spliced into text-block records.

use std::fmt::Write;

use lakekit_shared::{EnrichmentConfig, FieldNames};

/// Indentation added per nesting level inside the fragment.
const STEP: &str = "  ";

/// Placeholder metadata for one record, parameterized only by its identifier.
#[derive(Debug, Clone)]
pub struct EnrichmentFragment<'a> {
    identifier: &'a str,
    values: &'a EnrichmentConfig,
    fields: &'a FieldNames,
}

impl<'a> EnrichmentFragment<'a> {
    pub fn new(identifier: &'a str, values: &'a EnrichmentConfig, fields: &'a FieldNames) -> Self {
        Self {
            identifier,
            values,
            fields,
        }
    }

    /// `<image_base>/<identifier>-<n>.jpg` for n in `1..=image_count`.
    pub fn image_paths(&self) -> Vec<String> {
        let base = self.values.image_base.trim_end_matches('/');
        (1..=self.values.image_count)
            .map(|n| format!("{base}/{}-{n}.jpg", self.identifier))
            .collect()
    }

    /// Render the fragment as it is inserted after the marker field's value:
    /// a leading comma, then one field per line at `indent`, lines joined by
    /// `newline` (`"\n"` or `"\r\n"`).
    pub fn render(&self, indent: &str, newline: &str) -> String {
        let v = self.values;
        let f = self.fields;
        let i1 = format!("{indent}{STEP}");
        let i2 = format!("{i1}{STEP}");

        let mut out = String::new();
        out.push_str(",\n");

        // Pricing tiers.
        let _ = writeln!(out, "{indent}{}: {{", f.pricing);
        let prices = [
            ("daily", &v.daily),
            ("weekly", &v.weekly),
            ("monthly", &v.monthly),
            ("annual", &v.annual),
            ("youth", &v.youth),
            ("link", &v.link),
        ];
        push_entries(
            &mut out,
            &i1,
            prices.iter().map(|(k, val)| format!("{k}: {}", quote(val))),
        );
        let _ = writeln!(out, "{indent}}},");

        // Regulations.
        let _ = writeln!(out, "{indent}{}: {{", f.regulations);
        let _ = writeln!(out, "{i1}closedSeasons: {},", quote(&v.closed_seasons));
        if v.min_sizes.is_empty() {
            let _ = writeln!(out, "{i1}minSizes: {{}},");
        } else {
            let _ = writeln!(out, "{i1}minSizes: {{");
            push_entries(
                &mut out,
                &i2,
                v.min_sizes
                    .iter()
                    .map(|m| format!("{}: {}", quote(&m.label), quote(&m.size))),
            );
            let _ = writeln!(out, "{i1}}},");
        }
        let _ = writeln!(out, "{i1}bagLimit: {},", quote(&v.bag_limit));
        if v.additional_rules.is_empty() {
            let _ = writeln!(out, "{i1}additionalRules: []");
        } else {
            let _ = writeln!(out, "{i1}additionalRules: [");
            push_entries(&mut out, &i2, v.additional_rules.iter().map(|r| quote(r)));
            let _ = writeln!(out, "{i1}]");
        }
        let _ = writeln!(out, "{indent}}},");

        // Images and identifier.
        let _ = writeln!(out, "{indent}{}: [", f.images);
        push_entries(&mut out, &i1, self.image_paths().iter().map(|p| quote(p)));
        let _ = writeln!(out, "{indent}],");
        let _ = write!(out, "{indent}{}: {}", f.identifier, quote(self.identifier));

        // Quoted values never contain a raw newline, so every '\n' is a break.
        if newline == "\n" {
            out
        } else {
            out.replace('\n', newline)
        }
    }
}

/// Comma-separated lines, no trailing comma after the last one.
fn push_entries(out: &mut String, indent: &str, entries: impl Iterator<Item = String>) {
    let entries: Vec<String> = entries.collect();
    let last = entries.len().saturating_sub(1);
    for (n, entry) in entries.iter().enumerate() {
        let sep = if n == last { "" } else { "," };
        let _ = writeln!(out, "{indent}{entry}{sep}");
    }
}

/// Double-quoted literal with JSON escaping; non-ASCII stays verbatim.
fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}
