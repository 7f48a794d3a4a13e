//! Canonical, URL-safe identifiers derived from record names.
//!
//! Every call site that needs an identifier goes through [`normalize`], so the
//! text-block and record-sequence catalogs always agree on a record's id.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use lakekit_shared::IdCollision;

/// Accented characters folded to ASCII, applied after lower-casing.
const FOLDS: &[(char, &str)] = &[
    ('ä', "ae"),
    ('ö', "oe"),
    ('ü', "ue"),
    ('ß', "ss"),
    ('à', "a"),
    ('á', "a"),
    ('â', "a"),
    ('è', "e"),
    ('é', "e"),
    ('ê', "e"),
    ('ë', "e"),
    ('ì', "i"),
    ('í', "i"),
    ('î', "i"),
    ('ï', "i"),
    ('ò', "o"),
    ('ó', "o"),
    ('ô', "o"),
    ('ù', "u"),
    ('ú', "u"),
    ('û', "u"),
    ('ç', "c"),
    ('ñ', "n"),
];

/// Derive the identifier for a record name.
///
/// Lower-cases, folds accents, collapses every run of characters outside
/// `[a-z0-9]` into one `-` and trims leading/trailing dashes. Total and
/// deterministic; the result is empty only if the name has no foldable
/// alphanumerics at all.
pub fn normalize(name: &str) -> String {
    static NON_ALNUM_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

    let mut folded = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        match FOLDS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => folded.push_str(to),
            None => folded.push(c),
        }
    }

    NON_ALNUM_RE
        .replace_all(&folded, "-")
        .trim_matches('-')
        .to_string()
}

/// Whether `s` is already in canonical identifier form.
pub fn is_canonical(s: &str) -> bool {
    static CANONICAL_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid regex"));

    CANONICAL_RE.is_match(s)
}

/// Group distinct names that normalize to the same identifier.
///
/// Repeated occurrences of the same name are not collisions. Result is
/// ordered by identifier; names keep their input order.
pub fn find_collisions<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<IdCollision> {
    let mut by_id: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for name in names {
        let entry = by_id.entry(normalize(name)).or_default();
        if !entry.iter().any(|n| n == name) {
            entry.push(name.to_string());
        }
    }

    by_id
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(identifier, names)| IdCollision { identifier, names })
        .collect()
}
