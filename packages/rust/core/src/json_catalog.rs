//! Record-sequence pipeline: give every entry of a JSON array an identifier.
//!
//! Object key order is preserved (`serde_json` with `preserve_order`), so the
//! only visible change per updated entry is the identifier field.

use serde_json::Value;
use tracing::{debug, info, instrument};

use lakekit_shared::{
    CatalogRunConfig, FieldNames, IneligibleReason, LakeKitError, RecordOutcome, RecordStatus,
    Result, RunReport,
};

use crate::pipeline::{self, RecordReporter};
use crate::{persist, slug};

/// Assign missing identifiers in the document at `config.input_path`.
#[instrument(skip_all, fields(input = %config.input_path.display(), dry_run = config.dry_run))]
pub fn run(
    config: &CatalogRunConfig,
    fields: &FieldNames,
    reporter: &dyn RecordReporter,
) -> Result<RunReport> {
    let content = persist::read_document(&config.input_path)?;
    let (encoded, mut report) = assign_ids(&content, fields, reporter)?;
    pipeline::finish(config, &encoded, &mut report, reporter)?;
    Ok(report)
}

/// Decode, assign identifiers, re-encode.
///
/// An identifier is assigned when the field is absent or blank (see
/// [`is_blank`]). Any other value is kept as is. Number text is preserved
/// exactly (`serde_json` with `arbitrary_precision`). The output is pretty-printed with two-space
/// indentation and keeps a trailing newline only if the input had one.
pub fn assign_ids(
    doc: &str,
    fields: &FieldNames,
    reporter: &dyn RecordReporter,
) -> Result<(String, RunReport)> {
    let mut root: Value = serde_json::from_str(doc)
        .map_err(|e| LakeKitError::decode(format!("invalid catalog JSON: {e}")))?;

    let entries = root
        .as_array_mut()
        .ok_or_else(|| LakeKitError::decode("catalog root must be an array of records"))?;
    info!(records = entries.len(), "decoded catalog");

    let mut report = RunReport::default();
    let mut names: Vec<String> = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter_mut().enumerate() {
        let outcome = assign_one(entry, fields);
        if outcome.status != RecordStatus::SkippedIneligible(IneligibleReason::MissingName) {
            names.push(outcome.name.clone());
        }
        debug!(index, name = %outcome.name, status = %outcome.status, "processed entry");
        reporter.record(&outcome);
        report.outcomes.push(outcome);
    }

    pipeline::check_collisions(&mut report, names.iter().map(String::as_str));

    let mut encoded = serde_json::to_string_pretty(&root)
        .map_err(|e| LakeKitError::decode(format!("failed to encode catalog: {e}")))?;
    if doc.ends_with('\n') {
        encoded.push('\n');
    }
    Ok((encoded, report))
}

fn assign_one(entry: &mut Value, fields: &FieldNames) -> RecordOutcome {
    let Some(object) = entry.as_object_mut() else {
        return ineligible(String::new());
    };
    let Some(name) = object
        .get(&fields.name)
        .and_then(Value::as_str)
        .map(str::to_string)
    else {
        return ineligible(String::new());
    };

    match object.get(&fields.identifier) {
        None => {}
        Some(existing) if is_blank(existing) => {}
        Some(existing) => {
            let identifier = existing
                .as_str()
                .map_or_else(|| existing.to_string(), str::to_string);
            return RecordOutcome {
                name,
                identifier: Some(identifier),
                status: RecordStatus::SkippedAlreadyEnriched,
            };
        }
    }

    let identifier = slug::normalize(&name);
    // Replaces an empty value in place; a missing key is appended last.
    object.insert(fields.identifier.clone(), Value::String(identifier.clone()));
    RecordOutcome {
        name,
        identifier: Some(identifier),
        status: RecordStatus::Updated,
    }
}

/// Values that count as "no identifier yet": `null`, `false`, zero, and
/// empty strings, arrays or objects.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn ineligible(name: String) -> RecordOutcome {
    RecordOutcome {
        name,
        identifier: None,
        status: RecordStatus::SkippedIneligible(IneligibleReason::MissingName),
    }
}
