//! Text-block pipeline: merge placeholder enrichment into every eligible
//! record of a hand-maintained source file.
//!
//! Flow per record: locate → guard → derive identifier → splice. Spans are
//! re-located for every record because earlier splices shift offsets. The
//! file is written once, after all records were processed in memory.

use tracing::{info, instrument, warn};

use lakekit_shared::{
    CatalogRunConfig, EnrichmentConfig, FieldNames, IneligibleReason, RecordOutcome,
    RecordStatus, Result, RunReport,
};

use crate::fragment::EnrichmentFragment;
use crate::locate::{self, RecordPatterns};
use crate::pipeline::{self, RecordReporter};
use crate::{guard, persist, slug, splice};

/// Enrich the text-block document at `config.input_path`.
#[instrument(skip_all, fields(input = %config.input_path.display(), dry_run = config.dry_run))]
pub fn run(
    config: &CatalogRunConfig,
    fields: &FieldNames,
    values: &EnrichmentConfig,
    reporter: &dyn RecordReporter,
) -> Result<RunReport> {
    let content = persist::read_document(&config.input_path)?;
    let (enriched, mut report) = enrich_document(&content, fields, values, reporter)?;
    pipeline::finish(config, &enriched, &mut report, reporter)?;
    Ok(report)
}

/// Enrich a document held in memory. Returns the new text and the report.
///
/// Text outside the spans of updated records is returned byte-for-byte.
pub fn enrich_document(
    doc: &str,
    fields: &FieldNames,
    values: &EnrichmentConfig,
    reporter: &dyn RecordReporter,
) -> Result<(String, RunReport)> {
    let patterns = RecordPatterns::new(fields)?;

    let mut names: Vec<String> = Vec::new();
    for header in locate::discover_records(doc, &patterns) {
        if names.contains(&header.name) {
            warn!(name = %header.name, offset = header.start, "duplicate record name, only the first is processed");
        } else {
            names.push(header.name);
        }
    }
    info!(records = names.len(), "discovered records");

    let mut doc = doc.to_string();
    let mut report = RunReport::default();

    for name in &names {
        let Some(span) = locate::locate_record(&doc, name, &patterns)? else {
            warn!(name = %name, "record disappeared while processing");
            continue;
        };

        let identifier = slug::normalize(name);
        let text = span.text(&doc);

        let status = if !patterns.has_marker(text) {
            RecordStatus::SkippedIneligible(IneligibleReason::MissingMarker)
        } else if guard::already_enriched(text, fields) {
            RecordStatus::SkippedAlreadyEnriched
        } else {
            let fragment = EnrichmentFragment::new(&identifier, values, fields);
            match splice::splice(text, &fragment, &patterns) {
                Some(updated) => {
                    doc.replace_range(span.range(), &updated);
                    RecordStatus::Updated
                }
                None => {
                    warn!(name = %name, "marker not followed by closing brace, record left unchanged");
                    RecordStatus::SkippedIneligible(IneligibleReason::AnchorNotFound)
                }
            }
        };

        let outcome = RecordOutcome {
            name: name.clone(),
            identifier: Some(identifier),
            status,
        };
        tracing::debug!(name = %name, %status, "processed record");
        reporter.record(&outcome);
        report.outcomes.push(outcome);
    }

    pipeline::check_collisions(&mut report, names.iter().map(String::as_str));
    Ok((doc, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SilentReporter;
    use lakekit_shared::LakeKitError;
    use std::path::PathBuf;

    const ENRICHED_LEMAN: &str = r#"    {
      name: "Lac Léman",
      coords: [46.4528, 6.5395],
      cantons: "Genf, Waadt, Wallis",
      permitRequired: "SaNa + Kantonales Patent (GE/VD/VS) erforderlich",
      permitPrices: {
        daily: "CHF 30.00",
        link: "https://www.vd.ch/"
      },
      id: "lac-leman"
    }"#;

    const ZURICH: &str = r#"    {
      name: "Zürichsee",
      coords: [47.2600, 8.6500],
      fishSpecies: ["Felchen", "Hecht", "Seeforelle"],
      freeFishing: false,
      permitRequired: "Kantonales Patent ZH/SZ/SG erforderlich"
    }"#;

    fn catalog() -> String {
        format!(
            "export const LAKES: Lake[] = [\n{ZURICH},\n{ENRICHED_LEMAN}\n];\n// trailing comment {{ not a record }}\n"
        )
    }

    fn enrich(doc: &str) -> (String, RunReport) {
        enrich_document(
            doc,
            &FieldNames::default(),
            &EnrichmentConfig::default(),
            &SilentReporter,
        )
        .unwrap()
    }

    #[test]
    fn end_to_end_two_records() {
        let input = catalog();
        let (output, report) = enrich(&input);

        assert_eq!(
            report.outcome("Zürichsee").unwrap().status,
            RecordStatus::Updated
        );
        assert_eq!(
            report.outcome("Zürichsee").unwrap().identifier.as_deref(),
            Some("zuerichsee")
        );
        assert_eq!(
            report.outcome("Lac Léman").unwrap().status,
            RecordStatus::SkippedAlreadyEnriched
        );

        assert!(output.contains("      id: \"zuerichsee\"\n    }"));
        for n in 1..=3 {
            assert!(output.contains(&format!("\"/assets/lakes/zuerichsee-{n}.jpg\"")));
        }
        // Already-enriched record is byte-identical.
        assert!(output.contains(ENRICHED_LEMAN));
        // Everything before the splice point and after the record is untouched.
        let marker_end = input.find("erforderlich\"\n    }").unwrap() + "erforderlich\"".len();
        assert_eq!(&output[..marker_end], &input[..marker_end]);
        assert!(output.ends_with(&input[marker_end..]));
    }

    #[test]
    fn second_run_is_identity() {
        let (once, _) = enrich(&catalog());
        let (twice, report) = enrich(&once);

        assert_eq!(once, twice);
        assert_eq!(report.updated(), 0);
        assert_eq!(report.already_enriched(), 2);
        assert_eq!(twice.matches("permitPrices").count(), 2);
    }

    #[test]
    fn record_order_is_preserved() {
        let (output, report) = enrich(&catalog());
        let z = output.find("name: \"Zürichsee\"").unwrap();
        let l = output.find("name: \"Lac Léman\"").unwrap();
        assert!(z < l);

        let order: Vec<_> = report.outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(order, vec!["Zürichsee", "Lac Léman"]);
    }

    #[test]
    fn ineligible_records_untouched() {
        let doc = r#"[
  {
    name: "Sihlsee",
    freeFishing: true
  },
  {
    name: "Greifensee",
    permitRequired: "Kantonales Patent ZH",
    bestSeason: "Mai - Oktober"
  },
  {
    name: "Türlersee",
    permitRequired: "Kantonales Patent ZH"
  }
]"#;
        let (output, report) = enrich(doc);

        assert_eq!(
            report.outcome("Sihlsee").unwrap().status,
            RecordStatus::SkippedIneligible(IneligibleReason::MissingMarker)
        );
        assert_eq!(
            report.outcome("Greifensee").unwrap().status,
            RecordStatus::SkippedIneligible(IneligibleReason::AnchorNotFound)
        );
        assert_eq!(report.updated(), 1);
        assert!(output.starts_with(&doc[..doc.find("name: \"Türlersee\"").unwrap()]));
        assert!(output.contains("id: \"tuerlersee\""));
    }

    #[test]
    fn growing_records_shift_later_spans() {
        let doc = "[\n  {\n    name: \"Ägerisee\",\n    permitRequired: \"ZG\"\n  },\n  {\n    name: \"Zugersee\",\n    permitRequired: \"ZG\"\n  }\n]\n";
        let (output, report) = enrich(doc);
        assert_eq!(report.updated(), 2);
        assert!(output.contains("id: \"aegerisee\"\n  },\n  {\n    name: \"Zugersee\""));
        assert!(output.ends_with("id: \"zugersee\"\n  }\n]\n"));
    }

    #[test]
    fn duplicate_names_processed_once() {
        let doc = "[\n  {\n    name: \"Thunersee\",\n    permitRequired: \"BE\"\n  },\n  {\n    name: \"Thunersee\",\n    permitRequired: \"BE\"\n  }\n]";
        let (output, report) = enrich(doc);
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(output.matches("permitPrices").count(), 1);
    }

    #[test]
    fn reports_identifier_collisions() {
        let doc = "[\n  {\n    name: \"Lac Léman\",\n    permitRequired: \"VD\"\n  },\n  {\n    name: \"Lac Leman\",\n    permitRequired: \"GE\"\n  }\n]";
        let (_, report) = enrich(doc);
        assert_eq!(report.collisions.len(), 1);
        assert_eq!(report.collisions[0].identifier, "lac-leman");
    }

    #[test]
    fn layout_violation_is_fatal() {
        let doc = "[\n  {\n    name: \"Walensee\",\n    permitRequired: \"SG\"\n";
        let err = enrich_document(
            doc,
            &FieldNames::default(),
            &EnrichmentConfig::default(),
            &SilentReporter,
        )
        .unwrap_err();
        assert!(matches!(err, LakeKitError::Layout { .. }));
    }

    #[test]
    fn custom_schema_uses_configured_keys() {
        let fields = FieldNames {
            marker: "requiredPermit".into(),
            pricing: "pricing".into(),
            identifier: "identifier".into(),
            ..FieldNames::default()
        };
        let doc = "[\n  {\n    name: \"Zürichsee\",\n    requiredPermit: \"ZH\"\n  }\n]";
        let (output, report) =
            enrich_document(doc, &fields, &EnrichmentConfig::default(), &SilentReporter).unwrap();
        assert_eq!(report.updated(), 1);
        assert!(output.contains("    pricing: {\n"));
        assert!(output.contains("    identifier: \"zuerichsee\"\n  }"));
    }

    // -----------------------------------------------------------------------
    // File-level runs
    // -----------------------------------------------------------------------

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "lakekit-text-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn run_writes_output_path() {
        let tmp = temp_dir();
        let input = tmp.join("lake.service.ts");
        let output = tmp.join("lake.service.enriched.ts");
        std::fs::write(&input, catalog()).unwrap();

        let config = CatalogRunConfig {
            input_path: input.clone(),
            output_path: output.clone(),
            dry_run: false,
        };
        let report = run(
            &config,
            &FieldNames::default(),
            &EnrichmentConfig::default(),
            &SilentReporter,
        )
        .unwrap();

        assert!(report.written);
        assert_eq!(std::fs::read_to_string(&input).unwrap(), catalog());
        assert!(std::fs::read_to_string(&output).unwrap().contains("id: \"zuerichsee\""));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn dry_run_leaves_file_untouched() {
        let tmp = temp_dir();
        let path = tmp.join("lake.service.ts");
        std::fs::write(&path, catalog()).unwrap();

        let config = CatalogRunConfig {
            input_path: path.clone(),
            output_path: path.clone(),
            dry_run: true,
        };
        let report = run(
            &config,
            &FieldNames::default(),
            &EnrichmentConfig::default(),
            &SilentReporter,
        )
        .unwrap();

        assert!(!report.written);
        assert_eq!(report.updated(), 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), catalog());

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
