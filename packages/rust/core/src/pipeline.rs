//! Pieces shared by both catalog pipelines: per-record reporting and the
//! end-of-run collision check and persist step.

use tracing::{info, warn};

use lakekit_shared::{CatalogRunConfig, RecordOutcome, Result, RunReport};

use crate::{persist, slug};

/// Per-record callback for reporting pipeline status.
pub trait RecordReporter {
    /// Called once per record, in document order, after its status is known.
    fn record(&self, outcome: &RecordOutcome);
    /// Called when the run completes.
    fn done(&self, report: &RunReport);
}

/// No-op reporter for headless/test usage.
pub struct SilentReporter;

impl RecordReporter for SilentReporter {
    fn record(&self, _outcome: &RecordOutcome) {}
    fn done(&self, _report: &RunReport) {}
}

/// Record collisions between distinct names in the report and the log.
pub(crate) fn check_collisions<'a>(
    report: &mut RunReport,
    names: impl IntoIterator<Item = &'a str>,
) {
    report.collisions = slug::find_collisions(names);
    for collision in &report.collisions {
        warn!(
            identifier = %collision.identifier,
            names = ?collision.names,
            "distinct names share an identifier"
        );
    }
}

/// Write the transformed document unless this is a dry run.
///
/// Runs only after every record was processed in memory, so a failed read
/// or decode never reaches this point.
pub(crate) fn finish(
    config: &CatalogRunConfig,
    content: &str,
    report: &mut RunReport,
    reporter: &dyn RecordReporter,
) -> Result<()> {
    if config.dry_run {
        info!(path = %config.output_path.display(), "dry run, document not written");
    } else {
        persist::write_document(&config.output_path, content)?;
        report.written = true;
    }

    info!(
        updated = report.updated(),
        already_enriched = report.already_enriched(),
        ineligible = report.ineligible(),
        written = report.written,
        "run complete"
    );
    reporter.done(report);
    Ok(())
}
