//! Core domain types shared by both catalog pipelines.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RecordStatus
// ---------------------------------------------------------------------------

/// Why a record was not eligible for enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IneligibleReason {
    /// The record has no marker field.
    MissingMarker,
    /// The marker field is present but not directly followed by the record's
    /// closing delimiter, so there is no place to splice.
    AnchorNotFound,
    /// A record-sequence entry without a string `name`.
    MissingName,
}

impl std::fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::MissingMarker => "missing-marker",
            Self::AnchorNotFound => "anchor-not-found",
            Self::MissingName => "missing-name",
        };
        f.write_str(s)
    }
}

/// Outcome of processing one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "status", content = "reason")]
pub enum RecordStatus {
    /// New fields were merged into the record.
    Updated,
    /// The record already carried the data; left untouched.
    SkippedAlreadyEnriched,
    /// The record is not a valid enrichment target; left untouched.
    SkippedIneligible(IneligibleReason),
}

impl RecordStatus {
    /// Whether the record's text changed.
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated)
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Updated => f.write_str("updated"),
            Self::SkippedAlreadyEnriched => f.write_str("skipped-already-enriched"),
            Self::SkippedIneligible(reason) => write!(f, "skipped-ineligible ({reason})"),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordOutcome / RunReport
// ---------------------------------------------------------------------------

/// Per-record line of a run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOutcome {
    /// Human-readable record name (empty when the record had none).
    pub name: String,
    /// Identifier derived from the name, or the one already present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// What happened to the record.
    pub status: RecordStatus,
}

/// Two or more distinct names that normalize to the same identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCollision {
    /// The shared identifier.
    pub identifier: String,
    /// Every name mapping to it, in document order.
    pub names: Vec<String>,
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// One entry per processed record, in document order.
    pub outcomes: Vec<RecordOutcome>,
    /// Identifier collisions detected across the catalog.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collisions: Vec<IdCollision>,
    /// Whether the document was written back to disk.
    pub written: bool,
}

impl RunReport {
    /// Number of records with exactly the given status.
    pub fn count(&self, status: RecordStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Number of records that were updated.
    pub fn updated(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_updated()).count()
    }

    /// Number of records skipped as already enriched.
    pub fn already_enriched(&self) -> usize {
        self.count(RecordStatus::SkippedAlreadyEnriched)
    }

    /// Number of records skipped as ineligible, whatever the reason.
    pub fn ineligible(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, RecordStatus::SkippedIneligible(_)))
            .count()
    }

    /// Outcome for a record name, if it was processed.
    pub fn outcome(&self, name: &str) -> Option<&RecordOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }
}
