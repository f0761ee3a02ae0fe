//! Collection of per-ligand records into one results table.

use std::collections::HashSet;
use std::ops::Deref;

use nnrank_common::{MalformedPolicy, NnrankError, Result, ScoreRecord, ScorerReport};
use tracing::{error, info, warn};

use crate::extract::ReportExtractor;

/// Unranked table of score records in aggregation order.
///
/// Ligand ids are unique and scores finite; both are checked on insert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    records: Vec<ScoreRecord>,
    ids: HashSet<String>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from literal records, keeping their order.
    pub fn from_records(records: impl IntoIterator<Item = ScoreRecord>) -> Result<Self> {
        let mut table = Self::new();
        for record in records {
            table.push(record)?;
        }
        Ok(table)
    }

    pub fn push(&mut self, record: ScoreRecord) -> Result<()> {
        if !record.score.is_finite() {
            return Err(NnrankError::malformed(
                &record.ligand_id,
                format!("score {} is not finite", record.score),
            ));
        }
        if !self.ids.insert(record.ligand_id.clone()) {
            return Err(NnrankError::DuplicateLigandId(record.ligand_id));
        }
        self.records.push(record);
        Ok(())
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ScoreRecord> {
        self.records
    }
}

impl Deref for ResultTable {
    type Target = [ScoreRecord];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

/// A report that reached the marker but could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedReport {
    pub ligand_id: String,
    pub reason: String,
}

/// Outcome of aggregating one run's reports.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub table: ResultTable,
    /// Ligands whose report had no consensus section.
    pub missing: Vec<String>,
    /// Ligands dropped under [`MalformedPolicy::Skip`].
    pub malformed: Vec<SkippedReport>,
}

impl Aggregation {
    pub fn reports_seen(&self) -> usize {
        self.table.len() + self.missing.len() + self.malformed.len()
    }
}

/// Extract every report and collect the records in input order.
///
/// Two reports with the same ligand id fail with `DuplicateLigandId`, whether
/// or not either of them produced a record. Malformed reports are skipped or
/// abort the run according to `policy`.
pub fn aggregate<I>(reports: I, extractor: &ReportExtractor, policy: MalformedPolicy) -> Result<Aggregation>
where
    I: IntoIterator<Item = ScorerReport>,
{
    let mut seen = HashSet::new();
    let mut out = Aggregation::default();

    for report in reports {
        if !seen.insert(report.ligand_id.clone()) {
            error!("Two scorer reports resolve to ligand id {}", report.ligand_id);
            return Err(NnrankError::DuplicateLigandId(report.ligand_id));
        }

        match extractor.extract(&report.ligand_id, &report.text) {
            Ok(Some(record)) => out.table.push(record)?,
            Ok(None) => {
                warn!("No score for ligand {} (report has no consensus section)", report.ligand_id);
                out.missing.push(report.ligand_id);
            }
            Err(NnrankError::ReportMalformed { ligand_id, reason }) => match policy {
                MalformedPolicy::Skip => {
                    warn!("Skipping ligand {}: {}", ligand_id, reason);
                    out.malformed.push(SkippedReport { ligand_id, reason });
                }
                MalformedPolicy::Abort => {
                    error!("Aborting run on malformed report for {}: {}", ligand_id, reason);
                    return Err(NnrankError::ReportMalformed { ligand_id, reason });
                }
            },
            Err(e) => return Err(e),
        }
    }

    info!(
        "Aggregated {} reports: {} scored, {} without score, {} malformed",
        out.reports_seen(),
        out.table.len(),
        out.missing.len(),
        out.malformed.len()
    );
    Ok(out)
}
