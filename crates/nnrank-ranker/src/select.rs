//! Top-N selection and copying of the selected ligand files.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use nnrank_common::{LigandFile, NnrankError, Result, ScoreRecord};
use tracing::{debug, info, warn};

use crate::rank::RankedTable;

/// The first `min(N, len)` rows of a ranked table and their ligand ids.
///
/// The id set is derived from `rows` at construction and never set
/// independently, so the best-results table and the copied files agree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopNSelection {
    rows: Vec<ScoreRecord>,
    ids: BTreeSet<String>,
}

impl TopNSelection {
    pub fn from_ranked(ranked: &RankedTable, n: usize) -> Self {
        let rows: Vec<ScoreRecord> = ranked.iter().take(n).cloned().collect();
        let ids = rows.iter().map(|r| r.ligand_id.clone()).collect();
        Self { rows, ids }
    }

    pub fn rows(&self) -> &[ScoreRecord] {
        &self.rows
    }

    pub fn ligand_ids(&self) -> &BTreeSet<String> {
        &self.ids
    }

    pub fn contains(&self, ligand_id: &str) -> bool {
        self.ids.contains(ligand_id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Per-file outcome of [`sync_best_files`].
#[derive(Debug, Default)]
pub struct CopyReport {
    /// Ligand ids copied, in ligand-file order.
    pub copied: Vec<String>,
    /// One `NnrankError::FileCopy` per ligand that could not be copied.
    pub failures: Vec<NnrankError>,
}

impl CopyReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Copy the file of every selected ligand into `target_dir` as `<ligand_id>.pdbqt`.
///
/// The target directory must already exist and `ligands` must not repeat an
/// id; both are checked before anything is copied. Individual copy failures,
/// including selected ligands with no file at all, are collected in the
/// report instead of aborting.
pub fn sync_best_files(
    selection: &TopNSelection,
    ligands: &[LigandFile],
    target_dir: &Path,
) -> Result<CopyReport> {
    if !target_dir.is_dir() {
        return Err(NnrankError::MissingTargetDir(target_dir.to_path_buf()));
    }

    let mut seen = HashSet::new();
    for ligand in ligands {
        if !seen.insert(ligand.ligand_id.as_str()) {
            return Err(NnrankError::DuplicateLigandId(ligand.ligand_id.clone()));
        }
    }

    let mut report = CopyReport::default();
    for ligand in ligands.iter().filter(|l| selection.contains(&l.ligand_id)) {
        let dest = best_file_path(target_dir, &ligand.ligand_id);
        match fs::copy(&ligand.path, &dest) {
            Ok(_) => {
                debug!("Copied {:?} -> {:?}", ligand.path, dest);
                report.copied.push(ligand.ligand_id.clone());
            }
            Err(source) => {
                warn!("Failed to copy ligand {} from {:?}: {}", ligand.ligand_id, ligand.path, source);
                report.failures.push(NnrankError::FileCopy {
                    ligand_id: ligand.ligand_id.clone(),
                    path: ligand.path.clone(),
                    source,
                });
            }
        }
    }

    for id in selection.ligand_ids().iter().filter(|id| !seen.contains(id.as_str())) {
        warn!("Selected ligand {} has no source file", id);
        report.failures.push(NnrankError::FileCopy {
            ligand_id: id.clone(),
            path: PathBuf::from(format!("{id}.pdbqt")),
            source: io::Error::new(io::ErrorKind::NotFound, "no ligand file with this id"),
        });
    }

    info!(
        "Copied {} of {} selected ligands to {:?}",
        report.copied.len(),
        selection.len(),
        target_dir
    );
    Ok(report)
}

/// Destination of a selected ligand inside the best-output directory.
pub fn best_file_path(target_dir: &Path, ligand_id: &str) -> PathBuf {
    target_dir.join(format!("{ligand_id}.pdbqt"))
}
