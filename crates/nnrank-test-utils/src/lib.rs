//! Shared fixtures for NNRank tests: literal scorer reports and ligand directories.

use std::fs;
use std::path::{Path, PathBuf};

use nnrank_common::ScoreRecord;
use tempfile::TempDir;

pub use pretty_assertions;

/// Report preamble printed by NNScore 2.0 before the score tables.
const PREAMBLE: &str = "\
NNScore 2.0
===========

Use the -help command-line parameter for extended help.

Command: NNScore2.py -receptor receptor.pdbqt -ligand ligand.pdbqt -vina_executable vina

    Docking the ligand with AutoDock Vina...

 When the poses were ranked by the best of the 20 network scores
 associated with each pose, the best-scoring pose was MODEL 1
 (Score = 6.120 = 757.9 nM)
";

/// A report with one consensus data line `1 | 1 | <score> | <deviation> | <kd>`.
///
/// `kd` is written as the scorer writes it, value and unit separated by a
/// space (e.g. `"2.23 uM"`).
pub fn nnscore_report(score: &str, deviation: &str, kd: &str) -> String {
    format!(
        "{PREAMBLE}
 AVERAGE SCORE OF ALL 20 NETWORKS, BY POSE
  Rank | Pose | Average Score | Standard Deviation | Predicted Kd
 ------+------+---------------+--------------------+-------------
     1 |    1 | {score:>13} | {deviation:>18} | {kd}
     2 |    3 |         4.210 |              1.904 | 61.66 uM

 When the poses were ranked by the score of the best network
"
    )
}

/// A report for a scorer run that never reached the consensus section.
pub fn report_without_marker() -> String {
    format!("{PREAMBLE}\nERROR: Vina docking failed, no poses to score.\n")
}

/// Record a report built by [`nnscore_report`] is expected to yield.
pub fn expected_record(ligand_id: &str, score: f64, deviation: f64, value: f64, unit: &str) -> ScoreRecord {
    ScoreRecord::new(ligand_id, score, deviation, value, unit)
}

/// Shorthand for building ranked-table fixtures.
pub fn record(ligand_id: &str, score: f64) -> ScoreRecord {
    ScoreRecord::new(ligand_id, score, 0.5, 1.0, "uM")
}

/// Create a temporary ligand directory holding one `<id>.pdbqt` per id.
pub fn ligand_dir(ids: &[&str]) -> anyhow::Result<TempDir> {
    let dir = tempfile::tempdir()?;
    for id in ids {
        write_ligand(dir.path(), id)?;
    }
    Ok(dir)
}

/// Write a minimal PDBQT ligand file and return its path.
pub fn write_ligand(dir: &Path, ligand_id: &str) -> anyhow::Result<PathBuf> {
    let path = dir.join(format!("{ligand_id}.pdbqt"));
    fs::write(
        &path,
        format!(
            "REMARK  Name = {ligand_id}\n\
             ROOT\n\
             ATOM      1  C   UNL     1       0.000   0.000   0.000  0.00  0.00    +0.000 C \n\
             ENDROOT\n\
             TORSDOF 0\n"
        ),
    )?;
    Ok(path)
}
