//! Core domain entities shared between the ranking core and its collaborators.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One ligand's consensus score, as extracted from a scorer report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub ligand_id: String,
    /// Primary ranking key; larger is better.
    pub score: f64,
    /// Informational only, never used for ordering.
    pub deviation: f64,
    pub affinity_value: f64,
    pub affinity_unit: String,
}

impl ScoreRecord {
    pub fn new(
        ligand_id: impl Into<String>,
        score: f64,
        deviation: f64,
        affinity_value: f64,
        affinity_unit: impl Into<String>,
    ) -> Self {
        Self {
            ligand_id: ligand_id.into(),
            score,
            deviation,
            affinity_value,
            affinity_unit: affinity_unit.into(),
        }
    }
}

/// A ligand candidate on disk together with its explicit identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LigandFile {
    pub ligand_id: String,
    pub path: PathBuf,
}

impl LigandFile {
    pub fn new(ligand_id: impl Into<String>, path: impl AsRef<Path>) -> Self {
        Self {
            ligand_id: ligand_id.into(),
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Derive the identifier from the file stem (`ZINC001.pdbqt` -> `ZINC001`).
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let stem = path.file_stem()?.to_str()?;
        if stem.is_empty() {
            return None;
        }
        Some(Self::new(stem, path))
    }
}

/// Captured standard output of one scorer invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorerReport {
    pub ligand_id: String,
    pub text: String,
}

impl ScorerReport {
    pub fn new(ligand_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            ligand_id: ligand_id.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ligand_id_from_stem() {
        let lig = LigandFile::from_path("/data/ligands/ZINC000123.pdbqt").unwrap();
        assert_eq!(lig.ligand_id, "ZINC000123");
        assert_eq!(lig.path, PathBuf::from("/data/ligands/ZINC000123.pdbqt"));
    }

    #[test]
    fn test_ligand_id_keeps_inner_dots() {
        let lig = LigandFile::from_path("mol.conf1.pdbqt").unwrap();
        assert_eq!(lig.ligand_id, "mol.conf1");
    }

    #[test]
    fn test_no_stem_yields_none() {
        assert!(LigandFile::from_path("/").is_none());
    }
}
