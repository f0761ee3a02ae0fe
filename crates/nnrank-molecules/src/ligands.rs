//! Discovery of ligand candidate files.

use std::collections::HashSet;
use std::path::Path;

use nnrank_common::{LigandFile, NnrankError, Result};
use tokio::fs;
use tracing::{debug, warn};

pub const LIGAND_EXTENSION: &str = "pdbqt";

/// List every `*.pdbqt` file directly inside `dir`, sorted by path.
pub async fn discover_ligands(dir: &Path) -> Result<Vec<LigandFile>> {
    let meta = fs::metadata(dir).await?;
    if !meta.is_dir() {
        return Err(NnrankError::Config(format!("ligands_dir {:?} is not a directory", dir)));
    }

    let mut ligands = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !has_ligand_extension(&path) || !entry.file_type().await?.is_file() {
            continue;
        }

        match LigandFile::from_path(&path) {
            Some(ligand) => ligands.push(ligand),
            None => warn!("Skipping {:?}: file name is not a usable ligand id", path),
        }
    }

    ligands.sort_by(|a, b| a.path.cmp(&b.path));
    debug!("Found {} ligand files in {:?}", ligands.len(), dir);
    Ok(ligands)
}

pub fn has_ligand_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(LIGAND_EXTENSION))
        .unwrap_or(false)
}

/// Fail on the first id shared by two ligand files (e.g. `a.pdbqt` and `a.PDBQT`).
pub fn ensure_unique_ids(ligands: &[LigandFile]) -> Result<()> {
    let mut seen = HashSet::new();
    for ligand in ligands {
        if !seen.insert(ligand.ligand_id.as_str()) {
            return Err(NnrankError::DuplicateLigandId(ligand.ligand_id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nnrank_test_utils::{ligand_dir, write_ligand};

    #[tokio::test]
    async fn test_discovers_pdbqt_only_sorted() {
        let dir = ligand_dir(&["zeta", "alpha", "mid"]).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        std::fs::create_dir(dir.path().join("nested.pdbqt")).unwrap();

        let ligands = discover_ligands(dir.path()).await.unwrap();
        let ids: Vec<&str> = ligands.iter().map(|l| l.ligand_id.as_str()).collect();
        assert_eq!(ids, ["alpha", "mid", "zeta"]);
    }

    #[tokio::test]
    async fn test_extension_is_case_insensitive() {
        let dir = ligand_dir(&["a"]).unwrap();
        std::fs::write(dir.path().join("B.PDBQT"), "x").unwrap();

        let ligands = discover_ligands(dir.path()).await.unwrap();
        assert_eq!(ligands.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_ligands(&dir.path().join("absent")).await.is_err());
    }

    #[tokio::test]
    async fn test_file_instead_of_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_ligand(dir.path(), "x").unwrap();
        assert!(matches!(discover_ligands(&file).await, Err(NnrankError::Config(_))));
    }

    #[test]
    fn test_duplicate_ids_detected() {
        let ligands = vec![
            LigandFile::new("a", "/l/a.pdbqt"),
            LigandFile::new("a", "/l/a.PDBQT"),
        ];
        assert!(matches!(ensure_unique_ids(&ligands), Err(NnrankError::DuplicateLigandId(_))));
        assert!(ensure_unique_ids(&ligands[..1]).is_ok());
    }
}
