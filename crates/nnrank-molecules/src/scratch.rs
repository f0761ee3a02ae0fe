//! Scoped holding area for raw scorer reports.

use std::path::{Path, PathBuf};

use nnrank_common::{LigandFile, Result, ScorerReport};
use tempfile::TempDir;
use tokio::fs;
use tracing::debug;

/// Temporary directory owning one `<ligand_id>.txt` report per ligand.
///
/// The directory and its contents are removed when the area is dropped, on
/// success and on every error path alike.
#[derive(Debug)]
pub struct ScratchArea {
    dir: TempDir,
}

impl ScratchArea {
    /// Create a fresh area inside `parent`, or the system temp dir when `None`.
    pub fn new(parent: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("nnrank-reports-");
        let dir = match parent {
            Some(p) => builder.tempdir_in(p)?,
            None => builder.tempdir()?,
        };
        debug!("Scratch area at {:?}", dir.path());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn report_path(&self, ligand_id: &str) -> PathBuf {
        self.dir.path().join(format!("{ligand_id}.txt"))
    }

    pub async fn store(&self, ligand_id: &str, text: &str) -> Result<PathBuf> {
        let path = self.report_path(ligand_id);
        fs::write(&path, text).await?;
        Ok(path)
    }

    /// Read back the report of every ligand, in the order given.
    pub async fn collect_reports(&self, ligands: &[LigandFile]) -> Result<Vec<ScorerReport>> {
        let mut reports = Vec::with_capacity(ligands.len());
        for ligand in ligands {
            let bytes = fs::read(self.report_path(&ligand.ligand_id)).await?;
            let text = String::from_utf8_lossy(&bytes).into_owned();
            reports.push(ScorerReport::new(ligand.ligand_id.clone(), text));
        }
        Ok(reports)
    }

    /// Remove the area now, surfacing removal errors that a drop would swallow.
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close()?;
        debug!("Removed scratch area {:?}", path);
        Ok(())
    }
}
