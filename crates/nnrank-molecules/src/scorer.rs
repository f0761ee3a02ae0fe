//! Ligand scoring using NNScore 2.0.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use futures_util::stream::{self, StreamExt, TryStreamExt};
use nnrank_common::{LigandFile, NnrankError, Result};
use nnrank_config::ScorerConfig;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::scratch::ScratchArea;

/// Wrapper for NNScore 2.0 execution against a fixed receptor.
#[derive(Debug, Clone)]
pub struct NnScoreRunner {
    interpreter: String,
    script: PathBuf,
    receptor: PathBuf,
    vina_executable: PathBuf,
    timeout: Option<Duration>,
}

impl NnScoreRunner {
    /// Create a new NnScoreRunner.
    pub fn new<P: AsRef<Path>>(interpreter: &str, script: P, receptor: P, vina_executable: P) -> Self {
        Self {
            interpreter: interpreter.to_string(),
            script: script.as_ref().to_path_buf(),
            receptor: receptor.as_ref().to_path_buf(),
            vina_executable: vina_executable.as_ref().to_path_buf(),
            timeout: None,
        }
    }

    pub fn from_config(config: &ScorerConfig) -> Result<Self> {
        let receptor = config
            .receptor
            .as_deref()
            .ok_or_else(|| NnrankError::Config("scorer.receptor is not set".into()))?;
        let vina = config
            .vina_executable
            .as_deref()
            .ok_or_else(|| NnrankError::Config("scorer.vina_executable is not set".into()))?;

        Ok(Self::new(&config.interpreter, config.script.as_path(), receptor, vina)
            .with_timeout(config.timeout_secs.map(Duration::from_secs)))
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self, ligand: &Path) -> Command {
        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(&self.script)
            .arg("-receptor")
            .arg(&self.receptor)
            .arg("-ligand")
            .arg(ligand)
            .arg("-vina_executable")
            .arg(&self.vina_executable)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }

    /// Run NNScore on one ligand and return its standard output.
    ///
    /// A non-zero exit status is logged but not an error: the report is kept
    /// and the extractor decides whether it holds a score.
    pub async fn score(&self, ligand: &LigandFile) -> Result<String> {
        debug!("Running NNScore on {:?}", ligand.path);

        let output = self.command(&ligand.path).output();
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, output).await.map_err(|_| {
                NnrankError::Scorer(format!("NNScore timed out after {:?} on {}", limit, ligand.ligand_id))
            })?,
            None => output.await,
        }
        .map_err(|e| {
            NnrankError::Scorer(format!("failed to launch {} {:?}: {}", self.interpreter, self.script, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                "NNScore exited with {} for {}: {}",
                output.status,
                ligand.ligand_id,
                stderr.trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Score every ligand, at most `workers` at a time, storing each report in `scratch`.
    ///
    /// Launch failures and timeouts leave an empty report for that ligand.
    /// Returns only after every invocation has finished.
    pub async fn score_all<F>(
        &self,
        ligands: &[LigandFile],
        scratch: &ScratchArea,
        workers: usize,
        on_scored: F,
    ) -> Result<()>
    where
        F: Fn(&LigandFile) + Send + Sync,
    {
        info!("NNScore launch on {} ligands ({} workers)", ligands.len(), workers.max(1));
        let on_scored = &on_scored;

        stream::iter(ligands)
            .map(|ligand| async move {
                let text = match self.score(ligand).await {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("No report for {}: {}", ligand.ligand_id, e);
                        String::new()
                    }
                };
                scratch.store(&ligand.ligand_id, &text).await?;
                on_scored(ligand);
                Ok::<_, NnrankError>(())
            })
            .buffer_unordered(workers.max(1))
            .try_collect::<Vec<()>>()
            .await?;

        Ok(())
    }
}
