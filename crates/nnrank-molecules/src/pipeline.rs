//! Orchestrator for a batch scoring run.

use std::path::Path;

use nnrank_common::{NnrankError, Result};
use nnrank_config::Config;
use nnrank_ranker::{
    aggregate, rank, sync_best_files, write_table, CopyReport, RankedTable, ReportExtractor,
    SkippedReport, TopNSelection,
};
use tokio::fs;
use tracing::{info, warn};

use crate::ligands::{discover_ligands, ensure_unique_ids, has_ligand_extension, LIGAND_EXTENSION};
use crate::scorer::NnScoreRunner;
use crate::scratch::ScratchArea;

/// Progress notifications emitted while a batch runs.
#[derive(Debug, Clone, Copy)]
pub enum PipelineEvent<'a> {
    ScoringStarted { total: usize },
    LigandScored { ligand_id: &'a str },
    ScoringFinished,
}

/// Everything a finished run produced.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub ranked: RankedTable,
    pub ligands_found: usize,
    /// Ligands whose report had no consensus section.
    pub missing: Vec<String>,
    pub malformed: Vec<SkippedReport>,
    /// Present when top-N selection was requested.
    pub selection: Option<TopNSelection>,
    pub copy_report: Option<CopyReport>,
}

pub struct BatchPipeline {
    config: Config,
    runner: NnScoreRunner,
    extractor: ReportExtractor,
}

impl BatchPipeline {
    pub fn new(config: Config) -> Result<Self> {
        config.validate_for_run()?;
        let runner = NnScoreRunner::from_config(&config.scorer)?;
        let extractor = ReportExtractor::new(config.report.clone())?;
        Ok(Self { config, runner, extractor })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn run(&self, ligands_dir: &Path) -> Result<BatchOutcome> {
        self.run_with_progress(ligands_dir, |_| {}).await
    }

    /// Discover → score → aggregate → rank → write → (select → copy).
    ///
    /// The scratch area holding raw reports is dropped on every return path.
    pub async fn run_with_progress<F>(&self, ligands_dir: &Path, on_event: F) -> Result<BatchOutcome>
    where
        F: Fn(PipelineEvent<'_>) + Send + Sync,
    {
        self.check_output_paths(ligands_dir).await?;

        let ligands = discover_ligands(ligands_dir).await?;
        ensure_unique_ids(&ligands)?;
        if ligands.is_empty() {
            warn!("No *.{} files in {:?}", LIGAND_EXTENSION, ligands_dir);
        }

        let scratch = ScratchArea::new(self.config.scorer.scratch_parent.as_deref())?;

        on_event(PipelineEvent::ScoringStarted { total: ligands.len() });
        self.runner
            .score_all(&ligands, &scratch, self.config.scorer.parallel_workers, |ligand| {
                on_event(PipelineEvent::LigandScored { ligand_id: &ligand.ligand_id })
            })
            .await?;
        on_event(PipelineEvent::ScoringFinished);

        info!("Writing results...");
        let reports = scratch.collect_reports(&ligands).await?;
        let aggregation = aggregate(reports, &self.extractor, self.config.policy.on_malformed)?;
        let ranked = rank(aggregation.table);

        let output = &self.config.output;
        write_table(&output.results_file, &ranked, output.format)?;

        let (selection, copy_report) = match output.top_n {
            Some(n) => {
                let selection = TopNSelection::from_ranked(&ranked, n);
                prepare_best_dir(&output.best_dir).await?;
                write_table(&output.best_results_path(), selection.rows(), output.format)?;
                let report = sync_best_files(&selection, &ligands, &output.best_dir)?;
                write_manifest(&output.best_dir, &report.copied).await?;
                (Some(selection), Some(report))
            }
            None => (None, None),
        };

        if let Err(e) = scratch.close() {
            warn!("Could not remove scratch area: {}", e);
        }

        Ok(BatchOutcome {
            ranked,
            ligands_found: ligands.len(),
            missing: aggregation.missing,
            malformed: aggregation.malformed,
            selection,
            copy_report,
        })
    }

    /// Fail before scoring if any output location is unusable.
    async fn check_output_paths(&self, ligands_dir: &Path) -> Result<()> {
        let output = &self.config.output;
        let best_dir = output.top_n.map(|_| output.best_dir.as_path());

        ensure_parent_dir(&output.results_file, best_dir).await?;
        let Some(best_dir) = best_dir else {
            return Ok(());
        };
        ensure_parent_dir(&output.best_results_path(), Some(best_dir)).await?;

        match fs::metadata(best_dir).await {
            Ok(meta) if !meta.is_dir() => {
                return Err(NnrankError::Config(format!("best_dir {:?} is not a directory", best_dir)));
            }
            Ok(_) => {}
            Err(_) => {
                ensure_parent_dir(best_dir, None).await?;
                return Ok(());
            }
        }

        let best = fs::canonicalize(best_dir).await?;
        if fs::canonicalize(ligands_dir).await.ok().as_deref() == Some(best.as_path()) {
            return Err(NnrankError::Config(format!(
                "best_dir {:?} must differ from ligands_dir",
                best_dir
            )));
        }
        if let Some(receptor) = &self.config.scorer.receptor {
            let receptor_dir = match fs::canonicalize(receptor).await {
                Ok(path) => path.parent().map(Path::to_path_buf),
                Err(_) => None,
            };
            if receptor_dir.as_deref() == Some(best.as_path()) {
                return Err(NnrankError::Config(format!(
                    "best_dir {:?} holds the receptor {:?}",
                    best_dir, receptor
                )));
            }
        }
        Ok(())
    }
}

/// Lists the ligand files the last run copied into the best directory.
pub const BEST_MANIFEST: &str = ".nnrank-best";

/// `path`'s parent must be an existing directory, unless it is `created`,
/// a directory the run makes itself.
async fn ensure_parent_dir(path: &Path, created: Option<&Path>) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Ok(()),
    };
    if created == Some(parent) {
        return Ok(());
    }
    match fs::metadata(parent).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        _ => Err(NnrankError::MissingTargetDir(parent.to_path_buf())),
    }
}

/// Create the best-output directory and remove the ligand files an earlier run
/// recorded in its manifest. Files the tool did not write are left alone.
async fn prepare_best_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).await?;

    let manifest = dir.join(BEST_MANIFEST);
    let listed = match fs::read_to_string(&manifest).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    for name in listed.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let path = dir.join(name);
        // Only bare ligand file names are honoured.
        if Path::new(name).components().count() != 1 || !has_ligand_extension(&path) {
            warn!("Ignoring manifest entry {:?} in {:?}", name, dir);
            continue;
        }
        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    fs::remove_file(&manifest).await?;
    Ok(())
}

async fn write_manifest(dir: &Path, copied: &[String]) -> Result<()> {
    let text: String = copied
        .iter()
        .map(|id| format!("{id}.{LIGAND_EXTENSION}\n"))
        .collect();
    fs::write(dir.join(BEST_MANIFEST), text).await?;
    Ok(())
}
