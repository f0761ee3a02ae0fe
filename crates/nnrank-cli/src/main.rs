//! NNRank - batch NNScore 2.0 scoring and ranking of ligand candidates.
//! Entry point for the `nnrank` binary.

mod cli;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use nnrank_common::OutputFormat;
use nnrank_config::Config;
use nnrank_molecules::pipeline::{BatchOutcome, BatchPipeline, PipelineEvent};
use nnrank_ranker::render_table;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialise structured logging
    let default_filter = if cli.verbose { "nnrank=debug,info" } else { "nnrank=info,warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("NNRank v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load(cli.config.as_deref()).context("could not load configuration")?;
    cli.apply(&mut config);

    let pipeline = BatchPipeline::new(config).context("invalid run configuration")?;
    let bar = progress_bar();

    let outcome = pipeline
        .run_with_progress(&cli.ligands_dir, |event| match event {
            PipelineEvent::ScoringStarted { total } => {
                bar.set_length(total as u64);
                bar.set_message("NNScore launch...");
            }
            PipelineEvent::LigandScored { ligand_id } => {
                bar.set_message(ligand_id.to_string());
                bar.inc(1);
            }
            PipelineEvent::ScoringFinished => bar.finish_and_clear(),
        })
        .await;
    bar.finish_and_clear();
    let outcome = outcome.context("batch run failed")?;

    print!("{}", render_table(&outcome.ranked, OutputFormat::Plain)?);
    report_summary(&pipeline, &outcome);
    Ok(())
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}") {
        bar.set_style(style);
    }
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

fn report_summary(pipeline: &BatchPipeline, outcome: &BatchOutcome) {
    let output = &pipeline.config().output;

    info!(
        "{} ligands: {} ranked, {} without score, {} malformed. Results in {:?}",
        outcome.ligands_found,
        outcome.ranked.len(),
        outcome.missing.len(),
        outcome.malformed.len(),
        output.results_file
    );
    if let Some(best) = outcome.ranked.best() {
        info!("Best ligand: {} (score {})", best.ligand_id, best.score);
    }

    if let (Some(selection), Some(copies)) = (&outcome.selection, &outcome.copy_report) {
        info!(
            "Top {} ligands copied to {:?} ({} of {})",
            output.top_n.unwrap_or_default(),
            output.best_dir,
            copies.copied.len(),
            selection.len()
        );
        for failure in &copies.failures {
            warn!("{}", failure);
        }
    }
}
