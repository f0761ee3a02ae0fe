//! Command line arguments. Flags override values from the config file.

use std::path::PathBuf;

use clap::Parser;
use nnrank_common::{MalformedPolicy, OutputFormat};
use nnrank_config::Config;

/// Multi-ligand run of NNScore 2.0: score every ligand against one receptor,
/// rank by consensus score and optionally keep the N best ligand files.
#[derive(Debug, Parser)]
#[command(name = "nnrank", version, about)]
pub struct Cli {
    /// Receptor file in PDBQT format
    #[arg(long = "receptor_file", visible_alias = "receptor-file", value_name = "PDBQT")]
    pub receptor_file: Option<PathBuf>,

    /// Directory with ligands in PDBQT format
    #[arg(long = "ligands_dir", visible_alias = "ligands-dir", value_name = "DIR")]
    pub ligands_dir: PathBuf,

    /// AutoDock Vina executable passed through to NNScore
    #[arg(long = "vina_executable", visible_alias = "vina-executable", value_name = "PATH")]
    pub vina_executable: Option<PathBuf>,

    /// NNScore 2.0 script [default: NNScore2.py]
    #[arg(long = "nn2_script", visible_alias = "nn2-script", value_name = "PATH")]
    pub nn2_script: Option<PathBuf>,

    /// Interpreter for the NNScore script [default: python3]
    #[arg(long)]
    pub python: Option<String>,

    /// Where to write the full ranked table [default: results.txt]
    #[arg(long = "results_file", visible_alias = "results-file", value_name = "PATH")]
    pub results_file: Option<PathBuf>,

    /// Copy the N best-scoring ligands into --best_dir
    #[arg(long = "top_n", visible_alias = "top-n", value_name = "N")]
    pub top_n: Option<usize>,

    /// Output directory for the best ligands [default: best_ligands]
    #[arg(long = "best_dir", visible_alias = "best-dir", value_name = "DIR")]
    pub best_dir: Option<PathBuf>,

    /// Table format for result files: plain, csv or json
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Number of NNScore processes to run at once
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// Per-ligand NNScore time limit in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// What to do with unreadable score sections: skip or abort
    #[arg(long = "on_malformed", visible_alias = "on-malformed", value_name = "POLICY")]
    pub on_malformed: Option<MalformedPolicy>,

    /// Config file (TOML or YAML) [default: $NNRANK_CONFIG or ./nnrank.toml]
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Overlay every flag that was given onto `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref p) = self.receptor_file {
            config.scorer.receptor = Some(p.clone());
        }
        if let Some(ref p) = self.vina_executable {
            config.scorer.vina_executable = Some(p.clone());
        }
        if let Some(ref p) = self.nn2_script {
            config.scorer.script = p.clone();
        }
        if let Some(ref py) = self.python {
            config.scorer.interpreter = py.clone();
        }
        if let Some(jobs) = self.jobs {
            config.scorer.parallel_workers = jobs;
        }
        if let Some(secs) = self.timeout {
            config.scorer.timeout_secs = Some(secs);
        }
        if let Some(ref p) = self.results_file {
            config.output.results_file = p.clone();
        }
        if let Some(n) = self.top_n {
            config.output.top_n = Some(n);
        }
        if let Some(ref p) = self.best_dir {
            config.output.best_dir = p.clone();
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(policy) = self.on_malformed {
            config.policy.on_malformed = policy;
        }
    }
}
