//! Configuration loading for NNRank.
//! Reads nnrank.toml from the current directory or the path in the NNRANK_CONFIG env var.
//! Every field has a default, so the file itself is optional.

use std::path::{Path, PathBuf};

use nnrank_common::{MalformedPolicy, NnrankError, OutputFormat, ReportLayout};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(test)]
mod tests;

pub const CONFIG_ENV: &str = "NNRANK_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "nnrank.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0:?}")]
    NotFound(PathBuf),

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in {path:?}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid YAML in {path:?}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for NnrankError {
    fn from(e: ConfigError) -> Self {
        NnrankError::Config(e.to_string())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scorer: ScorerConfig,
    #[serde(default)]
    pub report: ReportLayout,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

// ── Scorer ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Interpreter used to launch the scoring script
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// NNScore 2.0 script
    #[serde(default = "default_script")]
    pub script: PathBuf,

    pub vina_executable: Option<PathBuf>,

    /// Receptor in PDBQT format
    pub receptor: Option<PathBuf>,

    /// Concurrent scorer invocations
    #[serde(default = "default_parallel_workers")]
    pub parallel_workers: usize,

    /// Per-ligand wall clock limit; unlimited when unset
    pub timeout_secs: Option<u64>,

    /// Where the temporary report directory is created; system temp dir when unset
    pub scratch_parent: Option<PathBuf>,
}

fn default_interpreter()      -> String  { "python3".to_string() }
fn default_script()           -> PathBuf { PathBuf::from("NNScore2.py") }
fn default_parallel_workers() -> usize   { 1 }

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            script: default_script(),
            vina_executable: None,
            receptor: None,
            parallel_workers: default_parallel_workers(),
            timeout_secs: None,
            scratch_parent: None,
        }
    }
}

// ── Output ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_results_file")]
    pub results_file: PathBuf,

    #[serde(default)]
    pub format: OutputFormat,

    /// Copy the N best ligands; disabled when unset
    pub top_n: Option<usize>,

    #[serde(default = "default_best_dir")]
    pub best_dir: PathBuf,

    /// Defaults to `<best_dir>/results.txt`
    pub best_results_file: Option<PathBuf>,
}

fn default_results_file() -> PathBuf { PathBuf::from("results.txt") }
fn default_best_dir()     -> PathBuf { PathBuf::from("best_ligands") }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_file: default_results_file(),
            format: OutputFormat::default(),
            top_n: None,
            best_dir: default_best_dir(),
            best_results_file: None,
        }
    }
}

impl OutputConfig {
    pub fn best_results_path(&self) -> PathBuf {
        self.best_results_file
            .clone()
            .unwrap_or_else(|| self.best_dir.join("results.txt"))
    }
}

// ── Policy ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub on_malformed: MalformedPolicy,
}

// ── Loading ──────────────────────────────────────────────────────────────────

impl Config {
    /// Load configuration.
    ///
    /// An explicit path, then NNRANK_CONFIG, then ./nnrank.toml. Only the
    /// implicit default may be absent, in which case defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let requested = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        match requested {
            Some(path) => Self::from_file(&path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(Path::new(DEFAULT_CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    /// Parse a config file; `.yaml`/`.yml` as YAML, anything else as TOML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        let config: Self = if is_yaml {
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            toml::from_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })?
        };
        Ok(config)
    }

    /// Check value ranges and the report layout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scorer.parallel_workers == 0 {
            return Err(ConfigError::Invalid("scorer.parallel_workers must be >= 1".into()));
        }
        if self.scorer.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid("scorer.timeout_secs must be >= 1".into()));
        }
        if self.scorer.interpreter.trim().is_empty() {
            return Err(ConfigError::Invalid("scorer.interpreter must not be empty".into()));
        }
        self.report
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    /// [`validate`](Self::validate) plus the inputs a scoring run cannot do without.
    pub fn validate_for_run(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.scorer.receptor.is_none() {
            return Err(ConfigError::Invalid("scorer.receptor (--receptor_file) is required".into()));
        }
        if self.scorer.vina_executable.is_none() {
            return Err(ConfigError::Invalid(
                "scorer.vina_executable (--vina_executable) is required".into(),
            ));
        }
        Ok(())
    }
}
