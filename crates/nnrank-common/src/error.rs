use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NnrankError {
    #[error("Malformed scorer report for ligand {ligand_id}: {reason}")]
    ReportMalformed { ligand_id: String, reason: String },

    #[error("Duplicate ligand id: {0}")]
    DuplicateLigandId(String),

    #[error("Failed to copy ligand {ligand_id} from {path:?}: {source}")]
    FileCopy {
        ligand_id: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Target directory does not exist: {0:?}")]
    MissingTargetDir(PathBuf),

    #[error("Scorer error: {0}")]
    Scorer(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NnrankError {
    pub fn malformed(ligand_id: &str, reason: impl Into<String>) -> Self {
        Self::ReportMalformed {
            ligand_id: ligand_id.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NnrankError>;
