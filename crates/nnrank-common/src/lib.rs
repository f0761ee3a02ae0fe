//! nnrank-common - Shared types, errors, and report layout used across all NNRank crates.

pub mod error;
pub mod entities;
pub mod layout;
pub mod options;

// Re-export commonly used types
pub use entities::{LigandFile, ScorerReport, ScoreRecord};
pub use error::{NnrankError, Result};
pub use layout::ReportLayout;
pub use options::{MalformedPolicy, OutputFormat};
