//! NNRank Molecules - Batch scoring of ligand candidates with NNScore 2.0.
//!
//! This crate drives the external scorer around the ranking core:
//! 1. Discovering ligand files (PDBQT)
//! 2. Running NNScore once per ligand into a scratch area
//! 3. Aggregating and ranking the captured reports
//! 4. Writing the results table and copying the top-N ligands

pub mod ligands;
pub mod scratch;
pub mod scorer;
pub mod pipeline;

pub use nnrank_common::Result;
