//! nnrank-ranker - Turns NNScore text reports into a ranked results table.
//!
//! Data flow: reports → [`extract`] → [`aggregate`] → [`rank`] → [`select`],
//! with [`table`] rendering any stage's rows.

pub mod extract;
pub mod aggregate;
pub mod rank;
pub mod select;
pub mod table;

pub use aggregate::{aggregate, Aggregation, ResultTable, SkippedReport};
pub use extract::ReportExtractor;
pub use rank::{rank, RankedTable};
pub use select::{sync_best_files, CopyReport, TopNSelection};
pub use table::{render_table, write_table};
