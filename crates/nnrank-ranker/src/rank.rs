//! Ordering of the aggregated table by consensus score.

use std::cmp::Ordering;
use std::ops::Deref;

use nnrank_common::ScoreRecord;

use crate::aggregate::ResultTable;

/// Results table sorted by score, best first. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedTable {
    records: Vec<ScoreRecord>,
}

impl RankedTable {
    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    /// Best record, if any.
    pub fn best(&self) -> Option<&ScoreRecord> {
        self.records.first()
    }
}

impl Deref for RankedTable {
    type Target = [ScoreRecord];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

/// Sort by score descending. The sort is stable: equal scores keep their
/// aggregation order.
pub fn rank(table: ResultTable) -> RankedTable {
    let mut records = table.into_records();
    // Scores are finite (enforced by ResultTable), so partial_cmp is total here.
    records.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    RankedTable { records }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nnrank_test_utils::record;

    fn ids(table: &RankedTable) -> Vec<&str> {
        table.iter().map(|r| r.ligand_id.as_str()).collect()
    }

    #[test]
    fn test_descending_by_score() {
        let table = ResultTable::from_records(vec![
            record("low", 2.0),
            record("high", 7.5),
            record("mid", 4.1),
        ])
        .unwrap();

        let ranked = rank(table);
        assert_eq!(ids(&ranked), ["high", "mid", "low"]);
        assert_eq!(ranked.best().map(|r| r.score), Some(7.5));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let table = ResultTable::from_records(vec![
            record("t1", 5.0),
            record("top", 6.0),
            record("t2", 5.0),
            record("t3", 5.0),
        ])
        .unwrap();

        assert_eq!(ids(&rank(table)), ["top", "t1", "t2", "t3"]);
    }

    #[test]
    fn test_signed_zero_counts_as_tie() {
        let table = ResultTable::from_records(vec![record("neg", -0.0), record("pos", 0.0)]).unwrap();
        assert_eq!(ids(&rank(table)), ["neg", "pos"]);
    }

    #[test]
    fn test_deviation_does_not_affect_order() {
        let mut a = record("a", 3.0);
        a.deviation = 9.0;
        let mut b = record("b", 3.0);
        b.deviation = 0.1;
        let table = ResultTable::from_records(vec![a, b]).unwrap();
        assert_eq!(ids(&rank(table)), ["a", "b"]);
    }

    #[test]
    fn test_empty_table() {
        let ranked = rank(ResultTable::new());
        assert!(ranked.is_empty());
        assert!(ranked.best().is_none());
    }
}
