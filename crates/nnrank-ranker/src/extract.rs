//! Extraction of the consensus score record from one NNScore report.

use nnrank_common::{NnrankError, ReportLayout, Result, ScoreRecord};
use tracing::debug;

/// Reads the "average score" section of a scorer report according to a [`ReportLayout`].
#[derive(Debug, Clone, Default)]
pub struct ReportExtractor {
    layout: ReportLayout,
}

impl ReportExtractor {
    /// Create an extractor for the given layout, rejecting layouts it cannot apply.
    pub fn new(layout: ReportLayout) -> Result<Self> {
        layout.validate()?;
        Ok(Self { layout })
    }

    pub fn layout(&self) -> &ReportLayout {
        &self.layout
    }

    /// Extract the record from a full report text.
    ///
    /// Returns `Ok(None)` when the marker never appears (the scorer produced no
    /// score for this ligand) and `Err(ReportMalformed)` when the marker is
    /// present but the data line does not match the layout.
    pub fn extract(&self, ligand_id: &str, report: &str) -> Result<Option<ScoreRecord>> {
        self.extract_lines(ligand_id, report.lines())
    }

    /// Same as [`extract`](Self::extract) over an already split sequence of lines.
    pub fn extract_lines<I, S>(&self, ligand_id: &str, lines: I) -> Result<Option<ScoreRecord>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines = lines.into_iter();

        // Only the first marker counts; anything after it is another table.
        if !lines.by_ref().any(|l| l.as_ref().contains(&self.layout.marker)) {
            debug!("No consensus section in report for {}", ligand_id);
            return Ok(None);
        }

        let data_line = lines.nth(self.layout.data_line_offset - 1).ok_or_else(|| {
            NnrankError::malformed(
                ligand_id,
                format!(
                    "report ends before data line {} after marker",
                    self.layout.data_line_offset
                ),
            )
        })?;

        self.parse_data_line(ligand_id, data_line.as_ref()).map(Some)
    }

    fn parse_data_line(&self, ligand_id: &str, line: &str) -> Result<ScoreRecord> {
        let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        let fields: Vec<&str> = compact.split('|').collect();

        if fields.len() != self.layout.expected_fields {
            return Err(NnrankError::malformed(
                ligand_id,
                format!(
                    "expected {} '|'-separated fields, found {} in {:?}",
                    self.layout.expected_fields,
                    fields.len(),
                    compact
                ),
            ));
        }

        let score = parse_number(ligand_id, "score", fields[self.layout.score_field])?;
        let deviation = parse_number(ligand_id, "deviation", fields[self.layout.deviation_field])?;
        let (value, unit) = self.split_affinity(ligand_id, fields[self.layout.affinity_field])?;
        let affinity_value = parse_number(ligand_id, "affinity value", value)?;

        Ok(ScoreRecord::new(ligand_id, score, deviation, affinity_value, unit))
    }

    /// Split `2.23uM` into (`2.23`, `uM`) by character count from the end.
    fn split_affinity<'a>(&self, ligand_id: &str, token: &'a str) -> Result<(&'a str, &'a str)> {
        let n_chars = token.chars().count();
        if n_chars <= self.layout.value_suffix_width {
            return Err(NnrankError::malformed(
                ligand_id,
                format!(
                    "affinity token {:?} is too short for a {}-character unit suffix",
                    token, self.layout.value_suffix_width
                ),
            ));
        }

        let value_end = byte_offset(token, n_chars - self.layout.value_suffix_width);
        let unit_start = byte_offset(token, n_chars - self.layout.unit_width);
        let unit = &token[unit_start..];

        if !unit.chars().all(char::is_alphabetic) {
            return Err(NnrankError::malformed(
                ligand_id,
                format!("affinity token {:?} does not end in a unit code", token),
            ));
        }

        Ok((&token[..value_end], unit))
    }
}

fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(s.len())
}

fn parse_number(ligand_id: &str, field: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw.parse().map_err(|_| {
        NnrankError::malformed(ligand_id, format!("{field} {raw:?} is not a number"))
    })?;
    if !value.is_finite() {
        return Err(NnrankError::malformed(ligand_id, format!("{field} {raw:?} is not finite")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nnrank_test_utils::{expected_record, nnscore_report, report_without_marker};

    fn marker_section(data_line: &str) -> String {
        format!(
            "header text\n AVERAGE SCORE OF ALL 20 NETWORKS, BY POSE\n  Rank | Pose | Score | Std | Kd\n ---+---+---+---+---\n{data_line}\ntrailer\n"
        )
    }

    #[test]
    fn test_extracts_known_good_report() {
        let extractor = ReportExtractor::default();
        let report = nnscore_report("5.650", "0.520", "2.23 uM");

        let record = extractor.extract("ZINC01", &report).unwrap();
        assert_eq!(record, Some(expected_record("ZINC01", 5.65, 0.52, 2.23, "uM")));
    }

    #[test]
    fn test_missing_marker_yields_nothing() {
        let extractor = ReportExtractor::default();
        assert_eq!(extractor.extract("ZINC02", &report_without_marker()).unwrap(), None);
        assert_eq!(extractor.extract("ZINC02", "").unwrap(), None);
    }

    #[test]
    fn test_whitespace_is_stripped_before_split() {
        let extractor = ReportExtractor::default();
        let report = marker_section("\t 1 |  2 | 7.50 |\t0.30 | 61.66 nM \r");

        let record = extractor.extract("lig", &report).unwrap().unwrap();
        assert_eq!(record.score, 7.5);
        assert_eq!(record.deviation, 0.3);
        assert_eq!(record.affinity_value, 61.66);
        assert_eq!(record.affinity_unit, "nM");
    }

    #[test]
    fn test_unit_is_trailing_two_characters_only() {
        // `-9.1kcal` splits positionally into "-9.1kc" + "al"; the value half
        // is not a number, so the report is rejected instead of misread.
        let extractor = ReportExtractor::default();
        let report = marker_section(" 1 | 2 | 7.50 | 0.30 | -9.1kcal ");

        let err = extractor.extract("lig", &report).unwrap_err();
        match err {
            NnrankError::ReportMalformed { ligand_id, reason } => {
                assert_eq!(ligand_id, "lig");
                assert!(reason.contains("-9.1kc"), "unexpected reason: {reason}");
            }
            other => panic!("expected ReportMalformed, got {other:?}"),
        }
    }

    #[test]
    fn test_padded_unit_layout() {
        let layout = ReportLayout { value_suffix_width: 3, ..Default::default() };
        let extractor = ReportExtractor::new(layout).unwrap();
        let report = marker_section(" 1 | 1 | 6.10 | 0.75 | 4.5uM) ");

        // The unit code itself must be letters; "M)" is layout drift.
        assert!(extractor.extract("lig", &report).is_err());

        let report = marker_section(" 1 | 1 | 6.10 | 0.75 | 4.5_uM ");
        let record = extractor.extract("lig", &report).unwrap().unwrap();
        assert_eq!(record.affinity_value, 4.5);
        assert_eq!(record.affinity_unit, "uM");
    }

    #[test]
    fn test_wrong_field_count_is_malformed() {
        let extractor = ReportExtractor::default();
        let report = marker_section(" 1 | 7.50 | 0.30 | 2.2uM ");
        assert!(matches!(
            extractor.extract("lig", &report),
            Err(NnrankError::ReportMalformed { .. })
        ));
    }

    #[test]
    fn test_non_numeric_score_is_malformed() {
        let extractor = ReportExtractor::default();
        let report = marker_section(" 1 | 1 | high | 0.30 | 2.2uM ");
        assert!(extractor.extract("lig", &report).is_err());
    }

    #[test]
    fn test_non_finite_score_is_malformed() {
        let extractor = ReportExtractor::default();
        let report = marker_section(" 1 | 1 | NaN | 0.30 | 2.2uM ");
        assert!(extractor.extract("lig", &report).is_err());
    }

    #[test]
    fn test_truncated_after_marker_is_malformed() {
        let extractor = ReportExtractor::default();
        let report = "AVERAGE SCORE OF ALL 20 NETWORKS, BY POSE\n Rank | Pose\n";
        assert!(matches!(
            extractor.extract("lig", report),
            Err(NnrankError::ReportMalformed { .. })
        ));
    }

    #[test]
    fn test_short_affinity_token_is_malformed() {
        let extractor = ReportExtractor::default();
        let report = marker_section(" 1 | 1 | 5.0 | 0.1 | uM ");
        assert!(extractor.extract("lig", &report).is_err());
    }

    #[test]
    fn test_non_ascii_unit_does_not_panic() {
        let extractor = ReportExtractor::default();
        let report = marker_section(" 1 | 1 | 5.0 | 0.1 | 3.3µM ");
        let record = extractor.extract("lig", &report).unwrap().unwrap();
        assert_eq!(record.affinity_value, 3.3);
        assert_eq!(record.affinity_unit, "µM");
    }

    #[test]
    fn test_first_marker_wins() {
        let extractor = ReportExtractor::default();
        let mut report = nnscore_report("6.000", "0.100", "1.00 uM");
        report.push_str(&nnscore_report("9.000", "0.100", "1.00 nM"));

        let record = extractor.extract("lig", &report).unwrap().unwrap();
        assert_eq!(record.score, 6.0);
    }

    #[test]
    fn test_extract_lines_accepts_owned_lines() {
        let extractor = ReportExtractor::default();
        let lines: Vec<String> = nnscore_report("4.400", "1.100", "9.87 mM")
            .lines()
            .map(str::to_string)
            .collect();
        let record = extractor.extract_lines("lig", lines).unwrap().unwrap();
        assert_eq!(record.affinity_unit, "mM");
    }

    #[test]
    fn test_invalid_layout_rejected() {
        let layout = ReportLayout { data_line_offset: 0, ..Default::default() };
        assert!(ReportExtractor::new(layout).is_err());
    }
}
