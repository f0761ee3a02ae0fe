//! Layout of the NNScore 2.0 text report.
//!
//! The scorer prints a fixed-width table after the "average score" marker.
//! Every positional assumption the extractor makes is named here so that a
//! change in the report format fails loudly instead of misparsing.

use serde::{Deserialize, Serialize};

use crate::error::{NnrankError, Result};

/// Marker line introducing the consensus score table.
pub const DEFAULT_MARKER: &str = "AVERAGE SCORE OF ALL 20 NETWORKS, BY POSE";

/// Positional schema of the consensus score section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLayout {
    /// Substring identifying the marker line
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Data line position counted from the marker (1 = next line)
    #[serde(default = "default_data_line_offset")]
    pub data_line_offset: usize,

    /// Number of pipe-delimited fields on the data line
    #[serde(default = "default_expected_fields")]
    pub expected_fields: usize,

    #[serde(default = "default_score_field")]
    pub score_field: usize,

    #[serde(default = "default_deviation_field")]
    pub deviation_field: usize,

    /// Field holding the combined value+unit token (e.g. `2.23uM`)
    #[serde(default = "default_affinity_field")]
    pub affinity_field: usize,

    /// Width of the trailing unit code
    #[serde(default = "default_unit_width")]
    pub unit_width: usize,

    /// Characters cut from the end of the token before parsing the value.
    /// Equal to `unit_width` unless the report pads the unit.
    #[serde(default = "default_value_suffix_width")]
    pub value_suffix_width: usize,
}

fn default_marker() -> String { DEFAULT_MARKER.to_string() }
fn default_data_line_offset() -> usize { 3 }
fn default_expected_fields() -> usize { 5 }
fn default_score_field() -> usize { 2 }
fn default_deviation_field() -> usize { 3 }
fn default_affinity_field() -> usize { 4 }
fn default_unit_width() -> usize { 2 }
fn default_value_suffix_width() -> usize { 2 }

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            data_line_offset: default_data_line_offset(),
            expected_fields: default_expected_fields(),
            score_field: default_score_field(),
            deviation_field: default_deviation_field(),
            affinity_field: default_affinity_field(),
            unit_width: default_unit_width(),
            value_suffix_width: default_value_suffix_width(),
        }
    }
}

impl ReportLayout {
    /// Reject layouts the extractor cannot apply.
    pub fn validate(&self) -> Result<()> {
        if self.marker.trim().is_empty() {
            return Err(NnrankError::Config("report.marker must not be empty".into()));
        }
        if self.data_line_offset == 0 {
            return Err(NnrankError::Config("report.data_line_offset must be >= 1".into()));
        }
        for (name, idx) in [
            ("score_field", self.score_field),
            ("deviation_field", self.deviation_field),
            ("affinity_field", self.affinity_field),
        ] {
            if idx >= self.expected_fields {
                return Err(NnrankError::Config(format!(
                    "report.{name} = {idx} is out of range for {} fields",
                    self.expected_fields
                )));
            }
        }
        if self.unit_width == 0 {
            return Err(NnrankError::Config("report.unit_width must be >= 1".into()));
        }
        if self.value_suffix_width < self.unit_width {
            return Err(NnrankError::Config(format!(
                "report.value_suffix_width ({}) must be >= unit_width ({})",
                self.value_suffix_width, self.unit_width
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_is_valid() {
        let layout = ReportLayout::default();
        assert!(layout.validate().is_ok());
        assert_eq!(layout.score_field, 2);
        assert_eq!(layout.deviation_field, 3);
        assert_eq!(layout.affinity_field, 4);
        assert_eq!(layout.unit_width, 2);
    }

    #[test]
    fn test_field_out_of_range_rejected() {
        let layout = ReportLayout { affinity_field: 5, ..Default::default() };
        assert!(matches!(layout.validate(), Err(NnrankError::Config(_))));
    }

    #[test]
    fn test_suffix_narrower_than_unit_rejected() {
        let layout = ReportLayout { value_suffix_width: 1, ..Default::default() };
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_empty_marker_rejected() {
        let layout = ReportLayout { marker: "  ".into(), ..Default::default() };
        assert!(layout.validate().is_err());
    }
}
