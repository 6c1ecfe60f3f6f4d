//! Log-log rank-frequency curve.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::frequency::FrequencyTable;

/// One `(log10(rank), log10(frequency))` coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CurvePoint {
    pub log_rank: f64,
    pub log_frequency: f64,
}

/// Points ordered by rank, rank 1 being the most frequent entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankFrequencyCurve {
    points: Vec<CurvePoint>,
}

impl RankFrequencyCurve {
    /// Rank the entries of `table` by descending count (ties in first-seen
    /// order) and log-transform both axes.
    ///
    /// An empty table has no rank range and is rejected as invalid input.
    pub fn from_table(table: &FrequencyTable) -> Result<Self> {
        if table.is_empty() {
            return Err(AnalysisError::invalid_input(
                "rank-frequency curve needs a non-empty table",
            ));
        }
        let points = table
            .ranked()
            .into_iter()
            .enumerate()
            .map(|(index, (_, count))| CurvePoint {
                log_rank: ((index + 1) as f64).log10(),
                log_frequency: (count as f64).log10(),
            })
            .collect();
        Ok(RankFrequencyCurve { points })
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Title and axis labels handed to a renderer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlotLabels {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Default for PlotLabels {
    fn default() -> Self {
        PlotLabels {
            title: "Rank-Frequency Plot".to_string(),
            x_label: "log(rank)".to_string(),
            y_label: "log(frequency)".to_string(),
        }
    }
}

/// Turns a curve into a persisted artifact. Returns the path written.
pub trait CurveRenderer {
    fn render(&self, curve: &RankFrequencyCurve, labels: &PlotLabels, path: &Path)
    -> Result<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_follow_rank_order() {
        let tokens: Vec<String> = ["A", "A", "B", "A", "C", "B", "A"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let table = FrequencyTable::build(&tokens, 1).unwrap();
        let curve = RankFrequencyCurve::from_table(&table).unwrap();
        assert_eq!(curve.len(), 3);

        let expected = [(1.0f64, 4.0f64), (2.0, 2.0), (3.0, 1.0)];
        for (point, (rank, freq)) in curve.points().iter().zip(expected) {
            assert_eq!(point.log_rank, rank.log10());
            assert_eq!(point.log_frequency, freq.log10());
        }
        assert_eq!(curve.points()[0].log_rank, 0.0);
    }

    #[test]
    fn test_empty_table_is_invalid_input() {
        let table = FrequencyTable::build(&[], 1).unwrap();
        let err = RankFrequencyCurve::from_table(&table).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }
}
