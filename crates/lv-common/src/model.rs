//! Batch and library datasets.
//!
//! Row tuples serialize as JSON arrays, matching what the TCS pipeline writes:
//! `[["PR", 1234], ["RT", 880]]`.

use crate::error::{Error, Result};
use crate::label::LibraryLabel;
use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// `(label, count)`.
pub type CountRow = (String, u64);

/// `(region, ratio)`, ratio in `[0, 1]` for the datasets that carry one.
pub type RatioRow = (String, f64);

/// `(region, tcs, combined_tcs, tcs_after_qc)`; `None` means not measured.
pub type RegionCountsRow = (String, Option<u64>, Option<u64>, Option<u64>);

/// `(index, distribution, cutoff)`; a row contributes to at most one series.
pub type SizeRow = (u32, Option<f64>, Option<u64>);

// ============================================================================
// Batch summary
// ============================================================================

/// Batch-level summary shown on the overview page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Batch identifier.
    pub batch_id: String,
    /// Pipeline start.
    pub start_time: DateTime<FixedOffset>,
    /// Pipeline end.
    pub end_time: DateTime<FixedOffset>,
    /// Tool name -> version string.
    #[serde(default)]
    pub versions: BTreeMap<String, String>,
    /// Number of libraries in the batch.
    pub library_count: usize,
    /// Total raw read count.
    pub total_reads: u64,
    /// Raw reads per library, in pipeline order.
    pub raw_sequence_data: Vec<CountRow>,
}

impl BatchSummary {
    /// Wall-clock duration of the batch run.
    pub fn run_duration(&self) -> Duration {
        self.end_time.signed_duration_since(self.start_time)
    }

    /// Human-readable run duration.
    pub fn duration_formatted(&self) -> String {
        let secs = self.run_duration().num_seconds();
        match secs {
            s if s < 0 => "N/A".to_string(),
            s if s >= 3_600 => format!("{}h {:02}m", s / 3_600, (s % 3_600) / 60),
            s if s >= 60 => format!("{}m {:02}s", s / 60, s % 60),
            s => format!("{} s", s),
        }
    }

    /// Sum of `raw_sequence_data` counts.
    pub fn raw_total(&self) -> u64 {
        self.raw_sequence_data.iter().map(|(_, n)| n).sum()
    }

    /// Check label and timestamp invariants.
    pub fn validate(&self) -> Result<()> {
        if let Some((i, _)) = self
            .raw_sequence_data
            .iter()
            .enumerate()
            .find(|(_, (label, _))| label.trim().is_empty())
        {
            return Err(Error::InvalidSummary(format!(
                "raw_sequence_data[{}] has an empty label",
                i
            )));
        }
        if self.end_time < self.start_time {
            return Err(Error::InvalidSummary(format!(
                "end_time {} precedes start_time {}",
                self.end_time, self.start_time
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Library datasets
// ============================================================================

/// Sequence of `(label, count)` rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountTable {
    pub data: Vec<CountRow>,
}

impl CountTable {
    pub fn total(&self) -> u64 {
        self.data.iter().map(|(_, n)| n).sum()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.data.iter().map(|(l, _)| l.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Children of one raw-sequence-analysis category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drilldown {
    /// Parent category label.
    pub label: String,
    pub data: Vec<CountRow>,
}

impl Drilldown {
    pub fn total(&self) -> u64 {
        self.data.iter().map(|(_, n)| n).sum()
    }
}

/// Raw sequence categories plus per-category drilldowns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSequenceAnalysis {
    pub data: Vec<CountRow>,
    #[serde(default)]
    pub drilldowns: Vec<Drilldown>,
}

impl RawSequenceAnalysis {
    /// Drilldown whose parent label equals `label` exactly.
    pub fn drilldown(&self, label: &str) -> Option<&Drilldown> {
        self.drilldowns.iter().find(|d| d.label == label)
    }

    pub fn has_drilldowns(&self) -> bool {
        !self.drilldowns.is_empty()
    }
}

/// Three parallel counts per region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberAtRegions {
    pub data: Vec<RegionCountsRow>,
}

/// Sequence of `(region, ratio)` rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioTable {
    pub data: Vec<RatioRow>,
}

impl RatioTable {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Region -> UMI family size distribution with cutoff overlay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeDistribution {
    pub data: BTreeMap<String, Vec<SizeRow>>,
}

impl SizeDistribution {
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(|k| k.as_str())
    }
}

/// All chart datasets for one library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryReport {
    pub raw_distribution: CountTable,
    pub raw_sequence_analysis: RawSequenceAnalysis,
    pub number_at_regions: NumberAtRegions,
    #[serde(default)]
    pub detection_sensitivity: RatioTable,
    pub distinct_to_raw: RatioTable,
    pub resampling_index: RatioTable,
    pub size_distribution: SizeDistribution,
}

impl LibraryReport {
    /// Decode and validate one library's JSON value.
    pub fn from_value(library: &LibraryLabel, value: &serde_json::Value) -> Result<Self> {
        let report = LibraryReport::deserialize(value)
            .map_err(|e| Error::malformed(library.as_str(), e.to_string()))?;
        report.validate(library)?;
        Ok(report)
    }

    /// Check the dataset invariants.
    pub fn validate(&self, library: &LibraryLabel) -> Result<()> {
        let bad = |reason: String| Err(Error::malformed(library.as_str(), reason));

        let count_sets: [(&str, &[CountRow]); 2] = [
            ("raw_distribution", self.raw_distribution.data.as_slice()),
            ("raw_sequence_analysis", self.raw_sequence_analysis.data.as_slice()),
        ];
        for (name, rows) in count_sets {
            if let Some(i) = rows.iter().position(|(l, _)| l.trim().is_empty()) {
                return bad(format!("{}[{}] has an empty label", name, i));
            }
        }

        let mut seen = HashSet::new();
        for drill in &self.raw_sequence_analysis.drilldowns {
            let parents = self
                .raw_sequence_analysis
                .data
                .iter()
                .filter(|(l, _)| *l == drill.label)
                .count();
            if parents != 1 {
                return bad(format!(
                    "drilldown '{}' must match exactly one category, matched {}",
                    drill.label, parents
                ));
            }
            if !seen.insert(drill.label.as_str()) {
                return bad(format!("duplicate drilldown '{}'", drill.label));
            }
            if let Some(i) = drill.data.iter().position(|(l, _)| l.trim().is_empty()) {
                return bad(format!("drilldown '{}'[{}] has an empty label", drill.label, i));
            }
        }

        if let Some(i) = self
            .number_at_regions
            .data
            .iter()
            .position(|(l, ..)| l.trim().is_empty())
        {
            return bad(format!("number_at_regions[{}] has an empty label", i));
        }

        let ratio_sets: [(&str, &RatioTable); 3] = [
            ("detection_sensitivity", &self.detection_sensitivity),
            ("distinct_to_raw", &self.distinct_to_raw),
            ("resampling_index", &self.resampling_index),
        ];
        for (name, table) in ratio_sets {
            for (i, (label, ratio)) in table.data.iter().enumerate() {
                if label.trim().is_empty() {
                    return bad(format!("{}[{}] has an empty label", name, i));
                }
                if !ratio.is_finite() || *ratio < 0.0 {
                    return bad(format!("{}[{}] ratio {} is not a non-negative number", name, i, ratio));
                }
            }
        }

        for (region, rows) in &self.size_distribution.data {
            if region.trim().is_empty() {
                return bad("size_distribution has an empty region label".to_string());
            }
            for (index, dist, cutoff) in rows {
                if dist.is_some() && cutoff.is_some() {
                    return bad(format!(
                        "size_distribution '{}' row {} sets both distribution and cutoff",
                        region, index
                    ));
                }
                if let Some(v) = dist {
                    if !v.is_finite() || *v < 0.0 {
                        return bad(format!(
                            "size_distribution '{}' row {} value {} is not a non-negative number",
                            region, index, v
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}
