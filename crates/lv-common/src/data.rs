//! Loaded report data.
//!
//! The batch summary is decoded up front. Library datasets are kept as raw
//! JSON and decoded on demand by [`ReportData::library`], so a single
//! malformed library only fails its own page.

use crate::error::{Error, Result};
use crate::label::LibraryLabel;
use crate::model::{BatchSummary, LibraryReport};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Read-only report data set, supplied once at load time.
#[derive(Debug, Clone)]
pub struct ReportData {
    summary: BatchSummary,
    libraries: BTreeMap<LibraryLabel, Value>,
}

impl ReportData {
    /// Wrap an already-decoded summary and raw library values.
    pub fn new(summary: BatchSummary, libraries: BTreeMap<LibraryLabel, Value>) -> Self {
        if summary.library_count != libraries.len() {
            warn!(
                declared = summary.library_count,
                found = libraries.len(),
                "library count in batch summary does not match library data"
            );
        }
        Self { summary, libraries }
    }

    /// Build from decoded library reports.
    pub fn from_reports<I>(summary: BatchSummary, reports: I) -> Result<Self>
    where
        I: IntoIterator<Item = (LibraryLabel, LibraryReport)>,
    {
        let mut libraries = BTreeMap::new();
        for (label, report) in reports {
            libraries.insert(label, serde_json::to_value(report)?);
        }
        Ok(Self::new(summary, libraries))
    }

    /// Parse `main_data` and `lib_data` JSON documents.
    pub fn from_json(main_data: &str, lib_data: &str) -> Result<Self> {
        let summary: BatchSummary = serde_json::from_str(main_data)?;
        summary.validate()?;

        let raw: BTreeMap<String, Value> = serde_json::from_str(lib_data)?;
        let mut libraries = BTreeMap::new();
        for (key, value) in raw {
            match LibraryLabel::parse(key.as_str()) {
                Ok(label) => {
                    libraries.insert(label, value);
                }
                Err(e) => warn!(key = %key, error = %e, "skipping library with invalid label"),
            }
        }
        debug!(
            batch_id = %summary.batch_id,
            libraries = libraries.len(),
            "report data loaded"
        );
        Ok(Self::new(summary, libraries))
    }

    /// Read and parse `main_data` and `lib_data` files.
    pub fn from_files(main_data: &Path, lib_data: &Path) -> Result<Self> {
        let main = std::fs::read_to_string(main_data)?;
        let lib = std::fs::read_to_string(lib_data)?;
        Self::from_json(&main, &lib)
    }

    pub fn summary(&self) -> &BatchSummary {
        &self.summary
    }

    /// Library labels in navigation order.
    pub fn library_labels(&self) -> impl Iterator<Item = &LibraryLabel> {
        self.libraries.keys()
    }

    pub fn library_count(&self) -> usize {
        self.libraries.len()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.libraries.contains_key(label)
    }

    /// Decode and validate one library.
    pub fn library(&self, label: &str) -> Result<LibraryReport> {
        let (key, value) = self
            .libraries
            .get_key_value(label)
            .ok_or_else(|| Error::UnknownLibrary(label.to_string()))?;
        LibraryReport::from_value(key, value)
    }

    /// Decode every library, returning the per-library outcome.
    pub fn validate_all(&self) -> Vec<(LibraryLabel, Result<()>)> {
        self.libraries
            .iter()
            .map(|(label, value)| {
                let outcome = LibraryReport::from_value(label, value).map(|_| ());
                (label.clone(), outcome)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAIN: &str = r#"{
        "batch_id": "batch-0601",
        "start_time": "2025-06-01T10:00:00-04:00",
        "end_time": "2025-06-01T10:30:00-04:00",
        "versions": {"tcs": "2.0.1"},
        "library_count": 2,
        "total_reads": 22000,
        "raw_sequence_data": [["LIB1", 20000], ["Other", 2000]]
    }"#;

    const LIBS: &str = r#"{
        "LIB1": {
            "raw_distribution": {"data": [["PR", 10]]},
            "raw_sequence_analysis": {"data": [["NoMatch", 3]], "drilldowns": []},
            "number_at_regions": {"data": []},
            "distinct_to_raw": {"data": []},
            "resampling_index": {"data": []},
            "size_distribution": {"data": {}}
        },
        "LIB2": {"raw_distribution": 5}
    }"#;

    #[test]
    fn test_from_json_keeps_bad_library_lazy() {
        let data = ReportData::from_json(MAIN, LIBS).unwrap();
        assert_eq!(data.library_count(), 2);
        assert!(data.library("LIB1").is_ok());
        let err = data.library("LIB2").unwrap_err();
        assert!(matches!(err, Error::MalformedDataset { ref library, .. } if library == "LIB2"));
    }

    #[test]
    fn test_unknown_library() {
        let data = ReportData::from_json(MAIN, LIBS).unwrap();
        assert!(matches!(data.library("LIB9"), Err(Error::UnknownLibrary(_))));
        assert!(!data.contains("LIB9"));
    }

    #[test]
    fn test_labels_sorted() {
        let data = ReportData::from_json(MAIN, LIBS).unwrap();
        let labels: Vec<&str> = data.library_labels().map(|l| l.as_str()).collect();
        assert_eq!(labels, vec!["LIB1", "LIB2"]);
    }

    #[test]
    fn test_validate_all_reports_each_library() {
        let data = ReportData::from_json(MAIN, LIBS).unwrap();
        let results = data.validate_all();
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
    }

    #[test]
    fn test_blank_library_key_skipped() {
        let libs = r#"{"": {}, "   ": {}, "LIB1": {"raw_distribution": 5}}"#;
        let data = ReportData::from_json(MAIN, libs).unwrap();
        let labels: Vec<&str> = data.library_labels().map(|l| l.as_str()).collect();
        assert_eq!(labels, vec!["LIB1"]);
    }

    #[test]
    fn test_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let main = dir.path().join("main_data.json");
        let lib = dir.path().join("lib_data.json");
        std::fs::write(&main, MAIN).unwrap();
        std::fs::write(&lib, LIBS).unwrap();
        let data = ReportData::from_files(&main, &lib).unwrap();
        assert_eq!(data.summary().batch_id, "batch-0601");
    }
}
