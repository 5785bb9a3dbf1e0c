//! TCS log report data model.
//!
//! This crate provides the read-only data a log report is built from:
//! - [`BatchSummary`]: one per report, batch-level read counts and run metadata
//! - [`LibraryReport`]: one per sequenced library, the datasets behind each chart
//! - [`ReportData`]: the loaded report, decoding each library lazily so one
//!   malformed library cannot prevent the others from rendering
//! - Common error type

pub mod data;
pub mod error;
pub mod label;
pub mod model;

pub use data::ReportData;
pub use error::{Error, Result};
pub use label::LibraryLabel;
pub use model::{
    BatchSummary, CountRow, CountTable, Drilldown, LibraryReport, NumberAtRegions, RatioRow,
    RatioTable, RawSequenceAnalysis, RegionCountsRow, SizeDistribution, SizeRow,
};
