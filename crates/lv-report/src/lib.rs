//! Interactive log report renderer for TCS batches.
//!
//! Renders one overview page plus one detail page per library from a
//! [`lv_common::ReportData`], through a charting capability it never
//! depends on directly.
//!
//! # Parts
//!
//! - [`PageController`]: navigation state machine with per-page failure isolation
//! - [`ChartRegistry`]: live chart tracking and teardown
//! - [`DrilldownHandler`]: pie-slice selection to drilldown redraw
//! - [`ChartEngine`] / [`Surface`]: the charting and UI contracts
//! - [`RecordingEngine`] / [`RecordingSurface`]: in-memory implementations
//! - [`ReportGenerator`]: single-file HTML output replaying the recorded pages
//!
//! # Example
//!
//! ```no_run
//! use lv_common::ReportData;
//! use lv_report::{ReportConfig, ReportGenerator};
//! use std::path::Path;
//!
//! let data = ReportData::from_files(
//!     Path::new("main_data.json"),
//!     Path::new("lib_data.json"),
//! ).unwrap();
//! let generator = ReportGenerator::new(ReportConfig::default());
//! let html = generator.render(&data).unwrap();
//! ```

pub mod chart;
pub mod config;
pub mod context;
pub mod controller;
pub mod drilldown;
pub mod error;
pub mod generator;
pub mod lifecycle;
pub mod pages;
pub mod recorder;
pub mod surface;

pub use chart::{
    Cell, ChartEngine, ChartEngineError, ChartHandle, ChartKind, ChartOptions, Column, DataTable,
};
pub use config::{AnimationConfig, ColorConfig, ReportConfig, ReportTheme};
pub use context::{ChartStyle, EngineContext, PageCtx};
pub use controller::{NavigationOutcome, PageController, PageFailure, PageState};
pub use drilldown::{DrilldownHandler, SelectionOutcome};
pub use error::{ErrorKind, ReportError, Result};
pub use generator::{ReportGenerator, ReportPlan};
pub use lifecycle::{ChartRegistry, TeardownSummary};
pub use recorder::{RecordingEngine, RecordingSurface};
pub use surface::{NavEntry, PageTemplate, Surface, SurfaceError};
