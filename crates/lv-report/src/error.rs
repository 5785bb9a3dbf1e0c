//! Error types for report rendering.

use crate::chart::ChartEngineError;
use crate::surface::SurfaceError;
use lv_color::ColorError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while building pages or generating a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Report data could not be decoded or failed validation.
    #[error(transparent)]
    Data(#[from] lv_common::Error),

    /// The charting capability raised during create/draw/clear.
    #[error("chart engine failure: {0}")]
    ChartEngine(#[from] ChartEngineError),

    /// A page slot or region could not be written.
    #[error("page surface error: {0}")]
    Surface(#[from] SurfaceError),

    /// Navigation requested a library that is not in the report.
    #[error("unknown navigation target '{0}'")]
    UnknownNavigationTarget(String),

    /// Color table construction failed.
    #[error("color error: {0}")]
    Color(#[from] ColorError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Page failure taxonomy used for logging and machine-readable plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MalformedDataset,
    ChartEngineFailure,
    UnknownNavigationTarget,
    Other,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::MalformedDataset => write!(f, "malformed_dataset"),
            ErrorKind::ChartEngineFailure => write!(f, "chart_engine_failure"),
            ErrorKind::UnknownNavigationTarget => write!(f, "unknown_navigation_target"),
            ErrorKind::Other => write!(f, "other"),
        }
    }
}

impl ReportError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReportError::Data(lv_common::Error::UnknownLibrary(_))
            | ReportError::UnknownNavigationTarget(_) => ErrorKind::UnknownNavigationTarget,
            ReportError::Data(
                lv_common::Error::MalformedDataset { .. }
                | lv_common::Error::InvalidLabel(_)
                | lv_common::Error::InvalidSummary(_)
                | lv_common::Error::Json(_),
            ) => ErrorKind::MalformedDataset,
            ReportError::ChartEngine(_) => ErrorKind::ChartEngineFailure,
            _ => ErrorKind::Other,
        }
    }
}
