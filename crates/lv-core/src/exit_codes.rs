//! Exit codes for the `lv` CLI.
//!
//! Exit code ranges:
//! - 0-9: Outcomes (the report was produced)
//! - 10-19: User/input errors (recoverable by user action)
//! - 20-29: Internal errors

use lv_report::{ErrorKind, ReportError};

/// Exit codes for `lv` operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    // ========================================================================
    // Outcomes (0-9)
    // ========================================================================
    /// Every page rendered.
    Clean = 0,

    /// Report written, but at least one page shows the fallback message.
    DegradedPages = 3,

    // ========================================================================
    // User / Input Errors (10-19)
    // ========================================================================
    /// Invalid arguments or configuration.
    ArgsError = 10,

    /// Input datasets could not be decoded or break an invariant.
    DataError = 15,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean)
    }

    /// Codes 10-19: can be resolved by fixing inputs.
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Codes 20-29.
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Error code name (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::DegradedPages => "OK_DEGRADED",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::DataError => "ERR_DATA",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Map a data-layer error to its exit code.
    pub fn for_data_error(err: &lv_common::Error) -> Self {
        match err {
            lv_common::Error::Io(_) => ExitCode::IoError,
            // Undecodable JSON is bad input too.
            _ => ExitCode::DataError,
        }
    }

    /// Map a report error to its exit code.
    pub fn for_report_error(err: &ReportError) -> Self {
        match err {
            ReportError::Data(e) => Self::for_data_error(e),
            ReportError::InvalidConfig(_) | ReportError::Color(_) => ExitCode::ArgsError,
            ReportError::IoError(_) => ExitCode::IoError,
            _ => match err.kind() {
                ErrorKind::MalformedDataset => ExitCode::DataError,
                _ => ExitCode::InternalError,
            },
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
