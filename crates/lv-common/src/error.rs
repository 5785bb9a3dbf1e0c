//! Error types for report data loading and validation.

use thiserror::Error;

/// Result type alias for data model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading or decoding report data.
#[derive(Error, Debug)]
pub enum Error {
    /// A library's datasets are missing fields or break an invariant.
    #[error("malformed dataset for library '{library}': {reason}")]
    MalformedDataset { library: String, reason: String },

    /// Requested library label is not part of the report.
    #[error("library '{0}' not found in report data")]
    UnknownLibrary(String),

    /// Library or category label is empty.
    #[error("invalid label: {0}")]
    InvalidLabel(String),

    /// Batch summary breaks an invariant.
    #[error("invalid batch summary: {0}")]
    InvalidSummary(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a [`Error::MalformedDataset`].
    pub fn malformed(library: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedDataset {
            library: library.into(),
            reason: reason.into(),
        }
    }

    /// Stable error code.
    ///
    /// - 10-19: data errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::MalformedDataset { .. } => 10,
            Error::UnknownLibrary(_) => 11,
            Error::InvalidLabel(_) => 12,
            Error::InvalidSummary(_) => 13,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Whether the error describes bad input data rather than an I/O failure.
    pub fn is_data_error(&self) -> bool {
        self.code() < 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display() {
        let err = Error::malformed("LIB1", "drilldown 'X' has no parent");
        assert_eq!(
            err.to_string(),
            "malformed dataset for library 'LIB1': drilldown 'X' has no parent"
        );
        assert_eq!(err.code(), 10);
        assert!(err.is_data_error());
    }

    #[test]
    fn test_io_is_not_data_error() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.code(), 60);
        assert!(!err.is_data_error());
    }
}
