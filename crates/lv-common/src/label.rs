//! Library labels.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Label of one sequenced library (e.g. `"RV95"`).
///
/// Always non-empty; unique within a report because it keys the library map.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LibraryLabel(String);

impl LibraryLabel {
    /// Parse a label, rejecting empty or whitespace-only strings.
    pub fn parse(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(Error::InvalidLabel("library label must not be empty".to_string()));
        }
        Ok(LibraryLabel(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LibraryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LibraryLabel {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        LibraryLabel::parse(s)
    }
}

impl From<LibraryLabel> for String {
    fn from(label: LibraryLabel) -> Self {
        label.0
    }
}

impl AsRef<str> for LibraryLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LibraryLabel {
    fn borrow(&self) -> &str {
        &self.0
    }
}
