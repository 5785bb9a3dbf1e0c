//! Color parsing and table construction errors.

use thiserror::Error;

/// Errors raised while parsing colors or building a [`crate::ColorTable`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// String is not a `#rrggbb` or `#rgb` hex color.
    #[error("invalid hex color '{0}'")]
    InvalidHex(String),

    /// The cycling palette has no entries.
    #[error("color palette must contain at least one color")]
    EmptyPalette,
}
