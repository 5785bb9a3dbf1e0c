//! Category coloring for TCS log reports.
//!
//! - [`ColorTable`]: stable label -> color assignment for one report session
//! - [`shades`]: lighter tonal variants of a base color for drilldown and overlay charts
//! - [`Color`] / [`Hsl`]: hex RGB and hue/saturation/lightness representations

pub mod color;
pub mod error;
pub mod hsl;
pub mod shade;
pub mod table;

pub use color::Color;
pub use error::ColorError;
pub use hsl::Hsl;
pub use shade::{shades, MAX_LIGHTEN};
pub use table::{ColorTable, DEFAULT_KNOWN_REGIONS, DEFAULT_PALETTE, REGION_OTHER};
