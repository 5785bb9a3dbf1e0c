//! Per-session category color table.
//!
//! Known regions always map to their fixed color. Any other label is assigned
//! the next palette entry the first time it is seen (`index = prior
//! assignments mod palette length`) and keeps it for the rest of the session.
//! The table only grows; nothing is ever reassigned.

use crate::color::Color;
use crate::error::ColorError;
use std::collections::HashMap;
use tracing::debug;

/// Catch-all category label.
pub const REGION_OTHER: &str = "Other";

/// Built-in fixed colors for the HIV-1 regions the TCS pipeline reports.
pub const DEFAULT_KNOWN_REGIONS: [(&str, Color); 6] = [
    ("PR", Color::rgb(0x4e, 0x79, 0xa7)),
    ("RT", Color::rgb(0xf2, 0x8e, 0x2b)),
    ("IN", Color::rgb(0xe1, 0x57, 0x59)),
    ("V1V3", Color::rgb(0x76, 0xb7, 0xb2)),
    ("P17", Color::rgb(0x59, 0xa1, 0x4f)),
    (REGION_OTHER, Color::rgb(0x9e, 0x9e, 0x9e)),
];

/// Built-in cycling palette for labels without a fixed color.
pub const DEFAULT_PALETTE: [Color; 10] = [
    Color::rgb(0x33, 0x66, 0xcc),
    Color::rgb(0xdc, 0x39, 0x12),
    Color::rgb(0xff, 0x99, 0x00),
    Color::rgb(0x10, 0x96, 0x18),
    Color::rgb(0x99, 0x00, 0x99),
    Color::rgb(0x00, 0x99, 0xc6),
    Color::rgb(0xdd, 0x44, 0x77),
    Color::rgb(0x66, 0xaa, 0x00),
    Color::rgb(0xb8, 0x2e, 0x2e),
    Color::rgb(0x31, 0x63, 0x95),
];

/// Label -> color mapping for one report session.
#[derive(Debug, Clone)]
pub struct ColorTable {
    known: HashMap<String, Color>,
    palette: Vec<Color>,
    assigned: HashMap<String, Color>,
}

impl ColorTable {
    /// Build a table from a fixed region table and a cycling palette.
    pub fn new<I, K>(known: I, palette: Vec<Color>) -> Result<Self, ColorError>
    where
        I: IntoIterator<Item = (K, Color)>,
        K: Into<String>,
    {
        if palette.is_empty() {
            return Err(ColorError::EmptyPalette);
        }
        Ok(Self {
            known: known.into_iter().map(|(k, c)| (k.into(), c)).collect(),
            palette,
            assigned: HashMap::new(),
        })
    }

    /// Color for `label`, assigning the next palette entry on first sight.
    pub fn color_for(&mut self, label: &str) -> Color {
        if let Some(color) = self.known.get(label) {
            return *color;
        }
        if let Some(color) = self.assigned.get(label) {
            return *color;
        }

        let index = self.assigned.len() % self.palette.len();
        let color = self.palette[index];
        self.assigned.insert(label.to_string(), color);
        debug!(label, color = %color, palette_index = index, "assigned palette color");
        color
    }

    /// Colors for a sequence of labels, in order.
    pub fn colors_for<'a, I>(&mut self, labels: I) -> Vec<Color>
    where
        I: IntoIterator<Item = &'a str>,
    {
        labels.into_iter().map(|l| self.color_for(l)).collect()
    }

    /// Look up a color without assigning one.
    pub fn peek(&self, label: &str) -> Option<Color> {
        self.known
            .get(label)
            .or_else(|| self.assigned.get(label))
            .copied()
    }

    /// Whether `label` has a fixed color.
    pub fn is_known(&self, label: &str) -> bool {
        self.known.contains_key(label)
    }

    /// Number of labels assigned from the palette so far.
    pub fn assigned_count(&self) -> usize {
        self.assigned.len()
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self {
            known: DEFAULT_KNOWN_REGIONS
                .iter()
                .map(|(k, c)| (k.to_string(), *c))
                .collect(),
            palette: DEFAULT_PALETTE.to_vec(),
            assigned: HashMap::new(),
        }
    }
}
