//! Charting capability contract.
//!
//! The engine never talks to a concrete charting library. Page builders
//! produce a [`DataTable`] plus [`ChartOptions`] and hand them to a
//! [`ChartEngine`], which owns the live chart instances. Both types
//! serialize to the literals Google Charts consumes
//! (`arrayToDataTable` input and a draw-options object).

use lv_color::Color;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Chart kinds and handles
// ============================================================================

/// Supported chart kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Column,
    Bar,
    /// Scatter and line series overlaid on one axis.
    Combo,
}

impl ChartKind {
    /// `google.visualization` class name.
    pub fn class_name(&self) -> &'static str {
        match self {
            ChartKind::Pie => "PieChart",
            ChartKind::Column => "ColumnChart",
            ChartKind::Bar => "BarChart",
            ChartKind::Combo => "ComboChart",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChartKind::Pie => "pie",
            ChartKind::Column => "column",
            ChartKind::Bar => "bar",
            ChartKind::Combo => "combo",
        };
        f.write_str(s)
    }
}

/// Opaque handle to a live chart instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartHandle(pub u64);

impl fmt::Display for ChartHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chart#{}", self.0)
    }
}

// ============================================================================
// Tabular data
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
}

/// Column role; role columns annotate the preceding data column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    Style,
    Annotation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ColumnType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ColumnRole>,
}

impl Column {
    pub fn string(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: ColumnType::String,
            role: None,
        }
    }

    pub fn number(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: ColumnType::Number,
            role: None,
        }
    }

    /// Per-row style column (`"color: #rrggbb"` cells).
    pub fn style() -> Self {
        Self {
            label: String::new(),
            kind: ColumnType::String,
            role: Some(ColumnRole::Style),
        }
    }

    fn header(&self) -> Value {
        match self.role {
            Some(role) => json!({ "role": role, "type": self.kind }),
            None => json!({ "label": self.label, "type": self.kind }),
        }
    }
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// Style cell carrying a bar/column color.
    pub fn color(c: Color) -> Self {
        Cell::Text(format!("color: {}", c))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<u64> for Cell {
    fn from(n: u64) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<u32> for Cell {
    fn from(n: u32) -> Self {
        Cell::Number(f64::from(n))
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map_or(Cell::Null, Into::into)
    }
}

/// Header plus data rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
}

impl DataTable {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a two-column `(label, count)` table.
    pub fn from_counts<'a, I>(label: &str, value: &str, rows: I) -> Self
    where
        I: IntoIterator<Item = &'a (String, u64)>,
    {
        let mut table = Self::new(vec![Column::string(label), Column::number(value)]);
        for (l, n) in rows {
            table.push_row(vec![Cell::text(l.as_str()), Cell::from(*n)]);
        }
        table
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Text of the first cell in `row`, the category label for every
    /// table the page builders produce.
    pub fn label_at(&self, row: usize) -> Option<&str> {
        self.rows.get(row)?.first()?.as_text()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter_map(|r| r.first().and_then(Cell::as_text))
    }

    /// Sum of the numeric cells in column `col`.
    pub fn column_total(&self, col: usize) -> f64 {
        self.rows
            .iter()
            .filter_map(|r| r.get(col).and_then(Cell::as_number))
            .sum()
    }

    /// Check every row matches the header width.
    pub fn check_shape(&self) -> Result<(), String> {
        if self.columns.is_empty() {
            return Err("table has no columns".to_string());
        }
        let width = self.columns.len();
        match self.rows.iter().position(|r| r.len() != width) {
            Some(i) => Err(format!(
                "row {} has {} cells, header has {}",
                i,
                self.rows[i].len(),
                width
            )),
            None => Ok(()),
        }
    }

    /// `arrayToDataTable` literal: header row followed by data rows.
    pub fn to_literal(&self) -> Value {
        let mut out = Vec::with_capacity(self.rows.len() + 1);
        out.push(Value::Array(self.columns.iter().map(Column::header).collect()));
        for row in &self.rows {
            out.push(json!(row));
        }
        Value::Array(out)
    }
}

// ============================================================================
// Draw options
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    #[default]
    Right,
    Bottom,
    Top,
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub position: LegendPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewWindow {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub log_scale: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_window: Option<ViewWindow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesType {
    Line,
    Bars,
}

/// Per-series override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesOptions {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SeriesType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<u32>,
}

impl SeriesOptions {
    /// Points only.
    pub fn scatter(color: Color) -> Self {
        Self {
            kind: Some(SeriesType::Line),
            color: Some(color),
            point_size: Some(5),
            line_width: Some(0),
        }
    }

    pub fn line(color: Color) -> Self {
        Self {
            kind: Some(SeriesType::Line),
            color: Some(color),
            point_size: Some(0),
            line_width: Some(2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub duration: u32,
    pub easing: String,
    pub startup: bool,
}

/// Draw options; field names follow the Google Charts option keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub legend: Legend,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v_axis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h_axis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_type: Option<SeriesType>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub series: BTreeMap<usize, SeriesOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pie_slice_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
}

impl ChartOptions {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_legend(mut self, position: LegendPosition) -> Self {
        self.legend.position = position;
        self
    }

    pub fn with_colors(mut self, colors: Vec<Color>) -> Self {
        self.colors = colors;
        self
    }
}

// ============================================================================
// Engine capability
// ============================================================================

/// Errors raised by a [`ChartEngine`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartEngineError {
    #[error("{0} is not a live chart")]
    UnknownChart(ChartHandle),

    #[error("container '{0}' does not exist")]
    MissingContainer(String),

    #[error("cannot draw {chart}: {reason}")]
    InvalidData { chart: ChartHandle, reason: String },

    #[error("chart backend error: {0}")]
    Backend(String),
}

/// A charting backend that owns live chart instances.
pub trait ChartEngine {
    /// Construct a chart bound to `container`.
    fn create(&mut self, kind: ChartKind, container: &str) -> Result<ChartHandle, ChartEngineError>;

    /// Draw (or redraw) `chart` with `data` and `options`.
    fn draw(
        &mut self,
        chart: ChartHandle,
        data: &DataTable,
        options: &ChartOptions,
    ) -> Result<(), ChartEngineError>;

    /// Clear rendered content and dispose of the instance.
    fn clear(&mut self, chart: ChartHandle) -> Result<(), ChartEngineError>;

    /// Detach every event listener from `chart`.
    fn remove_listeners(&mut self, chart: ChartHandle) -> Result<(), ChartEngineError>;

    /// Subscribe the engine's selection event for `chart`.
    fn subscribe_select(&mut self, chart: ChartHandle) -> Result<(), ChartEngineError>;

    /// Currently selected row of `chart`, if any.
    fn selection(&self, chart: ChartHandle) -> Option<usize>;
}
