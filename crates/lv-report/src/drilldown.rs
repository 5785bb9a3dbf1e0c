//! Drilldown chart for the raw-sequence-analysis pie.
//!
//! The handler lives for one library page. It starts on the first drilldown
//! entry; selecting a pie slice whose label has an entry redraws the
//! drilldown chart with that entry's children, shaded from the parent's
//! color. Any other selection leaves the chart as it was.

use crate::chart::{Cell, ChartHandle, ChartKind, ChartOptions, Column, DataTable, LegendPosition};
use crate::context::{ChartStyle, PageCtx};
use crate::error::Result;
use crate::surface::region;
use lv_color::{shades, ColorTable};
use lv_common::Drilldown;
use tracing::{debug, info};

pub const DRILLDOWN_CONTAINER: &str = "drilldown-chart";

const TITLE_PREFIX: &str = "Raw Sequence Analysis";

/// Heading for the drilldown of `parent`.
pub fn drilldown_title(parent: &str) -> String {
    format!("{} > {}", TITLE_PREFIX, parent)
}

/// Result of a selection event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The drilldown was redrawn for this parent label.
    Rendered(String),
    /// No matching entry, or no drilldown on this page.
    Ignored,
    /// The redraw failed; the page shows the fallback message.
    Failed,
}

#[derive(Debug, Clone)]
pub struct DrilldownHandler {
    parent: ChartHandle,
    chart: ChartHandle,
    parent_labels: Vec<String>,
    entries: Vec<Drilldown>,
    current: usize,
}

impl DrilldownHandler {
    /// Draw the first entry under the `parent` pie and subscribe to its
    /// selection. With no entries the drilldown region is removed and
    /// `None` returned.
    pub fn mount(
        page: &mut PageCtx<'_>,
        parent: ChartHandle,
        parent_labels: Vec<String>,
        entries: Vec<Drilldown>,
    ) -> Result<Option<Self>> {
        let Some(first) = entries.first() else {
            page.surface.remove_region(region::DRILLDOWN)?;
            return Ok(None);
        };
        let (data, options) = drilldown_table(first, page.colors, page.style);
        let chart = page.chart(
            ChartKind::Column,
            region::DRILLDOWN,
            DRILLDOWN_CONTAINER,
            &data,
            &options,
        )?;
        page.engine.subscribe_select(parent)?;
        Ok(Some(Self {
            parent,
            chart,
            parent_labels,
            entries,
            current: 0,
        }))
    }

    /// The pie whose selection drives this handler.
    pub fn parent_chart(&self) -> ChartHandle {
        self.parent
    }

    pub fn chart(&self) -> ChartHandle {
        self.chart
    }

    pub fn current(&self) -> &Drilldown {
        &self.entries[self.current]
    }

    pub fn current_title(&self) -> String {
        drilldown_title(&self.current().label)
    }

    /// Parent labels that have a drilldown, in parent-pie order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.parent_labels
            .iter()
            .map(String::as_str)
            .filter(|label| self.entries.iter().any(|e| e.label == *label))
    }

    /// Parent slice label at `row`.
    pub fn label_at(&self, row: usize) -> Option<&str> {
        self.parent_labels.get(row).map(String::as_str)
    }

    /// Entry index a selection of `label` moves to; `None` keeps the
    /// current entry.
    pub fn resolve(&self, label: Option<&str>) -> Option<usize> {
        let label = label?;
        self.entries.iter().position(|e| e.label == label)
    }

    /// Handle a selection of parent row `row`.
    pub fn select_row(
        &mut self,
        row: Option<usize>,
        page: &mut PageCtx<'_>,
    ) -> Result<SelectionOutcome> {
        let label = row.and_then(|r| self.label_at(r)).map(str::to_string);
        self.select(label.as_deref(), page)
    }

    /// Handle a selection of the parent slice labelled `label`.
    pub fn select(
        &mut self,
        label: Option<&str>,
        page: &mut PageCtx<'_>,
    ) -> Result<SelectionOutcome> {
        let Some(index) = self.resolve(label) else {
            debug!(label = ?label, "Selection has no drilldown");
            return Ok(SelectionOutcome::Ignored);
        };
        let entry = &self.entries[index];
        let (data, options) = drilldown_table(entry, page.colors, page.style);
        page.engine.draw(self.chart, &data, &options)?;
        let title = drilldown_title(&entry.label);
        page.surface.set_title(DRILLDOWN_CONTAINER, &title)?;
        self.current = index;
        info!(parent = %entry.label, children = entry.data.len(), "Drilldown rendered");
        Ok(SelectionOutcome::Rendered(entry.label.clone()))
    }
}

/// Column chart of one entry's children, shaded from the parent's color.
pub fn drilldown_table(
    entry: &Drilldown,
    colors: &mut ColorTable,
    style: &ChartStyle,
) -> (DataTable, ChartOptions) {
    let base = colors.color_for(&entry.label);
    let palette = shades(base, entry.data.len());
    let mut data = DataTable::new(vec![
        Column::string("Region"),
        Column::number("Sequences"),
        Column::style(),
    ]);
    for ((label, count), color) in entry.data.iter().zip(palette) {
        data.push_row(vec![Cell::text(label.as_str()), Cell::from(*count), Cell::color(color)]);
    }
    let options = style
        .base(&drilldown_title(&entry.label))
        .with_legend(LegendPosition::None);
    (data, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartEngine;
    use crate::lifecycle::ChartRegistry;
    use crate::recorder::{RecordingEngine, RecordingSurface};
    use crate::surface::{PageTemplate, Surface};

    fn entries() -> Vec<Drilldown> {
        vec![
            Drilldown {
                label: "GeneralFilterFailed".into(),
                data: vec![("IN".into(), 143), ("PR".into(), 88)],
            },
            Drilldown {
                label: "NoMatch".into(),
                data: vec![("Unknown".into(), 270)],
            },
        ]
    }

    struct Rig {
        engine: RecordingEngine,
        surface: RecordingSurface,
        colors: ColorTable,
        registry: ChartRegistry,
        style: ChartStyle,
    }

    impl Rig {
        fn new() -> Self {
            let mut surface = RecordingSurface::new();
            surface.mount(PageTemplate::LibraryDetail).unwrap();
            Self {
                engine: RecordingEngine::new(),
                surface,
                colors: ColorTable::default(),
                registry: ChartRegistry::new(),
                style: ChartStyle::default(),
            }
        }

        fn page(&mut self) -> PageCtx<'_> {
            PageCtx {
                engine: &mut self.engine,
                surface: &mut self.surface,
                colors: &mut self.colors,
                registry: &mut self.registry,
                style: &self.style,
            }
        }
    }

    fn parent_labels() -> Vec<String> {
        vec!["Valid".into(), "GeneralFilterFailed".into(), "NoMatch".into()]
    }

    fn mounted(rig: &mut Rig) -> DrilldownHandler {
        let parent = rig.engine.create(ChartKind::Pie, "parent").unwrap();
        DrilldownHandler::mount(&mut rig.page(), parent, parent_labels(), entries())
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_resolve_is_exact_match() {
        let mut rig = Rig::new();
        let handler = mounted(&mut rig);
        assert_eq!(handler.resolve(Some("NoMatch")), Some(1));
        assert_eq!(handler.resolve(Some("nomatch")), None);
        assert_eq!(handler.resolve(Some("Valid")), None);
        assert_eq!(handler.resolve(None), None);
    }

    #[test]
    fn test_labels_follow_parent_pie_order() {
        let mut rig = Rig::new();
        let parent = rig.engine.create(ChartKind::Pie, "parent").unwrap();
        let pie = vec!["NoMatch".into(), "Valid".into(), "GeneralFilterFailed".into()];
        let handler = DrilldownHandler::mount(&mut rig.page(), parent, pie, entries())
            .unwrap()
            .unwrap();
        let labels: Vec<&str> = handler.labels().collect();
        assert_eq!(labels, vec!["NoMatch", "GeneralFilterFailed"]);
    }

    #[test]
    fn test_mount_draws_first_entry() {
        let mut rig = Rig::new();
        let handler = mounted(&mut rig);
        assert_eq!(handler.current().label, "GeneralFilterFailed");
        let record = rig.engine.chart(handler.chart()).unwrap();
        assert_eq!(record.kind, ChartKind::Column);
        assert_eq!(record.data.as_ref().unwrap().row_count(), 2);
        assert!(rig.engine.chart(handler.parent_chart()).unwrap().select_listener);
        assert_eq!(
            rig.surface.container(DRILLDOWN_CONTAINER).unwrap().title,
            "Raw Sequence Analysis > GeneralFilterFailed"
        );
        assert_eq!(rig.registry.len(), 1);
    }

    #[test]
    fn test_mount_without_entries_removes_region() {
        let mut rig = Rig::new();
        let parent = rig.engine.create(ChartKind::Pie, "parent").unwrap();
        let handler =
            DrilldownHandler::mount(&mut rig.page(), parent, parent_labels(), Vec::new()).unwrap();
        assert!(handler.is_none());
        assert!(!rig.surface.has_region(region::DRILLDOWN));
        assert!(rig.registry.is_empty());
    }

    #[test]
    fn test_select_row_switches_entry() {
        let mut rig = Rig::new();
        let mut handler = mounted(&mut rig);
        let outcome = handler.select_row(Some(2), &mut rig.page()).unwrap();
        assert_eq!(outcome, SelectionOutcome::Rendered("NoMatch".into()));
        assert_eq!(handler.current().label, "NoMatch");
        let record = rig.engine.chart(handler.chart()).unwrap();
        assert_eq!(record.draws, 2);
        assert_eq!(record.data.as_ref().unwrap().label_at(0), Some("Unknown"));
        assert_eq!(
            rig.surface.container(DRILLDOWN_CONTAINER).unwrap().title,
            "Raw Sequence Analysis > NoMatch"
        );
    }

    #[test]
    fn test_unmatched_selection_keeps_chart() {
        let mut rig = Rig::new();
        let mut handler = mounted(&mut rig);
        let before = rig.engine.chart(handler.chart()).unwrap().clone();

        for row in [Some(0), Some(99), None] {
            let outcome = handler.select_row(row, &mut rig.page()).unwrap();
            assert_eq!(outcome, SelectionOutcome::Ignored);
        }

        let after = rig.engine.chart(handler.chart()).unwrap();
        assert_eq!(after.draws, before.draws);
        assert_eq!(after.data, before.data);
        assert_eq!(handler.current().label, "GeneralFilterFailed");
    }

    #[test]
    fn test_shades_follow_parent_color() {
        let mut colors = ColorTable::default();
        let (data, _) = drilldown_table(&entries()[0], &mut colors, &ChartStyle::default());
        let parent = colors.color_for("GeneralFilterFailed");
        let expected = shades(parent, 2);
        assert_eq!(data.rows[0][2], Cell::color(expected[0]));
        assert_eq!(data.rows[1][2], Cell::color(expected[1]));
    }

    #[test]
    fn test_failed_redraw_keeps_current() {
        let mut rig = Rig::new();
        let mut handler = mounted(&mut rig);
        rig.engine.fail_draws_in(DRILLDOWN_CONTAINER);
        assert!(handler.select(Some("NoMatch"), &mut rig.page()).is_err());
        assert_eq!(handler.current().label, "GeneralFilterFailed");
    }
}
