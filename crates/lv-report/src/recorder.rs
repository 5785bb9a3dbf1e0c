//! In-memory [`ChartEngine`] and [`Surface`] implementations.
//!
//! The static report generator drives the page controller against these and
//! serializes what they recorded; tests use them as the fake charting engine.

use crate::chart::{ChartEngine, ChartEngineError, ChartHandle, ChartKind, ChartOptions, DataTable};
use crate::surface::{NavEntry, PageTemplate, Surface, SurfaceError};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

// ============================================================================
// Chart engine
// ============================================================================

/// One live chart as last drawn.
#[derive(Debug, Clone, Serialize)]
pub struct ChartRecord {
    pub handle: ChartHandle,
    pub kind: ChartKind,
    pub container: String,
    pub data: Option<DataTable>,
    pub options: Option<ChartOptions>,
    pub draws: u32,
    pub select_listener: bool,
}

#[derive(Debug, Default)]
pub struct RecordingEngine {
    next_id: u64,
    live: BTreeMap<ChartHandle, ChartRecord>,
    selections: HashMap<ChartHandle, usize>,
    missing_containers: HashSet<String>,
    failing_draws: HashSet<String>,
    failing_teardowns: HashSet<String>,
    disposed: usize,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create` fail for `container`.
    pub fn missing_container(&mut self, container: impl Into<String>) {
        self.missing_containers.insert(container.into());
    }

    /// Make `draw` fail for charts in `container`.
    pub fn fail_draws_in(&mut self, container: impl Into<String>) {
        self.failing_draws.insert(container.into());
    }

    /// Make `clear` and `remove_listeners` fail for charts in `container`.
    pub fn fail_teardown_in(&mut self, container: impl Into<String>) {
        self.failing_teardowns.insert(container.into());
    }

    /// Set the row a subsequent `selection` query reports; `None` clears it.
    pub fn set_selection(&mut self, chart: ChartHandle, row: Option<usize>) {
        match row {
            Some(r) => self.selections.insert(chart, r),
            None => self.selections.remove(&chart),
        };
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Charts disposed through `clear` so far.
    pub fn disposed_count(&self) -> usize {
        self.disposed
    }

    pub fn chart(&self, handle: ChartHandle) -> Option<&ChartRecord> {
        self.live.get(&handle)
    }

    /// Live chart bound to `container`.
    pub fn chart_in(&self, container: &str) -> Option<&ChartRecord> {
        self.live.values().find(|r| r.container == container)
    }

    /// Live charts in creation order.
    pub fn charts(&self) -> impl Iterator<Item = &ChartRecord> {
        self.live.values()
    }

    fn record_mut(&mut self, chart: ChartHandle) -> Result<&mut ChartRecord, ChartEngineError> {
        self.live
            .get_mut(&chart)
            .ok_or(ChartEngineError::UnknownChart(chart))
    }

    fn check_teardown(&self, chart: ChartHandle) -> Result<(), ChartEngineError> {
        let record = self
            .live
            .get(&chart)
            .ok_or(ChartEngineError::UnknownChart(chart))?;
        if self.failing_teardowns.contains(&record.container) {
            return Err(ChartEngineError::Backend(format!(
                "teardown rejected for '{}'",
                record.container
            )));
        }
        Ok(())
    }
}

impl ChartEngine for RecordingEngine {
    fn create(&mut self, kind: ChartKind, container: &str) -> Result<ChartHandle, ChartEngineError> {
        if self.missing_containers.contains(container) {
            return Err(ChartEngineError::MissingContainer(container.to_string()));
        }
        self.next_id += 1;
        let handle = ChartHandle(self.next_id);
        self.live.insert(
            handle,
            ChartRecord {
                handle,
                kind,
                container: container.to_string(),
                data: None,
                options: None,
                draws: 0,
                select_listener: false,
            },
        );
        Ok(handle)
    }

    fn draw(
        &mut self,
        chart: ChartHandle,
        data: &DataTable,
        options: &ChartOptions,
    ) -> Result<(), ChartEngineError> {
        let fail = self
            .live
            .get(&chart)
            .is_some_and(|r| self.failing_draws.contains(&r.container));
        data.check_shape()
            .map_err(|reason| ChartEngineError::InvalidData { chart, reason })?;
        let record = self.record_mut(chart)?;
        if fail {
            return Err(ChartEngineError::Backend(format!(
                "draw rejected for '{}'",
                record.container
            )));
        }
        record.data = Some(data.clone());
        record.options = Some(options.clone());
        record.draws += 1;
        Ok(())
    }

    fn clear(&mut self, chart: ChartHandle) -> Result<(), ChartEngineError> {
        self.check_teardown(chart)?;
        self.live.remove(&chart);
        self.selections.remove(&chart);
        self.disposed += 1;
        Ok(())
    }

    fn remove_listeners(&mut self, chart: ChartHandle) -> Result<(), ChartEngineError> {
        self.check_teardown(chart)?;
        self.record_mut(chart)?.select_listener = false;
        Ok(())
    }

    fn subscribe_select(&mut self, chart: ChartHandle) -> Result<(), ChartEngineError> {
        self.record_mut(chart)?.select_listener = true;
        Ok(())
    }

    fn selection(&self, chart: ChartHandle) -> Option<usize> {
        self.selections.get(&chart).copied()
    }
}

// ============================================================================
// Surface
// ============================================================================

/// A titled chart container inside a mounted region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerRecord {
    pub region: String,
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordingSurface {
    pub navigation: Vec<NavEntry>,
    pub template: Option<PageTemplate>,
    pub texts: BTreeMap<String, String>,
    pub regions: Vec<String>,
    pub containers: Vec<ContainerRecord>,
    pub error: Option<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self, slot: &str) -> Option<&str> {
        self.texts.get(slot).map(String::as_str)
    }

    pub fn has_region(&self, region: &str) -> bool {
        self.regions.iter().any(|r| r == region)
    }

    pub fn container(&self, id: &str) -> Option<&ContainerRecord> {
        self.containers.iter().find(|c| c.id == id)
    }

    /// Label of the active navigation entry.
    pub fn active_nav(&self) -> Option<&str> {
        self.navigation
            .iter()
            .find(|e| e.active)
            .map(|e| e.label.as_str())
    }

    fn mounted(&self) -> Result<PageTemplate, SurfaceError> {
        self.template.ok_or(SurfaceError::NotMounted)
    }
}

impl Surface for RecordingSurface {
    fn render_navigation(&mut self, entries: &[NavEntry]) {
        self.navigation = entries.to_vec();
    }

    fn clear_content(&mut self) {
        self.template = None;
        self.texts.clear();
        self.regions.clear();
        self.containers.clear();
    }

    fn mount(&mut self, template: PageTemplate) -> Result<(), SurfaceError> {
        self.clear_content();
        self.template = Some(template);
        self.regions = template.regions().iter().map(|r| r.to_string()).collect();
        Ok(())
    }

    fn set_text(&mut self, slot: &str, text: &str) -> Result<(), SurfaceError> {
        if !self.mounted()?.slots().contains(&slot) {
            return Err(SurfaceError::MissingSlot(slot.to_string()));
        }
        self.texts.insert(slot.to_string(), text.to_string());
        Ok(())
    }

    fn add_container(&mut self, region: &str, id: &str, title: &str) -> Result<(), SurfaceError> {
        self.mounted()?;
        if !self.has_region(region) {
            return Err(SurfaceError::MissingRegion(region.to_string()));
        }
        if self.container(id).is_some() {
            return Err(SurfaceError::DuplicateContainer(id.to_string()));
        }
        self.containers.push(ContainerRecord {
            region: region.to_string(),
            id: id.to_string(),
            title: title.to_string(),
        });
        Ok(())
    }

    fn set_title(&mut self, container: &str, title: &str) -> Result<(), SurfaceError> {
        let record = self
            .containers
            .iter_mut()
            .find(|c| c.id == container)
            .ok_or_else(|| SurfaceError::MissingContainer(container.to_string()))?;
        record.title = title.to_string();
        Ok(())
    }

    fn remove_region(&mut self, region: &str) -> Result<(), SurfaceError> {
        self.mounted()?;
        if !self.has_region(region) {
            return Err(SurfaceError::MissingRegion(region.to_string()));
        }
        self.regions.retain(|r| r != region);
        self.containers.retain(|c| c.region != region);
        Ok(())
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn clear_error(&mut self) {
        self.error = None;
    }
}
