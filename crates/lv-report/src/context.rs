//! Session state shared by every page, and the per-build page context.

use crate::chart::{Animation, ChartEngine, ChartHandle, ChartKind, ChartOptions, DataTable};
use crate::error::Result;
use crate::lifecycle::ChartRegistry;
use crate::surface::Surface;
use lv_color::ColorTable;
use tracing::debug;

/// State that outlives a single page: colors and live charts.
#[derive(Debug)]
pub struct EngineContext {
    pub colors: ColorTable,
    pub registry: ChartRegistry,
}

impl EngineContext {
    pub fn new(colors: ColorTable) -> Self {
        Self {
            colors,
            registry: ChartRegistry::new(),
        }
    }
}

/// Options every chart starts from.
#[derive(Debug, Clone, Default)]
pub struct ChartStyle {
    pub animation: Option<Animation>,
}

impl ChartStyle {
    pub fn base(&self, title: &str) -> ChartOptions {
        ChartOptions {
            title: Some(title.to_string()),
            animation: self.animation.clone(),
            ..ChartOptions::default()
        }
    }
}

/// Everything a page builder writes through.
pub struct PageCtx<'a> {
    pub engine: &'a mut dyn ChartEngine,
    pub surface: &'a mut dyn Surface,
    pub colors: &'a mut ColorTable,
    pub registry: &'a mut ChartRegistry,
    pub style: &'a ChartStyle,
}

impl PageCtx<'_> {
    /// Add a container to `region`, create a chart in it and draw.
    ///
    /// The chart is registered before drawing so a failed draw is still
    /// torn down on the next navigation.
    pub fn chart(
        &mut self,
        kind: ChartKind,
        region: &str,
        container: &str,
        data: &DataTable,
        options: &ChartOptions,
    ) -> Result<ChartHandle> {
        let title = options.title.as_deref().unwrap_or_default();
        self.surface.add_container(region, container, title)?;
        let chart = self.engine.create(kind, container)?;
        self.registry.register(chart);
        self.engine.draw(chart, data, options)?;
        debug!(
            chart = %chart,
            kind = %kind,
            container,
            rows = data.row_count(),
            "Chart drawn"
        );
        Ok(chart)
    }
}
