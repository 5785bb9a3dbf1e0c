//! Live chart registry.

use crate::chart::{ChartEngine, ChartHandle};
use tracing::{debug, warn};

/// Ordered set of chart instances currently on the page.
#[derive(Debug, Default)]
pub struct ChartRegistry {
    live: Vec<ChartHandle>,
}

/// Result of one [`ChartRegistry::teardown_all`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeardownSummary {
    pub released: usize,
    pub failed: usize,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, chart: ChartHandle) {
        debug!(chart = %chart, live = self.live.len() + 1, "Chart registered");
        self.live.push(chart);
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn handles(&self) -> &[ChartHandle] {
        &self.live
    }

    pub fn contains(&self, chart: ChartHandle) -> bool {
        self.live.contains(&chart)
    }

    /// Detach and clear every registered chart, then empty the registry.
    ///
    /// A chart whose teardown fails is logged and skipped; the remaining
    /// charts are still torn down and the registry always ends empty.
    pub fn teardown_all(&mut self, engine: &mut dyn ChartEngine) -> TeardownSummary {
        let mut summary = TeardownSummary::default();
        for chart in std::mem::take(&mut self.live) {
            let detached = engine.remove_listeners(chart);
            if let Err(e) = &detached {
                warn!(chart = %chart, error = %e, "Failed to detach chart listeners");
            }
            match engine.clear(chart) {
                Ok(()) if detached.is_ok() => summary.released += 1,
                Ok(()) => summary.failed += 1,
                Err(e) => {
                    warn!(chart = %chart, error = %e, "Failed to clear chart");
                    summary.failed += 1;
                }
            }
        }
        if summary.released + summary.failed > 0 {
            debug!(
                released = summary.released,
                failed = summary.failed,
                "Chart registry torn down"
            );
        }
        summary
    }
}
