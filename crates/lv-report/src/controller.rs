//! Page controller: navigation state machine over the report pages.
//!
//! Every navigation tears down the live charts, clears the error slot,
//! records the target, builds the page and rebuilds the navigation list.
//! Page build failures never escape [`PageController::navigate`]: they are
//! logged and the fallback message is shown, so the remaining pages stay
//! reachable.

use crate::chart::{ChartEngine, ChartHandle};
use crate::config::ReportConfig;
use crate::context::{ChartStyle, EngineContext, PageCtx};
use crate::drilldown::{DrilldownHandler, SelectionOutcome};
use crate::error::{ErrorKind, ReportError, Result};
use crate::lifecycle::ChartRegistry;
use crate::pages::{library, overview};
use crate::surface::{NavEntry, Surface};
use lv_color::ColorTable;
use lv_common::ReportData;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info, warn};

pub const OVERVIEW_LABEL: &str = "Overview";

/// Which page is shown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "page", content = "library", rename_all = "snake_case")]
pub enum PageState {
    Overview,
    LibraryDetail(String),
}

impl PageState {
    pub fn library(label: impl Into<String>) -> Self {
        PageState::LibraryDetail(label.into())
    }

    /// Library label, `None` for the overview.
    pub fn label(&self) -> Option<&str> {
        match self {
            PageState::Overview => None,
            PageState::LibraryDetail(l) => Some(l),
        }
    }

    /// Text of the navigation entry for this page.
    pub fn nav_label(&self) -> &str {
        self.label().unwrap_or(OVERVIEW_LABEL)
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageState::Overview => write!(f, "overview"),
            PageState::LibraryDetail(l) => write!(f, "library:{}", l),
        }
    }
}

/// Why a page did not build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFailure {
    pub kind: ErrorKind,
    pub detail: String,
}

impl From<&ReportError> for PageFailure {
    fn from(e: &ReportError) -> Self {
        Self {
            kind: e.kind(),
            detail: e.to_string(),
        }
    }
}

/// Result of one navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationOutcome {
    pub state: PageState,
    /// Live charts after the navigation.
    pub charts: usize,
    pub error: Option<PageFailure>,
}

impl NavigationOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

pub struct PageController<'d, E, S> {
    data: &'d ReportData,
    engine: E,
    surface: S,
    ctx: EngineContext,
    style: ChartStyle,
    fallback_message: String,
    initial: PageState,
    state: PageState,
    drilldown: Option<DrilldownHandler>,
}

impl<'d, E: ChartEngine, S: Surface> PageController<'d, E, S> {
    /// Create a controller. Nothing is drawn until [`start`](Self::start)
    /// or [`navigate`](Self::navigate).
    pub fn new(data: &'d ReportData, engine: E, surface: S, config: &ReportConfig) -> Result<Self> {
        config.validate().map_err(ReportError::InvalidConfig)?;
        let colors = config.colors.build_table()?;
        let initial = match &config.default_library {
            Some(label) => {
                if !data.contains(label) {
                    warn!(library = %label, "Default library is not in the report");
                }
                PageState::library(label.as_str())
            }
            None => PageState::Overview,
        };
        Ok(Self {
            data,
            engine,
            surface,
            ctx: EngineContext::new(colors),
            style: ChartStyle {
                animation: config.animation.to_animation(),
            },
            fallback_message: config.fallback_message.clone(),
            state: initial.clone(),
            initial,
            drilldown: None,
        })
    }

    /// Show the initial page.
    pub fn start(&mut self) -> NavigationOutcome {
        self.navigate(self.initial.clone())
    }

    /// Rebuild the current page, as on a viewport resize.
    pub fn resize(&mut self) -> NavigationOutcome {
        self.navigate(self.state.clone())
    }

    pub fn navigate(&mut self, target: PageState) -> NavigationOutcome {
        info!(page = %target, "Navigating");

        self.ctx.registry.teardown_all(&mut self.engine);
        self.drilldown = None;
        self.surface.clear_error();
        self.surface.clear_content();
        self.state = target.clone();

        let error = match self.build_page(&target) {
            Ok(drilldown) => {
                self.drilldown = drilldown;
                None
            }
            Err(e) => {
                error!(page = %target, kind = %e.kind(), error = %e, "Page failed to build");
                self.surface.show_error(&self.fallback_message);
                Some(PageFailure::from(&e))
            }
        };

        let entries = self.navigation_entries();
        self.surface.render_navigation(&entries);

        let charts = self.ctx.registry.len();
        info!(page = %target, charts, failed = error.is_some(), "Navigation complete");
        NavigationOutcome {
            state: target,
            charts,
            error,
        }
    }

    /// Route a selection event from `chart` to the drilldown handler.
    pub fn handle_select(&mut self, chart: ChartHandle) -> SelectionOutcome {
        let Some(mut handler) = self.drilldown.take() else {
            return SelectionOutcome::Ignored;
        };
        let outcome = if handler.parent_chart() == chart {
            let row = self.engine.selection(chart);
            let result = handler.select_row(row, &mut self.page_ctx());
            self.settle_selection(result)
        } else {
            SelectionOutcome::Ignored
        };
        self.drilldown = Some(handler);
        outcome
    }

    /// Select the parent slice labelled `label` directly.
    pub fn select_drilldown(&mut self, label: &str) -> SelectionOutcome {
        let Some(mut handler) = self.drilldown.take() else {
            return SelectionOutcome::Ignored;
        };
        let result = handler.select(Some(label), &mut self.page_ctx());
        let outcome = self.settle_selection(result);
        self.drilldown = Some(handler);
        outcome
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn initial_state(&self) -> &PageState {
        &self.initial
    }

    pub fn data(&self) -> &'d ReportData {
        self.data
    }

    pub fn registry(&self) -> &ChartRegistry {
        &self.ctx.registry
    }

    pub fn colors(&self) -> &ColorTable {
        &self.ctx.colors
    }

    pub fn drilldown(&self) -> Option<&DrilldownHandler> {
        self.drilldown.as_ref()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn fallback_message(&self) -> &str {
        &self.fallback_message
    }

    /// Every page in navigation order: overview, then libraries.
    pub fn pages(&self) -> Vec<PageState> {
        std::iter::once(PageState::Overview)
            .chain(
                self.data
                    .library_labels()
                    .map(|l| PageState::library(l.as_str())),
            )
            .collect()
    }

    fn build_page(&mut self, target: &PageState) -> Result<Option<DrilldownHandler>> {
        let data = self.data;
        match target {
            PageState::Overview => {
                overview::build(&mut self.page_ctx(), data.summary())?;
                Ok(None)
            }
            PageState::LibraryDetail(label) => {
                if !data.contains(label) {
                    return Err(ReportError::UnknownNavigationTarget(label.clone()));
                }
                let report = data.library(label)?;
                library::build(&mut self.page_ctx(), label, &report)
            }
        }
    }

    fn navigation_entries(&self) -> Vec<NavEntry> {
        self.pages()
            .into_iter()
            .map(|target| NavEntry {
                label: target.nav_label().to_string(),
                active: target == self.state,
                target,
            })
            .collect()
    }

    fn settle_selection(&mut self, result: Result<SelectionOutcome>) -> SelectionOutcome {
        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(page = %self.state, kind = %e.kind(), error = %e, "Drilldown failed to render");
                self.surface.show_error(&self.fallback_message);
                SelectionOutcome::Failed
            }
        }
    }

    fn page_ctx(&mut self) -> PageCtx<'_> {
        PageCtx {
            engine: &mut self.engine,
            surface: &mut self.surface,
            colors: &mut self.ctx.colors,
            registry: &mut self.ctx.registry,
            style: &self.style,
        }
    }
}
