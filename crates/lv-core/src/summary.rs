//! Machine-readable summaries printed by `lv inspect` and `lv validate`.

use lv_common::ReportData;
use lv_report::{ChartKind, PageFailure, PageState, ReportPlan};
use serde::Serialize;

/// One chart on a page.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSummary {
    pub container: String,
    pub kind: ChartKind,
    pub title: String,
}

/// One page of the report.
#[derive(Debug, Clone, Serialize)]
pub struct PageSummary {
    pub id: String,
    pub label: String,
    pub state: PageState,
    pub charts: Vec<ChartSummary>,
    /// Parent labels with a drilldown, in parent-pie order.
    pub drilldown_labels: Vec<String>,
    pub error: Option<PageFailure>,
}

/// Output of `lv inspect`.
#[derive(Debug, Clone, Serialize)]
pub struct InspectSummary {
    pub batch_id: String,
    pub title: String,
    pub initial_page: String,
    pub chart_count: usize,
    pub failed_pages: Vec<String>,
    pub pages: Vec<PageSummary>,
}

impl InspectSummary {
    /// Summarize `plan`, keeping only the page for `library` when given.
    ///
    /// Returns `None` when `library` names no page.
    pub fn from_plan(plan: &ReportPlan, library: Option<&str>) -> Option<Self> {
        let pages: Vec<PageSummary> = plan
            .pages
            .iter()
            .filter(|p| match library {
                Some(label) => p.state.label() == Some(label) && p.nav,
                None => true,
            })
            .map(|page| PageSummary {
                id: page.id.clone(),
                label: page.label.clone(),
                state: page.state.clone(),
                charts: page
                    .charts
                    .iter()
                    .map(|c| ChartSummary {
                        container: c.container.clone(),
                        kind: c.kind,
                        title: c.title.clone(),
                    })
                    .collect(),
                drilldown_labels: page
                    .drilldown
                    .as_ref()
                    .map(|d| d.labels.clone())
                    .unwrap_or_default(),
                error: page.error.clone(),
            })
            .collect();

        if library.is_some() && pages.is_empty() {
            return None;
        }

        Some(Self {
            batch_id: plan.batch_id.clone(),
            title: plan.title.clone(),
            initial_page: plan.initial_page.clone(),
            chart_count: pages.iter().map(|p| p.charts.len()).sum(),
            failed_pages: pages
                .iter()
                .filter(|p| p.error.is_some())
                .map(|p| p.label.clone())
                .collect(),
            pages,
        })
    }
}

/// Decode outcome for one library.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryValidation {
    pub library: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
}

/// Output of `lv validate`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationSummary {
    pub batch_id: String,
    pub library_count: usize,
    pub malformed: usize,
    pub libraries: Vec<LibraryValidation>,
}

impl ValidationSummary {
    pub fn from_data(data: &ReportData) -> Self {
        let libraries: Vec<LibraryValidation> = data
            .validate_all()
            .into_iter()
            .map(|(label, outcome)| match outcome {
                Ok(()) => LibraryValidation {
                    library: label.to_string(),
                    ok: true,
                    error: None,
                    code: None,
                },
                Err(e) => LibraryValidation {
                    library: label.to_string(),
                    ok: false,
                    error: Some(e.to_string()),
                    code: Some(e.code()),
                },
            })
            .collect();

        Self {
            batch_id: data.summary().batch_id.clone(),
            library_count: libraries.len(),
            malformed: libraries.iter().filter(|l| !l.ok).count(),
            libraries,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.malformed == 0
    }
}
