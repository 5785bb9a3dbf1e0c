//! Single-file HTML report generation.
//!
//! The generator drives a [`PageController`] over every page against the
//! in-memory recorder, snapshots what each page drew and embeds the
//! snapshots in one HTML document. A small script replays them through
//! Google Charts with the same navigation, resize and drilldown behavior.

use crate::chart::{ChartKind, ChartOptions};
use crate::config::ReportConfig;
use crate::controller::{PageController, PageFailure, PageState};
use crate::error::Result;
use crate::recorder::{RecordingEngine, RecordingSurface};
use crate::surface::{slot, PageTemplate};

use chrono::{DateTime, Utc};
use lv_common::ReportData;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Everything the page script needs, one entry per page.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPlan {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub generator_version: String,
    pub batch_id: String,
    /// Page id shown on load.
    pub initial_page: String,
    pub fallback_message: String,
    pub pages: Vec<PageSnapshot>,
}

impl ReportPlan {
    pub fn page(&self, id: &str) -> Option<&PageSnapshot> {
        self.pages.iter().find(|p| p.id == id)
    }

    pub fn page_for(&self, state: &PageState) -> Option<&PageSnapshot> {
        self.pages.iter().find(|p| &p.state == state)
    }

    pub fn failed_pages(&self) -> impl Iterator<Item = &PageSnapshot> {
        self.pages.iter().filter(|p| p.error.is_some())
    }

    pub fn chart_count(&self) -> usize {
        self.pages.iter().map(|p| p.charts.len()).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageSnapshot {
    pub id: String,
    pub label: String,
    pub state: PageState,
    /// Listed in the navigation control.
    pub nav: bool,
    pub template: Option<PageTemplate>,
    pub texts: Vec<TextSnapshot>,
    pub regions: Vec<String>,
    pub charts: Vec<ChartSnapshot>,
    pub drilldown: Option<DrilldownSnapshot>,
    pub error: Option<PageFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextSnapshot {
    pub slot: String,
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartSnapshot {
    pub container: String,
    pub region: String,
    pub title: String,
    pub kind: ChartKind,
    pub class_name: String,
    /// `arrayToDataTable` literal.
    pub data: Value,
    pub options: ChartOptions,
}

/// Every drilldown variant of one page, keyed by parent label.
#[derive(Debug, Clone, Serialize)]
pub struct DrilldownSnapshot {
    pub parent_container: String,
    pub container: String,
    pub initial: String,
    /// Parent labels with a drilldown, in parent-pie order.
    pub labels: Vec<String>,
    pub variants: BTreeMap<String, DrilldownVariant>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DrilldownVariant {
    pub title: String,
    pub data: Value,
    pub options: ChartOptions,
}

type Recorder<'d> = PageController<'d, RecordingEngine, RecordingSurface>;

/// Report generator.
pub struct ReportGenerator {
    config: ReportConfig,
}

impl ReportGenerator {
    /// Create a new report generator with configuration.
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Create a generator with default configuration.
    pub fn default_config() -> Self {
        Self::new(ReportConfig::default())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Build every page headlessly and snapshot the result.
    pub fn plan(&self, data: &ReportData) -> Result<ReportPlan> {
        let mut controller = PageController::new(
            data,
            RecordingEngine::new(),
            RecordingSurface::new(),
            &self.config,
        )?;

        let mut pages = Vec::new();
        for (i, state) in controller.pages().into_iter().enumerate() {
            let id = match state {
                PageState::Overview => "overview".to_string(),
                PageState::LibraryDetail(_) => format!("library-{}", i - 1),
            };
            pages.push(snapshot(&mut controller, id, state, true));
        }

        let initial = controller.initial_state().clone();
        let initial_page = match pages.iter().find(|p| p.state == initial) {
            Some(page) => page.id.clone(),
            None => {
                warn!(page = %initial, "Initial page is not in the report");
                pages.push(snapshot(&mut controller, "initial".to_string(), initial, false));
                "initial".to_string()
            }
        };

        let summary = data.summary();
        let plan = ReportPlan {
            title: self.title(data),
            generated_at: Utc::now(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            batch_id: summary.batch_id.clone(),
            initial_page,
            fallback_message: self.config.fallback_message.clone(),
            pages,
        };
        debug!(
            pages = plan.pages.len(),
            charts = plan.chart_count(),
            failed = plan.failed_pages().count(),
            "Report plan built"
        );
        Ok(plan)
    }

    /// Render the single-file HTML report.
    pub fn render(&self, data: &ReportData) -> Result<String> {
        let plan = self.plan(data)?;
        self.render_plan(&plan)
    }

    /// Render HTML for an already built plan.
    pub fn render_plan(&self, plan: &ReportPlan) -> Result<String> {
        let html = self.generate_html(plan)?;

        // Optionally minify
        let output = if cfg!(debug_assertions) {
            html
        } else {
            let cfg = minify_html::Cfg {
                minify_js: true,
                minify_css: true,
                ..Default::default()
            };
            String::from_utf8(minify_html::minify(html.as_bytes(), &cfg)).unwrap_or(html)
        };

        info!(
            bytes = output.len(),
            title = %plan.title,
            pages = plan.pages.len(),
            "Report generated"
        );

        Ok(output)
    }

    fn title(&self, data: &ReportData) -> String {
        self.config
            .title
            .clone()
            .unwrap_or_else(|| format!("TCS Log Report: {}", data.summary().batch_id))
    }

    fn generate_html(&self, plan: &ReportPlan) -> Result<String> {
        let plan_json = script_json(&serde_json::to_string(plan)?);

        Ok(format!(
            r##"<!DOCTYPE html>
<html lang="en" class="{theme_class}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <meta name="generator" content="lv-report {version}">
    <meta name="robots" content="noindex, nofollow">
    <style>
        :root {{
            --bg-primary: #ffffff;
            --bg-secondary: #f9fafb;
            --text-primary: #111827;
            --text-secondary: #6b7280;
            --border-color: #e5e7eb;
            --accent-color: #3b82f6;
            --error-color: #b91c1c;
        }}
        .dark {{
            --bg-primary: #111827;
            --bg-secondary: #1f2937;
            --text-primary: #f9fafb;
            --text-secondary: #9ca3af;
            --border-color: #374151;
            --accent-color: #60a5fa;
            --error-color: #f87171;
        }}
        @media (prefers-color-scheme: dark) {{
            :root:not(.light) {{
                --bg-primary: #111827;
                --bg-secondary: #1f2937;
                --text-primary: #f9fafb;
                --text-secondary: #9ca3af;
                --border-color: #374151;
                --accent-color: #60a5fa;
                --error-color: #f87171;
            }}
        }}
        body {{
            margin: 0;
            background-color: var(--bg-primary);
            color: var(--text-primary);
            font-family: ui-sans-serif, system-ui, sans-serif;
            line-height: 1.5;
        }}
        .layout {{
            display: flex;
            min-height: 100vh;
        }}
        #nav {{
            width: 14rem;
            flex-shrink: 0;
            border-right: 1px solid var(--border-color);
            padding: 1rem;
        }}
        #nav-list {{
            list-style: none;
            margin: 0;
            padding: 0;
        }}
        .nav-btn {{
            width: 100%;
            text-align: left;
            padding: 0.5rem 0.75rem;
            border: 0;
            border-left: 3px solid transparent;
            background: none;
            color: inherit;
            cursor: pointer;
        }}
        .nav-btn:hover {{
            background-color: var(--bg-secondary);
        }}
        .nav-btn.active {{
            border-left-color: var(--accent-color);
            color: var(--accent-color);
            font-weight: 600;
        }}
        main {{
            flex: 1;
            padding: 1.5rem 2rem;
        }}
        #error-slot {{
            color: var(--error-color);
            border: 1px solid var(--error-color);
            border-radius: 0.5rem;
            padding: 1rem;
            margin-bottom: 1rem;
        }}
        .card {{
            background-color: var(--bg-secondary);
            border: 1px solid var(--border-color);
            border-radius: 0.5rem;
            padding: 1.5rem;
            margin-bottom: 1rem;
        }}
        .facts {{
            display: grid;
            grid-template-columns: max-content 1fr;
            gap: 0.25rem 1rem;
        }}
        .facts dt {{
            color: var(--text-secondary);
        }}
        .chart {{
            width: 100%;
            height: 360px;
        }}
        @media print {{
            #nav {{ display: none !important; }}
            .card {{ page-break-inside: avoid; }}
        }}
    </style>
</head>
<body>
    <div class="layout">
        <nav id="nav">
            <h1>{title}</h1>
            <ul id="nav-list"></ul>
        </nav>
        <main>
            <div id="error-slot" role="alert" hidden></div>
            <div id="page-content"></div>
            <footer class="card" style="color: var(--text-secondary)">
                Batch {batch_id} | Generated: {generated_at} | lv-report v{version}
            </footer>
        </main>
    </div>

    <script type="application/json" id="report-plan">{plan_json}</script>
    <script src="{loader}"></script>
    <script>{script}</script>
</body>
</html>"##,
            theme_class = self.config.theme.css_class(),
            title = html_escape(&plan.title),
            version = env!("CARGO_PKG_VERSION"),
            batch_id = html_escape(&plan.batch_id),
            generated_at = plan.generated_at.format("%Y-%m-%d %H:%M UTC"),
            plan_json = plan_json,
            loader = html_escape(&self.config.charts_loader_url),
            script = REPORT_SCRIPT,
        ))
    }
}

/// Navigate to `state` on the recorder and capture the page.
fn snapshot(controller: &mut Recorder<'_>, id: String, state: PageState, nav: bool) -> PageSnapshot {
    let label = state.nav_label().to_string();
    let outcome = controller.navigate(state);
    let surface = controller.surface();

    let texts = surface
        .template
        .map(|t| t.slots())
        .unwrap_or_default()
        .iter()
        .filter_map(|s| {
            surface.text(s).map(|text| TextSnapshot {
                slot: s.to_string(),
                label: slot_label(s).to_string(),
                text: text.to_string(),
            })
        })
        .collect();

    let charts = if outcome.error.is_some() {
        Vec::new()
    } else {
        surface
            .containers
            .iter()
            .filter_map(|c| {
                let record = controller.engine().chart_in(&c.id)?;
                Some(ChartSnapshot {
                    container: c.id.clone(),
                    region: c.region.clone(),
                    title: c.title.clone(),
                    kind: record.kind,
                    class_name: record.kind.class_name().to_string(),
                    data: record.data.as_ref()?.to_literal(),
                    options: record.options.clone()?,
                })
            })
            .collect()
    };

    let mut page = PageSnapshot {
        id,
        label,
        state: outcome.state.clone(),
        nav,
        template: surface.template,
        texts,
        regions: surface.regions.clone(),
        charts,
        drilldown: None,
        error: outcome.error,
    };
    if page.error.is_none() {
        page.drilldown = drilldown_variants(controller);
    }
    page
}

/// Select every drilldown label in turn and record the redrawn chart.
fn drilldown_variants(controller: &mut Recorder<'_>) -> Option<DrilldownSnapshot> {
    let handler = controller.drilldown()?;
    let labels: Vec<String> = handler.labels().map(str::to_string).collect();
    let (parent, chart) = (handler.parent_chart(), handler.chart());
    let initial = handler.current().label.clone();
    let parent_container = controller.engine().chart(parent)?.container.clone();
    let container = controller.engine().chart(chart)?.container.clone();

    let mut variants = BTreeMap::new();
    for label in &labels {
        controller.select_drilldown(label);
        let record = controller.engine().chart(chart)?;
        variants.insert(
            label.clone(),
            DrilldownVariant {
                title: controller.drilldown()?.current_title(),
                data: record.data.as_ref()?.to_literal(),
                options: record.options.clone()?,
            },
        );
    }
    Some(DrilldownSnapshot {
        parent_container,
        container,
        initial,
        labels,
        variants,
    })
}

/// Display label of a text slot.
fn slot_label(name: &str) -> &'static str {
    match name {
        slot::PAGE_TITLE => "Page",
        slot::BATCH_ID => "Batch",
        slot::RUN_WINDOW => "Run",
        slot::RUN_DURATION => "Duration",
        slot::VERSIONS => "Versions",
        slot::LIBRARY_COUNT => "Libraries",
        slot::TOTAL_READS => "Total reads",
        slot::LIBRARY_READS => "Raw reads",
        _ => "",
    }
}

/// Make JSON safe inside a `<script>` element.
fn script_json(json: &str) -> String {
    json.replace('<', "\\u003c")
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

const REPORT_SCRIPT: &str = r#"
(function () {
    'use strict';
    const plan = JSON.parse(document.getElementById('report-plan').textContent);
    const pages = new Map(plan.pages.map(p => [p.id, p]));
    let live = [];
    let current = null;

    function teardown() {
        for (const chart of live) {
            try {
                google.visualization.events.removeAllListeners(chart);
                chart.clearChart();
            } catch (err) {
                console.warn('chart teardown failed', err);
            }
        }
        live = [];
    }

    function showError(message) {
        const slot = document.getElementById('error-slot');
        slot.textContent = message;
        slot.hidden = !message;
    }

    function renderNav() {
        const list = document.getElementById('nav-list');
        list.replaceChildren();
        for (const page of plan.pages) {
            if (!page.nav) continue;
            const item = document.createElement('li');
            const button = document.createElement('button');
            button.type = 'button';
            button.className = 'nav-btn' + (page.id === current ? ' active' : '');
            button.textContent = page.label;
            button.addEventListener('click', () => navigate(page.id));
            item.appendChild(button);
            list.appendChild(item);
        }
    }

    function draw(className, el, data, options) {
        const chart = new google.visualization[className](el);
        live.push(chart);
        chart.draw(google.visualization.arrayToDataTable(data), options);
        return chart;
    }

    function renderPage(page) {
        const content = document.getElementById('page-content');
        content.replaceChildren();
        if (page.error) throw new Error(page.error.detail);

        const facts = document.createElement('dl');
        facts.className = 'card facts';
        for (const t of page.texts) {
            if (t.slot === 'page-title') {
                const h = document.createElement('h2');
                h.textContent = t.text;
                content.appendChild(h);
                continue;
            }
            const dt = document.createElement('dt');
            const dd = document.createElement('dd');
            dt.textContent = t.label;
            dd.textContent = t.text;
            facts.append(dt, dd);
        }
        if (facts.childElementCount) content.appendChild(facts);

        const slots = new Map();
        for (const region of page.regions) {
            const section = document.createElement('section');
            section.dataset.region = region;
            for (const chart of page.charts.filter(c => c.region === region)) {
                const card = document.createElement('div');
                const heading = document.createElement('h3');
                const el = document.createElement('div');
                card.className = 'card';
                heading.textContent = chart.title;
                el.className = 'chart';
                el.id = chart.container;
                card.append(heading, el);
                section.appendChild(card);
                slots.set(chart.container, { el, heading, data: chart.data });
            }
            content.appendChild(section);
        }

        const drawn = new Map();
        for (const chart of page.charts) {
            const slot = slots.get(chart.container);
            drawn.set(chart.container, draw(chart.class_name, slot.el, chart.data, chart.options));
        }

        const dd = page.drilldown;
        if (!dd) return;
        const parent = drawn.get(dd.parent_container);
        const target = drawn.get(dd.container);
        const parentData = slots.get(dd.parent_container).data;
        const heading = slots.get(dd.container).heading;
        google.visualization.events.addListener(parent, 'select', () => {
            const selection = parent.getSelection();
            if (!selection.length || selection[0].row == null) return;
            const row = parentData[selection[0].row + 1];
            const variant = row && dd.variants[row[0]];
            if (!variant) return;
            try {
                target.draw(google.visualization.arrayToDataTable(variant.data), variant.options);
                heading.textContent = variant.title;
            } catch (err) {
                console.error(err);
                showError(plan.fallback_message);
            }
        });
    }

    function navigate(pageId) {
        teardown();
        showError('');
        current = pageId;
        try {
            const page = pages.get(pageId);
            if (!page) throw new Error('unknown page ' + pageId);
            renderPage(page);
        } catch (err) {
            console.error(err);
            showError(plan.fallback_message);
        }
        renderNav();
    }

    let resizeTimer = null;
    google.charts.load('current', { packages: ['corechart'] });
    google.charts.setOnLoadCallback(() => {
        navigate(plan.initial_page);
        window.addEventListener('resize', () => {
            clearTimeout(resizeTimer);
            resizeTimer = setTimeout(() => navigate(current), 150);
        });
    });
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_generator_default() {
        let generator = ReportGenerator::default_config();
        assert!(generator.config().title.is_none());
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape(r#""quoted""#), "&quot;quoted&quot;");
    }

    #[test]
    fn test_script_json_cannot_close_script() {
        let json = serde_json::to_string(&serde_json::json!({"label": "</script><b>"})).unwrap();
        let safe = script_json(&json);
        assert!(!safe.contains("</script>"));
        let back: Value = serde_json::from_str(&safe).unwrap();
        assert_eq!(back["label"], "</script><b>");
    }

    #[test]
    fn test_slot_labels() {
        assert_eq!(slot_label(slot::TOTAL_READS), "Total reads");
        assert_eq!(slot_label("nope"), "");
    }
}
