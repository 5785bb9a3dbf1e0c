//! Batch overview page.

use super::format_count;
use crate::chart::{ChartKind, DataTable};
use crate::context::PageCtx;
use crate::error::Result;
use crate::surface::{region, slot, PageTemplate};
use lv_common::BatchSummary;

/// Charts the overview page creates.
pub const CHART_COUNT: usize = 1;

pub const RAW_SEQUENCE_DATA_CONTAINER: &str = "raw-sequence-data-chart";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

pub fn build(page: &mut PageCtx<'_>, summary: &BatchSummary) -> Result<()> {
    page.surface.mount(PageTemplate::Overview)?;

    let versions = summary
        .versions
        .iter()
        .map(|(tool, version)| format!("{} {}", tool, version))
        .collect::<Vec<_>>()
        .join(", ");
    let window = format!(
        "{} to {}",
        summary.start_time.format(TIME_FORMAT),
        summary.end_time.format(TIME_FORMAT)
    );

    page.surface.set_text(slot::PAGE_TITLE, "Overview")?;
    page.surface.set_text(slot::BATCH_ID, &summary.batch_id)?;
    page.surface.set_text(slot::RUN_WINDOW, &window)?;
    page.surface
        .set_text(slot::RUN_DURATION, &summary.duration_formatted())?;
    page.surface.set_text(slot::VERSIONS, &versions)?;
    page.surface
        .set_text(slot::LIBRARY_COUNT, &summary.library_count.to_string())?;
    page.surface
        .set_text(slot::TOTAL_READS, &format_count(summary.total_reads))?;

    let data = DataTable::from_counts("Library", "Raw Reads", &summary.raw_sequence_data);
    let colors = page
        .colors
        .colors_for(summary.raw_sequence_data.iter().map(|(l, _)| l.as_str()));
    let mut options = page.style.base("Raw Sequence Data").with_colors(colors);
    options.pie_slice_text = Some("percentage".to_string());

    page.chart(
        ChartKind::Pie,
        region::RAW_SEQUENCE_DATA,
        RAW_SEQUENCE_DATA_CONTAINER,
        &data,
        &options,
    )?;
    Ok(())
}
