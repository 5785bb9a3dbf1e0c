//! Library detail page.

use super::format_count;
use crate::chart::{
    Axis, Cell, ChartHandle, ChartKind, Column, DataTable, LegendPosition, SeriesOptions,
    SeriesType, ViewWindow,
};
use crate::context::PageCtx;
use crate::drilldown::DrilldownHandler;
use crate::error::Result;
use crate::surface::{region, slot, PageTemplate};
use lv_color::shades;
use lv_common::{LibraryReport, RatioTable, SizeRow};

pub mod container {
    pub const RAW_DISTRIBUTION: &str = "raw-distribution-chart";
    pub const RAW_SEQUENCE_ANALYSIS: &str = "raw-sequence-analysis-chart";
    pub const NUMBER_AT_REGIONS: &str = "number-at-regions-chart";
    pub const DETECTION_SENSITIVITY: &str = "detection-sensitivity-chart";
    pub const DISTINCT_TO_RAW: &str = "distinct-to-raw-chart";
    pub const RESAMPLING_INDEX: &str = "resampling-index-chart";

    /// Container of the `index`-th size distribution region.
    pub fn size_distribution(index: usize) -> String {
        format!("size-distribution-chart-{}", index)
    }
}

/// Series of the number-at-regions chart.
pub const REGION_COUNT_SERIES: [&str; 3] = ["TCS", "Combined TCS", "TCS After QC"];

/// Build the detail page for `label`. Returns the drilldown handler when the
/// raw sequence analysis has drilldowns.
pub fn build(
    page: &mut PageCtx<'_>,
    label: &str,
    report: &LibraryReport,
) -> Result<Option<DrilldownHandler>> {
    page.surface.mount(PageTemplate::LibraryDetail)?;
    page.surface.set_text(slot::PAGE_TITLE, label)?;
    page.surface.set_text(
        slot::LIBRARY_READS,
        &format_count(report.raw_distribution.total()),
    )?;

    count_pie(
        page,
        region::RAW_DISTRIBUTION,
        container::RAW_DISTRIBUTION,
        "Raw Sequence Distribution",
        &report.raw_distribution.data,
    )?;

    let analysis = &report.raw_sequence_analysis;
    let parent = count_pie(
        page,
        region::RAW_SEQUENCE_ANALYSIS,
        container::RAW_SEQUENCE_ANALYSIS,
        "Raw Sequence Analysis",
        &analysis.data,
    )?;
    let parent_labels = analysis.data.iter().map(|(l, _)| l.clone()).collect();
    let drilldown =
        DrilldownHandler::mount(page, parent, parent_labels, analysis.drilldowns.clone())?;

    number_at_regions(page, report)?;

    if report.detection_sensitivity.is_empty() {
        page.surface.remove_region(region::DETECTION_SENSITIVITY)?;
    } else {
        ratio_bars(
            page,
            region::DETECTION_SENSITIVITY,
            container::DETECTION_SENSITIVITY,
            "Detection Sensitivity",
            &report.detection_sensitivity,
            Some("percent"),
        )?;
    }
    ratio_bars(
        page,
        region::DISTINCT_TO_RAW,
        container::DISTINCT_TO_RAW,
        "Distinct to Raw",
        &report.distinct_to_raw,
        Some("percent"),
    )?;
    ratio_bars(
        page,
        region::RESAMPLING_INDEX,
        container::RESAMPLING_INDEX,
        "Resampling Index",
        &report.resampling_index,
        None,
    )?;

    if report.size_distribution.data.is_empty() {
        page.surface.remove_region(region::SIZE_DISTRIBUTION)?;
    }
    for (i, (name, rows)) in report.size_distribution.data.iter().enumerate() {
        size_combo(page, &container::size_distribution(i), name, rows)?;
    }

    Ok(drilldown)
}

fn count_pie(
    page: &mut PageCtx<'_>,
    region: &str,
    container: &str,
    title: &str,
    rows: &[(String, u64)],
) -> Result<ChartHandle> {
    let data = DataTable::from_counts("Category", "Sequences", rows);
    let colors = page.colors.colors_for(rows.iter().map(|(l, _)| l.as_str()));
    let mut options = page.style.base(title).with_colors(colors);
    options.pie_slice_text = Some("percentage".to_string());
    page.chart(ChartKind::Pie, region, container, &data, &options)
}

fn number_at_regions(page: &mut PageCtx<'_>, report: &LibraryReport) -> Result<ChartHandle> {
    let mut columns = vec![Column::string("Region")];
    columns.extend(REGION_COUNT_SERIES.iter().map(|s| Column::number(*s)));
    let mut data = DataTable::new(columns);
    for (name, tcs, combined, after_qc) in &report.number_at_regions.data {
        data.push_row(vec![
            Cell::text(name.as_str()),
            Cell::from(*tcs),
            Cell::from(*combined),
            Cell::from(*after_qc),
        ]);
    }
    let colors = page.colors.colors_for(REGION_COUNT_SERIES);
    let options = page
        .style
        .base("Number of TCS at Regions")
        .with_colors(colors)
        .with_legend(LegendPosition::Bottom);
    page.chart(
        ChartKind::Column,
        region::NUMBER_AT_REGIONS,
        container::NUMBER_AT_REGIONS,
        &data,
        &options,
    )
}

fn ratio_bars(
    page: &mut PageCtx<'_>,
    region: &str,
    container: &str,
    title: &str,
    table: &RatioTable,
    format: Option<&str>,
) -> Result<ChartHandle> {
    let mut data = DataTable::new(vec![
        Column::string("Region"),
        Column::number(title),
        Column::style(),
    ]);
    for (name, ratio) in &table.data {
        let color = page.colors.color_for(name);
        data.push_row(vec![Cell::text(name.as_str()), Cell::from(*ratio), Cell::color(color)]);
    }
    let max = table.data.iter().map(|(_, r)| *r).fold(1.0_f64, f64::max);
    let mut options = page.style.base(title).with_legend(LegendPosition::None);
    options.h_axis = Some(Axis {
        view_window: Some(ViewWindow { min: 0.0, max }),
        format: format.map(str::to_string),
        ..Axis::default()
    });
    page.chart(ChartKind::Bar, region, container, &data, &options)
}

fn size_combo(
    page: &mut PageCtx<'_>,
    container: &str,
    name: &str,
    rows: &[SizeRow],
) -> Result<ChartHandle> {
    let mut data = DataTable::new(vec![
        Column::number("Family Size"),
        Column::number("Distribution"),
        Column::number("Cutoff"),
    ]);
    for (index, distribution, cutoff) in rows {
        data.push_row(vec![
            Cell::from(*index),
            Cell::from(*distribution),
            Cell::from(*cutoff),
        ]);
    }
    let pair = shades(page.colors.color_for(name), 2);
    let mut options = page
        .style
        .base(&format!("UMI Family Size: {}", name))
        .with_legend(LegendPosition::Bottom);
    options.series_type = Some(SeriesType::Line);
    options.series.insert(0, SeriesOptions::scatter(pair[0]));
    options.series.insert(1, SeriesOptions::line(pair[1]));
    options.h_axis = Some(Axis {
        title: Some("UMI family size".to_string()),
        ..Axis::default()
    });
    options.v_axis = Some(Axis {
        title: Some("Frequency".to_string()),
        log_scale: true,
        ..Axis::default()
    });
    page.chart(ChartKind::Combo, region::SIZE_DISTRIBUTION, container, &data, &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_distribution_container_ids() {
        assert_eq!(container::size_distribution(0), "size-distribution-chart-0");
        assert_ne!(
            container::size_distribution(1),
            container::size_distribution(2)
        );
    }
}
