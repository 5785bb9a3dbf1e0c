//! Page surface contract: the navigation list, page content and error slot.

use crate::controller::PageState;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Text slot names.
pub mod slot {
    pub const PAGE_TITLE: &str = "page-title";
    pub const BATCH_ID: &str = "batch-id";
    pub const RUN_WINDOW: &str = "run-window";
    pub const RUN_DURATION: &str = "run-duration";
    pub const VERSIONS: &str = "versions";
    pub const LIBRARY_COUNT: &str = "library-count";
    pub const TOTAL_READS: &str = "total-reads";
    pub const LIBRARY_READS: &str = "library-reads";
}

/// Chart region names.
pub mod region {
    pub const RAW_SEQUENCE_DATA: &str = "raw-sequence-data";
    pub const RAW_DISTRIBUTION: &str = "raw-distribution";
    pub const RAW_SEQUENCE_ANALYSIS: &str = "raw-sequence-analysis";
    pub const DRILLDOWN: &str = "drilldown";
    pub const NUMBER_AT_REGIONS: &str = "number-at-regions";
    pub const DETECTION_SENSITIVITY: &str = "detection-sensitivity";
    pub const DISTINCT_TO_RAW: &str = "distinct-to-raw";
    pub const RESAMPLING_INDEX: &str = "resampling-index";
    pub const SIZE_DISTRIBUTION: &str = "size-distribution";
}

/// Page template fragments, one per page kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageTemplate {
    Overview,
    LibraryDetail,
}

impl PageTemplate {
    /// Text slots the fragment provides.
    pub fn slots(&self) -> &'static [&'static str] {
        match self {
            PageTemplate::Overview => &[
                slot::PAGE_TITLE,
                slot::BATCH_ID,
                slot::RUN_WINDOW,
                slot::RUN_DURATION,
                slot::VERSIONS,
                slot::LIBRARY_COUNT,
                slot::TOTAL_READS,
            ],
            PageTemplate::LibraryDetail => &[slot::PAGE_TITLE, slot::LIBRARY_READS],
        }
    }

    /// Chart regions the fragment provides, in display order.
    pub fn regions(&self) -> &'static [&'static str] {
        match self {
            PageTemplate::Overview => &[region::RAW_SEQUENCE_DATA],
            PageTemplate::LibraryDetail => &[
                region::RAW_DISTRIBUTION,
                region::RAW_SEQUENCE_ANALYSIS,
                region::DRILLDOWN,
                region::NUMBER_AT_REGIONS,
                region::DETECTION_SENSITIVITY,
                region::DISTINCT_TO_RAW,
                region::RESAMPLING_INDEX,
                region::SIZE_DISTRIBUTION,
            ],
        }
    }
}

/// One navigation list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    pub label: String,
    pub target: PageState,
    pub active: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("no page template is mounted")]
    NotMounted,

    #[error("template has no slot '{0}'")]
    MissingSlot(String),

    #[error("template has no region '{0}'")]
    MissingRegion(String),

    #[error("container '{0}' already exists")]
    DuplicateContainer(String),

    #[error("container '{0}' does not exist")]
    MissingContainer(String),
}

/// The UI the controller writes into.
pub trait Surface {
    /// Replace the navigation list.
    fn render_navigation(&mut self, entries: &[NavEntry]);

    /// Drop the mounted page fragment and everything in it.
    fn clear_content(&mut self);

    /// Clone the fragment for `template` into the content region.
    fn mount(&mut self, template: PageTemplate) -> Result<(), SurfaceError>;

    fn set_text(&mut self, slot: &str, text: &str) -> Result<(), SurfaceError>;

    /// Add a titled chart container inside `region`.
    fn add_container(&mut self, region: &str, id: &str, title: &str) -> Result<(), SurfaceError>;

    fn set_title(&mut self, container: &str, title: &str) -> Result<(), SurfaceError>;

    /// Remove `region` and its containers from the mounted fragment.
    fn remove_region(&mut self, region: &str) -> Result<(), SurfaceError>;

    fn show_error(&mut self, message: &str);

    fn clear_error(&mut self);
}
