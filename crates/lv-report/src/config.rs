//! Report configuration types.

use crate::chart::Animation;
use lv_color::{Color, ColorError, ColorTable, DEFAULT_KNOWN_REGIONS, DEFAULT_PALETTE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Report color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTheme {
    /// Light theme.
    Light,
    /// Dark theme.
    Dark,
    /// Auto-detect from system preference.
    #[default]
    Auto,
}

impl ReportTheme {
    /// Get the CSS class for this theme.
    pub fn css_class(&self) -> &'static str {
        match self {
            ReportTheme::Light => "light",
            ReportTheme::Dark => "dark",
            ReportTheme::Auto => "",
        }
    }
}

/// Category color configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorConfig {
    /// Fixed colors for known regions.
    #[serde(default = "default_known_regions")]
    pub known_regions: BTreeMap<String, Color>,
    /// Cycling palette for every other label.
    #[serde(default = "default_palette")]
    pub palette: Vec<Color>,
}

fn default_known_regions() -> BTreeMap<String, Color> {
    DEFAULT_KNOWN_REGIONS
        .iter()
        .map(|(label, color)| (label.to_string(), *color))
        .collect()
}

fn default_palette() -> Vec<Color> {
    DEFAULT_PALETTE.to_vec()
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            known_regions: default_known_regions(),
            palette: default_palette(),
        }
    }
}

impl ColorConfig {
    /// Fresh color table for one report session.
    pub fn build_table(&self) -> Result<ColorTable, ColorError> {
        ColorTable::new(
            self.known_regions.iter().map(|(k, c)| (k.clone(), *c)),
            self.palette.clone(),
        )
    }
}

const EASINGS: [&str; 4] = ["linear", "in", "out", "inAndOut"];

/// Chart animation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u32,
    #[serde(default = "default_easing")]
    pub easing: String,
    /// Animate the first draw.
    #[serde(default = "default_true")]
    pub startup: bool,
}

fn default_true() -> bool {
    true
}

fn default_duration_ms() -> u32 {
    600
}

fn default_easing() -> String {
    "out".to_string()
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: default_duration_ms(),
            easing: default_easing(),
            startup: true,
        }
    }
}

impl AnimationConfig {
    /// Draw-option form, `None` when disabled.
    pub fn to_animation(&self) -> Option<Animation> {
        self.enabled.then(|| Animation {
            duration: self.duration_ms,
            easing: self.easing.clone(),
            startup: self.startup,
        })
    }
}

/// Complete report configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    /// Custom report title.
    #[serde(default)]
    pub title: Option<String>,
    /// Color theme.
    #[serde(default)]
    pub theme: ReportTheme,
    /// Library whose detail page is shown first instead of the overview.
    #[serde(default)]
    pub default_library: Option<String>,
    #[serde(default)]
    pub colors: ColorConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    /// Text shown in the error slot when a page fails to build.
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
    /// Google Charts loader script.
    #[serde(default = "default_charts_loader_url")]
    pub charts_loader_url: String,
}

fn default_schema_version() -> String {
    "1.0.0".to_string()
}

pub const DEFAULT_FALLBACK_MESSAGE: &str =
    "This page could not be displayed. Please choose another page.";

fn default_fallback_message() -> String {
    DEFAULT_FALLBACK_MESSAGE.to_string()
}

fn default_charts_loader_url() -> String {
    "https://www.gstatic.com/charts/loader.js".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            title: None,
            theme: ReportTheme::default(),
            default_library: None,
            colors: ColorConfig::default(),
            animation: AnimationConfig::default(),
            fallback_message: default_fallback_message(),
            charts_loader_url: default_charts_loader_url(),
        }
    }
}

impl ReportConfig {
    /// Create a new report configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: ReportTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Open on a library's detail page.
    pub fn with_default_library(mut self, label: impl Into<String>) -> Self {
        self.default_library = Some(label.into());
        self
    }

    pub fn with_animation(mut self, enabled: bool) -> Self {
        self.animation.enabled = enabled;
        self
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<(), String> {
        if self.colors.palette.is_empty() {
            return Err("colors.palette must not be empty".to_string());
        }
        if !EASINGS.contains(&self.animation.easing.as_str()) {
            return Err(format!(
                "animation.easing '{}' is not one of {}",
                self.animation.easing,
                EASINGS.join(", ")
            ));
        }
        if self.fallback_message.trim().is_empty() {
            return Err("fallback_message must not be empty".to_string());
        }
        if let Some(lib) = &self.default_library {
            if lib.trim().is_empty() {
                return Err("default_library must not be empty".to_string());
            }
        }
        Ok(())
    }

    /// Load configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReportConfig::default();
        assert_eq!(config.schema_version, "1.0.0");
        assert_eq!(config.theme, ReportTheme::Auto);
        assert!(config.default_library.is_none());
        assert_eq!(config.fallback_message, DEFAULT_FALLBACK_MESSAGE);
        assert_eq!(config.colors.palette.len(), 10);
        assert!(config.colors.known_regions.contains_key("Other"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ReportConfig::new()
            .with_title("Batch 7")
            .with_theme(ReportTheme::Dark)
            .with_default_library("LIB2")
            .with_animation(false);

        assert_eq!(config.title, Some("Batch 7".to_string()));
        assert_eq!(config.theme, ReportTheme::Dark);
        assert_eq!(config.default_library.as_deref(), Some("LIB2"));
        assert!(config.animation.to_animation().is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = ReportConfig::from_json(
            r##"{"colors": {"palette": ["#000000", "#ffffff"]}, "animation": {"duration_ms": 0}}"##,
        )
        .unwrap();
        assert_eq!(config.colors.palette.len(), 2);
        assert_eq!(config.colors.known_regions.len(), 6);
        assert_eq!(config.animation.duration_ms, 0);
        assert_eq!(config.animation.easing, "out");
        assert_eq!(config.charts_loader_url, default_charts_loader_url());
    }

    #[test]
    fn test_bad_hex_rejected() {
        let err = ReportConfig::from_json(r#"{"colors": {"palette": ["blue"]}}"#).unwrap_err();
        assert!(err.to_string().contains("blue"));
    }

    #[test]
    fn test_validate_rejects() {
        let mut config = ReportConfig::default();
        config.colors.palette.clear();
        assert!(config.validate().unwrap_err().contains("palette"));

        let mut config = ReportConfig::default();
        config.animation.easing = "bounce".into();
        assert!(config.validate().unwrap_err().contains("bounce"));

        let config = ReportConfig::default().with_default_library("  ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_build_table_uses_known_regions() {
        let config = ColorConfig::default();
        let mut table = config.build_table().unwrap();
        assert_eq!(table.color_for("PR"), config.known_regions["PR"]);
        assert_eq!(table.color_for("Novel"), config.palette[0]);
    }

    #[test]
    fn test_config_serialization() {
        let config = ReportConfig::default().with_title("t");
        let json = config.to_json().unwrap();
        let parsed = ReportConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
