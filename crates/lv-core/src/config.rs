//! Report configuration loading for the `lv` binary.
//!
//! Resolution order (highest to lowest priority):
//! 1. Explicit `--config` path
//! 2. `LV_CONFIG` environment variable (a file)
//! 3. `LV_CONFIG_DIR/report.json`
//! 4. `<config_dir>/tcs-logview/report.json` (XDG on Linux)
//! 5. Built-in defaults
//!
//! Explicit paths (1 and 2) must exist. Directory candidates (3 and 4) are
//! skipped when the file is absent.

use lv_report::ReportConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "tcs-logview";

/// Config file name inside a config directory.
pub const CONFIG_FILE_NAME: &str = "report.json";

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration in {path}: {message}")]
    Invalid { path: PathBuf, message: String },

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "path", rename_all = "snake_case")]
pub enum ConfigSource {
    Cli(PathBuf),
    Env(PathBuf),
    EnvDir(PathBuf),
    UserDir(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Cli(p)
            | ConfigSource::Env(p)
            | ConfigSource::EnvDir(p)
            | ConfigSource::UserDir(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConfigSource::Cli(_) => "cli",
            ConfigSource::Env(_) => "env",
            ConfigSource::EnvDir(_) => "env_dir",
            ConfigSource::UserDir(_) => "user_dir",
            ConfigSource::Defaults => "defaults",
        }
    }
}

/// Resolved configuration with provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: ReportConfig,
    pub source: ConfigSource,
}

/// Configuration resolution options.
#[derive(Debug, Default)]
pub struct ConfigOptions {
    /// Explicit config file (highest priority).
    pub config_path: Option<PathBuf>,
    /// Overrides the platform config dir; used by tests.
    pub user_config_dir: Option<PathBuf>,
}

/// Load configuration with the standard resolution order.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    let source = resolve_source(options, |key| std::env::var(key).ok())?;
    load_from_source(source)
}

/// Pick the config source without reading it.
pub fn resolve_source<F>(options: &ConfigOptions, lookup: F) -> Result<ConfigSource, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = &options.config_path {
        return explicit(path.clone()).map(ConfigSource::Cli);
    }

    if let Some(path) = lookup("LV_CONFIG").filter(|v| !v.is_empty()) {
        return explicit(PathBuf::from(path)).map(ConfigSource::Env);
    }

    if let Some(dir) = lookup("LV_CONFIG_DIR").filter(|v| !v.is_empty()) {
        let path = PathBuf::from(dir).join(CONFIG_FILE_NAME);
        if path.is_file() {
            return Ok(ConfigSource::EnvDir(path));
        }
    }

    let user_dir = options
        .user_config_dir
        .clone()
        .or_else(|| dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME)));
    if let Some(dir) = user_dir {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            return Ok(ConfigSource::UserDir(path));
        }
    }

    Ok(ConfigSource::Defaults)
}

/// Read and validate the configuration `source` points at.
pub fn load_from_source(source: ConfigSource) -> Result<ResolvedConfig, ConfigError> {
    let config = match source.path() {
        Some(path) => load_config_file(path)?,
        None => ReportConfig::default(),
    };
    Ok(ResolvedConfig { config, source })
}

/// Load a report config from a specific file.
pub fn load_config_file(path: &Path) -> Result<ReportConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config = ReportConfig::from_json(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    config.validate().map_err(|message| ConfigError::Invalid {
        path: path.to_path_buf(),
        message,
    })?;

    Ok(config)
}

fn explicit(path: PathBuf) -> Result<PathBuf, ConfigError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(ConfigError::NotFound { path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, String)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_config(dir: &Path, name: &str, json: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, json).unwrap();
        path
    }

    fn isolated(tmp: &TempDir) -> ConfigOptions {
        ConfigOptions {
            config_path: None,
            user_config_dir: Some(tmp.path().join("user")),
        }
    }

    #[test]
    fn test_defaults_when_nothing_configured() {
        let tmp = TempDir::new().unwrap();
        let source = resolve_source(&isolated(&tmp), env(&[])).unwrap();
        assert_eq!(source, ConfigSource::Defaults);
        let resolved = load_from_source(source).unwrap();
        assert!(resolved.config.title.is_none());
    }

    #[test]
    fn test_cli_path_wins() {
        let tmp = TempDir::new().unwrap();
        let cli = write_config(tmp.path(), "cli.json", r#"{"title": "CLI"}"#);
        let envfile = write_config(tmp.path(), "env.json", r#"{"title": "ENV"}"#);

        let mut options = isolated(&tmp);
        options.config_path = Some(cli.clone());
        let source =
            resolve_source(&options, env(&[("LV_CONFIG", envfile.display().to_string())])).unwrap();
        assert_eq!(source, ConfigSource::Cli(cli));
        let resolved = load_from_source(source).unwrap();
        assert_eq!(resolved.config.title.as_deref(), Some("CLI"));
    }

    #[test]
    fn test_env_file_before_env_dir() {
        let tmp = TempDir::new().unwrap();
        let envfile = write_config(tmp.path(), "env.json", "{}");
        write_config(tmp.path(), CONFIG_FILE_NAME, "{}");

        let source = resolve_source(
            &isolated(&tmp),
            env(&[
                ("LV_CONFIG", envfile.display().to_string()),
                ("LV_CONFIG_DIR", tmp.path().display().to_string()),
            ]),
        )
        .unwrap();
        assert_eq!(source, ConfigSource::Env(envfile));
    }

    #[test]
    fn test_env_dir_used_when_file_present() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(tmp.path(), CONFIG_FILE_NAME, r#"{"theme": "dark"}"#);
        let source = resolve_source(
            &isolated(&tmp),
            env(&[("LV_CONFIG_DIR", tmp.path().display().to_string())]),
        )
        .unwrap();
        assert_eq!(source, ConfigSource::EnvDir(path));
    }

    #[test]
    fn test_empty_env_dir_falls_through_to_user_dir() {
        let tmp = TempDir::new().unwrap();
        let empty = tmp.path().join("empty");
        std::fs::create_dir_all(&empty).unwrap();
        let user = tmp.path().join("user");
        std::fs::create_dir_all(&user).unwrap();
        let path = write_config(&user, CONFIG_FILE_NAME, "{}");

        let source = resolve_source(
            &isolated(&tmp),
            env(&[("LV_CONFIG_DIR", empty.display().to_string())]),
        )
        .unwrap();
        assert_eq!(source, ConfigSource::UserDir(path));
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let tmp = TempDir::new().unwrap();
        let mut options = isolated(&tmp);
        options.config_path = Some(tmp.path().join("nope.json"));
        let err = resolve_source(&options, env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(tmp.path(), "bad.json", "{ not json");
        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_semantic_validation() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(tmp.path(), "empty.json", r#"{"colors": {"palette": []}}"#);
        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_source_names() {
        assert_eq!(ConfigSource::Defaults.name(), "defaults");
        assert_eq!(ConfigSource::Defaults.path(), None);
        let p = PathBuf::from("/tmp/report.json");
        assert_eq!(ConfigSource::Cli(p.clone()).path(), Some(p.as_path()));
    }
}
