//! TCS log report command-line core.
//!
//! Backs the `lv` binary: configuration resolution, logging setup, exit
//! codes and the JSON summaries printed by `inspect` and `validate`.

pub mod config;
pub mod exit_codes;
pub mod logging;
pub mod summary;

pub use config::{load_config, ConfigError, ConfigOptions, ConfigSource, ResolvedConfig};
pub use exit_codes::ExitCode;
pub use summary::{InspectSummary, ValidationSummary};
